//! The hexagonal grid that holds all settled bubbles.
//!
//! Uses a HashMap for sparse storage - only occupied cells are stored.
//! This is more flexible than a 2D array and handles the hex coordinate
//! system naturally.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::info;

use super::{
    bubble::{Bubble, ColorId, ColorSource},
    hex::HexCoord,
};

/// Safety limit for the ring search in [`GridModel::closest_free_cell`].
const MAX_SEARCHED_CELLS: usize = 1000;

/// Errors from grid mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The target cell already holds a bubble.
    Occupied(HexCoord),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::Occupied(coord) => write!(f, "cell {coord} is already occupied"),
        }
    }
}

impl std::error::Error for GridError {}

/// The settled bubbles plus the geometry needed to place new ones.
#[derive(Debug, Clone)]
pub struct GridModel {
    bubbles: HashMap<HexCoord, Bubble>,
    radius: f32,
    width: f32,
}

impl GridModel {
    /// Create an empty grid for bubbles of `radius` in a playfield `width` wide.
    pub fn new(radius: f32, width: f32) -> Self {
        Self {
            bubbles: HashMap::new(),
            radius,
            width,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Fill rows `0..rows` with `columns` bubbles each.
    ///
    /// Rows are filled top to bottom, left to right, one color draw per cell.
    pub fn populate(
        &mut self,
        rows: i32,
        columns: i32,
        palette: &[ColorId],
        colors: &mut dyn ColorSource,
    ) {
        self.bubbles.clear();
        for row in 0..rows {
            for col in 0..columns {
                let coord = HexCoord::new(row, col);
                let color = colors.draw(palette);
                self.bubbles
                    .insert(coord, Bubble::new(coord, color, self.radius));
            }
        }
        info!("Spawned {} initial bubbles", self.bubbles.len());
    }

    /// Check if a cell is occupied.
    pub fn is_occupied(&self, coord: HexCoord) -> bool {
        self.bubbles.contains_key(&coord)
    }

    /// Whether a bubble may be placed at `coord` inside the playfield.
    ///
    /// Occupancy is not checked here.
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && coord.col <= HexCoord::max_col(coord.row, self.radius, self.width)
    }

    /// Get the bubble at a position, if any.
    pub fn get(&self, coord: HexCoord) -> Option<&Bubble> {
        self.bubbles.get(&coord)
    }

    /// Place a bubble in an empty cell.
    pub fn attach(&mut self, coord: HexCoord, color: ColorId) -> Result<Bubble, GridError> {
        if self.is_occupied(coord) {
            return Err(GridError::Occupied(coord));
        }
        let bubble = Bubble::new(coord, color, self.radius);
        self.bubbles.insert(coord, bubble);
        Ok(bubble)
    }

    /// Remove bubbles, returning the ones that were present.
    pub fn remove(&mut self, coords: &[HexCoord]) -> Vec<Bubble> {
        coords
            .iter()
            .filter_map(|coord| self.bubbles.remove(coord))
            .collect()
    }

    /// Occupied cells among the six offset cells of `coord`, in table order.
    pub fn neighbors_of(&self, coord: HexCoord) -> impl Iterator<Item = &Bubble> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter_map(move |n| self.bubbles.get(&n))
    }

    /// Get the number of bubbles in the grid.
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Iterate over all bubbles in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.values()
    }

    /// All bubbles sorted by row, then column.
    pub fn bubbles(&self) -> Vec<Bubble> {
        let mut all: Vec<Bubble> = self.bubbles.values().copied().collect();
        all.sort_by_key(|b| b.coord);
        all
    }

    /// Get all occupied coordinates.
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.bubbles.keys().copied()
    }

    /// All bubbles in row 0, the anchor row.
    pub fn anchor_row(&self) -> Vec<HexCoord> {
        self.bubbles.keys().filter(|c| c.row == 0).copied().collect()
    }

    /// The largest pixel `y` of any bubble. Used for the overflow check.
    pub fn max_y(&self) -> Option<f32> {
        self.bubbles.values().map(|b| b.y).reduce(f32::max)
    }

    /// Find the free cell nearest `target`, searching outward ring by ring from `origin`.
    ///
    /// The first ring that contains any free in-bounds cell wins; within it the
    /// cell closest to `target` is chosen, ties going to the lower coordinate.
    pub fn closest_free_cell(&self, origin: HexCoord, target: (f32, f32)) -> Option<HexCoord> {
        let mut checked = HashSet::new();
        let mut ring = VecDeque::from([origin]);
        checked.insert(origin);

        while !ring.is_empty() {
            let mut best: Option<(f32, HexCoord)> = None;
            let mut next_ring = VecDeque::new();

            while let Some(coord) = ring.pop_front() {
                if self.in_bounds(coord) && !self.is_occupied(coord) {
                    let d = self.distance_to(coord, target);
                    if best.is_none_or(|(bd, bc)| d < bd || (d == bd && coord < bc)) {
                        best = Some((d, coord));
                    }
                }
                for neighbor in coord.neighbors() {
                    if self.in_bounds(neighbor) && checked.insert(neighbor) {
                        next_ring.push_back(neighbor);
                    }
                }
            }

            if let Some((_, coord)) = best {
                return Some(coord);
            }
            if checked.len() > MAX_SEARCHED_CELLS {
                break;
            }
            ring = next_ring;
        }

        None
    }

    /// Euclidean distance from a cell's pixel center to a point.
    pub fn distance_to(&self, coord: HexCoord, point: (f32, f32)) -> f32 {
        let pos = coord.to_pixel(self.radius);
        (pos.x - point.0).hypot(pos.y - point.1)
    }
}
