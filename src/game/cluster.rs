//! Cluster detection - finding and popping matching bubbles.
//!
//! Uses flood fill (BFS) to find connected groups of same-colored bubbles.
//! When a cluster of 3+ is found, they pop, and anything left hanging
//! without a path to row 0 drops.

use std::collections::{HashSet, VecDeque};

use tracing::info;

use super::{bubble::Bubble, grid::GridModel, hex::HexCoord};

/// Minimum cluster size to pop (match-3).
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Points awarded per bubble popped in a cluster.
pub const POINTS_PER_POPPED: u32 = 10;

/// Points awarded per floating bubble dropped.
pub const POINTS_PER_DROPPED: u32 = 5;

/// Find all connected bubbles sharing the color of the bubble at `start`.
///
/// The start cell is always part of the result. Returns an empty vec when
/// `start` is not occupied.
pub fn find_cluster(grid: &GridModel, start: HexCoord) -> Vec<HexCoord> {
    let Some(origin) = grid.get(start) else {
        return Vec::new();
    };
    let target_color = origin.color;

    let mut cluster = vec![start];
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(coord) = queue.pop_front() {
        for neighbor in grid.neighbors_of(coord) {
            if neighbor.color == target_color && visited.insert(neighbor.coord) {
                cluster.push(neighbor.coord);
                queue.push_back(neighbor.coord);
            }
        }
    }

    cluster
}

/// Pop the cluster around a freshly attached bubble if it is big enough.
///
/// Returns the removed bubbles; empty when the cluster was too small.
pub fn pop_matches(grid: &mut GridModel, landed: HexCoord) -> Vec<Bubble> {
    let cluster = find_cluster(grid, landed);
    if cluster.len() < MIN_CLUSTER_SIZE {
        return Vec::new();
    }

    let popped = grid.remove(&cluster);
    if let Some(first) = popped.first() {
        info!(
            "Found cluster of {} {} bubbles at {}",
            popped.len(),
            first.color,
            landed
        );
    }
    popped
}

/// Find all bubbles connected to row 0 using BFS, ignoring color.
pub fn find_anchored(grid: &GridModel) -> HashSet<HexCoord> {
    let mut anchored = HashSet::new();
    let mut queue = VecDeque::new();

    for coord in grid.anchor_row() {
        anchored.insert(coord);
        queue.push_back(coord);
    }

    while let Some(coord) = queue.pop_front() {
        for neighbor in grid.neighbors_of(coord) {
            if anchored.insert(neighbor.coord) {
                queue.push_back(neighbor.coord);
            }
        }
    }

    anchored
}

/// Bubbles with no path to row 0, sorted by row then column.
pub fn find_floating(grid: &GridModel) -> Vec<HexCoord> {
    let anchored = find_anchored(grid);
    let mut floating: Vec<HexCoord> = grid.coords().filter(|c| !anchored.contains(c)).collect();
    floating.sort();
    floating
}

/// Remove every floating bubble and return them.
pub fn drop_floating(grid: &mut GridModel) -> Vec<Bubble> {
    let floating = find_floating(grid);
    if floating.is_empty() {
        return Vec::new();
    }
    info!("Found {} floating bubbles to remove", floating.len());
    grid.remove(&floating)
}

/// Score for one resolution: popped cluster plus dropped bubbles.
pub fn points_for(popped: usize, dropped: usize) -> u32 {
    popped as u32 * POINTS_PER_POPPED + dropped as u32 * POINTS_PER_DROPPED
}
