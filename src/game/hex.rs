//! Hexagonal coordinate system using offset coordinates.
//!
//! Bubbles are packed in rows of circles. Odd rows are shifted right by one
//! radius, so the six neighbors of a cell depend on the parity of its row.
//! Row 0 sits against the ceiling and rows grow downward.

use bevy::math::Vec2;

/// Vertical distance between row centers, as a multiple of the bubble radius.
pub const ROW_SPACING: f32 = 1.7;

/// Neighbor offsets `(d_row, d_col)` indexed by row parity (0 = even, 1 = odd).
///
/// Every component that needs adjacency reads this one table. The iteration
/// order is significant: attachment tie-breaking picks the first entry.
pub const NEIGHBOR_OFFSETS: [[(i32, i32); 6]; 2] = [
    // Even row (not shifted)
    [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)],
    // Odd row (shifted right)
    [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)],
];

/// Offset hex coordinate.
///
/// - `row` increases downward, row 0 is the anchor row
/// - `col` increases to the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexCoord {
    pub row: i32,
    pub col: i32,
}

impl HexCoord {
    /// Create a new hex coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub const fn is_odd_row(&self) -> bool {
        self.row % 2 != 0
    }

    /// The offset table for this cell's row parity.
    #[inline]
    pub fn offsets(&self) -> &'static [(i32, i32); 6] {
        &NEIGHBOR_OFFSETS[usize::from(self.is_odd_row())]
    }

    /// Get all 6 neighboring coordinates, in offset-table order.
    ///
    /// Cells above row 0 or left of column 0 are included; callers filter them.
    pub fn neighbors(&self) -> [HexCoord; 6] {
        let offsets = *self.offsets();
        offsets.map(|(d_row, d_col)| HexCoord::new(self.row + d_row, self.col + d_col))
    }

    /// Convert to the pixel center of the cell for bubbles of the given radius.
    ///
    /// `x = col * 2r + r (+ r on odd rows)`, `y = row * 1.7r + r`.
    pub fn to_pixel(&self, radius: f32) -> Vec2 {
        let row_offset = if self.is_odd_row() { radius } else { 0.0 };
        let x = self.col as f32 * 2.0 * radius + radius + row_offset;
        let y = self.row as f32 * ROW_SPACING * radius + radius;
        Vec2::new(x, y)
    }

    /// Highest column whose center stays inside a playfield of `width`.
    ///
    /// Returns a negative value when not even column 0 fits.
    pub fn max_col(row: i32, radius: f32, width: f32) -> i32 {
        let row_offset = if row % 2 != 0 { radius } else { 0.0 };
        ((width - 2.0 * radius - row_offset) / (2.0 * radius)).floor() as i32
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
