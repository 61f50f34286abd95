//! Contact detection and snapping a projectile onto the grid.

use tracing::debug;

use super::{grid::GridModel, hex::HexCoord, projectile::Projectile};

/// What a projectile touched during one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Still flying.
    None,
    /// Overlapping the bubble at this cell.
    Bubble(HexCoord),
    /// Reached the ceiling without touching a bubble.
    Ceiling,
    /// Fell out through the bottom of the playfield.
    Escaped,
}

/// Advance the projectile by one step, bounce it off the walls and report contact.
pub fn step(projectile: &mut Projectile, grid: &GridModel, width: f32, height: f32) -> Contact {
    let radius = grid.radius();
    projectile.advance();
    if projectile.reflect_off_walls(radius, width - radius) {
        debug!("Projectile bounced at x={}", projectile.position.x);
    }

    if let Some(coord) = hit_bubble(projectile, grid) {
        Contact::Bubble(coord)
    } else if projectile.position.y <= radius {
        Contact::Ceiling
    } else if projectile.position.y > height {
        Contact::Escaped
    } else {
        Contact::None
    }
}

/// The nearest bubble whose circle overlaps the projectile's.
///
/// Ties go to the lower `(row, col)` so the result never depends on map order.
pub fn hit_bubble(projectile: &Projectile, grid: &GridModel) -> Option<HexCoord> {
    let reach = grid.radius() * 2.0;
    let pos = projectile.position;

    grid.iter()
        .map(|b| ((b.x - pos.x).hypot(b.y - pos.y), b.coord))
        .filter(|(distance, _)| *distance < reach)
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, coord)| coord)
}

/// Pick the empty cell a projectile settles into after `contact`.
///
/// Returns `None` only for contacts that do not attach, or when the
/// playfield has no free cell left anywhere near the contact.
pub fn attachment_cell(grid: &GridModel, contact: Contact, projectile: &Projectile) -> Option<HexCoord> {
    let at = (projectile.position.x, projectile.position.y);
    match contact {
        Contact::Bubble(hit) => snap_next_to(grid, hit, at),
        Contact::Ceiling => snap_to_ceiling(grid, at),
        Contact::None | Contact::Escaped => None,
    }
}

/// Nearest free offset cell around the bubble that was hit.
fn snap_next_to(grid: &GridModel, hit: HexCoord, at: (f32, f32)) -> Option<HexCoord> {
    let mut best: Option<(f32, HexCoord)> = None;
    for cell in hit.neighbors() {
        if !grid.in_bounds(cell) || grid.is_occupied(cell) {
            continue;
        }
        let distance = grid.distance_to(cell, at);
        // Strict comparison keeps the first minimum in offset-table order.
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, cell));
        }
    }
    if let Some((_, cell)) = best {
        return Some(cell);
    }

    let above = HexCoord::new((hit.row - 1).max(0), hit.col);
    if grid.in_bounds(above) && !grid.is_occupied(above) {
        return Some(above);
    }
    debug!("Every cell around {} is taken, searching outward", hit);
    grid.closest_free_cell(hit, at)
}

/// Row-0 cell under the projectile, or the nearest free one along the row.
fn snap_to_ceiling(grid: &GridModel, at: (f32, f32)) -> Option<HexCoord> {
    let radius = grid.radius();
    let max_col = HexCoord::max_col(0, radius, grid.width()).max(0);
    let col = (((at.0 - radius) / (2.0 * radius)).round() as i32).clamp(0, max_col);
    let target = HexCoord::new(0, col);
    if !grid.is_occupied(target) {
        return Some(target);
    }

    // Walk outward along row 0; at equal column distance the side nearer the
    // projectile goes first.
    for offset in 1..=max_col {
        let mut candidates = [
            HexCoord::new(0, col - offset),
            HexCoord::new(0, col + offset),
        ];
        candidates.sort_by(|a, b| grid.distance_to(*a, at).total_cmp(&grid.distance_to(*b, at)));
        if let Some(free) = candidates
            .into_iter()
            .find(|c| grid.in_bounds(*c) && !grid.is_occupied(*c))
        {
            return Some(free);
        }
    }

    debug!("Row 0 is full, searching outward from {}", target);
    grid.closest_free_cell(target, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bubble::ColorId;
    use bevy::math::Vec2;

    const RADIUS: f32 = 20.0;
    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    fn grid_with(cells: &[(i32, i32)]) -> GridModel {
        let mut grid = GridModel::new(RADIUS, WIDTH);
        for &(row, col) in cells {
            grid.attach(HexCoord::new(row, col), ColorId(0)).unwrap();
        }
        grid
    }

    fn projectile_at(x: f32, y: f32) -> Projectile {
        Projectile {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            color: ColorId(1),
        }
    }

    #[test]
    fn test_hit_requires_overlap() {
        let grid = grid_with(&[(1, 9)]); // center (400, 54)
        assert_eq!(hit_bubble(&projectile_at(400.0, 95.0), &grid), None);
        assert_eq!(
            hit_bubble(&projectile_at(400.0, 90.0), &grid),
            Some(HexCoord::new(1, 9))
        );
    }

    #[test]
    fn test_nearest_bubble_wins() {
        let grid = grid_with(&[(0, 9), (0, 10)]); // centers x = 380, 420
        assert_eq!(
            hit_bubble(&projectile_at(410.0, 50.0), &grid),
            Some(HexCoord::new(0, 10))
        );
        // Equidistant: lower column.
        assert_eq!(
            hit_bubble(&projectile_at(400.0, 50.0), &grid),
            Some(HexCoord::new(0, 9))
        );
    }

    #[test]
    fn test_step_reports_ceiling_and_escape() {
        let grid = GridModel::new(RADIUS, WIDTH);
        let mut up = projectile_at(400.0, 25.0);
        up.velocity = Vec2::new(0.0, -10.0);
        assert_eq!(step(&mut up, &grid, WIDTH, HEIGHT), Contact::Ceiling);

        let mut down = projectile_at(400.0, 595.0);
        down.velocity = Vec2::new(0.0, 10.0);
        assert_eq!(step(&mut down, &grid, WIDTH, HEIGHT), Contact::Escaped);

        let mut flying = projectile_at(400.0, 300.0);
        flying.velocity = Vec2::new(3.0, -10.0);
        assert_eq!(step(&mut flying, &grid, WIDTH, HEIGHT), Contact::None);
    }

    #[test]
    fn test_bubble_contact_beats_ceiling() {
        let grid = grid_with(&[(0, 9)]);
        let mut p = projectile_at(380.0, 28.0);
        p.velocity = Vec2::new(0.0, -10.0);
        assert_eq!(
            step(&mut p, &grid, WIDTH, HEIGHT),
            Contact::Bubble(HexCoord::new(0, 9))
        );
    }

    #[test]
    fn test_snaps_to_nearest_free_neighbor() {
        let grid = grid_with(&[(0, 9), (0, 10), (1, 9)]);
        // Straight below (1, 9): (2, 9) and (2, 10) tie, the table lists (2, 9) first.
        let p = projectile_at(400.0, 90.0);
        let cell = attachment_cell(&grid, Contact::Bubble(HexCoord::new(1, 9)), &p);
        assert_eq!(cell, Some(HexCoord::new(2, 9)));
    }

    #[test]
    fn test_snap_skips_cells_above_row_zero() {
        let grid = grid_with(&[(0, 0)]);
        let p = projectile_at(20.0, 30.0);
        let cell = attachment_cell(&grid, Contact::Bubble(HexCoord::new(0, 0)), &p)
            .unwrap();
        assert!(grid.in_bounds(cell));
        assert!(!grid.is_occupied(cell));
    }

    #[test]
    fn test_surrounded_hit_still_finds_free_cell() {
        let mut cells = vec![(2, 6)];
        for n in HexCoord::new(2, 6).neighbors() {
            cells.push((n.row, n.col));
        }
        let grid = grid_with(&cells);
        let p = projectile_at(260.0, 100.0);
        let cell = attachment_cell(&grid, Contact::Bubble(HexCoord::new(2, 6)), &p).unwrap();
        assert!(!grid.is_occupied(cell));
    }

    #[test]
    fn test_edge_fallback_stays_inside_playfield() {
        // (1, 19) is above the hit but its center sits on the right wall.
        let grid = grid_with(&[(2, 19), (1, 18), (2, 18), (3, 18)]);
        let p = projectile_at(780.0, 100.0);
        let cell = attachment_cell(&grid, Contact::Bubble(HexCoord::new(2, 19)), &p).unwrap();
        assert_ne!(cell, HexCoord::new(1, 19));
        assert!(grid.in_bounds(cell));
        assert!(!grid.is_occupied(cell));
    }

    #[test]
    fn test_ceiling_rounds_column() {
        let grid = GridModel::new(RADIUS, WIDTH);
        let p = projectile_at(395.0, 15.0);
        assert_eq!(
            attachment_cell(&grid, Contact::Ceiling, &p),
            Some(HexCoord::new(0, 9))
        );
    }

    #[test]
    fn test_ceiling_walks_to_nearest_free_column() {
        let grid = grid_with(&[(0, 9), (0, 10)]);
        // Rounds to the taken column 10; its nearer neighbor 9 is taken as well.
        let p = projectile_at(410.0, 15.0);
        assert_eq!(
            attachment_cell(&grid, Contact::Ceiling, &p),
            Some(HexCoord::new(0, 11))
        );
    }

    #[test]
    fn test_no_attachment_without_contact() {
        let grid = GridModel::new(RADIUS, WIDTH);
        let p = projectile_at(400.0, 300.0);
        assert_eq!(attachment_cell(&grid, Contact::None, &p), None);
        assert_eq!(attachment_cell(&grid, Contact::Escaped, &p), None);
    }
}
