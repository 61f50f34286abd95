//! Game state management - score, win/lose conditions.
//!
//! Win: Clear all bubbles from the grid.
//! Lose: A bubble settles below the danger line.

use serde::Serialize;

use super::grid::GridModel;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GameOutcome {
    /// Every bubble was cleared.
    Cleared,
    /// The grid grew past the danger line.
    Overflow,
}

/// Where the session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SessionState {
    /// Waiting for a shot.
    #[default]
    Aiming,
    /// A projectile is in flight.
    Shooting,
    /// Terminal until an explicit reset.
    GameOver(GameOutcome),
}

impl SessionState {
    pub fn is_game_over(&self) -> bool {
        matches!(self, SessionState::GameOver(_))
    }
}

/// Score and counters for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GameScore {
    pub score: u32,
    pub shots_fired: u32,
    pub bubbles_popped: u32,
    pub clusters_popped: u32,
    pub bubbles_dropped: u32,
}

impl GameScore {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Credit one resolution. The score only ever grows.
    pub fn record(&mut self, popped: usize, dropped: usize, points: u32) {
        self.score = self.score.saturating_add(points);
        if popped > 0 {
            self.clusters_popped += 1;
            self.bubbles_popped += popped as u32;
        }
        self.bubbles_dropped += dropped as u32;
    }
}

/// Check the end conditions after a resolution.
pub fn check_end(grid: &GridModel, danger_line: f32) -> Option<GameOutcome> {
    if grid.is_empty() {
        return Some(GameOutcome::Cleared);
    }
    match grid.max_y() {
        Some(deepest) if deepest > danger_line => Some(GameOutcome::Overflow),
        _ => None,
    }
}
