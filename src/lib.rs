//! A headless hex-grid bubble shooter engine.
//!
//! The whole game lives in [`GameSession`], which can be driven directly:
//!
//! ```
//! use bubble_shooter::{GameConfig, GameSession, RandomColors, SessionState};
//!
//! let mut session = GameSession::new(GameConfig::default(), RandomColors::seeded(7)).unwrap();
//! session.fire(0.2);
//! while session.state() == SessionState::Shooting {
//!     session.tick(1000.0 / 60.0);
//! }
//! assert_eq!(session.score().shots_fired, 1);
//! ```
//!
//! or through Bevy with [`BubbleShooterPlugin`], writing [`FireShot`] messages
//! and reading the output messages and [`Leaderboard`] resource back.

pub mod game;

use bevy::app::{App, Plugin};

pub use game::*;

/// Adds the bubble shooter session, its messages and the leaderboard.
///
/// The host supplies `Time` (for example through `MinimalPlugins`); nothing
/// here renders or reads input devices.
///
/// # Panics
///
/// Building the plugin panics if `config` does not validate.
#[derive(Debug, Clone, Default)]
pub struct BubbleShooterPlugin {
    pub config: GameConfig,
    /// Seed for the color source. `None` seeds from the thread RNG.
    pub seed: Option<u64>,
    /// Where high scores are kept.
    pub leaderboard: LeaderboardStore,
}

impl BubbleShooterPlugin {
    /// Persist high scores in the platform data directory.
    pub fn with_default_leaderboard(mut self) -> Self {
        self.leaderboard = LeaderboardStore::default_location();
        self
    }
}

impl Plugin for BubbleShooterPlugin {
    fn build(&self, app: &mut App) {
        let colors = match self.seed {
            Some(seed) => RandomColors::seeded(seed),
            None => RandomColors::from_thread_rng(),
        };
        let session = match GameSession::new(self.config.clone(), colors) {
            Ok(session) => session,
            Err(err) => panic!("invalid bubble shooter configuration: {err}"),
        };

        app.insert_resource(session);
        app.insert_resource(Leaderboard::open(self.leaderboard.clone()));
        app.add_plugins(game::plugin);
    }
}
