//! The main game module for the bubble shooter.
//!
//! This module contains all the gameplay logic including:
//! - Hexagonal grid system (offset rows)
//! - Projectile flight, wall bounces and attachment
//! - Cluster detection and floating-bubble pruning
//! - Shooter and color queue turn sequencing
//! - The session state machine and its Bevy driver
//! - High score persistence

mod bubble;
mod cluster;
mod collision;
mod config;
mod driver;
mod grid;
mod hex;
mod highscore;
mod projectile;
mod session;
mod shooter;
mod snapshot;
mod state;

use bevy::prelude::*;

pub use bubble::{Bubble, ColorId, ColorSequence, ColorSource, RandomColors, default_palette};
pub use cluster::{
    MIN_CLUSTER_SIZE, POINTS_PER_DROPPED, POINTS_PER_POPPED, drop_floating, find_cluster,
    find_floating, pop_matches, points_for,
};
pub use collision::{Contact, attachment_cell};
pub use config::{ConfigError, GameConfig};
pub use driver::{
    AimShooter, BubbleLanded, ClusterPopped, FireShot, FloatingBubblesRemoved, GameEnded,
    ResetSession, SessionSystems, ShotMissed,
};
pub use grid::{GridError, GridModel};
pub use hex::HexCoord;
pub use highscore::{
    ANONYMOUS, Leaderboard, LeaderboardStore, PlayerProfile, ScoreEntry, ScoreSubmission,
    StoreError,
};
pub use projectile::Projectile;
pub use session::{GameSession, Resolution, TickOutcome};
pub use shooter::{BubbleQueue, Shooter};
pub use snapshot::{BubbleSnapshot, ProjectileSnapshot, SessionSnapshot};
pub use state::{GameOutcome, GameScore, SessionState};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((driver::plugin, highscore::plugin));
}
