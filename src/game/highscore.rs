//! High score persistence with a Top 10 leaderboard.
//!
//! Finished games are submitted here fire-and-forget: a failed save is
//! logged and never feeds back into the session. Scores live in memory or
//! in a JSON file, usually in the user's data directory.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

use super::driver::{GameEnded, SessionSystems};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerProfile>();
    app.add_systems(Update, submit_final_score.after(SessionSystems));
}

/// Maximum number of high scores to keep.
const MAX_HIGH_SCORES: usize = 10;

/// Name used when the player did not give one.
pub const ANONYMOUS: &str = "Anonymous";

/// Level reported with every submission; the game has a single level.
pub const DEFAULT_LEVEL: u32 = 1;

/// What a finished game reports to a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u32,
    pub level: u32,
    pub player_name: String,
}

impl ScoreSubmission {
    /// Blank names become [`ANONYMOUS`].
    pub fn new(score: u32, level: u32, player_name: &str) -> Self {
        let trimmed = player_name.trim();
        let player_name = if trimmed.is_empty() { ANONYMOUS } else { trimmed };
        Self {
            score,
            level,
            player_name: player_name.to_string(),
        }
    }
}

/// A single high score entry.
pub type ScoreEntry = ScoreSubmission;

/// Who is playing. Read when a game ends.
#[derive(Resource, Debug, Clone)]
pub struct PlayerProfile {
    pub name: String,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: ANONYMOUS.to_string(),
        }
    }
}

/// Where a [`Leaderboard`] keeps its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LeaderboardStore {
    /// Nothing is written; the board lives as long as the app.
    #[default]
    Memory,
    /// A JSON file, created on first save.
    File(PathBuf),
}

/// Why the leaderboard file could not be read or written.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Json(e) => write!(f, "bad leaderboard JSON: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// On-disk layout of the leaderboard file.
#[derive(Serialize, Deserialize)]
struct StoredBoard {
    entries: Vec<ScoreEntry>,
}

impl LeaderboardStore {
    /// `<data dir>/bubble_shooter/highscores.json`, or memory when the
    /// platform has no data directory.
    pub fn default_location() -> Self {
        match dirs::data_local_dir() {
            Some(dir) => Self::File(dir.join("bubble_shooter").join("highscores.json")),
            None => {
                warn!("Could not determine data directory for high scores");
                Self::Memory
            }
        }
    }

    /// Stored entries; a missing file reads as empty.
    pub fn read(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let Self::File(path) = self else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            info!("No high scores file found at {:?}, starting fresh", path);
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path)?;
        let stored: StoredBoard = serde_json::from_str(&contents)?;
        info!("Loaded {} high scores from {:?}", stored.entries.len(), path);
        Ok(stored.entries)
    }

    pub fn write(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        let Self::File(path) = self else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&StoredBoard {
            entries: entries.to_vec(),
        })?;
        fs::write(path, json)?;
        info!("Saved high scores to {:?}", path);
        Ok(())
    }
}

/// Top 10 finished games, best first.
#[derive(Resource, Debug, Default)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
    store: LeaderboardStore,
}

impl Leaderboard {
    /// Open the board kept in `store`. Unreadable files start an empty board.
    pub fn open(store: LeaderboardStore) -> Self {
        let entries = store.read().unwrap_or_else(|e| {
            warn!("Ignoring unreadable high scores: {}", e);
            Vec::new()
        });
        Self { entries, store }
    }

    pub fn store(&self) -> &LeaderboardStore {
        &self.store
    }

    /// Whether `score` would earn a place on the board.
    pub fn is_high_score(&self, score: u32) -> bool {
        score > 0 && self.rank_of(score) < MAX_HIGH_SCORES
    }

    /// Index a new `score` would take. Equal scores keep their earlier rank.
    fn rank_of(&self, score: u32) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// Insert `entry` if it ranks. Returns whether the board changed.
    pub fn add_score(&mut self, entry: ScoreEntry) -> bool {
        if !self.is_high_score(entry.score) {
            return false;
        }
        let rank = self.rank_of(entry.score);
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        true
    }

    /// Record a finished game and persist the board if it changed.
    ///
    /// Storage failures are logged; the entry stays on the in-memory board.
    pub fn submit(&mut self, submission: ScoreSubmission) -> bool {
        if !self.add_score(submission) {
            return false;
        }
        info!("New high score!");
        if let Err(e) = self.store.write(&self.entries) {
            warn!("Failed to save high scores: {}", e);
        }
        true
    }
}

/// Submit the final score whenever a game ends.
fn submit_final_score(
    mut ended: MessageReader<GameEnded>,
    profile: Res<PlayerProfile>,
    mut leaderboard: ResMut<Leaderboard>,
) {
    for event in ended.read() {
        let submission = ScoreSubmission::new(event.score, DEFAULT_LEVEL, &profile.name);
        info!(
            "Submitting {} points for {} ({:?})",
            submission.score, submission.player_name, event.outcome
        );
        leaderboard.submit(submission);
    }
}
