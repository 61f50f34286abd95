//! Bubbles - the settled game pieces - and where their colors come from.
//!
//! Colors are opaque ids into a configured palette. Every color draw goes
//! through an injected [`ColorSource`], so a seeded generator or a scripted
//! sequence makes a whole session reproducible.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::hex::HexCoord;

/// A palette entry. What it looks like is up to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(pub u8);

impl std::fmt::Display for ColorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "color#{}", self.0)
    }
}

/// Six colors like classic Snood.
pub fn default_palette() -> Vec<ColorId> {
    (0..6).map(ColorId).collect()
}

/// A settled bubble on the grid.
///
/// `position` is always `coord.to_pixel(radius)`; only the grid creates bubbles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub coord: HexCoord,
    pub color: ColorId,
    pub x: f32,
    pub y: f32,
}

impl Bubble {
    pub(super) fn new(coord: HexCoord, color: ColorId, radius: f32) -> Self {
        let pos = coord.to_pixel(radius);
        Self {
            coord,
            color,
            x: pos.x,
            y: pos.y,
        }
    }
}

/// Supplies bubble colors for the grid population and the shooter queue.
pub trait ColorSource: Send + Sync {
    /// Pick a color. `palette` is never empty.
    fn draw(&mut self, palette: &[ColorId]) -> ColorId;
}

/// Uniform random colors from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomColors<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomColors<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomColors<StdRng> {
    /// Deterministic colors for tests and replays of a single session.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Colors seeded from the thread-local generator.
    pub fn from_thread_rng() -> Self {
        Self::new(StdRng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng + Send + Sync> ColorSource for RandomColors<R> {
    fn draw(&mut self, palette: &[ColorId]) -> ColorId {
        palette[self.rng.random_range(0..palette.len())]
    }
}

/// Replays a fixed list of colors, wrapping around at the end.
///
/// Colors not in the palette are passed through as-is.
#[derive(Debug, Clone)]
pub struct ColorSequence {
    colors: Vec<ColorId>,
    cursor: usize,
}

impl ColorSequence {
    /// An empty list falls back to the first palette color.
    pub fn new(colors: impl IntoIterator<Item = ColorId>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl ColorSource for ColorSequence {
    fn draw(&mut self, palette: &[ColorId]) -> ColorId {
        let Some(&color) = self.colors.get(self.cursor % self.colors.len().max(1)) else {
            return palette[0];
        };
        self.cursor += 1;
        color
    }
}
