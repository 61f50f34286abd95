//! The shooter/launcher at the bottom of the screen.
//!
//! The shooter always has a "loaded" bubble ready to fire and a "next"
//! bubble preview. After every shot, hit or miss, the queue moves up and
//! the launcher swaps sides.

use bevy::math::Vec2;
use tracing::info;

use super::bubble::{ColorId, ColorSource};

/// The launcher position and aim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shooter {
    pub x: f32,
    pub y: f32,
    /// Radians from straight up, clockwise positive.
    pub angle: f32,
    /// Which lateral position the last turn advance picked.
    pub from_left: bool,
}

impl Shooter {
    /// Centered on the bottom edge, aiming straight up.
    ///
    /// The left flag starts set, so the first turn moves the shooter right.
    pub fn new(width: f32, y: f32) -> Self {
        Self {
            x: width / 2.0,
            y,
            angle: 0.0,
            from_left: true,
        }
    }

    /// Swap sides, placing the shooter at the left or right fraction of `width`.
    pub fn alternate(&mut self, width: f32, fractions: (f32, f32)) {
        self.from_left = !self.from_left;
        let fraction = if self.from_left { fractions.0 } else { fractions.1 };
        self.x = width * fraction;
    }

    /// Where a fired projectile starts, `muzzle` pixels above the shooter.
    pub fn muzzle(&self, muzzle: f32) -> Vec2 {
        Vec2::new(self.x, self.y - muzzle)
    }
}

/// The loaded color and the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleQueue {
    /// Consumed on fire; refilled when the turn advances.
    pub current: Option<ColorId>,
    pub next: ColorId,
}

impl BubbleQueue {
    /// Draw the loaded color first, then the preview.
    pub fn new(palette: &[ColorId], colors: &mut dyn ColorSource) -> Self {
        let current = colors.draw(palette);
        let next = colors.draw(palette);
        Self {
            current: Some(current),
            next,
        }
    }

    /// Take the loaded color for a shot.
    pub fn take(&mut self) -> Option<ColorId> {
        self.current.take()
    }

    /// Promote the preview and draw a fresh one.
    pub fn reload(&mut self, palette: &[ColorId], colors: &mut dyn ColorSource) {
        self.current = Some(self.next);
        self.next = colors.draw(palette);
    }
}

/// Advance to the next turn: reload the queue and swap the shooter's side.
pub fn advance_turn(
    queue: &mut BubbleQueue,
    shooter: &mut Shooter,
    palette: &[ColorId],
    colors: &mut dyn ColorSource,
    width: f32,
    fractions: (f32, f32),
) {
    queue.reload(palette, colors);
    shooter.alternate(width, fractions);
    info!(
        "Reloaded with {:?}, next is {}, shooter at x={}",
        queue.current, queue.next, shooter.x
    );
}
