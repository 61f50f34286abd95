//! Projectile - the bubble being shot.
//!
//! The projectile travels in a straight line, bouncing off walls,
//! until it hits another bubble or the top of the playfield.

use bevy::math::Vec2;

use super::bubble::ColorId;

/// The bubble in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Displacement per simulation step.
    pub velocity: Vec2,
    pub color: ColorId,
}

impl Projectile {
    /// Launch from `origin` at `angle` radians from straight up, clockwise positive.
    pub fn launch(origin: Vec2, angle: f32, speed: f32, color: ColorId) -> Self {
        Self {
            position: origin,
            velocity: Vec2::new(angle.sin() * speed, -angle.cos() * speed),
            color,
        }
    }

    /// Move by one step of velocity.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Bounce off the side walls at `min_x` / `max_x`.
    ///
    /// The position is clamped back onto the wall so a single contact flips
    /// the horizontal velocity exactly once. Returns whether a bounce happened.
    pub fn reflect_off_walls(&mut self, min_x: f32, max_x: f32) -> bool {
        if self.position.x <= min_x {
            self.position.x = min_x;
            self.velocity.x = self.velocity.x.abs();
            true
        } else if self.position.x >= max_x {
            self.position.x = max_x;
            self.velocity.x = -self.velocity.x.abs();
            true
        } else {
            false
        }
    }
}

/// Clamp a non-finite angle to the nearest finite one.
///
/// `NaN` has no nearest value and maps to straight up.
pub fn finite_angle(angle: f32) -> f32 {
    if angle.is_nan() {
        0.0
    } else {
        angle.clamp(f32::MIN, f32::MAX)
    }
}
