//! Read-only views of a session for renderers and network layers.

use serde::Serialize;

use super::{
    bubble::ColorId,
    session::GameSession,
    state::{GameScore, SessionState},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubbleSnapshot {
    pub row: i32,
    pub col: i32,
    pub x: f32,
    pub y: f32,
    pub color: ColorId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    pub x: f32,
    pub y: f32,
    pub color: ColorId,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Sorted by row, then column.
    pub bubbles: Vec<BubbleSnapshot>,
    pub projectile: Option<ProjectileSnapshot>,
    pub shooter_x: f32,
    pub shooter_angle: f32,
    pub current: Option<ColorId>,
    pub next: ColorId,
    pub score: u32,
    pub state: SessionState,
    pub stats: GameScore,
}

impl SessionSnapshot {
    pub(super) fn capture(session: &GameSession) -> Self {
        let bubbles = session
            .grid()
            .bubbles()
            .into_iter()
            .map(|b| BubbleSnapshot {
                row: b.coord.row,
                col: b.coord.col,
                x: b.x,
                y: b.y,
                color: b.color,
            })
            .collect();
        let projectile = session.projectile().map(|p| ProjectileSnapshot {
            x: p.position.x,
            y: p.position.y,
            color: p.color,
        });
        let shooter = session.shooter();
        let queue = session.queue();

        Self {
            bubbles,
            projectile,
            shooter_x: shooter.x,
            shooter_angle: shooter.angle,
            current: queue.current,
            next: queue.next,
            score: session.score().score,
            state: session.state(),
            stats: *session.score(),
        }
    }

    /// Serialize for a web or IPC front end.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
