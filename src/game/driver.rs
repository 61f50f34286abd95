//! Bevy systems that feed input messages into the [`GameSession`] and
//! publish what each resolution changed.
//!
//! Hosts write [`FireShot`], [`AimShooter`] and [`ResetSession`]; everything
//! else is read back from the output messages or from
//! [`GameSession::snapshot`].

use bevy::prelude::*;
use tracing::debug;

use super::{
    bubble::ColorId,
    hex::HexCoord,
    session::{GameSession, Resolution, TickOutcome},
    state::GameOutcome,
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<FireShot>();
    app.add_message::<AimShooter>();
    app.add_message::<ResetSession>();
    app.add_message::<BubbleLanded>();
    app.add_message::<ClusterPopped>();
    app.add_message::<FloatingBubblesRemoved>();
    app.add_message::<ShotMissed>();
    app.add_message::<GameEnded>();

    app.add_systems(
        Update,
        (apply_shooter_commands, advance_session)
            .chain()
            .in_set(SessionSystems),
    );
}

/// System set for the session systems. Order anything reading the output
/// messages after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionSystems;

/// Message to launch the loaded bubble, `angle` radians from straight up.
#[derive(Message, Debug, Clone, Copy)]
pub struct FireShot {
    pub angle: f32,
}

/// Message to point the shooter without firing.
#[derive(Message, Debug, Clone, Copy)]
pub struct AimShooter {
    pub angle: f32,
}

/// Message to throw the current game away and start over.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetSession;

/// Message sent when a projectile settles on the grid.
#[derive(Message, Debug, Clone)]
pub struct BubbleLanded {
    pub coord: HexCoord,
    pub color: ColorId,
}

/// Message sent when a landing completes a cluster.
#[derive(Message, Debug, Clone)]
pub struct ClusterPopped {
    pub coords: Vec<HexCoord>,
    pub color: ColorId,
    pub count: usize,
}

/// Message sent when floating bubbles are removed.
#[derive(Message, Debug, Clone)]
pub struct FloatingBubblesRemoved {
    pub coords: Vec<HexCoord>,
    pub count: usize,
}

/// Message sent when a projectile leaves through the bottom edge.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ShotMissed;

/// Message sent once when a game finishes.
#[derive(Message, Debug, Clone, Copy)]
pub struct GameEnded {
    pub outcome: GameOutcome,
    pub score: u32,
}

/// Apply this frame's reset, aim and fire requests, in that order.
fn apply_shooter_commands(
    mut resets: MessageReader<ResetSession>,
    mut aims: MessageReader<AimShooter>,
    mut shots: MessageReader<FireShot>,
    mut session: ResMut<GameSession>,
) {
    if resets.read().count() > 0 {
        session.reset();
    }

    if let Some(aim) = aims.read().last() {
        session.aim(aim.angle);
    }

    for shot in shots.read() {
        if !session.fire(shot.angle) {
            debug!("Ignoring shot while {:?}", session.state());
        }
    }
}

/// Advance the session by the frame time and report what happened.
fn advance_session(
    time: Res<Time>,
    mut session: ResMut<GameSession>,
    mut landed_events: MessageWriter<BubbleLanded>,
    mut popped_events: MessageWriter<ClusterPopped>,
    mut floating_events: MessageWriter<FloatingBubblesRemoved>,
    mut missed_events: MessageWriter<ShotMissed>,
    mut ended_events: MessageWriter<GameEnded>,
) {
    let dt_ms = time.delta_secs() * 1000.0;
    match session.tick(dt_ms) {
        TickOutcome::Idle | TickOutcome::InFlight => {}
        TickOutcome::Missed => {
            missed_events.write(ShotMissed);
        }
        TickOutcome::Resolved(resolution) => {
            let Resolution {
                landed,
                popped,
                dropped,
                ended,
                ..
            } = resolution;

            landed_events.write(BubbleLanded {
                coord: landed.coord,
                color: landed.color,
            });

            if !popped.is_empty() {
                popped_events.write(ClusterPopped {
                    count: popped.len(),
                    coords: popped.iter().map(|b| b.coord).collect(),
                    color: landed.color,
                });
            }

            if !dropped.is_empty() {
                floating_events.write(FloatingBubblesRemoved {
                    count: dropped.len(),
                    coords: dropped.iter().map(|b| b.coord).collect(),
                });
            }

            if let Some(outcome) = ended {
                ended_events.write(GameEnded {
                    outcome,
                    score: session.score().score,
                });
            }
        }
    }
}
