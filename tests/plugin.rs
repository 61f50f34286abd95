//! Drives the plugin through a headless `App` with a hand-advanced clock.

use std::time::Duration;

use bevy::prelude::*;
use bubble_shooter::{
    AimShooter, BubbleShooterPlugin, ClusterPopped, ColorId, ColorSequence, FireShot, GameConfig,
    GameEnded, GameOutcome, GameSession, HexCoord, Leaderboard, PlayerProfile, ResetSession,
    SessionState, SessionSystems, ShotMissed,
};

/// What the session reported, collected after `SessionSystems`.
#[derive(Resource, Default)]
struct Observed {
    popped: Vec<usize>,
    missed: usize,
    ended: Vec<(GameOutcome, u32)>,
}

fn observe(
    mut popped: MessageReader<ClusterPopped>,
    mut missed: MessageReader<ShotMissed>,
    mut ended: MessageReader<GameEnded>,
    mut observed: ResMut<Observed>,
) {
    observed.popped.extend(popped.read().map(|m| m.count));
    observed.missed += missed.read().count();
    observed
        .ended
        .extend(ended.read().map(|m| (m.outcome, m.score)));
}

fn app_with(layout: &[(i32, i32, ColorId)]) -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(BubbleShooterPlugin {
        seed: Some(5),
        ..Default::default()
    });
    app.init_resource::<Observed>();
    app.add_systems(Update, observe.after(SessionSystems));

    let session = GameSession::from_layout(
        GameConfig::default(),
        ColorSequence::new([ColorId(0)]),
        layout
            .iter()
            .map(|&(row, col, color)| (HexCoord::new(row, col), color)),
    )
    .unwrap();
    app.insert_resource(session);
    app
}

/// Advance the clock one frame and run the schedule.
fn frame(app: &mut App) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(20));
    app.update();
}

fn state(app: &App) -> SessionState {
    app.world().resource::<GameSession>().state()
}

fn run_until_aiming_or_over(app: &mut App) {
    for _ in 0..500 {
        frame(app);
        if state(app) != SessionState::Shooting {
            return;
        }
    }
    panic!("shot never finished");
}

#[test]
fn plugin_starts_a_standard_game() {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(BubbleShooterPlugin {
        seed: Some(1),
        ..Default::default()
    });
    app.update();

    let session = app.world().resource::<GameSession>();
    assert_eq!(session.grid().len(), 75);
    assert_eq!(session.state(), SessionState::Aiming);
    assert!(app.world().resource::<Leaderboard>().entries.is_empty());
}

#[test]
#[should_panic(expected = "invalid bubble shooter configuration")]
fn plugin_rejects_invalid_config() {
    let mut app = App::new();
    app.add_plugins(BubbleShooterPlugin {
        config: GameConfig {
            palette: Vec::new(),
            ..Default::default()
        },
        ..Default::default()
    });
}

#[test]
fn clearing_shot_reports_and_submits_the_score() {
    let mut app = app_with(&[(0, 9, ColorId(0)), (0, 10, ColorId(0)), (1, 9, ColorId(0))]);
    app.world_mut().resource_mut::<PlayerProfile>().name = "ada".to_string();

    app.world_mut().write_message(FireShot { angle: 0.0 });
    run_until_aiming_or_over(&mut app);

    assert_eq!(state(&app), SessionState::GameOver(GameOutcome::Cleared));
    let observed = app.world().resource::<Observed>();
    assert_eq!(observed.popped, [4]);
    assert_eq!(observed.ended, [(GameOutcome::Cleared, 40)]);

    let board = app.world().resource::<Leaderboard>();
    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].player_name, "ada");
    assert_eq!(board.entries[0].score, 40);
    assert_eq!(board.entries[0].level, 1);
}

#[test]
fn zero_score_games_are_not_submitted() {
    let column: Vec<(i32, i32, ColorId)> = (0..=15).map(|row| (row, 0, ColorId(1))).collect();
    let mut app = app_with(&column);

    app.world_mut().write_message(FireShot { angle: 0.0 });
    run_until_aiming_or_over(&mut app);

    assert_eq!(state(&app), SessionState::GameOver(GameOutcome::Overflow));
    assert_eq!(app.world().resource::<Observed>().ended, [(GameOutcome::Overflow, 0)]);
    assert!(app.world().resource::<Leaderboard>().entries.is_empty());
}

#[test]
fn aim_miss_and_reset_messages() {
    let mut app = app_with(&[(0, 0, ColorId(1))]);

    app.world_mut().write_message(AimShooter { angle: 0.5 });
    frame(&mut app);
    assert_eq!(app.world().resource::<GameSession>().shooter().angle, 0.5);

    app.world_mut().write_message(FireShot { angle: std::f32::consts::PI });
    run_until_aiming_or_over(&mut app);
    assert_eq!(state(&app), SessionState::Aiming);
    assert_eq!(app.world().resource::<Observed>().missed, 1);
    assert_eq!(app.world().resource::<GameSession>().shooter().x, 600.0);

    app.world_mut().write_message(ResetSession);
    frame(&mut app);
    let session = app.world().resource::<GameSession>();
    assert_eq!(session.grid().len(), 75);
    assert_eq!(session.shooter().x, 400.0);
    assert_eq!(session.score().shots_fired, 0);
}
