//! The game session - one owned state machine driving a whole game.
//!
//! `Aiming --fire--> Shooting --step--> (resolve) --> Aiming | GameOver`.
//!
//! Everything that changes game state happens inside [`GameSession::fire`],
//! [`GameSession::aim`], [`GameSession::tick`] or [`GameSession::reset`].
//! Renderers and input layers only ever see [`SessionSnapshot`]s.

use bevy::prelude::Resource;
use tracing::{debug, info};

use super::{
    bubble::{Bubble, ColorId, ColorSource},
    cluster,
    collision::{self, Contact},
    config::{ConfigError, GameConfig},
    grid::GridModel,
    hex::HexCoord,
    projectile::{Projectile, finite_angle},
    shooter::{BubbleQueue, Shooter, advance_turn},
    snapshot::SessionSnapshot,
    state::{GameOutcome, GameScore, SessionState, check_end},
};

/// Everything one landing changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The projectile as it settled on the grid.
    pub landed: Bubble,
    /// The matched cluster, including `landed` when it popped.
    pub popped: Vec<Bubble>,
    /// Bubbles that lost their path to row 0.
    pub dropped: Vec<Bubble>,
    /// Points scored by this landing.
    pub points: u32,
    /// Set when this landing finished the game.
    pub ended: Option<GameOutcome>,
}

/// What a call to [`GameSession::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing to simulate: not shooting, or not enough time for a step.
    Idle,
    /// The projectile moved and is still flying.
    InFlight,
    /// The projectile left through the bottom; the turn advanced.
    Missed,
    /// The projectile landed and the grid was resolved.
    Resolved(Resolution),
}

/// A single bubble shooter game.
#[derive(Resource)]
pub struct GameSession {
    config: GameConfig,
    colors: Box<dyn ColorSource>,
    grid: GridModel,
    projectile: Option<Projectile>,
    shooter: Shooter,
    queue: BubbleQueue,
    score: GameScore,
    state: SessionState,
    accumulated_ms: f32,
}

impl GameSession {
    /// Start a game with the standard population: the first `initial_rows`
    /// rows filled, colors drawn from `colors`.
    pub fn new(config: GameConfig, colors: impl ColorSource + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut colors: Box<dyn ColorSource> = Box::new(colors);
        let mut grid = GridModel::new(config.bubble_radius, config.width);
        grid.populate(
            config.initial_rows,
            config.columns,
            &config.palette,
            colors.as_mut(),
        );
        Ok(Self::assemble(config, colors, grid))
    }

    /// Start a game from an explicit set of cells instead of the random fill.
    ///
    /// Later cells for an already-listed coordinate are ignored, as are cells
    /// outside the playfield. [`GameSession::reset`] still restores the
    /// standard population.
    pub fn from_layout(
        config: GameConfig,
        colors: impl ColorSource + 'static,
        cells: impl IntoIterator<Item = (HexCoord, ColorId)>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let colors: Box<dyn ColorSource> = Box::new(colors);
        let mut grid = GridModel::new(config.bubble_radius, config.width);
        for (coord, color) in cells {
            if grid.in_bounds(coord) && grid.attach(coord, color).is_err() {
                debug!("Layout lists {} twice, keeping the first", coord);
            }
        }
        info!("Loaded layout with {} bubbles", grid.len());
        Ok(Self::assemble(config, colors, grid))
    }

    fn assemble(config: GameConfig, mut colors: Box<dyn ColorSource>, grid: GridModel) -> Self {
        let queue = BubbleQueue::new(&config.palette, colors.as_mut());
        let shooter = Shooter::new(config.width, config.shooter_y());
        info!(
            "Session ready: {} bubbles, {:?} loaded, {} next",
            grid.len(),
            queue.current,
            queue.next
        );
        Self {
            config,
            colors,
            grid,
            projectile: None,
            shooter,
            queue,
            score: GameScore::default(),
            state: SessionState::Aiming,
            accumulated_ms: 0.0,
        }
    }

    /// Point the shooter. Ignored unless aiming.
    pub fn aim(&mut self, angle: f32) {
        if self.state == SessionState::Aiming {
            self.shooter.angle = finite_angle(angle);
        }
    }

    /// Launch the loaded bubble at `angle` radians from straight up.
    ///
    /// Returns `false` and changes nothing unless the session is aiming.
    ///
    /// A shot at exactly +-pi/2 has a vertical speed too small to move it at
    /// playfield scale. It bounces between the walls and the session stays
    /// `Shooting` until [`GameSession::reset`]. Hosts that aim from pointer
    /// input should keep the angle strictly inside that range.
    pub fn fire(&mut self, angle: f32) -> bool {
        if self.state != SessionState::Aiming {
            return false;
        }
        let Some(color) = self.queue.take() else {
            return false;
        };

        self.shooter.angle = finite_angle(angle);
        let projectile = Projectile::launch(
            self.shooter.muzzle(self.config.muzzle_offset),
            self.shooter.angle,
            self.config.launch_speed,
            color,
        );
        self.projectile = Some(projectile);
        self.state = SessionState::Shooting;
        self.accumulated_ms = 0.0;
        self.score.shots_fired += 1;

        info!(
            "Fired {} bubble at angle {} (shot {})",
            color, self.shooter.angle, self.score.shots_fired
        );
        true
    }

    /// Advance the simulation by `dt_ms` milliseconds.
    ///
    /// Time is consumed in fixed steps of `step_ms`; leftover time carries to
    /// the next call. Non-positive or non-finite `dt_ms` does nothing.
    pub fn tick(&mut self, dt_ms: f32) -> TickOutcome {
        if !(dt_ms.is_finite() && dt_ms > 0.0) || self.state != SessionState::Shooting {
            return TickOutcome::Idle;
        }

        self.accumulated_ms += dt_ms;
        let mut outcome = TickOutcome::Idle;
        let mut steps = 0;
        while self.accumulated_ms >= self.config.step_ms {
            if steps == self.config.max_steps_per_tick {
                debug!("Dropping {}ms of simulation backlog", self.accumulated_ms);
                self.accumulated_ms = 0.0;
                break;
            }
            self.accumulated_ms -= self.config.step_ms;
            steps += 1;

            outcome = self.step();
            if !matches!(outcome, TickOutcome::InFlight) {
                self.accumulated_ms = 0.0;
                break;
            }
        }
        outcome
    }

    /// One fixed simulation step of the projectile.
    fn step(&mut self) -> TickOutcome {
        let Some(projectile) = self.projectile.as_mut() else {
            return TickOutcome::Idle;
        };

        let contact = collision::step(projectile, &self.grid, self.config.width, self.config.height);
        match contact {
            Contact::None => TickOutcome::InFlight,
            Contact::Escaped => {
                info!("Projectile left the playfield, no score");
                self.projectile = None;
                self.next_turn();
                self.state = SessionState::Aiming;
                TickOutcome::Missed
            }
            Contact::Bubble(_) | Contact::Ceiling => {
                let projectile = *projectile;
                self.projectile = None;
                TickOutcome::Resolved(self.resolve(contact, &projectile))
            }
        }
    }

    /// Attach, match, prune and advance the turn as one step.
    fn resolve(&mut self, contact: Contact, projectile: &Projectile) -> Resolution {
        let bubbles_before = self.grid.len() + 1;

        let cell = collision::attachment_cell(&self.grid, contact, projectile);
        let landed = match cell.map(|cell| self.grid.attach(cell, projectile.color)) {
            Some(Ok(bubble)) => bubble,
            Some(Err(err)) => panic!("attachment invariant violated: {err}"),
            None => panic!(
                "attachment invariant violated: no free cell near {:?}",
                projectile.position
            ),
        };
        info!("Bubble landed at {} with {}", landed.coord, landed.color);

        let popped = cluster::pop_matches(&mut self.grid, landed.coord);
        let dropped = if popped.is_empty() {
            Vec::new()
        } else {
            cluster::drop_floating(&mut self.grid)
        };
        let points = cluster::points_for(popped.len(), dropped.len());
        self.score.record(popped.len(), dropped.len(), points);
        debug_assert!(self.grid.len() <= bubbles_before);
        if points > 0 {
            info!("+{} points (total: {})", points, self.score.score);
        }

        self.next_turn();

        let ended = check_end(&self.grid, self.config.danger_line());
        self.state = match ended {
            Some(outcome) => {
                info!("Game over: {:?}. Final score: {}", outcome, self.score.score);
                SessionState::GameOver(outcome)
            }
            None => SessionState::Aiming,
        };

        Resolution {
            landed,
            popped,
            dropped,
            points,
            ended,
        }
    }

    fn next_turn(&mut self) {
        advance_turn(
            &mut self.queue,
            &mut self.shooter,
            &self.config.palette,
            self.colors.as_mut(),
            self.config.width,
            self.config.lateral_fractions,
        );
    }

    /// Start over: fresh standard population, zero score, default shooter and queue.
    pub fn reset(&mut self) {
        self.grid = GridModel::new(self.config.bubble_radius, self.config.width);
        self.grid.populate(
            self.config.initial_rows,
            self.config.columns,
            &self.config.palette,
            self.colors.as_mut(),
        );
        self.queue = BubbleQueue::new(&self.config.palette, self.colors.as_mut());
        self.shooter = Shooter::new(self.config.width, self.config.shooter_y());
        self.projectile = None;
        self.score.reset();
        self.state = SessionState::Aiming;
        self.accumulated_ms = 0.0;
        info!("Session reset");
    }

    /// Read-only copy of everything a renderer needs.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn shooter(&self) -> &Shooter {
        &self.shooter
    }

    pub fn queue(&self) -> &BubbleQueue {
        &self.queue
    }

    pub fn score(&self) -> &GameScore {
        &self.score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .field("bubbles", &self.grid.len())
            .field("projectile", &self.projectile)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}
