//! The game state machine and the session state it owns.
//!
//! Everything the frame loop, the spawn timer and the input handlers touch
//! lives in [`Game`]. Physics, spawning and collision are free functions that
//! borrow the pieces they need.

use rand::rngs::StdRng;

use crate::audio::Sound;
use crate::physics;
use crate::spawner;
use crate::storage::HighScoreStore;
use crate::types::{BOARD_HEIGHT, Bird, Obstacles, Tuning};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first input. Nothing moves.
    NotStarted,
    Playing,
    /// Frozen. `handled` is set once the entry actions have run.
    GameOver { handled: bool },
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crash {
    FellOut,
    HitPipe,
}

/// The game's outside collaborators.
pub struct Collaborators {
    pub music: Box<dyn Sound>,
    pub impact: Box<dyn Sound>,
    pub store: Box<dyn HighScoreStore>,
}

/// Read-only view handed to the presentation layer each frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub bird: &'a Bird,
    pub obstacles: &'a Obstacles,
    pub score: u32,
    pub high_score: u32,
}

pub struct Game {
    pub phase: Phase,
    pub bird: Bird,
    pub obstacles: Obstacles,
    /// Half-point accumulator; see [`Game::score`] for the shown value.
    pub score: f64,
    pub high_score: u32,
    pub tuning: Tuning,
    rng: StdRng,
    music: Box<dyn Sound>,
    impact: Box<dyn Sound>,
    store: Box<dyn HighScoreStore>,
}

/// Audio and storage failures never stop the game.
fn shrug<T>(result: anyhow::Result<T>, what: &str) -> Option<T> {
    result
        .map_err(|err| log::warn!("{what} failed: {err:#}"))
        .ok()
}

impl Game {
    pub fn new(tuning: Tuning, rng: StdRng, collaborators: Collaborators) -> Self {
        let Collaborators {
            music,
            impact,
            store,
        } = collaborators;
        let high_score = shrug(store.load(), "loading high score").unwrap_or(0);
        log::info!("starting session, high score {high_score}");

        Self {
            phase: Phase::NotStarted,
            bird: Bird::new(),
            obstacles: Obstacles::new(),
            score: 0.0,
            high_score,
            tuning,
            rng,
            music,
            impact,
            store,
        }
    }

    /// Whole points earned this run.
    pub fn score(&self) -> u32 {
        self.score.floor() as u32
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            bird: &self.bird,
            obstacles: &self.obstacles,
            score: self.score(),
            high_score: self.high_score,
        }
    }

    /// The single action every pointer, touch and key input maps to.
    ///
    /// Starts the game, flaps, or (after a crash) flaps and then resets. The
    /// reset puts the bird back at rest, so that flap only ever lasts until
    /// the reset overwrites it.
    pub fn impulse_or_advance(&mut self) {
        if self.phase == Phase::NotStarted {
            self.start();
        }
        physics::flap(&mut self.bird, &self.tuning);
        if matches!(self.phase, Phase::GameOver { .. }) {
            self.reset();
        }
    }

    fn start(&mut self) {
        log::info!("game started");
        self.phase = Phase::Playing;
        shrug(self.music.play(), "starting music");
    }

    /// Put everything back for a fresh run and go straight to `Playing`.
    pub fn reset(&mut self) {
        log::info!("reset after scoring {}", self.score());
        self.bird = Bird::new();
        self.obstacles.clear();
        self.score = 0.0;

        self.impact.pause();
        shrug(self.impact.rewind(), "rewinding impact");

        self.phase = Phase::Playing;
        shrug(self.music.rewind(), "rewinding music");
        shrug(self.music.play(), "restarting music");
    }

    /// Advance one frame. `dt` is in nominal frames; hosts without frame
    /// compensation always pass `1.0`.
    pub fn tick(&mut self, dt: f64) {
        if self.phase == Phase::Playing {
            if let Some(crash) = self.step(dt) {
                log::info!("crashed ({crash:?}) with score {}", self.score());
                self.phase = Phase::GameOver { handled: false };
            }
        }

        if self.phase == (Phase::GameOver { handled: false }) {
            self.enter_game_over();
        }
    }

    /// One physics step. The whole step runs even when the bird falls out;
    /// the crash takes effect afterwards.
    fn step(&mut self, dt: f64) -> Option<Crash> {
        physics::integrate_bird(&mut self.bird, &self.tuning, dt);
        let fell = physics::fell_out(&self.bird, BOARD_HEIGHT);

        let (points, hit) =
            physics::advance_obstacles(&mut self.obstacles, &self.bird, &self.tuning, dt);
        self.score += points;

        physics::retire_obstacles(&mut self.obstacles);

        match (fell, hit) {
            (true, _) => Some(Crash::FellOut),
            (_, true) => Some(Crash::HitPipe),
            _ => None,
        }
    }

    fn enter_game_over(&mut self) {
        if !self.music.is_paused() {
            self.music.pause();
        }
        if shrug(self.impact.rewind(), "rewinding impact").is_some() {
            shrug(self.impact.play(), "playing impact");
        }

        let final_score = self.score();
        if final_score > self.high_score {
            log::info!("new high score {final_score} (was {})", self.high_score);
            self.high_score = final_score;
            shrug(self.store.save(final_score), "saving high score");
        }

        self.phase = Phase::GameOver { handled: true };
    }

    /// Driven by the wall-clock spawn timer. Does nothing after a crash.
    pub fn spawn_tick(&mut self) {
        if matches!(self.phase, Phase::GameOver { .. }) {
            return;
        }
        spawner::spawn_pair(&mut self.obstacles, &mut self.rng);
    }
}
