//! Play-field constants and the entities that live in it.

use std::collections::VecDeque;

use crate::geometry::Rect;

// ── Play-field ──────────────────────────────────────────────────────────────

/// Logical play-field size. All simulation math happens in these units.
pub const BOARD_WIDTH: f64 = 360.0;
pub const BOARD_HEIGHT: f64 = 640.0;

pub const BIRD_WIDTH: f64 = 60.0;
pub const BIRD_HEIGHT: f64 = 42.0;
pub const BIRD_START_X: f64 = BOARD_WIDTH / 8.0;
pub const BIRD_START_Y: f64 = BOARD_HEIGHT / 2.0;

pub const PIPE_WIDTH: f64 = 64.0;
pub const PIPE_HEIGHT: f64 = 512.0;
/// Pipes enter just off the right edge.
pub const PIPE_SPAWN_X: f64 = BOARD_WIDTH;
/// Baseline the random gap offset is measured from.
pub const PIPE_BASE_Y: f64 = 0.0;
pub const PIPE_GAP: f64 = BOARD_HEIGHT / 4.0;

/// Each obstacle is worth half a point, so a cleared pair is worth one.
pub const PASS_REWARD: f64 = 0.5;

/// Key the best score is stored under.
pub const HIGH_SCORE_KEY: &str = "flappy_highscore";

// ── Tuning ──────────────────────────────────────────────────────────────────

/// Per-tick physics constants, expressed for one nominal frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Downward acceleration added to the bird's velocity every tick.
    pub gravity: f64,
    /// Velocity the bird is snapped to on a flap (negative is up).
    pub flap_velocity: f64,
    /// Leftward distance every pipe travels per tick.
    pub scroll_speed: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.4,
            flap_velocity: -6.0,
            scroll_speed: 2.0,
        }
    }
}

// ── Entities ────────────────────────────────────────────────────────────────

/// Handle to one of the images the presentation layer knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageId {
    Bird,
    TopPipe,
    BottomPipe,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Vertical velocity in units per tick (positive = downward).
    pub vy: f64,
}

impl Bird {
    pub fn new() -> Self {
        Self {
            x: BIRD_START_X,
            y: BIRD_START_Y,
            w: BIRD_WIDTH,
            h: BIRD_HEIGHT,
            vy: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

/// One half of a pipe pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub image: ImageId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Set once the bird has fully cleared this obstacle.
    pub passed: bool,
}

impl Obstacle {
    pub fn new(image: ImageId, x: f64, y: f64) -> Self {
        Self {
            image,
            x,
            y,
            w: PIPE_WIDTH,
            h: PIPE_HEIGHT,
            passed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Obstacles in spawn order, which is also left-to-right screen order.
pub type Obstacles = VecDeque<Obstacle>;
