//! Per-tick integration, scoring and pipe retirement.
//!
//! `dt` is measured in nominal frames. The host passes `1.0` every frame
//! unless frame compensation is switched on, so by default simulation speed
//! follows the actual frame rate.

use crate::types::{Bird, Obstacles, PASS_REWARD, Tuning};

/// Apply gravity, then move the bird. The bird is pinned at the ceiling but
/// keeps its velocity, so it starts falling as soon as gravity wins.
pub fn integrate_bird(bird: &mut Bird, tuning: &Tuning, dt: f64) {
    bird.vy += tuning.gravity * dt;
    bird.y = (bird.y + bird.vy * dt).max(0.0);
}

/// Snap the bird's velocity to the flap velocity, whatever it was before.
pub fn flap(bird: &mut Bird, tuning: &Tuning) {
    bird.vy = tuning.flap_velocity;
}

/// True once the bird has dropped below the bottom of the play-field.
pub fn fell_out(bird: &Bird, board_height: f64) -> bool {
    bird.y > board_height
}

/// Scroll every pipe left, award points for newly cleared pipes and report
/// whether the bird hit any of them. Returns `(points, collided)`.
pub fn advance_obstacles(
    obstacles: &mut Obstacles,
    bird: &Bird,
    tuning: &Tuning,
    dt: f64,
) -> (f64, bool) {
    let bird_rect = bird.rect();
    let mut points = 0.0;
    let mut collided = false;

    for pipe in obstacles.iter_mut() {
        pipe.x -= tuning.scroll_speed * dt;

        if !pipe.passed && bird.x > pipe.x + pipe.w {
            pipe.passed = true;
            points += PASS_REWARD;
        }

        if bird_rect.overlaps(&pipe.rect()) {
            collided = true;
        }
    }

    (points, collided)
}

/// Drop pipes that have fully left the screen. Only the front is inspected:
/// spawn order is screen order, so nothing behind a live pipe can be gone.
pub fn retire_obstacles(obstacles: &mut Obstacles) -> usize {
    let mut retired = 0;
    while obstacles.front().is_some_and(|pipe| pipe.x < -pipe.w) {
        obstacles.pop_front();
        retired += 1;
    }
    retired
}
