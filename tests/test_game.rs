mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flappy_term::game::Phase;
use flappy_term::spawner::pipe_pair;
use flappy_term::types::*;

use common::{Options, default_harness, harness};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// A pipe sitting right on top of the bird's start position.
fn blocking_pipe() -> Obstacle {
    Obstacle::new(ImageId::BottomPipe, 50.0, 300.0)
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn fresh_game_waits_for_input() {
    let h = default_harness();
    assert_eq!(h.game.phase, Phase::NotStarted);
    assert_eq!(h.game.bird, Bird::new());
    assert!(h.game.obstacles.is_empty());
    assert_eq!(h.game.score(), 0);
    assert!(h.journal.entries().is_empty());
}

#[test]
fn stored_high_score_is_loaded() {
    let h = harness(Options {
        stored: Some(17),
        ..Options::default()
    });
    assert_eq!(h.game.high_score, 17);
}

#[test]
fn unreadable_store_means_zero() {
    let h = harness(Options {
        broken_store: true,
        ..Options::default()
    });
    assert_eq!(h.game.high_score, 0);
}

#[test]
fn first_input_starts_music_and_flaps() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    assert_eq!(h.game.phase, Phase::Playing);
    assert_eq!(h.game.bird.vy, -6.0);
    assert_eq!(h.journal.entries(), ["music.play"]);
}

#[test]
fn blocked_music_does_not_stop_the_game() {
    let mut h = harness(Options {
        reject_play: true,
        ..Options::default()
    });
    h.game.impulse_or_advance();
    assert_eq!(h.game.phase, Phase::Playing);
    h.game.tick(1.0);
    assert_eq!(h.game.phase, Phase::Playing);
}

#[test]
fn ticks_before_start_change_nothing() {
    let mut h = default_harness();
    for _ in 0..10 {
        h.game.tick(1.0);
    }
    assert_eq!(h.game.bird, Bird::new());
    assert_eq!(h.game.phase, Phase::NotStarted);
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn one_tick_from_rest() {
    let mut h = default_harness();
    h.game.phase = Phase::Playing;
    h.game.tick(1.0);
    assert!(close(h.game.bird.vy, 0.4));
    assert!(close(h.game.bird.y, 320.4));
}

#[test]
fn flap_overrides_velocity() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.bird.vy = 3.2;
    h.game.impulse_or_advance();
    assert_eq!(h.game.bird.vy, -6.0);
    assert_eq!(h.game.phase, Phase::Playing);
}

#[test]
fn ceiling_clamps_but_keeps_velocity() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.bird.y = 2.0;
    h.game.tick(1.0);
    assert_eq!(h.game.bird.y, 0.0);
    assert!(close(h.game.bird.vy, -5.6));
    assert_eq!(h.game.phase, Phase::Playing);
}

#[test]
fn clearing_a_pair_scores_one_point() {
    let mut h = harness(Options {
        tuning: Tuning {
            gravity: 0.0,
            ..Tuning::default()
        },
        ..Options::default()
    });
    h.game.phase = Phase::Playing;
    // Gap spans 256..416, the bird sits at 320..362.
    h.game.obstacles.extend(pipe_pair(-256.0));

    for _ in 0..189 {
        h.game.tick(1.0);
    }
    assert_eq!(h.game.score(), 0);
    h.game.tick(1.0);
    assert_eq!(h.game.score, 1.0);
    assert_eq!(h.game.phase, Phase::Playing);

    for _ in 0..30 {
        h.game.tick(1.0);
    }
    assert!(h.game.obstacles.is_empty());
    assert_eq!(h.game.score(), 1);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn hitting_a_pipe_ends_the_run() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(h.game.phase, Phase::GameOver { handled: true });
}

#[test]
fn falling_out_ends_the_run() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    for _ in 0..500 {
        h.game.tick(1.0);
        if h.game.phase != Phase::Playing {
            break;
        }
    }
    assert_eq!(h.game.phase, Phase::GameOver { handled: true });
    assert!(h.game.bird.y > BOARD_HEIGHT);
}

#[test]
fn entry_actions_run_exactly_once() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.journal.take();

    h.game.score = 3.0;
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(
        h.journal.take(),
        ["music.pause", "impact.rewind", "impact.play", "store.save 3"]
    );
    assert_eq!(h.game.high_score, 3);

    let frozen = h.game.bird.clone();
    for _ in 0..20 {
        h.game.tick(1.0);
    }
    assert!(h.journal.entries().is_empty());
    assert_eq!(h.game.bird, frozen);
}

#[test]
fn lower_score_leaves_high_score_alone() {
    let mut h = harness(Options {
        stored: Some(5),
        ..Options::default()
    });
    h.game.impulse_or_advance();
    h.game.score = 4.5;
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(h.game.high_score, 5);
    assert_eq!(h.journal.count("store.save 4"), 0);
}

#[test]
fn half_point_is_not_a_new_high_score() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.score = 0.5;
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(h.game.high_score, 0);
    assert!(!h.journal.entries().iter().any(|e| e.starts_with("store.save")));
}

#[test]
fn failed_save_is_not_fatal() {
    let mut h = harness(Options {
        broken_store: true,
        ..Options::default()
    });
    h.game.impulse_or_advance();
    h.game.score = 2.0;
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(h.journal.count("store.save 2"), 1);
    assert_eq!(h.game.phase, Phase::GameOver { handled: true });
    assert_eq!(h.game.high_score, 2);
}

#[test]
fn no_spawning_after_a_crash() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    h.game.spawn_tick();
    h.game.spawn_tick();
    assert_eq!(h.game.obstacles.len(), 1);
}

#[test]
fn pipes_stay_put_after_a_crash() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.spawn_tick();
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(h.game.phase, Phase::GameOver { handled: true });

    let frozen: Vec<(f64, bool)> = h.game.obstacles.iter().map(|o| (o.x, o.passed)).collect();
    for _ in 0..20 {
        h.game.tick(1.0);
    }
    let now: Vec<(f64, bool)> = h.game.obstacles.iter().map(|o| (o.x, o.passed)).collect();
    assert_eq!(now, frozen);
}

#[test]
fn pipes_queued_before_start_do_not_scroll() {
    let mut h = default_harness();
    h.game.spawn_tick();
    assert_eq!(h.game.obstacles.len(), 2);
    for _ in 0..5 {
        h.game.tick(1.0);
    }
    assert_eq!(h.game.phase, Phase::NotStarted);
    assert!(h.game.obstacles.iter().all(|o| o.x == PIPE_SPAWN_X && !o.passed));
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[test]
fn input_after_crash_resets_everything() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.spawn_tick();
    h.game.score = 1.5;
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    h.journal.take();

    h.game.impulse_or_advance();
    assert_eq!(h.game.phase, Phase::Playing);
    assert_eq!(h.game.bird, Bird::new());
    assert!(h.game.obstacles.is_empty());
    assert_eq!(h.game.score, 0.0);
    assert_eq!(h.game.high_score, 1);
    assert_eq!(
        h.journal.take(),
        ["impact.pause", "impact.rewind", "music.rewind", "music.play"]
    );
}

#[test]
fn next_run_can_crash_again() {
    let mut h = default_harness();
    h.game.impulse_or_advance();
    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    h.game.impulse_or_advance();
    h.journal.take();

    h.game.obstacles.push_back(blocking_pipe());
    h.game.tick(1.0);
    assert_eq!(h.game.phase, Phase::GameOver { handled: true });
    assert_eq!(h.journal.count("impact.play"), 1);
}

// ── Invariants over a long random session ─────────────────────────────────────

#[test]
fn random_session_keeps_invariants() {
    let mut h = harness(Options {
        seed: 7,
        ..Options::default()
    });
    let mut pilot = StdRng::seed_from_u64(11);
    h.game.impulse_or_advance();

    for frame in 0..6000 {
        if frame % 90 == 0 {
            let before = h.game.obstacles.len();
            h.game.spawn_tick();
            if h.game.obstacles.len() == before + 2 {
                let top = &h.game.obstacles[before];
                let bottom = &h.game.obstacles[before + 1];
                assert_eq!(top.image, ImageId::TopPipe);
                assert_eq!(bottom.image, ImageId::BottomPipe);
                assert_eq!(top.x, bottom.x);
                assert_eq!(bottom.y - top.y, PIPE_HEIGHT + PIPE_GAP);
                assert!(top.y <= -PIPE_HEIGHT / 4.0);
                assert!(top.y > -PIPE_HEIGHT * 3.0 / 4.0);
            }
        }
        if pilot.gen_range(0..12) == 0 {
            h.game.impulse_or_advance();
        }

        let was_playing = h.game.phase == Phase::Playing;
        let score_before = h.game.score;
        let len_before = h.game.obstacles.len();
        let passed_before = h.game.obstacles.iter().filter(|o| o.passed).count();

        h.game.tick(1.0);

        assert!(h.game.bird.y >= 0.0);
        assert!(h.game.score >= score_before);
        assert!(h.game.obstacles.iter().all(|o| o.x >= -o.w));
        assert!(h.game.obstacles.iter().all(|o| !o.passed || o.x + o.w < h.game.bird.x));

        if was_playing {
            let retired = len_before - h.game.obstacles.len();
            let passed_after = h.game.obstacles.iter().filter(|o| o.passed).count();
            let newly = passed_after + retired - passed_before;
            assert_eq!(h.game.score - score_before, newly as f64 * PASS_REWARD);
        } else {
            assert_eq!(h.game.obstacles.len(), len_before);
        }

        if let Phase::GameOver { handled } = h.game.phase {
            assert!(handled);
            assert!(h.game.high_score >= h.game.score());
        }
    }
}
