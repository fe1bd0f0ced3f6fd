//! Pipe pair spawning.
//!
//! The gap offset is drawn from `[base - h/4 - h/2, base - h/4]`, so gap
//! centres only ever land in the upper three quarters of a pipe's travel.
//! That lean toward the top of the screen is the intended difficulty shape.

use rand::Rng;

use crate::types::{
    ImageId, Obstacle, Obstacles, PIPE_BASE_Y, PIPE_GAP, PIPE_HEIGHT, PIPE_SPAWN_X,
};

/// Vertical offset of the top pipe for a uniform draw in `[0, 1)`.
pub fn gap_offset(draw: f64) -> f64 {
    PIPE_BASE_Y - PIPE_HEIGHT / 4.0 - draw * (PIPE_HEIGHT / 2.0)
}

/// Top and bottom pipes for a given top offset, both unpassed.
pub fn pipe_pair(offset: f64) -> [Obstacle; 2] {
    [
        Obstacle::new(ImageId::TopPipe, PIPE_SPAWN_X, offset),
        Obstacle::new(
            ImageId::BottomPipe,
            PIPE_SPAWN_X,
            offset + PIPE_HEIGHT + PIPE_GAP,
        ),
    ]
}

/// Append a freshly randomized pair to the back of the queue.
pub fn spawn_pair<R: Rng>(obstacles: &mut Obstacles, rng: &mut R) {
    let offset = gap_offset(rng.gen_range(0.0..1.0));
    obstacles.extend(pipe_pair(offset));
    log::trace!("spawned pipe pair at offset {offset:.1}, {} live", obstacles.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn offset_for_midpoint_draw() {
        assert_eq!(gap_offset(0.5), -256.0);
    }

    #[test]
    fn offset_range_spans_upper_three_quarters() {
        assert_eq!(gap_offset(0.0), -128.0);
        assert!(gap_offset(0.999_999) > -384.0);
        assert!(gap_offset(0.999_999) < -383.0);
    }

    #[test]
    fn bottom_pipe_sits_below_gap() {
        let [top, bottom] = pipe_pair(-256.0);
        assert_eq!(top.y, -256.0);
        assert_eq!(bottom.y, 416.0);
        assert_eq!(top.image, ImageId::TopPipe);
        assert_eq!(bottom.image, ImageId::BottomPipe);
    }

    #[test]
    fn spawned_pairs_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut obstacles = Obstacles::new();
        for _ in 0..50 {
            spawn_pair(&mut obstacles, &mut rng);
        }
        assert_eq!(obstacles.len(), 100);
        for pair in obstacles.make_contiguous().chunks(2) {
            let (top, bottom) = (&pair[0], &pair[1]);
            assert_eq!(top.x, bottom.x);
            assert_eq!(top.x, PIPE_SPAWN_X);
            assert!((bottom.y - top.y - (PIPE_HEIGHT + PIPE_GAP)).abs() < 1e-9);
            assert!(!top.passed && !bottom.passed);
            assert!(top.y <= -128.0 && top.y > -384.0);
        }
    }

    #[test]
    fn spawning_appends_to_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut obstacles = Obstacles::new();
        spawn_pair(&mut obstacles, &mut rng);
        obstacles[0].x = 10.0;
        obstacles[1].x = 10.0;
        spawn_pair(&mut obstacles, &mut rng);
        assert_eq!(obstacles[0].x, 10.0);
        assert_eq!(obstacles[2].x, PIPE_SPAWN_X);
    }
}
