use rand::prelude::*;

use crate::sim::Job;

/// The five-process reference set used throughout the docs and tests:
/// P1(0, 6) P2(2, 4) P3(4, 2) P4(6, 8) P5(8, 3).
pub fn sample() -> Vec<Job> {
    vec![
        Job::new(0, 6),
        Job::new(2, 4),
        Job::new(4, 2),
        Job::new(6, 8),
        Job::new(8, 3),
    ]
}

/// `count` jobs with arrival in 0..=9 and burst in 1..=20, reproducible per seed.
pub fn random(count: usize, seed: u64) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Job::new(rng.random_range(0..10), rng.random_range(1..=20)))
        .collect()
}
