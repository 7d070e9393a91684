//! `ProgressSource` implementations.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use meeshoguard_core::ProgressSource;
use meeshoguard_core::upload::Phase;

/// Uniformly random increments and result counts.
pub struct RandomProgressSource {
    rng: Mutex<StdRng>,
}

impl RandomProgressSource {
    /// Seed from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomProgressSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSource for RandomProgressSource {
    fn next_increment(&self, _phase: Phase, ceiling: f64) -> f64 {
        if !(ceiling > 0.0 && ceiling.is_finite()) {
            return 0.0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0.0..ceiling)
    }

    fn result_count(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(min..=max)
    }
}

/// Replays a fixed list of increments, then repeats a fallback step.
///
/// Increments are shared across phases and entries in call order. The
/// result count is clamped into the requested range.
pub struct SequenceProgressSource {
    increments: Mutex<VecDeque<f64>>,
    fallback: f64,
    result_count: u32,
}

impl SequenceProgressSource {
    /// Replay `increments`, then keep returning `fallback`.
    pub fn new(increments: impl IntoIterator<Item = f64>, fallback: f64, result_count: u32) -> Self {
        Self {
            increments: Mutex::new(increments.into_iter().collect()),
            fallback,
            result_count,
        }
    }

    /// Always return the same step.
    pub fn constant(step: f64, result_count: u32) -> Self {
        Self::new(std::iter::empty(), step, result_count)
    }
}

impl ProgressSource for SequenceProgressSource {
    fn next_increment(&self, _phase: Phase, _ceiling: f64) -> f64 {
        self.increments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback)
    }

    fn result_count(&self, min: u32, max: u32) -> u32 {
        self.result_count.clamp(min, max.max(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_increment_in_range() {
        let source = RandomProgressSource::seeded(42);
        for _ in 0..500 {
            let inc = source.next_increment(Phase::Upload, 20.0);
            assert!((0.0..20.0).contains(&inc));
        }
    }

    #[test]
    fn test_random_result_count_in_range() {
        let source = RandomProgressSource::seeded(7);
        for _ in 0..500 {
            let count = source.result_count(5, 24);
            assert!((5..=24).contains(&count));
        }
    }

    #[test]
    fn test_seeded_sources_agree() {
        let a = RandomProgressSource::seeded(99);
        let b = RandomProgressSource::seeded(99);
        for _ in 0..20 {
            let x = a.next_increment(Phase::Processing, 15.0);
            let y = b.next_increment(Phase::Processing, 15.0);
            assert!((x - y).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_degenerate_ranges() {
        let source = RandomProgressSource::seeded(1);
        assert!(source.next_increment(Phase::Upload, 0.0).abs() < f64::EPSILON);
        assert_eq!(source.result_count(8, 8), 8);
    }

    #[test]
    fn test_sequence_replays_then_falls_back() {
        let source = SequenceProgressSource::new([10.0, 30.0], 5.0, 12);
        assert!((source.next_increment(Phase::Upload, 20.0) - 10.0).abs() < f64::EPSILON);
        assert!((source.next_increment(Phase::Upload, 20.0) - 30.0).abs() < f64::EPSILON);
        assert!((source.next_increment(Phase::Processing, 15.0) - 5.0).abs() < f64::EPSILON);
        assert_eq!(source.result_count(5, 24), 12);
    }

    #[test]
    fn test_sequence_result_count_clamped() {
        assert_eq!(SequenceProgressSource::constant(1.0, 100).result_count(5, 24), 24);
        assert_eq!(SequenceProgressSource::constant(1.0, 0).result_count(5, 24), 5);
    }
}
