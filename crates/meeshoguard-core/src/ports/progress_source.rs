//! Progress source port.
//!
//! Supplies the random quantities the simulator needs. Swapping the source
//! lets tests replay exact increment sequences.

use crate::upload::Phase;

/// Produces progress increments and simulated result counts.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressSource: Send + Sync {
    /// Next increment for `phase`, in `[0, ceiling)`.
    fn next_increment(&self, phase: Phase, ceiling: f64) -> f64;

    /// Simulated number of extracted labels, in `[min, max]`.
    fn result_count(&self, min: u32, max: u32) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_mock_source_through_trait_object() {
        let mut source = MockProgressSource::new();
        source
            .expect_next_increment()
            .returning(|phase, ceiling| match phase {
                Phase::Upload => ceiling / 2.0,
                Phase::Processing => ceiling / 3.0,
            });
        source.expect_result_count().returning(|min, _| min);

        let source: Arc<dyn ProgressSource> = Arc::new(source);
        assert!((source.next_increment(Phase::Upload, 20.0) - 10.0).abs() < f64::EPSILON);
        assert!((source.next_increment(Phase::Processing, 15.0) - 5.0).abs() < f64::EPSILON);
        assert_eq!(source.result_count(5, 24), 5);
    }
}
