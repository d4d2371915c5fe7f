//! Run traces and statistics shared by every strategy.

use std::time::Duration;

/// One accepted step of a run, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TracePoint {
    /// Outer-loop index at which the step was accepted (iteration,
    /// generation, or global iteration across restarts).
    pub iteration: usize,
    /// Best-so-far score after the step, under the run's scoring mode.
    pub score: f64,
    /// Temperature at the step; `Some` only for simulated annealing.
    pub temperature: Option<f64>,
}

impl TracePoint {
    pub(crate) fn new(iteration: usize, score: f64) -> Self {
        TracePoint {
            iteration,
            score,
            temperature: None,
        }
    }

    pub(crate) fn with_temperature(iteration: usize, score: f64, temperature: f64) -> Self {
        TracePoint {
            iteration,
            score,
            temperature: Some(temperature),
        }
    }
}

/// Wall-time and loop counts for one run.
///
/// Budget exhaustion and stagnation are reported here, never as errors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Elapsed wall-clock time of the run.
    pub elapsed: Duration,
    /// Total iterations (neighbor evaluations accepted or rejected).
    pub iterations: usize,
    /// Restarts performed; zero for non-restarting strategies.
    pub restarts: usize,
    /// Generations evolved; zero outside the genetic algorithm.
    pub generations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_point_constructors() {
        let p = TracePoint::new(3, 41.0);
        assert_eq!(p.iteration, 3);
        assert_eq!(p.temperature, None);

        let q = TracePoint::with_temperature(0, -1.5, 800.0);
        assert_eq!(q.temperature, Some(800.0));
    }

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = SearchStats::default();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.restarts, 0);
        assert_eq!(stats.generations, 0);
        assert_eq!(stats.elapsed, Duration::ZERO);
    }
}
