//! Random-restart execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::config::RestartConfig;
use crate::cube::CubeState;
use crate::error::SearchResult;
use crate::hc::HcRunner;
use crate::random::seeded_or_random;
use crate::recorder::RunRecorder;
use crate::trace::{SearchStats, TracePoint};

/// Result of a random-restart run.
#[derive(Debug, Clone)]
pub struct RestartResult {
    /// Best final state across all climbs.
    pub best: CubeState,

    /// Score of the best state under the run's scoring mode.
    pub best_score: f64,

    /// Climbs actually performed (≤ the restart budget).
    pub restarts: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Concatenated climb traces with a run-global iteration index.
    pub trace: Vec<TracePoint>,

    /// Elapsed time, total iterations, and restart count.
    pub stats: SearchStats,
}

/// Executes random-restart hill climbing.
pub struct RestartRunner;

impl RestartRunner {
    /// Runs restarts of the inner climb, starting from `initial`.
    pub fn run(initial: CubeState, config: &RestartConfig) -> SearchResult<RestartResult> {
        Self::run_with(initial, config, None, None)
    }

    /// Runs with an optional cancellation token and recorder.
    pub fn run_with(
        initial: CubeState,
        config: &RestartConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut recorder: Option<&mut RunRecorder>,
    ) -> SearchResult<RestartResult> {
        config.validate()?;
        let start = Instant::now();
        let mut rng = seeded_or_random(config.seed);
        let size = initial.size();

        // Seed the best with the caller's state so cancellation before
        // the first climb still returns something meaningful.
        let initial_score = config.climb.scoring.evaluate(&initial);
        let mut best: Option<(CubeState, f64)> = Some((initial.clone(), initial_score));
        let mut trace: Vec<TracePoint> = Vec::new();
        let mut total_iterations = 0usize;
        let mut restarts = 0usize;
        let mut cancelled = false;
        let mut next_start = Some(initial);

        while restarts < config.max_restarts {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let climb_start = match next_start.take() {
                Some(state) => state,
                None => CubeState::random(size, &mut rng)?,
            };
            let climb = HcRunner::run_core(
                climb_start,
                &config.climb,
                &mut rng,
                cancel.clone(),
                recorder.as_deref_mut(),
            );
            restarts += 1;

            // Re-index the climb's trace into the run-global timeline.
            trace.extend(climb.trace.iter().map(|point| TracePoint {
                iteration: total_iterations + point.iteration,
                ..*point
            }));
            total_iterations += climb.stats.iterations;
            cancelled = climb.cancelled;

            let improved = best
                .as_ref()
                .is_none_or(|(_, score)| climb.best_score > *score);
            if improved {
                best = Some((climb.best, climb.best_score));
            }

            if cancelled {
                break;
            }
            if best.as_ref().is_some_and(|(state, _)| state.is_perfect()) {
                break;
            }
        }

        let (best, best_score) = best.expect("seeded with the initial state");
        Ok(RestartResult {
            best,
            best_score,
            restarts,
            cancelled,
            trace,
            stats: SearchStats {
                elapsed: start.elapsed(),
                iterations: total_iterations,
                restarts,
                generations: 0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::hc::{ClimbVariant, HcConfig, Neighborhood};
    use crate::random::create_rng;

    fn start_state(seed: u64, size: usize) -> CubeState {
        let mut rng = create_rng(seed);
        CubeState::random(size, &mut rng).unwrap()
    }

    fn small_climb() -> HcConfig {
        HcConfig::default()
            .with_neighborhood(Neighborhood::Sampled(30))
            .with_max_iterations(40)
    }

    #[test]
    fn test_invalid_budget_fails_fast() {
        let config = RestartConfig::default().with_max_restarts(0);
        let err = RestartRunner::run(start_state(1, 3), &config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_performs_configured_restarts() {
        let config = RestartConfig::default()
            .with_max_restarts(4)
            .with_climb(small_climb())
            .with_seed(42);
        let result = RestartRunner::run(start_state(42, 3), &config).unwrap();
        // 3-cubes are effectively never solved by short climbs, so the
        // whole budget is consumed.
        assert_eq!(result.restarts, 4);
        assert_eq!(result.stats.restarts, 4);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_best_across_restarts_dominates_each_climb() {
        let config = RestartConfig::default()
            .with_max_restarts(5)
            .with_climb(small_climb())
            .with_seed(7);
        let initial = start_state(7, 3);
        let initial_score = initial.score() as f64;
        let result = RestartRunner::run(initial, &config).unwrap();
        assert!(result.best_score >= initial_score);
        // The reported best matches the best point seen in the trace.
        let trace_max = result
            .trace
            .iter()
            .map(|p| p.score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.best_score, trace_max);
    }

    #[test]
    fn test_global_trace_indices_increase() {
        let config = RestartConfig::default()
            .with_max_restarts(3)
            .with_climb(
                small_climb().with_variant(ClimbVariant::Sideways { max_sideways: 3 }),
            )
            .with_seed(9);
        let result = RestartRunner::run(start_state(9, 3), &config).unwrap();
        for window in result.trace.windows(2) {
            assert!(
                window[1].iteration >= window[0].iteration,
                "global trace indices must be chronological"
            );
        }
    }

    #[test]
    fn test_cancellation_before_first_climb() {
        let cancel = Arc::new(AtomicBool::new(true));
        let config = RestartConfig::default()
            .with_max_restarts(5)
            .with_climb(small_climb())
            .with_seed(4);
        let result =
            RestartRunner::run_with(start_state(4, 3), &config, Some(cancel), None).unwrap();
        assert!(result.cancelled);
        assert!(result.restarts <= 1);
    }

    #[test]
    fn test_recorder_spans_all_restarts() {
        let mut recorder = RunRecorder::new();
        let config = RestartConfig::default()
            .with_max_restarts(3)
            .with_climb(small_climb())
            .with_seed(11);
        let result =
            RestartRunner::run_with(start_state(11, 3), &config, None, Some(&mut recorder))
                .unwrap();
        assert_eq!(recorder.len(), result.trace.len());
    }
}
