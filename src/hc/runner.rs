//! Hill-climbing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use super::config::{ClimbVariant, HcConfig, Neighborhood};
use crate::cube::{neighbor_pairs, random_pair, CubeState, ScoringMode};
use crate::error::SearchResult;
use crate::random::seeded_or_random;
use crate::recorder::RunRecorder;
use crate::trace::{SearchStats, TracePoint};

/// Result of one hill-climbing run.
#[derive(Debug, Clone)]
pub struct HcResult {
    /// Final state of the walk (also the best: HC never steps down).
    pub best: CubeState,

    /// Score of the final state under the run's scoring mode.
    pub best_score: f64,

    /// Total sideways (equal-scoring) accepts; zero outside the
    /// sideways variant.
    pub sideways_moves: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best score after the initial state and each accepted step.
    pub trace: Vec<TracePoint>,

    /// Elapsed time and iteration count.
    pub stats: SearchStats,
}

/// Executes the hill-climbing family.
pub struct HcRunner;

impl HcRunner {
    /// Runs hill climbing from `initial`.
    pub fn run(initial: CubeState, config: &HcConfig) -> SearchResult<HcResult> {
        Self::run_with(initial, config, None, None)
    }

    /// Runs hill climbing with an optional cancellation token and an
    /// optional recorder receiving every accepted state.
    pub fn run_with(
        initial: CubeState,
        config: &HcConfig,
        cancel: Option<Arc<AtomicBool>>,
        recorder: Option<&mut RunRecorder>,
    ) -> SearchResult<HcResult> {
        config.validate()?;
        let mut rng = seeded_or_random(config.seed);
        Ok(Self::run_core(initial, config, &mut rng, cancel, recorder))
    }

    /// Core loop over a caller-supplied RNG; the random-restart runner
    /// drives several climbs from one generator through this.
    pub(crate) fn run_core<R: Rng>(
        initial: CubeState,
        config: &HcConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
        mut recorder: Option<&mut RunRecorder>,
    ) -> HcResult {
        let start = Instant::now();

        let mut current = initial;
        let mut current_score = config.scoring.evaluate(&current);

        let mut trace = vec![TracePoint::new(0, current_score)];
        if let Some(rec) = recorder.as_deref_mut() {
            rec.record(0, &current, current_score, None);
        }

        let mut iterations = 0usize;
        let mut consecutive_sideways = 0usize;
        let mut total_sideways = 0usize;
        let mut cancelled = false;

        for iteration in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if current.is_perfect() {
                break;
            }

            let (neighbor, neighbor_score) = match config.variant {
                ClimbVariant::Stochastic => {
                    let (p1, p2) = random_pair(current.size(), rng);
                    let neighbor = current
                        .swapped(p1, p2)
                        .expect("random_pair draws in-bounds positions");
                    let score = config.scoring.evaluate(&neighbor);
                    (neighbor, score)
                }
                _ => best_neighbor(&current, config, rng),
            };
            iterations += 1;

            let accept = match config.variant {
                ClimbVariant::SteepestAscent | ClimbVariant::Stochastic => {
                    neighbor_score > current_score
                }
                ClimbVariant::Sideways { max_sideways } => {
                    if neighbor_score > current_score {
                        consecutive_sideways = 0;
                        true
                    } else if neighbor_score == current_score {
                        if consecutive_sideways >= max_sideways {
                            break;
                        }
                        consecutive_sideways += 1;
                        total_sideways += 1;
                        true
                    } else {
                        false
                    }
                }
            };

            if accept {
                current = neighbor;
                current_score = neighbor_score;
                trace.push(TracePoint::new(iteration + 1, current_score));
                if let Some(rec) = recorder.as_deref_mut() {
                    rec.record(iteration + 1, &current, current_score, None);
                }
            } else if !matches!(config.variant, ClimbVariant::Stochastic) {
                // Best neighbor is no better: a local optimum for the
                // best-of-neighborhood variants.
                break;
            }
        }

        HcResult {
            best_score: current_score,
            best: current,
            sideways_moves: total_sideways,
            cancelled,
            trace,
            stats: SearchStats {
                elapsed: start.elapsed(),
                iterations,
                restarts: 0,
                generations: 0,
            },
        }
    }
}

/// Best proposal under the configured neighborhood, ties broken by
/// enumeration (or sampling) order.
fn best_neighbor<R: Rng>(
    current: &CubeState,
    config: &HcConfig,
    rng: &mut R,
) -> (CubeState, f64) {
    match config.neighborhood {
        Neighborhood::Exhaustive => best_of_exhaustive(current, config.scoring, config.parallel),
        Neighborhood::Sampled(k) => {
            let mut best: Option<(CubeState, f64)> = None;
            for _ in 0..k {
                let (p1, p2) = random_pair(current.size(), rng);
                let neighbor = current
                    .swapped(p1, p2)
                    .expect("random_pair draws in-bounds positions");
                let score = config.scoring.evaluate(&neighbor);
                if best.as_ref().is_none_or(|(_, b)| score > *b) {
                    best = Some((neighbor, score));
                }
            }
            best.expect("sampled neighborhood size validated to be >= 1")
        }
    }
}

fn best_of_exhaustive(current: &CubeState, scoring: ScoringMode, parallel: bool) -> (CubeState, f64) {
    #[cfg(feature = "parallel")]
    if parallel {
        return best_of_exhaustive_parallel(current, scoring);
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut best: Option<(CubeState, f64)> = None;
    for (p1, p2) in neighbor_pairs(current.size()) {
        let neighbor = current
            .swapped(p1, p2)
            .expect("neighbor_pairs yields in-bounds positions");
        let score = scoring.evaluate(&neighbor);
        if best.as_ref().is_none_or(|(_, b)| score > *b) {
            best = Some((neighbor, score));
        }
    }
    best.expect("a cube of size >= 1 has at least one swap pair")
}

/// Parallel exhaustive scan, reduced by (score, enumeration index) so
/// the winner matches the sequential scan exactly.
#[cfg(feature = "parallel")]
fn best_of_exhaustive_parallel(current: &CubeState, scoring: ScoringMode) -> (CubeState, f64) {
    use rayon::prelude::*;

    let pairs: Vec<_> = neighbor_pairs(current.size()).collect();
    let (score, _, neighbor) = pairs
        .par_iter()
        .enumerate()
        .map(|(index, &(p1, p2))| {
            let neighbor = current
                .swapped(p1, p2)
                .expect("neighbor_pairs yields in-bounds positions");
            let score = scoring.evaluate(&neighbor);
            (score, index, neighbor)
        })
        .reduce_with(|a, b| {
            if b.0 > a.0 || (b.0 == a.0 && b.1 < a.1) {
                b
            } else {
                a
            }
        })
        .expect("a cube of size >= 1 has at least one swap pair");
    (neighbor, score)
}
