//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use super::config::SaConfig;
use crate::cube::{random_pair, CubeState};
use crate::error::SearchResult;
use crate::random::seeded_or_random;
use crate::recorder::RunRecorder;
use crate::trace::{SearchStats, TracePoint};

/// Metropolis acceptance probability for a maximizing search.
///
/// Exactly 1 whenever `neighbor >= current` (the exponential is never
/// evaluated on that side, so no overflow is possible), and
/// `exp((neighbor - current) / temperature)` otherwise, which lies
/// strictly between 0 and 1 for any positive temperature.
pub fn acceptance_probability(current: f64, neighbor: f64, temperature: f64) -> f64 {
    if neighbor >= current {
        1.0
    } else {
        ((neighbor - current) / temperature).exp()
    }
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The best state found during the entire walk.
    pub best: CubeState,

    /// Score of the best state under the run's scoring mode.
    pub best_score: f64,

    /// Temperature when the walk stopped.
    pub final_temperature: f64,

    /// Accepted moves, improvements included.
    pub accepted_moves: usize,

    /// Moves that strictly improved on the current state.
    pub improving_moves: usize,

    /// Times the stagnation threshold fired a reheat.
    pub reheats: usize,

    /// Acceptance probabilities computed for downhill proposals, in
    /// order; useful for plotting `e^(ΔE/T)` against iterations.
    pub downhill_probabilities: Vec<f64>,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Current score and temperature at each accepted step.
    pub trace: Vec<TracePoint>,

    /// Elapsed time and iteration count.
    pub stats: SearchStats,
}

/// Executes Simulated Annealing.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `initial`.
    pub fn run(initial: CubeState, config: &SaConfig) -> SearchResult<SaResult> {
        Self::run_with(initial, config, None, None)
    }

    /// Runs SA with an optional cancellation token and recorder.
    pub fn run_with(
        initial: CubeState,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut recorder: Option<&mut RunRecorder>,
    ) -> SearchResult<SaResult> {
        config.validate()?;
        let start = Instant::now();
        let mut rng = seeded_or_random(config.seed);

        let mut current = initial;
        let mut current_score = config.scoring.evaluate(&current);
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = config.initial_temperature;
        let mut trace = vec![TracePoint::with_temperature(0, current_score, temperature)];
        if let Some(rec) = recorder.as_deref_mut() {
            rec.record(0, &current, current_score, Some(temperature));
        }

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut reheats = 0usize;
        let mut stagnation = 0usize;
        let mut downhill_probabilities = Vec::new();
        let mut cancelled = false;

        for iteration in 0..config.max_iterations {
            if temperature < config.min_temperature {
                break;
            }
            if best.is_perfect() {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Reheat before proposing: a frozen walk resumes from the
            // best state, lightly perturbed.
            if let Some(reheat) = &config.reheat {
                if stagnation >= reheat.stagnation_threshold {
                    reheats += 1;
                    stagnation = 0;
                    temperature = config.initial_temperature * reheat.reheat_fraction;
                    current = diversify(&best, reheat.diversify_swaps, &mut rng);
                    current_score = config.scoring.evaluate(&current);
                    trace.push(TracePoint::with_temperature(
                        iteration,
                        current_score,
                        temperature,
                    ));
                    if let Some(rec) = recorder.as_deref_mut() {
                        rec.record(iteration, &current, current_score, Some(temperature));
                    }
                }
            }

            let (neighbor, neighbor_score) =
                best_of_batch(&current, config, &mut rng);
            iterations += 1;

            let probability = acceptance_probability(current_score, neighbor_score, temperature);
            if neighbor_score < current_score {
                downhill_probabilities.push(probability);
            }
            let accept = probability >= 1.0 || rng.random::<f64>() < probability;

            if accept {
                current = neighbor;
                let improved = neighbor_score > current_score;
                current_score = neighbor_score;
                accepted_moves += 1;
                if improved {
                    improving_moves += 1;
                }

                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                    stagnation = 0;
                } else {
                    stagnation += 1;
                }

                trace.push(TracePoint::with_temperature(
                    iteration + 1,
                    current_score,
                    temperature,
                ));
                if let Some(rec) = recorder.as_deref_mut() {
                    rec.record(iteration + 1, &current, current_score, Some(temperature));
                }
            } else {
                stagnation += 1;
            }

            temperature *= config.cooling_rate;
        }

        Ok(SaResult {
            best,
            best_score,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            reheats,
            downhill_probabilities,
            cancelled,
            trace,
            stats: SearchStats {
                elapsed: start.elapsed(),
                iterations,
                restarts: 0,
                generations: 0,
            },
        })
    }
}

/// Best of `batch_size` fresh random swaps on `current`.
fn best_of_batch<R: Rng>(
    current: &CubeState,
    config: &SaConfig,
    rng: &mut R,
) -> (CubeState, f64) {
    let mut best: Option<(CubeState, f64)> = None;
    for _ in 0..config.batch_size {
        let (p1, p2) = random_pair(current.size(), rng);
        let neighbor = current
            .swapped(p1, p2)
            .expect("random_pair draws in-bounds positions");
        let score = config.scoring.evaluate(&neighbor);
        if best.as_ref().is_none_or(|(_, b)| score > *b) {
            best = Some((neighbor, score));
        }
    }
    best.expect("batch_size validated to be >= 1")
}

/// The best state perturbed by `swaps` fresh random swaps.
fn diversify<R: Rng>(best: &CubeState, swaps: usize, rng: &mut R) -> CubeState {
    let mut state = best.clone();
    for _ in 0..swaps {
        let (p1, p2) = random_pair(state.size(), rng);
        state = state
            .swapped(p1, p2)
            .expect("random_pair draws in-bounds positions");
    }
    state
}
