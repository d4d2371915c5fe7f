//! GA evolutionary loop execution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;

use super::config::GaConfig;
use crate::cube::{random_pair, CubeState, ScoringMode};
use crate::error::SearchResult;
use crate::random::seeded_or_random;
use crate::recorder::RunRecorder;
use crate::trace::{SearchStats, TracePoint};

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best individual found during the entire run.
    pub best: CubeState,

    /// Fitness of the best individual under the run's scoring mode.
    pub best_fitness: f64,

    /// Generations evolved.
    pub generations: usize,

    /// Mutation rate at the end of the run; above the configured base
    /// rate when the population was stagnating.
    pub final_mutation_rate: f64,

    /// Best fitness after initialization and after each generation.
    pub best_history: Vec<f64>,

    /// Population mean fitness alongside `best_history`.
    pub mean_history: Vec<f64>,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness per generation as trace points.
    pub trace: Vec<TracePoint>,

    /// Elapsed time and generation count.
    pub stats: SearchStats,
}

/// Executes the GA evolutionary loop.
pub struct GaRunner;

/// One evaluated member of the population.
#[derive(Debug, Clone)]
struct Scored {
    state: CubeState,
    fitness: f64,
}

impl GaRunner {
    /// Runs the GA seeded with `initial`; the rest of the population is
    /// drawn at random.
    pub fn run(initial: CubeState, config: &GaConfig) -> SearchResult<GaResult> {
        Self::run_with(initial, config, None, None)
    }

    /// Runs the GA with an optional cancellation token and a recorder
    /// receiving the best state of each generation.
    pub fn run_with(
        initial: CubeState,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut recorder: Option<&mut RunRecorder>,
    ) -> SearchResult<GaResult> {
        config.validate()?;
        let start = Instant::now();
        let mut rng = seeded_or_random(config.seed);
        let size = initial.size();

        // Initial population: the caller's state plus fresh randoms.
        let mut population = Vec::with_capacity(config.population_size);
        population.push(Scored {
            fitness: config.scoring.evaluate(&initial),
            state: initial,
        });
        for _ in 1..config.population_size {
            let state = CubeState::random(size, &mut rng)?;
            population.push(Scored {
                fitness: config.scoring.evaluate(&state),
                state,
            });
        }

        let mut best = fittest(&population).clone();
        let mut best_history = vec![best.fitness];
        let mut mean_history = vec![mean_fitness(&population)];
        let mut trace = vec![TracePoint::new(0, best.fitness)];
        if let Some(rec) = recorder.as_deref_mut() {
            rec.record(0, &best.state, best.fitness, None);
        }

        let mut mutation_rate = config.mutation_rate;
        let mut stagnation = 0usize;
        let mut generations = 0usize;
        let mut cancelled = false;
        let time_limit = config.time_limit_ms.map(Duration::from_millis);

        for gen in 1..=config.max_generations {
            if best.state.is_perfect() {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                break;
            }

            rank(&mut population);
            let mut next = breed(&population, config, &mut rng);
            mutate_offspring(&mut next, config, mutation_rate, &mut rng);
            evaluate_offspring(
                &mut next[config.elite_count..],
                config.scoring,
                config.parallel,
            );
            population = next;
            generations = gen;

            let gen_best = fittest(&population);
            if gen_best.fitness > best.fitness {
                best = gen_best.clone();
                stagnation = 0;
                mutation_rate = config.mutation_rate;
            } else {
                stagnation += 1;
                if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
                    mutation_rate =
                        (mutation_rate * config.mutation_boost).min(config.max_mutation_rate);
                    stagnation = 0;
                }
            }

            best_history.push(best.fitness);
            mean_history.push(mean_fitness(&population));
            trace.push(TracePoint::new(gen, best.fitness));
            if let Some(rec) = recorder.as_deref_mut() {
                rec.record(gen, &best.state, best.fitness, None);
            }
        }

        Ok(GaResult {
            best_fitness: best.fitness,
            best: best.state,
            generations,
            final_mutation_rate: mutation_rate,
            best_history,
            mean_history,
            cancelled,
            trace,
            stats: SearchStats {
                elapsed: start.elapsed(),
                iterations: 0,
                restarts: 0,
                generations,
            },
        })
    }
}

/// Sorts the population best-first.
fn rank(population: &mut [Scored]) {
    population.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Elite carry-over plus crossover offspring. Expects `sorted`
/// best-first; offspring fitness is left unset for the evaluation pass.
fn breed<R: Rng>(sorted: &[Scored], config: &GaConfig, rng: &mut R) -> Vec<Scored> {
    let elites = &sorted[..config.elite_count];
    let elite_fitnesses: Vec<f64> = elites.iter().map(|e| e.fitness).collect();

    let mut next: Vec<Scored> = elites.to_vec();
    while next.len() < config.population_size {
        let p1 = &elites[config.selection.select(&elite_fitnesses, rng)];
        let p2 = &elites[config.selection.select(&elite_fitnesses, rng)];
        let state = if rng.random_range(0.0..1.0) < config.crossover_rate {
            config.crossover.recombine(&p1.state, &p2.state, rng)
        } else {
            p1.state.clone()
        };
        next.push(Scored {
            state,
            fitness: f64::NEG_INFINITY,
        });
    }
    next
}

/// Mutates offspring in place with the current adaptive rate; elites
/// are never touched. A mutation applies `1..=max_mutation_swaps`
/// fresh random swaps.
fn mutate_offspring<R: Rng>(
    next: &mut [Scored],
    config: &GaConfig,
    mutation_rate: f64,
    rng: &mut R,
) {
    let elite_count = config.elite_count;
    for individual in &mut next[elite_count..] {
        if rng.random_range(0.0..1.0) >= mutation_rate {
            continue;
        }
        let n = individual.state.size();
        let swaps = rng.random_range(1..=config.max_mutation_swaps);
        let mut values = individual.state.values().to_vec();
        for _ in 0..swaps {
            let ((x1, y1, z1), (x2, y2, z2)) = random_pair(n, rng);
            values.swap((x1 * n + y1) * n + z1, (x2 * n + y2) * n + z2);
        }
        individual.state = CubeState::from_trusted(n, values);
    }
}

/// Fills in offspring fitness, optionally on rayon workers.
fn evaluate_offspring(offspring: &mut [Scored], scoring: ScoringMode, parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        offspring
            .par_iter_mut()
            .for_each(|individual| individual.fitness = scoring.evaluate(&individual.state));
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for individual in offspring.iter_mut() {
        individual.fitness = scoring.evaluate(&individual.state);
    }
}

fn fittest(population: &[Scored]) -> &Scored {
    population
        .iter()
        .max_by(|a, b| {
            a.fitness
                .partial_cmp(&b.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("population is never empty")
}

fn mean_fitness(population: &[Scored]) -> f64 {
    population.iter().map(|s| s.fitness).sum::<f64>() / population.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::ga::{Crossover, Selection};
    use crate::random::create_rng;

    fn start_state(seed: u64, size: usize) -> CubeState {
        let mut rng = create_rng(seed);
        CubeState::random(size, &mut rng).unwrap()
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_elite_count(4)
            .with_max_generations(30)
            .with_parallel(false)
    }

    #[test]
    fn test_invalid_config_fails_before_search() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_elite_count(4);
        let err = GaRunner::run(start_state(1, 3), &config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_best_history_non_decreasing_with_elitism() {
        let config = small_config().with_seed(42);
        let result = GaRunner::run(start_state(42, 3), &config).unwrap();

        for window in result.best_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "elitism keeps the best fitness monotone: {} -> {}",
                window[0],
                window[1]
            );
        }
        assert_eq!(result.best_history.len(), result.generations + 1);
        assert_eq!(result.mean_history.len(), result.best_history.len());
    }

    #[test]
    fn test_ga_improves_over_random_start() {
        let config = small_config().with_max_generations(60).with_seed(7);
        let initial = start_state(7, 3);
        let initial_fitness = initial.score() as f64;
        let result = GaRunner::run(initial, &config).unwrap();
        assert!(result.best_fitness >= initial_fitness);
    }

    #[test]
    fn test_elites_survive_breeding_unchanged() {
        // With population 10 and elite 2, the elite individuals of
        // generation g appear by value in generation g+1 before any
        // mutation is applied.
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_count(2)
            .with_parallel(false);
        let mut rng = create_rng(42);
        let mut population: Vec<Scored> = (0..10)
            .map(|_| {
                let state = CubeState::random(3, &mut rng).unwrap();
                Scored {
                    fitness: state.score() as f64,
                    state,
                }
            })
            .collect();
        rank(&mut population);
        let elite_states: Vec<CubeState> =
            population[..2].iter().map(|e| e.state.clone()).collect();

        let mut next = breed(&population, &config, &mut rng);

        for elite in &elite_states {
            assert!(
                next.iter().any(|ind| ind.state == *elite),
                "elite missing from the bred population"
            );
        }

        // Mutation skips the elite slots, so they survive it too.
        mutate_offspring(&mut next, &config, 1.0, &mut rng);
        assert_eq!(next[0].state, elite_states[0]);
        assert_eq!(next[1].state, elite_states[1]);
    }

    #[test]
    fn test_offspring_are_valid_permutations() {
        let config = small_config()
            .with_crossover(Crossover::Uniform {
                swap_probability: 0.4,
            })
            .with_seed(11);
        let result = GaRunner::run(start_state(11, 3), &config).unwrap();
        let mut sorted = result.best.values().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=27).collect::<Vec<u32>>());
    }

    #[test]
    fn test_all_crossover_operators_run() {
        for crossover in [
            Crossover::Layers { max_layers: 2 },
            Crossover::Block,
            Crossover::SpaceDiagonal,
            Crossover::Uniform {
                swap_probability: 0.5,
            },
        ] {
            let config = small_config()
                .with_max_generations(10)
                .with_crossover(crossover)
                .with_seed(5);
            let result = GaRunner::run(start_state(5, 3), &config).unwrap();
            assert!(result.generations > 0, "{crossover:?} failed to evolve");
        }
    }

    #[test]
    fn test_roulette_selection_runs() {
        let config = small_config()
            .with_selection(Selection::Roulette)
            .with_max_generations(10)
            .with_seed(9);
        let result = GaRunner::run(start_state(9, 3), &config).unwrap();
        assert_eq!(result.generations, 10);
    }

    #[test]
    fn test_adaptive_mutation_boosts_on_stagnation() {
        // A tiny cube plateaus almost immediately; with a one-
        // generation stagnation limit the final rate must sit above
        // the base.
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_count(2)
            .with_max_generations(20)
            .with_stagnation_limit(1)
            .with_mutation_boost(2.0)
            .with_max_mutation_rate(0.8)
            .with_parallel(false)
            .with_seed(3);
        let result = GaRunner::run(start_state(3, 2), &config).unwrap();
        assert!(
            result.final_mutation_rate > config.mutation_rate,
            "expected a boosted rate, got {}",
            result.final_mutation_rate
        );
        assert!(result.final_mutation_rate <= config.max_mutation_rate + 1e-12);
    }

    #[test]
    fn test_time_limit_stops_early() {
        let config = GaConfig::default()
            .with_population_size(30)
            .with_elite_count(3)
            .with_max_generations(1_000_000)
            .with_time_limit_ms(50)
            .with_parallel(false)
            .with_seed(13);
        let result = GaRunner::run(start_state(13, 3), &config).unwrap();
        assert!(result.generations < 1_000_000);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_cancellation() {
        let cancel = Arc::new(AtomicBool::new(true));
        let config = small_config().with_seed(2);
        let result =
            GaRunner::run_with(start_state(2, 3), &config, Some(cancel), None).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
    }

    #[test]
    fn test_recorder_tracks_generations() {
        let mut recorder = RunRecorder::new();
        let config = small_config().with_max_generations(15).with_seed(8);
        let result =
            GaRunner::run_with(start_state(8, 3), &config, None, Some(&mut recorder)).unwrap();
        assert_eq!(recorder.len(), result.generations + 1);
    }

    #[test]
    fn test_trace_matches_best_history() {
        let config = small_config().with_max_generations(12).with_seed(6);
        let result = GaRunner::run(start_state(6, 3), &config).unwrap();
        assert_eq!(result.trace.len(), result.best_history.len());
        for (point, &fitness) in result.trace.iter().zip(&result.best_history) {
            assert_eq!(point.score, fitness);
            assert_eq!(point.temperature, None);
        }
    }
}
