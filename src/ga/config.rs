//! GA configuration.

use super::crossover::Crossover;
use super::selection::Selection;
use crate::cube::ScoringMode;
use crate::error::{SearchError, SearchResult};

/// Configuration for the Genetic Algorithm.
///
/// # Examples
///
/// ```
/// use magiccube::ga::{Crossover, GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_elite_count(20)
///     .with_selection(Selection::Tournament(4))
///     .with_crossover(Crossover::Block)
///     .with_mutation_rate(0.15)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Generation budget.
    pub max_generations: usize,

    /// Individuals carried unchanged into the next generation. Must be
    /// smaller than the population.
    pub elite_count: usize,

    /// How crossover parents are drawn from the elite pool.
    pub selection: Selection,

    /// Recombination operator for refilling the population.
    pub crossover: Crossover,

    /// Probability of recombining; otherwise the first parent is
    /// cloned into the offspring slot.
    pub crossover_rate: f64,

    /// Base probability that an offspring is mutated.
    pub mutation_rate: f64,

    /// Swaps per mutation are drawn from `1..=max_mutation_swaps`.
    pub max_mutation_swaps: usize,

    /// Generations without improvement before the mutation rate is
    /// boosted; 0 disables adaptation.
    pub stagnation_limit: usize,

    /// Multiplier applied to the mutation rate on each boost (≥ 1).
    pub mutation_boost: f64,

    /// Ceiling for the adapted mutation rate.
    pub max_mutation_rate: f64,

    /// Scoring mode applied consistently for the whole run.
    pub scoring: ScoringMode,

    /// Whether to evaluate offspring in parallel (`parallel` feature).
    pub parallel: bool,

    /// Optional wall-clock limit in milliseconds, checked once per
    /// generation.
    pub time_limit_ms: Option<u64>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            elite_count: 10,
            selection: Selection::default(),
            crossover: Crossover::default(),
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            max_mutation_swaps: 3,
            stagnation_limit: 10,
            mutation_boost: 1.5,
            max_mutation_rate: 0.8,
            scoring: ScoringMode::default(),
            parallel: true,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_mutation_swaps(mut self, n: usize) -> Self {
        self.max_mutation_swaps = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_mutation_boost(mut self, factor: f64) -> Self {
        self.mutation_boost = factor;
        self
    }

    pub fn with_max_mutation_rate(mut self, rate: f64) -> Self {
        self.max_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SearchResult<()> {
        if self.population_size < 2 {
            return Err(SearchError::config("population_size must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(SearchError::config("max_generations must be at least 1"));
        }
        if self.elite_count == 0 {
            return Err(SearchError::config("elite_count must be at least 1"));
        }
        if self.elite_count >= self.population_size {
            return Err(SearchError::config(format!(
                "elite_count {} must be smaller than population_size {}",
                self.elite_count, self.population_size
            )));
        }
        if let Selection::Tournament(k) = self.selection {
            if k == 0 {
                return Err(SearchError::config("tournament size must be at least 1"));
            }
        }
        match self.crossover {
            Crossover::Layers { max_layers } if max_layers == 0 => {
                return Err(SearchError::config("max_layers must be at least 1"));
            }
            Crossover::Uniform { swap_probability }
                if !(0.0..=1.0).contains(&swap_probability) =>
            {
                return Err(SearchError::config(format!(
                    "swap_probability must be in [0, 1], got {swap_probability}"
                )));
            }
            _ => {}
        }
        if self.max_mutation_swaps == 0 {
            return Err(SearchError::config("max_mutation_swaps must be at least 1"));
        }
        if self.mutation_boost < 1.0 {
            return Err(SearchError::config("mutation_boost must be at least 1"));
        }
        if self.max_mutation_rate < self.mutation_rate {
            return Err(SearchError::config(
                "max_mutation_rate must not be below mutation_rate",
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(SearchError::config("time_limit_ms must be positive or None"));
        }
        Ok(())
    }
}
