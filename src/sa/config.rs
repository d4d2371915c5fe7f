//! SA configuration.

use crate::cube::ScoringMode;
use crate::error::{SearchError, SearchResult};

/// Reheating policy: escape hatch for a frozen, stagnating walk.
///
/// After `stagnation_threshold` consecutive steps without a new best,
/// the temperature resets to `reheat_fraction` of the initial one and
/// the walk restarts from the best-known state, perturbed by
/// `diversify_swaps` random swaps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReheatConfig {
    /// Consecutive non-improving steps before a reheat fires.
    pub stagnation_threshold: usize,

    /// Fraction of the initial temperature to reset to, in `(0, 1]`.
    pub reheat_fraction: f64,

    /// Random swaps applied to the best state on reheat; 0 restarts
    /// from the best state as-is.
    pub diversify_swaps: usize,
}

impl Default for ReheatConfig {
    fn default() -> Self {
        Self {
            stagnation_threshold: 1000,
            reheat_fraction: 0.5,
            diversify_swaps: 3,
        }
    }
}

/// Configuration for Simulated Annealing.
///
/// # Examples
///
/// ```
/// use magiccube::sa::{ReheatConfig, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(1000.0)
///     .with_cooling_rate(0.95)
///     .with_min_temperature(0.01)
///     .with_reheat(ReheatConfig::default())
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Must be positive; a value already below
    /// `min_temperature` makes the run terminate immediately with the
    /// initial state.
    pub initial_temperature: f64,

    /// Multiplicative per-step cooling factor in `(0, 1)`.
    pub cooling_rate: f64,

    /// The walk stops once the temperature falls below this.
    pub min_temperature: f64,

    /// Hard budget on iterations.
    pub max_iterations: usize,

    /// Proposals drawn per step; the best of the batch is offered to
    /// the Metropolis criterion. 1 reproduces plain SA.
    pub batch_size: usize,

    /// Optional reheating policy; `None` cools monotonically.
    pub reheat: Option<ReheatConfig>,

    /// Scoring mode applied consistently for the whole run.
    pub scoring: ScoringMode,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            min_temperature: 0.01,
            max_iterations: 10_000,
            batch_size: 1,
            reheat: None,
            scoring: ScoringMode::default(),
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_reheat(mut self, reheat: ReheatConfig) -> Self {
        self.reheat = Some(reheat);
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// `initial_temperature < min_temperature` is allowed; such a run
    /// terminates immediately with the unchanged initial state.
    pub fn validate(&self) -> SearchResult<()> {
        if self.initial_temperature <= 0.0 {
            return Err(SearchError::config("initial_temperature must be positive"));
        }
        if self.min_temperature <= 0.0 {
            return Err(SearchError::config("min_temperature must be positive"));
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(SearchError::config(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(SearchError::config("max_iterations must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(SearchError::config("batch_size must be at least 1"));
        }
        if let Some(reheat) = &self.reheat {
            if reheat.stagnation_threshold == 0 {
                return Err(SearchError::config(
                    "reheat stagnation_threshold must be at least 1",
                ));
            }
            if reheat.reheat_fraction <= 0.0 || reheat.reheat_fraction > 1.0 {
                return Err(SearchError::config(format!(
                    "reheat_fraction must be in (0, 1], got {}",
                    reheat.reheat_fraction
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert!((config.initial_temperature - 1000.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.95).abs() < 1e-10);
        assert!((config.min_temperature - 0.01).abs() < 1e-10);
        assert_eq!(config.max_iterations, 10_000);
        assert_eq!(config.batch_size, 1);
        assert!(config.reheat.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        assert!(SaConfig::default()
            .with_initial_temperature(-1.0)
            .validate()
            .is_err());
        assert!(SaConfig::default()
            .with_min_temperature(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        assert!(SaConfig::default().with_cooling_rate(1.0).validate().is_err());
        assert!(SaConfig::default().with_cooling_rate(0.0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_batch() {
        assert!(SaConfig::default().with_batch_size(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_reheat() {
        let config = SaConfig::default().with_reheat(ReheatConfig {
            stagnation_threshold: 0,
            ..ReheatConfig::default()
        });
        assert!(config.validate().is_err());

        let config = SaConfig::default().with_reheat(ReheatConfig {
            reheat_fraction: 1.5,
            ..ReheatConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cold_start_is_valid() {
        // Already-frozen starts are valid configs; the run just ends
        // immediately.
        let config = SaConfig::default()
            .with_initial_temperature(0.001)
            .with_min_temperature(0.01);
        assert!(config.validate().is_ok());
    }
}
