//! Random-restart configuration.

use crate::error::{SearchError, SearchResult};
use crate::hc::HcConfig;

/// Configuration for random-restart hill climbing.
///
/// The first climb starts from the caller's initial state; each restart
/// draws a fresh uniformly random cube.
///
/// # Examples
///
/// ```
/// use magiccube::hc::HcConfig;
/// use magiccube::restart::RestartConfig;
///
/// let config = RestartConfig::default()
///     .with_max_restarts(10)
///     .with_climb(HcConfig::default().with_max_iterations(200))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartConfig {
    /// Restart budget: total number of climbs, the initial one
    /// included.
    pub max_restarts: usize,

    /// Inner hill-climbing configuration; its `seed` is unused (the
    /// restart runner drives one generator across all climbs).
    pub climb: HcConfig,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            max_restarts: 10,
            climb: HcConfig::default(),
            seed: None,
        }
    }
}

impl RestartConfig {
    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    pub fn with_climb(mut self, climb: HcConfig) -> Self {
        self.climb = climb;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration, including the inner climb.
    pub fn validate(&self) -> SearchResult<()> {
        if self.max_restarts == 0 {
            return Err(SearchError::config("max_restarts must be at least 1"));
        }
        self.climb.validate()
    }
}
