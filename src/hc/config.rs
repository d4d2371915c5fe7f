//! Hill-climbing configuration.

use crate::cube::ScoringMode;
use crate::error::{SearchError, SearchResult};

/// Which member of the hill-climbing family to run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClimbVariant {
    /// Accept the best neighbor only when it strictly improves;
    /// terminate at the first local optimum.
    SteepestAscent,

    /// Like steepest ascent, but also accept equal-scoring neighbors
    /// until `max_sideways` consecutive non-improving accepts.
    Sideways {
        /// Cap on consecutive sideways (equal-scoring) accepts.
        max_sideways: usize,
    },

    /// Propose one random swap per iteration and accept only strict
    /// improvements; never terminates on a local optimum by itself.
    Stochastic,
}

/// How best-of-neighborhood variants propose a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// Score all `C(N³, 2)` swaps and take the exact best, ties broken
    /// by enumeration order. Viable at small N; O(N⁶) states per step.
    Exhaustive,

    /// Score `k` independently sampled random swaps and take the best.
    Sampled(usize),
}

/// Configuration for the hill-climbing family.
///
/// # Examples
///
/// ```
/// use magiccube::hc::{ClimbVariant, HcConfig, Neighborhood};
///
/// let config = HcConfig::default()
///     .with_variant(ClimbVariant::Sideways { max_sideways: 100 })
///     .with_neighborhood(Neighborhood::Sampled(200))
///     .with_max_iterations(500)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HcConfig {
    /// Family member to run.
    pub variant: ClimbVariant,

    /// Proposal scheme for the best-of-neighborhood variants; ignored
    /// by [`ClimbVariant::Stochastic`], which always draws one swap.
    pub neighborhood: Neighborhood,

    /// Hard budget on proposals evaluated in the outer loop.
    pub max_iterations: usize,

    /// Scoring mode applied consistently for the whole run.
    pub scoring: ScoringMode,

    /// Whether to score the exhaustive neighborhood on rayon workers
    /// (`parallel` feature). Reduction is deterministic, so this never
    /// changes the outcome of a seeded run.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for HcConfig {
    fn default() -> Self {
        Self {
            variant: ClimbVariant::SteepestAscent,
            neighborhood: Neighborhood::Exhaustive,
            max_iterations: 1000,
            scoring: ScoringMode::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl HcConfig {
    pub fn with_variant(mut self, variant: ClimbVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
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

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SearchResult<()> {
        if self.max_iterations == 0 {
            return Err(SearchError::config("max_iterations must be at least 1"));
        }
        if let Neighborhood::Sampled(k) = self.neighborhood {
            if k == 0 {
                return Err(SearchError::config(
                    "sampled neighborhood size must be at least 1",
                ));
            }
        }
        if let ClimbVariant::Sideways { max_sideways } = self.variant {
            if max_sideways == 0 {
                return Err(SearchError::config("max_sideways must be at least 1"));
            }
        }
        Ok(())
    }
}
