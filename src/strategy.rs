//! The polymorphic entry point over all search strategies.
//!
//! External collaborators (menu, plotting, playback) construct an
//! initial [`CubeState`], pick a [`Strategy`], and consume the uniform
//! [`SearchOutcome`] without caring which family produced it. The
//! hill-climbing config covers three of the six variants (steepest
//! ascent, sideways, stochastic) through its [`ClimbVariant`] field.
//!
//! [`ClimbVariant`]: crate::hc::ClimbVariant

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cube::CubeState;
use crate::error::SearchResult;
use crate::ga::{GaConfig, GaResult, GaRunner};
use crate::hc::{HcConfig, HcResult, HcRunner};
use crate::recorder::RunRecorder;
use crate::restart::{RestartConfig, RestartResult, RestartRunner};
use crate::sa::{SaConfig, SaResult, SaRunner};
use crate::trace::{SearchStats, TracePoint};

/// A configured search strategy.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Steepest-ascent, sideways-move, or stochastic hill climbing.
    HillClimb(HcConfig),
    /// Random-restart hill climbing.
    RandomRestart(RestartConfig),
    /// Simulated annealing.
    Annealing(SaConfig),
    /// Genetic algorithm.
    Genetic(GaConfig),
}

/// Uniform result shape across all strategies.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best state found by the run.
    pub best: CubeState,
    /// Score of the best state under the run's scoring mode.
    pub best_score: f64,
    /// Chronological `(iteration, score, optional temperature)` points,
    /// one per accepted step (or generation).
    pub trace: Vec<TracePoint>,
    /// Elapsed wall-time and loop counts.
    pub stats: SearchStats,
}

impl Strategy {
    /// Runs the strategy from `initial`.
    pub fn run(&self, initial: CubeState) -> SearchResult<SearchOutcome> {
        self.run_with(initial, None, None)
    }

    /// Runs with an optional cancellation token and recorder.
    pub fn run_with(
        &self,
        initial: CubeState,
        cancel: Option<Arc<AtomicBool>>,
        recorder: Option<&mut RunRecorder>,
    ) -> SearchResult<SearchOutcome> {
        match self {
            Strategy::HillClimb(config) => {
                HcRunner::run_with(initial, config, cancel, recorder).map(SearchOutcome::from)
            }
            Strategy::RandomRestart(config) => {
                RestartRunner::run_with(initial, config, cancel, recorder)
                    .map(SearchOutcome::from)
            }
            Strategy::Annealing(config) => {
                SaRunner::run_with(initial, config, cancel, recorder).map(SearchOutcome::from)
            }
            Strategy::Genetic(config) => {
                GaRunner::run_with(initial, config, cancel, recorder).map(SearchOutcome::from)
            }
        }
    }
}

impl From<HcResult> for SearchOutcome {
    fn from(result: HcResult) -> Self {
        SearchOutcome {
            best: result.best,
            best_score: result.best_score,
            trace: result.trace,
            stats: result.stats,
        }
    }
}

impl From<RestartResult> for SearchOutcome {
    fn from(result: RestartResult) -> Self {
        SearchOutcome {
            best: result.best,
            best_score: result.best_score,
            trace: result.trace,
            stats: result.stats,
        }
    }
}

impl From<SaResult> for SearchOutcome {
    fn from(result: SaResult) -> Self {
        SearchOutcome {
            best: result.best,
            best_score: result.best_score,
            trace: result.trace,
            stats: result.stats,
        }
    }
}

impl From<GaResult> for SearchOutcome {
    fn from(result: GaResult) -> Self {
        SearchOutcome {
            best: result.best,
            best_score: result.best_fitness,
            trace: result.trace,
            stats: result.stats,
        }
    }
}
