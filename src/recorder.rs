//! Optional capture of intermediate states for external playback.
//!
//! A [`RunRecorder`] is passed into a runner's `run_with` entry point
//! and receives every accepted state in order, together with its score
//! and (for annealing) the temperature. It is not part of the
//! optimization logic: runners behave identically with or without one.
//!
//! The recorded sequence can be read back in memory or emitted in the
//! snapshot format the playback visualizer consumes (see
//! [`crate::cube::write_snapshot`]).

use std::io::{self, Write};

use crate::cube::{write_snapshot, CubeState};

/// One recorded step: the accepted state and its scalar value.
#[derive(Debug, Clone)]
pub struct RecordedStep {
    pub iteration: usize,
    pub state: CubeState,
    pub score: f64,
    pub temperature: Option<f64>,
}

/// Ordered in-memory capture of a run's accepted states.
#[derive(Debug, Default)]
pub struct RunRecorder {
    steps: Vec<RecordedStep>,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        iteration: usize,
        state: &CubeState,
        score: f64,
        temperature: Option<f64>,
    ) {
        self.steps.push(RecordedStep {
            iteration,
            state: state.clone(),
            score,
            temperature,
        });
    }

    /// The recorded steps, in chronological order.
    pub fn steps(&self) -> &[RecordedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Writes every recorded state as a delimiter-separated snapshot,
    /// append-only, in recording order.
    pub fn write_snapshots<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for step in &self.steps {
            write_snapshot(&step.state, w)?;
        }
        Ok(())
    }
}
