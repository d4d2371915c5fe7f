//! Scoring modes shared by all strategies.
//!
//! A run picks one mode and applies it consistently: the discrete count
//! of magic lines for simple progress metrics, or the deviation-based
//! continuous score when acceptance decisions benefit from a smoother
//! gradient. Both evaluate through the same [`LineCatalog`], and both
//! are maximized; higher is better everywhere in this crate.
//!
//! [`LineCatalog`]: super::LineCatalog

use super::CubeState;

/// How a strategy turns a cube into a scalar fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoringMode {
    /// Integer count of lines summing to the magic number, in
    /// `[0, 3N²+6N+4]`.
    Discrete,

    /// `-normalized_deviation + alpha · correct_diagonals`, floored at
    /// `-(3N²+6N+4)`. `alpha` (default 0) biases the search toward
    /// diagonal correctness.
    Continuous {
        /// Weight of the correct-diagonal bonus term.
        alpha: f64,
    },
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Discrete
    }
}

impl ScoringMode {
    /// Evaluates a state under this mode. Higher is better.
    pub fn evaluate(&self, state: &CubeState) -> f64 {
        match *self {
            ScoringMode::Discrete => state.score() as f64,
            ScoringMode::Continuous { alpha } => state.continuous_score(alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_discrete_matches_cached_score() {
        let mut rng = create_rng(3);
        let state = CubeState::random(4, &mut rng).unwrap();
        assert_eq!(ScoringMode::Discrete.evaluate(&state), state.score() as f64);
    }

    #[test]
    fn test_continuous_matches_state_method() {
        let mut rng = create_rng(3);
        let state = CubeState::random(4, &mut rng).unwrap();
        let mode = ScoringMode::Continuous { alpha: 1.5 };
        assert_eq!(mode.evaluate(&state), state.continuous_score(1.5));
    }

    #[test]
    fn test_continuous_is_nonpositive_with_zero_alpha() {
        let mut rng = create_rng(9);
        for _ in 0..10 {
            let state = CubeState::random(3, &mut rng).unwrap();
            assert!(ScoringMode::Continuous { alpha: 0.0 }.evaluate(&state) <= 0.0);
        }
    }
}
