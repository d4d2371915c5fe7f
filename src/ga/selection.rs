//! Parent selection over the elite pool.
//!
//! Both strategies assume **maximization** (higher fitness = better)
//! and return an index into the fitness slice they are given.

use rand::Rng;

/// Selection strategy for choosing crossover parents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Pick `k` candidates at random, keep the fittest. Higher `k`
    /// means stronger selection pressure; 2–4 is typical.
    Tournament(usize),

    /// Fitness-proportional (roulette-wheel) sampling. Weights are
    /// shifted so the worst candidate still has a sliver of
    /// probability, which keeps the wheel defined for negative
    /// (continuous-mode) fitness values.
    Roulette,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects an index into `fitnesses`.
    ///
    /// # Panics
    /// Panics if `fitnesses` is empty.
    pub fn select<R: Rng>(&self, fitnesses: &[f64], rng: &mut R) -> usize {
        assert!(!fitnesses.is_empty(), "cannot select from an empty pool");
        match *self {
            Selection::Tournament(k) => tournament(fitnesses, k, rng),
            Selection::Roulette => roulette(fitnesses, rng),
        }
    }
}

fn tournament<R: Rng>(fitnesses: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitnesses.len();
    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitnesses[idx] > fitnesses[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

fn roulette<R: Rng>(fitnesses: &[f64], rng: &mut R) -> usize {
    let n = fitnesses.len();
    if n == 1 {
        return 0;
    }

    let min = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
    let epsilon = 1e-10;
    let weights: Vec<f64> = fitnesses.iter().map(|&f| f - min + epsilon).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    n - 1 // floating-point fallback
}
