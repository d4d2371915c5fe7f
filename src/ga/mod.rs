//! Genetic Algorithm (GA).
//!
//! Population-based search over cube permutations: rank by fitness,
//! carry an elite subset unchanged, refill by recombining elites, then
//! mutate the offspring with a batch of random swaps. The mutation rate
//! adapts upward while the best fitness stagnates and resets on any
//! improvement.
//!
//! All four recombination operators preserve the permutation invariant
//! by repairing transplanted regions with a PMX-style mapping chain.
//!
//! # References
//!
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling
//!   Salesman Problem" (the PMX repair)

mod config;
mod crossover;
mod runner;
mod selection;

pub use config::GaConfig;
pub use crossover::Crossover;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
