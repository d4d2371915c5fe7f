//! Seeded RNG construction.
//!
//! Strategies never touch a process-wide RNG; every runner builds its
//! own generator from the seed in its config, so a seeded run is fully
//! reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from an explicit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Resolves an optional config seed: explicit seed when given,
/// an entropy-derived one otherwise.
pub fn seeded_or_random(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
