//! Permutation-preserving recombination operators.
//!
//! Each operator picks a *region* of cells (whole layers, a contiguous
//! 3-D block, one space diagonal, or a random per-cell mask) and
//! transplants the donor's values at those cells into the base parent.
//! A naive transplant would duplicate values; the duplicates are
//! repaired with the PMX mapping chain (Goldberg & Lingle, 1985)
//! generalized from segments to arbitrary position sets, so every child
//! is again a permutation of `1..=N³`.

use std::collections::HashMap;

use rand::seq::index::sample;
use rand::Rng;

use crate::cube::CubeState;

/// Recombination strategy: which region of the donor is transplanted.
///
/// The exact probabilities and ranges are tunable rather than fixed
/// contracts; the defaults follow what worked for 5-cubes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Transplant 1..=`max_layers` whole x-layers chosen at random.
    Layers {
        /// Upper bound on the number of layers taken from the donor.
        max_layers: usize,
    },

    /// Transplant a contiguous 3-D block with per-axis extents drawn
    /// uniformly (possibly the whole cube).
    Block,

    /// Transplant the cells of one of the four space diagonals.
    SpaceDiagonal,

    /// Transplant each cell independently with the given probability.
    Uniform {
        /// Per-cell transplant probability in `[0, 1]`.
        swap_probability: f64,
    },
}

impl Default for Crossover {
    fn default() -> Self {
        Crossover::Layers { max_layers: 3 }
    }
}

impl Crossover {
    /// Produces one child: `base` with a donor region transplanted and
    /// repaired back into a permutation.
    pub fn recombine<R: Rng>(
        &self,
        base: &CubeState,
        donor: &CubeState,
        rng: &mut R,
    ) -> CubeState {
        debug_assert_eq!(base.size(), donor.size());
        let region = self.draw_region(base.size(), rng);
        region_crossover(base, donor, &region)
    }

    /// Flat indices of the region to transplant. Never contains
    /// duplicates; may be empty (Uniform with low probability), in
    /// which case the child is a copy of the base.
    fn draw_region<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        match *self {
            Crossover::Layers { max_layers } => {
                let count = rng.random_range(1..=max_layers.clamp(1, n));
                let mut region = Vec::with_capacity(count * n * n);
                for x in sample(rng, n, count) {
                    region.extend(x * n * n..(x + 1) * n * n);
                }
                region
            }
            Crossover::Block => {
                let (x0, x1) = axis_range(n, rng);
                let (y0, y1) = axis_range(n, rng);
                let (z0, z1) = axis_range(n, rng);
                let mut region = Vec::new();
                for x in x0..=x1 {
                    for y in y0..=y1 {
                        for z in z0..=z1 {
                            region.push((x * n + y) * n + z);
                        }
                    }
                }
                region
            }
            Crossover::SpaceDiagonal => {
                let pick = rng.random_range(0..4);
                (0..n)
                    .map(|i| {
                        let (x, y, z) = match pick {
                            0 => (i, i, i),
                            1 => (i, i, n - 1 - i),
                            2 => (i, n - 1 - i, i),
                            _ => (i, n - 1 - i, n - 1 - i),
                        };
                        (x * n + y) * n + z
                    })
                    .collect()
            }
            Crossover::Uniform { swap_probability } => (0..n * n * n)
                .filter(|_| rng.random_bool(swap_probability))
                .collect(),
        }
    }
}

/// A random inclusive sub-range of one axis, possibly the full extent.
fn axis_range<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    (a.min(b), a.max(b))
}

/// Transplants `donor`'s values at `region` into `base` and repairs the
/// rest through the PMX mapping chain.
///
/// For every region position the chain maps the donor value to the base
/// value it displaced; cells outside the region follow the chain until
/// they reach a value no longer claimed by the region. The map is
/// injective and the start of each chain lies outside its image, so the
/// walk always terminates and the child is a permutation.
fn region_crossover(base: &CubeState, donor: &CubeState, region: &[usize]) -> CubeState {
    let n = base.size();
    let cells = n * n * n;
    let base_values = base.values();
    let donor_values = donor.values();

    let mut child = base_values.to_vec();
    let mut in_region = vec![false; cells];
    let mut displaced: HashMap<u32, u32> = HashMap::with_capacity(region.len());

    for &idx in region {
        debug_assert!(!in_region[idx], "crossover region must not repeat cells");
        in_region[idx] = true;
        child[idx] = donor_values[idx];
        displaced.insert(donor_values[idx], base_values[idx]);
    }

    for idx in 0..cells {
        if in_region[idx] {
            continue;
        }
        let mut value = base_values[idx];
        while let Some(&mapped) = displaced.get(&value) {
            value = mapped;
        }
        child[idx] = value;
    }

    CubeState::from_trusted(n, child)
}
