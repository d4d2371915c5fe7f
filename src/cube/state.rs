//! Cube state: a permutation of `1..=N³` arranged in an N×N×N grid.

use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use super::lines::{magic_number, LineCatalog};
use crate::error::{SearchError, SearchResult};

/// A cell coordinate `(x, y, z)`, each axis in `[0, N)`.
pub type Pos = (usize, usize, usize);

/// One arrangement of the integers `1..=N³` in an N×N×N cube.
///
/// The grid is stored flat in `(x, y, z)` order (`x` outermost, `z`
/// innermost) and is always a permutation of `1..=N³`: every
/// constructor either guarantees or validates this, and the only
/// mutation, [`swapped`](CubeState::swapped), preserves it.
///
/// The discrete score (count of lines summing to the magic number) is
/// computed once at construction and cached; a `CubeState` is immutable
/// afterwards, so the cache can never go stale. Strategies that need a
/// neighbor create a new state.
#[derive(Debug, Clone)]
pub struct CubeState {
    size: usize,
    values: Vec<u32>,
    magic_number: u64,
    score: u32,
    catalog: Arc<LineCatalog>,
}

impl PartialEq for CubeState {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.values == other.values
    }
}

impl Eq for CubeState {}

impl CubeState {
    /// Draws a uniformly random permutation of `1..=size³`.
    ///
    /// Fails with [`SearchError::InvalidCube`] only when `size < 1`.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> SearchResult<CubeState> {
        if size < 1 {
            return Err(SearchError::InvalidCube {
                size,
                reason: "size must be at least 1".into(),
            });
        }
        let n3 = size * size * size;
        let mut values: Vec<u32> = (1..=n3 as u32).collect();
        values.shuffle(rng);
        Ok(Self::from_trusted(size, values))
    }

    /// Builds a state from an explicit grid, flat in `(x, y, z)` order.
    ///
    /// Validates that `values` is a permutation of `1..=size³`: right
    /// cardinality, every value in range, no duplicates. Fails with
    /// [`SearchError::InvalidCube`] otherwise.
    pub fn from_grid(size: usize, values: Vec<u32>) -> SearchResult<CubeState> {
        if size < 1 {
            return Err(SearchError::InvalidCube {
                size,
                reason: "size must be at least 1".into(),
            });
        }
        let n3 = size * size * size;
        if values.len() != n3 {
            return Err(SearchError::InvalidCube {
                size,
                reason: format!("expected {} values, got {}", n3, values.len()),
            });
        }
        let mut seen = vec![false; n3];
        for &v in &values {
            if v < 1 || v as usize > n3 {
                return Err(SearchError::InvalidCube {
                    size,
                    reason: format!("value {v} outside 1..={n3}"),
                });
            }
            let slot = &mut seen[(v - 1) as usize];
            if *slot {
                return Err(SearchError::InvalidCube {
                    size,
                    reason: format!("duplicate value {v}"),
                });
            }
            *slot = true;
        }
        Ok(Self::from_trusted(size, values))
    }

    /// Builds a state from values already known to be a permutation
    /// (shuffled in place, or repaired by the GA crossover).
    pub(crate) fn from_trusted(size: usize, values: Vec<u32>) -> CubeState {
        let catalog = LineCatalog::for_size(size);
        let score = catalog.discrete_score(&values);
        CubeState {
            size,
            values,
            magic_number: magic_number(size),
            score,
            catalog,
        }
    }

    /// Returns a new state with the values at `pos1` and `pos2`
    /// exchanged.
    ///
    /// Fails with [`SearchError::OutOfBounds`] if either coordinate has
    /// an axis outside `[0, N)`. Swapping a position with itself is a
    /// contract violation on the caller's side, not a supported no-op.
    pub fn swapped(&self, pos1: Pos, pos2: Pos) -> SearchResult<CubeState> {
        let i = self.checked_index(pos1)?;
        let j = self.checked_index(pos2)?;
        debug_assert_ne!(i, j, "swapped called with identical positions");
        let mut values = self.values.clone();
        values.swap(i, j);
        Ok(Self::from_trusted(self.size, values))
    }

    fn checked_index(&self, (x, y, z): Pos) -> SearchResult<usize> {
        if x >= self.size || y >= self.size || z >= self.size {
            return Err(SearchError::OutOfBounds {
                x,
                y,
                z,
                size: self.size,
            });
        }
        Ok((x * self.size + y) * self.size + z)
    }

    /// Cube edge length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The target line sum `N·(N³+1)/2`.
    pub fn magic_number(&self) -> u64 {
        self.magic_number
    }

    /// Cached discrete score: the number of lines summing to the magic
    /// number, in `[0, 3N²+6N+4]`.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// True when every line sums to the magic number.
    pub fn is_perfect(&self) -> bool {
        self.score as usize == self.catalog.len()
    }

    /// Deviation-based score with a diagonal bonus weighted by `alpha`;
    /// see [`LineCatalog::continuous_score`].
    pub fn continuous_score(&self, alpha: f64) -> f64 {
        self.catalog.continuous_score(&self.values, alpha)
    }

    /// The value at a coordinate, or `None` out of bounds.
    pub fn value_at(&self, pos: Pos) -> Option<u32> {
        self.checked_index(pos).ok().map(|i| self.values[i])
    }

    /// The flat grid, in `(x, y, z)` order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size;
        for x in 0..n {
            writeln!(f, "Layer {}:", x + 1)?;
            for y in 0..n {
                for z in 0..n {
                    if z > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:3}", self.values[(x * n + y) * n + z])?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "score: {}/{}", self.score, self.catalog.len())
    }
}
