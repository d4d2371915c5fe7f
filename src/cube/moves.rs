//! Swap-move generation.
//!
//! The single move operator is an exchange of two distinct cells. This
//! module draws random pairs, samples whole neighborhoods, and
//! enumerates the full `C(N³, 2)` neighborhood lazily for strategies
//! that want the exact best neighbor.

use rand::Rng;

use super::state::{CubeState, Pos};

/// Draws two distinct uniformly random positions.
///
/// The second position is resampled until it differs from the first;
/// the collision probability is `1/N³`, so the loop all but never
/// repeats for N ≥ 2.
pub fn random_pair<R: Rng + ?Sized>(size: usize, rng: &mut R) -> (Pos, Pos) {
    let pos1 = random_pos(size, rng);
    let mut pos2 = random_pos(size, rng);
    while pos2 == pos1 {
        pos2 = random_pos(size, rng);
    }
    (pos1, pos2)
}

fn random_pos<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Pos {
    (
        rng.random_range(0..size),
        rng.random_range(0..size),
        rng.random_range(0..size),
    )
}

/// Produces `k` independent neighbors, each one random swap away from
/// `state`. Swaps are drawn fresh each time, never composed.
pub fn sample_neighbors<R: Rng + ?Sized>(
    state: &CubeState,
    k: usize,
    rng: &mut R,
) -> Vec<CubeState> {
    (0..k)
        .map(|_| {
            let (p1, p2) = random_pair(state.size(), rng);
            state
                .swapped(p1, p2)
                .expect("random_pair draws in-bounds positions")
        })
        .collect()
}

/// Lazily yields every unordered pair of distinct positions, in a fixed
/// enumeration order (first position ascending, second strictly after
/// it in flat order). `C(N³, 2)` pairs in total.
pub fn neighbor_pairs(size: usize) -> NeighborPairs {
    NeighborPairs {
        size,
        cells: size * size * size,
        first: 0,
        second: 1,
    }
}

/// Iterator over all unordered swap pairs; see [`neighbor_pairs`].
#[derive(Debug, Clone)]
pub struct NeighborPairs {
    size: usize,
    cells: usize,
    first: usize,
    second: usize,
}

impl NeighborPairs {
    fn unflatten(&self, idx: usize) -> Pos {
        let n = self.size;
        (idx / (n * n), (idx / n) % n, idx % n)
    }
}

impl Iterator for NeighborPairs {
    type Item = (Pos, Pos);

    fn next(&mut self) -> Option<(Pos, Pos)> {
        if self.first + 1 >= self.cells {
            return None;
        }
        let pair = (self.unflatten(self.first), self.unflatten(self.second));
        self.second += 1;
        if self.second >= self.cells {
            self.first += 1;
            self.second = self.first + 1;
        }
        Some(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use std::collections::HashSet;

    #[test]
    fn test_random_pair_distinct() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (p1, p2) = random_pair(2, &mut rng);
            assert_ne!(p1, p2);
        }
    }

    #[test]
    fn test_random_pair_in_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..500 {
            let (p1, p2) = random_pair(3, &mut rng);
            for (x, y, z) in [p1, p2] {
                assert!(x < 3 && y < 3 && z < 3);
            }
        }
    }

    #[test]
    fn test_sample_neighbors_are_single_swaps() {
        let mut rng = create_rng(5);
        let state = CubeState::random(3, &mut rng).unwrap();
        let neighbors = sample_neighbors(&state, 10, &mut rng);
        assert_eq!(neighbors.len(), 10);
        for neighbor in &neighbors {
            let differing = state
                .values()
                .iter()
                .zip(neighbor.values())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(differing, 2, "each neighbor is exactly one swap away");
        }
    }

    #[test]
    fn test_neighbor_pairs_count() {
        let n3 = 8; // 2×2×2
        let expected = n3 * (n3 - 1) / 2;
        assert_eq!(neighbor_pairs(2).count(), expected);
    }

    #[test]
    fn test_neighbor_pairs_unique_and_unordered() {
        let mut seen = HashSet::new();
        for (p1, p2) in neighbor_pairs(2) {
            assert_ne!(p1, p2);
            // Normalizing the pair must not collide with any other.
            let key = if p1 < p2 { (p1, p2) } else { (p2, p1) };
            assert!(seen.insert(key), "pair {key:?} yielded twice");
        }
        assert_eq!(seen.len(), 28);
    }

    #[test]
    fn test_neighbor_pairs_enumeration_order_is_stable() {
        let first: Vec<_> = neighbor_pairs(2).take(3).collect();
        assert_eq!(
            first,
            vec![
                ((0, 0, 0), (0, 0, 1)),
                ((0, 0, 0), (0, 1, 0)),
                ((0, 0, 0), (0, 1, 1)),
            ]
        );
    }
}
