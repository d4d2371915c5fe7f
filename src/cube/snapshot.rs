//! Textual cube snapshots for the playback visualizer.
//!
//! One snapshot is N² lines of N whitespace-separated integers (line
//! `x·N + y` holds `grid[x][y][0..N]`), followed by a line containing a
//! single `;`. Successive snapshots are appended during a run; the
//! visualizer re-parses the whole file.

use std::io::{self, Write};

use super::state::CubeState;
use crate::error::{SearchError, SearchResult};

/// Snapshot delimiter line.
pub const DELIMITER: &str = ";";

/// Writes one snapshot of `state` followed by the delimiter line.
pub fn write_snapshot<W: Write>(state: &CubeState, w: &mut W) -> io::Result<()> {
    let n = state.size();
    let values = state.values();
    for x in 0..n {
        for y in 0..n {
            let row = &values[(x * n + y) * n..(x * n + y) * n + n];
            let mut line = String::with_capacity(n * 4);
            for (z, v) in row.iter().enumerate() {
                if z > 0 {
                    line.push(' ');
                }
                line.push_str(&v.to_string());
            }
            writeln!(w, "{line}")?;
        }
    }
    writeln!(w, "{DELIMITER}")
}

/// Parses a sequence of snapshots back into cube states.
///
/// Each snapshot is re-validated through [`CubeState::from_grid`], so a
/// corrupted file surfaces as [`SearchError::InvalidCube`] rather than
/// a silently wrong cube. Blank lines between snapshots are tolerated.
pub fn parse_snapshots(size: usize, input: &str) -> SearchResult<Vec<CubeState>> {
    let n3 = size * size * size;
    let mut states = Vec::new();
    let mut pending: Vec<u32> = Vec::with_capacity(n3);

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == DELIMITER {
            states.push(CubeState::from_grid(size, std::mem::take(&mut pending))?);
            continue;
        }
        for token in line.split_whitespace() {
            let value = token.parse::<u32>().map_err(|_| SearchError::InvalidCube {
                size,
                reason: format!("snapshot token {token:?} is not an integer"),
            })?;
            pending.push(value);
        }
    }

    // A trailing snapshot without its delimiter is still a full grid.
    if !pending.is_empty() {
        states.push(CubeState::from_grid(size, pending)?);
    }

    Ok(states)
}
