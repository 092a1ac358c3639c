//! Enumeration of simple paths through the routing graph.
//!
//! The routing matrix (with the virtual sink column already removed) is
//! read as a weighted directed graph: an edge `i -> j` exists when
//! `matrix[(i, j)] > 0`. Enumeration walks every loop-free path from a
//! start node to a target node with an explicit worklist: one edge
//! cursor per depth plus an on-path mask. A node already on the path is
//! never revisited, which removes routing loops; this is equivalent to
//! the recursive formulation that zeroes all edges into every visited
//! node on a cloned matrix, without the per-level clone.
//!
//! There is no memoization: the enumeration is exponential in the worst
//! case over dense graphs, so callers must bound node count or density.

use crate::error::{QnetError, Result};
use crate::numeric::Matrix;

/// Enumerate all simple paths from `start` to `target`.
///
/// Fails with [`QnetError::PathEndpoints`] when `start == target` and
/// with [`QnetError::Index`] when either endpoint is outside the
/// matrix. Returned paths begin at `start`, end at `target`, contain no
/// repeated node and are sorted by length (DFS order within one
/// length). A branch with no positive outgoing weight contributes
/// nothing.
pub fn enumerate_paths(matrix: &Matrix, start: usize, target: usize) -> Result<Vec<Vec<usize>>> {
    let n = matrix.row_count();
    if start >= n {
        return Err(QnetError::index("path start node", start, n));
    }
    if target >= n {
        return Err(QnetError::index("path target node", target, n));
    }
    if start == target {
        return Err(QnetError::PathEndpoints { node: start });
    }

    let mut paths = Vec::new();
    let mut path = vec![start];
    let mut on_path = vec![false; n];
    on_path[start] = true;
    // one successor cursor per path position
    let mut cursors = vec![0usize];

    while let Some(depth) = cursors.len().checked_sub(1) {
        let current = path[depth];
        let next = cursors[depth];

        if next >= n {
            // candidates exhausted, backtrack
            cursors.pop();
            on_path[path.pop().expect("path tracks cursor depth")] = false;
            continue;
        }
        cursors[depth] += 1;

        if on_path[next] || matrix[(current, next)] <= 0.0 {
            continue;
        }

        if next == target {
            let mut found = path.clone();
            found.push(target);
            paths.push(found);
        } else {
            path.push(next);
            on_path[next] = true;
            cursors.push(0);
        }
    }

    paths.sort_by_key(|path| path.len());
    Ok(paths)
}
