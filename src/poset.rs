// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Containment between congruences given as action graphs.

use crate::graph::ActionGraph;

/// Whether the congruence of `g` is contained in the congruence of `h`.
///
/// This holds exactly when sending the root of `g` to the root of `h`
/// extends to a map of nodes that commutes with every letter. Both graphs
/// must be complete, over the same alphabet, with every node reachable.
pub fn is_contained(g: &ActionGraph, h: &ActionGraph) -> bool {
    if g.out_degree() != h.out_degree() || g.number_of_nodes() == 0 || h.number_of_nodes() == 0 {
        return false;
    }
    let mut image: Vec<Option<usize>> = vec![None; g.number_of_nodes()];
    image[0] = Some(0);
    let mut stack = vec![0];
    while let Some(x) = stack.pop() {
        let Some(fx) = image[x] else { continue };
        for a in 0..g.out_degree() {
            let (Some(y), Some(z)) = (g.target(x, a), h.target(fx, a)) else {
                return false;
            };
            match image[y] {
                Some(fy) if fy != z => return false,
                Some(_) => {}
                None => {
                    image[y] = Some(z);
                    stack.push(y);
                }
            }
        }
    }
    true
}

/// Covering relation of the containment order on `graphs`.
///
/// Entry `[i][j]` is `true` when the congruence of `graphs[i]` is strictly
/// contained in that of `graphs[j]` with no congruence of the list strictly
/// between them. Graphs describing the same congruence are never related.
pub fn poset(graphs: &[ActionGraph]) -> Vec<Vec<bool>> {
    let n = graphs.len();
    let le: Vec<Vec<bool>> = graphs
        .iter()
        .map(|g| graphs.iter().map(|h| is_contained(g, h)).collect())
        .collect();
    let below = |i: usize, j: usize| i != j && le[i][j] && !le[j][i];

    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| below(i, j) && !(0..n).any(|k| below(i, k) && below(k, j)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_is_below_the_universal_congruence() {
        let universal = ActionGraph::from_rows(2, &[[0, 0]]);
        let g = ActionGraph::from_rows(2, &[[1, 0], [1, 1]]);
        assert!(is_contained(&g, &universal));
        assert!(!is_contained(&universal, &g));
        assert!(is_contained(&g, &g));
    }

    #[test]
    fn test_incomparable_congruences() {
        let g = ActionGraph::from_rows(2, &[[0, 1], [0, 1]]);
        let h = ActionGraph::from_rows(2, &[[1, 0], [1, 0]]);
        assert!(!is_contained(&g, &h));
        assert!(!is_contained(&h, &g));
    }

    #[test]
    fn test_covering_skips_transitive_edges() {
        let top = ActionGraph::from_rows(1, &[[0]]);
        let middle = ActionGraph::from_rows(1, &[[1], [0]]);
        let bottom = ActionGraph::from_rows(1, &[[1], [2], [3], [0]]);
        let matrix = poset(&[top, middle, bottom]);
        assert_eq!(
            matrix,
            vec![
                vec![false, false, false],
                vec![true, false, false],
                vec![false, true, false],
            ]
        );
    }
}
