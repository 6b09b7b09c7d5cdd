//! Bipartite Group Contact Builder.
//!
//! Connects two disjoint sub-populations (e.g. facility residents and staff)
//! so the combined graph has a target average degree, with an optional
//! guarantee that every member of group 1 reaches group 2.
//!
//! # Regimes (n = |group 1| + |group 2|, d = average degree)
//!
//! | Condition         | Graph                                                      |
//! |-------------------|------------------------------------------------------------|
//! | `n <= d`          | complete graph                                             |
//! | `|group 2| == 1`  | complete graph, then group-1 nodes above `d` group-1       |
//! |                   | neighbors lose random group-1 edges (the edge to the lone  |
//! |                   | group-2 member is never cut)                               |
//! | otherwise         | two-block SBM with `p = d / n` on every block (or the      |
//! |                   | caller's matrix), then cross-edge repair                   |
//!
//! # Cross-edge repair
//!
//! Each group-1 node without a group-2 neighbor is linked to a random group-2
//! node `j`.  If `j` has group-2 neighbors, one of those edges is cut at
//! random to roughly keep `j`'s degree; otherwise `j` simply gains an edge.
//! The heuristic does not conserve the average degree exactly and can leave a
//! group-2 node isolated for lopsided group sizes.

use tracing::debug;

use pn_core::{PersonId, PnError, PnResult, PopRng};

use crate::UndirectedGraph;

/// Parameters for [`two_group_contacts`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoGroupParams {
    /// Target average degree across both groups.  Must be ≥ 2.
    pub average_degree: usize,

    /// Edge probabilities `p[a][b]` between blocks `a` and `b` (0 = group 1).
    /// `None` uses `average_degree / n` everywhere.
    pub p_matrix: Option<[[f64; 2]; 2]>,

    /// Give every group-1 member at least one group-2 contact.
    pub force_cross_edges: bool,
}

impl Default for TwoGroupParams {
    fn default() -> Self {
        Self {
            average_degree:    20,
            p_matrix:          None,
            force_cross_edges: true,
        }
    }
}

/// Build the undirected edge list connecting `group_1` and `group_2`.
///
/// Each edge appears once.  Fails with `EmptyGroup` if either group is empty
/// and with `DegreeTooLow` if `average_degree < 2`.
pub fn two_group_contacts(
    group_1: &[PersonId],
    group_2: &[PersonId],
    params:  &TwoGroupParams,
    rng:     &mut PopRng,
) -> PnResult<Vec<(PersonId, PersonId)>> {
    if group_1.is_empty() {
        return Err(PnError::EmptyGroup { which: "group 1" });
    }
    if group_2.is_empty() {
        return Err(PnError::EmptyGroup { which: "group 2" });
    }
    let d = params.average_degree;
    if d < 2 {
        return Err(PnError::DegreeTooLow { degree: d });
    }

    let n1 = group_1.len();
    let n = n1 + group_2.len();

    let graph = if n <= d {
        debug!(n, d, "group no larger than target degree; using complete graph");
        UndirectedGraph::complete(n)
    } else if group_2.len() < 2 {
        complete_with_group_1_cut(n1, n, d, rng)
    } else {
        let p = params.p_matrix.unwrap_or([[d as f64 / n as f64; 2]; 2]);
        let mut g = UndirectedGraph::stochastic_block([n1, group_2.len()], p, rng);
        if params.force_cross_edges {
            force_cross_edges(&mut g, n1, rng);
        }
        g
    };

    let uid = |i: usize| if i < n1 { group_1[i] } else { group_2[i - n1] };
    Ok(graph.edges().map(|(i, j)| (uid(i), uid(j))).collect())
}

/// Complete graph, then trim each group-1 node's group-1 neighbors to `d`.
fn complete_with_group_1_cut(n1: usize, n: usize, d: usize, rng: &mut PopRng) -> UndirectedGraph {
    let mut g = UndirectedGraph::complete(n);
    for i in 0..n1 {
        let mut group_1_neighbors: Vec<usize> = g.neighbors(i).filter(|&j| j < n1).collect();
        if group_1_neighbors.len() <= d {
            continue;
        }
        let cut = group_1_neighbors.len() - d;
        for _ in 0..cut {
            let k = rng.gen_range(0..group_1_neighbors.len());
            let j = group_1_neighbors.swap_remove(k);
            g.remove_edge(i, j);
        }
    }
    g
}

fn force_cross_edges(g: &mut UndirectedGraph, n1: usize, rng: &mut PopRng) {
    let n = g.node_count();
    let mut forced = 0usize;
    for i in 0..n1 {
        if g.neighbors(i).any(|j| j >= n1) {
            continue;
        }
        let j = rng.gen_range(n1..n);
        let group_2_neighbors: Vec<usize> = g.neighbors(j).filter(|&k| k >= n1).collect();
        g.add_edge(i, j);
        if let Some(&k) = rng.choose(&group_2_neighbors) {
            g.remove_edge(j, k);
        }
        forced += 1;
    }
    debug!(forced, "forced cross-group edges");
}
