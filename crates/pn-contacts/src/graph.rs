//! Small undirected simple graph over local node indices `0..n`.
//!
//! Used as scratch space while a group's edges are generated; the finished
//! edge list is mapped back to `PersonId`s and merged into the store.
//! Adjacency is kept in `BTreeSet`s so neighbor iteration order, and hence
//! every random choice made from it, is reproducible.

use std::collections::BTreeSet;

use pn_core::PopRng;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndirectedGraph {
    adj: Vec<BTreeSet<usize>>,
}

impl UndirectedGraph {
    /// `n` isolated nodes.
    pub fn empty(n: usize) -> Self {
        Self { adj: vec![BTreeSet::new(); n] }
    }

    /// Every pair of the `n` nodes connected.
    pub fn complete(n: usize) -> Self {
        let adj = (0..n).map(|i| (0..n).filter(|&j| j != i).collect()).collect();
        Self { adj }
    }

    /// Erdős–Rényi graph: each pair connected independently with probability `p`.
    pub fn gnp(n: usize, p: f64, rng: &mut PopRng) -> Self {
        let mut g = Self::empty(n);
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen_bool(p) {
                    g.add_edge(i, j);
                }
            }
        }
        g
    }

    /// Two-block stochastic block model.  Nodes `0..sizes[0]` form block 0,
    /// the next `sizes[1]` nodes block 1; a pair in blocks `(a, b)` is
    /// connected with probability `p[a][b]`.
    pub fn stochastic_block(sizes: [usize; 2], p: [[f64; 2]; 2], rng: &mut PopRng) -> Self {
        let n = sizes[0] + sizes[1];
        let block = |i: usize| usize::from(i >= sizes[0]);
        let mut g = Self::empty(n);
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen_bool(p[block(i)][block(j)]) {
                    g.add_edge(i, j);
                }
            }
        }
        g
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Self-loops are ignored.
    pub fn add_edge(&mut self, i: usize, j: usize) {
        if i != j {
            self.adj[i].insert(j);
            self.adj[j].insert(i);
        }
    }

    pub fn remove_edge(&mut self, i: usize, j: usize) {
        self.adj[i].remove(&j);
        self.adj[j].remove(&i);
    }

    #[inline]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adj[i].contains(&j)
    }

    #[inline]
    pub fn degree(&self, i: usize) -> usize {
        self.adj[i].len()
    }

    /// Neighbors of `i` in ascending order.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[i].iter().copied()
    }

    /// Each edge once, as `(i, j)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(i, ns)| ns.range(i + 1..).map(move |&j| (i, j)))
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(BTreeSet::len).sum::<usize>() / 2
    }
}
