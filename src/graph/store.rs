use super::id_map::{IdMap, NodeId};
use rayon::prelude::*;
use std::collections::HashSet;

/// Undirected, unweighted, simple graph (no self-loops, no parallel edges).
///
/// Adjacency is stored as a growable sequence of internal ids per vertex,
/// paralleling the CSR-style `RelationshipTopology` the decomposer and
/// driver expect, except mutable: `insert_edge` may append to the tail of
/// any vertex's adjacency at any time, which is what makes the streaming
/// engine's incremental updates (§4.E) possible.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    id_map: IdMap,
    adjacency: Vec<Vec<NodeId>>,
    edges: HashSet<(NodeId, NodeId)>,
}

fn canonical(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: returns the existing internal id if `ext_id` is already
    /// known.
    pub fn insert_vertex(&mut self, ext_id: u64) -> NodeId {
        let internal = self.id_map.insert(ext_id);
        if internal as usize >= self.adjacency.len() {
            self.adjacency.push(Vec::new());
        }
        internal
    }

    /// Inserts both endpoints if absent, then links them. Self-loops and
    /// duplicate edges are silently ignored.
    pub fn insert_edge(&mut self, u_ext: u64, v_ext: u64) {
        let u = self.insert_vertex(u_ext);
        let v = self.insert_vertex(v_ext);
        if u == v {
            return;
        }
        let key = canonical(u, v);
        if !self.edges.insert(key) {
            return;
        }
        self.adjacency[u as usize].push(v);
        self.adjacency[v as usize].push(u);
    }

    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, v: NodeId) -> usize {
        self.adjacency[v as usize].len()
    }

    pub fn neighbors(&self, v: NodeId) -> &[NodeId] {
        &self.adjacency[v as usize]
    }

    pub fn to_external(&self, v: NodeId) -> Option<u64> {
        self.id_map.to_external(v)
    }

    pub fn to_internal(&self, ext_id: u64) -> Option<NodeId> {
        self.id_map.to_internal(ext_id)
    }

    pub fn contains_vertex(&self, ext_id: u64) -> bool {
        self.id_map.contains(ext_id)
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edges.contains(&canonical(u, v))
    }

    /// Iterates every edge exactly once, as canonical `(min, max)` internal
    /// id pairs.
    pub fn edges_internal(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    /// Sorts every vertex's adjacency list in parallel, on a thread pool
    /// sized by `num_threads` (`None` defaults to hardware concurrency).
    /// Not required for correctness, but the subgraph search operations
    /// (§4.C) read faster over sorted adjacency and it keeps ascending-id
    /// tie-breaking cheap.
    pub fn sort_adjacency_parallel(&mut self, num_threads: Option<usize>) {
        let pool = crate::concurrency::build_thread_pool(num_threads);
        let adjacency = &mut self.adjacency;
        pool.install(|| {
            adjacency.par_iter_mut().for_each(|adj| {
                adj.sort_unstable();
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_edge_links_both_endpoints() {
        let mut g = Graph::new();
        g.insert_edge(1, 2);
        let u = g.to_internal(1).unwrap();
        let v = g.to_internal(2).unwrap();
        assert!(g.neighbors(u).contains(&v));
        assert!(g.neighbors(v).contains(&u));
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.num_vertices(), 2);
    }

    #[test]
    fn ignores_self_loops() {
        let mut g = Graph::new();
        g.insert_edge(1, 1);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.num_vertices(), 1);
    }

    #[test]
    fn ignores_duplicate_edges() {
        let mut g = Graph::new();
        g.insert_edge(1, 2);
        g.insert_edge(2, 1);
        g.insert_edge(1, 2);
        assert_eq!(g.num_edges(), 1);
        let u = g.to_internal(1).unwrap();
        assert_eq!(g.degree(u), 1);
    }

    #[test]
    fn insert_vertex_is_idempotent() {
        let mut g = Graph::new();
        let a = g.insert_vertex(5);
        let b = g.insert_vertex(5);
        assert_eq!(a, b);
        assert_eq!(g.num_vertices(), 1);
    }

    #[test]
    fn degree_sum_is_twice_edge_count() {
        let mut g = Graph::new();
        for (u, v) in [(0u64, 1u64), (1, 2), (2, 0), (3, 4)] {
            g.insert_edge(u, v);
        }
        let total_degree: usize = (0..g.num_vertices() as NodeId).map(|v| g.degree(v)).sum();
        assert_eq!(total_degree, 2 * g.num_edges());
    }

    #[test]
    fn sort_adjacency_parallel_orders_neighbors() {
        let mut g = Graph::new();
        for (u, v) in [(0u64, 3u64), (0, 1), (0, 2)] {
            g.insert_edge(u, v);
        }
        g.sort_adjacency_parallel(Some(2));
        let zero = g.to_internal(0).unwrap();
        let mut expected = g.neighbors(zero).to_vec();
        expected.sort_unstable();
        assert_eq!(g.neighbors(zero), expected.as_slice());
    }
}
