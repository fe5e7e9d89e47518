//! Maximal and minimum k-core subgraph search.
//!
//! Every operation has a `*_with` variant that accepts an already-computed
//! [`KCoreDecomposition`] (grounded in the cached-decomposition pattern from
//! `compute_kcore_decomposition()` / `core_numbers=` seen in the reference
//! Python `find_minimum_kcore` calls) and a convenience wrapper that
//! decomposes the graph internally for one-shot queries.

use std::collections::VecDeque;

use crate::graph::{Graph, NodeId};
use crate::kcore::{decompose, KCoreDecomposition};

/// A connected k-core subgraph returned by a search operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KCoreSubgraph {
    pub k: u32,
    /// External vertex ids, in ascending order.
    pub nodes: Vec<u64>,
}

impl KCoreSubgraph {
    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

pub(crate) fn bfs_component(graph: &Graph, core: &[u32], threshold: u32, start: NodeId) -> Vec<NodeId> {
    let mut visited = vec![false; graph.num_vertices()];
    let mut queue = VecDeque::new();
    let mut component = Vec::new();

    visited[start as usize] = true;
    queue.push_back(start);

    while let Some(v) = queue.pop_front() {
        component.push(v);
        for &u in graph.neighbors(v) {
            if !visited[u as usize] && core[u as usize] >= threshold {
                visited[u as usize] = true;
                queue.push_back(u);
            }
        }
    }

    component
}

fn to_external_sorted(graph: &Graph, mut internal: Vec<NodeId>) -> Vec<u64> {
    internal.sort_unstable();
    internal
        .into_iter()
        .map(|v| graph.to_external(v).expect("internal id from this graph"))
        .collect()
}

/// Connected component of `query_ext` in `G[{v : C[v] >= C[query_ext]}]`.
pub fn maximal_kcore_with(
    graph: &Graph,
    decomp: &KCoreDecomposition,
    query_ext: u64,
) -> Option<KCoreSubgraph> {
    let query = graph.to_internal(query_ext)?;
    let k = decomp.core_of(query);
    let component = bfs_component(graph, &decomp.core, k, query);
    Some(KCoreSubgraph {
        k,
        nodes: to_external_sorted(graph, component),
    })
}

pub fn maximal_kcore(graph: &Graph, query_ext: u64) -> Option<KCoreSubgraph> {
    let decomp = decompose(graph);
    maximal_kcore_with(graph, &decomp, query_ext)
}

/// Smallest-by-cardinality connected component of `{v : C[v] >= k}`, ties
/// broken by the smallest minimum external id. `None` if no vertex reaches
/// `k`.
pub fn find_minimum_kcore_with(
    graph: &Graph,
    decomp: &KCoreDecomposition,
    k: u32,
) -> Option<KCoreSubgraph> {
    let mut visited = vec![false; graph.num_vertices()];
    let mut best: Option<Vec<NodeId>> = None;

    for v in 0..graph.num_vertices() as NodeId {
        if visited[v as usize] || decomp.core_of(v) < k {
            continue;
        }
        let component = bfs_component(graph, &decomp.core, k, v);
        for &u in &component {
            visited[u as usize] = true;
        }

        let is_better = match &best {
            None => true,
            Some(current) => {
                component.len() < current.len()
                    || (component.len() == current.len()
                        && min_external(graph, &component) < min_external(graph, current))
            }
        };
        if is_better {
            best = Some(component);
        }
    }

    best.map(|component| KCoreSubgraph {
        k,
        nodes: to_external_sorted(graph, component),
    })
}

fn min_external(graph: &Graph, component: &[NodeId]) -> u64 {
    component
        .iter()
        .map(|&v| graph.to_external(v).expect("internal id from this graph"))
        .min()
        .expect("component is non-empty")
}

pub fn find_minimum_kcore(graph: &Graph, k: u32) -> Option<KCoreSubgraph> {
    let decomp = decompose(graph);
    find_minimum_kcore_with(graph, &decomp, k)
}

/// Connected component of `query_ext` within `{v : C[v] >= k}`; `None` if
/// `query_ext` is unknown or `C[query_ext] < k`.
pub fn find_minimum_kcore_containing_node_with(
    graph: &Graph,
    decomp: &KCoreDecomposition,
    query_ext: u64,
    k: u32,
) -> Option<KCoreSubgraph> {
    let query = graph.to_internal(query_ext)?;
    if decomp.core_of(query) < k {
        return None;
    }
    let component = bfs_component(graph, &decomp.core, k, query);
    Some(KCoreSubgraph {
        k,
        nodes: to_external_sorted(graph, component),
    })
}

pub fn find_minimum_kcore_containing_node(
    graph: &Graph,
    query_ext: u64,
    k: u32,
) -> Option<KCoreSubgraph> {
    let decomp = decompose(graph);
    find_minimum_kcore_containing_node_with(graph, &decomp, query_ext, k)
}
