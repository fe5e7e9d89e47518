//! Iterative peeling of successive maximum k-cores, scored by modularity.

mod modularity;

pub use modularity::modularity;

use std::collections::{HashSet, VecDeque};

use crate::config::IkcConfig;
use crate::error::IkcResult;
use crate::graph::{Graph, NodeId};
use crate::kcore::decompose_with_concurrency;
use crate::progress::{report_guarded, NoopProgress, ProgressSink};
use crate::search::bfs_component;

/// A candidate community emitted by one peel of the IKC loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// External vertex ids, ascending.
    pub nodes: Vec<u64>,
    /// The k-core level at which this cluster was peeled.
    pub k_value: u32,
    pub modularity: f64,
}

pub type Clustering = Vec<Cluster>;

/// Runs the IKC driver without progress reporting.
pub fn run(graph: &Graph, config: &IkcConfig) -> IkcResult<Clustering> {
    run_with(graph, config, &mut NoopProgress)
}

/// Runs the IKC driver, invoking `progress(k_max)` once per outer iteration.
/// `k_max` is non-increasing across these calls, since each iteration peels
/// the current maximum k-core off a strictly shrinking working graph.
///
/// `total_m` and each member's `d_h` contribution are both taken from
/// `graph` itself: a one-shot run over the whole graph, with no outside
/// reference.
pub fn run_with(
    graph: &Graph,
    config: &IkcConfig,
    progress: &mut dyn ProgressSink,
) -> IkcResult<Clustering> {
    let total_m = graph.num_edges() as f64;
    let original_degree: Vec<u32> = (0..graph.num_vertices() as NodeId)
        .map(|v| graph.degree(v) as u32)
        .collect();
    let degree_by_ext = move |ext: u64| -> u32 {
        graph
            .to_internal(ext)
            .map(|v| original_degree[v as usize])
            .unwrap_or(0)
    };
    run_with_reference(graph, &degree_by_ext, total_m, config, progress)
}

/// Runs the IKC driver over `working`, scoring every candidate cluster
/// against an externally supplied, frozen modularity reference: `total_m`
/// (the denominator `m`) and `reference_degree` (each member's degree in
/// whatever graph `total_m` was measured against).
///
/// One-shot callers (`run`/`run_with`) pass `working` as its own reference.
/// The streaming engine (§4.E) instead passes the full persistent graph and
/// its `original_total_m`, captured once at `initial_clustering` and never
/// recomputed, while `working` is a small induced subgraph covering only the
/// region a mutation could have affected. That keeps modularity comparable
/// across a whole streaming session instead of drifting with every update.
pub fn run_with_reference(
    working: &Graph,
    reference_degree: &dyn Fn(u64) -> u32,
    total_m: f64,
    config: &IkcConfig,
    progress: &mut dyn ProgressSink,
) -> IkcResult<Clustering> {
    let graph = working;
    if total_m == 0.0 {
        return Ok(Vec::new());
    }
    let degree_by_ext = |ext: u64| -> u32 { reference_degree(ext) };

    let floor = config.min_k.max(1);
    let mut current = graph.clone();
    let mut clusters: Clustering = Vec::new();

    loop {
        if current.num_vertices() == 0 {
            break;
        }

        let decomp =
            decompose_with_concurrency(&current, &mut NoopProgress, config.num_threads)?;
        if decomp.max_core < floor {
            break;
        }
        report_guarded(progress, decomp.max_core)?;

        let k_max = decomp.max_core;
        let mut visited = vec![false; current.num_vertices()];
        let mut components_ext: Vec<Vec<u64>> = Vec::new();

        for v in 0..current.num_vertices() as NodeId {
            if visited[v as usize] || decomp.core_of(v) < k_max {
                continue;
            }
            let component = bfs_component(&current, &decomp.core, k_max, v);
            for &u in &component {
                visited[u as usize] = true;
            }
            let mut ext: Vec<u64> = component
                .iter()
                .map(|&u| current.to_external(u).expect("internal id from current graph"))
                .collect();
            ext.sort_unstable();
            components_ext.push(ext);
        }

        components_ext.sort_by_key(|c| c[0]);

        for comp_ext in &components_ext {
            let e_h = count_internal_edges(&current, comp_ext);
            let d_h: u64 = comp_ext.iter().map(|&ext| degree_by_ext(ext) as u64).sum();
            let q = modularity(e_h, d_h, total_m);
            if q > 0.0 {
                clusters.push(Cluster {
                    nodes: comp_ext.clone(),
                    k_value: k_max,
                    modularity: q,
                });
            }
        }

        let peeled: HashSet<u64> = components_ext.into_iter().flatten().collect();
        current = induced_subgraph_excluding(&current, &peeled);
    }

    Ok(clusters)
}

/// Runs the peel + modularity-filter loop over a restricted candidate
/// vertex set, reusing core numbers already computed for the *whole*
/// `graph` rather than re-decomposing a vertex-pruned subgraph.
///
/// `induced_subgraph_on`-style re-decomposition silently drops edges from
/// a candidate to an excluded, still-valid cluster member; since core
/// numbers are monotone in edge count, that can understate a candidate's
/// true core level and fail to re-form a cluster a from-scratch run would
/// produce. Connectivity here is instead traced through `graph`'s real
/// adjacency, filtered to vertices that are both still in `candidates`
/// (not yet peeled by an earlier iteration of this same call) and whose
/// precomputed `core[v] >= k_max`.
pub fn run_localized(
    graph: &Graph,
    core: &[u32],
    candidates: &HashSet<NodeId>,
    reference_degree: &dyn Fn(u64) -> u32,
    total_m: f64,
    config: &IkcConfig,
    progress: &mut dyn ProgressSink,
) -> IkcResult<Clustering> {
    if total_m == 0.0 {
        return Ok(Vec::new());
    }

    let floor = config.min_k.max(1);
    let mut remaining: HashSet<NodeId> = candidates.clone();
    let mut clusters: Clustering = Vec::new();

    loop {
        let k_max = remaining.iter().map(|&v| core[v as usize]).max().unwrap_or(0);
        if k_max < floor {
            break;
        }
        report_guarded(progress, k_max)?;

        let seeds: Vec<NodeId> = remaining
            .iter()
            .copied()
            .filter(|&v| core[v as usize] >= k_max)
            .collect();

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut components_ext: Vec<Vec<u64>> = Vec::new();

        for v in seeds {
            if visited.contains(&v) {
                continue;
            }
            let component = bfs_component_restricted(graph, core, &remaining, k_max, v);
            for &u in &component {
                visited.insert(u);
            }
            let mut ext: Vec<u64> = component
                .iter()
                .map(|&u| graph.to_external(u).expect("internal id from graph"))
                .collect();
            ext.sort_unstable();
            components_ext.push(ext);
        }

        components_ext.sort_by_key(|c| c[0]);

        for comp_ext in &components_ext {
            let e_h = count_internal_edges(graph, comp_ext);
            let d_h: u64 = comp_ext.iter().map(|&ext| reference_degree(ext) as u64).sum();
            let q = modularity(e_h, d_h, total_m);
            if q > 0.0 {
                clusters.push(Cluster {
                    nodes: comp_ext.clone(),
                    k_value: k_max,
                    modularity: q,
                });
            }
        }

        if components_ext.is_empty() {
            break;
        }
        for comp_ext in &components_ext {
            for &ext in comp_ext {
                if let Some(v) = graph.to_internal(ext) {
                    remaining.remove(&v);
                }
            }
        }
    }

    Ok(clusters)
}

/// Breadth-first search over `graph`'s real adjacency, restricted to
/// vertices that are both in `allowed` and meet the core threshold.
fn bfs_component_restricted(
    graph: &Graph,
    core: &[u32],
    allowed: &HashSet<NodeId>,
    threshold: u32,
    start: NodeId,
) -> Vec<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    let mut component = Vec::new();

    while let Some(v) = queue.pop_front() {
        component.push(v);
        for &u in graph.neighbors(v) {
            if !visited.contains(&u) && allowed.contains(&u) && core[u as usize] >= threshold {
                visited.insert(u);
                queue.push_back(u);
            }
        }
    }

    component
}

fn count_internal_edges(graph: &Graph, members_ext: &[u64]) -> u64 {
    let members: HashSet<NodeId> = members_ext
        .iter()
        .map(|&ext| graph.to_internal(ext).expect("member of current graph"))
        .collect();
    let mut count = 0u64;
    for &v in &members {
        for &u in graph.neighbors(v) {
            if members.contains(&u) && u > v {
                count += 1;
            }
        }
    }
    count
}

/// Builds the next working graph by dropping every edge touching `exclude`.
/// Vertices left with no surviving edges are simply absent from the result,
/// which is equivalent to being present with degree 0 for every purpose the
/// driver cares about (they can never re-enter a k-core with k >= 1).
fn induced_subgraph_excluding(graph: &Graph, exclude: &HashSet<u64>) -> Graph {
    let mut result = Graph::new();
    for (u, v) in graph.edges_internal() {
        let u_ext = graph.to_external(u).expect("internal id from graph");
        let v_ext = graph.to_external(v).expect("internal id from graph");
        if exclude.contains(&u_ext) || exclude.contains(&v_ext) {
            continue;
        }
        result.insert_edge(u_ext, v_ext);
    }
    result
}
