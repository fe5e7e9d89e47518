use rayon::prelude::*;

use crate::error::IkcResult;
use crate::graph::{Graph, NodeId};
use crate::progress::{report_guarded, NoopProgress, ProgressSink};

/// Core numbers for every vertex plus the maximum core found.
#[derive(Debug, Clone)]
pub struct KCoreDecomposition {
    /// `core[v]` is the largest `k` such that `v` belongs to some k-core.
    pub core: Vec<u32>,
    pub max_core: u32,
}

impl KCoreDecomposition {
    pub fn core_of(&self, v: NodeId) -> u32 {
        self.core[v as usize]
    }
}

/// Decomposes `graph` without progress reporting.
pub fn decompose(graph: &Graph) -> KCoreDecomposition {
    decompose_with(graph, &mut NoopProgress).expect("NoopProgress never panics")
}

/// Decomposes `graph`, invoking `progress(k)` as the current minimum degree
/// bucket advances. At most `O(max_core)` calls are made; the argument is
/// non-decreasing across calls within a single decomposition (see
/// `DESIGN.md` for how this interacts with the IKC driver's own,
/// non-increasing, cross-iteration `progress(k_max)` reports).
///
/// Runs the initial degree computation on the default (hardware-concurrency)
/// thread pool; use [`decompose_with_concurrency`] to bound that to a
/// configured `num_threads`.
pub fn decompose_with(
    graph: &Graph,
    progress: &mut dyn ProgressSink,
) -> IkcResult<KCoreDecomposition> {
    decompose_with_concurrency(graph, progress, None)
}

/// Same as [`decompose_with`], but runs the initial degree computation — the
/// one data-parallel region the decomposer owns per §5 — on a thread pool
/// sized by `num_threads` (`None` defaults to hardware concurrency) rather
/// than the ambient global Rayon pool. The peeling loop itself stays
/// sequential; it is inherently so.
pub fn decompose_with_concurrency(
    graph: &Graph,
    progress: &mut dyn ProgressSink,
    num_threads: Option<usize>,
) -> IkcResult<KCoreDecomposition> {
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(KCoreDecomposition {
            core: Vec::new(),
            max_core: 0,
        });
    }

    // `core[v]` starts as `deg(v)` and only ever decreases as lower-degree
    // neighbours are peeled ahead of it.
    let pool = crate::concurrency::build_thread_pool(num_threads);
    let mut core: Vec<u32> = pool.install(|| {
        (0..n as NodeId)
            .into_par_iter()
            .map(|v| graph.degree(v) as u32)
            .collect()
    });

    // Bucket-sort vertices by current degree, ascending. Ties broken by
    // internal id for stable, deterministic peeling order.
    let mut nodes: Vec<NodeId> = (0..n as NodeId).collect();
    nodes.sort_by_key(|&v| core[v as usize]);

    let mut node_pos = vec![0usize; n];
    for (i, &v) in nodes.iter().enumerate() {
        node_pos[v as usize] = i;
    }

    let max_degree = core.iter().copied().max().unwrap_or(0) as usize;
    // bin_boundaries[d] is the index in `nodes` where vertices of current
    // degree `d` begin.
    let mut bin_boundaries = vec![0usize; max_degree + 1];
    let mut curr_degree = 0usize;
    for (i, &v) in nodes.iter().enumerate() {
        let d = core[v as usize] as usize;
        if d > curr_degree {
            for boundary in bin_boundaries.iter_mut().take(d + 1).skip(curr_degree + 1) {
                *boundary = i;
            }
            curr_degree = d;
        }
    }

    let mut reported_max = 0u32;
    for i in 0..n {
        let v = nodes[i];
        let v_core = core[v as usize];
        if v_core > reported_max {
            reported_max = v_core;
            report_guarded(progress, reported_max)?;
        }

        for &u in graph.neighbors(v) {
            if core[u as usize] > v_core {
                let u_pos = node_pos[u as usize];
                let bin_start = bin_boundaries[core[u as usize] as usize];
                let displaced = nodes[bin_start];
                if displaced != u {
                    nodes.swap(bin_start, u_pos);
                    node_pos[u as usize] = bin_start;
                    node_pos[displaced as usize] = u_pos;
                }
                bin_boundaries[core[u as usize] as usize] += 1;
                core[u as usize] -= 1;
            }
        }
    }

    let max_core = core.iter().copied().max().unwrap_or(0);
    Ok(KCoreDecomposition { core, max_core })
}
