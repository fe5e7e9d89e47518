use std::collections::HashSet;
use std::time::Instant;

use crate::config::IkcConfig;
use crate::error::{IkcError, IkcResult};
use crate::graph::{Graph, NodeId};
use crate::ikc::{self, Cluster, Clustering};
use crate::kcore::decompose_with_concurrency;
use crate::progress::{NoopProgress, ProgressSink};

use super::stats::UpdateStats;

/// `Normal → Clustered → Batching → Clustered`, per §4.E's state diagram.
/// Mutating APIs reject calls made from the wrong state with a typed error
/// rather than a runtime assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Normal,
    Clustered,
    Batching,
}

/// Owns a persistent graph plus its core numbers and clustering, and
/// maintains both incrementally as edges and vertices are added.
///
/// Modularity stays comparable across the whole session: `original_total_m`
/// is captured once, at `initial_clustering`, and never recomputed (the
/// frozen semantics this spec mandates over re-basing on the current |E|
/// at every update).
pub struct StreamingEngine {
    graph: Graph,
    core: Vec<u32>,
    clustering: Clustering,
    cluster_of: Vec<Option<usize>>,
    original_total_m: Option<f64>,
    /// Per-vertex degree in the graph as it stood at `initial_clustering`,
    /// indexed by internal id (stable once assigned). Vertices created
    /// later have no entry and contribute 0: the modularity reference is
    /// the one frozen graph, not a moving target.
    original_degree: Vec<u32>,
    config: IkcConfig,
    state: StreamState,
    pending_new_edges: Vec<(NodeId, NodeId)>,
    last_stats: Option<UpdateStats>,
}

impl StreamingEngine {
    pub fn new(config: IkcConfig) -> Self {
        Self {
            graph: Graph::new(),
            core: Vec::new(),
            clustering: Vec::new(),
            cluster_of: Vec::new(),
            original_total_m: None,
            original_degree: Vec::new(),
            config,
            state: StreamState::Normal,
            pending_new_edges: Vec::new(),
            last_stats: None,
        }
    }

    /// Bulk-loads edges before the first clustering. Only valid in
    /// [`StreamState::Normal`]; there is nothing yet to invalidate, so this
    /// bypasses the incremental machinery entirely.
    pub fn load_edges(&mut self, edges: impl IntoIterator<Item = (u64, u64)>) -> IkcResult<()> {
        if self.state != StreamState::Normal {
            return Err(IkcError::BatchStateViolation);
        }
        for (u, v) in edges {
            self.graph.insert_edge(u, v);
        }
        Ok(())
    }

    // -- read-only accessors -------------------------------------------

    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    pub fn max_core(&self) -> u32 {
        self.core.iter().copied().max().unwrap_or(0)
    }

    pub fn last_stats(&self) -> Option<UpdateStats> {
        self.last_stats
    }

    pub fn is_batch_mode(&self) -> bool {
        self.state == StreamState::Batching
    }

    pub fn clustering(&self) -> &Clustering {
        &self.clustering
    }

    /// Current core number of an external vertex id, or 0 if unknown.
    pub fn core_of_external(&self, ext_id: u64) -> u32 {
        self.graph
            .to_internal(ext_id)
            .map(|v| self.core[v as usize])
            .unwrap_or(0)
    }

    // -- lifecycle --------------------------------------------------------

    /// Equivalent to running the IKC driver on the graph as loaded so far;
    /// populates `cluster_of` and freezes `original_total_m := |E|`.
    pub fn initial_clustering(&mut self, verbose: bool) -> IkcResult<&Clustering> {
        self.initial_clustering_with(verbose, &mut NoopProgress)
    }

    pub fn initial_clustering_with(
        &mut self,
        verbose: bool,
        progress: &mut dyn ProgressSink,
    ) -> IkcResult<&Clustering> {
        if self.state == StreamState::Batching {
            return Err(IkcError::BatchStateViolation);
        }

        let decomp =
            decompose_with_concurrency(&self.graph, &mut NoopProgress, self.config.num_threads)?;
        self.core = decomp.core;
        self.original_total_m = Some(self.graph.num_edges() as f64);
        self.original_degree = (0..self.graph.num_vertices() as NodeId)
            .map(|v| self.graph.degree(v) as u32)
            .collect();
        self.clustering = ikc::run_with(&self.graph, &self.config, progress)?;
        self.rebuild_cluster_of();
        self.state = StreamState::Clustered;
        if verbose {
            log::info!(
                "initial_clustering: {} vertices, {} edges, {} clusters, max_core={}",
                self.graph.num_vertices(),
                self.graph.num_edges(),
                self.clustering.len(),
                self.max_core(),
            );
        }
        Ok(&self.clustering)
    }

    // -- mutating APIs ------------------------------------------------------

    pub fn add_edges(
        &mut self,
        edges: &[(u64, u64)],
        recompute: bool,
        verbose: bool,
    ) -> IkcResult<&Clustering> {
        self.require_initialized()?;
        self.insert_edges_tracked(edges);
        self.maybe_recompute(recompute, verbose)
    }

    pub fn add_nodes(
        &mut self,
        nodes: &[u64],
        recompute: bool,
        verbose: bool,
    ) -> IkcResult<&Clustering> {
        self.require_initialized()?;
        for &ext in nodes {
            self.graph.insert_vertex(ext);
        }
        self.sync_core_len();
        self.maybe_recompute(recompute, verbose)
    }

    /// Atomic: validates every edge endpoint is either already known or
    /// listed in `nodes` before mutating anything. No partial update is
    /// observable on failure.
    pub fn update(
        &mut self,
        edges: &[(u64, u64)],
        nodes: &[u64],
        verbose: bool,
    ) -> IkcResult<&Clustering> {
        self.require_initialized()?;
        let declared: HashSet<u64> = nodes.iter().copied().collect();
        for &(u, v) in edges {
            for ext in [u, v] {
                if !self.graph.contains_vertex(ext) && !declared.contains(&ext) {
                    return Err(IkcError::EdgeReferencesUnknownVertex(ext));
                }
            }
        }
        for &ext in nodes {
            self.graph.insert_vertex(ext);
        }
        self.sync_core_len();
        self.insert_edges_tracked(edges);
        self.maybe_recompute(true, verbose)
    }

    /// Idempotent: a no-op if already batching.
    pub fn begin_batch(&mut self) -> IkcResult<()> {
        match self.state {
            StreamState::Normal => Err(IkcError::NotInitialized),
            StreamState::Batching => Ok(()),
            StreamState::Clustered => {
                self.state = StreamState::Batching;
                self.pending_new_edges.clear();
                Ok(())
            }
        }
    }

    pub fn commit_batch(&mut self, verbose: bool) -> IkcResult<&Clustering> {
        if self.state != StreamState::Batching {
            return Err(IkcError::BatchStateViolation);
        }
        self.state = StreamState::Clustered;
        self.recompute_and_reemit(verbose)?;
        Ok(&self.clustering)
    }

    // -- internals --------------------------------------------------------

    fn require_initialized(&self) -> IkcResult<()> {
        if self.state == StreamState::Normal {
            Err(IkcError::NotInitialized)
        } else {
            Ok(())
        }
    }

    fn sync_core_len(&mut self) {
        self.core.resize(self.graph.num_vertices(), 0);
    }

    /// Inserts edges (creating endpoints on demand) and records which ones
    /// are genuinely new, both for this call's recompute and, in batch
    /// mode, accumulated across the whole batch.
    fn insert_edges_tracked(&mut self, edges: &[(u64, u64)]) {
        for &(u_ext, v_ext) in edges {
            let u = self.graph.insert_vertex(u_ext);
            let v = self.graph.insert_vertex(v_ext);
            if u == v || self.graph.has_edge(u, v) {
                continue;
            }
            self.graph.insert_edge(u_ext, v_ext);
            self.pending_new_edges.push((u, v));
        }
        self.sync_core_len();
    }

    fn maybe_recompute(&mut self, recompute: bool, verbose: bool) -> IkcResult<&Clustering> {
        if self.state == StreamState::Batching || !recompute {
            return Ok(&self.clustering);
        }
        self.recompute_and_reemit(verbose)?;
        Ok(&self.clustering)
    }

    fn rebuild_cluster_of(&mut self) {
        self.cluster_of = vec![None; self.graph.num_vertices()];
        for (idx, cluster) in self.clustering.iter().enumerate() {
            for &ext in &cluster.nodes {
                if let Some(v) = self.graph.to_internal(ext) {
                    self.cluster_of[v as usize] = Some(idx);
                }
            }
        }
    }

    /// Applies §4.E's incremental recompute algorithm to the edges buffered
    /// since the last commit (or since the last non-batch mutating call).
    fn recompute_and_reemit(&mut self, verbose: bool) -> IkcResult<()> {
        let total_start = Instant::now();
        let old_core = self.core.clone();

        // Step 1 already happened: mutations were applied eagerly by the
        // caller. Step 2-3: affected seed set and its floor.
        let new_edges = std::mem::take(&mut self.pending_new_edges);
        if new_edges.is_empty() {
            self.last_stats = Some(UpdateStats::unchanged(self.clustering.len()));
            return Ok(());
        }

        let recompute_start = Instant::now();

        // Ground-truth core-number recompute over the whole persistent
        // graph (§4.E permits "running the full decomposer on the affected
        // region" as a correct, simpler alternative to hand-tracking
        // cross-boundary degree contributions). The candidate re-emission
        // below is what actually restricts its search space; this step
        // just keeps `self.core` globally correct for it to reuse.
        let decomp =
            decompose_with_concurrency(&self.graph, &mut NoopProgress, self.config.num_threads)?;
        self.core = decomp.core;

        let mut affected_nodes = 0usize;
        for v in 0..self.graph.num_vertices() {
            if old_core.get(v).copied().unwrap_or(0) != self.core[v] {
                affected_nodes += 1;
            }
        }

        let touched: HashSet<NodeId> = new_edges
            .iter()
            .flat_map(|&(u, v)| [u, v].into_iter())
            .collect();

        // Step 5-6: invalidate clusters touched by a new edge; detect
        // merges among pairs of distinct clusters joined by one.
        let mut invalidated: HashSet<usize> = HashSet::new();
        for &v in &touched {
            if let Some(Some(idx)) = self.cluster_of.get(v as usize) {
                invalidated.insert(*idx);
            }
        }
        let mut merge_pairs: HashSet<(usize, usize)> = HashSet::new();
        for &(u, v) in &new_edges {
            if let (Some(Some(iu)), Some(Some(iv))) =
                (self.cluster_of.get(u as usize), self.cluster_of.get(v as usize))
            {
                if iu != iv {
                    let pair = if iu < iv { (*iu, *iv) } else { (*iv, *iu) };
                    merge_pairs.insert(pair);
                }
            }
        }

        let valid_clusters = self.clustering.len() - invalidated.len();

        // Step 7: localized re-emission over invalidated members plus
        // previously unclustered vertices that now qualify.
        let floor = self.config.min_k.max(1);
        let mut candidates: HashSet<NodeId> = HashSet::new();
        for &idx in &invalidated {
            for &ext in &self.clustering[idx].nodes {
                if let Some(v) = self.graph.to_internal(ext) {
                    candidates.insert(v);
                }
            }
        }
        for v in 0..self.graph.num_vertices() as NodeId {
            if self.cluster_of[v as usize].is_none() && self.core[v as usize] >= floor {
                candidates.insert(v);
            }
        }

        let kept: Clustering = self
            .clustering
            .iter()
            .enumerate()
            .filter(|(idx, _)| !invalidated.contains(idx))
            .map(|(_, c)| c.clone())
            .collect();

        let new_clusters = if candidates.is_empty() {
            Vec::new()
        } else {
            // Reuses `self.core`, already recomputed for the whole graph
            // above, instead of re-decomposing a vertex-pruned subgraph:
            // pruning would drop edges from a candidate to an excluded,
            // still-valid cluster member and could understate that
            // candidate's true (monotone-in-edges) core number.
            let total_m = self
                .original_total_m
                .expect("recompute only runs after initial_clustering");
            let reference_degree = |ext: u64| -> u32 {
                self.graph
                    .to_internal(ext)
                    .and_then(|v| self.original_degree.get(v as usize).copied())
                    .unwrap_or(0)
            };
            ikc::run_localized(
                &self.graph,
                &self.core,
                &candidates,
                &reference_degree,
                total_m,
                &self.config,
                &mut NoopProgress,
            )?
        };

        self.clustering = kept;
        self.clustering.extend(new_clusters);
        self.rebuild_cluster_of();

        let recompute_time_ms = recompute_start.elapsed().as_secs_f64() * 1000.0;
        let total_time_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        let stats = UpdateStats {
            affected_nodes,
            invalidated_clusters: invalidated.len(),
            valid_clusters,
            merge_candidates: merge_pairs.len(),
            recompute_time_ms,
            total_time_ms,
        };
        if verbose {
            log::info!("streaming update: {}", stats);
        }
        self.last_stats = Some(stats);
        Ok(())
    }

    /// Debug aid satisfying §4.E's equivalence requirement: reruns the IKC
    /// driver on the whole graph under the same frozen `total_m` and
    /// compares the resulting partition (as node sets, ignoring order)
    /// against the incrementally maintained clustering. Not on any hot
    /// path; intended for tests.
    pub fn debug_check_equivalence(&self) -> IkcResult<bool> {
        let total_m = match self.original_total_m {
            Some(m) => m,
            None => return Ok(self.clustering.is_empty()),
        };
        let reference_degree = |ext: u64| -> u32 {
            self.graph
                .to_internal(ext)
                .and_then(|v| self.original_degree.get(v as usize).copied())
                .unwrap_or(0)
        };
        let from_scratch = ikc::run_with_reference(
            &self.graph,
            &reference_degree,
            total_m,
            &self.config,
            &mut NoopProgress,
        )?;
        Ok(same_partition(&from_scratch, &self.clustering))
    }
}

fn same_partition(a: &Clustering, b: &Clustering) -> bool {
    let mut a_sets: Vec<&Cluster> = a.iter().collect();
    let mut b_sets: Vec<&Cluster> = b.iter().collect();
    a_sets.sort_by_key(|c| c.nodes.first().copied());
    b_sets.sort_by_key(|c| c.nodes.first().copied());
    if a_sets.len() != b_sets.len() {
        return false;
    }
    a_sets.iter().zip(b_sets.iter()).all(|(x, y)| {
        x.nodes == y.nodes
            && x.k_value == y.k_value
            && (x.modularity - y.modularity).abs() < 1e-9
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(edges: &[(u64, u64)], min_k: u32) -> StreamingEngine {
        let config = IkcConfig::builder().min_k(min_k).build();
        let mut engine = StreamingEngine::new(config);
        engine.load_edges(edges.iter().copied()).unwrap();
        engine.initial_clustering(false).unwrap();
        engine
    }

    #[test]
    fn mutating_before_initial_clustering_is_rejected() {
        let config = IkcConfig::builder().min_k(2).build();
        let mut engine = StreamingEngine::new(config);
        let result = engine.add_edges(&[(0, 1)], true, false);
        assert!(matches!(result, Err(IkcError::NotInitialized)));
    }

    #[test]
    fn commit_batch_outside_batch_is_rejected() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0)], 2);
        let result = engine.commit_batch(false);
        assert!(matches!(result, Err(IkcError::BatchStateViolation)));
    }

    #[test]
    fn begin_batch_is_idempotent() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0)], 2);
        engine.begin_batch().unwrap();
        engine.begin_batch().unwrap();
        assert!(engine.is_batch_mode());
    }

    #[test]
    fn streaming_bridge_creates_merge() {
        // Scenario 4: two disconnected triangles, then a bridge (2,10).
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0), (10, 11), (11, 12), (12, 10)], 2);
        assert_eq!(engine.clustering().len(), 2);

        engine.add_edges(&[(2, 10)], true, false).unwrap();
        let stats = engine.last_stats().unwrap();
        assert!(stats.invalidated_clusters >= 2);
        assert!(stats.merge_candidates >= 1);
        assert_eq!(engine.clustering().len(), 1);
        assert_eq!(engine.clustering()[0].nodes.len(), 6);
    }

    #[test]
    fn add_nodes_with_no_new_edges_reports_existing_clusters_as_valid() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0), (10, 11), (11, 12), (12, 10)], 2);
        assert_eq!(engine.clustering().len(), 2);

        engine.add_nodes(&[99], true, false).unwrap();
        let stats = engine.last_stats().unwrap();
        assert_eq!(stats.affected_nodes, 0);
        assert_eq!(stats.invalidated_clusters, 0);
        assert_eq!(stats.valid_clusters, 2);
        assert_eq!(engine.clustering().len(), 2);
    }

    #[test]
    fn streaming_isolated_nodes_leave_prior_cluster_valid() {
        // Scenario 5: triangle+square bridged, then a fresh disjoint triangle.
        // A disjoint sparse background component keeps the bridged
        // community's initial modularity positive (see the analogous
        // comment in `ikc::tests`); it stays core-1 and never clusters.
        let mut engine = engine_with(
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (3, 4),
                (4, 5),
                (5, 6),
                (6, 3),
                (2, 3),
                (50, 51),
                (51, 52),
                (52, 53),
                (53, 54),
                (54, 55),
            ],
            2,
        );
        assert_eq!(engine.clustering().len(), 1);

        engine.add_nodes(&[99, 100, 101], true, false).unwrap();
        engine
            .add_edges(&[(99, 100), (100, 101), (101, 99)], true, false)
            .unwrap();

        let stats = engine.last_stats().unwrap();
        assert!(stats.valid_clusters >= 1);
        assert_eq!(engine.clustering().len(), 2);
        let mut sizes: Vec<usize> = engine.clustering().iter().map(|c| c.nodes.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 7]);
    }

    #[test]
    fn update_rejects_edge_to_unknown_vertex() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0)], 2);
        let result = engine.update(&[(0, 999)], &[], false);
        assert!(matches!(
            result,
            Err(IkcError::EdgeReferencesUnknownVertex(999))
        ));
        // Rejected atomically: the vertex must not have been created.
        assert!(!engine.graph.contains_vertex(999));
    }

    #[test]
    fn update_accepts_edge_to_declared_new_vertex() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0)], 2);
        engine.update(&[(0, 50)], &[50], false).unwrap();
        assert!(engine.num_vertices() == 4);
    }

    #[test]
    fn core_numbers_never_decrease_after_additions() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0)], 2);
        let before = engine.core.clone();
        engine
            .add_edges(&[(0, 3), (1, 3), (2, 3)], true, false)
            .unwrap();
        for (v, &old) in before.iter().enumerate() {
            assert!(engine.core[v] >= old);
        }
    }

    #[test]
    fn idempotent_reinsertion_does_not_change_graph() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0)], 2);
        let edges_before = engine.num_edges();
        let clustering_before = engine.clustering().clone();
        engine.add_edges(&[(0, 1)], true, false).unwrap();
        assert_eq!(engine.num_edges(), edges_before);
        assert_eq!(*engine.clustering(), clustering_before);
        // No genuinely new edge was added, so every pre-existing cluster is
        // still valid and untouched, not zeroed out.
        let stats = engine.last_stats().unwrap();
        assert_eq!(stats.valid_clusters, clustering_before.len());
        assert_eq!(stats.invalidated_clusters, 0);
    }

    #[test]
    fn debug_equivalence_holds_after_a_streaming_update() {
        let mut engine = engine_with(&[(0, 1), (1, 2), (2, 0), (10, 11), (11, 12), (12, 10)], 2);
        engine.add_edges(&[(2, 10)], true, false).unwrap();
        assert!(engine.debug_check_equivalence().unwrap());
    }
}
