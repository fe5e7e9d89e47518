use std::fmt;

/// Counters and timings populated by every committed update.
///
/// `recompute_time_ms` covers core-number recomputation plus localized
/// re-emission; `total_time_ms` additionally covers graph mutation and, in
/// batch mode, spans the whole buffered sequence since `begin_batch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateStats {
    pub affected_nodes: usize,
    pub invalidated_clusters: usize,
    pub valid_clusters: usize,
    pub merge_candidates: usize,
    pub recompute_time_ms: f64,
    pub total_time_ms: f64,
}

impl UpdateStats {
    /// Stats for a mutating call that added no genuinely new edge (a bare
    /// `add_nodes`, or an idempotent edge re-insertion): nothing was
    /// invalidated and every pre-existing cluster is still valid, so
    /// `valid_clusters` reflects the untouched clustering rather than 0.
    pub(crate) fn unchanged(valid_clusters: usize) -> Self {
        Self {
            affected_nodes: 0,
            invalidated_clusters: 0,
            valid_clusters,
            merge_candidates: 0,
            recompute_time_ms: 0.0,
            total_time_ms: 0.0,
        }
    }
}

impl fmt::Display for UpdateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "affected={} invalidated={} valid={} merge_candidates={} recompute={:.2}ms total={:.2}ms",
            self.affected_nodes,
            self.invalidated_clusters,
            self.valid_clusters,
            self.merge_candidates,
            self.recompute_time_ms,
            self.total_time_ms,
        )
    }
}
