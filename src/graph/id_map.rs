use std::collections::HashMap;

/// Dense internal vertex id, assigned in insertion order starting at 0.
pub type NodeId = u32;

/// Bidirectional mapping between stable external ids (arbitrary `u64`s, as
/// read from an edge list) and the dense internal ids the graph store
/// indexes by.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    to_internal: HashMap<u64, NodeId>,
    to_external: Vec<u64>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: returns the existing internal id if `ext_id` is already
    /// known, otherwise assigns the next dense id.
    pub fn insert(&mut self, ext_id: u64) -> NodeId {
        if let Some(&internal) = self.to_internal.get(&ext_id) {
            return internal;
        }
        let internal = self.to_external.len() as NodeId;
        self.to_external.push(ext_id);
        self.to_internal.insert(ext_id, internal);
        internal
    }

    pub fn to_internal(&self, ext_id: u64) -> Option<NodeId> {
        self.to_internal.get(&ext_id).copied()
    }

    pub fn to_external(&self, internal: NodeId) -> Option<u64> {
        self.to_external.get(internal as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.to_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_external.is_empty()
    }

    pub fn contains(&self, ext_id: u64) -> bool {
        self.to_internal.contains_key(&ext_id)
    }
}
