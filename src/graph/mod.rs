//! CSR-like graph store with a growable external↔internal id mapping.

mod id_map;
mod store;

pub use id_map::{IdMap, NodeId};
pub use store::Graph;
