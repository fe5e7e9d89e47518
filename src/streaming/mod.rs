//! Affected-region recomputation, cluster invalidation/revalidation, batch
//! accumulation, and statistics over a persistent graph.

mod engine;
mod stats;

pub use engine::StreamingEngine;
pub use stats::UpdateStats;
