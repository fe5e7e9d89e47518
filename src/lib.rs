//! Iterative K-Core Clustering: k-core decomposition, density-gated
//! community peeling, k-core subgraph search, and a streaming incremental
//! variant over a persistent graph.
//!
//! Bulk one-shot use goes through [`kcore::decompose`] and [`ikc::run`]
//! directly on a loaded [`graph::Graph`]; long-lived, incrementally updated
//! workloads go through [`streaming::StreamingEngine`] instead, which keeps
//! a single modularity reference frozen across the whole session.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod graph;
pub mod ikc;
pub mod io;
pub mod kcore;
pub mod progress;
pub mod search;
pub mod streaming;

pub use config::IkcConfig;
pub use error::{IkcError, IkcResult};
pub use graph::{Graph, NodeId};
pub use ikc::{Cluster, Clustering};
pub use kcore::KCoreDecomposition;
pub use search::KCoreSubgraph;
pub use streaming::{StreamingEngine, UpdateStats};
