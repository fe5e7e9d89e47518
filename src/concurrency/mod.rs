//! Concurrency level and thread pool helpers.
//!
//! The core is single-threaded with opt-in data parallelism in exactly three
//! places: edge-list loading, post-load adjacency sort, and the decomposer's
//! initial degree computation. This module provides the [`Concurrency`] value
//! type shared by those call sites and a small helper for building a scoped
//! [`rayon::ThreadPool`] sized from `num_threads`.

mod concurrency_level;
mod thread_pool;

pub use concurrency_level::{Concurrency, ConcurrencyError};
pub use thread_pool::build_thread_pool;
