use super::Concurrency;

/// Builds a scoped Rayon thread pool sized from `num_threads`.
///
/// `None` defaults to hardware concurrency, matching the `num_threads`
/// configuration option's documented default. The returned pool is owned by
/// the caller; no process-wide pool is installed.
pub fn build_thread_pool(num_threads: Option<usize>) -> rayon::ThreadPool {
    let concurrency = match num_threads {
        Some(n) => Concurrency::from_usize(n),
        None => Concurrency::available_cores(),
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.value())
        .build()
        .expect("thread pool construction should not fail with a valid thread count")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_pool_with_requested_width() {
        let pool = build_thread_pool(Some(2));
        assert_eq!(pool.current_num_threads(), 2);
    }

    #[test]
    fn defaults_to_hardware_concurrency() {
        let pool = build_thread_pool(None);
        assert!(pool.current_num_threads() >= 1);
    }
}
