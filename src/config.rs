//! Configuration options recognized by the IKC driver and streaming engine.

/// Marker trait for configuration types, mirroring the narrow `Config`
/// marker used across algorithm configs.
pub trait Config: Send + Sync {}

/// Options shared by the IKC driver and the streaming engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IkcConfig {
    /// Peeling halts once the current maximum k-core falls below `min_k`;
    /// clusters with `k_value < min_k` are never emitted.
    pub min_k: u32,
    /// Emit human-readable progress lines to the `log` sink.
    pub verbose: bool,
    /// Upper bound on worker threads for the data-parallel regions.
    /// `None` defaults to hardware concurrency.
    pub num_threads: Option<usize>,
}

impl Default for IkcConfig {
    fn default() -> Self {
        Self {
            min_k: 0,
            verbose: false,
            num_threads: None,
        }
    }
}

impl Config for IkcConfig {}

impl IkcConfig {
    pub fn builder() -> IkcConfigBuilder {
        IkcConfigBuilder::default()
    }
}

/// Builder for [`IkcConfig`].
#[derive(Debug, Default)]
pub struct IkcConfigBuilder {
    min_k: Option<u32>,
    verbose: Option<bool>,
    num_threads: Option<usize>,
}

impl IkcConfigBuilder {
    pub fn min_k(mut self, min_k: u32) -> Self {
        self.min_k = Some(min_k);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn build(self) -> IkcConfig {
        let defaults = IkcConfig::default();
        IkcConfig {
            min_k: self.min_k.unwrap_or(defaults.min_k),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            num_threads: self.num_threads.or(defaults.num_threads),
        }
    }
}
