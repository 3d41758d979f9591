//! Configuration and system parameters for the device

use log::warn;

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_MEMORY_BUDGET, ENV_BLOCK_SIZE, ENV_MEMORY_BUDGET, ENV_THREADS,
    MIN_BLOCK_SIZE,
};

/// System parameters for the execution resources of a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemParameters {
    /// Number of worker threads executing kernel passes
    pub n_threads: usize,
    /// Bytes of device memory that may be allocated at once
    pub memory_budget: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
            memory_budget: DEFAULT_MEMORY_BUDGET,
        }
    }
}

/// Configuration for a [`Device`](super::Device)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Threads per synchronization block.
    ///
    /// Each parallel pass hands work to the pool in pieces of at least this
    /// many indices.
    pub block_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl DeviceConfig {
    /// Build a configuration from the defaults overridden by environment variables
    ///
    /// Recognized variables are `STREAM_COMPACTION_THREADS`,
    /// `STREAM_COMPACTION_BLOCK_SIZE` and `STREAM_COMPACTION_MEMORY_BUDGET`.
    /// Values that do not parse as positive integers are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(threads) = read_env_usize(ENV_THREADS) {
            config = config.with_threads(threads);
        }
        if let Some(block_size) = read_env_usize(ENV_BLOCK_SIZE) {
            config = config.with_block_size(block_size);
        }
        if let Some(budget) = read_env_usize(ENV_MEMORY_BUDGET) {
            config = config.with_memory_budget(budget);
        }
        config
    }

    /// Use `n_threads` workers (at least one)
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.system_params.n_threads = n_threads.max(1);
        self
    }

    /// Use `block_size` threads per synchronization block
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(MIN_BLOCK_SIZE);
        self
    }

    /// Limit device allocations to `bytes`
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.system_params.memory_budget = bytes;
        self
    }
}

fn read_env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("ignoring {}={:?}: expected a positive integer", name, raw);
            None
        }
    }
}
