//! Centralized constants for the stream compaction library
//!
//! Device defaults, the environment variables that override them, and the
//! parameters of the console benchmark. Grouped by the component that reads
//! them.

// ============================================================================
// DEVICE EXECUTION CONSTANTS
// ============================================================================

/// Default number of threads in one synchronization block
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// Smallest block size accepted from configuration
pub const MIN_BLOCK_SIZE: usize = 1;

/// Alignment in bytes of every device buffer
pub const DEVICE_BUFFER_ALIGN: usize = 64;

/// Prefix used when naming device worker threads
pub const WORKER_THREAD_PREFIX: &str = "simt-worker";

// ============================================================================
// MEMORY CONSTANTS
// ============================================================================

/// Default device memory budget (2GB)
pub const DEFAULT_MEMORY_BUDGET: usize = 2 * 1024 * 1024 * 1024;

// ============================================================================
// ENVIRONMENT VARIABLES
// ============================================================================

/// Overrides the number of device worker threads
pub const ENV_THREADS: &str = "STREAM_COMPACTION_THREADS";

/// Overrides the synchronization block size
pub const ENV_BLOCK_SIZE: &str = "STREAM_COMPACTION_BLOCK_SIZE";

/// Overrides the device memory budget in bytes
pub const ENV_MEMORY_BUDGET: &str = "STREAM_COMPACTION_MEMORY_BUDGET";

// ============================================================================
// BENCHMARK HARNESS DEFAULTS
// ============================================================================

/// Default array length for the harness (power of two)
pub const BENCH_SIZE: usize = 1 << 20;

/// Distance below the power-of-two size used for the non-power-of-two runs
pub const BENCH_NPOT_OFFSET: usize = 3;

/// Repetitions averaged for sequential timings
pub const BENCH_ITERATIONS: usize = 100;

/// Value bound for generated scan inputs
pub const SCAN_VALUE_BOUND: i32 = 50;

/// Value bound for generated compaction inputs (small so zeros are common)
pub const COMPACT_VALUE_BOUND: i32 = 4;

/// Value bound for the power-of-two radix sort input
pub const SORT_VALUE_BOUND: i32 = 200;

/// Value bound for the non-power-of-two radix sort input
pub const SORT_NPOT_VALUE_BOUND: i32 = 2000;

/// Most significant bit inspected when sorting 32-bit keys
pub const SORT_MSB: u32 = 31;

/// Number of leading elements shown by abridged array printing
pub const PRINT_HEAD: usize = 13;

/// Number of trailing elements shown by abridged array printing
pub const PRINT_TAIL: usize = 2;

/// Seed of the harness random generator
pub const BENCH_SEED: u64 = 0x5ca9;
