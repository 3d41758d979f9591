//! # SIMT-style data-parallel device
//!
//! The device executes kernels the way an accelerator does: a kernel body runs
//! once per active thread over disjoint indices, threads are grouped into
//! blocks of [`DeviceConfig::block_size`], and the host waits for every launch
//! to finish before issuing the next one. Launches run on a dedicated rayon
//! thread pool owned by the device.
//!
//! Device memory is budgeted. Allocations beyond the budget fail with
//! [`ScanError::OutOfDeviceMemory`](crate::ScanError::OutOfDeviceMemory)
//! instead of aborting the process.

pub mod buffer;
pub mod config;
pub(crate) mod scatter;

use log::{debug, trace};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub use buffer::{DeviceBuffer, DoubleBuffer, MemoryLedger};
pub use config::{DeviceConfig, SystemParameters};

use crate::constants::WORKER_THREAD_PREFIX;
use crate::error::{Result, ScanError};

/// Counters describing the work issued to a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelStats {
    /// Number of kernel launches
    pub launches: usize,
    /// Sum over all launches of the threads that did work
    pub active_threads: u64,
}

/// A data-parallel execution device with its own worker pool and memory
#[derive(Debug)]
pub struct Device {
    config: DeviceConfig,
    pool: ThreadPool,
    memory: MemoryLedger,
    launches: AtomicUsize,
    active_threads: AtomicU64,
}

impl Device {
    /// Create a device with the given configuration
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.system_params.n_threads)
            .thread_name(|i| format!("{}-{}", WORKER_THREAD_PREFIX, i))
            .build()
            .map_err(|e| ScanError::DeviceInit(e.to_string()))?;

        debug!(
            "device ready: {} workers, block size {}, {} bytes of memory",
            pool.current_num_threads(),
            config.block_size,
            config.system_params.memory_budget
        );

        Ok(Self {
            memory: MemoryLedger::new(config.system_params.memory_budget),
            config,
            pool,
            launches: AtomicUsize::new(0),
            active_threads: AtomicU64::new(0),
        })
    }

    /// Create a device configured from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(DeviceConfig::from_env())
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Threads per synchronization block
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Number of worker threads
    pub fn n_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Allocate `len` default-initialized elements
    pub fn alloc<T: Copy + Default>(&self, len: usize) -> Result<DeviceBuffer<'_, T>> {
        self.alloc_filled(len, T::default())
    }

    /// Allocate `len` elements set to `value`
    pub fn alloc_filled<T: Copy>(&self, len: usize, value: T) -> Result<DeviceBuffer<'_, T>> {
        DeviceBuffer::from_iter(&self.memory, len, std::iter::repeat(value))
    }

    /// Copy host data into a new device buffer
    pub fn upload<T: Copy>(&self, data: &[T]) -> Result<DeviceBuffer<'_, T>> {
        DeviceBuffer::from_iter(&self.memory, data.len(), data.iter().copied())
    }

    /// Copy host data into a device buffer of `len` elements, filling the tail
    pub fn upload_padded<T: Copy>(
        &self,
        data: &[T],
        len: usize,
        fill: T,
    ) -> Result<DeviceBuffer<'_, T>> {
        debug_assert!(len >= data.len());
        let values = data.iter().copied().chain(std::iter::repeat(fill));
        DeviceBuffer::from_iter(&self.memory, len, values)
    }

    /// Run one kernel pass and wait for it to complete.
    ///
    /// `active_threads` is the number of indices the kernel does work for; it
    /// feeds [`KernelStats`] only. The kernel itself issues its parallel
    /// iterators, which execute on this device's pool.
    pub fn launch<F>(&self, kernel_name: &str, active_threads: usize, kernel: F)
    where
        F: FnOnce() + Send,
    {
        trace!("launch {} with {} active threads", kernel_name, active_threads);
        self.launches.fetch_add(1, Ordering::Relaxed);
        self.active_threads
            .fetch_add(active_threads as u64, Ordering::Relaxed);
        self.pool.install(kernel);
    }

    /// Work issued since creation or the last [`reset_stats`](Self::reset_stats)
    pub fn stats(&self) -> KernelStats {
        KernelStats {
            launches: self.launches.load(Ordering::Relaxed),
            active_threads: self.active_threads.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.launches.store(0, Ordering::Relaxed);
        self.active_threads.store(0, Ordering::Relaxed);
    }

    /// Memory accounting for this device
    pub fn memory(&self) -> &MemoryLedger {
        &self.memory
    }

    /// Bytes held by live device buffers
    pub fn memory_in_use(&self) -> usize {
        self.memory.in_use()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    fn small_device() -> Device {
        Device::new(DeviceConfig::default().with_threads(2).with_block_size(4)).unwrap()
    }

    #[test]
    fn test_launch_runs_on_device_pool() {
        let device = small_device();
        let mut ys = device.alloc::<u32>(16).unwrap();
        let block_size = device.block_size();
        device.launch("fill_index", 16, || {
            ys.par_iter_mut()
                .with_min_len(block_size)
                .enumerate()
                .for_each(|(i, y)| *y = i as u32);
        });
        assert_eq!(ys.to_host(4), vec![0, 1, 2, 3]);

        let stats = device.stats();
        assert_eq!(stats.launches, 1);
        assert_eq!(stats.active_threads, 16);

        device.reset_stats();
        assert_eq!(device.stats(), KernelStats::default());
    }

    #[test]
    fn test_upload_padded_fills_tail() {
        let device = small_device();
        let buffer = device.upload_padded(&[7u32, 8, 9], 8, 0).unwrap();
        assert_eq!(&buffer[..], &[7, 8, 9, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_allocation_over_budget_fails() {
        let device =
            Device::new(DeviceConfig::default().with_threads(1).with_memory_budget(64)).unwrap();
        let held = device.alloc::<u32>(10).unwrap();
        let err = device.alloc::<u32>(10).unwrap_err();
        assert_eq!(
            err,
            ScanError::OutOfDeviceMemory {
                requested: 40,
                available: 24
            }
        );
        drop(held);
        assert_eq!(device.memory_in_use(), 0);
    }
}
