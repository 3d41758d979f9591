//! Naive (Hillis-Steele) parallel scan
//!
//! Every index is active in every step: step `d` adds the value `d` positions
//! to the left, with `d` doubling from 1 up to `n′/2`. After `log2 n′` steps
//! the buffer holds the inclusive scan, which a final pass shifts right by one
//! to make it exclusive.
//!
//! The scan is step-efficient (`O(log n)` dependent passes) but not
//! work-efficient: it performs `n′·log2 n′` additions. It is kept as the
//! baseline for [`WorkEfficientScan`](super::WorkEfficientScan).
//!
//! A step reads values other threads overwrite in the same step, so each step
//! reads one half of a [`DoubleBuffer`] and writes the other.

use log::debug;
use rayon::prelude::*;

use super::ExclusiveScan;
use crate::device::{Device, DoubleBuffer};
use crate::element::Element;
use crate::error::Result;
use crate::padding::{log2_ceil, logical_input, truncate, upload_padded};

/// Step-efficient scan running on a [`Device`]
#[derive(Debug, Clone, Copy)]
pub struct NaiveScan<'d> {
    device: &'d Device,
}

impl<'d> NaiveScan<'d> {
    pub fn new(device: &'d Device) -> Self {
        Self { device }
    }

    /// Exclusive scan of the first `n` elements of `input`
    pub fn scan<T: Element>(&self, n: usize, input: &[T]) -> Result<Vec<T>> {
        let input = logical_input(n, input)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let device = self.device;
        let block_size = device.block_size();

        let source = upload_padded(device, input, T::zero())?;
        let padded = source.len();
        let scratch = device.alloc_filled(padded, T::zero())?;
        let mut buffers = DoubleBuffer::new(source, scratch);
        debug!(
            "naive scan: n = {}, padded = {}, {} steps",
            n,
            padded,
            log2_ceil(padded)
        );

        // Inclusive scan, one doubling offset per pass
        let mut offset = 1;
        while offset < padded {
            let (src, dst) = buffers.split();
            device.launch("naive_scan_step", padded, || {
                dst.par_iter_mut()
                    .with_min_len(block_size)
                    .enumerate()
                    .for_each(|(i, y)| {
                        *y = if i >= offset {
                            src[i].wrapping_add(&src[i - offset])
                        } else {
                            src[i]
                        };
                    });
            });
            buffers.swap();
            offset *= 2;
        }

        // Shift right by one to turn the inclusive scan into an exclusive one
        let (src, dst) = buffers.split();
        device.launch("inclusive_to_exclusive", padded, || {
            dst.par_iter_mut()
                .with_min_len(block_size)
                .enumerate()
                .for_each(|(i, y)| *y = if i == 0 { T::zero() } else { src[i - 1] });
        });
        buffers.swap();

        Ok(truncate(&buffers.into_current(), n))
    }
}

impl<T: Element> ExclusiveScan<T> for NaiveScan<'_> {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn scan(&self, n: usize, input: &[T]) -> Result<Vec<T>> {
        NaiveScan::scan(self, n, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceConfig;

    fn device() -> Device {
        Device::new(DeviceConfig::default().with_threads(2).with_block_size(2)).unwrap()
    }

    #[test]
    fn test_power_of_two() {
        let device = device();
        let scan = NaiveScan::new(&device);
        let out = scan.scan(8, &[3u32, 1, 7, 0, 4, 1, 6, 3]).unwrap();
        assert_eq!(out, vec![0, 3, 4, 11, 11, 15, 16, 22]);
    }

    #[test]
    fn test_non_power_of_two() {
        let device = device();
        let scan = NaiveScan::new(&device);
        let out = scan.scan(5, &[4i32, 2, 0, 7, 1]).unwrap();
        assert_eq!(out, vec![0, 4, 6, 6, 13]);
    }

    #[test]
    fn test_degenerate_lengths() {
        let device = device();
        let scan = NaiveScan::new(&device);
        assert!(scan.scan::<u32>(0, &[]).unwrap().is_empty());
        assert_eq!(scan.scan(1, &[9u32]).unwrap(), vec![0]);
        assert_eq!(device.stats().launches, 1);
    }

    #[test]
    fn test_work_is_n_log_n() {
        let device = device();
        let scan = NaiveScan::new(&device);
        let input = vec![1u64; 16];
        scan.scan(16, &input).unwrap();

        // 4 doubling steps plus the shift, every thread active each time
        let stats = device.stats();
        assert_eq!(stats.launches, 5);
        assert_eq!(stats.active_threads, 16 * 4 + 16);
        assert_eq!(device.memory_in_use(), 0);
    }

    #[test]
    fn test_only_logical_prefix_is_read() {
        let device = device();
        let scan = NaiveScan::new(&device);
        let out = scan.scan(3, &[1u32, 2, 3, 100, 100]).unwrap();
        assert_eq!(out, vec![0, 1, 3]);
    }
}
