//! Scan-based radix sort
//!
//! Sorts non-negative integer keys one bit plane at a time, from bit 0 up to
//! a caller-supplied most significant bit. Each pass is a stable *split*: keys
//! with the bit clear keep their relative order and move to the front, keys
//! with the bit set keep theirs and move to the back. Because every pass is
//! stable, the order established by lower bits survives the higher ones and
//! the array ends up sorted.
//!
//! One pass on the device:
//!
//! 1. **Extract**: flag `b[i]` = bit of key `i`.
//! 2. **Scan**: `t = exclusive_scan(b)`; `falses = n′ − (t[n′−1] + b[n′−1])`.
//! 3. **Address**: `d[i] = falses + t[i]` when the bit is set, `i − t[i]`
//!    otherwise.
//! 4. **Scatter**: key `i` (and its payload) moves to `d[i]` in the other half
//!    of a double buffer.
//!
//! Inputs are padded to a power of two with the largest key value, which sorts
//! behind every real key and is cut off at the end.

use log::debug;
use rayon::prelude::*;

use crate::device::scatter::ScatterTarget;
use crate::device::{Device, DeviceBuffer, DoubleBuffer};
use crate::element::Element;
use crate::error::{Result, ScanError};
use crate::padding::{logical_input, padded_len};
use crate::scan::WorkEfficientScan;

/// Stable least-significant-bit radix sort running on a [`Device`]
#[derive(Debug, Clone, Copy)]
pub struct RadixSort<'d> {
    device: &'d Device,
}

/// Per-pass scratch: bit flags, their scan and the split addresses
struct SplitScratch<'d> {
    bits: DeviceBuffer<'d, usize>,
    scan: DeviceBuffer<'d, usize>,
    addresses: DeviceBuffer<'d, usize>,
}

impl<'d> RadixSort<'d> {
    pub fn new(device: &'d Device) -> Self {
        Self { device }
    }

    /// Sort the first `n` keys of `input` ascending, inspecting bits
    /// `0..=msb`.
    ///
    /// Bits above `msb` are never looked at; keys that differ only there keep
    /// their input order.
    ///
    /// # Errors
    ///
    /// * [`ScanError::BitOutOfRange`] if `msb` is not below the key width
    /// * [`ScanError::NegativeKey`] if a key is negative
    /// * [`ScanError::LengthMismatch`] if `n` exceeds `input.len()`
    /// * [`ScanError::OutOfDeviceMemory`] if the working buffers do not fit
    pub fn sort<T: Element>(&self, n: usize, input: &[T], msb: u32) -> Result<Vec<T>> {
        let input = validate_keys(n, input, msb)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let padded = padded_len(n)?;
        let mut keys = self.upload_keys(input, padded)?;
        let mut scratch = self.alloc_scratch(padded)?;
        debug!("radix sort: n = {}, padded = {}, bits 0..={}", n, padded, msb);

        for bit in 0..=msb {
            self.split_addresses(&keys, &mut scratch, bit);
            self.scatter(&mut keys, &scratch.addresses, "scatter_keys");
        }

        Ok(keys.into_current().to_host(n))
    }

    /// Sort keys ascending and move `values` along with them.
    ///
    /// Equal keys keep the order of their values, which makes the stability of
    /// the sort observable.
    pub fn sort_by_key<T, V>(
        &self,
        n: usize,
        keys: &[T],
        values: &[V],
        msb: u32,
    ) -> Result<(Vec<T>, Vec<V>)>
    where
        T: Element,
        V: Copy + Default + Send + Sync,
    {
        let keys = validate_keys(n, keys, msb)?;
        let values = logical_input(n, values)?;
        if n == 0 {
            return Ok((Vec::new(), Vec::new()));
        }

        let padded = padded_len(n)?;
        let mut key_buffers = self.upload_keys(keys, padded)?;
        let mut value_buffers = DoubleBuffer::new(
            self.device.upload_padded(values, padded, V::default())?,
            self.device.alloc::<V>(padded)?,
        );
        let mut scratch = self.alloc_scratch(padded)?;
        debug!(
            "radix sort by key: n = {}, padded = {}, bits 0..={}",
            n, padded, msb
        );

        for bit in 0..=msb {
            self.split_addresses(&key_buffers, &mut scratch, bit);
            self.scatter(&mut key_buffers, &scratch.addresses, "scatter_keys");
            self.scatter(&mut value_buffers, &scratch.addresses, "scatter_values");
        }

        Ok((
            key_buffers.into_current().to_host(n),
            value_buffers.into_current().to_host(n),
        ))
    }

    fn upload_keys<T: Element>(&self, keys: &[T], padded: usize) -> Result<DoubleBuffer<'d, T>> {
        Ok(DoubleBuffer::new(
            self.device.upload_padded(keys, padded, T::max_value())?,
            self.device.alloc_filled(padded, T::zero())?,
        ))
    }

    fn alloc_scratch(&self, padded: usize) -> Result<SplitScratch<'d>> {
        Ok(SplitScratch {
            bits: self.device.alloc(padded)?,
            scan: self.device.alloc(padded)?,
            addresses: self.device.alloc(padded)?,
        })
    }

    /// Fill `scratch.addresses` with the destination of every key for `bit`
    fn split_addresses<T: Element>(
        &self,
        keys: &DoubleBuffer<'_, T>,
        scratch: &mut SplitScratch<'_>,
        bit: u32,
    ) {
        let device = self.device;
        let block_size = device.block_size();
        let padded = keys.len();
        let SplitScratch {
            bits,
            scan,
            addresses,
        } = scratch;

        let current = keys.current();
        device.launch("extract_bit", padded, || {
            bits.par_iter_mut()
                .zip(scan.par_iter_mut())
                .zip(current.par_iter())
                .with_min_len(block_size)
                .for_each(|((flag, scanned), key)| {
                    *flag = key.bit(bit);
                    *scanned = *flag;
                });
        });

        WorkEfficientScan::new(device).scan_in_place(&mut scan[..]);

        let total_trues = scan[padded - 1] + bits[padded - 1];
        let total_falses = padded - total_trues;

        let bits = &bits[..];
        let scan = &scan[..];
        device.launch("split_addresses", padded, || {
            addresses
                .par_iter_mut()
                .enumerate()
                .with_min_len(block_size)
                .for_each(|(i, address)| {
                    *address = if bits[i] == 1 {
                        total_falses + scan[i]
                    } else {
                        i - scan[i]
                    };
                });
        });
    }

    /// Move every element of `buffers` to its address and swap the halves
    fn scatter<V: Copy + Send + Sync>(
        &self,
        buffers: &mut DoubleBuffer<'_, V>,
        addresses: &[usize],
        kernel_name: &str,
    ) {
        let block_size = self.device.block_size();
        let (src, dst) = buffers.split();
        let target = ScatterTarget::new(dst);
        self.device.launch(kernel_name, src.len(), || {
            src.par_iter()
                .zip(addresses.par_iter())
                .with_min_len(block_size)
                .for_each(|(&x, &address)| {
                    // Split addresses form a permutation
                    unsafe { target.write(address, x) };
                });
        });
        buffers.swap();
    }
}

fn validate_keys<T: Element>(n: usize, keys: &[T], msb: u32) -> Result<&[T]> {
    let key_bits = T::key_bits();
    if msb >= key_bits {
        return Err(ScanError::BitOutOfRange { msb, key_bits });
    }
    let keys = logical_input(n, keys)?;
    if let Some(index) = keys.iter().position(|k| Element::is_negative(k)) {
        return Err(ScanError::NegativeKey { index });
    }
    Ok(keys)
}
