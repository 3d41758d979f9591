//! Scan-based stream compaction
//!
//! Compaction keeps the elements that satisfy a predicate, in their original
//! order, in three device passes:
//!
//! 1. **Map**: write a 0/1 predicate flag per element.
//! 2. **Scan**: the exclusive scan of the flags gives each kept element its
//!    output address.
//! 3. **Scatter**: every kept element is written to its address.
//!
//! The number of kept elements is the last scan value plus the last flag; the
//! scan alone would miss a kept element at the final index.

use log::debug;
use rayon::prelude::*;

use crate::device::scatter::ScatterTarget;
use crate::device::Device;
use crate::element::Element;
use crate::error::Result;
use crate::padding::{logical_input, padded_len};
use crate::scan::WorkEfficientScan;

/// Output of a compaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compaction<T> {
    /// Output array of the logical input length. Only the first `count`
    /// elements are meaningful.
    pub output: Vec<T>,
    /// Number of kept elements
    pub count: usize,
}

impl<T> Compaction<T> {
    pub fn empty() -> Self {
        Self {
            output: Vec::new(),
            count: 0,
        }
    }

    /// The kept elements, in input order
    pub fn kept(&self) -> &[T] {
        &self.output[..self.count]
    }
}

/// Remove the zero elements from the first `n` elements of `input`
///
/// # Arguments
///
/// * `device` - Device running the map, scan and scatter passes
/// * `n` - Logical length of the input
/// * `input` - Host data holding at least `n` elements
///
/// # Returns
///
/// The nonzero elements in input order and their count.
pub fn compact_with_scan<T: Element>(
    device: &Device,
    n: usize,
    input: &[T],
) -> Result<Compaction<T>> {
    compact_by(device, n, input, |x: &T| !x.is_zero())
}

/// Keep the elements of the first `n` elements of `input` for which `keep`
/// returns true, preserving their order.
pub fn compact_by<T, P>(device: &Device, n: usize, input: &[T], keep: P) -> Result<Compaction<T>>
where
    T: Element,
    P: Fn(&T) -> bool + Sync,
{
    let input = logical_input(n, input)?;
    if n == 0 {
        return Ok(Compaction::empty());
    }

    let padded = padded_len(n)?;
    let block_size = device.block_size();
    debug!("compaction: n = {}, padded = {}", n, padded);

    let source = device.upload(input)?;
    let mut flags = device.alloc::<usize>(n)?;
    let mut indices = device.alloc::<usize>(padded)?;

    // Map to 0/1 flags; the scan input gets a copy so the flags survive it
    device.launch("map_to_boolean", n, || {
        flags
            .par_iter_mut()
            .zip(indices[..n].par_iter_mut())
            .zip(source.par_iter())
            .with_min_len(block_size)
            .for_each(|((flag, index), x)| {
                *flag = usize::from(keep(x));
                *index = *flag;
            });
    });

    WorkEfficientScan::new(device).scan_in_place(&mut indices);
    let count = indices[n - 1] + flags[n - 1];

    let mut output = device.alloc_filled(n, T::zero())?;
    {
        let target = ScatterTarget::new(&mut output);
        let flags = &flags[..];
        let indices = &indices[..n];
        device.launch("scatter", n, || {
            source
                .par_iter()
                .enumerate()
                .with_min_len(block_size)
                .filter(|&(i, _)| flags[i] == 1)
                .for_each(|(i, &x)| {
                    // Kept elements have strictly increasing addresses
                    unsafe { target.write(indices[i], x) };
                });
        });
    }
    debug!("compaction kept {} of {} elements", count, n);

    Ok(Compaction {
        output: output.to_host(n),
        count,
    })
}
