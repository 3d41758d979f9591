//! Work-efficient (Blelloch) parallel scan
//!
//! The padded array is treated as the leaves of a balanced binary tree of
//! depth `log2 n′`:
//!
//! 1. **Up-sweep (reduce)**: level by level towards the root, each node adds
//!    its left child's partial sum into its right child. Afterwards the last
//!    cell holds the total.
//! 2. **Down-sweep**: the root is cleared to the identity, then level by
//!    level towards the leaves each node passes its value to the left child
//!    and gives the right child the old left value plus its own.
//!
//! Only the heads of stride-sized nodes are active, so the active count
//! halves on the way up and doubles on the way down: `2(n′ − 1)` additions in
//! total instead of the `n′·log2 n′` of [`NaiveScan`](super::NaiveScan).
//! Each active index owns its node exclusively, so every level runs in place.

use log::debug;
use rayon::iter::StepBy;
use rayon::prelude::*;
use rayon::range::Iter as RangeIter;

use super::ExclusiveScan;
use crate::device::Device;
use crate::element::Element;
use crate::error::Result;
use crate::padding::{log2_ceil, logical_input, truncate, upload_padded};

/// One level of the balanced tree and the threads active on it.
///
/// The active set is computed before dispatch: every kernel pass iterates
/// [`active_indices`](Self::active_indices) instead of letting each thread
/// test its own index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepLevel {
    /// Level in the tree, 0 at the leaves
    pub depth: u32,
    /// Distance between active indices (`2^(depth + 1)`)
    pub stride: usize,
    padded: usize,
}

impl SweepLevel {
    pub fn new(padded: usize, depth: u32) -> Self {
        Self {
            depth,
            stride: 1 << (depth + 1),
            padded,
        }
    }

    /// Levels in up-sweep order (leaves to root)
    pub fn up_sweep(padded: usize) -> impl Iterator<Item = SweepLevel> {
        (0..log2_ceil(padded)).map(move |depth| SweepLevel::new(padded, depth))
    }

    /// Levels in down-sweep order (root to leaves)
    pub fn down_sweep(padded: usize) -> impl Iterator<Item = SweepLevel> {
        (0..log2_ceil(padded))
            .rev()
            .map(move |depth| SweepLevel::new(padded, depth))
    }

    /// Number of threads doing work on this level
    pub fn active_count(&self) -> usize {
        self.padded / self.stride
    }

    /// Indices of the active threads, one per node of this level
    pub fn active_indices(&self) -> StepBy<RangeIter<usize>> {
        (0..self.padded).into_par_iter().step_by(self.stride)
    }

    /// Pair every active index with the stride-sized node it owns
    fn nodes<'a, T: Send>(
        &self,
        data: &'a mut [T],
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])> {
        debug_assert_eq!(data.len(), self.padded);
        self.active_indices().zip(data.par_chunks_mut(self.stride))
    }

    /// Position of the left child of the node starting at `i`
    pub fn left(&self, i: usize) -> usize {
        i + self.stride / 2 - 1
    }

    /// Position of the right child of the node starting at `i`
    pub fn right(&self, i: usize) -> usize {
        i + self.stride - 1
    }
}

/// Work-efficient scan running on a [`Device`]
#[derive(Debug, Clone, Copy)]
pub struct WorkEfficientScan<'d> {
    device: &'d Device,
}

impl<'d> WorkEfficientScan<'d> {
    pub fn new(device: &'d Device) -> Self {
        Self { device }
    }

    /// Exclusive scan of the first `n` elements of `input`
    pub fn scan<T: Element>(&self, n: usize, input: &[T]) -> Result<Vec<T>> {
        let input = logical_input(n, input)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut data = upload_padded(self.device, input, T::zero())?;
        debug!("work-efficient scan: n = {}, padded = {}", n, data.len());
        self.scan_in_place(&mut data);

        Ok(truncate(&data, n))
    }

    /// Replace `data` with its exclusive scan, on the device.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not zero or a power of two.
    pub fn scan_in_place<T: Element>(&self, data: &mut [T]) {
        let padded = data.len();
        if padded == 0 {
            return;
        }
        assert!(
            padded.is_power_of_two(),
            "in-place scan needs a power-of-two length, got {}",
            padded
        );

        for level in SweepLevel::up_sweep(padded) {
            self.up_sweep_level(data, level);
        }

        // The root now holds the total; clear it to seed the down-sweep.
        data[padded - 1] = T::zero();

        for level in SweepLevel::down_sweep(padded) {
            self.down_sweep_level(data, level);
        }
    }

    // `node` starts at index `i`, so children are addressed relative to it
    fn up_sweep_level<T: Element>(&self, data: &mut [T], level: SweepLevel) {
        let block_size = self.device.block_size();
        self.device.launch("up_sweep", level.active_count(), || {
            level
                .nodes(data)
                .with_min_len(block_size)
                .for_each(|(i, node)| {
                    let (left, right) = (level.left(i) - i, level.right(i) - i);
                    node[right] = node[right].wrapping_add(&node[left]);
                });
        });
    }

    fn down_sweep_level<T: Element>(&self, data: &mut [T], level: SweepLevel) {
        let block_size = self.device.block_size();
        self.device.launch("down_sweep", level.active_count(), || {
            level
                .nodes(data)
                .with_min_len(block_size)
                .for_each(|(i, node)| {
                    let (left, right) = (level.left(i) - i, level.right(i) - i);
                    let old_left = node[left];
                    node[left] = node[right];
                    node[right] = old_left.wrapping_add(&node[right]);
                });
        });
    }
}

impl<T: Element> ExclusiveScan<T> for WorkEfficientScan<'_> {
    fn name(&self) -> &'static str {
        "work-efficient"
    }

    fn scan(&self, n: usize, input: &[T]) -> Result<Vec<T>> {
        WorkEfficientScan::scan(self, n, input)
    }
}
