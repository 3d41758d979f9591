//! Sequential reference implementations
//!
//! These run on the host without the device and serve as the correctness
//! oracle for the parallel algorithms. They follow the same contracts: an
//! exclusive scan of the logical prefix, and compaction that keeps nonzero
//! elements in order.

use crate::compact::Compaction;
use crate::element::Element;
use crate::error::Result;
use crate::padding::logical_input;
use crate::scan::ExclusiveScan;

/// Exclusive scan of the first `n` elements of `input`
pub fn exclusive_scan<T: Element>(n: usize, input: &[T]) -> Result<Vec<T>> {
    let input = logical_input(n, input)?;
    let mut output = Vec::with_capacity(n);
    let mut sum = T::zero();
    for &x in input {
        output.push(sum);
        sum = sum.wrapping_add(&x);
    }
    Ok(output)
}

/// Compaction by a single pass that copies every nonzero element
pub fn compact_without_scan<T: Element>(n: usize, input: &[T]) -> Result<Compaction<T>> {
    let input = logical_input(n, input)?;
    let mut output = vec![T::zero(); n];
    let mut count = 0;
    for &x in input {
        if !x.is_zero() {
            output[count] = x;
            count += 1;
        }
    }
    Ok(Compaction { output, count })
}

/// Compaction by map, exclusive scan and scatter, all sequential
pub fn compact_with_scan<T: Element>(n: usize, input: &[T]) -> Result<Compaction<T>> {
    let input = logical_input(n, input)?;
    if n == 0 {
        return Ok(Compaction::empty());
    }

    let flags: Vec<usize> = input.iter().map(|x| usize::from(!x.is_zero())).collect();
    let indices = exclusive_scan(n, &flags)?;

    let mut output = vec![T::zero(); n];
    for i in 0..n {
        if flags[i] == 1 {
            output[indices[i]] = input[i];
        }
    }
    let count = indices[n - 1] + flags[n - 1];

    Ok(Compaction { output, count })
}

/// Stable ascending sort of the first `n` elements
pub fn sort<T: Element>(n: usize, input: &[T]) -> Result<Vec<T>> {
    let mut output = logical_input(n, input)?.to_vec();
    output.sort();
    Ok(output)
}

/// [`ExclusiveScan`] adapter for the sequential oracle
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceScan;

impl<T: Element> ExclusiveScan<T> for ReferenceScan {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn scan(&self, n: usize, input: &[T]) -> Result<Vec<T>> {
        exclusive_scan(n, input)
    }
}
