//! Call-through to optimized library routines
//!
//! Plays the role of a vendor scan/sort library: the work is handed to the
//! standard library and rayon as-is, with no algorithm of our own. Results
//! must match the device implementations exactly.

use rayon::prelude::*;

use crate::element::Element;
use crate::error::Result;
use crate::padding::logical_input;
use crate::scan::ExclusiveScan;

/// Exclusive scan via the standard iterator adaptor
pub fn exclusive_scan<T: Element>(n: usize, input: &[T]) -> Result<Vec<T>> {
    let input = logical_input(n, input)?;
    Ok(input
        .iter()
        .scan(T::zero(), |sum, &x| {
            let before = *sum;
            *sum = sum.wrapping_add(&x);
            Some(before)
        })
        .collect())
}

/// Stable ascending sort with rayon's parallel merge sort
pub fn sort<T: Element>(n: usize, input: &[T]) -> Result<Vec<T>> {
    let mut output = logical_input(n, input)?.to_vec();
    output.par_sort();
    Ok(output)
}

/// [`ExclusiveScan`] adapter for the library routine
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryScan;

impl<T: Element> ExclusiveScan<T> for LibraryScan {
    fn name(&self) -> &'static str {
        "library"
    }

    fn scan(&self, n: usize, input: &[T]) -> Result<Vec<T>> {
        exclusive_scan(n, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_scan() {
        assert_eq!(
            exclusive_scan(5, &[4u32, 2, 0, 7, 1]).unwrap(),
            vec![0, 4, 6, 6, 13]
        );
    }

    #[test]
    fn test_library_sort() {
        assert_eq!(sort(4, &[9u8, 3, 7, 1, 0]).unwrap(), vec![1, 3, 7, 9]);
    }
}
