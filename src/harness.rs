//! Console benchmarking helpers
//!
//! Generates test arrays, prints abridged arrays and compares results against
//! the reference. None of this is used by the algorithms themselves.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::{BENCH_NPOT_OFFSET, BENCH_SEED, BENCH_SIZE, PRINT_HEAD, PRINT_TAIL};

/// Shape of the generated test arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// Length of the power-of-two arrays
    pub size: usize,
    /// Exclusive upper bound of generated values
    pub test_value_bound: i32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: BENCH_SIZE,
            test_value_bound: crate::constants::SCAN_VALUE_BOUND,
        }
    }
}

impl BenchConfig {
    pub fn new(size: usize, test_value_bound: i32) -> Self {
        Self {
            size,
            test_value_bound,
        }
    }

    /// Same size with a different value bound
    pub fn with_bound(self, test_value_bound: i32) -> Self {
        Self {
            test_value_bound,
            ..self
        }
    }

    /// Length used for the non-power-of-two runs
    pub fn non_power_of_two(&self) -> usize {
        self.size.saturating_sub(BENCH_NPOT_OFFSET)
    }
}

/// Harness random generator with a fixed seed
pub fn bench_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(BENCH_SEED)
}

/// Values in `[0, bound)`, with the final element forced to zero so the
/// boundary case is always exercised.
pub fn gen_array<R: Rng>(config: &BenchConfig, rng: &mut R) -> Vec<i32> {
    let bound = config.test_value_bound.max(1);
    let mut values: Vec<i32> = (0..config.size).map(|_| rng.gen_range(0..bound)).collect();
    if let Some(last) = values.last_mut() {
        *last = 0;
    }
    values
}

pub fn print_desc(desc: &str) {
    println!("==== {} ====", desc);
}

/// Format an array, showing only its head and tail when it is long
pub fn format_array<T: std::fmt::Display>(values: &[T], abridged: bool) -> String {
    let shown = PRINT_HEAD + PRINT_TAIL;
    let mut out = String::from("[ ");
    for (i, value) in values.iter().enumerate() {
        if abridged && values.len() > shown && i == PRINT_HEAD {
            out.push_str("..., ");
        }
        if abridged && values.len() > shown && i >= PRINT_HEAD && i < values.len() - PRINT_TAIL {
            continue;
        }
        out.push_str(&format!("{:3} ", value));
    }
    out.push(']');
    out
}

pub fn print_array<T: std::fmt::Display>(values: &[T], abridged: bool) {
    println!("    {}", format_array(values, abridged));
}

/// Whether the first `n` elements of two arrays match
pub fn cmp_arrays<T: PartialEq>(n: usize, expected: &[T], actual: &[T]) -> bool {
    match (expected.get(..n), actual.get(..n)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

pub fn print_cmp_result<T: PartialEq>(n: usize, expected: &[T], actual: &[T]) {
    println!(
        "    {}",
        if cmp_arrays(n, expected, actual) {
            "passed"
        } else {
            "FAIL VALUE"
        }
    );
}

/// Compare counts first, then the kept prefixes
pub fn print_cmp_len_result<T: PartialEq>(
    count: usize,
    expected_count: usize,
    expected: &[T],
    actual: &[T],
) {
    if count != expected_count {
        println!("    expected {} elements, got {}", expected_count, count);
    }
    let passed = count == expected_count && cmp_arrays(count, expected, actual);
    println!("    {}", if passed { "passed" } else { "FAIL VALUE" });
}

pub fn print_elapsed(millis: f64) {
    println!("    elapsed {:.3} ms", millis);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_array_bounds_and_trailing_zero() {
        let config = BenchConfig::new(1000, 4);
        let values = gen_array(&config, &mut bench_rng());
        assert_eq!(values.len(), 1000);
        assert_eq!(values[999], 0);
        assert!(values.iter().all(|&v| (0..4).contains(&v)));
    }

    #[test]
    fn test_gen_array_is_reproducible() {
        let config = BenchConfig::new(64, 50);
        assert_eq!(
            gen_array(&config, &mut bench_rng()),
            gen_array(&config, &mut bench_rng())
        );
    }

    #[test]
    fn test_non_power_of_two() {
        assert_eq!(BenchConfig::new(1 << 10, 50).non_power_of_two(), 1021);
        assert_eq!(BenchConfig::new(2, 50).non_power_of_two(), 0);
    }

    #[test]
    fn test_format_array() {
        assert_eq!(format_array(&[1, 2, 3], true), "[   1   2   3 ]");
        let long: Vec<u32> = (0..20).collect();
        let text = format_array(&long, true);
        assert!(text.contains("..., "));
        assert!(text.ends_with(" 18  19 ]"));
        assert!(!text.contains(" 13 "));
    }

    #[test]
    fn test_cmp_arrays() {
        assert!(cmp_arrays(2, &[1, 2, 3], &[1, 2, 4]));
        assert!(!cmp_arrays(3, &[1, 2, 3], &[1, 2, 4]));
        assert!(!cmp_arrays(4, &[1, 2, 3], &[1, 2, 3]));
    }
}
