//! Wall-clock instrumentation kept apart from the algorithm results

use std::time::{Duration, Instant};

/// A result together with the time it took to produce
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<R> {
    pub result: R,
    pub elapsed: Duration,
}

impl<R> Timed<R> {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Run `f` once and measure it
pub fn timed<R, E, F>(f: F) -> Result<Timed<R>, E>
where
    F: FnOnce() -> Result<R, E>,
{
    let start = Instant::now();
    let result = f()?;
    Ok(Timed {
        result,
        elapsed: start.elapsed(),
    })
}

/// Run `f` `iterations` times and return the last result with the mean time.
///
/// # Panics
///
/// Panics if `iterations` is zero.
pub fn averaged<R, E, F>(iterations: usize, mut f: F) -> Result<Timed<R>, E>
where
    F: FnMut() -> Result<R, E>,
{
    assert!(iterations > 0, "at least one iteration is required");
    let start = Instant::now();
    let mut result = f()?;
    for _ in 1..iterations {
        result = f()?;
    }
    Ok(Timed {
        result,
        elapsed: mean_duration(start.elapsed(), iterations),
    })
}

fn mean_duration(total: Duration, iterations: usize) -> Duration {
    total.div_f64(iterations as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_passes_result_through() {
        let timed = timed(|| Ok::<_, ()>(7)).unwrap();
        assert_eq!(timed.result, 7);
        assert!(timed.millis() >= 0.0);
    }

    #[test]
    fn test_averaged_runs_every_iteration() {
        let mut calls = 0;
        let timed = averaged(5, || {
            calls += 1;
            Ok::<_, ()>(calls)
        })
        .unwrap();
        assert_eq!(timed.result, 5);
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_mean_duration_for_huge_counts() {
        let total = Duration::from_secs(8);
        assert_eq!(mean_duration(total, 4), Duration::from_secs(2));
        if usize::BITS > 32 {
            // A count that truncates to zero as u32
            let mean = mean_duration(total, (1u64 << 32) as usize);
            assert!(mean > Duration::ZERO && mean < Duration::from_micros(1));
        }
    }

    #[test]
    fn test_error_stops_timing() {
        let err = timed(|| Err::<u32, _>("boom")).unwrap_err();
        assert_eq!(err, "boom");
    }
}
