//! Common utilities used across the crate.
//!
//! Parallelism configuration and floating-point comparison helpers.

use rayon::prelude::*;

// =============================================================================
// Floating-point Utilities
// =============================================================================

/// Compare two doubles by their distance in units of least precision.
///
/// Returns `true` when `a` and `b` are at most `max_ulps` representable
/// values apart. `0.0` and `-0.0` compare equal; NaN never does.
#[inline]
pub fn almost_equal_ulps(a: f64, b: f64, max_ulps: u64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a == b {
        return true;
    }
    // Map the sign-magnitude bit pattern onto a monotonic integer line.
    fn ordered(v: f64) -> i128 {
        let bits = v.to_bits() as i64;
        if bits < 0 {
            i64::MIN as i128 - bits as i128
        } else {
            bits as i128
        }
    }
    (ordered(a) - ordered(b)).unsigned_abs() <= max_ulps as u128
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Passed down to tree building and batch prediction. When `Parallel`,
/// components may use `rayon`; the thread pool itself is set up by
/// [`run_with_threads`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Run two closures, concurrently when parallel.
    #[inline]
    pub fn join<A, B, RA, RB>(self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        if self.is_parallel() {
            rayon::join(a, b)
        } else {
            (a(), b())
        }
    }

    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// # Errors
///
/// Fails if rayon cannot spawn the requested pool.
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => Ok(f(Parallelism::Sequential)),
        Parallelism::Parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()?;
            Ok(pool.install(|| f(Parallelism::Parallel)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulps_comparison() {
        assert!(almost_equal_ulps(1.0, 1.0, 0));
        assert!(almost_equal_ulps(0.0, -0.0, 0));
        let next = f64::from_bits(1.0f64.to_bits() + 1);
        assert!(almost_equal_ulps(1.0, next, 1));
        assert!(!almost_equal_ulps(1.0, next, 0));
        assert!(!almost_equal_ulps(-999.0, -999.5, 1));
        assert!(!almost_equal_ulps(f64::NAN, f64::NAN, 10));
        // Smallest values either side of zero are two steps apart.
        let tiny = f64::from_bits(1);
        assert!(almost_equal_ulps(tiny, -tiny, 2));
        assert!(!almost_equal_ulps(tiny, -tiny, 1));
    }

    #[test]
    fn parallelism_from_threads() {
        assert_eq!(Parallelism::from_threads(1), Parallelism::Sequential);
        assert_eq!(Parallelism::from_threads(4), Parallelism::Parallel);
    }

    #[test]
    fn join_runs_both_sides() {
        for p in [Parallelism::Sequential, Parallelism::Parallel] {
            assert_eq!(p.join(|| 1, || "two"), (1, "two"));
        }
    }

    #[test]
    fn run_with_threads_reports_mode() {
        assert_eq!(run_with_threads(1, |p| p).unwrap(), Parallelism::Sequential);
        assert_eq!(run_with_threads(2, |p| p).unwrap(), Parallelism::Parallel);
    }
}
