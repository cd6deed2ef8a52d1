//! Parallelism configuration shared by training and batch inference.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Passed down through the tree builder and the batch classifier. When
/// `Parallel`, components may use `rayon` parallel iterators; results are
/// always collected in input order so output never depends on scheduling.
///
/// The thread pool itself is set up once at the entry point via `n_threads`
/// (see [`run_with_threads`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the global rayon pool has multiple threads)
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

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map over `iter`, in parallel when allowed. Output keeps input order.
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
/// - `0` = use the global rayon pool
/// - `1` = sequential (no thread pool)
/// - `n > 1` = dedicated pool with exactly `n` threads
///
/// # Errors
///
/// Fails if a dedicated pool cannot be created.
///
/// # Example
///
/// ```
/// use entrotree::utils::run_with_threads;
///
/// let sum = run_with_threads(2, |par| {
///     par.maybe_par_map(vec![1, 2, 3], |x| x * 2).into_iter().sum::<i32>()
/// })
/// .unwrap();
/// assert_eq!(sum, 12);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    let parallelism = Parallelism::from_threads(n_threads);

    match (parallelism, n_threads) {
        (Parallelism::Sequential, _) => Ok(f(Parallelism::Sequential)),
        (Parallelism::Parallel, 0) => Ok(f(Parallelism::Parallel)),
        (Parallelism::Parallel, n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(|| f(Parallelism::Parallel)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallelism_from_threads() {
        assert!(!Parallelism::from_threads(1).is_parallel());
        assert!(Parallelism::from_threads(4).is_parallel());
        assert_eq!(
            Parallelism::from_threads(0).is_parallel(),
            rayon::current_num_threads() > 1
        );
    }

    #[test]
    fn test_maybe_par_map_keeps_order() {
        let input: Vec<usize> = (0..1000).collect();
        for par in [Parallelism::Sequential, Parallelism::Parallel] {
            let out = par.maybe_par_map(input.clone(), |x| x * 3);
            assert_eq!(out, input.iter().map(|x| x * 3).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_run_with_threads() {
        assert_eq!(run_with_threads(1, |p| p).unwrap(), Parallelism::Sequential);
        let (par, threads) = run_with_threads(3, |p| (p, rayon::current_num_threads())).unwrap();
        assert_eq!(par, Parallelism::Parallel);
        assert_eq!(threads, 3);
    }
}
