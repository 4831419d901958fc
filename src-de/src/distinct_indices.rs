use rand::Rng;

/// Draw two partner indices, distinct from each other and from `exclude`.
///
/// Rejection sampling; terminates because the engine refuses populations
/// smaller than three.
pub(crate) fn distinct_pair<R: Rng + ?Sized>(
    exclude: usize,
    pool_size: usize,
    rng: &mut R,
) -> (usize, usize) {
    debug_assert!(pool_size >= 3);
    loop {
        let a = rng.random_range(0..pool_size);
        let b = rng.random_range(0..pool_size);
        if a != exclude && b != exclude && a != b {
            return (a, b);
        }
    }
}
