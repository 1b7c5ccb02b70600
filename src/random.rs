//! Seeded random source shared by every stochastic operator.
//!
//! [`RandomSource`] wraps a [`StdRng`] so that a run is fully reproducible
//! from its seed. It implements [`RngCore`], which means every
//! [`rand::Rng`] helper is available on it as well.
//!
//! No locking is done here: one source belongs to one instance, and workers
//! that need randomness get their own source via [`RandomSource::fork`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

/// Deterministic pseudo-random generator.
///
/// # Examples
///
/// ```
/// use u_gga::random::RandomSource;
///
/// let mut a = RandomSource::new(42);
/// let mut b = RandomSource::new(42);
/// assert_eq!(a.next_double(), b.next_double());
///
/// let mut order: Vec<usize> = (0..10).collect();
/// a.permute(&mut order);
/// order.sort_unstable();
/// assert_eq!(order, (0..10).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Creates a source from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source from an optional seed, drawing one from the thread
    /// generator when `None`.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::new(rand::random()),
        }
    }

    /// Returns a uniform double in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Returns a uniform index in `[0, n)`.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    pub fn next_index(&mut self, n: usize) -> usize {
        assert!(n > 0, "cannot draw an index from an empty range");
        self.rng.random_range(0..n)
    }

    /// Returns `true` with the given probability (clamped to `[0, 1]`).
    pub fn is_hit(&mut self, probability: f64) -> bool {
        self.next_double() < probability.clamp(0.0, 1.0)
    }

    /// Shuffles `items` in place.
    pub fn permute<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Returns a random permutation of `0..n`.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        self.permute(&mut order);
        order
    }

    /// Derives an independent source, e.g. for a worker thread.
    ///
    /// The child seed is drawn from this source, so forking is itself
    /// deterministic.
    pub fn fork(&mut self) -> Self {
        Self::new(self.rng.next_u64())
    }
}

impl RngCore for RandomSource {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }
}
