//! Deterministic random number generation for network synthesis.
//!
//! # Determinism strategy
//!
//! A build owns exactly one [`PopRng`], seeded from `NetworkConfig::seed`
//! and passed by `&mut` into every sampling call.  There is no process-wide
//! generator, so two builds with the same seed and the same inputs draw the
//! same sequence and produce the same network, and independent builds can
//! run side by side (e.g. in parallel tests) without interfering.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The generator threaded through a population build.
///
/// Not `Clone`.  Use [`PopRng::child`] for an independent substream.
pub struct PopRng(SmallRng);

impl PopRng {
    pub fn new(seed: u64) -> Self {
        PopRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `PopRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> PopRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        PopRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// Draw up to `amount` distinct elements of `slice` without replacement.
    ///
    /// When `amount >= slice.len()` every element is returned (in random
    /// order).
    pub fn sample_distinct<T: Clone>(&mut self, slice: &[T], amount: usize) -> Vec<T> {
        let amount = amount.min(slice.len());
        rand::seq::index::sample(&mut self.0, slice.len(), amount)
            .into_iter()
            .map(|i| slice[i].clone())
            .collect()
    }

    /// Draw one value from a `rand` distribution.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.0)
    }

    /// Index drawn proportionally to `weights`.
    ///
    /// Negative, NaN, and infinite weights count as zero.  Returns `None` when
    /// no weight is positive, so callers decide the fallback explicitly
    /// instead of resampling.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let usable = weights.iter().map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
        let index = WeightedIndex::<f64>::new(usable).ok()?;
        Some(index.sample(&mut self.0))
    }

    /// Index drawn proportionally to integer `counts`.  `None` when every
    /// count is zero.
    pub fn pick_weighted_counts(&mut self, counts: &[usize]) -> Option<usize> {
        let index = WeightedIndex::<usize>::new(counts).ok()?;
        Some(index.sample(&mut self.0))
    }
}
