//! Group-Size Sampler.
//!
//! Turns a bracketed size distribution (e.g. "workplaces of 1–4 people: 55%,
//! 5–9: 20%, …") and a headcount into concrete group sizes that sum to the
//! headcount exactly.

use std::ops::RangeInclusive;

use rand::distributions::WeightedIndex;

use pn_core::{PnError, PnResult, PopRng};

/// One bracket of a size distribution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeBracket {
    /// Normalised probability of drawing this bracket.
    pub probability: f64,
    /// Concrete sizes the bracket covers; a size is drawn uniformly from it.
    pub sizes: RangeInclusive<usize>,
}

/// Normalised distribution over group-size brackets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeDistribution {
    brackets: Vec<SizeBracket>,
    /// Bracket picker, built once from the normalised probabilities.
    index:    WeightedIndex<f64>,
}

impl SizeDistribution {
    /// Build from `(weight, sizes)` pairs.  Weights may be raw counts; they
    /// are normalised here.
    pub fn new(brackets: Vec<(f64, RangeInclusive<usize>)>) -> PnResult<Self> {
        if brackets.is_empty() {
            return Err(PnError::InvalidDistribution("no size brackets".into()));
        }
        for (w, sizes) in &brackets {
            if !w.is_finite() || *w < 0.0 {
                return Err(PnError::InvalidDistribution(format!(
                    "size bracket weight {w} is negative or not finite"
                )));
            }
            if *sizes.start() == 0 || sizes.is_empty() {
                return Err(PnError::InvalidDistribution(format!(
                    "size bracket {}..={} must be non-empty and start at 1 or more",
                    sizes.start(),
                    sizes.end()
                )));
            }
        }
        let total: f64 = brackets.iter().map(|(w, _)| w).sum();
        if total <= 0.0 {
            return Err(PnError::InvalidDistribution("size brackets have zero total weight".into()));
        }
        let brackets: Vec<SizeBracket> = brackets
            .into_iter()
            .map(|(w, sizes)| SizeBracket { probability: w / total, sizes })
            .collect();
        let index = WeightedIndex::new(brackets.iter().map(|b| b.probability))
            .map_err(|e| PnError::InvalidDistribution(format!("size brackets: {e}")))?;
        Ok(Self { brackets, index })
    }

    pub fn brackets(&self) -> &[SizeBracket] {
        &self.brackets
    }

    /// Draw one concrete size: a bracket by probability, then a size
    /// uniformly within it.
    pub fn sample(&self, rng: &mut PopRng) -> usize {
        let b = rng.sample(&self.index);
        rng.gen_range(self.brackets[b].sizes.clone())
    }
}

/// Draw group sizes until they cover `headcount`, then shuffle.
///
/// Only the last drawn size is trimmed on overshoot, so
/// `sizes.iter().sum() == headcount` always and `headcount == 0` yields an
/// empty list.  The final shuffle decouples creation order from size.
pub fn sample_group_sizes(dist: &SizeDistribution, headcount: usize, rng: &mut PopRng) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut remaining = headcount;
    while remaining > 0 {
        let size = dist.sample(rng).min(remaining);
        sizes.push(size);
        remaining -= size;
    }
    rng.shuffle(&mut sizes);
    sizes
}
