//! Age brackets and age-mixing contact matrices.
//!
//! # Brackets
//!
//! Mixing matrices are indexed by coarse age brackets (typically sixteen
//! five-year bands with an open-ended last band), while pools are keyed by
//! single years of age.  [`AgeBrackets`] holds both directions of that
//! mapping: bracket → contiguous age range and age → bracket.
//!
//! Ages beyond the last bracket's upper bound are folded into the last
//! bracket, so a person aged 104 in a population whose brackets stop at 100
//! still has a matrix row.

use std::ops::RangeInclusive;

use crate::{PnError, PnResult};

/// Age in whole years.
pub type Age = u8;

/// Oldest age tracked by default bracket layouts.
pub const MAX_AGE: Age = 100;

// ── AgeBrackets ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgeBrackets {
    ranges: Vec<RangeInclusive<Age>>,
    /// `bracket_by_age[a]` for every `a` in `0..=last upper bound`.
    bracket_by_age: Vec<usize>,
}

impl AgeBrackets {
    /// Build from contiguous, ascending ranges starting at age 0.
    pub fn new(ranges: Vec<RangeInclusive<Age>>) -> PnResult<Self> {
        if ranges.is_empty() {
            return Err(PnError::Config("age brackets must not be empty".into()));
        }
        let mut expected_start: usize = 0;
        let mut bracket_by_age = Vec::new();
        for (b, r) in ranges.iter().enumerate() {
            if *r.start() as usize != expected_start || r.end() < r.start() {
                return Err(PnError::Config(format!(
                    "age bracket {b} ({}..={}) is not contiguous with the previous bracket",
                    r.start(),
                    r.end()
                )));
            }
            bracket_by_age.extend(std::iter::repeat_n(b, r.len()));
            expected_start = *r.end() as usize + 1;
        }
        Ok(Self { ranges, bracket_by_age })
    }

    /// `count` brackets of `width` years each, the last one open-ended up to
    /// `max_age`.  `uniform(16, 5, 100)` is the usual 16-bracket layout
    /// (`0..=4`, `5..=9`, …, `75..=100`).
    pub fn uniform(count: usize, width: u8, max_age: Age) -> PnResult<Self> {
        if count == 0 || width == 0 {
            return Err(PnError::Config("bracket count and width must be positive".into()));
        }
        let mut ranges = Vec::with_capacity(count);
        for b in 0..count {
            let start = b * width as usize;
            if start > max_age as usize {
                return Err(PnError::Config(format!(
                    "{count} brackets of {width} years overrun max age {max_age}"
                )));
            }
            let end = if b + 1 == count {
                max_age as usize
            } else {
                (start + width as usize - 1).min(max_age as usize)
            };
            ranges.push(start as Age..=end as Age);
        }
        Self::new(ranges)
    }

    /// Number of brackets.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Bracket containing `age`; ages past the last bracket fold into it.
    #[inline]
    pub fn bracket_of(&self, age: Age) -> usize {
        self.bracket_by_age
            .get(age as usize)
            .copied()
            .unwrap_or(self.ranges.len() - 1)
    }

    /// Ages covered by bracket `b`.
    #[inline]
    pub fn ages(&self, b: usize) -> RangeInclusive<Age> {
        self.ranges[b].clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RangeInclusive<Age>> {
        self.ranges.iter()
    }
}

// ── ContactMatrix ─────────────────────────────────────────────────────────────

/// Square matrix of non-negative relative mixing intensities between age
/// brackets for one layer.  Row = bracket of the anchor person, column =
/// bracket of the contact.
///
/// The matrix is immutable once built.  Samplers that need to exclude
/// exhausted brackets mask columns on the fly instead of zeroing them here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactMatrix {
    dim: usize,
    weights: Vec<f64>,
}

impl ContactMatrix {
    /// Build from row-major `weights` of length `dim * dim`.
    pub fn new(dim: usize, weights: Vec<f64>) -> PnResult<Self> {
        if weights.len() != dim * dim {
            return Err(PnError::InvalidDistribution(format!(
                "contact matrix needs {} weights for dimension {dim}, got {}",
                dim * dim,
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(PnError::InvalidDistribution(format!(
                "contact matrix weight {w} is negative or not finite"
            )));
        }
        Ok(Self { dim, weights })
    }

    /// Build from a square list of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> PnResult<Self> {
        let dim = rows.len();
        if let Some(r) = rows.iter().find(|r| r.len() != dim) {
            return Err(PnError::InvalidDistribution(format!(
                "contact matrix row has {} columns, expected {dim}",
                r.len()
            )));
        }
        Self::new(dim, rows.into_iter().flatten().collect())
    }

    /// Equal weight on every bracket pair.
    pub fn uniform(dim: usize) -> Self {
        Self { dim, weights: vec![1.0; dim * dim] }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Weights of row `b` (one per target bracket).
    #[inline]
    pub fn row(&self, b: usize) -> &[f64] {
        &self.weights[b * self.dim..(b + 1) * self.dim]
    }

    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.dim + col]
    }

    /// Check this matrix can be indexed by `brackets`.
    pub fn check_brackets(&self, brackets: &AgeBrackets) -> PnResult<()> {
        if self.dim != brackets.len() {
            return Err(PnError::MatrixShape { expected: brackets.len(), got: self.dim });
        }
        Ok(())
    }
}
