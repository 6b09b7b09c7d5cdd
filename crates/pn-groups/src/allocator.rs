//! Age-Mixing Allocator.
//!
//! Fills groups one person at a time so that the realised age×age pattern
//! inside groups approximates a layer's contact matrix, while consuming
//! finite [`AgePools`] without replacement.
//!
//! # Per group
//!
//! ```text
//! ① anchor age  ~ remaining quota by age          → pop first member
//! ② row         = matrix[bracket(anchor)]
//! ③ each slot:  bracket ~ row × open-bracket mask  (uniform over open
//!                                                   brackets if that is 0)
//!               age     ~ remaining quota within the bracket
//!               pop member
//! ```
//!
//! When the people left are no more than the next requested size, they all
//! go into one final group without consulting the matrix.
//!
//! # Exhaustion
//!
//! The matrix is never modified.  A per-bracket remaining-capacity vector
//! masks exhausted columns at draw time, so the same matrix can be reused for
//! the next layer or the next build.

use tracing::{debug, warn};

use pn_core::{Age, AgeBrackets, ContactMatrix, PersonId, PnResult, PopRng};

use crate::AgePools;

// ── Group ─────────────────────────────────────────────────────────────────────

/// A filled group: its requested size and who ended up in it.
///
/// `members.len()` never exceeds `target` except for the final drain group,
/// which absorbs whoever is left.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub target:  usize,
    pub members: Vec<PersonId>,
}

impl Group {
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ── BracketCapacity ───────────────────────────────────────────────────────────

/// Remaining assignable people per bracket, plus the pool ages that fall in
/// each bracket.
struct BracketCapacity {
    remaining: Vec<usize>,
    ages:      Vec<Vec<Age>>,
}

impl BracketCapacity {
    fn new(brackets: &AgeBrackets, pools: &AgePools) -> Self {
        let mut remaining = vec![0; brackets.len()];
        let mut ages = vec![Vec::new(); brackets.len()];
        for a in 0..pools.age_span() {
            let age = a as Age;
            let b = brackets.bracket_of(age);
            ages[b].push(age);
            remaining[b] += pools.available(age);
        }
        Self { remaining, ages }
    }

    #[inline]
    fn is_open(&self, b: usize) -> bool {
        self.remaining[b] > 0
    }

    /// Row weights with exhausted columns zeroed.
    fn masked_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(j, &w)| if self.is_open(j) { w } else { 0.0 })
            .collect()
    }

    fn open_brackets(&self) -> Vec<usize> {
        (0..self.remaining.len()).filter(|&b| self.is_open(b)).collect()
    }

    /// Draw an age in bracket `b` weighted by remaining quota.
    fn draw_age(&self, b: usize, pools: &AgePools, rng: &mut PopRng) -> Option<Age> {
        let counts: Vec<usize> = self.ages[b].iter().map(|&a| pools.available(a)).collect();
        rng.pick_weighted_counts(&counts).map(|i| self.ages[b][i])
    }

    #[inline]
    fn consume(&mut self, b: usize) {
        self.remaining[b] -= 1;
    }
}

// ── AgeMixingAllocator ────────────────────────────────────────────────────────

/// Places pooled people into groups following one layer's contact matrix.
pub struct AgeMixingAllocator<'a> {
    brackets: &'a AgeBrackets,
    matrix:   &'a ContactMatrix,
}

impl<'a> AgeMixingAllocator<'a> {
    /// Fails with `MatrixShape` if `matrix` is not indexed by `brackets`.
    pub fn new(brackets: &'a AgeBrackets, matrix: &'a ContactMatrix) -> PnResult<Self> {
        matrix.check_brackets(brackets)?;
        Ok(Self { brackets, matrix })
    }

    /// Fill one group per entry of `sizes`, in order, consuming `pools`.
    ///
    /// If `sizes` sums to at least the pools' total quota, every assignable
    /// uid ends up in exactly one group.  Groups stop being created once the
    /// pools are empty; if the sizes run out first the remaining people stay
    /// in `pools`.
    pub fn allocate(&self, sizes: &[usize], pools: &mut AgePools, rng: &mut PopRng) -> Vec<Group> {
        let mut capacity = BracketCapacity::new(self.brackets, pools);
        let mut groups = Vec::with_capacity(sizes.len());

        for (n, &target) in sizes.iter().enumerate() {
            let left = pools.total_available();
            if left == 0 {
                debug!(created = groups.len(), requested = sizes.len(), "pools exhausted");
                break;
            }
            if target == 0 {
                continue;
            }
            if left <= target {
                let members: Vec<PersonId> = pools.drain_all().into_iter().map(|(uid, _)| uid).collect();
                debug!(group = n, target, size = members.len(), "placing remainder in final group");
                groups.push(Group { target, members });
                break;
            }
            groups.push(self.fill_group(target, pools, &mut capacity, rng));
        }

        if !pools.is_exhausted() {
            warn!(
                left = pools.total_available(),
                "group sizes ran out before the pools; people left unplaced"
            );
        }
        groups
    }

    /// Anchor plus `target - 1` matrix-guided draws.  Callers guarantee
    /// `pools.total_available() > target`.
    fn fill_group(
        &self,
        target:   usize,
        pools:    &mut AgePools,
        capacity: &mut BracketCapacity,
        rng:      &mut PopRng,
    ) -> Group {
        let mut members = Vec::with_capacity(target);

        let Some(anchor_age) = rng.pick_weighted_counts(pools.available_by_age()) else {
            return Group { target, members };
        };
        let anchor_age = anchor_age as Age;
        let row_bracket = self.brackets.bracket_of(anchor_age);
        if let Some(uid) = pools.take(anchor_age) {
            members.push(uid);
            capacity.consume(row_bracket);
        }

        let row = self.matrix.row(row_bracket);
        let slots = target.saturating_sub(1).min(pools.total_available());
        for _ in 0..slots {
            let Some(b) = self.draw_bracket(row, capacity, rng) else { break };
            let Some(age) = capacity.draw_age(b, pools, rng) else { break };
            if let Some(uid) = pools.take(age) {
                members.push(uid);
                capacity.consume(b);
            }
        }
        Group { target, members }
    }

    /// Target bracket from the masked row, or uniformly over open brackets
    /// when the row has no mass left.
    fn draw_bracket(&self, row: &[f64], capacity: &BracketCapacity, rng: &mut PopRng) -> Option<usize> {
        if let Some(b) = rng.pick_weighted(&capacity.masked_row(row)) {
            return Some(b);
        }
        rng.choose(&capacity.open_brackets()).copied()
    }
}
