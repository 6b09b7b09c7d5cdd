//! `AgePools` — finite, per-age candidate queues for one layer.
//!
//! # Pool vs. quota
//!
//! Each age keeps an ordered queue of uids plus a quota: how many of them the
//! layer may still place.  For schools the quota is the whole queue; for
//! workplaces it is the employed share of the potential workers, so the
//! tail of each queue is left behind unassigned.  Draws always pop from the
//! front, which is why worker queues are shuffled at construction.
//!
//! Invariant: `quota[a] <= queues[a].len()` for every age.  A uid lives in
//! exactly one queue and leaves it permanently when taken.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use pn_core::{Age, PersonId, PopRng};

#[derive(Clone, Debug, Default)]
pub struct AgePools {
    queues: Vec<VecDeque<PersonId>>,
    quota:  Vec<usize>,
    /// Cached sum of `quota` for O(1) `total_available()`.
    total:  usize,
}

impl AgePools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build pools from `(uid, age)` pairs, preserving input order within an
    /// age.  Every entry is assignable.
    pub fn from_people(people: impl IntoIterator<Item = (PersonId, Age)>) -> Self {
        let mut pools = Self::new();
        for (uid, age) in people {
            pools.push(uid, age);
        }
        pools
    }

    /// Append `uid` to the back of its age queue and raise that age's quota.
    pub fn push(&mut self, uid: PersonId, age: Age) {
        let a = age as usize;
        if a >= self.queues.len() {
            self.queues.resize_with(a + 1, VecDeque::new);
            self.quota.resize(a + 1, 0);
        }
        self.queues[a].push_back(uid);
        self.quota[a] += 1;
        self.total += 1;
    }

    /// Shuffle every age queue in place.
    pub fn shuffle(&mut self, rng: &mut PopRng) {
        for q in &mut self.queues {
            rng.shuffle(q.make_contiguous());
        }
    }

    /// Lower (never raise) the quota of `age` to `quota`.
    pub fn limit_quota(&mut self, age: Age, quota: usize) {
        if let Some(q) = self.quota.get_mut(age as usize) {
            if quota < *q {
                self.total -= *q - quota;
                *q = quota;
            }
        }
    }

    /// One past the oldest age with a queue.
    #[inline]
    pub fn age_span(&self) -> usize {
        self.queues.len()
    }

    /// How many people of `age` may still be placed.
    #[inline]
    pub fn available(&self, age: Age) -> usize {
        self.quota.get(age as usize).copied().unwrap_or(0)
    }

    /// Remaining quota indexed by age.
    #[inline]
    pub fn available_by_age(&self) -> &[usize] {
        &self.quota
    }

    /// Remaining quota summed over all ages.
    #[inline]
    pub fn total_available(&self) -> usize {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.total == 0
    }

    /// Pop the next uid of `age`, consuming one unit of its quota.
    pub fn take(&mut self, age: Age) -> Option<PersonId> {
        let a = age as usize;
        if self.available(age) == 0 {
            return None;
        }
        let uid = self.queues[a].pop_front()?;
        self.quota[a] -= 1;
        self.total -= 1;
        Some(uid)
    }

    /// Take one uid whose age falls in `range`, choosing the age in
    /// proportion to remaining quota.  `None` once the window is empty.
    pub fn take_in_range(&mut self, range: RangeInclusive<Age>, rng: &mut PopRng) -> Option<(PersonId, Age)> {
        let ages: Vec<Age> = range.filter(|&a| (a as usize) < self.quota.len()).collect();
        let counts: Vec<usize> = ages.iter().map(|&a| self.available(a)).collect();
        let age = ages[rng.pick_weighted_counts(&counts)?];
        self.take(age).map(|uid| (uid, age))
    }

    /// Take every remaining assignable uid, youngest age first.
    pub fn drain_all(&mut self) -> Vec<(PersonId, Age)> {
        let mut out = Vec::with_capacity(self.total);
        for a in 0..self.queues.len() {
            while let Some(uid) = self.take(a as Age) {
                out.push((uid, a as Age));
            }
        }
        out
    }

    /// Uids that were pooled but fell outside their age's quota.
    pub fn leftover(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.queues
            .iter()
            .zip(&self.quota)
            .flat_map(|(q, &quota)| q.iter().skip(quota).copied())
    }
}
