//! Drawing staff (teachers, non-teaching staff, facility staff) for existing
//! groups from an age window of the worker pools.

use std::ops::RangeInclusive;

use tracing::warn;

use pn_core::{Age, PersonId, PopRng};

use crate::AgePools;

/// `round(members / ratio)`, but never below `min`.
pub fn staff_count(members: usize, ratio: f64, min: usize) -> usize {
    ((members as f64 / ratio).round() as usize).max(min)
}

/// Draw `counts[g]` people for each group `g` from `pools`, restricted to
/// `ages`.  Groups are served in order; once the window is exhausted later
/// groups come back short.
pub fn draw_staff(
    counts: &[usize],
    pools:  &mut AgePools,
    ages:   RangeInclusive<Age>,
    rng:    &mut PopRng,
) -> Vec<Vec<PersonId>> {
    let mut staff = Vec::with_capacity(counts.len());
    let mut short = 0usize;
    for &count in counts {
        let mut members = Vec::with_capacity(count);
        for _ in 0..count {
            match pools.take_in_range(ages.clone(), rng) {
                Some((uid, _)) => members.push(uid),
                None => {
                    short += 1;
                }
            }
        }
        staff.push(members);
    }
    if short > 0 {
        warn!(
            short,
            min_age = ages.start(),
            max_age = ages.end(),
            "not enough workers in the staff age window"
        );
    }
    staff
}
