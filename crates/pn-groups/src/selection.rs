//! Enrolment and employment selection.
//!
//! Both functions take the per-uid age slice (`ages[uid.index()]`) and an
//! eligibility predicate, and return fresh [`AgePools`] for one layer.
//! Rates are per single year of age; ages without a rate contribute nobody.

use std::collections::BTreeMap;

use tracing::debug;

use pn_core::{Age, PersonId, PopRng};

use crate::AgePools;

/// Eligible uids grouped by age, in uid order.
fn eligible_by_age(ages: &[Age], eligible: impl Fn(PersonId) -> bool) -> BTreeMap<Age, Vec<PersonId>> {
    let mut by_age: BTreeMap<Age, Vec<PersonId>> = BTreeMap::new();
    for (i, &age) in ages.iter().enumerate() {
        let uid = PersonId(i as u32);
        if eligible(uid) {
            by_age.entry(age).or_default().push(uid);
        }
    }
    by_age
}

/// Choose students: for each age with enrolment rate `r`,
/// `floor(r * eligible_of_age)` people uniformly without replacement.
pub fn select_students(
    ages:       &[Age],
    enrollment: &BTreeMap<Age, f64>,
    eligible:   impl Fn(PersonId) -> bool,
    rng:        &mut PopRng,
) -> AgePools {
    let mut pools = AgePools::new();
    for (age, uids) in eligible_by_age(ages, eligible) {
        let Some(&rate) = enrollment.get(&age) else { continue };
        let count = (rate.clamp(0.0, 1.0) * uids.len() as f64) as usize;
        for uid in rng.sample_distinct(&uids, count) {
            pools.push(uid, age);
        }
    }
    debug!(students = pools.total_available(), "selected students");
    pools
}

/// Pools of potential workers with employment quotas.
///
/// Everyone eligible whose age has an employment rate is pooled (shuffled
/// per age).  The quota for an age is `floor(rate * everyone_of_age)`,
/// capped at the pool length, so ages depleted by schooling simply employ
/// fewer people.
pub fn potential_workers(
    ages:       &[Age],
    employment: &BTreeMap<Age, f64>,
    eligible:   impl Fn(PersonId) -> bool,
    rng:        &mut PopRng,
) -> AgePools {
    let mut everyone_of_age: BTreeMap<Age, usize> = BTreeMap::new();
    for &age in ages {
        *everyone_of_age.entry(age).or_default() += 1;
    }

    let mut pools = AgePools::new();
    for (age, uids) in eligible_by_age(ages, eligible) {
        if employment.contains_key(&age) {
            for uid in uids {
                pools.push(uid, age);
            }
        }
    }
    pools.shuffle(rng);

    for (&age, &rate) in employment {
        let of_age = everyone_of_age.get(&age).copied().unwrap_or(0);
        pools.limit_quota(age, (rate.clamp(0.0, 1.0) * of_age as f64) as usize);
    }
    debug!(workers = pools.total_available(), "selected potential workers");
    pools
}
