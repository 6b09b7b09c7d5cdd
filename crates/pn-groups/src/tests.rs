//! Unit tests for pn-groups.

#[cfg(test)]
mod sizes {
    use pn_core::PopRng;

    use crate::{SizeDistribution, sample_group_sizes};

    fn workplace_dist() -> SizeDistribution {
        SizeDistribution::new(vec![(55.0, 1..=4), (20.0, 5..=9), (15.0, 10..=19), (10.0, 20..=49)]).unwrap()
    }

    #[test]
    fn zero_headcount_is_empty() {
        let mut rng = PopRng::new(0);
        assert!(sample_group_sizes(&workplace_dist(), 0, &mut rng).is_empty());
    }

    #[test]
    fn headcount_one_yields_single_group_of_one() {
        let dist = SizeDistribution::new(vec![(1.0, 10..=20)]).unwrap();
        let mut rng = PopRng::new(0);
        assert_eq!(sample_group_sizes(&dist, 1, &mut rng), vec![1]);
    }

    #[test]
    fn sums_exactly() {
        let mut rng = PopRng::new(11);
        for n in [1, 2, 7, 100, 1_234, 10_000] {
            let sizes = sample_group_sizes(&workplace_dist(), n, &mut rng);
            assert_eq!(sizes.iter().sum::<usize>(), n);
            assert!(sizes.iter().all(|&s| s > 0));
        }
    }

    #[test]
    fn probabilities_are_normalised() {
        let dist = workplace_dist();
        let total: f64 = dist.brackets().iter().map(|b| b.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((dist.brackets()[0].probability - 0.55).abs() < 1e-12);
    }

    #[test]
    fn zero_probability_bracket_never_drawn() {
        let dist = SizeDistribution::new(vec![(0.0, 1..=1), (1.0, 5..=5)]).unwrap();
        let mut rng = PopRng::new(2);
        let sizes = sample_group_sizes(&dist, 50, &mut rng);
        assert_eq!(sizes, vec![5; 10]);
    }

    #[test]
    fn sample_follows_bracket_probabilities() {
        let dist = SizeDistribution::new(vec![(1.0, 1..=1), (3.0, 2..=2)]).unwrap();
        let mut rng = PopRng::new(8);
        let twos = (0..10_000).filter(|_| dist.sample(&mut rng) == 2).count();
        // Expect ~7,500.
        assert!((7_000..8_000).contains(&twos), "got {twos}");
    }

    #[test]
    fn rejects_invalid_brackets() {
        assert!(SizeDistribution::new(vec![]).is_err());
        assert!(SizeDistribution::new(vec![(0.0, 1..=2)]).is_err());
        assert!(SizeDistribution::new(vec![(1.0, 0..=2)]).is_err());
        assert!(SizeDistribution::new(vec![(-1.0, 1..=2), (2.0, 3..=4)]).is_err());
    }

    #[test]
    fn deterministic_for_seed() {
        let a = sample_group_sizes(&workplace_dist(), 500, &mut PopRng::new(5));
        let b = sample_group_sizes(&workplace_dist(), 500, &mut PopRng::new(5));
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod pools {
    use pn_core::{PersonId, PopRng};

    use crate::AgePools;

    fn sample() -> AgePools {
        AgePools::from_people([
            (PersonId(0), 30),
            (PersonId(1), 30),
            (PersonId(2), 31),
            (PersonId(3), 45),
        ])
    }

    #[test]
    fn take_pops_front_and_consumes_quota() {
        let mut pools = sample();
        assert_eq!(pools.total_available(), 4);
        assert_eq!(pools.take(30), Some(PersonId(0)));
        assert_eq!(pools.available(30), 1);
        assert_eq!(pools.total_available(), 3);
        assert_eq!(pools.take(30), Some(PersonId(1)));
        assert_eq!(pools.take(30), None);
        assert_eq!(pools.take(99), None);
    }

    #[test]
    fn quota_limits_takes_and_leaves_leftovers() {
        let mut pools = sample();
        pools.limit_quota(30, 1);
        pools.limit_quota(45, 5); // never raises
        assert_eq!(pools.available(30), 1);
        assert_eq!(pools.available(45), 1);
        assert_eq!(pools.total_available(), 3);
        assert_eq!(pools.take(30), Some(PersonId(0)));
        assert_eq!(pools.take(30), None);
        assert_eq!(pools.leftover().collect::<Vec<_>>(), vec![PersonId(1)]);
    }

    #[test]
    fn drain_all_respects_quota() {
        let mut pools = sample();
        pools.limit_quota(31, 0);
        let drained: Vec<_> = pools.drain_all().into_iter().map(|(uid, _)| uid).collect();
        assert_eq!(drained, vec![PersonId(0), PersonId(1), PersonId(3)]);
        assert!(pools.is_exhausted());
    }

    #[test]
    fn take_in_range_stays_in_window() {
        let mut pools = sample();
        let mut rng = PopRng::new(4);
        let mut got = Vec::new();
        while let Some((uid, age)) = pools.take_in_range(30..=40, &mut rng) {
            assert!((30..=40).contains(&age));
            got.push(uid);
        }
        got.sort();
        assert_eq!(got, vec![PersonId(0), PersonId(1), PersonId(2)]);
        assert_eq!(pools.available(45), 1);
    }
}

#[cfg(test)]
mod allocator {
    use std::collections::BTreeSet;

    use pn_core::{AgeBrackets, ContactMatrix, PersonId, PnError, PopRng};

    use crate::{AgeMixingAllocator, AgePools};

    fn brackets() -> AgeBrackets {
        AgeBrackets::uniform(4, 20, 79).unwrap()
    }

    /// 100 people at each of ages 10, 30, 50, 70 (one per bracket).
    fn population() -> AgePools {
        AgePools::from_people((0..400u32).map(|i| (PersonId(i), (10 + 20 * (i / 100)) as u8)))
    }

    #[test]
    fn rejects_mismatched_matrix() {
        let m = ContactMatrix::uniform(3);
        let b = brackets();
        assert!(matches!(
            AgeMixingAllocator::new(&b, &m),
            Err(PnError::MatrixShape { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn partitions_the_pool() {
        let b = brackets();
        let m = ContactMatrix::uniform(4);
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();
        let mut pools = population();
        let sizes = vec![7, 13, 50, 30, 100, 200];
        let groups = alloc.allocate(&sizes, &mut pools, &mut PopRng::new(1));

        let mut seen = BTreeSet::new();
        for g in &groups {
            for uid in &g.members {
                assert!(seen.insert(*uid), "{uid} placed twice");
            }
        }
        assert_eq!(seen.len(), 400);
        assert!(pools.is_exhausted());
    }

    #[test]
    fn groups_never_exceed_target_before_final_drain() {
        let b = brackets();
        let m = ContactMatrix::uniform(4);
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();
        let mut pools = population();
        let sizes = vec![10; 40];
        let groups = alloc.allocate(&sizes, &mut pools, &mut PopRng::new(2));
        assert_eq!(groups.len(), 40);
        for g in &groups {
            assert_eq!(g.len(), 10);
        }
    }

    #[test]
    fn remainder_drains_into_final_group() {
        let b = brackets();
        let m = ContactMatrix::uniform(4);
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();
        let mut pools = population();
        // Second group requests more than the 390 left.
        let groups = alloc.allocate(&[10, 395, 5], &mut pools, &mut PopRng::new(3));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].len(), 390);
        assert_eq!(groups[1].target, 395);
    }

    #[test]
    fn short_size_list_leaves_people_pooled() {
        let b = brackets();
        let m = ContactMatrix::uniform(4);
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();
        let mut pools = population();
        let groups = alloc.allocate(&[10, 10], &mut pools, &mut PopRng::new(3));
        assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), 20);
        assert_eq!(pools.total_available(), 380);
    }

    #[test]
    fn concentrated_matrix_is_followed() {
        // All mixing from bracket 1 goes to bracket 2 and vice versa.
        let mut w = vec![0.0; 16];
        w[1 * 4 + 2] = 1.0;
        w[2 * 4 + 1] = 1.0;
        let m = ContactMatrix::new(4, w).unwrap();
        let b = brackets();
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();

        // Plenty of ages 30 and 50, nobody else.
        let mut pools = AgePools::from_people(
            (0..2_000u32).map(|i| (PersonId(i), if i % 2 == 0 { 30 } else { 50 })),
        );
        let ages: Vec<u8> = (0..2_000u32).map(|i| if i % 2 == 0 { 30 } else { 50 }).collect();
        let groups = alloc.allocate(&vec![5; 100], &mut pools, &mut PopRng::new(4));

        let mut cross = 0usize;
        let mut placements = 0usize;
        for g in &groups {
            let anchor = ages[g.members[0].index()];
            for uid in &g.members[1..] {
                placements += 1;
                if ages[uid.index()] != anchor {
                    cross += 1;
                }
            }
        }
        assert!(placements > 0);
        assert!(cross as f64 >= 0.95 * placements as f64, "{cross}/{placements}");
    }

    #[test]
    fn exhausted_target_bracket_falls_back_without_looping() {
        // Bracket 0 only mixes with bracket 3, which has a single person.
        let mut w = vec![0.0; 16];
        w[0 * 4 + 3] = 1.0;
        let m = ContactMatrix::new(4, w).unwrap();
        let b = brackets();
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();

        let mut people: Vec<(PersonId, u8)> = (0..50u32).map(|i| (PersonId(i), 10)).collect();
        people.push((PersonId(50), 70));
        let mut pools = AgePools::from_people(people);
        let groups = alloc.allocate(&[20, 20, 11], &mut pools, &mut PopRng::new(5));
        assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), 51);
        assert!(pools.is_exhausted());
    }

    #[test]
    fn matrix_is_not_mutated() {
        let m = ContactMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        let before = m.clone();
        let b = brackets();
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();
        let mut pools = population();
        alloc.allocate(&vec![25; 16], &mut pools, &mut PopRng::new(6));
        assert_eq!(m, before);
    }

    #[test]
    fn deterministic_for_seed() {
        let b = brackets();
        let m = ContactMatrix::uniform(4);
        let alloc = AgeMixingAllocator::new(&b, &m).unwrap();
        let run = |seed| {
            let mut pools = population();
            alloc.allocate(&vec![20; 20], &mut pools, &mut PopRng::new(seed))
        };
        assert_eq!(run(9), run(9));
    }
}

#[cfg(test)]
mod selection {
    use std::collections::{BTreeMap, BTreeSet};

    use pn_core::{PersonId, PopRng};

    use crate::{potential_workers, select_students};

    /// 10 people of each age 0..=69.
    fn ages() -> Vec<u8> {
        (0..700u32).map(|i| (i / 10) as u8).collect()
    }

    #[test]
    fn enrolment_takes_rate_share_per_age() {
        let ages = ages();
        let enrollment = BTreeMap::from([(6, 1.0), (7, 0.5), (20, 0.0)]);
        let mut pools = select_students(&ages, &enrollment, |_| true, &mut PopRng::new(1));
        assert_eq!(pools.available(6), 10);
        assert_eq!(pools.available(7), 5);
        assert_eq!(pools.available(20), 0);
        assert_eq!(pools.total_available(), 15);
        while let Some(uid) = pools.take(7) {
            assert_eq!(ages[uid.index()], 7);
        }
    }

    #[test]
    fn ineligible_people_are_never_pooled() {
        let ages = ages();
        let enrollment = BTreeMap::from([(6, 1.0)]);
        let mut pools = select_students(&ages, &enrollment, |uid| uid.0 % 2 == 0, &mut PopRng::new(1));
        assert_eq!(pools.available(6), 5);
        for (uid, _) in pools.drain_all() {
            assert_eq!(uid.0 % 2, 0);
        }
    }

    #[test]
    fn worker_quota_uses_everyone_of_age() {
        let ages = ages();
        let employment = BTreeMap::from([(30, 0.8), (31, 0.8)]);
        // Half of age 30 is unavailable (e.g. already students).
        let excluded: BTreeSet<PersonId> = (300..305).map(PersonId).collect();
        let pools = potential_workers(&ages, &employment, |uid| !excluded.contains(&uid), &mut PopRng::new(2));
        assert_eq!(pools.available(30), 5); // min(8, 5)
        assert_eq!(pools.available(31), 8);
        assert_eq!(pools.available(29), 0);
        assert_eq!(pools.leftover().count(), 2);
    }
}

#[cfg(test)]
mod staff {
    use pn_core::{PersonId, PopRng};

    use crate::{AgePools, draw_staff, staff_count};

    #[test]
    fn staff_count_rounds_with_minimum() {
        assert_eq!(staff_count(100, 20.0, 1), 5);
        assert_eq!(staff_count(3, 20.0, 1), 1);
        assert_eq!(staff_count(3, 20.0, 0), 0);
        assert_eq!(staff_count(31, 20.0, 1), 2);
    }

    #[test]
    fn draws_only_from_window_and_comes_back_short() {
        let mut pools = AgePools::from_people((0..10u32).map(|i| (PersonId(i), if i < 3 { 30 } else { 18 })));
        let staff = draw_staff(&[2, 2], &mut pools, 25..=75, &mut PopRng::new(3));
        assert_eq!(staff[0].len(), 2);
        assert_eq!(staff[1].len(), 1);
        for uid in staff.iter().flatten() {
            assert!(uid.0 < 3);
        }
        assert_eq!(pools.total_available(), 7);
    }
}

#[cfg(test)]
mod properties {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use pn_core::{AgeBrackets, ContactMatrix, PersonId, PopRng};

    use crate::{AgeMixingAllocator, AgePools, SizeDistribution, sample_group_sizes};

    proptest! {
        #[test]
        fn sampled_sizes_sum_to_headcount(n in 0usize..5_000, seed in any::<u64>()) {
            let dist = SizeDistribution::new(vec![(3.0, 1..=5), (1.0, 6..=40)]).unwrap();
            let sizes = sample_group_sizes(&dist, n, &mut PopRng::new(seed));
            prop_assert_eq!(sizes.iter().sum::<usize>(), n);
            prop_assert_eq!(sizes.is_empty(), n == 0);
        }

        #[test]
        fn allocation_is_a_set_partition(
            ages in proptest::collection::vec(0u8..=100, 1..600),
            seed in any::<u64>(),
        ) {
            let brackets = AgeBrackets::uniform(16, 5, 100).unwrap();
            let matrix = ContactMatrix::uniform(16);
            let alloc = AgeMixingAllocator::new(&brackets, &matrix).unwrap();
            let dist = SizeDistribution::new(vec![(1.0, 1..=12)]).unwrap();

            let mut rng = PopRng::new(seed);
            let mut pools = AgePools::from_people(
                ages.iter().enumerate().map(|(i, &a)| (PersonId(i as u32), a)),
            );
            let sizes = sample_group_sizes(&dist, ages.len(), &mut rng);
            let groups = alloc.allocate(&sizes, &mut pools, &mut rng);

            let mut seen = BTreeSet::new();
            for g in &groups {
                for uid in &g.members {
                    prop_assert!(seen.insert(*uid));
                }
            }
            prop_assert_eq!(seen.len(), ages.len());
        }
    }
}
