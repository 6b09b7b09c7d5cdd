//! Unit tests for pn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{GroupId, PersonId};

    #[test]
    fn index_roundtrip() {
        let id = PersonId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PersonId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(PersonId::INVALID.0, u32::MAX);
        assert_eq!(GroupId::INVALID.0, u32::MAX);
        assert_eq!(GroupId::default(), GroupId::INVALID);
    }

    #[test]
    fn valid_filters_sentinel() {
        assert_eq!(GroupId(3).valid(), Some(GroupId(3)));
        assert_eq!(GroupId::INVALID.valid(), None);
    }

    #[test]
    fn display() {
        assert_eq!(PersonId(7).to_string(), "PersonId(7)");
    }
}

#[cfg(test)]
mod layer {
    use crate::{Layer, Sex};

    #[test]
    fn index_matches_all_order() {
        for (i, layer) in Layer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
        }
    }

    #[test]
    fn display() {
        assert_eq!(Layer::Workplace.to_string(), "W");
        assert_eq!(Layer::Ltcf.to_string(), "LTCF");
        assert_eq!(Sex::Male.to_string(), "male");
    }
}

#[cfg(test)]
mod brackets {
    use crate::{AgeBrackets, ContactMatrix, PnError};

    #[test]
    fn sixteen_bracket_layout() {
        let b = AgeBrackets::uniform(16, 5, 100).unwrap();
        assert_eq!(b.len(), 16);
        assert_eq!(b.ages(0), 0..=4);
        assert_eq!(b.ages(14), 70..=74);
        assert_eq!(b.ages(15), 75..=100);
        assert_eq!(b.bracket_of(0), 0);
        assert_eq!(b.bracket_of(37), 7);
        assert_eq!(b.bracket_of(100), 15);
    }

    #[test]
    fn ages_past_last_bracket_fold_in() {
        let b = AgeBrackets::new(vec![0..=9, 10..=19]).unwrap();
        assert_eq!(b.bracket_of(19), 1);
        assert_eq!(b.bracket_of(120), 1);
    }

    #[test]
    fn gaps_are_rejected() {
        assert!(matches!(
            AgeBrackets::new(vec![0..=9, 11..=19]),
            Err(PnError::Config(_))
        ));
        assert!(AgeBrackets::new(vec![]).is_err());
    }

    #[test]
    fn matrix_rows() {
        let m = ContactMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.weight(0, 1), 2.0);
    }

    #[test]
    fn matrix_rejects_bad_weights() {
        assert!(ContactMatrix::new(2, vec![1.0; 3]).is_err());
        assert!(ContactMatrix::new(1, vec![-1.0]).is_err());
        assert!(ContactMatrix::new(1, vec![f64::NAN]).is_err());
        assert!(ContactMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn matrix_shape_must_match_brackets() {
        let b = AgeBrackets::uniform(3, 10, 29).unwrap();
        assert!(ContactMatrix::uniform(3).check_brackets(&b).is_ok());
        assert!(matches!(
            ContactMatrix::uniform(4).check_brackets(&b),
            Err(PnError::MatrixShape { expected: 3, got: 4 })
        ));
    }
}

#[cfg(test)]
mod config {
    use crate::{Layer, NetworkConfig, PnError};

    #[test]
    fn default_caps_workplace_at_twenty() {
        let cfg = NetworkConfig::default();
        assert_eq!(cfg.cap_for(Layer::Workplace), Some(20));
        assert_eq!(cfg.cap_for(Layer::School), None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_ratio() {
        let mut cfg = NetworkConfig::default();
        cfg.school.student_teacher_ratio = 0.0;
        assert!(matches!(cfg.validate(), Err(PnError::Config(_))));
    }

    #[test]
    fn rejects_low_ltcf_degree_only_when_enabled() {
        let mut cfg = NetworkConfig::default();
        cfg.ltcf.average_degree = 1;
        assert!(cfg.validate().is_ok());
        cfg.ltcf.enabled = true;
        assert!(matches!(cfg.validate(), Err(PnError::DegreeTooLow { degree: 1 })));
    }

    #[test]
    fn school_mixing_defaults() {
        let cfg = NetworkConfig::default();
        assert_eq!(cfg.school.inter_grade_mixing, 0.1);
        assert_eq!(cfg.school.average_teacher_teacher_degree, 3.0);
        assert_eq!(cfg.school.average_additional_staff_degree, 20.0);
    }

    #[test]
    fn rejects_out_of_range_inter_grade_mixing() {
        for bad in [-0.1, 1.5, f64::NAN] {
            let mut cfg = NetworkConfig::default();
            cfg.school.inter_grade_mixing = bad;
            assert!(matches!(cfg.validate(), Err(PnError::Config(_))), "accepted {bad}");
        }
        let mut cfg = NetworkConfig::default();
        cfg.school.inter_grade_mixing = 1.0;
        cfg.school.average_teacher_teacher_degree = 0.0;
        assert!(cfg.validate().is_ok());
        cfg.school.average_additional_staff_degree = -2.0;
        assert!(matches!(cfg.validate(), Err(PnError::Config(_))));
    }

    #[test]
    fn rejects_inverted_age_range() {
        let mut cfg = NetworkConfig::default();
        cfg.school.teacher_age_range = 60..=30;
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::PopRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = PopRng::new(12345);
        let mut r2 = PopRng::new(12345);
        for _ in 0..100 {
            let a: u64 = r1.random();
            let b: u64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = PopRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn pick_weighted_skips_zero_mass() {
        let mut rng = PopRng::new(3);
        for _ in 0..500 {
            let i = rng.pick_weighted(&[0.0, 2.0, 0.0, 1.0]).unwrap();
            assert!(i == 1 || i == 3);
        }
    }

    #[test]
    fn pick_weighted_all_zero_is_none() {
        let mut rng = PopRng::new(3);
        assert_eq!(rng.pick_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.pick_weighted(&[]), None);
        assert_eq!(rng.pick_weighted_counts(&[0, 0, 0]), None);
    }

    #[test]
    fn pick_weighted_counts_follows_mass() {
        let mut rng = PopRng::new(9);
        let mut hits = [0usize; 2];
        for _ in 0..10_000 {
            hits[rng.pick_weighted_counts(&[1, 3]).unwrap()] += 1;
        }
        // Expect ~2,500 / ~7,500.
        assert!((2_000..3_000).contains(&hits[0]), "got {hits:?}");
    }

    #[test]
    fn pick_weighted_ignores_unusable_weights() {
        let mut rng = PopRng::new(5);
        for _ in 0..500 {
            let i = rng.pick_weighted(&[f64::NAN, -4.0, f64::INFINITY, 0.5]).unwrap();
            assert_eq!(i, 3);
        }
        assert_eq!(rng.pick_weighted(&[f64::NAN, -1.0]), None);
        assert_eq!(rng.pick_weighted_counts(&[]), None);
    }

    #[test]
    fn sample_draws_from_a_distribution() {
        let mut rng = PopRng::new(2);
        let index = rand::distributions::WeightedIndex::new([0u32, 0, 7]).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.sample(&index), 2);
        }
    }

    #[test]
    fn sample_distinct_never_repeats() {
        let mut rng = PopRng::new(1);
        let items: Vec<u32> = (0..50).collect();
        let mut got = rng.sample_distinct(&items, 20);
        assert_eq!(got.len(), 20);
        got.sort_unstable();
        got.dedup();
        assert_eq!(got.len(), 20);
        assert_eq!(rng.sample_distinct(&items, 500).len(), 50);
    }

    #[test]
    fn children_diverge() {
        let mut root = PopRng::new(7);
        let mut a = root.child(0);
        let mut b = root.child(1);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }
}
