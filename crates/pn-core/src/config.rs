//! Network synthesis configuration.
//!
//! Typically loaded from a TOML/JSON file by the application crate and passed
//! to `pn_pop::PopulationBuilder`.  Every field has a default, so
//! applications only override what differs for their location.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::{Age, Layer, PnError, PnResult};

// ── SchoolMixing ──────────────────────────────────────────────────────────────

/// How contacts are drawn inside a school.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchoolMixing {
    /// Everyone in the school contacts everyone else.
    #[default]
    Clique,
    /// One-block random graph whose expected degree is the average class size.
    Random,
    /// Students mix mostly within their grade (single year of age), teachers
    /// with the students of the grades they teach and with each other, and
    /// non-teaching staff at random across the school.
    AgeClustered,
}

// ── SchoolConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchoolConfig {
    pub mixing: SchoolMixing,

    /// Expected school-layer degree under [`SchoolMixing::Random`], and
    /// expected student-student degree under [`SchoolMixing::AgeClustered`].
    pub average_class_size: f64,

    /// Chance that a student-student contact under
    /// [`SchoolMixing::AgeClustered`] goes to another grade.  In `[0, 1]`.
    pub inter_grade_mixing: f64,

    /// Expected contacts per teacher with other teachers under
    /// [`SchoolMixing::AgeClustered`].
    pub average_teacher_teacher_degree: f64,

    /// Contacts each non-teaching staff member draws across the school under
    /// [`SchoolMixing::AgeClustered`].
    pub average_additional_staff_degree: f64,

    /// Students per teacher.  Each school gets at least one teacher.
    pub student_teacher_ratio: f64,

    pub teacher_age_range: RangeInclusive<Age>,

    /// `Some(students per staff member, teachers included)` to add
    /// non-teaching staff; `None` for teachers only.
    pub non_teaching_staff: Option<f64>,

    pub staff_age_range: RangeInclusive<Age>,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            mixing:                          SchoolMixing::Clique,
            average_class_size:              20.0,
            inter_grade_mixing:              0.1,
            average_teacher_teacher_degree:  3.0,
            average_additional_staff_degree: 20.0,
            student_teacher_ratio:           20.0,
            teacher_age_range:               25..=75,
            non_teaching_staff:              None,
            staff_age_range:                 20..=75,
        }
    }
}

// ── LtcfConfig ────────────────────────────────────────────────────────────────

/// Long-term-care facility settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LtcfConfig {
    /// Build facility staff and the LTCF layer.  Off by default.
    pub enabled: bool,

    /// Connect residents and staff with the two-group stochastic block model
    /// instead of a full clique.
    pub use_two_group_reduction: bool,

    /// Target average degree for the two-group reduction.  Must be ≥ 2.
    pub average_degree: usize,

    /// Residents per staff member.  Each facility gets at least one.
    pub residents_per_staff: f64,

    pub staff_age_range: RangeInclusive<Age>,
}

impl Default for LtcfConfig {
    fn default() -> Self {
        Self {
            enabled:                 false,
            use_two_group_reduction: true,
            average_degree:          20,
            residents_per_staff:     5.0,
            staff_age_range:         20..=60,
        }
    }
}

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Top-level synthesis configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Master RNG seed.  The same seed and inputs always produce an
    /// identical network.
    pub seed: u64,

    /// Per-layer maximum contact count.  Only clique layers (school under
    /// [`SchoolMixing::Clique`], workplace) honour a cap.  Default:
    /// `{Workplace: 20}`.
    pub max_contacts: BTreeMap<Layer, usize>,

    pub school: SchoolConfig,

    pub ltcf: LtcfConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            seed:         0,
            max_contacts: BTreeMap::from([(Layer::Workplace, 20)]),
            school:       SchoolConfig::default(),
            ltcf:         LtcfConfig::default(),
        }
    }
}

impl NetworkConfig {
    /// Contact cap configured for `layer`, if any.
    #[inline]
    pub fn cap_for(&self, layer: Layer) -> Option<usize> {
        self.max_contacts.get(&layer).copied()
    }

    /// Reject settings no build could honour.
    pub fn validate(&self) -> PnResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(PnError::Config(format!("{name} must be positive, got {v}")))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(PnError::Config(format!("{name} must be zero or more, got {v}")))
            }
        };
        let ordered = |name: &str, r: &RangeInclusive<Age>| {
            if r.start() <= r.end() {
                Ok(())
            } else {
                Err(PnError::Config(format!(
                    "{name} {}..={} is inverted",
                    r.start(),
                    r.end()
                )))
            }
        };

        positive("school.average_class_size", self.school.average_class_size)?;
        positive("school.student_teacher_ratio", self.school.student_teacher_ratio)?;
        if !(0.0..=1.0).contains(&self.school.inter_grade_mixing) {
            return Err(PnError::Config(format!(
                "school.inter_grade_mixing must be in [0, 1], got {}",
                self.school.inter_grade_mixing
            )));
        }
        non_negative("school.average_teacher_teacher_degree", self.school.average_teacher_teacher_degree)?;
        non_negative("school.average_additional_staff_degree", self.school.average_additional_staff_degree)?;
        if let Some(ratio) = self.school.non_teaching_staff {
            positive("school.non_teaching_staff", ratio)?;
        }
        ordered("school.teacher_age_range", &self.school.teacher_age_range)?;
        ordered("school.staff_age_range", &self.school.staff_age_range)?;

        if self.ltcf.enabled {
            positive("ltcf.residents_per_staff", self.ltcf.residents_per_staff)?;
            ordered("ltcf.staff_age_range", &self.ltcf.staff_age_range)?;
            if self.ltcf.use_two_group_reduction && self.ltcf.average_degree < 2 {
                return Err(PnError::DegreeTooLow { degree: self.ltcf.average_degree });
            }
        }

        for (layer, &cap) in &self.max_contacts {
            if cap < 2 {
                return Err(PnError::Config(format!(
                    "max_contacts for layer {layer} must be at least 2, got {cap}"
                )));
            }
        }
        Ok(())
    }
}
