//! Fluent builder for constructing a [`Population`].

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use pn_contacts::{
    FacilityMembers, LtcfMode, PersonStoreBuilder, SchoolMembers, TwoGroupParams, add_facilities, add_households,
    add_schools, add_workplaces,
};
use pn_core::{Age, AgeBrackets, ContactMatrix, Layer, NetworkConfig, PersonId, PnError, PopRng, Sex};
use pn_groups::{
    AgeMixingAllocator, AgePools, SizeDistribution, draw_staff, potential_workers, sample_group_sizes,
    select_students, staff_count,
};

use crate::{PopError, PopResult, Population};

/// Rates, group sizes, and mixing matrix for one allocated layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupLayerInputs {
    /// Enrolment (schools) or employment (workplaces) rate by single year
    /// of age.  Ages without an entry contribute nobody.
    pub rates:  BTreeMap<Age, f64>,
    pub sizes:  SizeDistribution,
    /// Indexed by the builder's age brackets.
    pub matrix: ContactMatrix,
}

/// Fluent builder for [`Population`].
///
/// # Required inputs
///
/// - [`NetworkConfig`] — seed, caps, school and LTCF settings
/// - ages, one per person; person `i` is `PersonId(i)`
/// - [`AgeBrackets`] indexing every contact matrix
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                        |
/// |--------------------|------------------------------------------------|
/// | `.sexes(v)`        | Drawn uniformly                                |
/// | `.households(v)`   | Nobody housed; household layer empty           |
/// | `.facilities(v)`   | No residents (ignored unless LTCFs enabled)    |
/// | `.schools(i)`      | No students, no schools                        |
/// | `.workplaces(i)`   | No workers; teachers and staff cannot be drawn |
///
/// # Example
///
/// ```rust,ignore
/// let population = PopulationBuilder::new(config, ages, brackets)
///     .households(households)
///     .schools(school_inputs)
///     .workplaces(workplace_inputs)
///     .build()?;
/// ```
pub struct PopulationBuilder {
    config:     NetworkConfig,
    ages:       Vec<Age>,
    brackets:   AgeBrackets,
    sexes:      Option<Vec<Sex>>,
    households: Vec<Vec<PersonId>>,
    facilities: Vec<Vec<PersonId>>,
    schools:    Option<GroupLayerInputs>,
    workplaces: Option<GroupLayerInputs>,
}

impl PopulationBuilder {
    pub fn new(config: NetworkConfig, ages: Vec<Age>, brackets: AgeBrackets) -> Self {
        Self {
            config,
            ages,
            brackets,
            sexes: None,
            households: Vec::new(),
            facilities: Vec::new(),
            schools: None,
            workplaces: None,
        }
    }

    /// Known sexes (must be one per person).
    pub fn sexes(mut self, sexes: Vec<Sex>) -> Self {
        self.sexes = Some(sexes);
        self
    }

    /// Household membership lists.  Household `h` gets `GroupId(h)`.
    pub fn households(mut self, households: Vec<Vec<PersonId>>) -> Self {
        self.households = households;
        self
    }

    /// Resident lists, one per long-term-care facility.  Residents are never
    /// students or workers.
    pub fn facilities(mut self, residents: Vec<Vec<PersonId>>) -> Self {
        self.facilities = residents;
        self
    }

    pub fn schools(mut self, inputs: GroupLayerInputs) -> Self {
        self.schools = Some(inputs);
        self
    }

    pub fn workplaces(mut self, inputs: GroupLayerInputs) -> Self {
        self.workplaces = Some(inputs);
        self
    }

    /// Validate inputs, run every layer in order, and assemble contacts.
    pub fn build(self) -> PopResult<Population> {
        let Self { config, ages, brackets, sexes, households, facilities, schools, workplaces } = self;
        let count = ages.len();

        // ── Validate ──────────────────────────────────────────────────────
        config.validate()?;
        if let Some(s) = &sexes {
            if s.len() != count {
                return Err(PopError::AgeCountMismatch { expected: count, got: s.len(), what: "sexes" });
            }
        }
        for inputs in schools.iter().chain(&workplaces) {
            inputs.matrix.check_brackets(&brackets)?;
        }
        check_disjoint(&households, count, "household")?;

        let ltcf = config.ltcf.enabled;
        let residents_by_facility = if ltcf {
            check_disjoint(&facilities, count, "facility")?;
            facilities
        } else {
            if !facilities.is_empty() {
                warn!(facilities = facilities.len(), "LTCFs disabled; facility residents ignored");
            }
            Vec::new()
        };

        info!(people = count, seed = config.seed, ltcf, "building population");
        let mut rng = PopRng::new(config.seed);

        let mut builder = PersonStoreBuilder::new(ages.clone()).with_facilities(ltcf);
        if let Some(s) = sexes {
            builder = builder.sexes(s);
        }
        let mut store = builder.build(&mut rng)?;

        let mut resident = vec![false; count];
        for uid in residents_by_facility.iter().flatten() {
            resident[uid.index()] = true;
        }

        // ── Students and schools ──────────────────────────────────────────
        let mut student = vec![false; count];
        let mut school_members: Vec<SchoolMembers> = Vec::new();
        if let Some(inputs) = &schools {
            let mut pools = select_students(&ages, &inputs.rates, |uid| !resident[uid.index()], &mut rng);
            let sizes = sample_group_sizes(&inputs.sizes, pools.total_available(), &mut rng);
            let allocator = AgeMixingAllocator::new(&brackets, &inputs.matrix)?;
            for group in allocator.allocate(&sizes, &mut pools, &mut rng) {
                for uid in &group.members {
                    student[uid.index()] = true;
                }
                school_members.push(SchoolMembers { students: group.members, ..SchoolMembers::default() });
            }
            debug!(schools = school_members.len(), "schools allocated");
        }

        // ── Worker pools ──────────────────────────────────────────────────
        let mut workers = match &workplaces {
            Some(inputs) => potential_workers(
                &ages,
                &inputs.rates,
                |uid| !student[uid.index()] && !resident[uid.index()],
                &mut rng,
            ),
            None => AgePools::new(),
        };

        // ── Teachers and school staff ─────────────────────────────────────
        let teacher_counts: Vec<usize> = school_members
            .iter()
            .map(|s| staff_count(s.students.len(), config.school.student_teacher_ratio, 1))
            .collect();
        let teachers = draw_staff(&teacher_counts, &mut workers, config.school.teacher_age_range.clone(), &mut rng);
        for (school, t) in school_members.iter_mut().zip(teachers) {
            school.teachers = t;
        }

        if let Some(ratio) = config.school.non_teaching_staff {
            let staff_counts: Vec<usize> = school_members
                .iter()
                .map(|s| staff_count(s.students.len(), ratio, 0).saturating_sub(s.teachers.len()))
                .collect();
            let staff = draw_staff(&staff_counts, &mut workers, config.school.staff_age_range.clone(), &mut rng);
            for (school, s) in school_members.iter_mut().zip(staff) {
                school.staff = s;
            }
        }

        // ── Facility staff ────────────────────────────────────────────────
        let mut facility_members: Vec<FacilityMembers> = residents_by_facility
            .into_iter()
            .map(|residents| FacilityMembers { residents, staff: Vec::new() })
            .collect();
        if ltcf {
            let counts: Vec<usize> = facility_members
                .iter()
                .map(|f| facility_staff_count(f.residents.len(), config.ltcf.residents_per_staff))
                .collect();
            let staff = draw_staff(&counts, &mut workers, config.ltcf.staff_age_range.clone(), &mut rng);
            for (facility, s) in facility_members.iter_mut().zip(staff) {
                facility.staff = s;
            }
            debug!(facilities = facility_members.len(), "facility staff drawn");
        }

        // ── Workplaces ────────────────────────────────────────────────────
        let mut workplace_members: Vec<Vec<PersonId>> = Vec::new();
        if let Some(inputs) = &workplaces {
            let sizes = sample_group_sizes(&inputs.sizes, workers.total_available(), &mut rng);
            let allocator = AgeMixingAllocator::new(&brackets, &inputs.matrix)?;
            workplace_members = allocator
                .allocate(&sizes, &mut workers, &mut rng)
                .into_iter()
                .map(|g| g.members)
                .collect();
            debug!(workplaces = workplace_members.len(), "workplaces allocated");
        }

        // ── Contact layers ────────────────────────────────────────────────
        add_households(&mut store, &households)?;
        add_schools(&mut store, &school_members, &config.school, config.cap_for(Layer::School), &mut rng)?;
        add_workplaces(&mut store, &workplace_members, config.cap_for(Layer::Workplace), &mut rng)?;
        if ltcf {
            let mode = if config.ltcf.use_two_group_reduction {
                LtcfMode::TwoGroup(TwoGroupParams {
                    average_degree: config.ltcf.average_degree,
                    ..TwoGroupParams::default()
                })
            } else {
                LtcfMode::Clique
            };
            add_facilities(&mut store, &facility_members, &mode, &mut rng)?;
        }

        info!(
            households = households.len(),
            schools = school_members.len(),
            workplaces = workplace_members.len(),
            facilities = facility_members.len(),
            "population built"
        );

        Ok(Population {
            store,
            schools: school_members,
            workplaces: workplace_members,
            facilities: facility_members,
        })
    }
}

/// `ceil(residents / ratio)`, at least one.
pub(crate) fn facility_staff_count(residents: usize, ratio: f64) -> usize {
    ((residents as f64 / ratio).ceil() as usize).max(1)
}

/// Every uid in range and in at most one of `groups`.
fn check_disjoint(groups: &[Vec<PersonId>], count: usize, what: &str) -> PopResult<()> {
    let mut seen = vec![false; count];
    for uid in groups.iter().flatten() {
        let slot = seen.get_mut(uid.index()).ok_or(PnError::UnknownPerson(*uid))?;
        if *slot {
            return Err(PnError::Config(format!("{uid} is listed in more than one {what}")).into());
        }
        *slot = true;
    }
    Ok(())
}
