//! Contact Layer Assembler.
//!
//! Converts finished group memberships into per-person contact sets and
//! group ids on a [`PersonStore`].
//!
//! | Layer     | Contacts                                                         |
//! |-----------|------------------------------------------------------------------|
//! | household | clique                                                           |
//! | school    | clique (optionally capped), random graph with mean degree        |
//! |           | `average_class_size`, or age-clustered (see below)               |
//! | workplace | clique, or capped: each member samples `cap / 2` co-members,     |
//! |           | then every kept edge gets its reverse                            |
//! | LTCF      | clique over residents + staff, or the two-group reduction        |
//!
//! Capped layers are made symmetric after all of their groups are sampled,
//! so the final relation is undirected.  A person's degree can exceed
//! `cap / 2` through incoming edges.
//!
//! # Age-clustered schools
//!
//! Each grade (students of one age) gets a random graph with mean degree
//! `average_class_size`; every edge of it is redirected to a random student
//! of another grade with probability `inter_grade_mixing`.  Teachers are
//! dealt round-robin over the grades and contact every student of their
//! grades, plus a random teacher-teacher graph.  Each non-teaching staff
//! member contacts `average_additional_staff_degree` random school members.

use std::collections::BTreeMap;

use tracing::debug;

use pn_core::{Age, GroupId, Layer, PersonId, PnResult, PopRng, SchoolConfig, SchoolMixing};

use crate::store::{FacilityRole, SchoolRole};
use crate::{PersonStore, TwoGroupParams, UndirectedGraph, two_group_contacts};

// ── Membership inputs ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchoolMembers {
    pub students: Vec<PersonId>,
    pub teachers: Vec<PersonId>,
    pub staff:    Vec<PersonId>,
}

impl SchoolMembers {
    /// Students, then teachers, then staff.
    pub fn all(&self) -> Vec<PersonId> {
        let mut all = Vec::with_capacity(self.len());
        all.extend_from_slice(&self.students);
        all.extend_from_slice(&self.teachers);
        all.extend_from_slice(&self.staff);
        all
    }

    pub fn len(&self) -> usize {
        self.students.len() + self.teachers.len() + self.staff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityMembers {
    pub residents: Vec<PersonId>,
    pub staff:     Vec<PersonId>,
}

/// How the LTCF layer is wired.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LtcfMode {
    Clique,
    /// Residents are group 1, staff group 2.
    TwoGroup(TwoGroupParams),
}

// ── Layers ────────────────────────────────────────────────────────────────────

/// Household cliques.  `households[h]` gets `GroupId(h)`.
pub fn add_households(store: &mut PersonStore, households: &[Vec<PersonId>]) -> PnResult<()> {
    for (h, members) in households.iter().enumerate() {
        for &uid in members {
            store.check(uid)?;
            store.household[uid.index()] = GroupId(h as u32);
        }
        add_clique(store, Layer::Household, members)?;
    }
    debug!(households = households.len(), "household layer assembled");
    Ok(())
}

/// School contacts and memberships.  `schools[s]` gets `GroupId(s)`.
///
/// `cap` applies only under [`SchoolMixing::Clique`].
pub fn add_schools(
    store:   &mut PersonStore,
    schools: &[SchoolMembers],
    config:  &SchoolConfig,
    cap:     Option<usize>,
    rng:     &mut PopRng,
) -> PnResult<()> {
    let mixing = config.mixing;
    for (s, school) in schools.iter().enumerate() {
        let roles = [
            (&school.students, SchoolRole::Student),
            (&school.teachers, SchoolRole::Teacher),
            (&school.staff, SchoolRole::Staff),
        ];
        for (members, role) in roles {
            for &uid in members {
                store.check(uid)?;
                store.school[uid.index()] = GroupId(s as u32);
                store.school_role[uid.index()] = Some(role);
            }
        }

        match (mixing, cap) {
            (SchoolMixing::Clique, None) => add_clique(store, Layer::School, &school.all())?,
            (SchoolMixing::Clique, Some(cap)) => add_capped_clique(store, Layer::School, &school.all(), cap, rng)?,
            (SchoolMixing::Random, _) => {
                add_random_mixing(store, Layer::School, &school.all(), config.average_class_size, rng)?
            }
            (SchoolMixing::AgeClustered, _) => add_age_clustered(store, school, config, rng)?,
        }
    }
    if mixing == SchoolMixing::Clique && cap.is_some() {
        store.symmetrize(Layer::School)?;
    }
    debug!(schools = schools.len(), ?mixing, ?cap, "school layer assembled");
    Ok(())
}

/// Workplace contacts and memberships.  `workplaces[w]` gets `GroupId(w)`.
pub fn add_workplaces(
    store:      &mut PersonStore,
    workplaces: &[Vec<PersonId>],
    cap:        Option<usize>,
    rng:        &mut PopRng,
) -> PnResult<()> {
    for (w, members) in workplaces.iter().enumerate() {
        for &uid in members {
            store.check(uid)?;
            store.workplace[uid.index()] = GroupId(w as u32);
        }
        match cap {
            None => add_clique(store, Layer::Workplace, members)?,
            Some(cap) => add_capped_clique(store, Layer::Workplace, members, cap, rng)?,
        }
    }
    if cap.is_some() {
        store.symmetrize(Layer::Workplace)?;
    }
    debug!(workplaces = workplaces.len(), ?cap, "workplace layer assembled");
    Ok(())
}

/// LTCF contacts and memberships.  `facilities[f]` gets `GroupId(f)`.
///
/// Fails if the store was built without facilities, or (two-group mode) if
/// a facility has no residents or no staff.
pub fn add_facilities(
    store:      &mut PersonStore,
    facilities: &[FacilityMembers],
    mode:       &LtcfMode,
    rng:        &mut PopRng,
) -> PnResult<()> {
    for (f, facility) in facilities.iter().enumerate() {
        for uid in facility.residents.iter().chain(&facility.staff) {
            store.check(*uid)?;
        }
        if let Some(cols) = store.facility.as_mut() {
            let roles = [(&facility.residents, FacilityRole::Resident), (&facility.staff, FacilityRole::Staff)];
            for (members, role) in roles {
                for &uid in members {
                    cols.id[uid.index()] = GroupId(f as u32);
                    cols.role[uid.index()] = Some(role);
                }
            }
        }

        match mode {
            LtcfMode::Clique => {
                let mut members = facility.residents.clone();
                members.extend_from_slice(&facility.staff);
                add_clique(store, Layer::Ltcf, &members)?;
            }
            LtcfMode::TwoGroup(params) => {
                for (a, b) in two_group_contacts(&facility.residents, &facility.staff, params, rng)? {
                    store.add_edge(Layer::Ltcf, a, b)?;
                }
            }
        }
    }
    debug!(facilities = facilities.len(), "LTCF layer assembled");
    Ok(())
}

// ── Group wiring ──────────────────────────────────────────────────────────────

/// Everyone in `members` contacts everyone else.
pub fn add_clique(store: &mut PersonStore, layer: Layer, members: &[PersonId]) -> PnResult<()> {
    for (k, &a) in members.iter().enumerate() {
        for &b in &members[k + 1..] {
            store.add_edge(layer, a, b)?;
        }
    }
    Ok(())
}

/// One-sided sampling of up to `cap / 2` co-members per person.  The caller
/// runs the symmetric repair once every group of the layer is sampled.
fn add_capped_clique(
    store:   &mut PersonStore,
    layer:   Layer,
    members: &[PersonId],
    cap:     usize,
    rng:     &mut PopRng,
) -> PnResult<()> {
    let per_side = cap / 2;
    for &uid in members {
        let others: Vec<PersonId> = members.iter().copied().filter(|&o| o != uid).collect();
        let kept = if others.len() > per_side { rng.sample_distinct(&others, per_side) } else { others };
        for c in kept {
            store.add_directed(layer, uid, c)?;
        }
    }
    Ok(())
}

/// Random graph with expected degree `average_degree`; complete when the
/// group is no larger than that.
fn random_graph(n: usize, average_degree: f64, rng: &mut PopRng) -> UndirectedGraph {
    if n as f64 <= average_degree {
        UndirectedGraph::complete(n)
    } else {
        UndirectedGraph::gnp(n, average_degree / n as f64, rng)
    }
}

fn add_random_mixing(
    store:          &mut PersonStore,
    layer:          Layer,
    members:        &[PersonId],
    average_degree: f64,
    rng:            &mut PopRng,
) -> PnResult<()> {
    let graph = random_graph(members.len(), average_degree, rng);
    for (i, j) in graph.edges() {
        store.add_edge(layer, members[i], members[j])?;
    }
    Ok(())
}

fn add_age_clustered(
    store:  &mut PersonStore,
    school: &SchoolMembers,
    config: &SchoolConfig,
    rng:    &mut PopRng,
) -> PnResult<()> {
    let mut by_grade: BTreeMap<Age, Vec<PersonId>> = BTreeMap::new();
    for &uid in &school.students {
        by_grade.entry(store.age[uid.index()]).or_default().push(uid);
    }
    let grades: Vec<Vec<PersonId>> = by_grade.into_values().collect();

    // Students, laid out grade by grade so each grade is a contiguous range.
    let students: Vec<PersonId> = grades.iter().flatten().copied().collect();
    let graph = grade_clustered_graph(
        &grades.iter().map(Vec::len).collect::<Vec<_>>(),
        config.average_class_size,
        config.inter_grade_mixing,
        rng,
    );
    for (i, j) in graph.edges() {
        store.add_edge(Layer::School, students[i], students[j])?;
    }

    let (n_grades, n_teachers) = (grades.len(), school.teachers.len());
    for (g, grade) in grades.iter().enumerate() {
        // Round-robin; when teachers are scarce they cover several grades.
        let teaches = |t: usize| if n_teachers >= n_grades { t % n_grades == g } else { g % n_teachers == t };
        for (_, &teacher) in school.teachers.iter().enumerate().filter(|&(t, _)| teaches(t)) {
            for &uid in grade {
                store.add_edge(Layer::School, teacher, uid)?;
            }
        }
    }
    add_random_mixing(store, Layer::School, &school.teachers, config.average_teacher_teacher_degree, rng)?;

    let everyone = school.all();
    let per_staff = config.average_additional_staff_degree.round() as usize;
    for &member in &school.staff {
        let others: Vec<PersonId> = everyone.iter().copied().filter(|&o| o != member).collect();
        for c in rng.sample_distinct(&others, per_staff) {
            store.add_edge(Layer::School, member, c)?;
        }
    }
    Ok(())
}

/// Nodes `0..sizes[0]` form grade 0, the next `sizes[1]` grade 1, and so
/// on.  Within-grade random graphs, each edge redirected with probability
/// `inter_grade_mixing` from its first endpoint to a uniformly drawn node of
/// another grade.
pub(crate) fn grade_clustered_graph(
    sizes:              &[usize],
    average_class_size: f64,
    inter_grade_mixing: f64,
    rng:                &mut PopRng,
) -> UndirectedGraph {
    let n: usize = sizes.iter().sum();
    let mut g = UndirectedGraph::empty(n);
    let mut start = 0;
    for &len in sizes {
        let within = random_graph(len, average_class_size, rng);
        for (a, b) in within.edges() {
            let (i, j) = (start + a, start + b);
            if len < n && rng.gen_bool(inter_grade_mixing) {
                // Uniform over the nodes outside `start..start + len`.
                let mut k = rng.gen_range(0..n - len);
                if k >= start {
                    k += len;
                }
                g.add_edge(i, k);
            } else {
                g.add_edge(i, j);
            }
        }
        start += len;
    }
    g
}
