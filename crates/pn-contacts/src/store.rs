//! Per-person storage: `PersonStore` (SoA columns + per-layer contact sets)
//! and the `Person` record handed to export code.
//!
//! # Layout
//!
//! Every `Vec` column has exactly `count` elements and `PersonId` is the
//! index into all of them:
//!
//! ```ignore
//! let wp = store.workplace[uid.index()];   // GroupId::INVALID if unemployed
//! ```
//!
//! Facility columns and the LTCF contact layer exist only when the store is
//! built with facilities enabled.  [`PersonStore::person`] folds sentinels
//! into `Option`s so consumers never see `GroupId::INVALID`.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use pn_core::{Age, GroupId, Layer, PersonId, PnError, PnResult, Sex};

// ── Roles ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchoolRole {
    Student,
    Teacher,
    Staff,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FacilityRole {
    Resident,
    Staff,
}

// ── Person record ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchoolMembership {
    pub id:   GroupId,
    pub role: SchoolRole,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityMembership {
    pub id:   GroupId,
    pub role: FacilityRole,
}

/// A finished person, as consumed by export and simulation code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub uid:       PersonId,
    pub age:       Age,
    pub sex:       Sex,
    pub household: Option<GroupId>,
    pub school:    Option<SchoolMembership>,
    pub workplace: Option<GroupId>,
    /// Always `None` when facilities are disabled.
    pub facility:  Option<FacilityMembership>,
    /// Sorted contact uids per enabled layer.
    pub contacts:  BTreeMap<Layer, Vec<PersonId>>,
}

// ── PersonStore ───────────────────────────────────────────────────────────────

/// Facility columns, present only when facilities are enabled.
#[derive(Clone, Debug, Default)]
pub struct FacilityColumns {
    pub id:   Vec<GroupId>,
    pub role: Vec<Option<FacilityRole>>,
}

/// Structure-of-Arrays storage for everyone in the population.
pub struct PersonStore {
    /// Number of people.  Equals the length of every column.
    pub count: usize,

    pub age: Vec<Age>,
    pub sex: Vec<Sex>,

    pub household: Vec<GroupId>,

    pub school:      Vec<GroupId>,
    pub school_role: Vec<Option<SchoolRole>>,

    pub workplace: Vec<GroupId>,

    pub facility: Option<FacilityColumns>,

    /// `contacts[layer.index()]` is `None` for disabled layers.
    contacts: [Option<Vec<FxHashSet<PersonId>>>; 5],
}

impl PersonStore {
    pub(crate) fn new(age: Vec<Age>, sex: Vec<Sex>, with_facilities: bool) -> Self {
        let count = age.len();
        let layer = |enabled: bool| enabled.then(|| vec![FxHashSet::default(); count]);
        Self {
            count,
            age,
            sex,
            household: vec![GroupId::INVALID; count],
            school: vec![GroupId::INVALID; count],
            school_role: vec![None; count],
            workplace: vec![GroupId::INVALID; count],
            facility: with_facilities.then(|| FacilityColumns {
                id:   vec![GroupId::INVALID; count],
                role: vec![None; count],
            }),
            contacts: [
                layer(true),
                layer(true),
                layer(true),
                layer(true),
                layer(with_facilities),
            ],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `PersonId`s in ascending order.
    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.count as u32).map(PersonId)
    }

    pub fn has_facilities(&self) -> bool {
        self.facility.is_some()
    }

    /// Layers that carry contact sets in this store.
    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        Layer::ALL.into_iter().filter(|l| self.contacts[l.index()].is_some())
    }

    /// `Err(UnknownPerson)` unless `uid` indexes this store.
    #[inline]
    pub fn check(&self, uid: PersonId) -> PnResult<()> {
        if uid.index() < self.count { Ok(()) } else { Err(PnError::UnknownPerson(uid)) }
    }

    // ── Contact access ────────────────────────────────────────────────────

    /// Contact sets of `layer`, indexed by `PersonId`.  `None` if the layer
    /// is disabled.
    pub fn layer_contacts(&self, layer: Layer) -> Option<&[FxHashSet<PersonId>]> {
        self.contacts[layer.index()].as_deref()
    }

    /// One person's contacts in `layer`.
    pub fn contacts(&self, layer: Layer, uid: PersonId) -> Option<&FxHashSet<PersonId>> {
        self.layer_contacts(layer).and_then(|c| c.get(uid.index()))
    }

    fn layer_mut(&mut self, layer: Layer) -> PnResult<&mut Vec<FxHashSet<PersonId>>> {
        self.contacts[layer.index()]
            .as_mut()
            .ok_or_else(|| PnError::Config(format!("layer {layer} is not enabled")))
    }

    /// Add the undirected edge `a — b`.  Self-loops are ignored.
    pub fn add_edge(&mut self, layer: Layer, a: PersonId, b: PersonId) -> PnResult<()> {
        self.add_directed(layer, a, b)?;
        self.add_directed(layer, b, a)
    }

    /// Add `b` to `a`'s contacts only.  The assembler's symmetric repair pass
    /// restores undirectedness afterwards.
    pub(crate) fn add_directed(&mut self, layer: Layer, a: PersonId, b: PersonId) -> PnResult<()> {
        self.check(a)?;
        self.check(b)?;
        if a != b {
            self.layer_mut(layer)?[a.index()].insert(b);
        }
        Ok(())
    }

    /// Add the reverse of every edge in `layer`.
    pub(crate) fn symmetrize(&mut self, layer: Layer) -> PnResult<()> {
        let sets = self.layer_mut(layer)?;
        let reverse: Vec<(PersonId, PersonId)> = sets
            .iter()
            .enumerate()
            .flat_map(|(a, cs)| cs.iter().map(move |&b| (b, PersonId(a as u32))))
            .collect();
        for (b, a) in reverse {
            sets[b.index()].insert(a);
        }
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────────────────

    /// Assemble the export record for `uid`.
    pub fn person(&self, uid: PersonId) -> PnResult<Person> {
        self.check(uid)?;
        let i = uid.index();
        let contacts = self
            .layers()
            .map(|layer| {
                let mut cs: Vec<PersonId> = self
                    .contacts(layer, uid)
                    .map(|s| s.iter().copied().collect())
                    .unwrap_or_default();
                cs.sort_unstable();
                (layer, cs)
            })
            .collect();

        Ok(Person {
            uid,
            age: self.age[i],
            sex: self.sex[i],
            household: self.household[i].valid(),
            school: self.school[i].valid().zip(self.school_role[i]).map(|(id, role)| SchoolMembership { id, role }),
            workplace: self.workplace[i].valid(),
            facility: self.facility.as_ref().and_then(|f| {
                f.id[i].valid().zip(f.role[i]).map(|(id, role)| FacilityMembership { id, role })
            }),
            contacts,
        })
    }

    /// Export records for everyone, in uid order.
    pub fn people(&self) -> impl Iterator<Item = Person> + '_ {
        self.person_ids().filter_map(|uid| self.person(uid).ok())
    }
}
