//! The finished network handed to export and simulation code.

use pn_contacts::{FacilityMembers, Person, PersonStore, SchoolMembers};
use pn_core::{Layer, PersonId, PnResult};

/// Degree summary for one contact layer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DegreeStats {
    /// Undirected edge count.
    pub edges: usize,
    pub mean:  f64,
    pub max:   usize,
    /// People with no contact in the layer.
    pub isolated: usize,
}

/// A synthesised population: per-person columns and contact sets, plus the
/// membership list of every school, workplace, and facility.
///
/// Group `g` of a layer is `GroupId(g)` in the matching store column.
pub struct Population {
    pub store:      PersonStore,
    pub schools:    Vec<SchoolMembers>,
    pub workplaces: Vec<Vec<PersonId>>,
    /// Empty unless LTCFs are enabled.
    pub facilities: Vec<FacilityMembers>,
}

impl Population {
    #[inline]
    pub fn len(&self) -> usize {
        self.store.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn person(&self, uid: PersonId) -> PnResult<Person> {
        self.store.person(uid)
    }

    /// Export records in uid order.
    pub fn people(&self) -> impl Iterator<Item = Person> + '_ {
        self.store.people()
    }

    /// `None` if `layer` is not enabled in this population.
    pub fn degree_stats(&self, layer: Layer) -> Option<DegreeStats> {
        let sets = self.store.layer_contacts(layer)?;
        let total: usize = sets.iter().map(|s| s.len()).sum();
        Some(DegreeStats {
            edges:    total / 2,
            mean:     if sets.is_empty() { 0.0 } else { total as f64 / sets.len() as f64 },
            max:      sets.iter().map(|s| s.len()).max().unwrap_or(0),
            isolated: sets.iter().filter(|s| s.is_empty()).count(),
        })
    }
}
