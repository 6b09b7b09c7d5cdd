//! `pn-contacts` — per-person contact storage and graph construction.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`store`]       | `PersonStore` (SoA columns + contact sets), `Person` record     |
//! | [`builder`]     | `PersonStoreBuilder` (fluent construction, sex draws)           |
//! | [`graph`]       | `UndirectedGraph` — complete, G(n, p), two-block SBM            |
//! | [`bipartite`]   | `two_group_contacts` — reduced-degree two-population wiring     |
//! | [`assembler`]   | Household / school / workplace / LTCF layer assembly            |
//!
//! # Invariants after assembly
//!
//! - No person appears in their own contact set.
//! - Every layer is symmetric: `b ∈ contacts(a) ⇔ a ∈ contacts(b)`.

pub mod assembler;
pub mod bipartite;
pub mod builder;
pub mod graph;
pub mod store;


pub use assembler::{
    FacilityMembers, LtcfMode, SchoolMembers, add_clique, add_facilities, add_households, add_schools,
    add_workplaces,
};
pub use bipartite::{TwoGroupParams, two_group_contacts};
pub use builder::PersonStoreBuilder;
pub use graph::UndirectedGraph;
pub use store::{FacilityMembership, FacilityRole, Person, PersonStore, SchoolMembership, SchoolRole};
