//! `pn-pop` — orchestrates a full population build.
//!
//! # Layer order
//!
//! ```text
//! ① Households  — supplied membership lists
//! ② Students    — enrolment rates, residents excluded
//! ③ Schools     — size sampler + age-mixing allocator (school matrix)
//! ④ Workers     — employment rates, students and residents excluded
//! ⑤ Teachers    — per school, from the worker pools' teacher age window
//! ⑥ School staff (optional) and facility staff (LTCFs enabled)
//! ⑦ Workplaces  — size sampler + age-mixing allocator over remaining workers
//! ⑧ Contacts    — household, school, workplace, and LTCF layers assembled
//! ```
//!
//! Later steps draw from pools already reduced by earlier ones, so nobody is
//! both a student and a worker, and teachers never also hold a workplace.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pn_core::{AgeBrackets, NetworkConfig};
//! use pn_pop::PopulationBuilder;
//!
//! let brackets = AgeBrackets::uniform(16, 5, 100)?;
//! let population = PopulationBuilder::new(NetworkConfig::default(), ages, brackets)
//!     .households(households)
//!     .schools(school_inputs)
//!     .workplaces(workplace_inputs)
//!     .build()?;
//! for person in population.people() { /* export */ }
//! ```

pub mod builder;
pub mod error;
pub mod population;


pub use builder::{GroupLayerInputs, PopulationBuilder};
pub use error::{PopError, PopResult};
pub use population::{DegreeStats, Population};
