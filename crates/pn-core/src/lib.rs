//! `pn-core` — foundational types for the `popnet` contact-network synthesiser.
//!
//! Every other `pn-*` crate depends on this one.  It has no `pn-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `GroupId`                                    |
//! | [`layer`]       | `Layer` (contact context), `Sex`                         |
//! | [`brackets`]    | `AgeBrackets`, `ContactMatrix`                           |
//! | [`config`]      | `NetworkConfig`, `SchoolConfig`, `LtcfConfig`            |
//! | [`rng`]         | `PopRng` (the single generator threaded through a build) |
//! | [`error`]       | `PnError`, `PnResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod brackets;
pub mod config;
pub mod error;
pub mod ids;
pub mod layer;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use brackets::{Age, AgeBrackets, ContactMatrix, MAX_AGE};
pub use config::{LtcfConfig, NetworkConfig, SchoolConfig, SchoolMixing};
pub use error::{PnError, PnResult};
pub use ids::{GroupId, PersonId};
pub use layer::{Layer, Sex};
pub use rng::PopRng;
