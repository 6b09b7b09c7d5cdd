//! `pn-groups` — decides who belongs to which school and workplace.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`sizes`]       | `SizeDistribution`, `sample_group_sizes` (Group-Size Sampler)   |
//! | [`pools`]       | `AgePools` — per-age queues consumed without replacement        |
//! | [`allocator`]   | `AgeMixingAllocator`, `Group`                                   |
//! | [`selection`]   | Enrolment and employment selection into fresh pools             |
//! | [`staff`]       | Drawing teachers and facility staff from an age window          |
//!
//! # Layer flow
//!
//! ```text
//! rates ─▶ selection ─▶ AgePools ─┬─▶ sample_group_sizes ─▶ sizes ─┐
//!                                 └────────────────────────────────┴─▶ AgeMixingAllocator ─▶ Vec<Group>
//! ```
//!
//! Pools are created per layer and consumed in place.  Later layers draw from
//! pools already reduced by earlier ones (teachers and facility staff leave
//! the worker pools before workplaces are filled).

pub mod allocator;
pub mod pools;
pub mod selection;
pub mod sizes;
pub mod staff;

#[cfg(test)]
mod tests;

pub use allocator::{AgeMixingAllocator, Group};
pub use pools::AgePools;
pub use selection::{potential_workers, select_students};
pub use sizes::{SizeDistribution, sample_group_sizes};
pub use staff::{draw_staff, staff_count};
