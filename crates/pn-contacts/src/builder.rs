//! Fluent builder for [`PersonStore`].
//!
//! # Usage
//!
//! ```rust
//! use pn_contacts::PersonStoreBuilder;
//! use pn_core::{Layer, PopRng};
//!
//! let mut rng = PopRng::new(42);
//! let store = PersonStoreBuilder::new(vec![34, 36, 7])
//!     .with_facilities(false)
//!     .build(&mut rng)?;
//!
//! assert_eq!(store.count, 3);
//! assert!(store.layer_contacts(Layer::Ltcf).is_none());
//! # Ok::<(), pn_core::PnError>(())
//! ```

use pn_core::{Age, PnError, PnResult, PopRng, Sex};

use crate::PersonStore;

/// Fluent builder for [`PersonStore`].
///
/// All columns are pre-allocated at construction with sentinel values; the
/// assembler then fills group ids and contact sets layer by layer.
pub struct PersonStoreBuilder {
    ages:            Vec<Age>,
    sexes:           Option<Vec<Sex>>,
    with_facilities: bool,
}

impl PersonStoreBuilder {
    /// One person per entry of `ages`; person `i` gets `PersonId(i)`.
    pub fn new(ages: Vec<Age>) -> Self {
        Self { ages, sexes: None, with_facilities: false }
    }

    /// Enable facility columns and the LTCF contact layer.
    pub fn with_facilities(mut self, enabled: bool) -> Self {
        self.with_facilities = enabled;
        self
    }

    /// Use known sexes instead of drawing them.  Must match the age count;
    /// checked by [`build`](Self::build).
    pub fn sexes(mut self, sexes: Vec<Sex>) -> Self {
        self.sexes = Some(sexes);
        self
    }

    /// Build, drawing sexes uniformly when none were supplied.
    ///
    /// Fails with `PnError::Config` if supplied sexes do not match the age
    /// count.
    pub fn build(self, rng: &mut PopRng) -> PnResult<PersonStore> {
        let count = self.ages.len();
        let sexes = match self.sexes {
            Some(s) if s.len() != count => {
                return Err(PnError::Config(format!("{} sexes supplied for {count} people", s.len())));
            }
            Some(s) => s,
            None => draw_sexes(count, rng),
        };
        Ok(PersonStore::new(self.ages, sexes, self.with_facilities))
    }
}

fn draw_sexes(count: usize, rng: &mut PopRng) -> Vec<Sex> {
    (0..count)
        .map(|_| if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female })
        .collect()
}
