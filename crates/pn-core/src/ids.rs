//! Strongly typed, zero-cost identifier wrappers.
//!
//! A `PersonId` is the person's uid and doubles as the index into every
//! per-person array in `pn-contacts`.  A `GroupId` is the position of a
//! household, school, workplace, or facility in its layer's membership list.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "not a member of any group in this layer".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `None` for the `INVALID` sentinel, `Some(self)` otherwise.
            #[inline]
            pub fn valid(self) -> Option<$name> {
                (self != Self::INVALID).then_some(self)
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so unassigned IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Uid of a person in the synthetic population.  Max ~4.3 billion people.
    pub struct PersonId(u32);
}

typed_id! {
    /// Index of a group (household, school, workplace, facility) within its layer.
    pub struct GroupId(u32);
}
