//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The simulation hands out IDs
//! starting at 1; `0` is the "no valid ID" sentinel and is never produced by
//! a running simulation.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".  Real IDs start at 1.
            pub const INVALID: $name = $name(0);

            /// `true` for any ID a running simulation can produce.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
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
    };
}

typed_id! {
    /// Identifier of a simulated person.  Monotonically assigned from 1.
    pub struct PersonId(u64);
}

typed_id! {
    /// Identifier of an elevator car.  Fleet IDs are 1..=fleet_size.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Identifier of a transport call.  Monotonically assigned from 1;
    /// a re-queued call keeps its original ID across re-assignment.
    pub struct CallId(u64);
}
