//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Each ID displays with the short
//! prefix the platform uses in its logs (`r_3`, `c_17`, `v_0`, …) and
//! serializes as its bare integer.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
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
    /// A customer of the current day, numbered in order-time order.
    pub struct CustomerId(u32) => "c";
}

typed_id! {
    /// A restaurant, numbered by its position in the restaurant location list
    /// (so ids stay stable when only a subsample is instantiated).
    pub struct RestaurantId(u32) => "r";
}

typed_id! {
    /// A vehicle of the fleet.
    pub struct VehicleId(u32) => "v";
}

typed_id! {
    /// A node of the street graph.
    pub struct NodeId(u32) => "n";
}

typed_id! {
    /// A single order handed to a restaurant.  Unique within a simulated day.
    pub struct OrderId(u32) => "o";
}
