//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two families of identifiers exist:
//!
//! - **External ids** ([`OsmNodeId`]) are the stable identifiers carried by
//!   map snapshots.  They survive merges and are what output rows report.
//! - **Arena indices** ([`NodeIdx`], [`EdgeIdx`], [`AgentId`]) are dense
//!   `u32` positions into the `Vec`s of a single built graph or simulation
//!   run.  They are only meaningful relative to the structure that issued
//!   them.
//!
//! All ids are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "no valid index" (`u32::MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
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

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Position of a node in a built `StreetGraph`.
    pub struct NodeIdx(u32);
}

typed_id! {
    /// Position of a directed edge in a built `StreetGraph` (CSR order).
    pub struct EdgeIdx(u32);
}

typed_id! {
    /// Sequential id of a simulated agent, in creation order.
    pub struct AgentId(u32);
}

// ── OsmNodeId ─────────────────────────────────────────────────────────────────

/// Stable external node identifier as issued by the map source.
///
/// Unlike the arena indices this is signed (OSM allows negative ids for
/// locally created nodes) and is never used to index a `Vec`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OsmNodeId(pub i64);

impl fmt::Display for OsmNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OsmNodeId {
    #[inline]
    fn from(id: i64) -> Self {
        OsmNodeId(id)
    }
}
