//! Travel-time trait and the default lookup-table implementation.
//!
//! # Pluggability
//!
//! The engine queries travel times through the [`TravelTimes`] trait, so an
//! application can swap in a shortest-path router or a congestion model
//! without touching the engine.  The default [`TravelTimeMatrix`] is a plain
//! `(origin, destination) → seconds` table, which is what the published
//! instances ship.
//!
//! Travel is deterministic: the value returned is used for both the
//! estimated and the actual timeline.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{CoreError, CoreResult, NodeId};

// ── TravelTimes trait ────────────────────────────────────────────────────────

/// Deterministic travel-time oracle between street-graph nodes.
///
/// Implementations must be `Send + Sync` so one table can be shared by
/// replications running on different threads.
pub trait TravelTimes: Send + Sync {
    /// Travel time in whole seconds from `from` to `to`.
    ///
    /// `from == to` must return `Ok(0)`.
    fn travel_secs(&self, from: NodeId, to: NodeId) -> CoreResult<u64>;
}

impl<T: TravelTimes + ?Sized> TravelTimes for Arc<T> {
    #[inline]
    fn travel_secs(&self, from: NodeId, to: NodeId) -> CoreResult<u64> {
        (**self).travel_secs(from, to)
    }
}

impl<T: TravelTimes + ?Sized> TravelTimes for &T {
    #[inline]
    fn travel_secs(&self, from: NodeId, to: NodeId) -> CoreResult<u64> {
        (**self).travel_secs(from, to)
    }
}

// ── TravelTimeMatrix ─────────────────────────────────────────────────────────

/// Sparse `(origin, destination) → seconds` lookup table.
#[derive(Debug, Clone, Default)]
pub struct TravelTimeMatrix {
    secs: HashMap<(NodeId, NodeId), u64>,
}

impl TravelTimeMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the travel time for one ordered pair, replacing any earlier
    /// value.
    pub fn insert(&mut self, from: NodeId, to: NodeId, secs: u64) {
        self.secs.insert((from, to), secs);
    }

    /// Record the same travel time in both directions.
    pub fn insert_symmetric(&mut self, a: NodeId, b: NodeId, secs: u64) {
        self.insert(a, b, secs);
        self.insert(b, a, secs);
    }

    /// Number of stored ordered pairs.
    pub fn len(&self) -> usize {
        self.secs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secs.is_empty()
    }

    /// Fail unless every ordered pair drawn from `nodes` has an entry.
    ///
    /// Loaders call this once so a day never aborts halfway on a gap in the
    /// table.
    pub fn check_complete(&self, nodes: &[NodeId]) -> CoreResult<()> {
        for &from in nodes {
            for &to in nodes {
                self.travel_secs(from, to)?;
            }
        }
        Ok(())
    }
}

impl TravelTimes for TravelTimeMatrix {
    fn travel_secs(&self, from: NodeId, to: NodeId) -> CoreResult<u64> {
        if from == to {
            return Ok(self.secs.get(&(from, to)).copied().unwrap_or(0));
        }
        self.secs
            .get(&(from, to))
            .copied()
            .ok_or(CoreError::MissingTravelTime { from, to })
    }
}

impl FromIterator<(NodeId, NodeId, u64)> for TravelTimeMatrix {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId, u64)>>(iter: I) -> Self {
        let mut matrix = Self::new();
        for (from, to, secs) in iter {
            matrix.insert(from, to, secs);
        }
        matrix
    }
}
