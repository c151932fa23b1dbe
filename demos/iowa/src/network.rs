//! Synthetic street grid used when no instance file is given.
//!
//! A 6 × 6 grid loosely shaped like a small Iowa college town: the four
//! centre blocks are downtown, where the restaurants sit, and the fleet
//! starts from a depot on the west edge.

use md_core::{NodeId, TravelTimeMatrix};

const GRID:       u32 = 6;
/// Driving time for one block, ~400 m at 25 km/h.
const BLOCK_SECS: u64 = 60;
/// Fixed cost of every trip: leaving the curb, turning, finding the door.
const TRIP_SECS:  u64 = 120;

pub struct Town {
    pub travel:      TravelTimeMatrix,
    pub downtown:    Vec<NodeId>,
    pub depot:       NodeId,
    pub residential: Vec<NodeId>,
}

fn node(row: u32, col: u32) -> NodeId {
    NodeId(row * GRID + col)
}

/// Build the grid and its complete Manhattan-distance travel-time matrix.
pub fn build_town() -> Town {
    let mut travel = TravelTimeMatrix::new();
    for a in 0..GRID * GRID {
        for b in (a + 1)..GRID * GRID {
            let blocks = (a / GRID).abs_diff(b / GRID) + (a % GRID).abs_diff(b % GRID);
            travel.insert_symmetric(NodeId(a), NodeId(b), TRIP_SECS + BLOCK_SECS * u64::from(blocks));
        }
    }

    let downtown = vec![node(2, 2), node(2, 3), node(3, 2), node(3, 3), node(1, 3), node(3, 1)];
    let residential = (0..GRID * GRID)
        .map(NodeId)
        .filter(|n| !downtown.contains(n))
        .collect();

    Town { travel, downtown, depot: node(3, 0), residential }
}
