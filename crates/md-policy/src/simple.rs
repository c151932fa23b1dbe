//! Greedy least-busy-vehicle assignment.

use crate::{Action, Observation, OrderIntent, Policy, StopIntent};

/// Sends every unassigned order to the vehicle that is least busy at the
/// time of the observation.
///
/// For each unassigned `(customer, restaurant)` pair the chosen vehicle gets
/// a pickup at the restaurant followed by a delivery to the customer, both
/// appended to its route, and the restaurant appends the order to its queue
/// unless it already holds one for that customer.
/// Busy times are read once per observation, so all pairs revealed in the
/// same step go to the same vehicle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAssignmentPolicy;

impl Policy for SimpleAssignmentPolicy {
    fn act(&mut self, obs: &Observation) -> Action {
        let mut action = Action::default();
        let Some(vehicle) = obs.least_busy_vehicle() else {
            return action;
        };
        for &(customer, restaurant) in &obs.unassigned_orders {
            action
                .push_stop(vehicle, StopIntent::pickup(restaurant, vec![customer]))
                .push_stop(vehicle, StopIntent::delivery(customer, vec![restaurant]));
            // A pair handed back after a premature pickup is still queued.
            if !obs.holds_order(restaurant, customer) {
                action.push_order(restaurant, OrderIntent::new(customer));
            }
        }
        action
    }

    fn name(&self) -> &str {
        "simple_assignment"
    }
}
