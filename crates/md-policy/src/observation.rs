//! The snapshot a policy decides on.

use std::collections::BTreeMap;

use serde::Serialize;

use md_core::{CustomerId, RestaurantId, SimTime, VehicleId};
use md_model::{CustomerSummary, RestaurantSummary, VehicleSummary};

/// Read-only view of the platform state at `current_time`.
///
/// Only estimated durations appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub current_time:      SimTime,
    /// Placed (customer, restaurant) orders not yet on any route, oldest first.
    pub unassigned_orders: Vec<(CustomerId, RestaurantId)>,
    pub vehicles:          BTreeMap<VehicleId, VehicleSummary>,
    pub restaurants:       BTreeMap<RestaurantId, RestaurantSummary>,
    /// Customers who ordered and are still waiting for food.
    pub customers:         BTreeMap<CustomerId, CustomerSummary>,
}

impl Observation {
    /// Vehicle with the smallest busy time; ties go to the lowest id.
    pub fn least_busy_vehicle(&self) -> Option<VehicleId> {
        self.vehicles
            .iter()
            .min_by_key(|(id, v)| (v.busy_time, **id))
            .map(|(id, _)| *id)
    }

    /// Whether `restaurant` already has an order of `customer` queued or
    /// waiting for pickup.
    pub fn holds_order(&self, restaurant: RestaurantId, customer: CustomerId) -> bool {
        self.restaurants.get(&restaurant).is_some_and(|r| {
            r.orders_in_queue
                .iter()
                .chain(&r.prepared_orders)
                .any(|o| o.customer_id == customer)
        })
    }
}
