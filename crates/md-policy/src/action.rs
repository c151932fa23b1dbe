//! Action schema: per-restaurant order intents and per-vehicle stop intents.
//!
//! Intents inside one list are applied in order, so a later `InsertAt::Index`
//! must account for positions already shifted by earlier intents of the same
//! list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use md_core::{CustomerId, NodeId, RestaurantId, SimTime, VehicleId};
use md_model::InsertAt;

/// Queue a customer's order at a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub customer:  CustomerId,
    /// Earliest preparation start; `None` means immediately.
    #[serde(default)]
    pub start_at:  Option<SimTime>,
    #[serde(default)]
    pub insert_at: InsertAt,
}

impl OrderIntent {
    pub fn new(customer: CustomerId) -> Self {
        Self { customer, start_at: None, insert_at: InsertAt::End }
    }

    pub fn start_at(mut self, at: SimTime) -> Self {
        self.start_at = Some(at);
        self
    }

    pub fn insert_at(mut self, at: InsertAt) -> Self {
        self.insert_at = at;
        self
    }
}

/// Where a stop goes.  The variant decides the stop's kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopTarget {
    /// A raw graph node: relocation.
    Node(NodeId),
    /// A restaurant: pickup.
    Restaurant(RestaurantId),
    /// A customer: delivery.
    Customer(CustomerId),
}

/// Add a stop to a vehicle's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopIntent {
    pub target:    StopTarget,
    /// Earliest departure; `None` means as soon as the vehicle is free.
    #[serde(default)]
    pub start_at:  Option<SimTime>,
    #[serde(default)]
    pub insert_at: InsertAt,
    /// Customers whose orders to collect (pickups only).
    #[serde(default)]
    pub pickup:    Vec<CustomerId>,
    /// Restaurants whose food to hand over (deliveries only).
    #[serde(default)]
    pub deliver:   Vec<RestaurantId>,
}

impl StopIntent {
    fn new(target: StopTarget) -> Self {
        Self {
            target,
            start_at:  None,
            insert_at: InsertAt::End,
            pickup:    Vec::new(),
            deliver:   Vec::new(),
        }
    }

    pub fn pickup(restaurant: RestaurantId, customers: Vec<CustomerId>) -> Self {
        Self { pickup: customers, ..Self::new(StopTarget::Restaurant(restaurant)) }
    }

    pub fn delivery(customer: CustomerId, restaurants: Vec<RestaurantId>) -> Self {
        Self { deliver: restaurants, ..Self::new(StopTarget::Customer(customer)) }
    }

    pub fn relocate(node: NodeId) -> Self {
        Self::new(StopTarget::Node(node))
    }

    pub fn start_at(mut self, at: SimTime) -> Self {
        self.start_at = Some(at);
        self
    }

    pub fn insert_at(mut self, at: InsertAt) -> Self {
        self.insert_at = at;
        self
    }
}

/// Everything a policy asks for in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub vehicle_action:    BTreeMap<VehicleId, Vec<StopIntent>>,
    #[serde(default)]
    pub restaurant_action: BTreeMap<RestaurantId, Vec<OrderIntent>>,
}

impl Action {
    pub fn is_empty(&self) -> bool {
        self.vehicle_action.values().all(Vec::is_empty)
            && self.restaurant_action.values().all(Vec::is_empty)
    }

    pub fn push_stop(&mut self, vehicle: VehicleId, intent: StopIntent) -> &mut Self {
        self.vehicle_action.entry(vehicle).or_default().push(intent);
        self
    }

    pub fn push_order(&mut self, restaurant: RestaurantId, intent: OrderIntent) -> &mut Self {
        self.restaurant_action.entry(restaurant).or_default().push(intent);
        self
    }
}
