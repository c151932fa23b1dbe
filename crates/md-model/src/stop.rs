//! Vehicle route stops.

use serde::Serialize;

use md_core::{CustomerId, Forecast, NodeId, RestaurantId, SimTime};

use crate::{ModelError, ModelResult};

/// What a vehicle does when it reaches a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopKind {
    /// Collect the orders of `orders` (customer ids) at `restaurant`.
    Pickup { restaurant: RestaurantId, orders: Vec<CustomerId> },
    /// Hand `customer` the parts of their order coming from `orders`.
    Delivery { customer: CustomerId, orders: Vec<RestaurantId> },
    /// Drive somewhere and park; nothing changes hands.
    Relocation,
}

/// Wire name of a stop's kind.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Pickup,
    Delivery,
    Relocation,
}

/// One planned visit on a vehicle's route.
///
/// Time spent on a stop is `travel + park + wait`.  Travel is deterministic
/// and identical on both timelines; park and wait may differ.  `wait` is only
/// ever non-zero for pickups and is recomputed by route repair.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    kind:              StopKind,
    pub destination:   NodeId,
    /// Earliest time the vehicle may set off for this stop.
    pub start_at:      Option<SimTime>,
    /// Set once the vehicle actually set off; fixes the stop's timeline.
    pub started_at:    Option<SimTime>,
    pub travel:        Forecast<u64>,
    pub park:          Forecast<u64>,
    pub wait:          Forecast<u64>,
    /// Departure time computed by the last route repair.
    pub planned_start: Forecast<SimTime>,
}

/// What the platform may tell a policy about a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSummary {
    pub stop_type:               StopType,
    pub destination:             NodeId,
    pub restaurant_id:           Option<RestaurantId>,
    pub customer_id:             Option<CustomerId>,
    pub start_at:                Option<SimTime>,
    pub estimated_time_required: u64,
    pub orders_to_pickup:        Vec<CustomerId>,
}

impl Stop {
    fn with_kind(kind: StopKind, destination: NodeId, start_at: Option<SimTime>, travel_secs: u64, park: Forecast<u64>) -> Self {
        Self {
            kind,
            destination,
            start_at,
            started_at: None,
            travel: Forecast::exact(travel_secs),
            park,
            wait: Forecast::ZERO,
            planned_start: Forecast::default(),
        }
    }

    /// A pickup stop.  `orders` must name at least one customer.
    pub fn pickup(
        restaurant:  RestaurantId,
        destination: NodeId,
        orders:      Vec<CustomerId>,
        start_at:    Option<SimTime>,
        travel_secs: u64,
        park:        Forecast<u64>,
    ) -> ModelResult<Self> {
        if orders.is_empty() {
            return Err(ModelError::EmptyPickup(restaurant));
        }
        let kind = StopKind::Pickup { restaurant, orders };
        Ok(Self::with_kind(kind, destination, start_at, travel_secs, park))
    }

    pub fn delivery(
        customer:    CustomerId,
        destination: NodeId,
        orders:      Vec<RestaurantId>,
        start_at:    Option<SimTime>,
        travel_secs: u64,
        park:        Forecast<u64>,
    ) -> Self {
        let kind = StopKind::Delivery { customer, orders };
        Self::with_kind(kind, destination, start_at, travel_secs, park)
    }

    pub fn relocation(destination: NodeId, start_at: Option<SimTime>, travel_secs: u64, park: Forecast<u64>) -> Self {
        Self::with_kind(StopKind::Relocation, destination, start_at, travel_secs, park)
    }

    #[inline]
    pub fn kind(&self) -> &StopKind {
        &self.kind
    }

    pub fn stop_type(&self) -> StopType {
        match self.kind {
            StopKind::Pickup { .. }   => StopType::Pickup,
            StopKind::Delivery { .. } => StopType::Delivery,
            StopKind::Relocation      => StopType::Relocation,
        }
    }

    pub fn restaurant(&self) -> Option<RestaurantId> {
        match self.kind {
            StopKind::Pickup { restaurant, .. } => Some(restaurant),
            _ => None,
        }
    }

    pub fn customer(&self) -> Option<CustomerId> {
        match self.kind {
            StopKind::Delivery { customer, .. } => Some(customer),
            _ => None,
        }
    }

    /// Customers whose orders this stop collects (empty unless a pickup).
    pub fn orders_to_pickup(&self) -> &[CustomerId] {
        match &self.kind {
            StopKind::Pickup { orders, .. } => orders,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// `travel + park + wait` on each timeline.
    #[inline]
    pub fn total(&self) -> Forecast<u64> {
        self.travel + self.park + self.wait
    }

    pub fn summary(&self) -> StopSummary {
        StopSummary {
            stop_type:               self.stop_type(),
            destination:             self.destination,
            restaurant_id:           self.restaurant(),
            customer_id:             self.customer(),
            start_at:                self.start_at,
            estimated_time_required: self.total().estimated,
            orders_to_pickup:        self.orders_to_pickup().to_vec(),
        }
    }
}
