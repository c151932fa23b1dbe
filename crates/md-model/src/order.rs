//! Orders handed to restaurants.

use serde::Serialize;

use md_core::{CustomerId, Forecast, OrderId, RestaurantId, SimTime};

/// One customer's request at one restaurant.
///
/// Immutable once created.  `prep_secs.estimated` is the platform's forecast,
/// `prep_secs.actual` the duration the kitchen will really take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id:         OrderId,
    pub customer:   CustomerId,
    pub restaurant: RestaurantId,
    /// Earliest time preparation may start; `None` means as soon as possible.
    pub start_at:   Option<SimTime>,
    pub prep_secs:  Forecast<u64>,
}

/// What the platform may tell a policy about an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id:                   OrderId,
    pub customer_id:                CustomerId,
    pub start_at:                   Option<SimTime>,
    pub estimated_preparation_time: u64,
}

impl Order {
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            order_id:                   self.id,
            customer_id:                self.customer,
            start_at:                   self.start_at,
            estimated_preparation_time: self.prep_secs.estimated,
        }
    }
}
