//! Customers and their lifecycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use md_core::{CustomerId, NodeId, RestaurantId, SimTime};

use crate::{ModelError, ModelResult};

/// Lifecycle of a customer within one simulated day.
///
/// Transitions only ever go `Unrevealed → Waiting → Served`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    /// Sampled for today but has not ordered yet.
    Unrevealed,
    /// Ordered; at least one part of the order is still undelivered.
    Waiting,
    /// Every part of the order has been delivered.
    Served,
}

/// A person placing one (possibly multi-restaurant) order.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id:                CustomerId,
    pub location:          NodeId,
    pub order_time:        SimTime,
    /// Deadline used for delay: order time plus the service promise.
    pub expected_delivery: SimTime,
    status:                CustomerStatus,
    restaurants:           Vec<RestaurantId>,
    delivered:             BTreeMap<RestaurantId, Option<SimTime>>,
}

/// What the platform may tell a policy about a customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub location:               NodeId,
    pub order_time:             SimTime,
    pub expected_delivery_time: SimTime,
    pub restaurant_choice:      Vec<RestaurantId>,
}

impl Customer {
    pub fn new(
        id:                CustomerId,
        location:          NodeId,
        order_time:        SimTime,
        expected_delivery: SimTime,
        restaurants:       Vec<RestaurantId>,
    ) -> Self {
        let delivered = restaurants.iter().map(|&r| (r, None)).collect();
        Self {
            id,
            location,
            order_time,
            expected_delivery,
            status: CustomerStatus::Unrevealed,
            restaurants,
            delivered,
        }
    }

    #[inline]
    pub fn status(&self) -> CustomerStatus {
        self.status
    }

    /// Restaurants this customer ordered from, in choice order.
    #[inline]
    pub fn restaurants(&self) -> &[RestaurantId] {
        &self.restaurants
    }

    /// Delivery time per restaurant; `None` while that part is outstanding.
    #[inline]
    pub fn delivery_times(&self) -> &BTreeMap<RestaurantId, Option<SimTime>> {
        &self.delivered
    }

    /// The customer places the order.
    pub fn reveal(&mut self) -> ModelResult<()> {
        self.transition(CustomerStatus::Unrevealed, CustomerStatus::Waiting)
    }

    /// Record that the part of the order from `restaurant` arrived at `at`.
    ///
    /// Returns `true` once every part has been delivered.
    pub fn record_delivery(&mut self, restaurant: RestaurantId, at: SimTime) -> ModelResult<bool> {
        let slot = self.delivered.get_mut(&restaurant).ok_or(ModelError::NotOrderedFrom {
            customer: self.id,
            restaurant,
        })?;
        *slot = Some(at);
        Ok(self.is_fully_delivered())
    }

    pub fn is_fully_delivered(&self) -> bool {
        self.delivered.values().all(Option::is_some)
    }

    /// Close the customer out.  Only legal once every part was delivered.
    pub fn mark_served(&mut self) -> ModelResult<()> {
        if !self.is_fully_delivered() {
            return Err(ModelError::InvalidTransition {
                customer: self.id,
                from:     self.status,
                to:       CustomerStatus::Served,
            });
        }
        self.transition(CustomerStatus::Waiting, CustomerStatus::Served)
    }

    /// Latest delivery across all parts, if any part has arrived.
    pub fn last_delivery(&self) -> Option<SimTime> {
        self.delivered.values().flatten().copied().max()
    }

    /// Seconds the last part arrived after the deadline (0 if on time).
    ///
    /// `None` until the customer is fully delivered.
    pub fn delay_secs(&self) -> Option<u64> {
        if !self.is_fully_delivered() {
            return None;
        }
        self.last_delivery()
            .map(|last| last.saturating_since(self.expected_delivery))
    }

    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            location:               self.location,
            order_time:             self.order_time,
            expected_delivery_time: self.expected_delivery,
            restaurant_choice:      self.restaurants.clone(),
        }
    }

    fn transition(&mut self, from: CustomerStatus, to: CustomerStatus) -> ModelResult<()> {
        if self.status != from {
            return Err(ModelError::InvalidTransition { customer: self.id, from: self.status, to });
        }
        self.status = to;
        Ok(())
    }
}
