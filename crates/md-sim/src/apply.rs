//! Action validation and integration.
//!
//! # Design
//!
//! `step` runs [`validate`](MealDeliveryMdp::validate) over the whole action
//! before touching any state or drawing any random number.  Validation
//! replays the action without building stops: each intent's insertion index
//! is checked against the queue or route length *including* the intents of
//! the same list before it, and route heads are tracked so nothing is
//! inserted in front of a stop that already set off.  Routes are replayed as
//! destination lists, so every travel leg that stop construction or the
//! following repair will look up is known to exist before anything changes.
//!
//! Integration then runs in the fixed order restaurants → vehicles → route
//! repair.  Besides every vehicle that received stops, any vehicle with a
//! pending pickup at a restaurant whose queue just changed is repaired too,
//! so its waits follow the new ready times.

use std::collections::{BTreeMap, BTreeSet};

use md_core::{CustomerId, Forecast, NodeId, OrderId, RestaurantId, Sampler, SimRng, TravelTimes, VehicleId};
use md_model::{Customer, CustomerStatus, ModelError, Order, Restaurants, Stop, Vehicle};
use md_policy::{Action, StopIntent, StopTarget};

use crate::{MealDeliveryMdp, SimError, SimResult};

impl<T: TravelTimes> MealDeliveryMdp<T> {
    pub(crate) fn validate(&self, action: &Action) -> SimResult<()> {
        let mut queued = BTreeSet::new();
        for (&r, intents) in &action.restaurant_action {
            let restaurant = self.restaurants.get(&r).ok_or(SimError::UnknownRestaurant(r))?;
            let mut len = restaurant.queue_len();
            for intent in intents {
                let c = intent.customer;
                let customer = self.customers.get(&c).ok_or(SimError::UnknownCustomer(c))?;
                if customer.status() != CustomerStatus::Waiting || !customer.restaurants().contains(&r) {
                    return Err(SimError::InvalidAction(format!("{c} has no open order at {r}")));
                }
                if self.ordered.contains(&(c, r)) || !queued.insert((c, r)) {
                    return Err(SimError::InvalidAction(format!("order of {c} is already queued at {r}")));
                }
                intent.insert_at.resolve(len)?;
                len += 1;
            }
        }

        let mut assigned = BTreeSet::new();
        for (&v, intents) in &action.vehicle_action {
            let vehicle = self.vehicles.get(&v).ok_or(SimError::UnknownVehicle(v))?;
            let mut legs: Vec<NodeId> = vehicle.route().iter().map(|s| s.destination).collect();
            let mut head_started = vehicle.head_started();
            for intent in intents {
                let destination = self.validate_target(intent, &mut assigned)?;
                let position = intent.insert_at.resolve(legs.len())?;
                let origin = if position == 0 {
                    if head_started {
                        return Err(ModelError::DisplacesStartedStop(v).into());
                    }
                    head_started = intent.start_at.is_none_or(|t| t <= self.time);
                    vehicle.location()
                } else {
                    legs[position - 1]
                };
                self.travel.travel_secs(origin, destination)?;
                legs.insert(position, destination);
            }
            if !intents.is_empty() {
                self.validate_legs(vehicle, &legs)?;
            }
        }
        Ok(())
    }

    /// Every leg repair recomputes on the final route.  A head that already
    /// set off keeps its leg.
    fn validate_legs(&self, vehicle: &Vehicle, legs: &[NodeId]) -> SimResult<()> {
        let (mut origin, rest) = match legs.split_first() {
            Some((&head, rest)) if vehicle.head_started() => (head, rest),
            _ => (vehicle.location(), legs),
        };
        for &destination in rest {
            self.travel.travel_secs(origin, destination)?;
            origin = destination;
        }
        Ok(())
    }

    /// Check one stop intent and return the node it leads to.
    fn validate_target(
        &self,
        intent:   &StopIntent,
        assigned: &mut BTreeSet<(CustomerId, RestaurantId)>,
    ) -> SimResult<NodeId> {
        let destination = match intent.target {
            StopTarget::Node(node) => {
                if !intent.pickup.is_empty() || !intent.deliver.is_empty() {
                    return Err(SimError::InvalidAction(format!("relocation to {node} lists orders")));
                }
                node
            }
            StopTarget::Restaurant(r) => {
                let restaurant = self.restaurants.get(&r).ok_or(SimError::InvalidDestination(intent.target))?;
                if intent.pickup.is_empty() {
                    return Err(ModelError::EmptyPickup(r).into());
                }
                if !intent.deliver.is_empty() {
                    return Err(SimError::InvalidAction(format!("pickup at {r} lists deliveries")));
                }
                for &c in &intent.pickup {
                    if !self.unassigned.contains(&(c, r)) || !assigned.insert((c, r)) {
                        return Err(SimError::InvalidAction(format!("order ({c}, {r}) is not unassigned")));
                    }
                }
                restaurant.location
            }
            StopTarget::Customer(c) => {
                let customer = self
                    .customers
                    .get(&c)
                    .filter(|cust| cust.status() == CustomerStatus::Waiting)
                    .ok_or(SimError::InvalidDestination(intent.target))?;
                if !intent.pickup.is_empty() {
                    return Err(SimError::InvalidAction(format!("delivery to {c} lists pickups")));
                }
                if let Some(r) = intent.deliver.iter().find(|r| !customer.restaurants().contains(r)) {
                    return Err(SimError::InvalidAction(format!("{c} did not order from {r}")));
                }
                customer.location
            }
        };
        Ok(destination)
    }

    /// Queue every order intent.  Returns the restaurants whose queues changed.
    pub(crate) fn apply_restaurant_actions(&mut self, action: &Action) -> SimResult<BTreeSet<RestaurantId>> {
        let mut touched = BTreeSet::new();
        for (&r, intents) in &action.restaurant_action {
            let restaurant = self.restaurants.get_mut(&r).ok_or(SimError::UnknownRestaurant(r))?;
            for intent in intents {
                let prep = Forecast::new(
                    self.sampler.expected_cook_secs(),
                    self.sampler.sample_cook_secs(&mut self.rng),
                );
                let order = Order {
                    id:         OrderId(self.next_order),
                    customer:   intent.customer,
                    restaurant: r,
                    start_at:   intent.start_at,
                    prep_secs:  prep,
                };
                self.next_order += 1;
                restaurant.take_order(intent.insert_at, order, self.time)?;
                self.ordered.insert((intent.customer, r));
                touched.insert(r);
            }
        }
        Ok(touched)
    }

    /// Build and insert every stop intent, consuming the unassigned orders
    /// that pickups reference.
    pub(crate) fn apply_vehicle_actions(&mut self, action: &Action) -> SimResult<()> {
        for (&v, intents) in &action.vehicle_action {
            let vehicle = self.vehicles.get_mut(&v).ok_or(SimError::UnknownVehicle(v))?;
            for intent in intents {
                let stop = construct_stop(
                    vehicle,
                    intent,
                    &self.restaurants,
                    &self.customers,
                    &self.travel,
                    &self.sampler,
                    &mut self.rng,
                )?;
                if let Some(r) = stop.restaurant() {
                    let picked = stop.orders_to_pickup();
                    self.unassigned.retain(|&(c, rr)| rr != r || !picked.contains(&c));
                }
                vehicle.insert(intent.insert_at, stop, self.time)?;
            }
        }
        Ok(())
    }

    /// Repair every vehicle that received stops or waits at a restaurant in
    /// `touched`.
    pub(crate) fn repair_routes(&mut self, action: &Action, touched: &BTreeSet<RestaurantId>) -> SimResult<()> {
        let mut due: BTreeSet<VehicleId> = action.vehicle_action.keys().copied().collect();
        due.extend(
            self.vehicles
                .iter()
                .filter(|(_, v)| touched.iter().any(|&r| v.has_pickup_at(r)))
                .map(|(&id, _)| id),
        );
        for id in due {
            let vehicle = self.vehicles.get_mut(&id).ok_or(SimError::UnknownVehicle(id))?;
            vehicle.repair(self.time, &self.travel, &self.restaurants)?;
        }
        Ok(())
    }
}

/// Turn a stop intent into a [`Stop`] for `vehicle`.
///
/// The target decides the kind: a node is a relocation, a restaurant a
/// pickup, a customer a delivery.  Travel runs from the stop preceding the
/// insertion point (or the vehicle's location at the head) and is the same
/// on both timelines; park time is the expectation on the estimated
/// timeline and a fresh draw on the actual one.  Waits start at zero and are
/// filled in by route repair.
pub fn construct_stop<T: TravelTimes + ?Sized>(
    vehicle:     &Vehicle,
    intent:      &StopIntent,
    restaurants: &Restaurants,
    customers:   &BTreeMap<CustomerId, Customer>,
    travel:      &T,
    sampler:     &Sampler,
    rng:         &mut SimRng,
) -> SimResult<Stop> {
    let destination = match intent.target {
        StopTarget::Node(node) => node,
        StopTarget::Restaurant(r) => {
            restaurants.get(&r).ok_or(SimError::InvalidDestination(intent.target))?.location
        }
        StopTarget::Customer(c) => {
            customers.get(&c).ok_or(SimError::InvalidDestination(intent.target))?.location
        }
    };
    let origin = vehicle.origin_for(intent.insert_at)?;
    let travel_secs = travel.travel_secs(origin, destination)?;
    let park = Forecast::new(sampler.expected_park_secs(), sampler.sample_park_secs(rng));

    Ok(match intent.target {
        StopTarget::Node(_) => Stop::relocation(destination, intent.start_at, travel_secs, park),
        StopTarget::Restaurant(r) => {
            Stop::pickup(r, destination, intent.pickup.clone(), intent.start_at, travel_secs, park)?
        }
        StopTarget::Customer(c) => {
            Stop::delivery(c, destination, intent.deliver.clone(), intent.start_at, travel_secs, park)
        }
    })
}
