//! Vehicles: route, backpack, repair and time advance.
//!
//! # Design
//!
//! A route is an ordered `Vec<Stop>`.  Only the head may be *started*; once
//! started its departure time and travel leg are frozen and nothing may be
//! inserted in front of it.
//!
//! [`Vehicle::repair`] recomputes every unstarted travel leg and every pickup
//! wait from scratch, walking the route from the head.  It reads nothing it
//! writes, so running it twice in a row gives the same route.
//!
//! [`Vehicle::advance`] walks the same chain on the actual timeline and pops
//! every stop whose completion time has passed.  Pickups are settled with the
//! restaurant as they complete, so only orders that were really handed over
//! enter the backpack and can be delivered by a later stop of the same walk.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use md_core::{CustomerId, Forecast, NodeId, RestaurantId, SimTime, Timeline, TravelTimes, VehicleId};

use crate::{InsertAt, ModelError, ModelResult, Restaurants, Stop, StopKind, StopSummary};

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id:   VehicleId,
    location: NodeId,
    route:    Vec<Stop>,
    backpack: BTreeSet<(RestaurantId, CustomerId)>,
}

/// What happened while a vehicle advanced to a new time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Customers whose orders were collected, per restaurant.
    pub picked_up: BTreeMap<RestaurantId, Vec<CustomerId>>,
    /// Orders a completed pickup asked for that were not ready.
    pub missed:    Vec<(RestaurantId, CustomerId)>,
    /// Parts handed over, per customer, with the completion time.
    pub delivered: BTreeMap<CustomerId, Vec<(RestaurantId, SimTime)>>,
}

impl Progress {
    pub fn is_empty(&self) -> bool {
        self.picked_up.is_empty() && self.missed.is_empty() && self.delivered.is_empty()
    }
}

/// What the platform may tell a policy about a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub next_location:       NodeId,
    pub orders_in_backpack:  Vec<(RestaurantId, CustomerId)>,
    pub sequence_of_actions: Vec<StopSummary>,
    pub busy_time:           u64,
}

impl Vehicle {
    pub fn new(id: VehicleId, location: NodeId) -> Self {
        Self { id, location, route: Vec::new(), backpack: BTreeSet::new() }
    }

    /// Node of the last completed stop (or the start position).
    #[inline]
    pub fn location(&self) -> NodeId {
        self.location
    }

    /// Where the vehicle ends up once its route is done.
    pub fn next_location(&self) -> NodeId {
        self.route.last().map_or(self.location, |s| s.destination)
    }

    #[inline]
    pub fn route(&self) -> &[Stop] {
        &self.route
    }

    #[inline]
    pub fn backpack(&self) -> &BTreeSet<(RestaurantId, CustomerId)> {
        &self.backpack
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.route.is_empty()
    }

    pub fn head_started(&self) -> bool {
        self.route.first().is_some_and(Stop::is_started)
    }

    /// Whether a not-yet-completed pickup on the route visits `restaurant`.
    pub fn has_pickup_at(&self, restaurant: RestaurantId) -> bool {
        self.route.iter().any(|s| s.restaurant() == Some(restaurant))
    }

    /// Node the vehicle departs from when travelling to a stop inserted at `at`.
    pub fn origin_for(&self, at: InsertAt) -> ModelResult<NodeId> {
        Ok(match at.resolve(self.route.len())? {
            0 => self.location,
            i => self.route[i - 1].destination,
        })
    }

    /// Insert `stop` at `at`.  A stop that becomes the route head starts at
    /// `now` unless it is deferred past `now`.
    ///
    /// Inserting in front of a head that already started is rejected.
    pub fn insert(&mut self, at: InsertAt, stop: Stop, now: SimTime) -> ModelResult<usize> {
        let position = at.resolve(self.route.len())?;
        if position == 0 && self.head_started() {
            return Err(ModelError::DisplacesStartedStop(self.id));
        }
        self.route.insert(position, stop);
        if position == 0 {
            let head = &mut self.route[0];
            if head.start_at.is_none_or(|t| t <= now) {
                head.started_at = Some(now);
            }
        }
        Ok(position)
    }

    /// Recompute travel legs, departure times and pickup waits for the
    /// whole route on both timelines.
    pub fn repair<T>(&mut self, now: SimTime, travel: &T, restaurants: &Restaurants) -> ModelResult<()>
    where
        T: TravelTimes + ?Sized,
    {
        let Some(head) = self.route.first() else {
            return Ok(());
        };
        let mut clock = Forecast::exact(head.started_at.unwrap_or(now));
        let mut origin = self.location;

        for stop in &mut self.route {
            let start = match stop.started_at {
                Some(t) => Forecast::exact(t),
                None => {
                    stop.travel = Forecast::exact(travel.travel_secs(origin, stop.destination)?);
                    let earliest = stop.start_at;
                    clock.map(|c| earliest.map_or(c, |s| s.max(c)))
                }
            };
            stop.planned_start = start;

            let arrival = start.shifted(stop.travel + stop.park);
            stop.wait = match stop.kind() {
                StopKind::Pickup { restaurant, orders } => {
                    let r = restaurants
                        .get(restaurant)
                        .ok_or(ModelError::UnknownRestaurant(*restaurant))?;
                    Forecast::new(
                        r.pickup_wait(orders, arrival.estimated, Timeline::Estimated),
                        r.pickup_wait(orders, arrival.actual, Timeline::Actual),
                    )
                }
                _ => Forecast::ZERO,
            };

            clock = arrival.shifted(stop.wait);
            origin = stop.destination;
        }
        Ok(())
    }

    /// Complete every stop whose actual completion time is `<= now`.
    ///
    /// Stops complete strictly in route order.  The next stop starts at the
    /// previous completion time, or at its `start_at` if that is later; a
    /// stop deferred past `now` is left unstarted.  A completed pickup takes
    /// from `restaurants` the orders that were ready at its completion time;
    /// the rest are reported in [`Progress::missed`].
    pub fn advance(&mut self, now: SimTime, restaurants: &mut Restaurants) -> ModelResult<Progress> {
        let mut progress = Progress::default();
        let mut previous_end: Option<SimTime> = None;

        while let Some(head) = self.route.first_mut() {
            let start = match head.started_at {
                Some(t) => t,
                None => {
                    let candidate = match (previous_end, head.start_at) {
                        (Some(end), Some(s)) => end.max(s),
                        (Some(end), None)    => end,
                        (None, Some(s))      => s,
                        (None, None)         => now,
                    };
                    if candidate > now {
                        break;
                    }
                    head.started_at = Some(candidate);
                    candidate
                }
            };

            let completion = start + head.total().actual;
            if completion > now {
                break;
            }

            let stop = self.route.remove(0);
            self.location = stop.destination;
            previous_end = Some(completion);

            match stop.kind() {
                StopKind::Pickup { restaurant, orders } => {
                    let r = restaurants
                        .get_mut(restaurant)
                        .ok_or(ModelError::UnknownRestaurant(*restaurant))?;
                    r.update(completion);
                    let released = r.release(orders, completion);
                    for &customer in orders {
                        if released.iter().any(|o| o.customer == customer) {
                            self.backpack.insert((*restaurant, customer));
                            progress.picked_up.entry(*restaurant).or_default().push(customer);
                        } else {
                            progress.missed.push((*restaurant, customer));
                        }
                    }
                }
                StopKind::Delivery { customer, .. } => {
                    let handed: Vec<_> = self
                        .backpack
                        .iter()
                        .filter(|(_, c)| c == customer)
                        .copied()
                        .collect();
                    if handed.is_empty() {
                        warn!(
                            vehicle  = %self.id,
                            customer = %customer,
                            "delivery stop reached with nothing to hand over"
                        );
                        continue;
                    }
                    for item in &handed {
                        self.backpack.remove(item);
                    }
                    progress
                        .delivered
                        .entry(*customer)
                        .or_default()
                        .extend(handed.into_iter().map(|(r, _)| (r, completion)));
                }
                StopKind::Relocation => {}
            }
        }
        Ok(progress)
    }

    /// Estimated seconds until the route is done, as seen at `now`.
    pub fn busy_time(&self, now: SimTime) -> u64 {
        let Some(head) = self.route.first() else {
            return 0;
        };
        let total: u64 = self.route.iter().map(|s| s.total().estimated).sum();
        let offset = match (head.started_at, head.start_at) {
            (Some(t), _)    => t.signed_since(now),
            (None, Some(s)) => s.signed_since(now).max(0),
            (None, None)    => 0,
        };
        (total as i64 + offset).max(0) as u64
    }

    pub fn summary(&self, now: SimTime) -> VehicleSummary {
        VehicleSummary {
            next_location:       self.next_location(),
            orders_in_backpack:  self.backpack.iter().copied().collect(),
            sequence_of_actions: self.route.iter().map(Stop::summary).collect(),
            busy_time:           self.busy_time(now),
        }
    }
}
