//! Restaurant preparation queues.
//!
//! # Design
//!
//! A restaurant prepares one order at a time in queue order.  Each queued
//! entry caches its ready time on both timelines; the ready time of entry
//! `i` is the ready time of entry `i - 1` plus the preparation time of entry
//! `i`, and the head is anchored at the moment it was inserted at the front.
//! Inserting in the middle therefore shifts every later entry by exactly the
//! new order's preparation time.
//!
//! Entries leave the queue once their *actual* ready time has passed and sit
//! in `prepared` until a vehicle picks them up.

use std::collections::BTreeMap;

use serde::Serialize;

use md_core::{CustomerId, Forecast, NodeId, RestaurantId, SimTime, Timeline};

use crate::{InsertAt, ModelResult, Order, OrderSummary};

/// All restaurants of an episode, keyed by id.
pub type Restaurants = BTreeMap<RestaurantId, Restaurant>;

#[derive(Debug, Clone)]
struct Prepping {
    order: Order,
    ready: Forecast<SimTime>,
}

#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id:       RestaurantId,
    pub location: NodeId,
    queue:        Vec<Prepping>,
    prepared:     Vec<Prepping>,
}

/// What the platform may tell a policy about a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantSummary {
    pub location:               NodeId,
    pub orders_in_queue:        Vec<OrderSummary>,
    /// Estimated ready time of each queued order, aligned with `orders_in_queue`.
    pub estimated_finish_times: Vec<SimTime>,
    pub prepared_orders:        Vec<OrderSummary>,
}

impl Restaurant {
    pub fn new(id: RestaurantId, location: NodeId) -> Self {
        Self { id, location, queue: Vec::new(), prepared: Vec::new() }
    }

    /// Put `order` into the queue at `at` and return its position.
    pub fn take_order(&mut self, at: InsertAt, order: Order, now: SimTime) -> ModelResult<usize> {
        let position = at.resolve(self.queue.len())?;
        let anchor = match position {
            0 => Forecast::exact(now),
            i => self.queue[i - 1].ready,
        };
        let prep = order.prep_secs;
        for later in &mut self.queue[position..] {
            later.ready = later.ready.shifted(prep);
        }
        self.queue.insert(position, Prepping { order, ready: anchor.shifted(prep) });
        Ok(position)
    }

    /// Move every order whose actual ready time is `<= now` to `prepared`.
    ///
    /// Returns how many orders finished.
    pub fn update(&mut self, now: SimTime) -> usize {
        let done = self.queue.iter().take_while(|p| p.ready.actual <= now).count();
        self.prepared.extend(self.queue.drain(..done));
        done
    }

    /// Seconds past `at` until every order of `customers` still in the queue
    /// is ready on `timeline`.  Zero if none of them is queued.
    pub fn waiting_time(&self, customers: &[CustomerId], at: SimTime, timeline: Timeline) -> u64 {
        latest_ready(&self.queue, customers, timeline)
            .map_or(0, |ready| ready.saturating_since(at))
    }

    /// Like [`waiting_time`](Self::waiting_time) but also counts orders that
    /// already finished, measured from their recorded ready time.
    ///
    /// A vehicle that arrived before an order finished still waited for it
    /// even after the order left the queue.
    pub fn pickup_wait(&self, customers: &[CustomerId], arrival: SimTime, timeline: Timeline) -> u64 {
        let queued = latest_ready(&self.queue, customers, timeline);
        let prepared = latest_ready(&self.prepared, customers, timeline);
        queued.max(prepared).map_or(0, |ready| ready.saturating_since(arrival))
    }

    /// Hand a vehicle collecting at `at` the orders of `customers` that were
    /// actually ready by then.
    pub fn release(&mut self, customers: &[CustomerId], at: SimTime) -> Vec<Order> {
        let (taken, kept): (Vec<Prepping>, Vec<Prepping>) = std::mem::take(&mut self.prepared)
            .into_iter()
            .partition(|p| customers.contains(&p.order.customer) && p.ready.actual <= at);
        self.prepared = kept;
        taken.into_iter().map(|p| p.order).collect()
    }

    /// Queued orders with their ready times, in preparation order.
    pub fn queue(&self) -> impl Iterator<Item = (&Order, Forecast<SimTime>)> + '_ {
        self.queue.iter().map(|p| (&p.order, p.ready))
    }

    pub fn prepared(&self) -> impl Iterator<Item = &Order> + '_ {
        self.prepared.iter().map(|p| &p.order)
    }

    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether an order of `customer` is queued or waiting for pickup here.
    pub fn holds_order_for(&self, customer: CustomerId) -> bool {
        self.queue.iter().chain(&self.prepared).any(|p| p.order.customer == customer)
    }

    pub fn summary(&self) -> RestaurantSummary {
        RestaurantSummary {
            location:               self.location,
            orders_in_queue:        self.queue.iter().map(|p| p.order.summary()).collect(),
            estimated_finish_times: self.queue.iter().map(|p| p.ready.estimated).collect(),
            prepared_orders:        self.prepared.iter().map(|p| p.order.summary()).collect(),
        }
    }
}

fn latest_ready(entries: &[Prepping], customers: &[CustomerId], timeline: Timeline) -> Option<SimTime> {
    entries
        .iter()
        .filter(|p| customers.contains(&p.order.customer))
        .map(|p| p.ready.get(timeline))
        .max()
}
