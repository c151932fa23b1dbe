//! The `MealDeliveryMdp` engine: reset, step and the queries around them.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, info, warn};

use md_core::{CustomerId, MdpParams, NodeId, RestaurantId, Sampler, SimRng, SimTime, TravelTimes, VehicleId};
use md_model::{Customer, Restaurants, Vehicle};
use md_policy::{Action, Observation};

use crate::{demand, DeliveryRecord, SimError, SimResult};

/// Side information returned with every transition.
///
/// Carries nothing the cost or observation depend on; useful for logging
/// and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInfo {
    /// Customer whose order moved the clock, if any.
    pub revealed:  Option<CustomerId>,
    /// Orders that finished preparation during the step.
    pub prepared:  usize,
    /// Orders collected by vehicles during the step.
    pub picked_up: usize,
    /// Order parts handed to customers during the step.
    pub delivered: usize,
    /// Customers that became fully served during the step.
    pub served:    Vec<CustomerId>,
}

/// One simulated platform, one day at a time.
///
/// `reset` starts a new day; `step` integrates an action, moves the clock to
/// the next customer order (or by the idle step once all customers have
/// ordered) and propagates preparation, pickups and deliveries to the new
/// time.  All randomness is drawn from one seeded stream, so the same seed
/// reproduces the same sequence of days given the same actions.
///
/// Create via [`MdpBuilder`][crate::MdpBuilder].
pub struct MealDeliveryMdp<T: TravelTimes> {
    pub(crate) params:               MdpParams,
    pub(crate) sampler:              Sampler,
    pub(crate) travel:               T,
    pub(crate) restaurant_locations: Vec<NodeId>,
    pub(crate) vehicle_locations:    Vec<NodeId>,
    pub(crate) customer_locations:   Vec<NodeId>,
    pub(crate) rng:                  SimRng,

    pub(crate) day:         u32,
    pub(crate) time:        SimTime,
    pub(crate) restaurants: Restaurants,
    pub(crate) vehicles:    BTreeMap<VehicleId, Vehicle>,
    pub(crate) customers:   BTreeMap<CustomerId, Customer>,
    /// Customers yet to order, earliest first.
    pub(crate) unknown:     VecDeque<CustomerId>,
    /// Customers who ordered and are not fully served.
    pub(crate) known:       BTreeSet<CustomerId>,
    /// Fully served customers, in the order they were served.
    pub(crate) served:      Vec<CustomerId>,
    /// Placed orders not yet on any route, oldest first.
    pub(crate) unassigned:  Vec<(CustomerId, RestaurantId)>,
    /// Orders that have been queued at their restaurant today.
    pub(crate) ordered:     BTreeSet<(CustomerId, RestaurantId)>,
    pub(crate) next_order:  u32,
}

impl<T: TravelTimes> MealDeliveryMdp<T> {
    // ── Transitions ───────────────────────────────────────────────────────

    /// Discard the current day, sample a new one and return its first
    /// observation.
    pub fn reset(&mut self) -> SimResult<Observation> {
        self.day += 1;
        self.time = SimTime::MIDNIGHT;
        self.vehicles.clear();
        self.customers.clear();
        self.unknown.clear();
        self.known.clear();
        self.served.clear();
        self.unassigned.clear();
        self.ordered.clear();
        self.next_order = 0;

        self.restaurants = demand::init_restaurants(
            self.params.n_restaurants,
            &self.restaurant_locations,
            &mut self.rng,
        )?;
        self.vehicles = demand::init_vehicles(self.params.n_vehicles, &self.vehicle_locations);

        let open: Vec<RestaurantId> = self.restaurants.keys().copied().collect();
        let customers = demand::sample_customers(
            &self.sampler,
            &self.params,
            &self.customer_locations,
            &open,
            &mut self.rng,
        );
        self.unknown = customers.iter().map(|c| c.id).collect();
        self.customers = customers.into_iter().map(|c| (c.id, c)).collect();

        info!(
            day         = self.day,
            customers   = self.customers.len(),
            restaurants = self.restaurants.len(),
            vehicles    = self.vehicles.len(),
            "day reset"
        );
        Ok(self.observation())
    }

    /// Apply `action`, advance to the next event and return
    /// `(observation, cost, done, info)`.
    ///
    /// The action is validated as a whole first; an invalid action leaves
    /// the engine untouched.  Cost is always zero: only delay is measured.
    pub fn step(&mut self, action: &Action) -> SimResult<(Observation, f64, bool, StepInfo)> {
        if self.day == 0 {
            return Err(SimError::NotReset);
        }
        self.validate(action)?;

        // Restaurants first: pickup waits depend on the updated queues.
        let touched = self.apply_restaurant_actions(action)?;
        self.apply_vehicle_actions(action)?;
        self.repair_routes(action, &touched)?;
        if !action.is_empty() {
            debug!(
                time     = %self.time,
                orders   = action.restaurant_action.values().map(Vec::len).sum::<usize>(),
                stops    = action.vehicle_action.values().map(Vec::len).sum::<usize>(),
                "action integrated"
            );
        }

        let cost = 0.0;
        let mut info = StepInfo { revealed: self.advance_clock()?, ..StepInfo::default() };
        self.propagate(&mut info)?;

        Ok((self.observation(), cost, self.done(), info))
    }

    /// Reveal the next customer, or fast-forward by the idle step.
    fn advance_clock(&mut self) -> SimResult<Option<CustomerId>> {
        let Some(id) = self.unknown.pop_front() else {
            self.time += self.params.idle_step_secs;
            return Ok(None);
        };
        let customer = self.customers.get_mut(&id).ok_or(SimError::UnknownCustomer(id))?;
        customer.reveal()?;
        self.unassigned.extend(customer.restaurants().iter().map(|&r| (id, r)));
        self.known.insert(id);
        self.time = self.time.max(customer.order_time);
        debug!(customer = %id, time = %self.time, restaurants = customer.restaurants().len(), "customer ordered");
        Ok(Some(id))
    }

    /// Bring restaurants and vehicles up to the current time and settle
    /// pickups and deliveries.
    fn propagate(&mut self, info: &mut StepInfo) -> SimResult<()> {
        let now = self.time;
        for restaurant in self.restaurants.values_mut() {
            info.prepared += restaurant.update(now);
        }

        for vehicle in self.vehicles.values_mut() {
            let progress = vehicle.advance(now, &mut self.restaurants)?;
            info.picked_up += progress.picked_up.values().map(Vec::len).sum::<usize>();
            for (r, c) in progress.missed {
                warn!(
                    vehicle    = %vehicle.id,
                    restaurant = %r,
                    customer   = %c,
                    "pickup completed before the order was prepared; order returned to unassigned"
                );
                self.unassigned.push((c, r));
            }

            for (c, parts) in progress.delivered {
                let customer = self.customers.get_mut(&c).ok_or(SimError::UnknownCustomer(c))?;
                info.delivered += parts.len();
                for (r, at) in parts {
                    customer.record_delivery(r, at)?;
                }
                if customer.is_fully_delivered() {
                    customer.mark_served()?;
                    self.known.remove(&c);
                    self.served.push(c);
                    info.served.push(c);
                    debug!(customer = %c, delay_secs = customer.delay_secs(), "customer served");
                }
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` once every customer of the day has been served.
    pub fn done(&self) -> bool {
        self.day > 0 && self.unknown.is_empty() && self.known.is_empty()
    }

    /// Mean delay of the served customers, in minutes.
    pub fn mean_delay(&self) -> SimResult<f64> {
        if self.served.is_empty() {
            return Err(SimError::NoServedCustomers);
        }
        let total: u64 = self
            .served
            .iter()
            .filter_map(|id| self.customers.get(id))
            .filter_map(Customer::delay_secs)
            .sum();
        Ok(total as f64 / self.served.len() as f64 / 60.0)
    }

    /// What a policy may see right now.
    pub fn observation(&self) -> Observation {
        Observation {
            current_time:      self.time,
            unassigned_orders: self.unassigned.clone(),
            vehicles:          self.vehicles.iter().map(|(&id, v)| (id, v.summary(self.time))).collect(),
            restaurants:       self.restaurants.iter().map(|(&id, r)| (id, r.summary())).collect(),
            customers:         self
                .known
                .iter()
                .filter_map(|id| self.customers.get(id))
                .map(|c| (c.id, c.summary()))
                .collect(),
        }
    }

    /// One record per served customer, in serve order.
    pub fn delivery_records(&self) -> Vec<DeliveryRecord> {
        self.served
            .iter()
            .filter_map(|id| self.customers.get(id))
            .filter_map(|c| {
                Some(DeliveryRecord {
                    day:          self.day,
                    customer:     c.id,
                    restaurants:  c.restaurants().len(),
                    order_time:   c.order_time,
                    deadline:     c.expected_delivery,
                    delivered_at: c.last_delivery()?,
                    delay_secs:   c.delay_secs()?,
                })
            })
            .collect()
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }

    #[inline]
    pub fn time(&self) -> SimTime {
        self.time
    }

    #[inline]
    pub fn params(&self) -> &MdpParams {
        &self.params
    }

    #[inline]
    pub fn restaurants(&self) -> &Restaurants {
        &self.restaurants
    }

    #[inline]
    pub fn vehicles(&self) -> &BTreeMap<VehicleId, Vehicle> {
        &self.vehicles
    }

    #[inline]
    pub fn customers(&self) -> &BTreeMap<CustomerId, Customer> {
        &self.customers
    }

    #[inline]
    pub fn unassigned_orders(&self) -> &[(CustomerId, RestaurantId)] {
        &self.unassigned
    }

    /// Orders queued at a restaurant today, as `(customer, restaurant)`.
    pub fn ordered_pairs(&self) -> impl Iterator<Item = (CustomerId, RestaurantId)> + '_ {
        self.ordered.iter().copied()
    }

    #[inline]
    pub fn served_count(&self) -> usize {
        self.served.len()
    }
}
