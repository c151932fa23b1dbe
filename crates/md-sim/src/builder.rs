//! Fluent builder for constructing a [`MealDeliveryMdp`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use md_core::{Instance, MdpParams, NodeId, Sampler, SimRng, SimTime, TravelTimeMatrix, TravelTimes};

use crate::{MealDeliveryMdp, SimError, SimResult};

/// Fluent builder for [`MealDeliveryMdp<T>`].
///
/// # Required inputs
///
/// - [`MdpParams`] — fleet size, distributions, service promise, idle step
/// - `T: TravelTimes` — node-to-node travel seconds
///
/// # Optional inputs (have defaults)
///
/// | Method                       | Default            |
/// |------------------------------|--------------------|
/// | `.restaurant_locations(v)`   | empty              |
/// | `.vehicle_locations(v)`      | empty              |
/// | `.customer_locations(v)`     | empty              |
/// | `.seed(s)`                   | `0`                |
/// | `.idle_step_secs(s)`         | from `MdpParams`   |
///
/// `build` rejects a fleet larger than the vehicle location list and an
/// empty customer location list.  Too few restaurant locations is only
/// reported by `reset`, since that is where restaurants are opened.
///
/// # Example
///
/// ```rust,ignore
/// let mut mdp = MdpBuilder::new(config.params(), matrix)
///     .restaurant_locations(restaurants)
///     .vehicle_locations(vehicles)
///     .customer_locations(customers)
///     .seed(42)
///     .build()?;
/// let obs = mdp.reset()?;
/// ```
pub struct MdpBuilder<T: TravelTimes> {
    params:               MdpParams,
    travel:               T,
    restaurant_locations: Vec<NodeId>,
    vehicle_locations:    Vec<NodeId>,
    customer_locations:   Vec<NodeId>,
    seed:                 u64,
}

impl<T: TravelTimes> MdpBuilder<T> {
    pub fn new(params: MdpParams, travel: T) -> Self {
        Self {
            params,
            travel,
            restaurant_locations: Vec::new(),
            vehicle_locations:    Vec::new(),
            customer_locations:   Vec::new(),
            seed:                 0,
        }
    }

    /// Candidate restaurant nodes; restaurant ids index into this list.
    pub fn restaurant_locations(mut self, locations: Vec<NodeId>) -> Self {
        self.restaurant_locations = locations;
        self
    }

    /// Start node of each vehicle, by vehicle id.
    pub fn vehicle_locations(mut self, locations: Vec<NodeId>) -> Self {
        self.vehicle_locations = locations;
        self
    }

    /// Nodes customers are drawn from uniformly.
    pub fn customer_locations(mut self, locations: Vec<NodeId>) -> Self {
        self.customer_locations = locations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Clock advance per step once every customer has ordered.
    pub fn idle_step_secs(mut self, secs: u64) -> Self {
        self.params.idle_step_secs = secs;
        self
    }

    pub fn build(self) -> SimResult<MealDeliveryMdp<T>> {
        let p = &self.params;
        if p.n_vehicles > self.vehicle_locations.len() {
            return Err(SimError::Config(format!(
                "{} vehicles requested but only {} vehicle locations given",
                p.n_vehicles,
                self.vehicle_locations.len()
            )));
        }
        if self.customer_locations.is_empty() {
            return Err(SimError::Config("no customer locations given".into()));
        }
        if p.n_restaurants == 0 {
            return Err(SimError::Config("at least one restaurant is required".into()));
        }
        if p.restaurants_per_order == 0 || p.restaurants_per_order > p.n_restaurants {
            return Err(SimError::Config(format!(
                "restaurants_per_order must be in 1..={}, got {}",
                p.n_restaurants, p.restaurants_per_order
            )));
        }
        if p.idle_step_secs == 0 {
            return Err(SimError::Config("idle_step_secs must be positive".into()));
        }
        let sampler = Sampler::new(p)?;

        Ok(MealDeliveryMdp {
            rng:                  SimRng::new(self.seed),
            sampler,
            params:               self.params,
            travel:               self.travel,
            restaurant_locations: self.restaurant_locations,
            vehicle_locations:    self.vehicle_locations,
            customer_locations:   self.customer_locations,
            day:                  0,
            time:                 SimTime::MIDNIGHT,
            restaurants:          BTreeMap::new(),
            vehicles:             BTreeMap::new(),
            customers:            BTreeMap::new(),
            unknown:              VecDeque::new(),
            known:                BTreeSet::new(),
            served:               Vec::new(),
            unassigned:           Vec::new(),
            ordered:              BTreeSet::new(),
            next_order:           0,
        })
    }
}

impl MdpBuilder<TravelTimeMatrix> {
    /// Builder preloaded with everything a file-loaded [`Instance`] carries,
    /// including its configured seed.
    pub fn from_instance(instance: Instance) -> Self {
        let params = instance.config.params();
        let seed = instance.config.sim.seed;
        Self::new(params, instance.travel)
            .restaurant_locations(instance.restaurant_locations)
            .vehicle_locations(instance.vehicle_locations)
            .customer_locations(instance.customer_locations)
            .seed(seed)
    }
}
