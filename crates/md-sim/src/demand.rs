//! Per-day instantiation: restaurants, vehicles and the day's customers.
//!
//! Every draw goes through the engine's single [`SimRng`] in a fixed order:
//! restaurant subsample, lunch volume, dinner volume, lunch times, dinner
//! times, then location and restaurant choice per customer.

use std::collections::BTreeMap;

use md_core::{CustomerId, MdpParams, NodeId, RestaurantId, Sampler, SimRng, VehicleId};
use md_model::{Customer, Restaurant, Restaurants, Vehicle};

use crate::{SimError, SimResult};

/// Open `count` restaurants.
///
/// Restaurant ids are indices into `locations`.  When fewer restaurants than
/// locations are requested, a uniform random subset is drawn.
pub(crate) fn init_restaurants(
    count:     usize,
    locations: &[NodeId],
    rng:       &mut SimRng,
) -> SimResult<Restaurants> {
    if count > locations.len() {
        return Err(SimError::Config(format!(
            "{count} restaurants requested but only {} restaurant locations exist",
            locations.len()
        )));
    }
    let indices: Vec<usize> = if count == locations.len() {
        (0..count).collect()
    } else {
        rng.permutation(locations.len()).into_iter().take(count).collect()
    };
    Ok(indices
        .into_iter()
        .map(|i| {
            let id = RestaurantId(i as u32);
            (id, Restaurant::new(id, locations[i]))
        })
        .collect())
}

/// Place `count` vehicles at the first `count` configured start locations.
pub(crate) fn init_vehicles(count: usize, locations: &[NodeId]) -> BTreeMap<VehicleId, Vehicle> {
    locations
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, &node)| {
            let id = VehicleId(i as u32);
            (id, Vehicle::new(id, node))
        })
        .collect()
}

/// Sample the day's customers, sorted by order time, all unrevealed.
pub(crate) fn sample_customers(
    sampler:     &Sampler,
    params:      &MdpParams,
    locations:   &[NodeId],
    restaurants: &[RestaurantId],
    rng:         &mut SimRng,
) -> Vec<Customer> {
    let (lunch, dinner) = sampler.sample_day_volume(rng);
    let order_times = sampler.sample_order_times(rng, lunch, dinner);
    let promise = params.service_promise_secs();

    order_times
        .into_iter()
        .enumerate()
        .filter_map(|(i, order_time)| {
            let location = *rng.choose(locations)?;
            let choice = rng.choose_distinct(restaurants, params.restaurants_per_order);
            Some(Customer::new(
                CustomerId(i as u32),
                location,
                order_time,
                order_time + promise,
                choice,
            ))
        })
        .collect()
}
