//! Instance configuration.
//!
//! The file layout mirrors the named sections every instance ships with:
//! `graph`, `restaurants`, `vehicles`, `customers`, plus a `sim` section for
//! run settings.  Paths are resolved by [`crate::loader`]; the engine itself
//! only ever sees the scalar [`MdpParams`] extracted from this struct.
//!
//! ```json
//! {
//!   "graph":       { "travel_times": "tt_matrix.json" },
//!   "restaurants": { "count": 110, "locations": "restaurants.json",
//!                    "cook_time": { "mu": 10.0, "sigma": 1.5 } },
//!   "vehicles":    { "count": 5, "locations": "vehicles.json",
//!                    "park_time": { "mu": 2.0, "sigma": 1.5 } },
//!   "customers":   { "locations": "customers.json",
//!                    "lunch":  { "time_mu": 720.0, "time_sigma": 60.0,
//!                                "volume_mu": 55.0, "volume_sigma": 5.0 },
//!                    "dinner": { "time_mu": 1080.0, "time_sigma": 60.0,
//!                                "volume_mu": 80.0, "volume_sigma": 5.0 },
//!                    "service_promise_mins": 40.0 },
//!   "sim":         { "seed": 42 }
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default fast-forward step once the day's demand is exhausted.
pub const DEFAULT_IDLE_STEP_SECS: u64 = 360;

/// Default safety cap on steps per simulated day.
pub const DEFAULT_MAX_STEPS_PER_DAY: u64 = 1_000_000;

// ── Distribution parameters ──────────────────────────────────────────────────

/// Log-normal duration in minutes.
///
/// `mu` is the median and `sigma` the geometric standard deviation, so the
/// underlying normal has mean `ln mu` and standard deviation `ln sigma`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogNormalMinutes {
    pub mu:    f64,
    pub sigma: f64,
}

/// One demand peak (lunch or dinner).
///
/// Order times are normal with mean `time_mu` and standard deviation
/// `time_sigma`, both in minutes of day.  The number of orders is normal with
/// mean `volume_mu` and standard deviation `volume_sigma`, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakConfig {
    pub time_mu:      f64,
    pub time_sigma:   f64,
    pub volume_mu:    f64,
    pub volume_sigma: f64,
}

// ── File sections ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Travel-time table: `.json` (nested origin → destination → seconds) or
    /// `.csv` (`origin,destination,travel_secs`).
    pub travel_times: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantConfig {
    /// How many restaurants to instantiate each day.  Fewer than the number
    /// of locations means a fresh random subsample per day.
    pub count:     usize,
    pub locations: PathBuf,
    pub cook_time: LogNormalMinutes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub count:     usize,
    pub locations: PathBuf,
    pub park_time: LogNormalMinutes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerConfig {
    pub locations:            PathBuf,
    pub lunch:                PeakConfig,
    pub dinner:               PeakConfig,
    /// Promised delivery window in minutes after the order is placed.
    pub service_promise_mins: f64,
    /// Distinct restaurants per customer order.
    #[serde(default = "default_restaurants_per_order")]
    pub restaurants_per_order: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSettings {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_idle_step_secs")]
    pub idle_step_secs: u64,
    #[serde(default = "default_max_steps_per_day")]
    pub max_steps_per_day: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed:              0,
            idle_step_secs:    DEFAULT_IDLE_STEP_SECS,
            max_steps_per_day: DEFAULT_MAX_STEPS_PER_DAY,
        }
    }
}

/// Top-level instance file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub graph:       GraphConfig,
    pub restaurants: RestaurantConfig,
    pub vehicles:    VehicleConfig,
    pub customers:   CustomerConfig,
    #[serde(default)]
    pub sim:         SimSettings,
}

impl InstanceConfig {
    /// The scalar parameters the engine needs.
    pub fn params(&self) -> MdpParams {
        MdpParams {
            n_restaurants:         self.restaurants.count,
            n_vehicles:            self.vehicles.count,
            cook_time:             self.restaurants.cook_time,
            park_time:             self.vehicles.park_time,
            lunch:                 self.customers.lunch,
            dinner:                self.customers.dinner,
            service_promise_mins:  self.customers.service_promise_mins,
            restaurants_per_order: self.customers.restaurants_per_order,
            idle_step_secs:        self.sim.idle_step_secs,
        }
    }
}

// ── MdpParams ────────────────────────────────────────────────────────────────

/// Already-validated scalars the engine is parameterised by.
#[derive(Debug, Clone, PartialEq)]
pub struct MdpParams {
    pub n_restaurants:         usize,
    pub n_vehicles:            usize,
    pub cook_time:             LogNormalMinutes,
    pub park_time:             LogNormalMinutes,
    pub lunch:                 PeakConfig,
    pub dinner:                PeakConfig,
    pub service_promise_mins:  f64,
    pub restaurants_per_order: usize,
    pub idle_step_secs:        u64,
}

impl MdpParams {
    /// Service promise in whole seconds.
    #[inline]
    pub fn service_promise_secs(&self) -> u64 {
        (self.service_promise_mins * 60.0).max(0.0) as u64
    }
}

fn default_restaurants_per_order() -> usize {
    1
}

fn default_idle_step_secs() -> u64 {
    DEFAULT_IDLE_STEP_SECS
}

fn default_max_steps_per_day() -> u64 {
    DEFAULT_MAX_STEPS_PER_DAY
}
