//! `md-core` — foundational types for the meal-delivery MDP workspace.
//!
//! This crate is a dependency of every other `md-*` crate and has no `md-*`
//! dependencies itself.
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`ids`]       | `CustomerId`, `RestaurantId`, `VehicleId`, `NodeId`, `OrderId` |
//! | [`time`]      | `SimTime`, `Forecast<T>`, `Timeline`, `DAY_END`            |
//! | [`rng`]       | `SimRng`, `replication_seed`                               |
//! | [`travel`]    | `TravelTimes` trait, `TravelTimeMatrix`                    |
//! | [`sampler`]   | `Sampler` — preparation, parking and demand draws          |
//! | [`config`]    | `InstanceConfig` sections, `MdpParams`                     |
//! | [`loader`]    | JSON/CSV instance loaders, `Instance`                      |
//! | [`error`]     | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod ids;
pub mod loader;
pub mod rng;
pub mod sampler;
pub mod time;
pub mod travel;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{InstanceConfig, LogNormalMinutes, MdpParams, PeakConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{CustomerId, NodeId, OrderId, RestaurantId, VehicleId};
pub use loader::{Instance, load_instance};
pub use rng::{SimRng, replication_seed};
pub use sampler::Sampler;
pub use time::{DAY_END, Forecast, SimTime, Timeline};
pub use travel::{TravelTimeMatrix, TravelTimes};
