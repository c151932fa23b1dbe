//! `md-model` — the physical world of the meal-delivery MDP.
//!
//! Entities here know how to change themselves (queue an order, repair a
//! route, complete stops) but nothing about demand, actions or episodes;
//! that orchestration lives in `md-sim`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`customer`]    | `Customer`, `CustomerStatus`, `CustomerSummary`       |
//! | [`order`]       | `Order`, `OrderSummary`                               |
//! | [`restaurant`]  | `Restaurant` preparation queue, `RestaurantSummary`   |
//! | [`stop`]        | `Stop`, `StopKind`, `StopSummary`                     |
//! | [`vehicle`]     | `Vehicle` route repair and advance, `VehicleSummary`  |
//! | [`insert`]      | `InsertAt` positions shared by queues and routes      |
//! | [`error`]       | `ModelError`, `ModelResult`                           |

pub mod customer;
pub mod error;
pub mod insert;
pub mod order;
pub mod restaurant;
pub mod stop;
pub mod vehicle;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use customer::{Customer, CustomerStatus, CustomerSummary};
pub use error::{ModelError, ModelResult};
pub use insert::InsertAt;
pub use order::{Order, OrderSummary};
pub use restaurant::{Restaurant, RestaurantSummary, Restaurants};
pub use stop::{Stop, StopKind, StopSummary, StopType};
pub use vehicle::{Progress, Vehicle, VehicleSummary};
