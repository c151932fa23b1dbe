//! `md-policy` — what a dispatcher sees and what it may ask for.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`observation`] | `Observation` — estimate-only snapshot handed to policies   |
//! | [`action`]      | `Action`, `OrderIntent`, `StopIntent`, `StopTarget`         |
//! | [`policy`]      | `Policy` trait                                              |
//! | [`noop`]        | `NoopPolicy` — never assigns anything                       |
//! | [`simple`]      | `SimpleAssignmentPolicy` — least-busy vehicle, append-only  |
//!
//! # Design notes
//!
//! A policy only ever receives an [`Observation`], which is built from the
//! entity summaries in `md-model`.  Those summaries carry estimated
//! durations only, so a policy cannot see ground-truth preparation or
//! parking times even by accident.
//!
//! Actions are plain data.  The engine in `md-sim` validates an action as a
//! whole before applying any part of it.

pub mod action;
pub mod noop;
pub mod observation;
pub mod policy;
pub mod simple;


pub use action::{Action, OrderIntent, StopIntent, StopTarget};
pub use md_model::InsertAt;
pub use noop::NoopPolicy;
pub use observation::Observation;
pub use policy::Policy;
pub use simple::SimpleAssignmentPolicy;
