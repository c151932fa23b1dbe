//! `md-sim` — the meal-delivery MDP engine and its day driver.
//!
//! # Step order
//!
//! ```text
//! step(action):
//!   ① Validate   — the whole action, against lengths only; no state change
//!                  and no random draw on failure.
//!   ② Restaurants — each order intent samples a preparation time and is
//!                  queued; later queue entries shift.
//!   ③ Vehicles   — each stop intent becomes a Stop (park time sampled) and
//!                  is inserted; pickups leave the unassigned list.
//!   ④ Repair     — vehicles that got stops, and vehicles with pickups at
//!                  restaurants changed in ②.
//!   ⑤ Clock      — reveal the next customer, or add the idle step.
//!   ⑥ Propagate  — restaurants finish orders, vehicles complete stops,
//!                  pickups and deliveries are settled, customers served.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                              |
//! |------------|-----------------------------------------------------|
//! | `parallel` | [`replicate`] runs seeds on Rayon's thread pool.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use md_policy::SimpleAssignmentPolicy;
//! use md_sim::{run_day, MdpBuilder, NoopObserver};
//!
//! let mut mdp = MdpBuilder::from_instance(instance).build()?;
//! let summary = run_day(&mut mdp, &mut SimpleAssignmentPolicy, &mut NoopObserver, 100_000)?;
//! println!("mean delay {:?} min", summary.mean_delay_mins);
//! ```

pub mod apply;
pub mod batch;
pub mod builder;
mod demand;
pub mod episode;
pub mod error;
pub mod mdp;
pub mod observer;


pub use apply::construct_stop;
pub use batch::replicate;
pub use builder::MdpBuilder;
pub use episode::{DaySummary, DeliveryRecord, run_day};
pub use error::{SimError, SimResult};
pub use mdp::{MealDeliveryMdp, StepInfo};
pub use observer::{MdpObserver, NoopObserver};
