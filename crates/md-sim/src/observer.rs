//! Episode observer trait for progress reporting and data collection.

use md_policy::Observation;

use crate::{DaySummary, DeliveryRecord};

/// Callbacks invoked by [`run_day`][crate::run_day] at key points of a day.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: step counter
///
/// ```rust,ignore
/// struct Steps(u64);
///
/// impl MdpObserver for Steps {
///     fn on_step(&mut self, _obs: &Observation, _cost: f64) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait MdpObserver {
    /// Called right after `reset` with the day's first observation.
    fn on_reset(&mut self, _day: u32, _obs: &Observation) {}

    /// Called after every `step` with the new observation and its cost.
    fn on_step(&mut self, _obs: &Observation, _cost: f64) {}

    /// Called once the day is done, with one record per served customer.
    fn on_day_end(&mut self, _summary: &DaySummary, _deliveries: &[DeliveryRecord]) {}
}

/// An [`MdpObserver`] that does nothing.
pub struct NoopObserver;

impl MdpObserver for NoopObserver {}
