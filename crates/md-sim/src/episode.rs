//! Day episode driver.

use serde::Serialize;
use tracing::info;

use md_core::{CustomerId, SimTime, TravelTimes};
use md_policy::Policy;

use crate::{MdpObserver, MealDeliveryMdp, SimError, SimResult};

/// Outcome of one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub day:             u32,
    pub customers:       usize,
    pub served:          usize,
    pub steps:           u64,
    pub final_time:      SimTime,
    /// `None` when nobody ordered.
    pub mean_delay_mins: Option<f64>,
}

/// Delivery outcome of one served customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    pub day:          u32,
    pub customer:     CustomerId,
    /// Number of restaurants the order was split over.
    pub restaurants:  usize,
    pub order_time:   SimTime,
    pub deadline:     SimTime,
    /// Arrival of the last part.
    pub delivered_at: SimTime,
    pub delay_secs:   u64,
}

/// Run one full day: reset, then act and step until every customer is
/// served.
///
/// Fails with [`SimError::StepLimit`] if the day is not done after
/// `max_steps` steps, e.g. because the policy leaves orders unassigned.
pub fn run_day<T, P, O>(
    mdp:       &mut MealDeliveryMdp<T>,
    policy:    &mut P,
    observer:  &mut O,
    max_steps: u64,
) -> SimResult<DaySummary>
where
    T: TravelTimes,
    P: Policy + ?Sized,
    O: MdpObserver + ?Sized,
{
    let mut obs = mdp.reset()?;
    let day = mdp.day();
    observer.on_reset(day, &obs);

    let mut steps = 0;
    while !mdp.done() {
        if steps >= max_steps {
            return Err(SimError::StepLimit { day, steps });
        }
        let action = policy.act(&obs);
        let (next, cost, _done, _info) = mdp.step(&action)?;
        steps += 1;
        observer.on_step(&next, cost);
        obs = next;
    }

    let served = mdp.served_count();
    let summary = DaySummary {
        day,
        customers: mdp.customers().len(),
        served,
        steps,
        final_time: mdp.time(),
        mean_delay_mins: if served > 0 { Some(mdp.mean_delay()?) } else { None },
    };
    let deliveries = mdp.delivery_records();
    observer.on_day_end(&summary, &deliveries);

    info!(
        day,
        policy     = policy.name(),
        customers  = summary.customers,
        steps,
        final_time = %summary.final_time,
        mean_delay = summary.mean_delay_mins.unwrap_or(0.0),
        "day finished"
    );
    Ok(summary)
}
