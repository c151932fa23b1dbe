//! Plain data row types written by output backends.

use md_sim::{DaySummary, DeliveryRecord};

/// One row per simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayRow {
    pub day:             u32,
    pub customers:       u64,
    pub served:          u64,
    pub steps:           u64,
    /// Clock value (seconds since midnight) when the day finished.
    pub final_time_secs: u64,
    /// `None` when the day had no customers.
    pub mean_delay_mins: Option<f64>,
}

impl From<&DaySummary> for DayRow {
    fn from(s: &DaySummary) -> Self {
        Self {
            day:             s.day,
            customers:       s.customers as u64,
            served:          s.served as u64,
            steps:           s.steps,
            final_time_secs: s.final_time.0,
            mean_delay_mins: s.mean_delay_mins,
        }
    }
}

/// One row per served customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryRow {
    pub day:               u32,
    pub customer_id:       u32,
    pub restaurants:       u32,
    pub order_time_secs:   u64,
    pub deadline_secs:     u64,
    pub delivered_at_secs: u64,
    pub delay_secs:        u64,
}

impl From<&DeliveryRecord> for DeliveryRow {
    fn from(r: &DeliveryRecord) -> Self {
        Self {
            day:               r.day,
            customer_id:       r.customer.0,
            restaurants:       r.restaurants as u32,
            order_time_secs:   r.order_time.0,
            deadline_secs:     r.deadline.0,
            delivered_at_secs: r.delivered_at.0,
            delay_secs:        r.delay_secs,
        }
    }
}
