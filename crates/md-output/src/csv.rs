//! CSV output backend.
//!
//! Creates `days.csv` and `deliveries.csv` in the output directory.  A day
//! without customers leaves `mean_delay_mins` empty.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DayRow, DeliveryRow, OutputResult};

pub const DAY_HEADER: [&str; 6] =
    ["day", "customers", "served", "steps", "final_time_secs", "mean_delay_mins"];

pub const DELIVERY_HEADER: [&str; 7] = [
    "day",
    "customer_id",
    "restaurants",
    "order_time_secs",
    "deadline_secs",
    "delivered_at_secs",
    "delay_secs",
];

pub struct CsvWriter {
    days:       Writer<File>,
    deliveries: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create both files in `dir` (which must exist) and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut days = Writer::from_path(dir.join("days.csv"))?;
        days.write_record(DAY_HEADER)?;

        let mut deliveries = Writer::from_path(dir.join("deliveries.csv"))?;
        deliveries.write_record(DELIVERY_HEADER)?;

        Ok(Self { days, deliveries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_day(&mut self, row: &DayRow) -> OutputResult<()> {
        self.days.write_record(&[
            row.day.to_string(),
            row.customers.to_string(),
            row.served.to_string(),
            row.steps.to_string(),
            row.final_time_secs.to_string(),
            row.mean_delay_mins.map(|d| format!("{d:.3}")).unwrap_or_default(),
        ])?;
        Ok(())
    }

    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        for row in rows {
            self.deliveries.write_record(&[
                row.day.to_string(),
                row.customer_id.to_string(),
                row.restaurants.to_string(),
                row.order_time_secs.to_string(),
                row.deadline_secs.to_string(),
                row.delivered_at_secs.to_string(),
                row.delay_secs.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.days.flush()?;
        self.deliveries.flush()?;
        Ok(())
    }
}
