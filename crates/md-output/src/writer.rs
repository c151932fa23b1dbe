//! The `OutputWriter` trait implemented by the backend writers.

use crate::{DayRow, DeliveryRow, OutputResult};

/// Sink for per-day episode results.
///
/// Errors surface through [`DayOutputObserver::take_error`][crate::DayOutputObserver::take_error]
/// when the writer is driven by the observer.
pub trait OutputWriter {
    /// Write the summary row of one finished day.
    fn write_day(&mut self, row: &DayRow) -> OutputResult<()>;

    /// Write the delivery rows of one finished day.
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()>;

    /// Flush and close the underlying handles.  Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
