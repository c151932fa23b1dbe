//! `DayOutputObserver<W>`: bridges `MdpObserver` to an `OutputWriter`.

use md_sim::{DaySummary, DeliveryRecord, MdpObserver};

use crate::row::{DayRow, DeliveryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`MdpObserver`] that writes one day row and the day's delivery rows
/// whenever a day ends.
///
/// `MdpObserver` hooks cannot fail, so the first write error is kept and can
/// be collected with [`take_error`][Self::take_error] after the run.  The
/// writer is not finished automatically since one observer usually spans
/// several days; call [`finish`][Self::finish] once at the end.
pub struct DayOutputObserver<W: OutputWriter> {
    writer:     W,
    days:       usize,
    deliveries: usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> DayOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, days: 0, deliveries: 0, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Day rows written so far.
    pub fn days_written(&self) -> usize {
        self.days
    }

    /// Delivery rows written so far.
    pub fn deliveries_written(&self) -> usize {
        self.deliveries
    }

    /// Finish the writer, reporting a stored error first.
    pub fn finish(&mut self) -> OutputResult<()> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> MdpObserver for DayOutputObserver<W> {
    fn on_day_end(&mut self, summary: &DaySummary, deliveries: &[DeliveryRecord]) {
        let result = self.writer.write_day(&DayRow::from(summary));
        if result.is_ok() {
            self.days += 1;
        }
        self.store_err(result);

        let rows: Vec<DeliveryRow> = deliveries.iter().map(DeliveryRow::from).collect();
        let result = self.writer.write_deliveries(&rows);
        if result.is_ok() {
            self.deliveries += rows.len();
        }
        self.store_err(result);
    }
}
