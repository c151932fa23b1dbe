//! Integration tests for md-output.

use md_core::SimTime;
use md_sim::{DaySummary, DeliveryRecord};

use crate::row::{DayRow, DeliveryRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn day_row(day: u32, mean_delay_mins: Option<f64>) -> DayRow {
    DayRow {
        day,
        customers: 16,
        served: 16,
        steps: 40,
        final_time_secs: 72_000,
        mean_delay_mins,
    }
}

fn delivery_row(day: u32, customer_id: u32) -> DeliveryRow {
    DeliveryRow {
        day,
        customer_id,
        restaurants:       1,
        order_time_secs:   43_200,
        deadline_secs:     45_600,
        delivered_at_secs: 45_900,
        delay_secs:        300,
    }
}

// ── Row conversion ────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use md_core::CustomerId;

    use super::*;

    #[test]
    fn day_row_from_summary() {
        let summary = DaySummary {
            day:             3,
            customers:       10,
            served:          10,
            steps:           27,
            final_time:      SimTime(70_000),
            mean_delay_mins: Some(1.5),
        };
        assert_eq!(DayRow::from(&summary), DayRow {
            day:             3,
            customers:       10,
            served:          10,
            steps:           27,
            final_time_secs: 70_000,
            mean_delay_mins: Some(1.5),
        });
    }

    #[test]
    fn delivery_row_from_record() {
        let record = DeliveryRecord {
            day:          1,
            customer:     CustomerId(7),
            restaurants:  2,
            order_time:   SimTime(43_200),
            deadline:     SimTime(45_600),
            delivered_at: SimTime(45_000),
            delay_secs:   0,
        };
        let row = DeliveryRow::from(&record);
        assert_eq!(row.customer_id, 7);
        assert_eq!(row.restaurants, 2);
        assert_eq!(row.delivered_at_secs, 45_000);
        assert_eq!(row.delay_secs, 0);
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::{CsvWriter, DAY_HEADER, DELIVERY_HEADER};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(dir: &TempDir, name: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("days.csv").exists());
        assert!(dir.path().join("deliveries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (days, _) = read(&dir, "days.csv");
        assert_eq!(days, DAY_HEADER);
        let (deliveries, _) = read(&dir, "deliveries.csv");
        assert_eq!(deliveries, DELIVERY_HEADER);
    }

    #[test]
    fn csv_day_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_day(&day_row(1, Some(2.25))).unwrap();
        w.write_day(&day_row(2, None)).unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "days.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][4], "72000");
        assert_eq!(&rows[0][5], "2.250");
        assert_eq!(&rows[1][5], "", "missing mean delay is written as an empty field");
    }

    #[test]
    fn csv_delivery_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery_row(1, 0), delivery_row(1, 1)]).unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "deliveries.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "1"); // customer_id
        assert_eq!(&rows[1][6], "300"); // delay_secs
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_dir_errors() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::io;

    use md_core::{LogNormalMinutes, MdpParams, NodeId, PeakConfig, TravelTimeMatrix};
    use md_policy::SimpleAssignmentPolicy;
    use md_sim::{MdpBuilder, MdpObserver, run_day};
    use tempfile::TempDir;

    use super::*;
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, DayOutputObserver, OutputError, OutputResult};

    /// Writer whose every call fails with a numbered I/O error.
    #[derive(Default)]
    struct FailingWriter {
        calls: usize,
    }

    impl FailingWriter {
        fn fail(&mut self) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(io::Error::other(format!("failure {}", self.calls))))
        }
    }

    impl OutputWriter for FailingWriter {
        fn write_day(&mut self, _row: &DayRow) -> OutputResult<()> {
            self.fail()
        }

        fn write_deliveries(&mut self, _rows: &[DeliveryRow]) -> OutputResult<()> {
            self.fail()
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn summary() -> DaySummary {
        DaySummary {
            day:             1,
            customers:       0,
            served:          0,
            steps:           0,
            final_time:      SimTime(0),
            mean_delay_mins: None,
        }
    }

    #[test]
    fn keeps_first_error() {
        let mut obs = DayOutputObserver::new(FailingWriter::default());
        obs.on_day_end(&summary(), &[]);
        obs.on_day_end(&summary(), &[]);

        let err = obs.take_error().expect("error stored");
        assert!(err.to_string().contains("failure 1"), "got {err}");
        assert!(obs.take_error().is_none(), "error is taken only once");
        assert_eq!(obs.days_written(), 0);
        assert_eq!(obs.into_writer().calls, 4);
    }

    #[test]
    fn finish_reports_stored_error() {
        let mut obs = DayOutputObserver::new(FailingWriter::default());
        obs.on_day_end(&summary(), &[]);
        assert!(obs.finish().is_err());
        assert!(obs.finish().is_ok());
    }

    fn params() -> MdpParams {
        MdpParams {
            n_restaurants:         2,
            n_vehicles:            2,
            cook_time:             LogNormalMinutes { mu: 10.0, sigma: 1.5 },
            park_time:             LogNormalMinutes { mu: 2.0, sigma: 1.5 },
            lunch:                 PeakConfig { time_mu: 720.0, time_sigma: 60.0, volume_mu: 5.0, volume_sigma: 0.0 },
            dinner:                PeakConfig { time_mu: 1080.0, time_sigma: 60.0, volume_mu: 5.0, volume_sigma: 0.0 },
            service_promise_mins:  40.0,
            restaurants_per_order: 1,
            idle_step_secs:        360,
        }
    }

    fn matrix() -> TravelTimeMatrix {
        let mut m = TravelTimeMatrix::new();
        for i in 0..4u32 {
            for j in 0..4u32 {
                if i != j {
                    m.insert(NodeId(i), NodeId(j), 300);
                }
            }
        }
        m
    }

    #[test]
    fn integration_csv() {
        let mut mdp = MdpBuilder::new(params(), matrix())
            .restaurant_locations(vec![NodeId(0), NodeId(1)])
            .vehicle_locations(vec![NodeId(2), NodeId(3)])
            .customer_locations(vec![NodeId(2), NodeId(3)])
            .seed(5)
            .build()
            .unwrap();
        let mut policy = SimpleAssignmentPolicy;

        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let mut obs = DayOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        for _ in 0..2 {
            let summary = run_day(&mut mdp, &mut policy, &mut obs, 10_000).unwrap();
            assert_eq!(summary.served, 10);
        }
        obs.finish().unwrap();
        assert_eq!(obs.days_written(), 2);
        assert_eq!(obs.deliveries_written(), 20);

        let mut rdr = csv::Reader::from_path(dir.path().join("days.csv")).unwrap();
        let days: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(days.len(), 2);
        assert_eq!(&days[1][0], "2");

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 20);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_delivery_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery_row(1, 0), delivery_row(1, 1), delivery_row(2, 0)]).unwrap();
        w.write_deliveries(&[]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM deliveries WHERE day = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn sqlite_duplicate_delivery_rejected() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        assert!(w.write_deliveries(&[delivery_row(1, 0), delivery_row(1, 0)]).is_err());
    }

    #[test]
    fn sqlite_null_mean_delay() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_day(&day_row(1, Some(4.0))).unwrap();
        w.write_day(&day_row(2, None)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let mut stmt = conn.prepare("SELECT mean_delay_mins FROM days ORDER BY day").unwrap();
        let delays: Vec<Option<f64>> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(delays, vec![Some(4.0), None]);
    }
}
