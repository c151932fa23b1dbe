//! iowa — day-by-day meal-delivery run with the simple assignment policy.
//!
//! ```text
//! cargo run -p iowa                      # synthetic town
//! cargo run -p iowa -- path/config.json  # instance from disk
//! RUST_LOG=md_sim=debug cargo run -p iowa
//! ```
//!
//! Writes `days.csv` and `deliveries.csv` under `output/iowa`.

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use md_core::config::{DEFAULT_IDLE_STEP_SECS, DEFAULT_MAX_STEPS_PER_DAY};
use md_core::{LogNormalMinutes, MdpParams, PeakConfig, TravelTimeMatrix, load_instance};
use md_output::{CsvWriter, DayOutputObserver};
use md_policy::{Policy, SimpleAssignmentPolicy};
use md_sim::{MdpBuilder, run_day};

use network::build_town;

// ── Constants ─────────────────────────────────────────────────────────────────

const DAYS:       u32   = 7;
const SEED:       u64   = 42;
const VEHICLES:   usize = 4;
const OUTPUT_DIR: &str  = "output/iowa";

// ── Instance ──────────────────────────────────────────────────────────────────

fn synthetic_params() -> MdpParams {
    MdpParams {
        n_restaurants:         4,
        n_vehicles:            VEHICLES,
        cook_time:             LogNormalMinutes { mu: 10.0, sigma: 1.5 },
        park_time:             LogNormalMinutes { mu: 2.0, sigma: 1.5 },
        lunch:                 PeakConfig { time_mu: 720.0, time_sigma: 60.0, volume_mu: 25.0, volume_sigma: 5.0 },
        dinner:                PeakConfig { time_mu: 1080.0, time_sigma: 60.0, volume_mu: 40.0, volume_sigma: 5.0 },
        service_promise_mins:  40.0,
        restaurants_per_order: 1,
        idle_step_secs:        DEFAULT_IDLE_STEP_SECS,
    }
}

/// Builder plus the per-day step cap.
fn builder(config: Option<&Path>) -> Result<(MdpBuilder<TravelTimeMatrix>, u64)> {
    let Some(path) = config else {
        let town = build_town();
        info!(
            nodes       = town.residential.len() + town.downtown.len(),
            restaurants = town.downtown.len(),
            vehicles    = VEHICLES,
            "synthetic town"
        );
        let builder = MdpBuilder::new(synthetic_params(), town.travel)
            .restaurant_locations(town.downtown)
            .vehicle_locations(vec![town.depot; VEHICLES])
            .customer_locations(town.residential)
            .seed(SEED);
        return Ok((builder, DEFAULT_MAX_STEPS_PER_DAY));
    };

    let instance = load_instance(path)
        .with_context(|| format!("loading instance {}", path.display()))?;
    let max_steps = instance.config.sim.max_steps_per_day;
    info!(
        path        = %path.display(),
        restaurants = instance.restaurant_locations.len(),
        vehicles    = instance.vehicle_locations.len(),
        customers   = instance.customer_locations.len(),
        "loaded instance"
    );
    Ok((MdpBuilder::from_instance(instance), max_steps))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);
    let (builder, max_steps) = builder(config.as_deref())?;
    let mut mdp = builder.build()?;
    let mut policy = SimpleAssignmentPolicy;

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = DayOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);

    println!("=== iowa — meal delivery, policy `{}` ===", policy.name());
    println!("Days: {DAYS}  |  Vehicles: {}  |  Restaurants: {}", mdp.params().n_vehicles, mdp.params().n_restaurants);
    println!();
    println!("{:<6} {:>10} {:>8} {:>12} {:>16}", "Day", "Customers", "Steps", "Finished", "Mean delay (min)");
    println!("{}", "-".repeat(56));

    let t0 = Instant::now();
    let mut delays = Vec::new();
    for _ in 0..DAYS {
        let summary = run_day(&mut mdp, &mut policy, &mut obs, max_steps)?;
        println!(
            "{:<6} {:>10} {:>8} {:>12} {:>16}",
            summary.day,
            summary.customers,
            summary.steps,
            summary.final_time.to_string(),
            summary.mean_delay_mins.map(|d| format!("{d:.2}")).unwrap_or_else(|| "-".into()),
        );
        delays.extend(summary.mean_delay_mins);
    }
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        warn!(error = %e, "output error");
    }
    obs.finish()?;

    if delays.is_empty() {
        bail!("no customers ordered in {DAYS} days");
    }
    let overall = delays.iter().sum::<f64>() / delays.len() as f64;

    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  mean delay over {} days : {overall:.2} min", delays.len());
    println!("  days.csv               : {} rows", obs.days_written());
    println!("  deliveries.csv         : {} rows", obs.deliveries_written());
    Ok(())
}
