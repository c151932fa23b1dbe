//! Instance loaders.
//!
//! # Files
//!
//! | File              | Format                                                     |
//! |-------------------|------------------------------------------------------------|
//! | instance config   | JSON, see [`crate::config`]                                |
//! | location lists    | JSON array of node ids (`[12, 97, "301"]`)                 |
//! | travel times      | JSON `{ "12": { "97": 184.0, … }, … }` or CSV below        |
//!
//! ```csv
//! origin,destination,travel_secs
//! 12,97,184
//! 97,12,190
//! ```
//!
//! Relative paths inside the config are resolved against the directory the
//! config file lives in.  Travel times are truncated to whole seconds.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::config::InstanceConfig;
use crate::{CoreError, CoreResult, NodeId, TravelTimeMatrix};

// ── Instance ──────────────────────────────────────────────────────────────────

/// Everything read from disk for one instance.
#[derive(Debug, Clone)]
pub struct Instance {
    pub config:               InstanceConfig,
    pub travel:               TravelTimeMatrix,
    pub restaurant_locations: Vec<NodeId>,
    pub vehicle_locations:    Vec<NodeId>,
    pub customer_locations:   Vec<NodeId>,
}

/// Load the config at `path` and every file it references.
pub fn load_instance(path: &Path) -> CoreResult<Instance> {
    let config = load_config_json(path)?;
    let travel = load_travel_times(&config.graph.travel_times)?;
    let restaurant_locations = load_locations_json(&config.restaurants.locations)?;
    let vehicle_locations = load_locations_json(&config.vehicles.locations)?;
    let customer_locations = load_locations_json(&config.customers.locations)?;

    let mut nodes: Vec<NodeId> = restaurant_locations
        .iter()
        .chain(&vehicle_locations)
        .chain(&customer_locations)
        .copied()
        .collect();
    nodes.sort_unstable();
    nodes.dedup();
    travel.check_complete(&nodes)?;

    Ok(Instance {
        config,
        travel,
        restaurant_locations,
        vehicle_locations,
        customer_locations,
    })
}

// ── Config ────────────────────────────────────────────────────────────────────

/// Parse an [`InstanceConfig`] and resolve its relative paths.
pub fn load_config_json(path: &Path) -> CoreResult<InstanceConfig> {
    let file = File::open(path)?;
    let mut config: InstanceConfig = serde_json::from_reader(BufReader::new(file))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.graph.travel_times = resolve(base, &config.graph.travel_times);
    config.restaurants.locations = resolve(base, &config.restaurants.locations);
    config.vehicles.locations = resolve(base, &config.vehicles.locations);
    config.customers.locations = resolve(base, &config.customers.locations);
    Ok(config)
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() { p.to_path_buf() } else { base.join(p) }
}

// ── Locations ─────────────────────────────────────────────────────────────────

/// Load a JSON array of node ids.
pub fn load_locations_json(path: &Path) -> CoreResult<Vec<NodeId>> {
    let file = File::open(path)?;
    load_locations_reader(BufReader::new(file))
}

/// Like [`load_locations_json`] but accepts any `Read` source.
pub fn load_locations_reader<R: Read>(reader: R) -> CoreResult<Vec<NodeId>> {
    let values: Vec<Value> = serde_json::from_reader(reader)?;
    values.iter().map(parse_node).collect()
}

// ── Travel times ──────────────────────────────────────────────────────────────

/// Load a travel-time table, picking the format from the file extension.
pub fn load_travel_times(path: &Path) -> CoreResult<TravelTimeMatrix> {
    let file = File::open(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_travel_times_csv(file),
        Some("json") => load_travel_times_json(BufReader::new(file)),
        other => Err(CoreError::Config(format!(
            "travel times {}: unsupported extension {other:?} (expected .json or .csv)",
            path.display()
        ))),
    }
}

/// Nested JSON map `origin → destination → seconds`.
pub fn load_travel_times_json<R: Read>(reader: R) -> CoreResult<TravelTimeMatrix> {
    let nested: HashMap<String, HashMap<String, f64>> = serde_json::from_reader(reader)?;
    let mut matrix = TravelTimeMatrix::new();
    for (origin, row) in &nested {
        let from = parse_node_str(origin)?;
        for (dest, secs) in row {
            matrix.insert(from, parse_node_str(dest)?, whole_secs(*secs)?);
        }
    }
    Ok(matrix)
}

#[derive(Deserialize)]
struct TravelRecord {
    origin:      u32,
    destination: u32,
    travel_secs: f64,
}

/// CSV rows `origin,destination,travel_secs`.
pub fn load_travel_times_csv<R: Read>(reader: R) -> CoreResult<TravelTimeMatrix> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut matrix = TravelTimeMatrix::new();
    for result in csv_reader.deserialize::<TravelRecord>() {
        let row = result?;
        matrix.insert(NodeId(row.origin), NodeId(row.destination), whole_secs(row.travel_secs)?);
    }
    Ok(matrix)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn whole_secs(secs: f64) -> CoreResult<u64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(CoreError::Parse(format!("invalid travel time {secs}")));
    }
    Ok(secs as u64)
}

fn parse_node(v: &Value) -> CoreResult<NodeId> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .map(NodeId)
            .ok_or_else(|| CoreError::Parse(format!("invalid node id {n}"))),
        Value::String(s) => parse_node_str(s),
        other => Err(CoreError::Parse(format!("invalid node id {other}"))),
    }
}

fn parse_node_str(s: &str) -> CoreResult<NodeId> {
    s.trim()
        .parse::<u32>()
        .map(NodeId)
        .map_err(|_| CoreError::Parse(format!("invalid node id {s:?}: expected a u32")))
}
