//! A module for the main application logic of the cycle counting tool
use std::fs;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::{load_config, Config, CountSpec};
use crate::error::CountResult;
use crate::histogram::{Events, Histogram, Tolerance};
use crate::method::{count, count_events, Method};
use crate::turning_points::hysteresis_gate;

/// Result of one configured count.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CountOutput {
    Histogram(Histogram),
    Events(Events),
}

#[derive(Debug, Serialize)]
pub struct CountReport {
    pub method: Method,
    pub aggregate: bool,
    pub result: CountOutput,
}

fn run_count(spec: &CountSpec, series: &[f64], tolerance: Tolerance) -> CountResult<CountReport> {
    let options = spec.options(tolerance);
    let result = if spec.aggregate {
        let hist = count(spec.method, series, &options)?;
        match spec.bin_size {
            Some(bin_size) => CountOutput::Histogram(hist.rebin(bin_size)?),
            None => CountOutput::Histogram(hist),
        }
    } else {
        CountOutput::Events(count_events(spec.method, series, &options)?)
    };
    Ok(CountReport {
        method: spec.method,
        aggregate: spec.aggregate,
        result,
    })
}

/// Reads the sequence, applies the gate and runs every count.
///
/// The counts are independent and share the sequence read-only, so they run
/// in parallel; reports come back in configuration order.
pub fn analyse(conf: &Config) -> Result<Vec<CountReport>> {
    conf.validate()?;
    let raw = conf.sequence.read_sequence()?;
    info!(path = %conf.sequence.path, points = raw.len(), "loaded sequence");

    let series = match conf.gate {
        Some(gate) => {
            let gated = hysteresis_gate(&raw, gate)?;
            info!(gate, before = raw.len(), after = gated.len(), "applied hysteresis gate");
            gated
        }
        None => raw,
    };

    let reports = conf
        .counts
        .par_iter()
        .map(|spec| run_count(spec, &series, conf.tolerance))
        .collect::<CountResult<Vec<_>>>()?;
    Ok(reports)
}

pub fn run(config_path: &str) -> Result<()> {
    info!(config = config_path, "running");
    let conf = load_config(config_path)?;
    let reports = analyse(&conf)?;
    let json = serde_json::to_string_pretty(&reports)?;

    match &conf.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write results to {}", path))?;
            info!(output = %path, counts = reports.len(), "results written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
