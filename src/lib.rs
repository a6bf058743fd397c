//! Fatigue cycle counting: turning point and hysteresis filtering, the
//! ASTM E1049-85 counting methods, and the four-point, range-pair,
//! repeat-history, min-max and top-up crossing extensions.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub mod app_logic;
pub mod config;
pub mod elementary;
pub mod error;
pub mod extremum;
pub mod four_point;
pub mod histogram;
pub mod method;
pub mod rainflow;
pub mod range_pair;
pub mod timeseries;
pub mod turning_points;

pub use error::{CountResult, CountingError};
pub use histogram::{Aggregator, Cycle, Events, Histogram, Tolerance};
pub use method::{count, count_events, CountOptions, Method};

// When the "wasm" feature is enabled, use wasm_bindgen to expose functions to the host environment.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn run_rainflow(stress: &[f64]) -> Result<Vec<f64>, JsValue> {
    let hist = rainflow::rainflow(stress, Tolerance::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    // Ranges first, then the matching weights.
    let (ranges, weights): (Vec<f64>, Vec<f64>) = hist.bins().iter().copied().unzip();
    Ok(ranges.into_iter().chain(weights).collect())
}
