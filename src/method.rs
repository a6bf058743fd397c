//! Selects a counting method by name and runs it in aggregated or raw mode.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::elementary;
use crate::error::CountResult;
use crate::extremum;
use crate::four_point;
use crate::histogram::{Events, Histogram, Tolerance};
use crate::rainflow;
use crate::range_pair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    LevelCrossing,
    Peak,
    SimpleRange,
    Rainflow,
    RangePair,
    RepeatHistory,
    FourPoint,
    Johannesson,
    Rychlik,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::LevelCrossing,
        Method::Peak,
        Method::SimpleRange,
        Method::Rainflow,
        Method::RangePair,
        Method::RepeatHistory,
        Method::FourPoint,
        Method::Johannesson,
        Method::Rychlik,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::LevelCrossing => "level_crossing",
            Method::Peak => "peak",
            Method::SimpleRange => "simple_range",
            Method::Rainflow => "rainflow",
            Method::RangePair => "range_pair",
            Method::RepeatHistory => "repeat_history",
            Method::FourPoint => "four_point",
            Method::Johannesson => "johannesson",
            Method::Rychlik => "rychlik",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parameters shared by all methods. Each method reads only what it needs.
#[derive(Debug, Clone, Default)]
pub struct CountOptions {
    /// Reference level for level crossing and peak counting.
    pub ref_level: f64,
    /// Explicit level set for level crossing.
    pub levels: Option<Vec<f64>>,
    /// Key rounding; top-up crossing always uses 7 digits.
    pub tolerance: Tolerance,
}

/// Runs `method` and bins the result.
pub fn count(method: Method, series: &[f64], options: &CountOptions) -> CountResult<Histogram> {
    options.tolerance.validate()?;
    let levels = options.levels.as_deref();
    let tol = options.tolerance;

    let hist = match method {
        Method::LevelCrossing => elementary::level_crossing_histogram(series, options.ref_level, levels)?,
        Method::Peak => elementary::peak_histogram(series, options.ref_level)?,
        Method::SimpleRange => elementary::simple_range_histogram(series, tol)?,
        Method::Rainflow => rainflow::rainflow(series, tol)?,
        Method::RangePair => range_pair::range_pair(series, tol)?,
        Method::RepeatHistory => range_pair::repeat_history(series, tol)?,
        Method::FourPoint => four_point::four_point(series, tol)?,
        Method::Johannesson => extremum::johannesson(series, tol)?,
        Method::Rychlik => extremum::rychlik(series)?,
    };
    debug!(method = %method, points = series.len(), bins = hist.len(), "counted");
    Ok(hist)
}

/// Runs `method` and returns its events unbinned, in emission order.
pub fn count_events(method: Method, series: &[f64], options: &CountOptions) -> CountResult<Events> {
    let levels = options.levels.as_deref();

    let events = match method {
        Method::LevelCrossing => Events::Values(elementary::level_crossings(series, options.ref_level, levels)?),
        Method::Peak => Events::Values(elementary::peaks(series, options.ref_level)?),
        Method::SimpleRange => Events::Values(elementary::simple_ranges(series)?),
        Method::Rainflow => Events::Cycles(rainflow::rainflow_cycles(series)?),
        Method::RangePair => Events::Cycles(range_pair::range_pair_cycles(series)?),
        Method::RepeatHistory => Events::Cycles(range_pair::repeat_history_cycles(series)?),
        Method::FourPoint => Events::Cycles(four_point::four_point_cycles(series)?),
        Method::Johannesson => Events::Cycles(extremum::johannesson_cycles(series)?),
        Method::Rychlik => Events::Cycles(extremum::rychlik_cycles(series)?),
    };
    debug!(method = %method, points = series.len(), events = events.len(), "extracted events");
    Ok(events)
}
