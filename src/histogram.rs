//! Counting results: cycles, raw event lists and sorted histograms.
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CountResult, CountingError};

/// Rounding applied to histogram keys before equal keys are merged.
///
/// The value is handed to every aggregating call explicitly, so concurrent
/// analyses may share one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Number of decimal digits kept.
    #[serde(default = "Tolerance::default_digits")]
    pub digits: u32,
}

impl Tolerance {
    /// Largest digit count that still leaves room in an `f64` mantissa.
    pub const MAX_DIGITS: u32 = 15;

    pub fn new(digits: u32) -> CountResult<Self> {
        let tolerance = Tolerance { digits };
        tolerance.validate()?;
        Ok(tolerance)
    }

    fn default_digits() -> u32 {
        8
    }

    pub fn validate(&self) -> CountResult<()> {
        if self.digits > Self::MAX_DIGITS {
            return Err(CountingError::invalid(format!(
                "tolerance digits must be at most {}, got {}",
                Self::MAX_DIGITS,
                self.digits
            )));
        }
        Ok(())
    }

    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.digits)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            digits: Self::default_digits(),
        }
    }
}

/// Rounds half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// One extracted excursion. A full cycle has weight 1.0, a half cycle 0.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub start: f64,
    pub end: f64,
    pub weight: f64,
}

impl Cycle {
    pub fn full(start: f64, end: f64) -> Self {
        Cycle { start, end, weight: 1.0 }
    }

    pub fn half(start: f64, end: f64) -> Self {
        Cycle { start, end, weight: 0.5 }
    }

    pub fn range(&self) -> f64 {
        (self.end - self.start).abs()
    }

    pub fn mean(&self) -> f64 {
        (self.end + self.start) / 2.0
    }
}

/// Unaggregated output of a counting pass, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Events {
    /// Levels, peaks or ranges from the elementary counters.
    Values(Vec<f64>),
    /// Start/end/weight triples from the rainflow family.
    Cycles(Vec<Cycle>),
}

impl Events {
    pub fn len(&self) -> usize {
        match self {
            Events::Values(values) => values.len(),
            Events::Cycles(cycles) => cycles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sorted `(key, weight)` bins with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    bins: Vec<(f64, f64)>,
}

impl Histogram {
    /// Sums the weights of equal keys and sorts ascending.
    pub fn from_weighted<I>(events: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut raw: Vec<(f64, f64)> = events.into_iter().collect();
        raw.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut bins: Vec<(f64, f64)> = Vec::with_capacity(raw.len());
        for (key, weight) in raw {
            match bins.last_mut() {
                Some(last) if last.0 == key => last.1 += weight,
                _ => bins.push((key, weight)),
            }
        }
        Histogram { bins }
    }

    /// Counts every value once.
    pub fn from_values(values: &[f64]) -> Self {
        Self::from_weighted(values.iter().map(|&v| (v, 1.0)))
    }

    /// Bins cycles by their range rounded to `tolerance`.
    pub fn from_cycles(cycles: &[Cycle], tolerance: Tolerance) -> Self {
        Self::from_weighted(
            cycles
                .iter()
                .map(|c| (tolerance.round(c.range()), c.weight)),
        )
    }

    pub fn bins(&self) -> &[(f64, f64)] {
        &self.bins
    }

    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.bins.iter().map(|b| b.0)
    }

    pub fn get(&self, key: f64) -> Option<f64> {
        self.bins
            .binary_search_by(|b| b.0.total_cmp(&key))
            .ok()
            .map(|i| self.bins[i].1)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.bins.iter().map(|b| b.1).sum()
    }

    /// Re-bins through the [`Aggregator`].
    pub fn rebin(&self, bin_size: f64) -> CountResult<Histogram> {
        Aggregator::bin(&self.bins, bin_size)
    }
}

/// Serialises as `[[key, weight], ...]`, or `[[]]` when nothing was counted.
impl Serialize for Histogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.bins.is_empty() {
            let empty: [[f64; 0]; 1] = [[]];
            return empty.serialize(serializer);
        }
        serializer.collect_seq(self.bins.iter().map(|&(k, w)| [k, w]))
    }
}

/// Snaps event keys onto a regular grid.
pub struct Aggregator;

impl Aggregator {
    /// Moves each key to the nearest multiple of `bin_size`; a key exactly
    /// halfway between two bins goes to the upper one.
    pub fn bin(events: &[(f64, f64)], bin_size: f64) -> CountResult<Histogram> {
        if !(bin_size.is_finite() && bin_size > 0.0) {
            return Err(CountingError::invalid(format!(
                "bin size must be a positive number, got {}",
                bin_size
            )));
        }
        Ok(Histogram::from_weighted(events.iter().map(|&(key, weight)| {
            ((key / bin_size + 0.5).floor() * bin_size, weight)
        })))
    }
}
