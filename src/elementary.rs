//! Level crossing, peak and simple range counting (ASTM E1049-85 §5.1.1,
//! §5.2.1 and §5.3.1). None of these keep state between intervals.
use crate::error::{require_len, CountResult, CountingError};
use crate::histogram::{Histogram, Tolerance};
use crate::turning_points::turning_points;

/// Upper bound on the default integer level set.
pub const MAX_DEFAULT_LEVELS: u64 = 1_000_000;

/// Integer levels spanning the series, or the caller's levels sorted and
/// de-duplicated.
fn level_set(series: &[f64], levels: Option<&[f64]>) -> CountResult<Vec<f64>> {
    if let Some(levels) = levels {
        if levels.is_empty() {
            return Err(CountingError::invalid("level set must not be empty"));
        }
        if let Some(bad) = levels.iter().find(|l| !l.is_finite()) {
            return Err(CountingError::invalid(format!("level must be finite, got {}", bad)));
        }
        let mut sorted = levels.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted.dedup();
        return Ok(sorted);
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min).floor();
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max).ceil();
    let span = max - min;
    if !(span <= MAX_DEFAULT_LEVELS as f64) {
        return Err(CountingError::invalid(format!(
            "series spans {} integer levels, more than {}; supply a level set",
            span, MAX_DEFAULT_LEVELS
        )));
    }

    // Above 2^53 neighbouring integers collapse onto one f64.
    let mut out: Vec<f64> = (0..=span as u64).map(|k| min + k as f64).collect();
    out.dedup();
    Ok(out)
}

/// Every level crossing in the order encountered.
///
/// Rising intervals count levels at or above `ref_level`, falling intervals
/// count levels below it. A level sitting on an interval's lower bound is only
/// counted on the first interval.
pub fn level_crossings(series: &[f64], ref_level: f64, levels: Option<&[f64]>) -> CountResult<Vec<f64>> {
    let tp = turning_points(series, true)?;
    let levels = level_set(series, levels)?;

    let mut crossings = Vec::new();
    for (k, pair) in tp.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            continue;
        }
        let rising = b > a;
        let (lower, upper) = if rising { (a, b) } else { (b, a) };

        let lo = if k == 0 {
            levels.partition_point(|&l| l < lower)
        } else {
            levels.partition_point(|&l| l <= lower)
        };
        let hi = levels.partition_point(|&l| l <= upper);
        if lo >= hi {
            continue;
        }

        crossings.extend(
            levels[lo..hi]
                .iter()
                .copied()
                .filter(|&l| if rising { l >= ref_level } else { l < ref_level }),
        );
    }
    Ok(crossings)
}

/// Level crossings binned by level.
pub fn level_crossing_histogram(series: &[f64], ref_level: f64, levels: Option<&[f64]>) -> CountResult<Histogram> {
    Ok(Histogram::from_values(&level_crossings(series, ref_level, levels)?))
}

/// Peaks at or above `ref_level` and valleys below it. The two end points
/// never count.
pub fn peaks(series: &[f64], ref_level: f64) -> CountResult<Vec<f64>> {
    require_len(series, 3, "peak counting")?;
    let tp = turning_points(series, true)?;

    Ok(tp
        .windows(3)
        .filter_map(|w| {
            let (l, c, r) = (w[0], w[1], w[2]);
            let peak = c > l && c > r && c >= ref_level;
            let valley = c < l && c < r && c < ref_level;
            (peak || valley).then_some(c)
        })
        .collect())
}

pub fn peak_histogram(series: &[f64], ref_level: f64) -> CountResult<Histogram> {
    Ok(Histogram::from_values(&peaks(series, ref_level)?))
}

/// Range between every pair of consecutive turning points.
pub fn simple_ranges(series: &[f64]) -> CountResult<Vec<f64>> {
    let tp = turning_points(series, true)?;
    Ok(tp.windows(2).map(|w| (w[1] - w[0]).abs()).collect())
}

/// Simple ranges as half cycles, so a rise and its fall add up to one.
pub fn simple_range_histogram(series: &[f64], tolerance: Tolerance) -> CountResult<Histogram> {
    let ranges = simple_ranges(series)?;
    Ok(Histogram::from_weighted(
        ranges.into_iter().map(|r| (tolerance.round(r), 0.5)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASTM_LEVEL: [f64; 17] = [
        -0.8, 1.3, 0.7, 3.4, 0.7, 2.5, -1.4, -0.5, -2.3, -2.2, -2.6, -2.4, -3.3, 1.5, 0.6, 3.4, -0.5,
    ];

    #[test]
    fn test_level_crossing_astm() {
        let hist = level_crossing_histogram(&ASTM_LEVEL, 0.0, None).unwrap();
        assert_eq!(
            hist.bins(),
            &[(-3.0, 1.0), (-2.0, 1.0), (-1.0, 2.0), (0.0, 2.0), (1.0, 5.0), (2.0, 3.0), (3.0, 2.0)]
        );
    }

    #[test]
    fn test_level_crossing_keys_from_supplied_levels() {
        let levels = [2.0, -1.0, 1.0, 2.0];
        let hist = level_crossing_histogram(&ASTM_LEVEL, 0.0, Some(&levels)).unwrap();
        let keys: Vec<f64> = hist.keys().collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert!(keys.iter().all(|k| levels.contains(k)));
        assert_eq!(hist.get(1.0), Some(5.0));
    }

    #[test]
    fn test_level_crossing_degenerate_descent() {
        let hist = level_crossing_histogram(&[2.0, 0.0], 0.0, None).unwrap();
        assert!(hist.is_empty());
        assert_eq!(serde_json::to_string(&hist).unwrap(), "[[]]");
    }

    #[test]
    fn test_level_on_first_lower_bound() {
        // level 0 touched at the start of the first interval counts
        let crossings = level_crossings(&[0.0, 2.0, 0.0, 2.0], 0.0, None).unwrap();
        assert_eq!(crossings, vec![0.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_default_levels_at_large_magnitude() {
        let crossings = level_crossings(&[1e16, 1e16 + 4.0, 1e16], 0.0, None).unwrap();
        assert!(!crossings.is_empty());
        assert!(crossings.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_levels_span_limit() {
        assert!(level_crossings(&[-1e12, 1e12, -1e12], 0.0, None).is_err());
        let levels = [-1.0, 0.0, 1.0];
        assert!(level_crossings(&[-1e12, 1e12, -1e12], 0.0, Some(&levels)).is_ok());
    }

    #[test]
    fn test_level_set_rejects_empty() {
        assert!(level_crossings(&[0.0, 1.0], 0.0, Some(&[])).is_err());
    }

    #[test]
    fn test_peaks() {
        let found = peaks(&[0.0, 2.0, -1.0, 1.0, 0.5, 3.0, -2.0], 0.0).unwrap();
        assert_eq!(found, vec![2.0, -1.0, 1.0, 3.0]);
        assert!(peaks(&[0.0, 1.0], 0.0).is_err());
    }

    #[test]
    fn test_simple_ranges() {
        let ranges = simple_ranges(&[-2.0, 1.0, -3.0, 5.0]).unwrap();
        assert_eq!(ranges, vec![3.0, 4.0, 8.0]);
        let hist = simple_range_histogram(&[0.0, 2.0, 0.0], Tolerance::default()).unwrap();
        assert_eq!(hist.bins(), &[(2.0, 1.0)]);
    }
}
