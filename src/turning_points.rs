//! Sequence filters applied ahead of every counting method: reduction to
//! turning points and the hysteresis gate.
use crate::error::{require_len, CountResult, CountingError};

/// Reduces `series` to its peaks and valleys.
///
/// Each interior point is compared against the last kept value on its left
/// and its raw right neighbour, so a plateau collapses to a single extremum.
/// With `keep_ends` the first and last points are kept whether or not they
/// are extreme.
///
/// # Errors
///
/// `InvalidInput` when fewer than 2 points are given with `keep_ends`, or
/// fewer than 3 without.
///
/// # Examples
///
/// ```
/// use fatigue_cycles::turning_points::turning_points;
///
/// let tp = turning_points(&[0.0, 1.0, 2.0, 2.0, 1.0, 3.0], true).unwrap();
/// assert_eq!(tp, vec![0.0, 2.0, 1.0, 3.0]);
/// ```
pub fn turning_points(series: &[f64], keep_ends: bool) -> CountResult<Vec<f64>> {
    require_len(series, if keep_ends { 2 } else { 3 }, "turning point filter")?;

    let n = series.len();
    let mut out = Vec::with_capacity(n);
    if keep_ends {
        out.push(series[0]);
    }

    let mut left = series[0];
    for i in 1..n - 1 {
        let cur = series[i];
        let right = series[i + 1];
        if (left < cur && cur > right) || (left > cur && cur < right) {
            out.push(cur);
            left = cur;
        }
    }

    if keep_ends {
        out.push(series[n - 1]);
    }
    Ok(out)
}

/// Drops excursions smaller than `gate`.
///
/// An excursion of exactly `gate` survives. The last point of the series is
/// kept unless it repeats the current anchor value. A point equal to the
/// anchor met while walking inside the gate is absorbed, not a breakout.
pub fn hysteresis_gate(series: &[f64], gate: f64) -> CountResult<Vec<f64>> {
    if !(gate.is_finite() && gate > 0.0) {
        return Err(CountingError::invalid(format!(
            "gate size must be a positive number, got {}",
            gate
        )));
    }
    require_len(series, 2, "hysteresis gate")?;

    let n = series.len();
    let mut out = Vec::with_capacity(n);
    let mut cur = series[0];
    out.push(cur);

    let mut i = 1;
    while i < n {
        // Equal to the anchor: zero amplitude, skip it.
        if series[i] == cur {
            i += 1;
            continue;
        }

        let rising = series[i] > cur;
        let inside = |v: f64| {
            if rising {
                v >= cur && v < cur + gate
            } else {
                v <= cur && v > cur - gate
            }
        };

        let mut j = i;
        while j < n - 1 && inside(series[j]) {
            j += 1;
        }

        cur = series[j];
        out.push(cur);
        i = j + 1;
    }
    Ok(out)
}
