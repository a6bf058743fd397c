//! Extremum search counters: Johannesson min-max and Rychlik top-up crossing.
//!
//! Both walk the turning points peak by peak and look for the lowest value
//! reachable before the history climbs back to the peak level. Johannesson
//! only looks backwards; Rychlik looks both ways and keeps the higher of the
//! two minima.
use crate::error::{require_len, CountResult};
use crate::histogram::{Cycle, Histogram, Tolerance};
use crate::turning_points::turning_points;

/// Decimal digits kept for top-up crossing heights.
pub const TUC_DIGITS: u32 = 7;

fn interior_peaks(tp: &[f64]) -> impl Iterator<Item = usize> + '_ {
    (1..tp.len().saturating_sub(1)).filter(move |&i| tp[i] > tp[i - 1] && tp[i] > tp[i + 1])
}

/// Minimum to the left of peak `i`, scanning while values stay below it.
fn backward_min(tp: &[f64], i: usize) -> f64 {
    let peak = tp[i];
    tp[..i - 1]
        .iter()
        .rev()
        .take_while(|&&v| v < peak)
        .fold(tp[i - 1], |min, &v| min.min(v))
}

/// Minimum to the right of peak `i`, scanning while values stay below it.
fn forward_min(tp: &[f64], i: usize) -> f64 {
    let peak = tp[i];
    tp[i + 2..]
        .iter()
        .take_while(|&&v| v < peak)
        .fold(tp[i + 1], |min, &v| min.min(v))
}

/// `(minimum, peak)` cycles for every interior peak.
pub fn johannesson_cycles(series: &[f64]) -> CountResult<Vec<Cycle>> {
    require_len(series, 3, "min-max counting")?;
    let tp = turning_points(series, true)?;
    Ok(interior_peaks(&tp)
        .map(|i| Cycle::full(backward_min(&tp, i), tp[i]))
        .collect())
}

pub fn johannesson(series: &[f64], tolerance: Tolerance) -> CountResult<Histogram> {
    let cycles = johannesson_cycles(series)?;
    Ok(Histogram::from_cycles(&cycles, tolerance))
}

/// Top-up crossing cycles: each interior peak against the higher of its
/// backward and forward minima.
pub fn rychlik_cycles(series: &[f64]) -> CountResult<Vec<Cycle>> {
    require_len(series, 3, "top-up crossing counting")?;
    let tp = turning_points(series, true)?;
    Ok(interior_peaks(&tp)
        .map(|i| {
            let base = backward_min(&tp, i).max(forward_min(&tp, i));
            Cycle::full(base, tp[i])
        })
        .collect())
}

/// Top-up crossing heights rounded to [`TUC_DIGITS`].
pub fn rychlik(series: &[f64]) -> CountResult<Histogram> {
    let cycles = rychlik_cycles(series)?;
    Ok(Histogram::from_cycles(&cycles, Tolerance { digits: TUC_DIGITS }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASTM: [f64; 9] = [-2.0, 1.0, -3.0, 5.0, -1.0, 3.0, -4.0, 4.0, -2.0];

    #[test]
    fn test_johannesson_scans_left_only() {
        let cycles = johannesson_cycles(&ASTM).unwrap();
        assert_eq!(
            cycles,
            vec![
                Cycle::full(-2.0, 1.0),
                Cycle::full(-3.0, 5.0),
                Cycle::full(-1.0, 3.0),
                Cycle::full(-4.0, 4.0),
            ]
        );
        let hist = johannesson(&ASTM, Tolerance::default()).unwrap();
        assert_eq!(hist.bins(), &[(3.0, 1.0), (4.0, 1.0), (8.0, 2.0)]);
    }

    #[test]
    fn test_rychlik_uses_higher_minimum() {
        let cycles = rychlik_cycles(&ASTM).unwrap();
        assert_eq!(
            cycles,
            vec![
                Cycle::full(-2.0, 1.0),
                Cycle::full(-3.0, 5.0),
                Cycle::full(-1.0, 3.0),
                Cycle::full(-2.0, 4.0),
            ]
        );
        let hist = rychlik(&ASTM).unwrap();
        assert_eq!(hist.bins(), &[(3.0, 1.0), (4.0, 1.0), (6.0, 1.0), (8.0, 1.0)]);
    }

    #[test]
    fn test_rychlik_rounds_heights() {
        let hist = rychlik(&[0.0, 0.30000000004, 0.0]).unwrap();
        assert_eq!(hist.bins(), &[(0.3, 1.0)]);
    }

    #[test]
    fn test_no_interior_peak() {
        assert!(johannesson_cycles(&[0.0, -1.0, 2.0]).unwrap().is_empty());
        assert!(rychlik_cycles(&[0.0, 1.0]).is_err());
    }
}
