//! Range-pair counting (ASTM E1049-85 §5.4.3) and rainflow for repeating
//! histories, which rotates the history and hands it to the range-pair pass.
use crate::error::{require_len, CountResult, CountingError};
use crate::histogram::{Cycle, Histogram, Tolerance};
use crate::turning_points::turning_points;

/// One directional sweep over `values`.
///
/// Points live in an arena with predecessor links. Whenever the range ending
/// at `pred(i)` is no larger than the following one, the pair
/// `(pred(pred(i)), pred(i))` is matched and spliced out, and `i` is tested
/// again against its new predecessors.
///
/// Returns the matched index pairs and the surviving indices in order.
fn splice_pass(values: &[f64]) -> (Vec<(usize, usize)>, Vec<usize>) {
    let n = values.len();
    let mut pred: Vec<Option<usize>> = (0..n).map(|i| i.checked_sub(1)).collect();
    let mut removed = vec![false; n];
    let mut pairs = Vec::new();

    let mut i = 2;
    while i < n {
        let Some(second) = pred[i] else {
            i += 1;
            continue;
        };
        let Some(first) = pred[second] else {
            i += 1;
            continue;
        };

        let left = (values[first] - values[second]).abs();
        let right = (values[second] - values[i]).abs();
        if left <= right {
            pairs.push((first, second));
            removed[first] = true;
            removed[second] = true;
            pred[i] = pred[first];
        } else {
            i += 1;
        }
    }

    let survivors = (0..n).filter(|&k| !removed[k]).collect();
    (pairs, survivors)
}

/// Range pairs of an already filtered turning point sequence.
fn pair_cycles(tp: &[f64]) -> Vec<Cycle> {
    let (forward, survivors) = splice_pass(tp);
    let mut cycles: Vec<Cycle> = forward
        .into_iter()
        .map(|(first, second)| Cycle::full(tp[first], tp[second]))
        .collect();

    // The right-to-left sweep is the same sweep over the reversed residue.
    let reversed: Vec<f64> = survivors.iter().rev().map(|&k| tp[k]).collect();
    let (backward, residue) = splice_pass(&reversed);
    cycles.extend(
        backward
            .into_iter()
            .map(|(first, second)| Cycle::full(reversed[second], reversed[first])),
    );

    // An odd number of intervals leaves one unmatched; count it as a half.
    let residue: Vec<f64> = residue.iter().rev().map(|&k| reversed[k]).collect();
    cycles.extend(residue.windows(2).map(|w| Cycle::half(w[0], w[1])));
    cycles
}

/// Matched range pairs as `(start, end)` cycles.
pub fn range_pair_cycles(series: &[f64]) -> CountResult<Vec<Cycle>> {
    require_len(series, 2, "range-pair counting")?;
    let tp = turning_points(series, true)?;
    Ok(pair_cycles(&tp))
}

/// Range-pair counts keyed by range rounded to `tolerance`.
pub fn range_pair(series: &[f64], tolerance: Tolerance) -> CountResult<Histogram> {
    let cycles = range_pair_cycles(series)?;
    Ok(Histogram::from_cycles(&cycles, tolerance))
}

/// Range pairs of a history that repeats end to end.
///
/// The turning points are rotated so the global maximum sits on both ends,
/// then filtered again because the old seam may now lie inside a monotonic
/// run.
///
/// # Errors
///
/// `InvalidInput` unless the first and last points are equal.
pub fn repeat_history_cycles(series: &[f64]) -> CountResult<Vec<Cycle>> {
    require_len(series, 2, "repeat-history rainflow")?;
    let (first, last) = (series[0], series[series.len() - 1]);
    if first != last {
        return Err(CountingError::invalid(format!(
            "repeating history must start and end on the same value, got {} and {}",
            first, last
        )));
    }

    let tp = turning_points(series, true)?;
    let imax = tp
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0;

    let tp = if imax == 0 || imax == tp.len() - 1 {
        tp
    } else {
        let mut rotated = Vec::with_capacity(tp.len());
        rotated.extend_from_slice(&tp[imax..]);
        rotated.extend_from_slice(&tp[1..=imax]);
        turning_points(&rotated, true)?
    };
    Ok(pair_cycles(&tp))
}

pub fn repeat_history(series: &[f64], tolerance: Tolerance) -> CountResult<Histogram> {
    let cycles = repeat_history_cycles(series)?;
    Ok(Histogram::from_cycles(&cycles, tolerance))
}
