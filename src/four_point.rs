//! Four-point rainflow counting.
use crate::error::{require_len, CountResult};
use crate::histogram::{Cycle, Histogram, Tolerance};
use crate::turning_points::turning_points;

/// Full cycles found by sliding a four point window over the linked turning
/// points.
///
/// A window `(first, second, third, fourth)` closes the inner range
/// `second..third` when both outer ranges are at least as large. The inner
/// pair is unlinked and the scan resumes two links before `first`, the
/// earliest window the new link can belong to. The residue is not counted.
pub fn four_point_cycles(series: &[f64]) -> CountResult<Vec<Cycle>> {
    require_len(series, 4, "four-point rainflow")?;
    let tp = turning_points(series, true)?;
    let n = tp.len();

    let mut next: Vec<Option<usize>> = (0..n).map(|i| (i + 1 < n).then_some(i + 1)).collect();
    let mut prev: Vec<Option<usize>> = (0..n).map(|i| i.checked_sub(1)).collect();
    let mut cycles = Vec::new();

    let mut cursor = Some(0);
    while let Some(first) = cursor {
        let Some(second) = next[first] else { break };
        let Some(third) = next[second] else { break };
        let Some(fourth) = next[third] else { break };

        let z = (tp[first] - tp[second]).abs();
        let y = (tp[second] - tp[third]).abs();
        let x = (tp[third] - tp[fourth]).abs();

        if x >= y && z >= y {
            cycles.push(Cycle::full(tp[second], tp[third]));
            next[first] = Some(fourth);
            prev[fourth] = Some(first);
            cursor = Some(prev[first].map_or(first, |p| prev[p].unwrap_or(p)));
        } else {
            cursor = Some(second);
        }
    }
    Ok(cycles)
}

pub fn four_point(series: &[f64], tolerance: Tolerance) -> CountResult<Histogram> {
    let cycles = four_point_cycles(series)?;
    Ok(Histogram::from_cycles(&cycles, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Restarts from the head after every match.
    fn restart_from_head(series: &[f64]) -> Vec<Cycle> {
        let mut tp = turning_points(series, true).unwrap();
        let mut cycles = Vec::new();
        'scan: loop {
            for k in 0..tp.len().saturating_sub(3) {
                let z = (tp[k] - tp[k + 1]).abs();
                let y = (tp[k + 1] - tp[k + 2]).abs();
                let x = (tp[k + 2] - tp[k + 3]).abs();
                if x >= y && z >= y {
                    cycles.push(Cycle::full(tp[k + 1], tp[k + 2]));
                    tp.drain(k + 1..k + 3);
                    continue 'scan;
                }
            }
            return cycles;
        }
    }

    #[test]
    fn test_four_point_reference() {
        let series = [2.0, -1.0, 3.0, -5.0, 1.0, -3.0, 4.0, -4.0, 2.0];
        let cycles = four_point_cycles(&series).unwrap();
        assert_eq!(cycles, vec![Cycle::full(1.0, -3.0)]);
        let hist = four_point(&series, Tolerance::default()).unwrap();
        assert_eq!(hist.bins(), &[(4.0, 1.0)]);
    }

    #[test]
    fn test_four_point_matches_head_restart() {
        let histories: [&[f64]; 4] = [
            &[0.0, 10.0, 2.0, 8.0, 4.0, 6.0, 5.0, 9.0, -1.0, 7.0, 1.0],
            &[-2.0, 1.0, -3.0, 5.0, -1.0, 3.0, -4.0, 4.0, -2.0],
            &[0.0, 3.0, 1.0, 4.0, -2.0, 2.5, 0.5, 5.0, -3.0, 1.0, -1.0, 2.0, 0.0],
            &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0],
        ];
        for series in histories {
            assert_eq!(four_point_cycles(series).unwrap(), restart_from_head(series));
        }
    }

    #[test]
    fn test_four_point_too_short() {
        assert!(four_point_cycles(&[0.0, 1.0, 0.0]).is_err());
    }
}
