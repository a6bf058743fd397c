//! ASTM E1049-85 §5.4.4 rainflow counting with the three point stack.
use std::collections::VecDeque;

use crate::error::{require_len, CountResult};
use crate::histogram::{Cycle, Histogram, Tolerance};
use crate::turning_points::turning_points;

/// Extracts rainflow cycles in emission order.
///
/// Points are read three at a time from the front of `main`. Points that
/// cannot close a range yet are parked on `pending` and go back to the front
/// of `main` whenever a full cycle is removed. Whatever is left at the end is
/// emitted pairwise as half cycles.
pub fn rainflow_cycles(series: &[f64]) -> CountResult<Vec<Cycle>> {
    require_len(series, 2, "rainflow counting")?;
    let tp = turning_points(series, true)?;

    let mut main: VecDeque<f64> = tp.into_iter().collect();
    let mut pending: Vec<f64> = Vec::with_capacity(main.len());
    let mut cycles = Vec::with_capacity(main.len());

    // Some(_) while a range starting at S is open.
    let mut start: Option<f64> = None;
    let mut range_contains_start = false;

    while main.len() >= 3 {
        let (Some(a), Some(b), Some(c)) = (main.pop_front(), main.pop_front(), main.pop_front()) else {
            break;
        };
        let y = (a - b).abs();
        let x = (b - c).abs();

        if start.is_none() {
            start = Some(a);
            range_contains_start = true;
        }

        if x >= y {
            if range_contains_start {
                cycles.push(Cycle::half(a, b));
                main.push_front(c);
                main.push_front(b);
            } else {
                cycles.push(Cycle::full(a, b));
                main.push_front(c);
                while let Some(p) = pending.pop() {
                    main.push_front(p);
                }
            }
            start = None;
        } else {
            pending.push(a);
            range_contains_start = false;
            main.push_front(c);
            main.push_front(b);
        }
    }

    while let Some(p) = pending.pop() {
        main.push_front(p);
    }
    let residue: Vec<f64> = main.into_iter().collect();
    cycles.extend(residue.windows(2).map(|w| Cycle::half(w[0], w[1])));

    Ok(cycles)
}

/// Rainflow ranges rounded to `tolerance`, weights summed per range.
///
/// # Examples
///
/// ```
/// use fatigue_cycles::histogram::Tolerance;
/// use fatigue_cycles::rainflow::rainflow;
///
/// let series = [-2.0, 1.0, -3.0, 5.0, -1.0, 3.0, -4.0, 4.0, -2.0];
/// let hist = rainflow(&series, Tolerance::default()).unwrap();
/// assert_eq!(hist.bins(), &[(3.0, 0.5), (4.0, 1.5), (6.0, 0.5), (8.0, 1.0), (9.0, 0.5)]);
/// ```
pub fn rainflow(series: &[f64], tolerance: Tolerance) -> CountResult<Histogram> {
    let cycles = rainflow_cycles(series)?;
    Ok(Histogram::from_cycles(&cycles, tolerance))
}
