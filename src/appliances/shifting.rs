//! Cost-minimizing shifter for deferrable appliance load.

use rand::{Rng, rngs::StdRng};

use crate::appliances::types::ScheduleError;
use crate::calendar::{HOURS_OF_DAY, QUARTERS_OF_DAY, QUARTERS_OF_HOUR};
use crate::tariff::Tariff;

/// Shifting capability of an appliance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftingPolicy {
    /// Load runs where the filler put it; no re-timing.
    None,
    /// The day's single block is relocated to the cheapest feasible
    /// two-hour window (dishwasher class).
    SingleBlock,
    /// Periodic load: the day is split into equal windows and the
    /// cheapest hour is picked independently per window (freezer class).
    WindowedPeriodic { windows: usize },
}

/// Collapses a day's quarter-slot possibility mask to hours.
///
/// An hour is runnable when any of its four quarters is feasible: a
/// feasible quarter marks a legal start within that hour, which is what
/// the whole-hour billing search needs.
pub fn hourly_matrix(possibility: &[bool; QUARTERS_OF_DAY]) -> [bool; HOURS_OF_DAY] {
    let mut hours = [false; HOURS_OF_DAY];
    for (h, hour) in hours.iter_mut().enumerate() {
        *hour = possibility[h * QUARTERS_OF_HOUR..(h + 1) * QUARTERS_OF_HOUR]
            .iter()
            .any(|&p| p);
    }
    hours
}

/// Relocates a single two-hour-equivalent block to the cheapest feasible
/// start hour of the day.
///
/// A start hour is usable when it and the following hour are both
/// runnable. Under a single fixed rate every usable start costs the
/// same, so the choice degenerates to a uniform random draw; under a
/// variable rate the combined charge of the pair is minimized, ties kept
/// on the earlier hour unless a coin flip (`rng > 0.5`) replaces it.
/// The winner's two hours each receive `QUARTERS_OF_HOUR * power`
/// watt-quarter-hours.
///
/// # Errors
///
/// [`ScheduleError::NoFeasibleHours`] when no usable start exists; the
/// possibility masks make this impossible for a well-formed profile, so
/// it is surfaced as a fatal configuration error.
pub fn shift_single_block(
    name: &str,
    tariff: &dyn Tariff,
    now: usize,
    day: usize,
    possibility: &[bool; QUARTERS_OF_DAY],
    power: i32,
    rng: &mut StdRng,
) -> Result<[i64; HOURS_OF_DAY], ScheduleError> {
    let matrix = hourly_matrix(possibility);
    let usable: Vec<usize> = (0..HOURS_OF_DAY - 1)
        .filter(|&h| matrix[h] && matrix[h + 1])
        .collect();
    if usable.is_empty() {
        return Err(ScheduleError::NoFeasibleHours {
            appliance: name.to_string(),
            day,
        });
    }

    let start = if tariff.is_single_fixed_rate() {
        usable[rng.random_range(0..usable.len())]
    } else {
        let mut best = usable[0];
        let mut best_cost = f64::INFINITY;
        for &h in &usable {
            let cost =
                tariff.usage_charge(now + h, 1.0, 0.0) + tariff.usage_charge(now + h + 1, 1.0, 0.0);
            if cost < best_cost || (cost == best_cost && rng.random::<f64>() > 0.5) {
                best_cost = cost;
                best = h;
            }
        }
        best
    };

    let block = QUARTERS_OF_HOUR as i64 * power as i64;
    let mut controllable = [0_i64; HOURS_OF_DAY];
    controllable[start] = block;
    controllable[start + 1] = block;
    Ok(controllable)
}

/// Windowed variant for periodic load: the day is partitioned into
/// `windows` equal spans and the cheapest hour of each span gets that
/// span's consumption, with the same coin-flip tie-break as the
/// single-block search.
///
/// # Panics
///
/// Panics unless `windows` divides the 24-hour day; window counts are
/// validated at configuration time.
pub fn shift_windowed(
    tariff: &dyn Tariff,
    now: usize,
    windows: usize,
    power: i32,
    rng: &mut StdRng,
) -> [i64; HOURS_OF_DAY] {
    assert!(
        windows > 0 && HOURS_OF_DAY % windows == 0,
        "shifting windows must evenly divide the day"
    );
    let interval = HOURS_OF_DAY / windows;
    let mut controllable = [0_i64; HOURS_OF_DAY];

    for w in 0..windows {
        let base = w * interval;
        let mut best = 0;
        let mut best_cost = f64::INFINITY;
        for j in 0..interval {
            let cost = tariff.usage_charge(now + base + j, 1.0, 0.0);
            if cost < best_cost || (cost == best_cost && rng.random::<f64>() > 0.5) {
                best_cost = cost;
                best = j;
            }
        }
        controllable[base + best] = QUARTERS_OF_HOUR as i64 * power as i64;
    }
    controllable
}
