//! Weekly operation selector: weighted stochastic activation placement.

use rand::{Rng, rngs::StdRng};

use crate::appliances::profile::ApplianceProfile;
use crate::appliances::types::ScheduleError;
use crate::calendar::{DAYS_OF_WEEK, QUARTERS_OF_DAY, Season};

/// Upper bound on resampling attempts per activation ticket. A mask
/// sparse enough to exhaust this is a configuration error, not something
/// to keep spinning on.
const MAX_TICKET_RETRIES: usize = 1_000;

/// Selects the (day, slot) combinations the appliance will attempt to
/// run this week.
///
/// Each of the profile's `times` activation tickets first draws a day,
/// weighted by the product of the active season's weight and the day's
/// weekday weight (weights are re-normalized on every call), then draws
/// a slot uniformly within that day. Occupancy-dependent appliances
/// resample tickets that land on infeasible slots instead of dropping
/// them, so the configured weekly activation target is honored.
///
/// # Errors
///
/// * [`ScheduleError::NoFeasibleSlots`] when an occupancy-dependent
///   appliance has no feasible slot anywhere in the week.
/// * [`ScheduleError::SamplingExhausted`] when the bounded retry budget
///   runs out before all tickets are placed.
///
/// # Panics
///
/// Panics if the combined day weights sum to zero; weight tables are
/// validated at configuration time.
pub fn select_weekly(
    name: &str,
    profile: &ApplianceProfile,
    season: Season,
    possibility: &[[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
    rng: &mut StdRng,
) -> Result<[[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK], ScheduleError> {
    let mut weights = [0.0_f64; DAYS_OF_WEEK];
    for (day, w) in weights.iter_mut().enumerate() {
        *w = profile.day_weight(season, day);
    }
    let total: f64 = weights.iter().sum();
    assert!(total > 0.0, "{name}: day weights sum to zero");

    if profile.occupancy_dependent && !possibility.iter().flatten().any(|&p| p) {
        return Err(ScheduleError::NoFeasibleSlots {
            appliance: name.to_string(),
        });
    }

    let mut operation = [[false; QUARTERS_OF_DAY]; DAYS_OF_WEEK];
    for placed in 0..profile.times {
        let mut ok = false;
        for _ in 0..MAX_TICKET_RETRIES {
            let day = weighted_day(&weights, total, rng);
            let quarter = rng.random_range(0..QUARTERS_OF_DAY);
            if profile.occupancy_dependent && !possibility[day][quarter] {
                continue;
            }
            operation[day][quarter] = true;
            ok = true;
            break;
        }
        if !ok {
            return Err(ScheduleError::SamplingExhausted {
                appliance: name.to_string(),
                placed,
                target: profile.times,
            });
        }
    }
    Ok(operation)
}

/// Draws a day index proportionally to `weights`.
fn weighted_day(weights: &[f64; DAYS_OF_WEEK], total: f64, rng: &mut StdRng) -> usize {
    let mut draw = rng.random::<f64>() * total;
    for (day, w) in weights.iter().enumerate() {
        if draw < *w {
            return day;
        }
        draw -= w;
    }
    DAYS_OF_WEEK - 1
}
