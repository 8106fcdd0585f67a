//! Shared contracts for the appliance scheduling engine.

use std::error::Error;
use std::fmt;

use rand::{Rng, rngs::StdRng};

use crate::calendar::{DAYS_OF_WEEK, QUARTERS_OF_DAY};

/// Occupancy oracle consumed by the scheduling engine.
///
/// The engine only ever asks two questions of the household's presence
/// model: is anyone home at a given quarter-hour slot, and how many
/// members does the household have. Presence simulation itself lives
/// outside this crate.
///
/// Queries are total over `day < 7`, `quarter < 96`; out-of-range
/// arguments are a programming error and implementations are expected to
/// panic rather than guess.
pub trait Occupancy {
    /// Returns `true` when nobody is home at `(day, quarter)`.
    fn is_empty(&self, day: usize, quarter: usize) -> bool;

    /// Number of household members.
    fn members(&self) -> usize;
}

/// Grid-backed [`Occupancy`] carrier: one occupied flag per quarter-hour
/// slot of the week.
///
/// This is a data holder, not a presence simulator — the grid is supplied
/// by the caller (or by one of the canned constructors used by the binary
/// and the tests).
#[derive(Debug, Clone)]
pub struct PresenceGrid {
    occupied: [[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
    members: usize,
}

impl PresenceGrid {
    /// Creates a presence grid from explicit occupied flags.
    ///
    /// # Panics
    ///
    /// Panics if `members` is zero.
    pub fn new(occupied: [[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK], members: usize) -> Self {
        assert!(members > 0, "household must have at least one member");
        Self { occupied, members }
    }

    /// Household that is home around the clock.
    pub fn always_home(members: usize) -> Self {
        Self::new([[true; QUARTERS_OF_DAY]; DAYS_OF_WEEK], members)
    }

    /// Household that is never home.
    pub fn always_away(members: usize) -> Self {
        Self::new([[false; QUARTERS_OF_DAY]; DAYS_OF_WEEK], members)
    }

    /// Typical commuter pattern: away 08:00–17:00 on workdays, home
    /// otherwise and all weekend.
    pub fn workweek(members: usize) -> Self {
        let mut grid = Self::always_home(members);
        for day in 0..5 {
            grid.set_away(day, 32, 68);
        }
        grid
    }

    /// Marks `[from, to)` quarters of `day` as unoccupied.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the day.
    pub fn set_away(&mut self, day: usize, from: usize, to: usize) {
        assert!(to <= QUARTERS_OF_DAY && from <= to, "away range out of bounds");
        for q in from..to {
            self.occupied[day][q] = false;
        }
    }

    /// Marks `[from, to)` quarters of `day` as occupied.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the day.
    pub fn set_home(&mut self, day: usize, from: usize, to: usize) {
        assert!(to <= QUARTERS_OF_DAY && from <= to, "home range out of bounds");
        for q in from..to {
            self.occupied[day][q] = true;
        }
    }
}

impl Occupancy for PresenceGrid {
    fn is_empty(&self, day: usize, quarter: usize) -> bool {
        !self.occupied[day][quarter]
    }

    fn members(&self) -> usize {
        self.members
    }
}

/// Fatal scheduling failure.
///
/// Every variant is a configuration error in disguise: the engine is
/// deterministic given its oracles and random source, so there is nothing
/// to retry against. Callers surface these and drop the appliance's
/// output for the week.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// The possibility mask has no feasible slot anywhere in the week,
    /// so the configured activation count can never be met.
    NoFeasibleSlots { appliance: String },
    /// Bounded resampling ran out of retries before placing all
    /// activation tickets on feasible slots.
    SamplingExhausted {
        appliance: String,
        placed: usize,
        target: usize,
    },
    /// The hourly feasibility matrix left no usable start hour for a
    /// shiftable block.
    NoFeasibleHours { appliance: String, day: usize },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::NoFeasibleSlots { appliance } => {
                write!(f, "{appliance}: no feasible slot in the whole week")
            }
            ScheduleError::SamplingExhausted {
                appliance,
                placed,
                target,
            } => write!(
                f,
                "{appliance}: placed {placed} of {target} activations before exhausting retries"
            ),
            ScheduleError::NoFeasibleHours { appliance, day } => {
                write!(f, "{appliance}: no feasible shifting hour on day {day}")
            }
        }
    }
}

impl Error for ScheduleError {}

/// Draws from a Gaussian with the given mean and standard deviation
/// using the Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `mean` - Distribution mean
/// * `std_dev` - Standard deviation; zero or negative returns `mean`
pub fn gaussian(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z0 * std_dev
}
