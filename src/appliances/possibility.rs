//! Possibility vector builder: when is an appliance allowed to run.

use crate::appliances::types::Occupancy;
use crate::calendar::{DAYS_OF_WEEK, QUARTERS_OF_DAY};

/// Occupancy gating rule of an appliance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PossibilityRule {
    /// No gating; every slot is feasible.
    Anytime,
    /// Feasible only while somebody is home.
    WhileOccupied,
    /// Feasible only where a full `len`-slot block starting at the slot
    /// is unoccupied. A block that would run past the end of the day is
    /// treated as feasible so the day boundary cannot deadlock.
    UnoccupiedBlock { len: usize },
}

/// Builds one day's feasibility mask.
pub fn daily(
    rule: PossibilityRule,
    day: usize,
    occupancy: &dyn Occupancy,
) -> [bool; QUARTERS_OF_DAY] {
    let mut mask = [false; QUARTERS_OF_DAY];
    match rule {
        PossibilityRule::Anytime => mask = [true; QUARTERS_OF_DAY],
        PossibilityRule::WhileOccupied => {
            for (q, slot) in mask.iter_mut().enumerate() {
                *slot = !occupancy.is_empty(day, q);
            }
        }
        PossibilityRule::UnoccupiedBlock { len } => {
            for (q, slot) in mask.iter_mut().enumerate() {
                *slot = if q + len > QUARTERS_OF_DAY {
                    true
                } else {
                    (q..q + len).all(|k| occupancy.is_empty(day, k))
                };
            }
        }
    }
    mask
}

/// Builds the feasibility mask for all seven days.
pub fn weekly(
    rule: PossibilityRule,
    occupancy: &dyn Occupancy,
) -> [[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK] {
    let mut grid = [[false; QUARTERS_OF_DAY]; DAYS_OF_WEEK];
    for (day, mask) in grid.iter_mut().enumerate() {
        *mask = daily(rule, day, occupancy);
    }
    grid
}
