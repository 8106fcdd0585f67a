//! Daily load filler: turns selected operations into power/time curves.

use crate::appliances::types::Occupancy;
use crate::calendar::QUARTERS_OF_DAY;

/// Duty-cycle policy of an appliance class.
///
/// The closed set of ways an activation turns into consumption. Dispatch
/// is by matching on the tag; there is no per-appliance subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyCycle {
    /// Runs at full power while somebody is home, catching up runtime
    /// lost to short absences (entertainment class).
    PulseWhileOccupied,
    /// Runs one contiguous full-power block per day in a window the
    /// household is guaranteed to be away for (dishwasher class).
    UnattendedBlock,
    /// Emits one full-power slot every `cycle_duration` slots, ignoring
    /// occupancy and the weekly selector entirely (freezer class).
    PeriodicPulse,
}

/// Fills one day of the weekly load and operation grids.
///
/// `wanted` is the selector's mask for the day, `possibility` the
/// feasibility mask from the possibility builder. Returns the realized
/// load curve (watts per slot, each entry 0 or `power`) and the matching
/// operation flags. Nothing outside the returned day is touched.
pub fn fill_daily(
    policy: DutyCycle,
    day: usize,
    wanted: &[bool; QUARTERS_OF_DAY],
    possibility: &[bool; QUARTERS_OF_DAY],
    power: i32,
    cycle: usize,
    occupancy: &dyn Occupancy,
) -> ([i32; QUARTERS_OF_DAY], [bool; QUARTERS_OF_DAY]) {
    match policy {
        DutyCycle::PulseWhileOccupied => pulse_while_occupied(day, wanted, power, occupancy),
        DutyCycle::UnattendedBlock => unattended_block(wanted, possibility, power, cycle),
        DutyCycle::PeriodicPulse => periodic_pulse(power, cycle),
    }
}

/// Scans left to right; every selected slot starts a run that keeps
/// emitting while the household is occupied. During an absence the run
/// waits, owing one extra slot of runtime per selected slot it passes,
/// and catches up once occupancy resumes. A run ends when the owed
/// counter drops below zero or the day does; an unresolved gap is
/// truncated at slot 95.
fn pulse_while_occupied(
    day: usize,
    wanted: &[bool; QUARTERS_OF_DAY],
    power: i32,
    occupancy: &dyn Occupancy,
) -> ([i32; QUARTERS_OF_DAY], [bool; QUARTERS_OF_DAY]) {
    let mut load = [0; QUARTERS_OF_DAY];
    let mut ops = [false; QUARTERS_OF_DAY];

    let mut q = 0;
    while q < QUARTERS_OF_DAY {
        if !wanted[q] {
            q += 1;
            continue;
        }
        let mut owed: i32 = 0;
        while q < QUARTERS_OF_DAY {
            if !occupancy.is_empty(day, q) {
                load[q] = power;
                ops[q] = true;
                owed -= 1;
                q += 1;
                if owed < 0 {
                    break;
                }
            } else {
                q += 1;
                if q < QUARTERS_OF_DAY && wanted[q] {
                    owed += 1;
                }
            }
        }
    }
    (load, ops)
}

/// From the first selected slot, searches forward for the earliest start
/// whose whole block is feasible and emits exactly one `cycle`-slot
/// block there. At most one block per day; starts that could not
/// complete within the day are never chosen.
fn unattended_block(
    wanted: &[bool; QUARTERS_OF_DAY],
    possibility: &[bool; QUARTERS_OF_DAY],
    power: i32,
    cycle: usize,
) -> ([i32; QUARTERS_OF_DAY], [bool; QUARTERS_OF_DAY]) {
    let mut load = [0; QUARTERS_OF_DAY];
    let mut ops = [false; QUARTERS_OF_DAY];

    if let Some(first) = wanted.iter().position(|&w| w)
        && cycle <= QUARTERS_OF_DAY
    {
        let last_start = QUARTERS_OF_DAY - cycle;
        if let Some(start) = (first..=last_start).find(|&s| possibility[s]) {
            for k in start..start + cycle {
                load[k] = power;
                ops[k] = true;
            }
        }
    }
    (load, ops)
}

/// One slot of full power every `cycle` slots, unconditionally.
fn periodic_pulse(power: i32, cycle: usize) -> ([i32; QUARTERS_OF_DAY], [bool; QUARTERS_OF_DAY]) {
    let mut load = [0; QUARTERS_OF_DAY];
    let mut ops = [false; QUARTERS_OF_DAY];
    for q in 0..QUARTERS_OF_DAY {
        if q % cycle == 0 {
            load[q] = power;
            ops[q] = true;
        }
    }
    (load, ops)
}
