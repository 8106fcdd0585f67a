//! Integration tests for weekly scheduling and load filling.

mod common;

use appliance_sim::appliances::types::Occupancy;
use appliance_sim::appliances::{PresenceGrid, ScheduleError};
use appliance_sim::calendar::{DAYS_OF_WEEK, QUARTERS_OF_DAY, Season};
use appliance_sim::config::ScenarioConfig;
use appliance_sim::sim::household::Household;

#[test]
fn every_load_value_is_zero_or_power() {
    let presence = common::workweek_presence();
    let mut rng = common::rng(1);
    let mut appliances = [
        common::electronics(&mut rng),
        common::dishwasher(&mut rng),
        common::freezer(&mut rng),
    ];

    for week in 0..20 {
        for appliance in &mut appliances {
            appliance.refresh(&presence, Season::Winter, &mut rng).unwrap();
            let power = appliance.profile().power;
            for day in 0..DAYS_OF_WEEK {
                for (q, &w) in appliance.weekly_load()[day].iter().enumerate() {
                    assert!(
                        w == 0 || w == power,
                        "{} week {week} day {day} slot {q}: load {w}, power {power}",
                        appliance.name()
                    );
                }
            }
        }
    }
}

#[test]
fn dishwasher_blocks_cover_only_empty_slots() {
    let presence = common::workweek_presence();
    let mut rng = common::rng(2);
    let mut dishwasher = common::dishwasher(&mut rng);

    for _ in 0..30 {
        dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();
        for day in 0..DAYS_OF_WEEK {
            for (q, &on) in dishwasher.weekly_operation()[day].iter().enumerate() {
                if on {
                    assert!(
                        presence.is_empty(day, q),
                        "scheduled block spans an occupied slot at ({day}, {q})"
                    );
                }
            }
        }
    }
}

#[test]
fn electronics_tickets_land_on_occupied_slots_only() {
    let presence = common::workweek_presence();
    let mut rng = common::rng(3);
    let mut electronics = common::electronics(&mut rng);

    for _ in 0..30 {
        electronics.refresh(&presence, Season::Summer, &mut rng).unwrap();
        for day in 0..DAYS_OF_WEEK {
            for (q, &wanted) in electronics.operation_vector()[day].iter().enumerate() {
                if wanted {
                    assert!(
                        !presence.is_empty(day, q),
                        "occupancy-dependent ticket on empty slot ({day}, {q})"
                    );
                }
            }
        }
    }
}

#[test]
fn mean_weekly_activation_count_converges_to_target() {
    let presence = common::home_presence();
    let mut rng = common::rng(4);
    let mut electronics = common::electronics(&mut rng);
    let target = electronics.profile().times;

    let weeks = 400;
    let mut total_marks = 0_usize;
    for _ in 0..weeks {
        electronics.refresh(&presence, Season::Winter, &mut rng).unwrap();
        total_marks += electronics
            .operation_vector()
            .iter()
            .flatten()
            .filter(|&&b| b)
            .count();
    }

    // Tickets collapsing onto the same slot pull the mean slightly under
    // the target; anything further off means the sampler is broken.
    let mean = total_marks as f64 / weeks as f64;
    assert!(
        (mean - target as f64).abs() < 0.5,
        "mean weekly activations {mean} should be close to target {target}"
    );
}

#[test]
fn freezer_pulses_on_cycle_boundaries_regardless_of_occupancy() {
    for presence in [common::home_presence(), common::empty_presence()] {
        let mut rng = common::rng(5);
        let mut freezer = common::freezer(&mut rng);
        freezer.refresh(&presence, Season::Transition, &mut rng).unwrap();
        let power = freezer.profile().power;
        let cycle = freezer.profile().cycle_duration;
        for day in 0..DAYS_OF_WEEK {
            for (q, &w) in freezer.weekly_load()[day].iter().enumerate() {
                let expected = if q % cycle == 0 { power } else { 0 };
                assert_eq!(w, expected, "day {day} slot {q}");
            }
        }
    }
}

#[test]
fn refresh_with_same_rng_state_is_idempotent() {
    let cfg = ScenarioConfig::baseline();
    let presence = PresenceGrid::workweek(cfg.household.members);
    let mut hh = Household::from_config(&cfg, presence, &mut common::rng(6));

    hh.refresh_week(Season::Winter, &mut common::rng(50)).unwrap();
    let first = hh.weekly_load();

    hh.refresh_week(Season::Winter, &mut common::rng(50)).unwrap();
    assert_eq!(hh.weekly_load(), first);
}

#[test]
fn refresh_replaces_grids_instead_of_accumulating() {
    let presence = common::home_presence();
    let mut rng = common::rng(7);
    let mut electronics = common::electronics(&mut rng);
    let target = electronics.profile().times;

    for week in 0..50 {
        electronics.refresh(&presence, Season::Winter, &mut rng).unwrap();
        let marks = electronics
            .operation_vector()
            .iter()
            .flatten()
            .filter(|&&b| b)
            .count();
        assert!(
            marks <= target,
            "week {week}: {marks} marks exceed the {target} weekly tickets"
        );
    }
}

#[test]
fn operation_days_flag_follows_realized_load() {
    let presence = common::workweek_presence();
    let mut rng = common::rng(8);
    let mut dishwasher = common::dishwasher(&mut rng);
    dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();

    for day in 0..DAYS_OF_WEEK {
        let ran = dishwasher.weekly_load()[day].iter().any(|&w| w != 0);
        assert_eq!(dishwasher.operates_on(day), ran, "day {day}");
    }
}

#[test]
fn impossible_profile_surfaces_a_configuration_error() {
    // Occupancy-dependent appliance in a house that is never occupied.
    let presence = common::empty_presence();
    let mut rng = common::rng(9);
    let mut electronics = common::electronics(&mut rng);
    let err = electronics.refresh(&presence, Season::Winter, &mut rng);
    assert!(matches!(err, Err(ScheduleError::NoFeasibleSlots { .. })));
}

#[test]
fn quarter_grid_shape_is_stable() {
    let presence = common::workweek_presence();
    let mut rng = common::rng(10);
    let mut freezer = common::freezer(&mut rng);
    freezer.refresh(&presence, Season::Summer, &mut rng).unwrap();
    assert_eq!(freezer.weekly_load().len(), DAYS_OF_WEEK);
    for day in freezer.weekly_load() {
        assert_eq!(day.len(), QUARTERS_OF_DAY);
    }
}
