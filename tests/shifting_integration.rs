//! Integration tests for tariff-driven load shifting.

mod common;

use appliance_sim::appliances::shifting::{hourly_matrix, shift_single_block};
use appliance_sim::calendar::{DAYS_OF_WEEK, HOURS_OF_DAY, QUARTERS_OF_DAY, QUARTERS_OF_HOUR, Season};
use appliance_sim::tariff::{DayNightRate, FlatRate, HourlyRate};

/// Charge rising linearly from 0.10 at hour 0 to 0.30 at hour 23.
fn rising_tariff() -> HourlyRate {
    let rates: Vec<f64> = (0..HOURS_OF_DAY)
        .map(|h| 0.10 + h as f64 * (0.20 / 23.0))
        .collect();
    HourlyRate::new(rates)
}

#[test]
fn cheapest_pair_wins_end_to_end() {
    // power 500 W, 4-slot cycle, feasibility all-true (house always
    // empty), variable tariff rising across the day: the shifter must
    // land on the (0, 1) hour pair with 4 * 500 in each hour.
    let presence = common::empty_presence();
    let mut rng = common::rng(1);
    let mut dishwasher = common::fixed_power_dishwasher(500.0, 4, 10, &mut rng);
    assert_eq!(dishwasher.profile().power, 500);

    let mut day = None;
    for _ in 0..20 {
        dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();
        day = (0..DAYS_OF_WEEK).find(|&d| dishwasher.operates_on(d));
        if day.is_some() {
            break;
        }
    }
    let day = day.expect("twelve weekly activations must hit at least one day");

    let tariff = rising_tariff();
    let out = dishwasher
        .daily_shifting(&tariff, day * HOURS_OF_DAY, day, &mut rng)
        .unwrap();

    assert_eq!(out[0], (QUARTERS_OF_HOUR * 500) as i64);
    assert_eq!(out[1], (QUARTERS_OF_HOUR * 500) as i64);
    for (h, &v) in out.iter().enumerate().skip(2) {
        assert_eq!(v, 0, "hour {h} should carry no load");
    }
}

#[test]
fn fixed_rate_choice_is_uniform_over_feasible_pairs() {
    // Three feasible hour pairs starting at 2, 9, and 17: over many
    // seeded trials each should be chosen about a third of the time.
    let mut mask = [false; QUARTERS_OF_DAY];
    for h in [2, 3, 9, 10, 17, 18] {
        mask[h * QUARTERS_OF_HOUR] = true;
    }
    let tariff = FlatRate::new(0.2);

    let trials = 10_000;
    let mut counts = [0_usize; HOURS_OF_DAY];
    let mut rng = common::rng(2);
    for _ in 0..trials {
        let out = shift_single_block("T", &tariff, 0, 0, &mask, 500, &mut rng).unwrap();
        let start = out.iter().position(|&v| v != 0).unwrap();
        counts[start] += 1;
    }

    for h in 0..HOURS_OF_DAY {
        if [2, 9, 17].contains(&h) {
            let freq = counts[h] as f64 / trials as f64;
            assert!(
                (freq - 1.0 / 3.0).abs() < 0.02,
                "hour {h} chosen with frequency {freq}, expected ~1/3"
            );
        } else {
            assert_eq!(counts[h], 0, "infeasible hour {h} was chosen");
        }
    }
}

#[test]
fn night_window_attracts_the_block_under_day_night_rates() {
    // Workday commuter presence leaves the 08:00–15:00 starts and the
    // day-boundary pair feasible; with cheap night hours the boundary
    // pair (22, 23) is the unique minimum.
    let presence = common::workweek_presence();
    let mut rng = common::rng(3);
    let mut dishwasher = common::fixed_power_dishwasher(530.0, 8, 12, &mut rng);
    let mut day = None;
    for _ in 0..20 {
        dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();
        day = (0..5).find(|&d| dishwasher.operates_on(d));
        if day.is_some() {
            break;
        }
    }
    let day = day.expect("a workday activation");

    let tariff = DayNightRate::new(0.28, 0.12, 22, 6);
    let out = dishwasher
        .daily_shifting(&tariff, day * HOURS_OF_DAY, day, &mut rng)
        .unwrap();
    assert_eq!(out[22], (QUARTERS_OF_HOUR * 530) as i64);
    assert_eq!(out[23], (QUARTERS_OF_HOUR * 530) as i64);
}

#[test]
fn chosen_pair_is_never_beaten_by_another_feasible_pair() {
    let presence = common::workweek_presence();
    let mut rng = common::rng(4);
    let mut dishwasher = common::dishwasher(&mut rng);

    let rates: Vec<f64> = (0..HOURS_OF_DAY)
        .map(|h| 0.10 + ((h * 7) % 11) as f64 * 0.03)
        .collect();
    let tariff = HourlyRate::new(rates.clone());

    for week in 0..10 {
        dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();
        for day in 0..DAYS_OF_WEEK {
            if !dishwasher.operates_on(day) {
                continue;
            }
            let out = dishwasher
                .daily_shifting(&tariff, day * HOURS_OF_DAY, day, &mut rng)
                .unwrap();
            let chosen = out.iter().position(|&v| v != 0).unwrap();
            let matrix = hourly_matrix(&dishwasher.possibility_vector()[day]);
            let cost = |h: usize| rates[h] + rates[h + 1];
            for h in 0..HOURS_OF_DAY - 1 {
                if matrix[h] && matrix[h + 1] {
                    assert!(
                        cost(chosen) <= cost(h) + 1e-12,
                        "week {week} day {day}: pair {chosen} beaten by {h}"
                    );
                }
            }
        }
    }
}

#[test]
fn freezer_places_one_pulse_per_shifting_window() {
    let presence = common::home_presence();
    let mut rng = common::rng(5);
    let mut freezer = common::fixed_power_freezer(106.0, &mut rng);
    freezer.refresh(&presence, Season::Winter, &mut rng).unwrap();

    let tariff = rising_tariff();
    let out = freezer.daily_shifting(&tariff, 0, 0, &mut rng).unwrap();

    // Rising charge: the cheapest hour of each 12-hour window is its
    // first hour.
    assert_eq!(out[0], (QUARTERS_OF_HOUR * 106) as i64);
    assert_eq!(out[12], (QUARTERS_OF_HOUR * 106) as i64);
    assert_eq!(out.iter().filter(|&&v| v != 0).count(), 2);
}

#[test]
fn freezer_shifting_ignores_the_operation_flag() {
    // The periodic duty cycle runs every day, so shifting output is
    // always present, whatever the presence pattern.
    for presence in [common::home_presence(), common::empty_presence()] {
        let mut rng = common::rng(6);
        let mut freezer = common::freezer(&mut rng);
        freezer.refresh(&presence, Season::Summer, &mut rng).unwrap();
        for day in 0..DAYS_OF_WEEK {
            let out = freezer
                .daily_shifting(&FlatRate::new(0.2), day * HOURS_OF_DAY, day, &mut rng)
                .unwrap();
            assert!(out.iter().any(|&v| v != 0), "day {day} lost its pulses");
        }
    }
}

#[test]
fn dishwasher_that_did_not_run_yields_zero_controllable_load() {
    // A house that never empties cannot run an unattended block, so no
    // day carries controllable load.
    let presence = common::home_presence();
    let mut rng = common::rng(7);
    let mut dishwasher = common::dishwasher(&mut rng);
    dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();

    for day in 0..DAYS_OF_WEEK {
        assert!(!dishwasher.operates_on(day));
        let out = dishwasher
            .daily_shifting(&FlatRate::new(0.2), day * HOURS_OF_DAY, day, &mut rng)
            .unwrap();
        assert_eq!(out, [0; HOURS_OF_DAY]);
    }
}

#[test]
fn shifting_is_deterministic_for_same_seed() {
    let presence = common::workweek_presence();
    let run = |seed: u64| {
        let mut rng = common::rng(seed);
        let mut dishwasher = common::dishwasher(&mut rng);
        dishwasher.refresh(&presence, Season::Winter, &mut rng).unwrap();
        let mut outputs = Vec::new();
        for day in 0..DAYS_OF_WEEK {
            outputs.push(
                dishwasher
                    .daily_shifting(&FlatRate::new(0.2), day * HOURS_OF_DAY, day, &mut rng)
                    .unwrap(),
            );
        }
        outputs
    };
    assert_eq!(run(11), run(11));
}
