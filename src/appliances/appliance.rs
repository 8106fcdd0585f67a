//! The appliance record: profile, policies, and weekly grids.

use std::fmt;

use rand::rngs::StdRng;

use crate::appliances::filler::{self, DutyCycle};
use crate::appliances::possibility::{self, PossibilityRule};
use crate::appliances::profile::{ApplianceProfile, DayWeights, SeasonWeights};
use crate::appliances::selector;
use crate::appliances::shifting::{self, ShiftingPolicy};
use crate::appliances::types::{Occupancy, ScheduleError, gaussian};
use crate::calendar::{DAYS_OF_WEEK, HOURS_OF_DAY, QUARTERS_OF_DAY, Season};
use crate::config::{DishwasherConfig, ElectronicsConfig, FreezerConfig};
use crate::tariff::Tariff;

/// One appliance instance of a simulated household.
///
/// A single record replaces the per-class inheritance of classic
/// household models: behavior differences live entirely in the
/// [`DutyCycle`] and [`ShiftingPolicy`] tags, dispatched by `match`.
///
/// The weekly grids (operation, possibility, load) are overwritten in
/// place by [`Appliance::refresh`] once per simulated week; they are the
/// current week's state, never accumulated history.
#[derive(Debug, Clone)]
pub struct Appliance {
    name: String,
    profile: ApplianceProfile,
    duty_cycle: DutyCycle,
    shifting: ShiftingPolicy,
    operation_vector: [[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
    possibility_vector: [[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
    weekly_load: [[i32; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
    weekly_operation: [[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
    operation_days: [bool; DAYS_OF_WEEK],
}

impl Appliance {
    /// Creates an appliance from an explicit profile and policy pair.
    ///
    /// The class constructors below are the usual entry points; this one
    /// exists for callers assembling custom profiles.
    ///
    /// # Panics
    ///
    /// Panics on a malformed profile: negative power, saturation outside
    /// 0–1, a cycle duration that does not fit the day, or a windowed
    /// shifting policy that does not partition the 24-hour day.
    pub fn new(
        name: String,
        profile: ApplianceProfile,
        duty_cycle: DutyCycle,
        shifting: ShiftingPolicy,
    ) -> Self {
        assert!(profile.power >= 0, "power must be >= 0");
        assert!(
            (0.0..=1.0).contains(&profile.saturation),
            "saturation must be within 0..=1"
        );
        assert!(
            profile.cycle_duration >= 1 && profile.cycle_duration <= QUARTERS_OF_DAY,
            "cycle duration must fit the day"
        );
        if let ShiftingPolicy::WindowedPeriodic { windows } = shifting {
            assert!(
                windows > 0 && HOURS_OF_DAY % windows == 0,
                "shifting windows must evenly divide the day"
            );
        }

        Self {
            name,
            profile,
            duty_cycle,
            shifting,
            operation_vector: [[false; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
            possibility_vector: [[false; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
            weekly_load: [[0; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
            weekly_operation: [[false; QUARTERS_OF_DAY]; DAYS_OF_WEEK],
            operation_days: [false; DAYS_OF_WEEK],
        }
    }

    /// Consumer electronics: presence-gated pulse load, no shifting.
    ///
    /// The weekly activation target grows with the member count — more
    /// people, more screen time.
    pub fn consumer_electronics(
        household: &str,
        cfg: &ElectronicsConfig,
        members: usize,
        rng: &mut StdRng,
    ) -> Self {
        let profile = ApplianceProfile {
            saturation: cfg.saturation,
            consumption_share: gaussian(rng, cfg.share_mean, cfg.share_std).max(0.0),
            base_load_share: cfg.base_load_share,
            power: sample_power(rng, cfg.power_mean_w, cfg.power_std_w),
            cycle_duration: cfg.cycle_duration,
            times: cfg.weekly_times + members,
            occupancy_dependent: true,
            season_weights: SeasonWeights {
                winter: cfg.season_winter,
                transition: cfg.season_transition,
                summer: cfg.season_summer,
            },
            day_weights: DayWeights {
                workday: cfg.day_workday,
                saturday: cfg.day_saturday,
                sunday: cfg.day_sunday,
            },
        };
        Self::new(
            format!("{household} Electronics"),
            profile,
            DutyCycle::PulseWhileOccupied,
            ShiftingPolicy::None,
        )
    }

    /// Dishwasher: one unattended block per activation day, relocatable
    /// to the cheapest feasible two-hour window.
    ///
    /// Like electronics, the weekly target scales with the member count.
    pub fn dishwasher(
        household: &str,
        cfg: &DishwasherConfig,
        members: usize,
        rng: &mut StdRng,
    ) -> Self {
        let profile = ApplianceProfile {
            saturation: cfg.saturation,
            consumption_share: gaussian(rng, cfg.share_mean, cfg.share_std).max(0.0),
            base_load_share: cfg.base_load_share,
            power: sample_power(rng, cfg.power_mean_w, cfg.power_std_w),
            cycle_duration: cfg.cycle_duration,
            times: cfg.weekly_times + members,
            occupancy_dependent: false,
            season_weights: SeasonWeights {
                winter: cfg.season_winter,
                transition: cfg.season_transition,
                summer: cfg.season_summer,
            },
            day_weights: DayWeights {
                workday: cfg.day_workday,
                saturday: cfg.day_saturday,
                sunday: cfg.day_sunday,
            },
        };
        Self::new(
            format!("{household} Dishwasher"),
            profile,
            DutyCycle::UnattendedBlock,
            ShiftingPolicy::SingleBlock,
        )
    }

    /// Freezer: fixed periodic duty cycle, each shifting window's pulse
    /// relocatable to the window's cheapest hour.
    pub fn freezer(household: &str, cfg: &FreezerConfig, rng: &mut StdRng) -> Self {
        let profile = ApplianceProfile {
            saturation: cfg.saturation,
            consumption_share: gaussian(rng, cfg.share_mean, cfg.share_std).max(0.0),
            base_load_share: cfg.base_load_share,
            power: sample_power(rng, cfg.power_mean_w, cfg.power_std_w),
            cycle_duration: cfg.cycle_duration,
            times: 0,
            occupancy_dependent: false,
            season_weights: SeasonWeights {
                winter: cfg.season_winter,
                transition: cfg.season_transition,
                summer: cfg.season_summer,
            },
            day_weights: DayWeights {
                workday: cfg.day_workday,
                saturday: cfg.day_saturday,
                sunday: cfg.day_sunday,
            },
        };
        Self::new(
            format!("{household} Freezer"),
            profile,
            DutyCycle::PeriodicPulse,
            ShiftingPolicy::WindowedPeriodic {
                windows: cfg.shifting_windows,
            },
        )
    }

    fn possibility_rule(&self) -> PossibilityRule {
        match self.duty_cycle {
            DutyCycle::PulseWhileOccupied => PossibilityRule::WhileOccupied,
            DutyCycle::UnattendedBlock => PossibilityRule::UnoccupiedBlock {
                len: self.profile.cycle_duration,
            },
            DutyCycle::PeriodicPulse => PossibilityRule::Anytime,
        }
    }

    /// Rebuilds the week: possibility grid, operation selection, and the
    /// realized load curves for all seven days.
    ///
    /// Fully replaces the previous week's grids. Given the same random
    /// source state and oracles, two refreshes produce identical grids.
    ///
    /// Fixed-periodic appliances skip the selector; their operation
    /// vector is derived from the daily fill rather than driving it.
    ///
    /// # Errors
    ///
    /// Propagates selector failures ([`ScheduleError::NoFeasibleSlots`],
    /// [`ScheduleError::SamplingExhausted`]); both invalidate the
    /// appliance's configuration rather than the week.
    pub fn refresh(
        &mut self,
        occupancy: &dyn Occupancy,
        season: Season,
        rng: &mut StdRng,
    ) -> Result<(), ScheduleError> {
        self.possibility_vector = possibility::weekly(self.possibility_rule(), occupancy);

        if self.duty_cycle != DutyCycle::PeriodicPulse {
            self.operation_vector = selector::select_weekly(
                &self.name,
                &self.profile,
                season,
                &self.possibility_vector,
                rng,
            )?;
        }

        for day in 0..DAYS_OF_WEEK {
            let (load, ops) = filler::fill_daily(
                self.duty_cycle,
                day,
                &self.operation_vector[day],
                &self.possibility_vector[day],
                self.profile.power,
                self.profile.cycle_duration,
                occupancy,
            );
            self.weekly_load[day] = load;
            self.weekly_operation[day] = ops;
            if self.duty_cycle == DutyCycle::PeriodicPulse {
                self.operation_vector[day] = ops;
            }
            self.operation_days[day] = ops.iter().any(|&b| b);
        }
        Ok(())
    }

    /// Re-times the day's deferrable load against the tariff.
    ///
    /// `now` is the absolute simulation hour at which `day` begins.
    /// Non-shiftable appliances and single-block appliances that did not
    /// run that day yield an all-zero hourly array.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::NoFeasibleHours`] when a block must be placed
    /// but no feasible hour pair exists.
    pub fn daily_shifting(
        &self,
        tariff: &dyn Tariff,
        now: usize,
        day: usize,
        rng: &mut StdRng,
    ) -> Result<[i64; HOURS_OF_DAY], ScheduleError> {
        match self.shifting {
            ShiftingPolicy::None => Ok([0; HOURS_OF_DAY]),
            ShiftingPolicy::SingleBlock => {
                if !self.operation_days[day] {
                    return Ok([0; HOURS_OF_DAY]);
                }
                shifting::shift_single_block(
                    &self.name,
                    tariff,
                    now,
                    day,
                    &self.possibility_vector[day],
                    self.profile.power,
                    rng,
                )
            }
            ShiftingPolicy::WindowedPeriodic { windows } => Ok(shifting::shift_windowed(
                tariff,
                now,
                windows,
                self.profile.power,
                rng,
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &ApplianceProfile {
        &self.profile
    }

    pub fn duty_cycle(&self) -> DutyCycle {
        self.duty_cycle
    }

    pub fn shifting_policy(&self) -> ShiftingPolicy {
        self.shifting
    }

    /// Whether the appliance's load timing can be deferred at all.
    pub fn is_shiftable(&self) -> bool {
        self.shifting != ShiftingPolicy::None
    }

    /// Realized load curve of the current week, watts per slot.
    pub fn weekly_load(&self) -> &[[i32; QUARTERS_OF_DAY]; DAYS_OF_WEEK] {
        &self.weekly_load
    }

    /// Operation flags mirroring the nonzero slots of the load curve.
    pub fn weekly_operation(&self) -> &[[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK] {
        &self.weekly_operation
    }

    /// The selector's scheduled activation attempts for the week.
    pub fn operation_vector(&self) -> &[[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK] {
        &self.operation_vector
    }

    /// Current week's feasibility masks.
    pub fn possibility_vector(&self) -> &[[bool; QUARTERS_OF_DAY]; DAYS_OF_WEEK] {
        &self.possibility_vector
    }

    /// Whether the appliance actually ran on `day`.
    pub fn operates_on(&self, day: usize) -> bool {
        self.operation_days[day]
    }

    /// Energy drawn on `day` in kWh.
    pub fn daily_energy_kwh(&self, day: usize) -> f64 {
        let watts: i64 = self.weekly_load[day].iter().map(|&w| w as i64).sum();
        watts as f64 * 0.25 / 1000.0
    }
}

/// Samples operating power in watts, clamped at zero.
fn sample_power(rng: &mut StdRng, mean: f64, std_dev: f64) -> i32 {
    gaussian(rng, mean, std_dev).round().max(0.0) as i32
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.name)?;
        writeln!(
            f,
            "power: {} W  cycle: {} slots  target: {}/wk  saturation: {:.2}",
            self.profile.power, self.profile.cycle_duration, self.profile.times,
            self.profile.saturation,
        )?;
        for day in 0..DAYS_OF_WEEK {
            let slots = self.weekly_operation[day].iter().filter(|&&b| b).count();
            writeln!(
                f,
                "day {day}: {slots:>2} active slots  {:.3} kWh",
                self.daily_energy_kwh(day)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliances::types::PresenceGrid;
    use rand::SeedableRng;

    fn electronics(rng: &mut StdRng) -> Appliance {
        Appliance::consumer_electronics("House1", &ElectronicsConfig::default(), 2, rng)
    }

    fn dishwasher(rng: &mut StdRng) -> Appliance {
        Appliance::dishwasher("House1", &DishwasherConfig::default(), 2, rng)
    }

    fn freezer(rng: &mut StdRng) -> Appliance {
        Appliance::freezer("House1", &FreezerConfig::default(), rng)
    }

    #[test]
    fn profiles_are_deterministic_for_same_seed() {
        let a = electronics(&mut StdRng::seed_from_u64(9));
        let b = electronics(&mut StdRng::seed_from_u64(9));
        assert_eq!(a.profile().power, b.profile().power);
        assert_eq!(a.profile().consumption_share, b.profile().consumption_share);
    }

    #[test]
    fn member_count_raises_the_weekly_target() {
        let cfg = DishwasherConfig::default();
        let two = Appliance::dishwasher("H", &cfg, 2, &mut StdRng::seed_from_u64(1));
        let five = Appliance::dishwasher("H", &cfg, 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(five.profile().times, two.profile().times + 3);
    }

    #[test]
    fn loads_are_zero_or_power_after_refresh() {
        let grid = PresenceGrid::workweek(2);
        let mut rng = StdRng::seed_from_u64(21);
        for mut appliance in [electronics(&mut rng), dishwasher(&mut rng), freezer(&mut rng)] {
            appliance.refresh(&grid, Season::Winter, &mut rng).unwrap();
            let power = appliance.profile().power;
            for day in 0..DAYS_OF_WEEK {
                for (q, &w) in appliance.weekly_load()[day].iter().enumerate() {
                    assert!(
                        w == 0 || w == power,
                        "{}: day {day} slot {q} has load {w}, power {power}",
                        appliance.name()
                    );
                }
            }
        }
    }

    #[test]
    fn operation_mirrors_nonzero_load() {
        let grid = PresenceGrid::workweek(3);
        let mut rng = StdRng::seed_from_u64(5);
        let mut appliance = electronics(&mut rng);
        appliance.refresh(&grid, Season::Summer, &mut rng).unwrap();
        for day in 0..DAYS_OF_WEEK {
            for q in 0..QUARTERS_OF_DAY {
                assert_eq!(
                    appliance.weekly_operation()[day][q],
                    appliance.weekly_load()[day][q] != 0
                );
            }
        }
    }

    #[test]
    fn refresh_is_idempotent_for_same_rng_state() {
        let grid = PresenceGrid::workweek(2);
        let mut appliance = dishwasher(&mut StdRng::seed_from_u64(2));
        let mut other = appliance.clone();

        appliance
            .refresh(&grid, Season::Transition, &mut StdRng::seed_from_u64(77))
            .unwrap();
        other
            .refresh(&grid, Season::Transition, &mut StdRng::seed_from_u64(77))
            .unwrap();
        assert_eq!(appliance.weekly_load(), other.weekly_load());
        assert_eq!(appliance.operation_vector(), other.operation_vector());

        // A second refresh from the same seed fully supersedes the first.
        appliance
            .refresh(&grid, Season::Transition, &mut StdRng::seed_from_u64(77))
            .unwrap();
        assert_eq!(appliance.weekly_load(), other.weekly_load());
    }

    #[test]
    fn freezer_operation_vector_is_derived_from_fill() {
        let grid = PresenceGrid::always_home(2);
        let mut rng = StdRng::seed_from_u64(3);
        let mut appliance = freezer(&mut rng);
        appliance.refresh(&grid, Season::Winter, &mut rng).unwrap();
        assert_eq!(appliance.operation_vector(), appliance.weekly_operation());
        let cycle = appliance.profile().cycle_duration;
        for day in 0..DAYS_OF_WEEK {
            for q in 0..QUARTERS_OF_DAY {
                assert_eq!(appliance.weekly_operation()[day][q], q % cycle == 0);
            }
        }
    }

    #[test]
    fn electronics_in_an_always_empty_house_is_a_config_error() {
        let grid = PresenceGrid::always_away(1);
        let mut rng = StdRng::seed_from_u64(4);
        let mut appliance = electronics(&mut rng);
        let err = appliance.refresh(&grid, Season::Winter, &mut rng);
        assert!(matches!(err, Err(ScheduleError::NoFeasibleSlots { .. })));
    }

    #[test]
    fn non_shiftable_appliance_yields_zero_controllable_load() {
        let grid = PresenceGrid::workweek(2);
        let mut rng = StdRng::seed_from_u64(6);
        let mut appliance = electronics(&mut rng);
        appliance.refresh(&grid, Season::Winter, &mut rng).unwrap();
        let tariff = crate::tariff::FlatRate::new(0.2);
        let out = appliance.daily_shifting(&tariff, 0, 0, &mut rng).unwrap();
        assert_eq!(out, [0; HOURS_OF_DAY]);
    }

    #[test]
    fn display_reports_every_day() {
        let grid = PresenceGrid::workweek(2);
        let mut rng = StdRng::seed_from_u64(8);
        let mut appliance = freezer(&mut rng);
        appliance.refresh(&grid, Season::Winter, &mut rng).unwrap();
        let s = format!("{appliance}");
        assert!(s.contains("House1 Freezer"));
        assert!(s.contains("day 6"));
    }
}
