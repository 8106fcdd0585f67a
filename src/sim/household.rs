//! Household bootstrap and weekly refresh driver.

use rand::{Rng, rngs::StdRng};

use crate::appliances::types::{Occupancy, ScheduleError};
use crate::appliances::{Appliance, PresenceGrid};
use crate::calendar::{DAYS_OF_WEEK, HOURS_OF_DAY, QUARTERS_OF_DAY, Season};
use crate::config::ScenarioConfig;
use crate::tariff::Tariff;

/// A simulated household: presence data plus its appliance set.
///
/// Owns its appliances outright; each one is mutated only through this
/// household's refresh, so there is no shared mutable state anywhere in
/// a simulation run.
pub struct Household {
    name: String,
    presence: PresenceGrid,
    appliances: Vec<Appliance>,
}

impl Household {
    /// Creates a household from an explicit appliance set.
    pub fn new(name: String, presence: PresenceGrid, appliances: Vec<Appliance>) -> Self {
        Self {
            name,
            presence,
            appliances,
        }
    }

    /// Bootstraps a household from scenario configuration.
    ///
    /// Each appliance class is instantiated only if a roll of the shared
    /// random source lands under its configured saturation, then its
    /// profile is Gaussian-sampled from the same source. A fixed seed
    /// therefore reproduces the exact same household.
    pub fn from_config(cfg: &ScenarioConfig, presence: PresenceGrid, rng: &mut StdRng) -> Self {
        let name = &cfg.household.name;
        let members = cfg.household.members;
        let mut appliances = Vec::new();

        if rng.random::<f64>() < cfg.electronics.saturation {
            appliances.push(Appliance::consumer_electronics(
                name,
                &cfg.electronics,
                members,
                rng,
            ));
        }
        if rng.random::<f64>() < cfg.dishwasher.saturation {
            appliances.push(Appliance::dishwasher(name, &cfg.dishwasher, members, rng));
        }
        if rng.random::<f64>() < cfg.freezer.saturation {
            appliances.push(Appliance::freezer(name, &cfg.freezer, rng));
        }

        Self::new(name.clone(), presence, appliances)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn presence(&self) -> &PresenceGrid {
        &self.presence
    }

    pub fn appliances(&self) -> &[Appliance] {
        &self.appliances
    }

    /// Number of household members, as reported by the occupancy oracle.
    pub fn members(&self) -> usize {
        self.presence.members()
    }

    /// Re-randomizes every appliance's week.
    ///
    /// Must complete before the week's load grids are read; sequencing
    /// is the caller's job, the engine has no scheduling of its own.
    ///
    /// # Errors
    ///
    /// Propagates the first appliance's [`ScheduleError`]; any such
    /// failure invalidates the scenario configuration.
    pub fn refresh_week(&mut self, season: Season, rng: &mut StdRng) -> Result<(), ScheduleError> {
        let presence = &self.presence;
        for appliance in &mut self.appliances {
            appliance.refresh(presence, season, rng)?;
        }
        Ok(())
    }

    /// Summed load of all appliances, watts per quarter-hour slot.
    pub fn weekly_load(&self) -> [[i64; QUARTERS_OF_DAY]; DAYS_OF_WEEK] {
        let mut total = [[0_i64; QUARTERS_OF_DAY]; DAYS_OF_WEEK];
        for appliance in &self.appliances {
            for (day, row) in appliance.weekly_load().iter().enumerate() {
                for (q, &w) in row.iter().enumerate() {
                    total[day][q] += w as i64;
                }
            }
        }
        total
    }

    /// Total energy of the current week in kWh.
    pub fn weekly_energy_kwh(&self) -> f64 {
        self.appliances
            .iter()
            .map(|a| (0..DAYS_OF_WEEK).map(|d| a.daily_energy_kwh(d)).sum::<f64>())
            .sum()
    }

    /// Summed controllable load of all shiftable appliances for `day`,
    /// watt-quarter-hours per hour. `now` is the absolute simulation
    /// hour at which the day begins.
    ///
    /// # Errors
    ///
    /// Propagates the first shifting failure.
    pub fn daily_controllable(
        &self,
        tariff: &dyn Tariff,
        now: usize,
        day: usize,
        rng: &mut StdRng,
    ) -> Result<[i64; HOURS_OF_DAY], ScheduleError> {
        let mut total = [0_i64; HOURS_OF_DAY];
        for appliance in &self.appliances {
            if !appliance.is_shiftable() {
                continue;
            }
            let shifted = appliance.daily_shifting(tariff, now, day, rng)?;
            for (h, v) in shifted.iter().enumerate() {
                total[h] += v;
            }
        }
        Ok(total)
    }
}
