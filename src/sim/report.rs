//! Post-hoc weekly reporting from household load grids.

use std::fmt;

use crate::calendar::DAYS_OF_WEEK;
use crate::sim::household::Household;

/// Per-appliance aggregate for one simulated week.
#[derive(Debug, Clone)]
pub struct ApplianceSummary {
    pub name: String,
    /// Sampled operating power (W).
    pub power_w: i32,
    /// Energy drawn over the week (kWh).
    pub energy_kwh: f64,
    /// Quarter-hour slots with nonzero load.
    pub active_slots: usize,
    /// Days on which the appliance ran at all.
    pub operating_days: usize,
}

/// Aggregate report over one household week.
///
/// Computed post-hoc from the refreshed grids so the report and the
/// exported load curves can never disagree.
#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub week: usize,
    pub household: String,
    pub summaries: Vec<ApplianceSummary>,
    pub total_energy_kwh: f64,
}

impl WeeklyReport {
    /// Builds the report for `week` from the household's current grids.
    pub fn from_household(week: usize, household: &Household) -> Self {
        let mut summaries = Vec::with_capacity(household.appliances().len());
        let mut total_energy_kwh = 0.0;

        for appliance in household.appliances() {
            let energy_kwh: f64 = (0..DAYS_OF_WEEK).map(|d| appliance.daily_energy_kwh(d)).sum();
            let active_slots = appliance
                .weekly_operation()
                .iter()
                .flatten()
                .filter(|&&b| b)
                .count();
            let operating_days = (0..DAYS_OF_WEEK)
                .filter(|&d| appliance.operates_on(d))
                .count();
            total_energy_kwh += energy_kwh;
            summaries.push(ApplianceSummary {
                name: appliance.name().to_string(),
                power_w: appliance.profile().power,
                energy_kwh,
                active_slots,
                operating_days,
            });
        }

        Self {
            week,
            household: household.name().to_string(),
            summaries,
            total_energy_kwh,
        }
    }
}

impl fmt::Display for WeeklyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Week {} — {} ---", self.week, self.household)?;
        for s in &self.summaries {
            writeln!(
                f,
                "{:<24} {:>5} W  {:>4} slots  {} days  {:>7.3} kWh",
                s.name, s.power_w, s.active_slots, s.operating_days, s.energy_kwh
            )?;
        }
        write!(f, "total: {:.3} kWh", self.total_energy_kwh)
    }
}
