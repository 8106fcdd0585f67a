//! Shared test fixtures for integration tests.

use appliance_sim::appliances::{Appliance, PresenceGrid};
use appliance_sim::config::{DishwasherConfig, ElectronicsConfig, FreezerConfig};
use rand::{SeedableRng, rngs::StdRng};

/// Seeded RNG for reproducible assertions.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Two-member household, away 08:00–17:00 on workdays.
pub fn workweek_presence() -> PresenceGrid {
    PresenceGrid::workweek(2)
}

/// Two-member household that is never home.
pub fn empty_presence() -> PresenceGrid {
    PresenceGrid::always_away(2)
}

/// Two-member household that never leaves.
pub fn home_presence() -> PresenceGrid {
    PresenceGrid::always_home(2)
}

/// Default consumer electronics for a two-member household.
pub fn electronics(rng: &mut StdRng) -> Appliance {
    Appliance::consumer_electronics("TestHouse", &ElectronicsConfig::default(), 2, rng)
}

/// Default dishwasher for a two-member household.
pub fn dishwasher(rng: &mut StdRng) -> Appliance {
    Appliance::dishwasher("TestHouse", &DishwasherConfig::default(), 2, rng)
}

/// Dishwasher with a deterministic power draw and custom cycle/target.
pub fn fixed_power_dishwasher(
    power_w: f64,
    cycle: usize,
    weekly_times: usize,
    rng: &mut StdRng,
) -> Appliance {
    let cfg = DishwasherConfig {
        power_mean_w: power_w,
        power_std_w: 0.0,
        cycle_duration: cycle,
        weekly_times,
        ..DishwasherConfig::default()
    };
    Appliance::dishwasher("TestHouse", &cfg, 2, rng)
}

/// Default freezer.
pub fn freezer(rng: &mut StdRng) -> Appliance {
    Appliance::freezer("TestHouse", &FreezerConfig::default(), rng)
}

/// Freezer with a deterministic power draw.
pub fn fixed_power_freezer(power_w: f64, rng: &mut StdRng) -> Appliance {
    let cfg = FreezerConfig {
        power_mean_w: power_w,
        power_std_w: 0.0,
        ..FreezerConfig::default()
    };
    Appliance::freezer("TestHouse", &cfg, rng)
}
