//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::calendar::{HOURS_OF_DAY, QUARTERS_OF_DAY, Season};
use crate::tariff::{DayNightRate, FlatRate, Tariff};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Household identity and size.
    #[serde(default)]
    pub household: HouseholdConfig,
    /// Tariff used by the cost-minimizing shifter.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Consumer electronics parameters.
    #[serde(default)]
    pub electronics: ElectronicsConfig,
    /// Dishwasher parameters.
    #[serde(default)]
    pub dishwasher: DishwasherConfig,
    /// Freezer parameters.
    #[serde(default)]
    pub freezer: FreezerConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of weeks to simulate (must be > 0).
    pub weeks: usize,
    /// Master random seed.
    pub seed: u64,
    /// Active season: `"winter"`, `"transition"`, or `"summer"`.
    pub season: String,
}

impl SimulationConfig {
    /// Parsed season, `None` when the config string is invalid.
    pub fn season(&self) -> Option<Season> {
        Season::from_name(&self.season)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            weeks: 4,
            seed: 42,
            season: "winter".to_string(),
        }
    }
}

/// Household identity and size.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdConfig {
    /// Household name, used as the appliance name prefix.
    pub name: String,
    /// Number of members (must be > 0).
    pub members: usize,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            name: "House1".to_string(),
            members: 2,
        }
    }
}

/// Tariff parameters: `"flat"` or `"day_night"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Tariff kind: `"flat"` or `"day_night"`.
    pub kind: String,
    /// Per-unit rate for the flat tariff.
    pub flat_rate: f64,
    /// Daytime per-unit rate for the day/night tariff.
    pub day_rate: f64,
    /// Nighttime per-unit rate for the day/night tariff.
    pub night_rate: f64,
    /// Night window start hour (may wrap midnight).
    pub night_start_hour: usize,
    /// Night window end hour (exclusive).
    pub night_end_hour: usize,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            kind: "flat".to_string(),
            flat_rate: 0.20,
            day_rate: 0.28,
            night_rate: 0.12,
            night_start_hour: 22,
            night_end_hour: 6,
        }
    }
}

impl TariffConfig {
    /// Builds the configured tariff oracle.
    pub fn build(&self) -> Box<dyn Tariff> {
        match self.kind.as_str() {
            "day_night" => Box::new(DayNightRate::new(
                self.day_rate,
                self.night_rate,
                self.night_start_hour,
                self.night_end_hour,
            )),
            _ => Box::new(FlatRate::new(self.flat_rate)),
        }
    }
}

/// Consumer electronics parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectronicsConfig {
    /// Ownership probability (0.0–1.0).
    pub saturation: f64,
    /// Mean operating power (W).
    pub power_mean_w: f64,
    /// Power standard deviation (W).
    pub power_std_w: f64,
    /// Mean consumption share of household base load.
    pub share_mean: f64,
    /// Consumption share standard deviation.
    pub share_std: f64,
    /// Fixed base-load share constant.
    pub base_load_share: f64,
    /// Weekly activation target before the member-count bump.
    pub weekly_times: usize,
    /// Slots per operation.
    pub cycle_duration: usize,
    pub season_winter: f64,
    pub season_transition: f64,
    pub season_summer: f64,
    pub day_workday: f64,
    pub day_saturday: f64,
    pub day_sunday: f64,
}

impl Default for ElectronicsConfig {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            power_mean_w: 100.0,
            power_std_w: 17.0,
            share_mean: 0.04,
            share_std: 0.01,
            base_load_share: 0.02,
            weekly_times: 12,
            cycle_duration: 1,
            season_winter: 0.40,
            season_transition: 0.30,
            season_summer: 0.30,
            day_workday: 0.12,
            day_saturday: 0.20,
            day_sunday: 0.20,
        }
    }
}

/// Dishwasher parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DishwasherConfig {
    /// Ownership probability (0.0–1.0).
    pub saturation: f64,
    /// Mean operating power (W).
    pub power_mean_w: f64,
    /// Power standard deviation (W).
    pub power_std_w: f64,
    /// Mean consumption share of household base load.
    pub share_mean: f64,
    /// Consumption share standard deviation.
    pub share_std: f64,
    /// Fixed base-load share constant.
    pub base_load_share: f64,
    /// Weekly activation target before the member-count bump.
    pub weekly_times: usize,
    /// Slots per wash cycle.
    pub cycle_duration: usize,
    pub season_winter: f64,
    pub season_transition: f64,
    pub season_summer: f64,
    pub day_workday: f64,
    pub day_saturday: f64,
    pub day_sunday: f64,
}

impl Default for DishwasherConfig {
    fn default() -> Self {
        Self {
            saturation: 0.56,
            power_mean_w: 530.0,
            power_std_w: 100.0,
            share_mean: 0.05,
            share_std: 0.01,
            base_load_share: 0.02,
            weekly_times: 3,
            cycle_duration: 8,
            season_winter: 0.35,
            season_transition: 0.33,
            season_summer: 0.32,
            day_workday: 0.13,
            day_saturday: 0.18,
            day_sunday: 0.17,
        }
    }
}

/// Freezer parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FreezerConfig {
    /// Ownership probability (0.0–1.0).
    pub saturation: f64,
    /// Mean operating power (W).
    pub power_mean_w: f64,
    /// Power standard deviation (W).
    pub power_std_w: f64,
    /// Mean consumption share of household base load.
    pub share_mean: f64,
    /// Consumption share standard deviation.
    pub share_std: f64,
    /// Fixed base-load share constant.
    pub base_load_share: f64,
    /// Slots between periodic pulses.
    pub cycle_duration: usize,
    /// Equal shifting windows per day (must divide 24).
    pub shifting_windows: usize,
    pub season_winter: f64,
    pub season_transition: f64,
    pub season_summer: f64,
    pub day_workday: f64,
    pub day_saturday: f64,
    pub day_sunday: f64,
}

impl Default for FreezerConfig {
    fn default() -> Self {
        Self {
            saturation: 0.77,
            power_mean_w: 106.0,
            power_std_w: 15.0,
            share_mean: 0.06,
            share_std: 0.01,
            base_load_share: 0.04,
            cycle_duration: 4,
            shifting_windows: 2,
            season_winter: 0.33,
            season_transition: 0.33,
            season_summer: 0.34,
            day_workday: 0.14,
            day_saturday: 0.15,
            day_sunday: 0.15,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.weeks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            household: HouseholdConfig::default(),
            tariff: TariffConfig::default(),
            electronics: ElectronicsConfig::default(),
            dishwasher: DishwasherConfig::default(),
            freezer: FreezerConfig::default(),
        }
    }

    /// Returns the family-house preset: four members, day/night tariff,
    /// heavier dishwasher and electronics use.
    pub fn family_house() -> Self {
        Self {
            household: HouseholdConfig {
                name: "FamilyHouse".to_string(),
                members: 4,
            },
            tariff: TariffConfig {
                kind: "day_night".to_string(),
                ..TariffConfig::default()
            },
            dishwasher: DishwasherConfig {
                saturation: 0.85,
                weekly_times: 5,
                ..DishwasherConfig::default()
            },
            electronics: ElectronicsConfig {
                weekly_times: 18,
                ..ElectronicsConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the night-owls preset: single member, cheap-night tariff,
    /// weekend-heavy usage weights.
    pub fn night_owls() -> Self {
        Self {
            household: HouseholdConfig {
                name: "NightOwls".to_string(),
                members: 1,
            },
            tariff: TariffConfig {
                kind: "day_night".to_string(),
                night_rate: 0.08,
                ..TariffConfig::default()
            },
            electronics: ElectronicsConfig {
                weekly_times: 9,
                day_workday: 0.08,
                day_saturday: 0.30,
                day_sunday: 0.30,
                ..ElectronicsConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "family_house", "night_owls"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "family_house" => Ok(Self::family_house()),
            "night_owls" => Ok(Self::night_owls()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.weeks == 0 {
            errors.push(ConfigError {
                field: "simulation.weeks".into(),
                message: "must be > 0".into(),
            });
        }
        if s.season().is_none() {
            errors.push(ConfigError {
                field: "simulation.season".into(),
                message: format!(
                    "must be \"winter\", \"transition\", or \"summer\", got \"{}\"",
                    s.season
                ),
            });
        }

        if self.household.members == 0 {
            errors.push(ConfigError {
                field: "household.members".into(),
                message: "must be > 0".into(),
            });
        }

        let t = &self.tariff;
        if t.kind != "flat" && t.kind != "day_night" {
            errors.push(ConfigError {
                field: "tariff.kind".into(),
                message: format!("must be \"flat\" or \"day_night\", got \"{}\"", t.kind),
            });
        }
        if t.flat_rate < 0.0 || t.day_rate < 0.0 || t.night_rate < 0.0 {
            errors.push(ConfigError {
                field: "tariff".into(),
                message: "rates must be >= 0".into(),
            });
        }
        if t.night_start_hour >= HOURS_OF_DAY || t.night_end_hour >= HOURS_OF_DAY {
            errors.push(ConfigError {
                field: "tariff.night_start_hour".into(),
                message: "night window bounds must be hours of day".into(),
            });
        }

        validate_appliance(
            &mut errors,
            "electronics",
            self.electronics.saturation,
            self.electronics.power_mean_w,
            self.electronics.power_std_w,
            self.electronics.cycle_duration,
            &[
                ("season_winter", self.electronics.season_winter),
                ("season_transition", self.electronics.season_transition),
                ("season_summer", self.electronics.season_summer),
                ("day_workday", self.electronics.day_workday),
                ("day_saturday", self.electronics.day_saturday),
                ("day_sunday", self.electronics.day_sunday),
            ],
        );
        if self.electronics.weekly_times == 0 {
            errors.push(ConfigError {
                field: "electronics.weekly_times".into(),
                message: "must be > 0".into(),
            });
        }

        validate_appliance(
            &mut errors,
            "dishwasher",
            self.dishwasher.saturation,
            self.dishwasher.power_mean_w,
            self.dishwasher.power_std_w,
            self.dishwasher.cycle_duration,
            &[
                ("season_winter", self.dishwasher.season_winter),
                ("season_transition", self.dishwasher.season_transition),
                ("season_summer", self.dishwasher.season_summer),
                ("day_workday", self.dishwasher.day_workday),
                ("day_saturday", self.dishwasher.day_saturday),
                ("day_sunday", self.dishwasher.day_sunday),
            ],
        );
        if self.dishwasher.weekly_times == 0 {
            errors.push(ConfigError {
                field: "dishwasher.weekly_times".into(),
                message: "must be > 0".into(),
            });
        }

        validate_appliance(
            &mut errors,
            "freezer",
            self.freezer.saturation,
            self.freezer.power_mean_w,
            self.freezer.power_std_w,
            self.freezer.cycle_duration,
            &[
                ("season_winter", self.freezer.season_winter),
                ("season_transition", self.freezer.season_transition),
                ("season_summer", self.freezer.season_summer),
                ("day_workday", self.freezer.day_workday),
                ("day_saturday", self.freezer.day_saturday),
                ("day_sunday", self.freezer.day_sunday),
            ],
        );
        if self.freezer.shifting_windows == 0 || HOURS_OF_DAY % self.freezer.shifting_windows != 0 {
            errors.push(ConfigError {
                field: "freezer.shifting_windows".into(),
                message: "must evenly divide 24".into(),
            });
        }

        errors
    }
}

/// Shared per-appliance checks. Weight tables must leave the selector
/// something to normalize: season weights positive, weekday weights
/// non-negative with a positive sum.
fn validate_appliance(
    errors: &mut Vec<ConfigError>,
    section: &str,
    saturation: f64,
    power_mean: f64,
    power_std: f64,
    cycle: usize,
    weights: &[(&str, f64)],
) {
    if !(0.0..=1.0).contains(&saturation) {
        errors.push(ConfigError {
            field: format!("{section}.saturation"),
            message: "must be in [0.0, 1.0]".into(),
        });
    }
    if power_mean <= 0.0 {
        errors.push(ConfigError {
            field: format!("{section}.power_mean_w"),
            message: "must be > 0".into(),
        });
    }
    if power_std < 0.0 {
        errors.push(ConfigError {
            field: format!("{section}.power_std_w"),
            message: "must be >= 0".into(),
        });
    }
    if cycle == 0 || cycle > QUARTERS_OF_DAY {
        errors.push(ConfigError {
            field: format!("{section}.cycle_duration"),
            message: "must be within 1..=96".into(),
        });
    }

    let mut day_weight_sum = 0.0;
    for (name, w) in weights {
        if name.starts_with("season_") && *w <= 0.0 {
            errors.push(ConfigError {
                field: format!("{section}.{name}"),
                message: "season weights must be > 0".into(),
            });
        }
        if name.starts_with("day_") {
            if *w < 0.0 {
                errors.push(ConfigError {
                    field: format!("{section}.{name}"),
                    message: "must be >= 0".into(),
                });
            }
            day_weight_sum += w;
        }
    }
    if day_weight_sum <= 0.0 {
        errors.push(ConfigError {
            field: format!("{section}.day_workday"),
            message: "weekday weights must not all be zero".into(),
        });
    }
}
