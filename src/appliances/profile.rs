//! Statistical and physical appliance profiles.

use crate::calendar::{DayKind, Season, day_kind};

/// Usage-likelihood weights per season.
///
/// Weights are relative, not probabilities; the weekly selector
/// normalizes them together with the weekday weights.
#[derive(Debug, Clone, Copy)]
pub struct SeasonWeights {
    pub winter: f64,
    pub transition: f64,
    pub summer: f64,
}

impl SeasonWeights {
    pub fn weight(&self, season: Season) -> f64 {
        match season {
            Season::Winter => self.winter,
            Season::Transition => self.transition,
            Season::Summer => self.summer,
        }
    }
}

/// Usage-likelihood weights per weekday class (Mon–Fri share one weight,
/// Saturday and Sunday have their own).
#[derive(Debug, Clone, Copy)]
pub struct DayWeights {
    pub workday: f64,
    pub saturday: f64,
    pub sunday: f64,
}

impl DayWeights {
    pub fn weight(&self, day: usize) -> f64 {
        match day_kind(day) {
            DayKind::Workday => self.workday,
            DayKind::Saturday => self.saturday,
            DayKind::Sunday => self.sunday,
        }
    }
}

/// Sampled profile of one appliance instance.
///
/// Created once per household at initialization; the Gaussian-sampled
/// fields (`power`, `consumption_share`) are drawn through the shared
/// random source so runs reproduce from a fixed seed.
#[derive(Debug, Clone)]
pub struct ApplianceProfile {
    /// Probability a household owns this appliance, 0–1.
    pub saturation: f64,
    /// Fraction of household base load attributable to this appliance.
    pub consumption_share: f64,
    /// Fixed base-load share constant.
    pub base_load_share: f64,
    /// Operating power in watts.
    pub power: i32,
    /// Slots one operation occupies.
    pub cycle_duration: usize,
    /// Target weekly activations (unused by fixed-periodic appliances).
    pub times: usize,
    /// Whether activation tickets must respect the possibility mask.
    pub occupancy_dependent: bool,
    pub season_weights: SeasonWeights,
    pub day_weights: DayWeights,
}

impl ApplianceProfile {
    /// Combined selection weight of a day under the active season.
    pub fn day_weight(&self, season: Season, day: usize) -> f64 {
        self.season_weights.weight(season) * self.day_weights.weight(day)
    }
}
