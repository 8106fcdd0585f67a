//! Calendar discretization shared by the scheduling engine.
//!
//! A simulated week is 7 days of 96 quarter-hour slots. Absolute
//! simulation hours are plain `usize` indices counted from the start of
//! the run; day 0 is a Monday.

/// Days in one simulated week.
pub const DAYS_OF_WEEK: usize = 7;

/// Quarter-hour slots in one day.
pub const QUARTERS_OF_DAY: usize = 96;

/// Hours in one day.
pub const HOURS_OF_DAY: usize = 24;

/// Quarter-hour slots in one hour.
pub const QUARTERS_OF_HOUR: usize = 4;

/// Season of the simulated week, used by the usage probability tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Transition,
    Summer,
}

impl Season {
    /// Parses a season from its lowercase config name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "winter" => Some(Season::Winter),
            "transition" => Some(Season::Transition),
            "summer" => Some(Season::Summer),
            _ => None,
        }
    }

    /// Lowercase name used in config files and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Transition => "transition",
            Season::Summer => "summer",
        }
    }
}

/// Weekday class distinguishing weekday/weekend usage patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Workday,
    Saturday,
    Sunday,
}

/// Maps a day-of-week index (0 = Monday) to its weekday class.
///
/// # Panics
///
/// Panics if `day >= DAYS_OF_WEEK`; out-of-range days are a programming
/// error, not a runtime condition.
pub fn day_kind(day: usize) -> DayKind {
    match day {
        0..=4 => DayKind::Workday,
        5 => DayKind::Saturday,
        6 => DayKind::Sunday,
        _ => panic!("day index out of range: {day}"),
    }
}
