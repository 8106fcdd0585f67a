//! Appliance operation-and-shifting engine.

/// The appliance record and its weekly refresh cycle.
pub mod appliance;
/// Daily duty-cycle load filling.
pub mod filler;
/// Occupancy-derived feasibility masks.
pub mod possibility;
/// Statistical appliance profiles and probability tables.
pub mod profile;
/// Weighted weekly activation selection.
pub mod selector;
/// Price-driven load re-timing.
pub mod shifting;
pub mod types;

// Re-export the main types for convenience
pub use appliance::Appliance;
pub use filler::DutyCycle;
pub use possibility::PossibilityRule;
pub use profile::ApplianceProfile;
pub use shifting::ShiftingPolicy;
pub use types::Occupancy;
pub use types::PresenceGrid;
pub use types::ScheduleError;
