//! Domain models for the office monitor.

pub mod application;
pub mod office;
pub mod roster;
pub mod stats;

pub use application::{ApplicationRecord, ApplicationStatus};
pub use office::{OfficeAccount, OfficeKey, OfficeLevel};
pub use roster::{
    MonitorRoster, OfficeDefinition, PlaceholderFigures, RecordSelector, RosterConfig,
    SourceDefinition,
};
pub use stats::{HierarchyReport, OfficeStatsSummary};
