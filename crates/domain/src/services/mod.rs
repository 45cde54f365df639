//! Domain services for the office monitor.
//!
//! Services contain business logic that operates on domain models.

pub mod aggregation;
pub mod hierarchy;
pub mod metrics;
pub mod roster;
pub mod store;

pub use aggregation::{AggregationError, HierarchyAggregator, ReportOutcome};
pub use hierarchy::{resolve_subordinates, HierarchyResolver, Resolution, ResolutionPolicy};
pub use metrics::{summarize, StatsAccumulator};
pub use roster::{RosterError, RosterTable, Subordinate, SubordinateSource};
pub use store::{ApplicationStore, InMemoryStore, OfficeDirectory, StoreError};
