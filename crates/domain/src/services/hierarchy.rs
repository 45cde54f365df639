//! Subordinate office resolution for monitor accounts.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::roster::{RosterTable, Subordinate};
use crate::models::{OfficeAccount, OfficeKey};

/// Which policy produced a monitor's subordinate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Scanned from the office directory by monitored level.
    Directory,
    /// Taken from a configured roster.
    FixedRoster,
}

impl ResolutionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::FixedRoster => "fixed_roster",
        }
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a monitor's subordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Directory(Vec<OfficeKey>),
    FixedRoster(&'a [Subordinate]),
}

impl Resolution<'_> {
    pub fn policy(&self) -> ResolutionPolicy {
        match self {
            Self::Directory(_) => ResolutionPolicy::Directory,
            Self::FixedRoster(_) => ResolutionPolicy::FixedRoster,
        }
    }
}

/// Directory policy: every non-monitor office at a monitored level, in
/// first-seen order, one entry per `(level, name)`.
pub fn resolve_subordinates(monitor: &OfficeAccount, all_offices: &[OfficeAccount]) -> Vec<OfficeKey> {
    let mut seen = HashSet::new();
    all_offices
        .iter()
        .filter(|office| !office.is_monitor && monitor.monitors_level(office.office_level))
        .map(OfficeAccount::key)
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Picks the fixed roster when one is configured for the monitor's office,
/// otherwise falls back to the directory policy.
#[derive(Debug, Clone)]
pub struct HierarchyResolver {
    rosters: Arc<RosterTable>,
}

impl HierarchyResolver {
    pub fn new(rosters: Arc<RosterTable>) -> Self {
        Self { rosters }
    }

    pub fn resolve<'a>(&'a self, monitor: &OfficeAccount, all_offices: &[OfficeAccount]) -> Resolution<'a> {
        match self.rosters.roster_for(&monitor.office_name) {
            Some(entries) => Resolution::FixedRoster(entries),
            None => Resolution::Directory(resolve_subordinates(monitor, all_offices)),
        }
    }
}
