//! Validated, resolved roster table.
//!
//! [`RosterTable::from_config`] checks a [`RosterConfig`] and resolves every
//! catalogue reference into a tree of [`Subordinate`] entries, so report
//! building never has to look anything up or fail on configuration.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::{
    OfficeKey, PlaceholderFigures, RecordSelector, RosterConfig, SourceDefinition,
};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Roster for {0:?} lists no subordinates")]
    EmptyRoster(String),

    #[error("Roster for {0:?} is defined more than once")]
    DuplicateMonitor(String),

    #[error("Office {0} is defined more than once")]
    DuplicateOffice(String),

    #[error("{referenced_by} references undefined office {key}")]
    UnknownOffice { referenced_by: String, key: String },

    #[error("{referenced_by} lists {key} more than once")]
    DuplicateReference { referenced_by: String, key: String },

    #[error("Roll-up {0} has no children")]
    EmptyRollUp(String),

    #[error("Roll-up cycle through {0}")]
    Cycle(String),

    #[error("Invalid figures for {office}: {source}")]
    InvalidFigures {
        office: String,
        #[source]
        source: ValidationErrors,
    },

    #[error("Invalid selector for {office}: {source}")]
    InvalidSelector {
        office: String,
        #[source]
        source: ValidationErrors,
    },
}

/// One resolved entry in a monitor's roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Subordinate {
    pub key: OfficeKey,
    pub source: SubordinateSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubordinateSource {
    Live(RecordSelector),
    Placeholder(PlaceholderFigures),
    RollUp(Vec<Subordinate>),
}

/// Fixed-composition rosters keyed by monitor office name.
#[derive(Debug, Clone, Default)]
pub struct RosterTable {
    rosters: HashMap<String, Vec<Subordinate>>,
}

impl RosterTable {
    /// A table with no fixed rosters; every monitor uses the directory.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_config(config: RosterConfig) -> Result<Self, RosterError> {
        let mut catalogue: HashMap<OfficeKey, &SourceDefinition> = HashMap::new();
        for definition in &config.offices {
            validate_definition(&definition.key, &definition.source)?;
            if catalogue.insert(definition.key.clone(), &definition.source).is_some() {
                return Err(RosterError::DuplicateOffice(definition.key.to_string()));
            }
        }

        let mut rosters = HashMap::new();
        for monitor in &config.monitors {
            if monitor.subordinates.is_empty() {
                return Err(RosterError::EmptyRoster(monitor.office_name.clone()));
            }
            check_unique(&monitor.office_name, &monitor.subordinates)?;

            let mut entries = Vec::with_capacity(monitor.subordinates.len());
            for key in &monitor.subordinates {
                let mut path = Vec::new();
                entries.push(resolve(key, &monitor.office_name, &catalogue, &mut path)?);
            }

            if rosters.insert(monitor.office_name.clone(), entries).is_some() {
                return Err(RosterError::DuplicateMonitor(monitor.office_name.clone()));
            }
        }

        Ok(Self { rosters })
    }

    /// The fixed roster for a monitor office, if one is configured.
    pub fn roster_for(&self, monitor_office: &str) -> Option<&[Subordinate]> {
        self.rosters.get(monitor_office).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }
}

fn validate_definition(key: &OfficeKey, source: &SourceDefinition) -> Result<(), RosterError> {
    match source {
        SourceDefinition::Live {
            selector: Some(selector),
        } => selector.validate().map_err(|source| RosterError::InvalidSelector {
            office: key.to_string(),
            source,
        }),
        SourceDefinition::Live { selector: None } => Ok(()),
        SourceDefinition::Placeholder(figures) => {
            figures.validate().map_err(|source| RosterError::InvalidFigures {
                office: key.to_string(),
                source,
            })
        }
        SourceDefinition::RollUp { children } => {
            if children.is_empty() {
                return Err(RosterError::EmptyRollUp(key.to_string()));
            }
            check_unique(&key.to_string(), children)
        }
    }
}

fn check_unique(owner: &str, keys: &[OfficeKey]) -> Result<(), RosterError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(RosterError::DuplicateReference {
                referenced_by: owner.to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn resolve(
    key: &OfficeKey,
    referenced_by: &str,
    catalogue: &HashMap<OfficeKey, &SourceDefinition>,
    path: &mut Vec<OfficeKey>,
) -> Result<Subordinate, RosterError> {
    if path.contains(key) {
        return Err(RosterError::Cycle(key.to_string()));
    }

    let source = catalogue
        .get(key)
        .ok_or_else(|| RosterError::UnknownOffice {
            referenced_by: referenced_by.to_string(),
            key: key.to_string(),
        })?;

    let source = match source {
        SourceDefinition::Live { selector } => SubordinateSource::Live(
            selector
                .clone()
                .unwrap_or_else(|| RecordSelector::exact(key)),
        ),
        SourceDefinition::Placeholder(figures) => SubordinateSource::Placeholder(figures.clone()),
        SourceDefinition::RollUp { children } => {
            path.push(key.clone());
            let owner = key.to_string();
            let resolved = children
                .iter()
                .map(|child| resolve(child, &owner, catalogue, path))
                .collect::<Result<Vec<_>, _>>()?;
            path.pop();
            SubordinateSource::RollUp(resolved)
        }
    };

    Ok(Subordinate {
        key: key.clone(),
        source,
    })
}
