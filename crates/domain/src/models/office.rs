//! Administrative offices and the official accounts that represent them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Level of an office in the administrative hierarchy.
///
/// Ordered from the lowest (ward) to the highest (national) level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfficeLevel {
    Local,
    #[serde(alias = "metropolitan")]
    Municipal,
    District,
    Province,
    National,
}

impl OfficeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Municipal => "municipal",
            Self::District => "district",
            Self::Province => "province",
            Self::National => "national",
        }
    }
}

impl fmt::Display for OfficeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfficeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "municipal" | "metropolitan" => Ok(Self::Municipal),
            "district" => Ok(Self::District),
            "province" => Ok(Self::Province),
            "national" => Ok(Self::National),
            other => Err(format!("Unknown office level: {}", other)),
        }
    }
}

/// Composite identity of an office: level plus exact name.
///
/// Rendered as `"<level>:<name>"`, which is also the `office_id` used in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfficeKey {
    pub level: OfficeLevel,
    pub name: String,
}

impl OfficeKey {
    pub fn new(level: OfficeLevel, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
        }
    }
}

impl fmt::Display for OfficeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.name)
    }
}

impl FromStr for OfficeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, name) = s
            .split_once(':')
            .ok_or_else(|| format!("Office key must look like <level>:<name>, got {:?}", s))?;
        if name.is_empty() {
            return Err(format!("Office key {:?} has an empty name", s));
        }
        Ok(Self::new(level.parse()?, name))
    }
}

impl Serialize for OfficeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OfficeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An official account as listed in the office directory.
///
/// Monitor accounts are offices too, but they never count as another
/// monitor's subordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeAccount {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub office_level: OfficeLevel,
    pub office_name: String,
    #[serde(default)]
    pub is_monitor: bool,
    /// Levels this account aggregates; only meaningful for monitors.
    #[serde(default)]
    pub monitors: Vec<OfficeLevel>,
}

impl OfficeAccount {
    /// Create a regular (non-monitor) official account.
    pub fn official(level: OfficeLevel, office_name: impl Into<String>) -> Self {
        let office_name = office_name.into();
        Self {
            id: Uuid::new_v4(),
            full_name: format!("{} Officer", office_name),
            email: format!("officer-{}@gov.example", Uuid::new_v4().simple()),
            office_level: level,
            office_name,
            is_monitor: false,
            monitors: Vec::new(),
        }
    }

    /// Create a monitor account aggregating the given levels.
    pub fn monitor(
        level: OfficeLevel,
        office_name: impl Into<String>,
        monitors: impl IntoIterator<Item = OfficeLevel>,
    ) -> Self {
        let mut account = Self::official(level, office_name);
        account.is_monitor = true;
        for level in monitors {
            if !account.monitors.contains(&level) {
                account.monitors.push(level);
            }
        }
        account
    }

    pub fn key(&self) -> OfficeKey {
        OfficeKey::new(self.office_level, self.office_name.clone())
    }

    /// Whether this account is authorized to aggregate the given level.
    pub fn monitors_level(&self, level: OfficeLevel) -> bool {
        self.monitors.contains(&level)
    }
}
