//! Hierarchy aggregation: resolver, store and calculator combined into the
//! report a monitor sees.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::hierarchy::{HierarchyResolver, Resolution, ResolutionPolicy};
use super::metrics::{placeholder_summary, StatsAccumulator};
use super::roster::{RosterTable, Subordinate, SubordinateSource};
use super::store::{ApplicationStore, OfficeDirectory, StoreError};
use crate::models::{ApplicationRecord, HierarchyReport, OfficeAccount, OfficeKey, OfficeStatsSummary};

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A finished report plus the policy that shaped it.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub policy: ResolutionPolicy,
    pub report: HierarchyReport,
}

/// Builds monitor reports from a fresh store snapshot on every call.
#[derive(Clone)]
pub struct HierarchyAggregator {
    applications: Arc<dyn ApplicationStore>,
    directory: Arc<dyn OfficeDirectory>,
    resolver: HierarchyResolver,
}

impl HierarchyAggregator {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        directory: Arc<dyn OfficeDirectory>,
        rosters: Arc<RosterTable>,
    ) -> Self {
        Self {
            applications,
            directory,
            resolver: HierarchyResolver::new(rosters),
        }
    }

    pub async fn build_report(&self, monitor: &OfficeAccount) -> Result<HierarchyReport, AggregationError> {
        self.build_report_with_policy(monitor).await.map(|outcome| outcome.report)
    }

    /// Same as [`build_report`](Self::build_report), also returning the policy used.
    pub async fn build_report_with_policy(
        &self,
        monitor: &OfficeAccount,
    ) -> Result<ReportOutcome, AggregationError> {
        if !monitor.is_monitor {
            return Err(AggregationError::Forbidden(
                "Only monitoring accounts can access this endpoint".to_string(),
            ));
        }

        let records = self.applications.get_all_applications().await?;
        let offices = self.directory.get_all_officials().await?;

        let resolution = self.resolver.resolve(monitor, &offices);
        let policy = resolution.policy();

        let (subordinate_offices, overall) = match resolution {
            Resolution::Directory(keys) => directory_report(monitor, &keys, &records),
            Resolution::FixedRoster(entries) => roster_report(entries, &records),
        };

        let report = HierarchyReport {
            monitor_office: monitor.office_name.clone(),
            monitor_level: monitor.office_level,
            total_subordinates: subordinate_offices.len(),
            total_applications: overall.total,
            overall_efficiency: overall.efficiency(),
            subordinate_offices,
        };

        info!(
            monitor_office = %report.monitor_office,
            monitor_level = %report.monitor_level,
            policy = %policy,
            subordinates = report.total_subordinates,
            total_applications = report.total_applications,
            "Built hierarchy report"
        );

        Ok(ReportOutcome { policy, report })
    }

    /// Summary of a single office's own applications.
    pub async fn office_summary(&self, office: &OfficeAccount) -> Result<OfficeStatsSummary, AggregationError> {
        let records = self
            .applications
            .get_applications_by_office(office.office_level, &office.office_name)
            .await?;
        Ok(StatsAccumulator::from_records(&records).finish(&office.key()))
    }
}

/// Per-office summaries attributed by exact key; the overall figure covers
/// every record at a monitored level, attributed or not.
fn directory_report(
    monitor: &OfficeAccount,
    keys: &[OfficeKey],
    records: &[ApplicationRecord],
) -> (Vec<OfficeStatsSummary>, StatsAccumulator) {
    let index: HashMap<&OfficeKey, usize> = keys.iter().enumerate().map(|(i, k)| (k, i)).collect();
    let mut buckets = vec![StatsAccumulator::new(); keys.len()];
    let mut overall = StatsAccumulator::new();
    let mut unattributed = 0usize;

    for record in records {
        if !monitor.monitors_level(record.office_level) {
            continue;
        }
        overall.record(record);
        match index.get(&record.office_key()) {
            Some(&slot) => buckets[slot].record(record),
            None => unattributed += 1,
        }
    }

    if unattributed > 0 {
        debug!(
            monitor_office = %monitor.office_name,
            unattributed,
            "Records at monitored levels with no matching directory office"
        );
    }

    let summaries = keys
        .iter()
        .zip(&buckets)
        .map(|(key, acc)| acc.finish(key))
        .collect();
    (summaries, overall)
}

/// One summary per roster entry; the overall figure is their field-wise sum.
fn roster_report(
    entries: &[Subordinate],
    records: &[ApplicationRecord],
) -> (Vec<OfficeStatsSummary>, StatsAccumulator) {
    let mut overall = StatsAccumulator::new();
    let summaries = entries
        .iter()
        .map(|entry| {
            let (summary, acc) = evaluate(entry, records);
            overall.merge(&acc);
            summary
        })
        .collect();
    (summaries, overall)
}

fn evaluate(entry: &Subordinate, records: &[ApplicationRecord]) -> (OfficeStatsSummary, StatsAccumulator) {
    match &entry.source {
        SubordinateSource::Live(selector) => {
            let acc = StatsAccumulator::from_records(records.iter().filter(|r| selector.matches(r)));
            (acc.finish(&entry.key), acc)
        }
        SubordinateSource::Placeholder(figures) => (
            placeholder_summary(&entry.key, figures),
            StatsAccumulator::from_placeholder(figures),
        ),
        SubordinateSource::RollUp(children) => {
            let mut acc = StatsAccumulator::new();
            for child in children {
                acc.merge(&evaluate(child, records).1);
            }
            (acc.finish(&entry.key), acc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ApplicationStatus, MonitorRoster, OfficeDefinition, OfficeLevel, PlaceholderFigures,
        RecordSelector, RosterConfig, SourceDefinition,
    };
    use crate::services::store::InMemoryStore;
    use std::collections::BTreeMap;

    fn ward(id: &str, name: &str) -> ApplicationRecord {
        ApplicationRecord::new(id, OfficeLevel::Local, name, "2024-01-01")
    }

    fn aggregator(store: Arc<InMemoryStore>, rosters: RosterTable) -> HierarchyAggregator {
        HierarchyAggregator::new(store.clone(), store, Arc::new(rosters))
    }

    fn figures(total: i64, completed: i64, pending: i64, in_progress: i64) -> PlaceholderFigures {
        PlaceholderFigures {
            total_applications: total,
            completed,
            pending,
            rejected: total - completed - pending,
            in_progress,
            efficiency: Some(90.0),
            avg_processing_time: 4.2,
            applications_by_type: BTreeMap::from([("national-id".to_string(), total)]),
        }
    }

    fn kaski_rosters() -> RosterTable {
        let config = RosterConfig {
            offices: vec![
                OfficeDefinition {
                    key: "municipal:Pokhara".parse().unwrap(),
                    source: SourceDefinition::Live {
                        selector: Some(RecordSelector::containing(
                            OfficeLevel::Local,
                            "Pokhara Ward Office",
                        )),
                    },
                },
                OfficeDefinition {
                    key: "municipal:Annapurna".parse().unwrap(),
                    source: SourceDefinition::Placeholder(figures(100, 80, 15, 10)),
                },
                OfficeDefinition {
                    key: "district:Kaski".parse().unwrap(),
                    source: SourceDefinition::RollUp {
                        children: vec![
                            "municipal:Pokhara".parse().unwrap(),
                            "municipal:Annapurna".parse().unwrap(),
                        ],
                    },
                },
                OfficeDefinition {
                    key: "district:Baglung".parse().unwrap(),
                    source: SourceDefinition::Placeholder(figures(50, 40, 8, 5)),
                },
            ],
            monitors: vec![
                MonitorRoster {
                    office_name: "Kaski District Monitor".to_string(),
                    subordinates: vec![
                        "municipal:Pokhara".parse().unwrap(),
                        "municipal:Annapurna".parse().unwrap(),
                    ],
                },
                MonitorRoster {
                    office_name: "Gandaki Province Monitor".to_string(),
                    subordinates: vec![
                        "district:Kaski".parse().unwrap(),
                        "district:Baglung".parse().unwrap(),
                    ],
                },
            ],
        };
        RosterTable::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_non_monitor_is_forbidden() {
        let store = Arc::new(InMemoryStore::new());
        store.set_unavailable(true);
        let service = aggregator(store, RosterTable::empty());

        let official = OfficeAccount::official(OfficeLevel::Local, "Ward 1");
        let result = service.build_report(&official).await;

        assert!(matches!(
            result,
            Err(AggregationError::Forbidden(msg)) if msg == "Only monitoring accounts can access this endpoint"
        ));
    }

    #[tokio::test]
    async fn test_directory_report_attributes_by_exact_key() {
        let monitor = OfficeAccount::monitor(OfficeLevel::Municipal, "Pokhara Monitor", [OfficeLevel::Local]);
        let store = Arc::new(InMemoryStore::with_data(
            vec![
                monitor.clone(),
                OfficeAccount::official(OfficeLevel::Local, "Ward 1"),
                OfficeAccount::official(OfficeLevel::Local, "Ward 2"),
                OfficeAccount::official(OfficeLevel::Municipal, "Pokhara"),
            ],
            vec![
                ward("a", "Ward 1").completed_on("2024-01-05"),
                ward("b", "Ward 1"),
                ward("c", "Ward 2").with_status(ApplicationStatus::InProgress),
                ward("d", "Ward 99"),
                ApplicationRecord::new("e", OfficeLevel::Municipal, "Pokhara", "2024-01-01"),
            ],
        ));
        let service = aggregator(store, RosterTable::empty());

        let report = service.build_report(&monitor).await.unwrap();

        assert_eq!(report.monitor_office, "Pokhara Monitor");
        assert_eq!(report.monitor_level, OfficeLevel::Municipal);
        assert_eq!(report.total_subordinates, 2);
        assert_eq!(report.subordinate_offices[0].office_id, "local:Ward 1");
        assert_eq!(report.subordinate_offices[0].total_applications, 2);
        assert_eq!(report.subordinate_offices[0].avg_processing_time, 4.0);
        assert_eq!(report.subordinate_offices[1].in_progress, 1);
        // Ward 99 has no directory entry but still counts at the top level.
        assert_eq!(report.total_applications, 4);
        assert_eq!(report.overall_efficiency, 25.0);
    }

    #[tokio::test]
    async fn test_directory_report_includes_offices_without_records() {
        let monitor = OfficeAccount::monitor(OfficeLevel::District, "Kaski Monitor", [OfficeLevel::Municipal]);
        let store = Arc::new(InMemoryStore::with_data(
            vec![OfficeAccount::official(OfficeLevel::Municipal, "Madi")],
            Vec::new(),
        ));
        let service = aggregator(store, RosterTable::empty());

        let report = service.build_report(&monitor).await.unwrap();

        assert_eq!(report.total_subordinates, 1);
        assert_eq!(report.subordinate_offices[0].total_applications, 0);
        assert_eq!(report.subordinate_offices[0].efficiency, 0.0);
        assert_eq!(report.overall_efficiency, 0.0);
    }

    #[tokio::test]
    async fn test_fixed_roster_live_and_placeholder() {
        let monitor = OfficeAccount::monitor(
            OfficeLevel::District,
            "Kaski District Monitor",
            [OfficeLevel::Municipal],
        );
        let store = Arc::new(InMemoryStore::with_data(
            vec![monitor.clone()],
            vec![
                ward("a", "Pokhara Ward Office 1").completed_on("2024-01-03"),
                ward("b", "Pokhara Ward Office 7"),
                ward("c", "Lekhnath Ward Office 1"),
            ],
        ));
        let service = aggregator(store, kaski_rosters());

        let outcome = service.build_report_with_policy(&monitor).await.unwrap();
        let report = outcome.report;

        assert_eq!(outcome.policy, ResolutionPolicy::FixedRoster);
        assert_eq!(report.total_subordinates, 2);

        let pokhara = &report.subordinate_offices[0];
        assert_eq!(pokhara.office_id, "municipal:Pokhara");
        assert_eq!(pokhara.total_applications, 2);
        assert_eq!(pokhara.efficiency, 50.0);
        assert_eq!(pokhara.avg_processing_time, 2.0);

        let annapurna = &report.subordinate_offices[1];
        assert_eq!(annapurna.total_applications, 100);
        assert_eq!(annapurna.efficiency, 90.0);
        assert_eq!(annapurna.avg_processing_time, 4.2);

        assert_eq!(report.total_applications, 102);
        assert_eq!(report.overall_efficiency, 79.41);
    }

    #[tokio::test]
    async fn test_roll_up_sums_children_and_recomputes_ratios() {
        let monitor = OfficeAccount::monitor(
            OfficeLevel::Province,
            "Gandaki Province Monitor",
            [OfficeLevel::District],
        );
        let store = Arc::new(InMemoryStore::with_data(
            vec![monitor.clone()],
            vec![
                ward("a", "Pokhara Ward Office 1")
                    .with_service_type("birth-certificate")
                    .completed_on("2024-01-07"),
                ward("b", "Pokhara Ward Office 2").with_status(ApplicationStatus::InProgress),
            ],
        ));
        let service = aggregator(store, kaski_rosters());

        let report = service.build_report(&monitor).await.unwrap();
        let kaski = &report.subordinate_offices[0];

        assert_eq!(kaski.office_id, "district:Kaski");
        assert_eq!(kaski.total_applications, 102);
        assert_eq!(kaski.completed, 81);
        assert_eq!(kaski.pending, 16);
        assert_eq!(kaski.in_progress, 11);
        assert_eq!(kaski.efficiency, 79.41);
        // Only the live record carries timing.
        assert_eq!(kaski.avg_processing_time, 6.0);
        assert_eq!(kaski.applications_by_type.get("national-id"), Some(&100));
        assert_eq!(kaski.applications_by_type.get("birth-certificate"), Some(&1));
        assert_eq!(kaski.applications_by_type.get("unknown"), Some(&1));

        let children_total: i64 = report.subordinate_offices.iter().map(|s| s.total_applications).sum();
        assert_eq!(report.total_applications, children_total);
        assert_eq!(report.total_applications, 152);
    }

    #[tokio::test]
    async fn test_report_is_idempotent() {
        let monitor = OfficeAccount::monitor(OfficeLevel::Municipal, "Pokhara Monitor", [OfficeLevel::Local]);
        let store = Arc::new(InMemoryStore::with_data(
            vec![
                OfficeAccount::official(OfficeLevel::Local, "Ward 1"),
                OfficeAccount::official(OfficeLevel::Local, "Ward 2"),
            ],
            vec![
                ward("a", "Ward 1").completed_on("2024-01-05"),
                ward("b", "Ward 2").with_approved(false),
            ],
        ));
        let service = aggregator(store, RosterTable::empty());

        let first = service.build_report(&monitor).await.unwrap();
        let second = service.build_report(&monitor).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let monitor = OfficeAccount::monitor(OfficeLevel::National, "National Monitor", [OfficeLevel::Province]);
        let store = Arc::new(InMemoryStore::new());
        store.set_unavailable(true);
        let service = aggregator(store, RosterTable::empty());

        let result = service.build_report(&monitor).await;
        assert!(matches!(
            result,
            Err(AggregationError::Store(StoreError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_office_summary_uses_own_records() {
        let office = OfficeAccount::official(OfficeLevel::Local, "Ward 1");
        let store = Arc::new(InMemoryStore::with_data(
            vec![office.clone()],
            vec![
                ward("a", "Ward 1").completed_on("2024-01-05"),
                ward("b", "Ward 1").with_status(ApplicationStatus::Rejected),
                ward("c", "Ward 1"),
                ward("d", "Ward 2"),
            ],
        ));
        let service = aggregator(store, RosterTable::empty());

        let summary = service.office_summary(&office).await.unwrap();
        assert_eq!(summary.office_id, "local:Ward 1");
        assert_eq!(summary.total_applications, 3);
        assert_eq!(summary.efficiency, 33.33);
        assert_eq!(summary.avg_processing_time, 4.0);
    }
}
