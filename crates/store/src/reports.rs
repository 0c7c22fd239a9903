//! In-memory weekly report store.

use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::debug;
use weekclose_core::ports::ReportStore;
use weekclose_core::report::WeekReport;
use weekclose_shared::StoreResult;

/// Reports keyed by week end; closing the same week twice replaces its report.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: DashMap<NaiveDate, WeekReport>,
}

impl MemoryReportStore {
    /// Creates a store seeded with past reports.
    #[must_use]
    pub fn new(history: Vec<WeekReport>) -> Self {
        Self {
            reports: history
                .into_iter()
                .map(|report| (report.week_end, report))
                .collect(),
        }
    }

    /// Report for a given week.
    #[must_use]
    pub fn get(&self, week_end: NaiveDate) -> Option<WeekReport> {
        self.reports.get(&week_end).map(|entry| entry.value().clone())
    }
}

impl ReportStore for MemoryReportStore {
    async fn upsert(&self, report: WeekReport) -> StoreResult<()> {
        debug!(week_end = %report.week_end, scenario = %report.scenario, "Report upserted");
        self.reports.insert(report.week_end, report);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<WeekReport>> {
        let mut reports: Vec<WeekReport> = self
            .reports
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        reports.sort_by(|a, b| b.week_end.cmp(&a.week_end));
        reports.truncate(limit);
        Ok(reports)
    }
}
