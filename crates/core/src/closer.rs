//! Closing a week end to end: assemble the snapshot, plan, commit.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, info};
use weekclose_shared::ReconcileConfig;

use crate::calendar::week_end_for;
use crate::classify::{ClassificationResult, ScenarioClassifier};
use crate::commit::{CommitResult, PlannedStep, ReconciliationCommitter, planned_steps};
use crate::error::{ReconcileError, ReconcileResult};
use crate::planner::{AllocationPlan, AllocationPlanner, UserOverrides};
use crate::ports::{GoalStore, ReportStore, SavingsBalanceStore, TransactionLedger};
use crate::recovery::RecoveryState;
use crate::report::on_track_streak;
use crate::snapshot::{WeekFigures, WeekSnapshot};

/// What closing the week would do, computed without side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPreview {
    /// Scenario and figures.
    pub classification: ClassificationResult,
    /// Proposed allocation.
    pub plan: AllocationPlan,
    /// Store calls a commit would make, in order.
    pub planned_steps: Vec<PlannedStep>,
}

/// A week that went through commit, fully or partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedWeek {
    /// Last day of the closed week.
    pub week_end: NaiveDate,
    /// Plan that was committed.
    pub plan: AllocationPlan,
    /// Outcome of each commit step.
    pub commit: CommitResult,
}

/// Week closing service over the four collaborator stores.
pub struct WeekCloser<G, S, T, R>
where
    G: GoalStore,
    S: SavingsBalanceStore,
    T: TransactionLedger,
    R: ReportStore,
{
    goals: Arc<G>,
    savings: Arc<S>,
    reports: Arc<R>,
    committer: ReconciliationCommitter<G, S, T, R>,
    planner: AllocationPlanner,
    week_starts_on: Weekday,
}

impl<G, S, T, R> WeekCloser<G, S, T, R>
where
    G: GoalStore,
    S: SavingsBalanceStore,
    T: TransactionLedger,
    R: ReportStore,
{
    /// Create a new week closer.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::AmortizationOutOfRange` if the configured
    /// default window is outside 1..=24 weeks.
    pub fn new(
        goals: Arc<G>,
        savings: Arc<S>,
        ledger: Arc<T>,
        reports: Arc<R>,
        config: &ReconcileConfig,
    ) -> ReconcileResult<Self> {
        let committer = ReconciliationCommitter::new(
            Arc::clone(&goals),
            Arc::clone(&savings),
            ledger,
            Arc::clone(&reports),
        );
        Ok(Self {
            goals,
            savings,
            reports,
            committer,
            planner: AllocationPlanner::from_config(config)?,
            week_starts_on: config.week_starts_on,
        })
    }

    /// Reads goals, recovery debt and cushion balance, and combines them
    /// with the week's figures.
    ///
    /// # Errors
    ///
    /// Returns `StoreReadFailed` if a store cannot be read, or
    /// `InvalidSnapshot` if any amount is negative.
    pub async fn load_snapshot(&self, figures: WeekFigures) -> ReconcileResult<WeekSnapshot> {
        let savings_goals = self
            .goals
            .list_active_savings_goals()
            .await
            .map_err(|source| ReconcileError::StoreReadFailed {
                what: "savings goals",
                source,
            })?;
        let debt = self
            .goals
            .list_active_recovery_debt()
            .await
            .map_err(|source| ReconcileError::StoreReadFailed {
                what: "recovery debt",
                source,
            })?;
        let balance = self
            .savings
            .get_balance()
            .await
            .map_err(|source| ReconcileError::StoreReadFailed {
                what: "savings balance",
                source,
            })?;

        debug!(
            goals = savings_goals.len(),
            has_debt = debt.is_some(),
            balance = %balance,
            "Loaded snapshot inputs"
        );
        WeekSnapshot::new(
            figures,
            RecoveryState::from_record(debt),
            balance,
            savings_goals,
        )
    }

    /// Classifies and plans an already assembled snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot or the overrides are invalid.
    pub fn preview_snapshot(
        &self,
        snapshot: &WeekSnapshot,
        overrides: &UserOverrides,
    ) -> ReconcileResult<WeekPreview> {
        let classification = ScenarioClassifier::classify(snapshot)?;
        let plan = self.planner.plan(snapshot, &classification, overrides)?;
        Ok(WeekPreview {
            classification,
            planned_steps: planned_steps(&plan),
            plan,
        })
    }

    /// Loads the snapshot and previews it. Nothing is written.
    ///
    /// # Errors
    ///
    /// See `load_snapshot` and `preview_snapshot`.
    pub async fn preview(
        &self,
        figures: WeekFigures,
        overrides: &UserOverrides,
    ) -> ReconcileResult<WeekPreview> {
        let snapshot = self.load_snapshot(figures).await?;
        self.preview_snapshot(&snapshot, overrides)
    }

    /// Closes the week containing `date_in_week`.
    ///
    /// A failed store write does not make this return `Err`: the partial
    /// outcome is in `ClosedWeek::commit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded or planned, in
    /// which case nothing was written.
    #[tracing::instrument(skip_all, fields(date = %date_in_week))]
    pub async fn close_week(
        &self,
        figures: WeekFigures,
        overrides: &UserOverrides,
        date_in_week: NaiveDate,
    ) -> ReconcileResult<ClosedWeek> {
        let week_end = week_end_for(date_in_week, self.week_starts_on);
        let preview = self.preview(figures, overrides).await?;

        info!(
            week_end = %week_end,
            scenario = %preview.classification.scenario,
            steps = preview.planned_steps.len(),
            "Closing week"
        );
        for step in &preview.planned_steps {
            debug!(stage = %step.stage, amount = ?step.amount, "Planned step");
        }

        let commit = self.committer.commit(&preview.plan, week_end).await;
        Ok(ClosedWeek {
            week_end,
            plan: preview.plan,
            commit,
        })
    }

    /// Consecutive on-track weeks among the latest `limit` reports.
    ///
    /// # Errors
    ///
    /// Returns `StoreReadFailed` if the reports cannot be read.
    pub async fn on_track_streak(&self, limit: usize) -> ReconcileResult<u32> {
        let reports =
            self.reports
                .recent(limit)
                .await
                .map_err(|source| ReconcileError::StoreReadFailed {
                    what: "weekly reports",
                    source,
                })?;
        Ok(on_track_streak(&reports))
    }
}
