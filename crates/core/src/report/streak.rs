//! On-track streaks.

use super::types::WeekReport;

/// Longest gap between two consecutive week ends that keeps a streak alive.
const MAX_GAP_DAYS: i64 = 7;

/// Counts consecutive on-track weeks ending at the most recent report.
///
/// Input order does not matter. A missing week (gap of more than seven
/// days between week ends) breaks the streak.
#[must_use]
pub fn on_track_streak(reports: &[WeekReport]) -> u32 {
    let mut sorted: Vec<&WeekReport> = reports.iter().collect();
    sorted.sort_by(|a, b| b.week_end.cmp(&a.week_end));

    let mut streak = 0;
    let mut previous: Option<&WeekReport> = None;
    for report in sorted {
        if !report.is_on_track() {
            break;
        }
        if let Some(newer) = previous
            && (newer.week_end - report.week_end).num_days() > MAX_GAP_DAYS
        {
            break;
        }
        streak += 1;
        previous = Some(report);
    }
    streak
}
