//! Persisted weekly reports and streak tracking.

pub mod streak;
pub mod types;

pub use streak::on_track_streak;
pub use types::WeekReport;
