//! The immutable input to one week-closing run.

pub mod types;

pub use types::{SavingsGoalRef, WeekFigures, WeekSnapshot};
