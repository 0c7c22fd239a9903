//! Budgeting week boundaries.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

/// First day of the week containing `date`.
#[must_use]
pub fn week_start_for(date: NaiveDate, starts_on: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7 - starts_on.num_days_from_monday()) % 7;
    date - TimeDelta::days(i64::from(offset))
}

/// Last day of the week containing `date`. Ledger entries of a closed week carry this date.
#[must_use]
pub fn week_end_for(date: NaiveDate, starts_on: Weekday) -> NaiveDate {
    week_start_for(date, starts_on) + TimeDelta::days(6)
}
