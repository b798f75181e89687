use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::expander::expand;
use super::models::QueryOptions;

/// Whether `date` is the deadline of an obligation expanded for the period
/// `(date.year(), date.month())`.
///
/// Only that one period is expanded, so recurring obligations (due the month
/// after their period) never match here; annual deadlines do.
pub fn is_deadline(date: NaiveDate, options: &QueryOptions, now: NaiveDateTime) -> bool {
    expand(date.year(), date.month(), options, now)
        .iter()
        .any(|obligation| obligation.due_date == date)
}
