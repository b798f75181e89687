use chrono::{Datelike, NaiveDateTime};
use itertools::Itertools;
use tracing::debug;

use super::expander::expand;
use super::models::{ObligationInstance, QueryOptions};
use crate::utils::{days_until, shift_month};

/// Default look-ahead window for [`upcoming`], in days
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Number of periods scanned: the current month and the next two
const SCAN_MONTHS: i32 = 3;

/// Obligations due within `within_days` of `now`, soonest first.
///
/// Expands the current period and the next two, keeps deadlines with
/// `0 <= days_remaining <= within_days`, and sorts by `days_remaining`
/// (stable: ties keep scan order).
pub fn upcoming(
    within_days: i64,
    options: &QueryOptions,
    now: NaiveDateTime,
) -> Vec<ObligationInstance> {
    let today = now.date();

    let found = (0..SCAN_MONTHS)
        .map(|offset| shift_month(today.year(), today.month(), offset))
        .flat_map(|(year, month)| expand(year, month, options, now))
        .filter_map(|mut obligation| {
            obligation.days_remaining = days_until(obligation.due_date, now);
            (0..=within_days)
                .contains(&obligation.days_remaining)
                .then_some(obligation)
        })
        .sorted_by_key(|o| o.days_remaining)
        .collect::<Vec<_>>();

    debug!(
        "{} obligation(s) due within {} day(s) of {}",
        found.len(),
        within_days,
        today
    );

    found
}
