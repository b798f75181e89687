//! Calendar helpers shared by the obligation engine and the CLI
//!
//! Dates are local calendar dates (`NaiveDate`); there is no timezone handling
//! beyond that.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

const MILLIS_PER_DAY: i64 = 86_400_000;

const MONTH_NAMES_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Build a date from a zero-based month index and a day number, rolling
/// over out-of-range values instead of rejecting them.
///
/// `month0 = 12` is January of the following year, `day = 0` is the last day
/// of the previous month, `day = 31` in a 30-day month is the 1st of the next.
/// Returns `None` only when the result falls outside chrono's calendar range.
///
/// # Examples
/// ```
/// use calendario_fiscal::utils::rolled_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(rolled_date(2024, 1, 17), NaiveDate::from_ymd_opt(2024, 2, 17));
/// assert_eq!(rolled_date(2024, 12, 17), NaiveDate::from_ymd_opt(2025, 1, 17));
/// assert_eq!(rolled_date(2023, 10, 31), NaiveDate::from_ymd_opt(2023, 12, 1));
/// ```
pub fn rolled_date(year: i32, month0: i64, day: i64) -> Option<NaiveDate> {
    let total = i64::from(year).checked_add(month0.div_euclid(12))?;
    let year = i32::try_from(total).ok()?;
    let month = u32::try_from(month0.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(TimeDelta::try_days(day - 1)?)
}

/// Whole days from `now` until midnight of `date`, rounded up.
///
/// Any moment on the deadline day itself gives 0; past deadlines are negative.
pub fn days_until(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let millis = (date.and_time(NaiveTime::MIN) - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Move a (year, 1-based month) pair by `offset` months.
pub fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + offset;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Spanish month name, or "?" outside 1..=12
pub fn month_name_es(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES_ES[(month - 1) as usize],
        _ => "?",
    }
}

/// Format a date the way SAT notices print it: "17/02/2024"
pub fn format_date_mx(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
