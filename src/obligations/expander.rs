use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::catalog::{self, CatalogEntry};
use super::models::{ObligationInstance, Periodicity, QueryOptions, Regime};
use crate::utils::days_until;

/// Expand the catalog into dated obligations for the period `(year, month)`.
///
/// - Monthly templates are emitted every month.
/// - Bimonthly templates are emitted only for even months (end of a bimester).
/// - Annual templates are emitted only in their due month.
///
/// `days_remaining` is measured from `now`. `month` is not validated: values
/// outside 1..=12 roll over into neighbouring years when building dates.
pub fn expand(
    year: i32,
    month: u32,
    options: &QueryOptions,
    now: NaiveDateTime,
) -> Vec<ObligationInstance> {
    let mut obligations = Vec::new();

    for entry in catalog::bucket(options.regime) {
        if !options.wants_periodicity(entry.periodicity) || !is_due_period(entry, month) {
            continue;
        }
        expand_entry(entry, year, month, options, now, &mut obligations);
    }

    debug!(
        "Expanded {} obligation(s) for {}/{} ({})",
        obligations.len(),
        month,
        year,
        options.regime
    );

    obligations
}

/// Convenience over [`expand`] for a regime given by name; unknown names
/// fall back to the general regime.
pub fn expand_by_regime(
    regime: &str,
    year: i32,
    month: u32,
    now: NaiveDateTime,
) -> Vec<ObligationInstance> {
    let options = QueryOptions::for_regime(Regime::parse_or_general(regime));
    expand(year, month, &options, now)
}

fn is_due_period(entry: &CatalogEntry, month: u32) -> bool {
    match entry.periodicity {
        Periodicity::Monthly | Periodicity::Annual => true,
        Periodicity::Bimonthly => month % 2 == 0,
    }
}

fn expand_entry(
    entry: &CatalogEntry,
    year: i32,
    month: u32,
    options: &QueryOptions,
    now: NaiveDateTime,
    out: &mut Vec<ObligationInstance>,
) {
    for template in entry.templates {
        if !options.wants_kind(template.kind) {
            continue;
        }
        if let Some(due_month) = template.deadline.due_month() {
            if due_month != month {
                continue;
            }
        }

        let Some(due_date) = template.deadline.due_date_for_period(year, month) else {
            warn!(
                "Skipping '{}' for {}/{}: deadline outside the supported calendar",
                template.id, month, year
            );
            continue;
        };

        out.push(ObligationInstance::from_template(
            template,
            options.regime,
            entry.periodicity,
            due_date,
            days_until(due_date, now),
        ));
    }
}
