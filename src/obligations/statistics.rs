use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::expander::expand;
use super::models::{ObligationKind, QueryOptions};

/// Obligation counts for one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearlyStatistics {
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "totalObligaciones")]
    pub total_obligations: usize,
    /// Count per month, keys 1..=12
    #[serde(rename = "porMes")]
    pub by_month: BTreeMap<u32, usize>,
    /// Count per kind; every kind is present, zero included
    #[serde(rename = "porTipo")]
    pub by_kind: BTreeMap<ObligationKind, usize>,
    #[serde(rename = "promedioMensual")]
    pub monthly_average: Decimal,
}

/// Statistics for `year` under the default options (general regime, no filters).
pub fn yearly_statistics(year: i32, now: NaiveDateTime) -> YearlyStatistics {
    yearly_statistics_for(year, &QueryOptions::default(), now)
}

/// Statistics for `year` under arbitrary options.
pub fn yearly_statistics_for(
    year: i32,
    options: &QueryOptions,
    now: NaiveDateTime,
) -> YearlyStatistics {
    let mut total_obligations = 0;
    let mut by_month = BTreeMap::new();
    let mut by_kind: BTreeMap<ObligationKind, usize> =
        ObligationKind::ALL.iter().map(|kind| (*kind, 0)).collect();

    for month in 1..=12 {
        let obligations = expand(year, month, options, now);
        by_month.insert(month, obligations.len());
        total_obligations += obligations.len();

        for obligation in &obligations {
            *by_kind.entry(obligation.kind).or_insert(0) += 1;
        }
    }

    let monthly_average = (Decimal::from(total_obligations) / Decimal::from(12))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    info!(
        "{} obligation(s) in {} for {} (avg {}/month)",
        total_obligations, year, options.regime, monthly_average
    );

    YearlyStatistics {
        year,
        total_obligations,
        by_month,
        by_kind,
        monthly_average,
    }
}
