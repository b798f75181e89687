//! Static catalog of SAT obligation templates
//!
//! One row per (regime, periodicity) pair. The table is built at compile time
//! and never mutated.

use itertools::Itertools;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::models::{DeadlineRule, ObligationKind, ObligationTemplate, Periodicity, Regime};
use crate::error::CalendarError;

/// Templates of one regime for one periodicity
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub regime: Regime,
    pub periodicity: Periodicity,
    pub templates: &'static [ObligationTemplate],
}

const GENERAL_MONTHLY: &[ObligationTemplate] = &[
    ObligationTemplate {
        id: "iva-mensual",
        name: "Declaración mensual de IVA",
        description: "Declaración mensual del Impuesto al Valor Agregado",
        kind: ObligationKind::Declaration,
        deadline: DeadlineRule::Recurring { due_day: 17 },
        form_code: "A-29",
    },
    ObligationTemplate {
        id: "isr-provisional",
        name: "ISR Provisional",
        description: "Pago provisional del Impuesto Sobre la Renta",
        kind: ObligationKind::Payment,
        deadline: DeadlineRule::Recurring { due_day: 17 },
        form_code: "A-5",
    },
];

const GENERAL_ANNUAL: &[ObligationTemplate] = &[ObligationTemplate {
    id: "declaracion-anual-moral",
    name: "Declaración Anual Personas Morales",
    description: "Declaración anual del ejercicio fiscal",
    kind: ObligationKind::Declaration,
    deadline: DeadlineRule::Annual {
        due_month: 3,
        due_day: 31,
    },
    form_code: "A-2",
}];

const RESICO_BIMONTHLY: &[ObligationTemplate] = &[ObligationTemplate {
    id: "pago-bimestral-resico",
    name: "Pago Bimestral RESICO",
    description: "Pago bimestral del Régimen Simplificado de Confianza",
    kind: ObligationKind::Payment,
    deadline: DeadlineRule::Recurring { due_day: 17 },
    form_code: "A-6",
}];

const RESICO_ANNUAL: &[ObligationTemplate] = &[ObligationTemplate {
    id: "declaracion-anual-resico",
    name: "Declaración Anual RESICO",
    description: "Declaración anual del Régimen Simplificado de Confianza",
    kind: ObligationKind::Declaration,
    deadline: DeadlineRule::Annual {
        due_month: 4,
        due_day: 30,
    },
    form_code: "A-7",
}];

const INDIVIDUAL_MONTHLY: &[ObligationTemplate] = &[ObligationTemplate {
    id: "pagos-provisionales-pf",
    name: "Pagos Provisionales Persona Física",
    description: "Pagos provisionales de personas físicas",
    kind: ObligationKind::Payment,
    deadline: DeadlineRule::Recurring { due_day: 17 },
    form_code: "A-3",
}];

const INDIVIDUAL_ANNUAL: &[ObligationTemplate] = &[ObligationTemplate {
    id: "declaracion-anual-pf",
    name: "Declaración Anual Persona Física",
    description: "Declaración anual de personas físicas",
    kind: ObligationKind::Declaration,
    deadline: DeadlineRule::Annual {
        due_month: 4,
        due_day: 30,
    },
    form_code: "A-4",
}];

/// The whole catalog. Row order is expansion order.
pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        regime: Regime::General,
        periodicity: Periodicity::Monthly,
        templates: GENERAL_MONTHLY,
    },
    CatalogEntry {
        regime: Regime::General,
        periodicity: Periodicity::Annual,
        templates: GENERAL_ANNUAL,
    },
    CatalogEntry {
        regime: Regime::SimplifiedTrust,
        periodicity: Periodicity::Bimonthly,
        templates: RESICO_BIMONTHLY,
    },
    CatalogEntry {
        regime: Regime::SimplifiedTrust,
        periodicity: Periodicity::Annual,
        templates: RESICO_ANNUAL,
    },
    CatalogEntry {
        regime: Regime::Individual,
        periodicity: Periodicity::Monthly,
        templates: INDIVIDUAL_MONTHLY,
    },
    CatalogEntry {
        regime: Regime::Individual,
        periodicity: Periodicity::Annual,
        templates: INDIVIDUAL_ANNUAL,
    },
];

/// Rows for `regime`, or the `General` rows when the regime has none.
pub fn bucket(regime: Regime) -> Vec<&'static CatalogEntry> {
    bucket_in(CATALOG, regime)
}

fn bucket_in(catalog: &'static [CatalogEntry], regime: Regime) -> Vec<&'static CatalogEntry> {
    let rows = rows_of(catalog, regime);
    if rows.is_empty() {
        rows_of(catalog, Regime::General)
    } else {
        rows
    }
}

fn rows_of(catalog: &'static [CatalogEntry], regime: Regime) -> Vec<&'static CatalogEntry> {
    catalog.iter().filter(|e| e.regime == regime).collect()
}

/// Templates of a regime for one periodicity (empty if the regime has none).
pub fn templates(regime: Regime, periodicity: Periodicity) -> &'static [ObligationTemplate] {
    bucket(regime)
        .into_iter()
        .find(|e| e.periodicity == periodicity)
        .map(|e| e.templates)
        .unwrap_or(&[])
}

/// Look a template up by id, with the row it belongs to.
pub fn find(id: &str) -> Option<(&'static CatalogEntry, &'static ObligationTemplate)> {
    CATALOG
        .iter()
        .flat_map(|e| e.templates.iter().map(move |t| (e, t)))
        .find(|(_, t)| t.id == id)
}

/// Templates whose id, name, description or form code contain `query`,
/// ignoring case and accents ("declaracion" matches "Declaración").
pub fn search(query: &str) -> Vec<(&'static CatalogEntry, &'static ObligationTemplate)> {
    let needle = fold(query);
    CATALOG
        .iter()
        .flat_map(|e| e.templates.iter().map(move |t| (e, t)))
        .filter(|(_, t)| {
            needle.is_empty()
                || [t.id, t.name, t.description, t.form_code]
                    .iter()
                    .any(|field| fold(field).contains(&needle))
        })
        .collect()
}

fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Check the catalog invariants: unique ids, sane days and months.
pub fn validate() -> Result<(), CalendarError> {
    validate_entries(CATALOG)
}

fn validate_entries(entries: &[CatalogEntry]) -> Result<(), CalendarError> {
    let all = entries.iter().flat_map(|e| e.templates.iter().map(move |t| (e, t)));

    let duplicates: Vec<&str> = all.clone().map(|(_, t)| t.id).duplicates().collect();
    if !duplicates.is_empty() {
        return Err(CalendarError::Catalog(format!(
            "duplicated obligation ids: {}",
            duplicates.join(", ")
        )));
    }

    for (entry, template) in all {
        if !(1..=31).contains(&template.deadline.due_day()) {
            return Err(CalendarError::Catalog(format!(
                "'{}' has due day {} outside 1..=31",
                template.id,
                template.deadline.due_day()
            )));
        }
        match (entry.periodicity, template.deadline) {
            (Periodicity::Annual, DeadlineRule::Annual { due_month, .. }) => {
                if !(1..=12).contains(&due_month) {
                    return Err(CalendarError::Catalog(format!(
                        "'{}' has due month {} outside 1..=12",
                        template.id, due_month
                    )));
                }
            }
            (Periodicity::Annual, DeadlineRule::Recurring { .. }) => {
                return Err(CalendarError::Catalog(format!(
                    "annual obligation '{}' has no due month",
                    template.id
                )));
            }
            (_, DeadlineRule::Annual { .. }) => {
                return Err(CalendarError::Catalog(format!(
                    "{} obligation '{}' has a fixed due month",
                    entry.periodicity, template.id
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
