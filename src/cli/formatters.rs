//! Output formatting module for CLI display
//!
//! Turns obligation data into terminal tables, JSON documents and CSV files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use calendario_fiscal::obligations::catalog::CatalogEntry;
use calendario_fiscal::obligations::{ObligationInstance, ObligationTemplate, YearlyStatistics};
use calendario_fiscal::utils::{format_date_mx, month_name_es};

/// Pretty JSON for any serializable value
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

#[derive(Tabled)]
struct ObligationRow {
    #[tabled(rename = "Fecha límite")]
    due_date: String,
    #[tabled(rename = "Días")]
    days: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Obligación")]
    name: String,
    #[tabled(rename = "Tipo")]
    kind: String,
    #[tabled(rename = "Periodicidad")]
    periodicity: String,
    #[tabled(rename = "Forma")]
    form: String,
}

fn days_cell(days: i64) -> String {
    let text = days.to_string();
    match days {
        d if d < 0 => text.bright_black().to_string(),
        0..=3 => text.red().bold().to_string(),
        4..=7 => text.yellow().to_string(),
        _ => text.green().to_string(),
    }
}

/// Format a list of obligations as a table under `title`
pub fn format_obligations_table(obligations: &[ObligationInstance], title: &str) -> String {
    let mut output = format!("\n{} {}\n\n", "📅".cyan().bold(), title.bold());

    if obligations.is_empty() {
        output.push_str(&format!("{} No hay obligaciones\n", "ℹ".blue().bold()));
        return output;
    }

    let rows: Vec<ObligationRow> = obligations
        .iter()
        .map(|o| ObligationRow {
            due_date: format_date_mx(o.due_date),
            days: days_cell(o.days_remaining),
            id: o.id.clone(),
            name: o.name.clone(),
            kind: o.kind.as_str().to_string(),
            periodicity: o.periodicity.as_str().to_string(),
            form: o.form_code.clone(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(1..2), Alignment::right());

    output.push_str(&table.to_string());
    output.push_str(&format!("\n\nTotal: {}\n", obligations.len()));
    output
}

/// JSON document for `check`
#[derive(Serialize)]
pub struct DeadlineCheck<'a> {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "esFechaLimite")]
    pub is_deadline: bool,
    #[serde(rename = "obligaciones")]
    pub obligations: &'a [ObligationInstance],
}

pub fn format_deadline_check(check: &DeadlineCheck) -> String {
    if !check.is_deadline {
        return format!(
            "{} {} no es fecha límite\n",
            "✗".bright_black(),
            format_date_mx(check.date)
        );
    }

    let mut output = format!(
        "{} {} es fecha límite\n",
        "✓".green().bold(),
        format_date_mx(check.date)
    );
    for o in check.obligations {
        output.push_str(&format!("  • {} ({}) - forma {}\n", o.name, o.id, o.form_code));
    }
    output
}

/// Format yearly statistics
pub fn format_statistics(stats: &YearlyStatistics, regime_label: &str) -> String {
    let mut output = format!(
        "\n{} Estadísticas {} - {}\n\n",
        "📊".cyan().bold(),
        stats.year,
        regime_label
    );

    #[derive(Tabled)]
    struct MonthRow {
        #[tabled(rename = "Mes")]
        month: String,
        #[tabled(rename = "Obligaciones")]
        count: usize,
    }

    let rows: Vec<MonthRow> = stats
        .by_month
        .iter()
        .map(|(month, count)| MonthRow {
            month: month_name_es(*month).to_string(),
            count: *count,
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format!("\n\n{} Resumen", "━".repeat(40).bright_black()));
    output.push_str(&format!(
        "\n{:<22} {}",
        "Total obligaciones:".bold(),
        stats.total_obligations
    ));
    for (kind, count) in &stats.by_kind {
        output.push_str(&format!(
            "\n{:<22} {}",
            format!("{}:", kind.as_str()).bold(),
            count
        ));
    }
    output.push_str(&format!(
        "\n{:<22} {}\n",
        "Promedio mensual:".bold(),
        stats.monthly_average
    ));

    output
}

#[derive(Serialize)]
pub struct CatalogItem {
    #[serde(rename = "regimen")]
    pub regime: &'static str,
    #[serde(rename = "periodicidad")]
    pub periodicity: &'static str,
    #[serde(flatten)]
    pub template: ObligationTemplate,
}

pub fn catalog_items(
    rows: &[(&'static CatalogEntry, &'static ObligationTemplate)],
) -> Vec<CatalogItem> {
    rows.iter()
        .map(|(entry, template)| CatalogItem {
            regime: entry.regime.as_str(),
            periodicity: entry.periodicity.as_str(),
            template: **template,
        })
        .collect()
}

/// Format catalog templates as a table
pub fn format_catalog(items: &[CatalogItem]) -> String {
    if items.is_empty() {
        return format!("{} Sin coincidencias en el catálogo\n", "ℹ".blue().bold());
    }

    #[derive(Tabled)]
    struct TemplateRow {
        #[tabled(rename = "Régimen")]
        regime: String,
        #[tabled(rename = "Periodicidad")]
        periodicity: String,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Obligación")]
        name: String,
        #[tabled(rename = "Vence")]
        due: String,
        #[tabled(rename = "Forma")]
        form: String,
    }

    let rows: Vec<TemplateRow> = items
        .iter()
        .map(|item| {
            let t = &item.template;
            let due = match t.deadline.due_month() {
                Some(month) => format!("{} de {}", t.deadline.due_day(), month_name_es(month)),
                None => format!("día {} del mes siguiente", t.deadline.due_day()),
            };
            TemplateRow {
                regime: item.regime.to_string(),
                periodicity: item.periodicity.to_string(),
                id: t.id.to_string(),
                name: t.name.to_string(),
                due,
                form: t.form_code.to_string(),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    nombre: &'a str,
    tipo: &'a str,
    forma: &'a str,
    #[serde(rename = "fechaLimite")]
    fecha_limite: String,
    regimen: &'a str,
    periodicidad: &'a str,
    #[serde(rename = "personaTipo")]
    persona_tipo: &'a str,
    #[serde(rename = "diasRestantes")]
    dias_restantes: i64,
}

/// Write obligations to a CSV file (one row per obligation, header included)
pub fn write_obligations_csv(path: &Path, obligations: &[ObligationInstance]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for o in obligations {
        writer.serialize(CsvRow {
            id: &o.id,
            nombre: &o.name,
            tipo: o.kind.as_str(),
            forma: &o.form_code,
            fecha_limite: o.due_date.format("%Y-%m-%d").to_string(),
            regimen: o.regime.as_str(),
            periodicidad: o.periodicity.as_str(),
            persona_tipo: o.person_type.as_str(),
            dias_restantes: o.days_remaining,
        })?;
    }

    writer.flush()?;
    Ok(())
}
