use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use calendario_fiscal::config::Config;
use calendario_fiscal::error::CalendarError;
use calendario_fiscal::obligations::{QueryOptions, Regime};

pub mod formatters;
pub mod runner;

#[derive(Parser, Debug)]
#[command(name = "calendario-fiscal")]
#[command(version, about = "Mexican SAT tax obligations calendar")]
#[command(
    long_about = "Compute SAT filing obligations (IVA, ISR, RESICO, personas físicas) for a period, list upcoming deadlines, check dates and summarize a fiscal year."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Reference date instead of today (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Path to config.toml (default: $CALENDARIO_FISCAL_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List obligations for a period (defaults to the current month)
    Obligations {
        /// Fiscal year (e.g., 2024)
        year: Option<i32>,

        /// Period month, 1-12
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Export the obligations to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show deadlines coming up in the next days
    Upcoming {
        /// Look-ahead window in days (default from config, 30)
        #[arg(short, long)]
        days: Option<i64>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Check whether a date is a filing deadline
    Check {
        /// Date to check (YYYY-MM-DD or DD/MM/YYYY)
        date: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Yearly obligation statistics
    Stats {
        /// Fiscal year (defaults to the current year)
        year: Option<i32>,

        /// Regime (general, resico, persona_fisica)
        #[arg(short, long)]
        regime: Option<String>,
    },

    /// Browse the obligation catalog
    Catalog {
        /// Only templates matching this text (accents and case ignored)
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Regime (general, resico, persona_fisica)
    #[arg(short, long)]
    pub regime: Option<String>,

    /// Obligation kind (declaracion, pago, aviso)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Periodicity (mensual, bimestral, anual)
    #[arg(short, long)]
    pub periodicity: Option<String>,
}

impl FilterArgs {
    /// Build query options, taking the regime from config when not given.
    pub fn to_options(&self, config: &Config) -> Result<QueryOptions, CalendarError> {
        let regime = resolve_regime(self.regime.as_deref(), config)?;
        let mut options = QueryOptions::for_regime(regime);
        if let Some(kind) = &self.kind {
            options = options.with_kind(kind.parse()?);
        }
        if let Some(periodicity) = &self.periodicity {
            options = options.with_periodicity(periodicity.parse()?);
        }
        Ok(options)
    }
}

pub fn resolve_regime(arg: Option<&str>, config: &Config) -> Result<Regime, CalendarError> {
    match arg {
        Some(name) => name.parse().map_err(|_| {
            CalendarError::Parse(format!(
                "unknown regime '{}' (expected general, resico or persona_fisica)",
                name
            ))
        }),
        None => Ok(config.regime),
    }
}

/// Parse a calendar date: YYYY-MM-DD or DD/MM/YYYY
pub fn parse_date(s: &str) -> Result<NaiveDate, CalendarError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| {
            CalendarError::Parse(format!("Invalid date '{}'. Use YYYY-MM-DD or DD/MM/YYYY", s))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendario_fiscal::obligations::{ObligationKind, Periodicity};

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 17).unwrap();
        assert_eq!(parse_date("2024-02-17").unwrap(), expected);
        assert_eq!(parse_date("17/02/2024").unwrap(), expected);
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("mañana").is_err());
    }

    #[test]
    fn test_filters_use_config_regime() {
        let config = Config {
            regime: Regime::SimplifiedTrust,
            ..Config::default()
        };
        let options = FilterArgs::default().to_options(&config).unwrap();
        assert_eq!(options.regime, Regime::SimplifiedTrust);
        assert_eq!(options.kind, None);
    }

    #[test]
    fn test_filters_parse_all_fields() {
        let filters = FilterArgs {
            regime: Some("persona_fisica".to_string()),
            kind: Some("pago".to_string()),
            periodicity: Some("mensual".to_string()),
        };
        let options = filters.to_options(&Config::default()).unwrap();
        assert_eq!(options.regime, Regime::Individual);
        assert_eq!(options.kind, Some(ObligationKind::Payment));
        assert_eq!(options.periodicity, Some(Periodicity::Monthly));
    }

    #[test]
    fn test_unknown_regime_is_reported() {
        let err = resolve_regime(Some("plataformas"), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("unknown regime 'plataformas'"));
    }

    #[test]
    fn test_cli_parses_obligations_command() {
        let cli = Cli::try_parse_from([
            "calendario-fiscal",
            "--json",
            "obligations",
            "2024",
            "2",
            "--regime",
            "resico",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Obligations {
                year,
                month,
                filters,
                export,
            } => {
                assert_eq!(year, Some(2024));
                assert_eq!(month, Some(2));
                assert_eq!(filters.regime.as_deref(), Some("resico"));
                assert!(export.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_month_out_of_range() {
        assert!(Cli::try_parse_from(["calendario-fiscal", "obligations", "2024", "13"]).is_err());
    }
}
