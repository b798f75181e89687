use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use calendario_fiscal::config::load_config;
use calendario_fiscal::obligations::{
    self as obligations, catalog, is_deadline, upcoming, yearly_statistics_for, QueryOptions,
};
use calendario_fiscal::utils::month_name_es;

use super::formatters::{self as fmt, DeadlineCheck};
use super::{parse_date, resolve_regime, Cli, Commands};

/// Execute a parsed command line: load config, fix "now", route the command.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    let now = reference_now(cli.today.as_deref())?;
    info!("Reference time: {}", now);

    match cli.command {
        Commands::Obligations {
            year,
            month,
            filters,
            export,
        } => {
            let options = filters.to_options(&config)?;
            let year = year.unwrap_or_else(|| now.year());
            let month = month.unwrap_or_else(|| now.month());
            let found = obligations::expand(year, month, &options, now);

            if let Some(path) = export {
                fmt::write_obligations_csv(&path, &found)?;
                info!("Exported {} obligation(s) to {}", found.len(), path.display());
                if !cli.json {
                    println!("Exported {} obligation(s) to {}", found.len(), path.display());
                }
            }

            if cli.json {
                println!("{}", fmt::format_json(&found));
            } else {
                let title = format!(
                    "Obligaciones {} {} - {}",
                    month_name_es(month),
                    year,
                    options.regime.label()
                );
                print!("{}", fmt::format_obligations_table(&found, &title));
            }
            Ok(())
        }

        Commands::Upcoming { days, filters } => {
            let options = filters.to_options(&config)?;
            let days = days.unwrap_or(config.horizon_days);
            let found = upcoming(days, &options, now);

            if cli.json {
                println!("{}", fmt::format_json(&found));
            } else {
                let title = format!(
                    "Próximas obligaciones ({} días) - {}",
                    days,
                    options.regime.label()
                );
                print!("{}", fmt::format_obligations_table(&found, &title));
            }
            Ok(())
        }

        Commands::Check { date, filters } => {
            let options = filters.to_options(&config)?;
            let date = parse_date(&date)?;
            run_check(date, &options, now, cli.json);
            Ok(())
        }

        Commands::Stats { year, regime } => {
            let regime = resolve_regime(regime.as_deref(), &config)?;
            let year = year.unwrap_or_else(|| now.year());
            let stats = yearly_statistics_for(year, &QueryOptions::for_regime(regime), now);

            if cli.json {
                println!("{}", fmt::format_json(&stats));
            } else {
                print!("{}", fmt::format_statistics(&stats, regime.label()));
            }
            Ok(())
        }

        Commands::Catalog { search } => {
            catalog::validate().context("Obligation catalog failed its self-check")?;
            let items = fmt::catalog_items(&catalog::search(search.as_deref().unwrap_or("")));

            if cli.json {
                println!("{}", fmt::format_json(&items));
            } else {
                print!("{}", fmt::format_catalog(&items));
            }
            Ok(())
        }
    }
}

fn run_check(date: NaiveDate, options: &QueryOptions, now: NaiveDateTime, json: bool) {
    let hit = is_deadline(date, options, now);
    let matches: Vec<_> = if hit {
        obligations::expand(date.year(), date.month(), options, now)
            .into_iter()
            .filter(|o| o.due_date == date)
            .collect()
    } else {
        Vec::new()
    };

    let check = DeadlineCheck {
        date,
        is_deadline: hit,
        obligations: &matches,
    };

    if json {
        println!("{}", fmt::format_json(&check));
    } else {
        print!("{}", fmt::format_deadline_check(&check));
    }
}

/// The instant all "days remaining" are measured from
fn reference_now(today: Option<&str>) -> Result<NaiveDateTime> {
    match today {
        Some(s) => Ok(parse_date(s)?.and_time(NaiveTime::MIN)),
        None => Ok(Local::now().naive_local()),
    }
}
