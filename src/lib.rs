//! Calendario Fiscal - Mexican SAT tax-filing obligations calendar
//!
//! This library expands a static catalog of SAT obligations into dated
//! deadlines for a regime and period, finds upcoming deadlines, checks
//! whether a date is a deadline, and aggregates yearly statistics.

pub mod config;
pub mod error;
pub mod obligations;
pub mod utils;
