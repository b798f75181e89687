//! Error handling for the fiscal calendar
//!
//! The obligation engine itself never fails; these errors only surface at the
//! edges (parsing user input, loading configuration, exporting, catalog checks).

use thiserror::Error;

/// Core error types for calendar operations
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("catalog error: {0}")]
    Catalog(String),
}

/// Result type alias for calendar operations
pub type Result<T> = anyhow::Result<T>;
