// Obligations module - SAT filing calendar (catalog, expansion, horizon, statistics)

pub mod catalog;
pub mod deadline;
pub mod expander;
pub mod horizon;
pub mod models;
pub mod statistics;

pub use deadline::is_deadline;
pub use expander::{expand, expand_by_regime};
pub use horizon::{upcoming, DEFAULT_WINDOW_DAYS};
pub use models::{
    DeadlineRule, ObligationInstance, ObligationKind, ObligationTemplate, Periodicity,
    PersonType, QueryOptions, Regime,
};
pub use statistics::{yearly_statistics, yearly_statistics_for, YearlyStatistics};
