pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::{FormatRules, ParameterSheet, RuleTable, PARAMETER_KEYS};
pub use factors::{defensive_score, midfield_score, Outcome, Position};
pub use engine::{
    calculate_points, resolve_entry, score_attendance, EventCounts, PlayerGameEntry,
    PointBreakdown, ScoredEntry,
};
pub use validation::validate_rule_table;
