use chrono::NaiveDate;
use thiserror::Error;

use crate::games::MatchFormat;

/// Broad class of a [`StandingsError`], used to pick the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required column, parameter or rule-table entry is missing or unknown.
    Schema,
    /// The records are well-formed but contradict each other.
    DataIntegrity,
}

#[derive(Debug, Error, PartialEq)]
pub enum StandingsError {
    #[error("{table}: missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("{table}: unknown parameter '{key}'")]
    UnknownParameter { table: String, key: String },

    #[error("{table}: unknown match format column '{label}'")]
    UnknownFormatLabel { table: String, label: String },

    #[error("rule table: no value for '{key}' in format {format}")]
    MissingRule { format: MatchFormat, key: String },

    #[error("rule table: no rules defined for format {0}")]
    MissingFormat(MatchFormat),

    #[error("fixture on {date} appears more than once")]
    DuplicateFixture { date: NaiveDate },

    #[error("fixture on {date} has no attendance rows")]
    NoAttendance { date: NaiveDate },

    #[error("attendance row for '{player}' on {date} has no matching fixture")]
    OrphanAttendance { player: String, date: NaiveDate },

    #[error("'{player}' has more than one row on {date}")]
    DuplicateEntry { player: String, date: NaiveDate },

    #[error("'{player}' on {date}: unknown team '{team}'")]
    UnknownTeam {
        player: String,
        date: NaiveDate,
        team: String,
    },

    #[error("'{player}' on {date}: unrecognized position '{position}'")]
    UnrecognizedPosition {
        player: String,
        date: NaiveDate,
        position: String,
    },

    #[error("'{player}' has no default position for {format}")]
    MissingPosition { player: String, format: MatchFormat },

    #[error("{table}: '{player}' is listed more than once")]
    DuplicatePlayer { table: String, player: String },
}

impl StandingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StandingsError::MissingColumn { .. }
            | StandingsError::UnknownParameter { .. }
            | StandingsError::UnknownFormatLabel { .. }
            | StandingsError::MissingRule { .. }
            | StandingsError::MissingFormat(_) => ErrorKind::Schema,
            StandingsError::DuplicateFixture { .. }
            | StandingsError::NoAttendance { .. }
            | StandingsError::OrphanAttendance { .. }
            | StandingsError::DuplicateEntry { .. }
            | StandingsError::UnknownTeam { .. }
            | StandingsError::UnrecognizedPosition { .. }
            | StandingsError::MissingPosition { .. }
            | StandingsError::DuplicatePlayer { .. } => ErrorKind::DataIntegrity,
        }
    }
}
