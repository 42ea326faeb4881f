//! Error types for the gym_core library.

use crate::types::Mode;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gym_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither or both of the strength/cardio field groups were supplied
    #[error("exactly one of {{weight+repetitions, time+speed}} must be supplied")]
    InvalidMode,

    /// Feeling rating outside 1..=5
    #[error("feeling rating must be from 1 to 5, got {0}")]
    InvalidFeeling(i64),

    /// Units missing from the active mode's allowed set
    #[error("units {units:?} are not valid for {mode} exercises (expected {expected})", expected = .mode.allowed_units())]
    InvalidUnits { units: String, mode: Mode },

    /// A per-set sequence does not have one value per set
    #[error("{field} has {len} value(s) but the workout has {sets} set(s)")]
    SetCountMismatch {
        field: &'static str,
        sets: u32,
        len: usize,
    },

    /// Cardio time and speed disagree on being per-set sequences
    #[error("time and speed must either both be per-set lists or both be single values")]
    InconsistentVariation,

    /// A value outside the range storage accepts
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Exercise name or alias not present in the registry
    #[error("there is no {0:?} exercise")]
    UnknownExercise(String),

    /// Exercise name or alias already taken
    #[error("exercise {0:?} already exists (name and alias must be unique)")]
    DuplicateExercise(String),

    /// Date/exercise or date/order slot already taken
    #[error("schedule entry already exists: {0}")]
    DuplicateSchedule(String),

    /// Schedule/local_order pair already stored
    #[error("workout row already exists for schedule {schedule_id} (local_order {local_order})")]
    DuplicateWorkoutRow { schedule_id: i64, local_order: i64 },

    /// Record not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored rows that cannot be reassembled into one workout
    #[error("corrupt workout rows: {0}")]
    CorruptRows(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Stored or typed date that does not parse
    #[error("date error: {0}")]
    Date(#[from] chrono::ParseError),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than storage
    /// or the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidMode
                | Error::InvalidFeeling(_)
                | Error::InvalidUnits { .. }
                | Error::SetCountMismatch { .. }
                | Error::InconsistentVariation
                | Error::InvalidValue(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = Error::SetCountMismatch {
            field: "weight",
            sets: 3,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "weight has 2 value(s) but the workout has 3 set(s)"
        );

        let err = Error::InvalidUnits {
            units: "kph".into(),
            mode: Mode::Strength,
        };
        assert!(err.to_string().contains("kg, lbs"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidMode.is_validation());
        assert!(Error::InconsistentVariation.is_validation());
        assert!(!Error::UnknownExercise("Squat".into()).is_validation());
        assert!(!Error::NotFound("x".into()).is_validation());
    }
}
