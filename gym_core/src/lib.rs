#![forbid(unsafe_code)]

//! Core domain model and storage for the gymlog workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, schedule entries, stored set rows)
//! - Workout validation and per-set expansion
//! - SQLite persistence and the name-based journal API
//! - The built-in exercise catalog, config, logging and CSV export

pub mod types;
pub mod error;
pub mod workout;
pub mod storage;
pub mod journal;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use workout::{Measures, Performance, RawWorkout, WorkoutRecord};
pub use storage::{Database, HistoryFilter};
pub use catalog::default_exercises;
pub use config::Config;
pub use export::export_history_csv;
