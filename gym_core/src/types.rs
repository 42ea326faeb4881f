//! Core domain types for the gym tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and schedule entries
//! - Units and training modes
//! - Scalar-or-per-set values
//! - Stored per-set rows

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Registry Types
// ============================================================================

/// A registered exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub alias: Option<String>,
    pub muscle_group: Option<String>,
}

/// An exercise that has not been stored yet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewExercise {
    pub name: String,
    pub alias: Option<String>,
    pub muscle_group: Option<String>,
}

impl NewExercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            muscle_group: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_muscle_group(mut self, muscle_group: impl Into<String>) -> Self {
        self.muscle_group = Some(muscle_group.into());
        self
    }
}

/// "This exercise was performed at this position on this date"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub exercise_id: i64,
    pub order_number: u32,
}

// ============================================================================
// Modes and Units
// ============================================================================

/// Training mode of a workout record
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// weight x repetitions
    Strength,
    /// time x speed
    Cardio,
}

impl Mode {
    /// Human-readable list of the units this mode accepts
    pub fn allowed_units(&self) -> &'static str {
        match self {
            Mode::Strength => "kg, lbs",
            Mode::Cardio => "kph, mph",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strength => f.write_str("strength"),
            Mode::Cardio => f.write_str("cardio"),
        }
    }
}

/// Units of weight or speed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Kg,
    Lbs,
    Kph,
    Mph,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Kg => "kg",
            Units::Lbs => "lbs",
            Units::Kph => "kph",
            Units::Mph => "mph",
        }
    }

    /// The mode these units belong to
    pub fn mode(&self) -> Mode {
        match self {
            Units::Kg | Units::Lbs => Mode::Strength,
            Units::Kph | Units::Mph => Mode::Cardio,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = Error;

    /// Exact, lowercase match only; anything else (including "") is rejected.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kg" => Ok(Units::Kg),
            "lbs" => Ok(Units::Lbs),
            "kph" => Ok(Units::Kph),
            "mph" => Ok(Units::Mph),
            other => Err(Error::InvalidValue(format!(
                "unknown units {:?} (expected kg, lbs, kph or mph)",
                other
            ))),
        }
    }
}

// ============================================================================
// Scalar-or-per-set values
// ============================================================================

/// A field that is either the same for every set or given once per set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SetValue<T> {
    Scalar(T),
    PerSet(Vec<T>),
}

impl<T: Copy> SetValue<T> {
    pub fn is_per_set(&self) -> bool {
        matches!(self, SetValue::PerSet(_))
    }

    /// Number of values supplied (a scalar counts as one)
    pub fn len(&self) -> usize {
        match self {
            SetValue::Scalar(_) => 1,
            SetValue::PerSet(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for the set at `index`; scalars apply to every set.
    ///
    /// Callers index only within a length-checked sequence.
    pub fn at(&self, index: usize) -> T {
        match self {
            SetValue::Scalar(value) => *value,
            SetValue::PerSet(values) => values[index],
        }
    }

    /// All supplied values
    pub fn values(&self) -> Vec<T> {
        match self {
            SetValue::Scalar(value) => vec![*value],
            SetValue::PerSet(values) => values.clone(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for SetValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetValue::Scalar(value) => write!(f, "{}", value),
            SetValue::PerSet(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl<T> FromStr for SetValue<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = Error;

    /// Parses `45` as a scalar and `35,37.5,37.5` (optionally bracketed) as
    /// a per-set list. Empty list items are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let is_list = trimmed.contains(',') || trimmed.starts_with('[');
        let inner = trimmed.trim_start_matches('[').trim_end_matches(']');

        let parse_one = |part: &str| {
            part.trim()
                .parse::<T>()
                .map_err(|e| Error::InvalidValue(format!("{:?}: {}", part.trim(), e)))
        };

        if is_list {
            let values = inner
                .split(',')
                .map(|part| {
                    if part.trim().is_empty() {
                        Err(Error::InvalidValue(format!("empty item in list {:?}", trimmed)))
                    } else {
                        parse_one(part)
                    }
                })
                .collect::<Result<Vec<T>>>()?;
            Ok(SetValue::PerSet(values))
        } else {
            Ok(SetValue::Scalar(parse_one(inner)?))
        }
    }
}

impl<T> From<T> for SetValue<T> {
    fn from(value: T) -> Self {
        SetValue::Scalar(value)
    }
}

impl<T> From<Vec<T>> for SetValue<T> {
    fn from(values: Vec<T>) -> Self {
        SetValue::PerSet(values)
    }
}

// ============================================================================
// Stored rows
// ============================================================================

/// Stored value of `local_order` meaning "one row represents all sets"
pub const ALL_SETS_SENTINEL: i64 = -1;

/// Position of a stored row within its workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "i64", try_from = "i64")]
pub enum LocalOrder {
    /// No per-set distinction; one row stands for every set
    AllSets,
    /// 0-based set index
    Set(u32),
}

impl From<LocalOrder> for i64 {
    fn from(order: LocalOrder) -> Self {
        match order {
            LocalOrder::AllSets => ALL_SETS_SENTINEL,
            LocalOrder::Set(index) => i64::from(index),
        }
    }
}

impl TryFrom<i64> for LocalOrder {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        if value == ALL_SETS_SENTINEL {
            return Ok(LocalOrder::AllSets);
        }
        u32::try_from(value)
            .map(LocalOrder::Set)
            .map_err(|_| Error::CorruptRows(format!("invalid local_order {}", value)))
    }
}

/// The mode-specific values of a single stored set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SetMeasure {
    Strength { weight: f64, repetitions: u32 },
    Cardio { time: u32, speed: f64 },
}

impl SetMeasure {
    pub fn mode(&self) -> Mode {
        match self {
            SetMeasure::Strength { .. } => Mode::Strength,
            SetMeasure::Cardio { .. } => Mode::Cardio,
        }
    }
}

/// One stored, fully scalar, per-set record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSetRow {
    pub schedule_id: i64,
    pub feeling: Option<u8>,
    pub local_order: LocalOrder,
    pub sets: u32,
    #[serde(flatten)]
    pub measure: SetMeasure,
    pub units: Option<Units>,
}

impl WorkoutSetRow {
    pub fn weight(&self) -> Option<f64> {
        match self.measure {
            SetMeasure::Strength { weight, .. } => Some(weight),
            SetMeasure::Cardio { .. } => None,
        }
    }

    pub fn repetitions(&self) -> Option<u32> {
        match self.measure {
            SetMeasure::Strength { repetitions, .. } => Some(repetitions),
            SetMeasure::Cardio { .. } => None,
        }
    }

    pub fn time(&self) -> Option<u32> {
        match self.measure {
            SetMeasure::Cardio { time, .. } => Some(time),
            SetMeasure::Strength { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.measure {
            SetMeasure::Cardio { speed, .. } => Some(speed),
            SetMeasure::Strength { .. } => None,
        }
    }
}

/// A stored set row joined with its schedule context
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRow {
    pub workout_id: i64,
    pub date: NaiveDate,
    pub exercise: String,
    pub order_number: u32,
    #[serde(flatten)]
    pub row: WorkoutSetRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_parse_exact() {
        assert_eq!("kg".parse::<Units>().unwrap(), Units::Kg);
        assert_eq!("mph".parse::<Units>().unwrap(), Units::Mph);
        assert!("".parse::<Units>().is_err());
        assert!("KG".parse::<Units>().is_err());
        assert!("ggg".parse::<Units>().is_err());
        assert_eq!(Units::Lbs.mode(), Mode::Strength);
        assert_eq!(Units::Kph.mode(), Mode::Cardio);
    }

    #[test]
    fn test_set_value_parse() {
        assert_eq!("45".parse::<SetValue<f64>>().unwrap(), SetValue::Scalar(45.0));
        assert_eq!(
            "35,37.5, 37.5".parse::<SetValue<f64>>().unwrap(),
            SetValue::PerSet(vec![35.0, 37.5, 37.5])
        );
        assert_eq!(
            "[10]".parse::<SetValue<u32>>().unwrap(),
            SetValue::PerSet(vec![10])
        );
        assert!("ten".parse::<SetValue<u32>>().is_err());
        assert!("10,x".parse::<SetValue<u32>>().is_err());
    }

    #[test]
    fn test_set_value_rejects_empty_items() {
        for input in ["35,,37.5", "35,", ",35", "[]", "[35,]"] {
            assert!(
                matches!(input.parse::<SetValue<f64>>(), Err(Error::InvalidValue(_))),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_set_value_display() {
        assert_eq!(SetValue::Scalar(10).to_string(), "10");
        assert_eq!(SetValue::PerSet(vec![35.0, 37.5]).to_string(), "[35, 37.5]");
    }

    #[test]
    fn test_local_order_sentinel() {
        assert_eq!(i64::from(LocalOrder::AllSets), ALL_SETS_SENTINEL);
        assert_eq!(i64::from(LocalOrder::Set(2)), 2);
        assert_eq!(LocalOrder::try_from(-1).unwrap(), LocalOrder::AllSets);
        assert_eq!(LocalOrder::try_from(0).unwrap(), LocalOrder::Set(0));
        assert!(LocalOrder::try_from(-2).is_err());
    }

    #[test]
    fn test_row_serializes_flat() {
        let row = WorkoutSetRow {
            schedule_id: 1,
            feeling: Some(3),
            local_order: LocalOrder::AllSets,
            sets: 3,
            measure: SetMeasure::Strength {
                weight: 45.0,
                repetitions: 10,
            },
            units: Some(Units::Kg),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["local_order"], -1);
        assert_eq!(json["mode"], "strength");
        assert_eq!(json["weight"], 45.0);
        assert_eq!(json["units"], "kg");

        let back: WorkoutSetRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }
}
