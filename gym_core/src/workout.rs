//! Workout record validation and set expansion.
//!
//! A single logical workout ("3 sets of seated row, 35kg then 37.5kg twice")
//! is validated once, up front, and then fanned out into one stored row per
//! set. Records whose sets are all identical are stored as a single row
//! marked [`LocalOrder::AllSets`].

use crate::{
    Error, LocalOrder, Mode, Result, SetMeasure, SetValue, Units, WorkoutSetRow,
};
use serde::{Deserialize, Serialize};

/// Unvalidated workout fields as collected from the user
///
/// Either `weight` + `repetitions` (strength) or `time` + `speed` (cardio)
/// must be supplied; see [`Performance::new`] for the full set of rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawWorkout {
    pub sets: u32,
    pub weight: Option<SetValue<f64>>,
    pub repetitions: Option<SetValue<u32>>,
    pub time: Option<SetValue<u32>>,
    pub speed: Option<SetValue<f64>>,
    pub units: Option<String>,
    pub feeling: Option<i64>,
}

impl RawWorkout {
    /// Strength work: weight x repetitions
    pub fn strength(
        sets: u32,
        weight: impl Into<SetValue<f64>>,
        repetitions: impl Into<SetValue<u32>>,
    ) -> Self {
        Self {
            sets,
            weight: Some(weight.into()),
            repetitions: Some(repetitions.into()),
            ..Self::default()
        }
    }

    /// Cardio work: time (seconds) x speed
    pub fn cardio(
        sets: u32,
        time: impl Into<SetValue<u32>>,
        speed: impl Into<SetValue<f64>>,
    ) -> Self {
        Self {
            sets,
            time: Some(time.into()),
            speed: Some(speed.into()),
            ..Self::default()
        }
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn feeling(mut self, feeling: i64) -> Self {
        self.feeling = Some(feeling);
        self
    }

    /// The mode implied by which field pairs are complete, if exactly one is.
    pub fn implied_mode(&self) -> Option<Mode> {
        let strength = self.weight.is_some() && self.repetitions.is_some();
        let cardio = self.time.is_some() && self.speed.is_some();
        match (strength, cardio) {
            (true, false) => Some(Mode::Strength),
            (false, true) => Some(Mode::Cardio),
            _ => None,
        }
    }

    /// Fill in missing units from per-mode defaults.
    ///
    /// Left untouched when units are already set or the mode is ambiguous.
    pub fn with_default_units(mut self, strength: Option<Units>, cardio: Option<Units>) -> Self {
        if self.units.is_none() {
            let default = match self.implied_mode() {
                Some(Mode::Strength) => strength,
                Some(Mode::Cardio) => cardio,
                None => None,
            };
            self.units = default.map(|u| u.as_str().to_string());
        }
        self
    }
}

/// Mode-specific measurements of a validated workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Measures {
    Strength {
        weight: SetValue<f64>,
        repetitions: SetValue<u32>,
    },
    Cardio {
        time: SetValue<u32>,
        speed: SetValue<f64>,
    },
}

impl Measures {
    pub fn mode(&self) -> Mode {
        match self {
            Measures::Strength { .. } => Mode::Strength,
            Measures::Cardio { .. } => Mode::Cardio,
        }
    }

    fn has_per_set_variation(&self) -> bool {
        match self {
            Measures::Strength {
                weight,
                repetitions,
            } => weight.is_per_set() || repetitions.is_per_set(),
            Measures::Cardio { time, speed } => time.is_per_set() || speed.is_per_set(),
        }
    }

    fn at(&self, index: usize) -> SetMeasure {
        match self {
            Measures::Strength {
                weight,
                repetitions,
            } => SetMeasure::Strength {
                weight: weight.at(index),
                repetitions: repetitions.at(index),
            },
            Measures::Cardio { time, speed } => SetMeasure::Cardio {
                time: time.at(index),
                speed: speed.at(index),
            },
        }
    }
}

/// A validated description of how one exercise was performed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Performance {
    sets: u32,
    feeling: Option<u8>,
    units: Option<Units>,
    measures: Measures,
}

impl Performance {
    /// Validate raw workout fields.
    ///
    /// Checks, in order:
    /// 1. exactly one of weight+repetitions / time+speed is complete
    /// 2. `sets` is positive
    /// 3. feeling, if present, is within 1..=5
    /// 4. units, if present, belong to the active mode
    /// 5. every per-set list has exactly `sets` values
    /// 6. cardio time and speed are both lists or both single values, and a
    ///    multi-set cardio record describes each set
    /// 7. values are within the ranges storage accepts
    ///
    /// Fields of the inactive mode are dropped.
    pub fn new(raw: RawWorkout) -> Result<Self> {
        let mode = raw.implied_mode().ok_or(Error::InvalidMode)?;

        if raw.sets == 0 {
            return Err(Error::InvalidValue("sets must be greater than 0".into()));
        }
        let sets = raw.sets;

        let feeling = match raw.feeling {
            None => None,
            Some(f) if (1..=5).contains(&f) => Some(f as u8),
            Some(f) => return Err(Error::InvalidFeeling(f)),
        };

        let units = match raw.units {
            None => None,
            Some(text) => match text.parse::<Units>() {
                Ok(units) if units.mode() == mode => Some(units),
                _ => return Err(Error::InvalidUnits { units: text, mode }),
            },
        };

        let measures = match mode {
            Mode::Strength => {
                let (Some(weight), Some(repetitions)) = (raw.weight, raw.repetitions) else {
                    return Err(Error::InvalidMode);
                };
                check_len("weight", &weight, sets)?;
                check_len("repetitions", &repetitions, sets)?;

                for w in weight.values() {
                    if !w.is_finite() {
                        return Err(Error::InvalidValue(format!("weight {} is not a number", w)));
                    }
                }
                if repetitions.values().contains(&0) {
                    return Err(Error::InvalidValue("repetitions must be greater than 0".into()));
                }

                Measures::Strength {
                    weight,
                    repetitions,
                }
            }
            Mode::Cardio => {
                let (Some(time), Some(speed)) = (raw.time, raw.speed) else {
                    return Err(Error::InvalidMode);
                };
                check_len("time", &time, sets)?;
                check_len("speed", &speed, sets)?;

                if time.is_per_set() != speed.is_per_set() {
                    return Err(Error::InconsistentVariation);
                }
                if !time.is_per_set() && sets > 1 {
                    return Err(Error::SetCountMismatch {
                        field: "time",
                        sets,
                        len: 1,
                    });
                }

                if time.values().contains(&0) {
                    return Err(Error::InvalidValue("time must be greater than 0".into()));
                }
                for s in speed.values() {
                    if !(s.is_finite() && s > 0.0) {
                        return Err(Error::InvalidValue(format!(
                            "speed must be greater than 0, got {}",
                            s
                        )));
                    }
                }

                Measures::Cardio { time, speed }
            }
        };

        Ok(Self {
            sets,
            feeling,
            units,
            measures,
        })
    }

    pub fn sets(&self) -> u32 {
        self.sets
    }

    pub fn feeling(&self) -> Option<u8> {
        self.feeling
    }

    pub fn units(&self) -> Option<Units> {
        self.units
    }

    pub fn measures(&self) -> &Measures {
        &self.measures
    }

    pub fn mode(&self) -> Mode {
        self.measures.mode()
    }

    /// True when any field is given per set, which forces one row per set
    pub fn has_per_set_variation(&self) -> bool {
        self.measures.has_per_set_variation()
    }
}

fn check_len<T: Copy>(field: &'static str, value: &SetValue<T>, sets: u32) -> Result<()> {
    if value.is_per_set() && value.len() != sets as usize {
        return Err(Error::SetCountMismatch {
            field,
            sets,
            len: value.len(),
        });
    }
    Ok(())
}

/// A validated workout attached to its schedule entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    schedule_id: i64,
    #[serde(flatten)]
    performance: Performance,
}

impl WorkoutRecord {
    /// Validate `raw` and attach it to `schedule_id`.
    pub fn new(schedule_id: i64, raw: RawWorkout) -> Result<Self> {
        Ok(Self::from_performance(schedule_id, Performance::new(raw)?))
    }

    pub fn from_performance(schedule_id: i64, performance: Performance) -> Self {
        Self {
            schedule_id,
            performance,
        }
    }

    pub fn schedule_id(&self) -> i64 {
        self.schedule_id
    }

    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    pub fn sets(&self) -> u32 {
        self.performance.sets
    }

    pub fn has_per_set_variation(&self) -> bool {
        self.performance.has_per_set_variation()
    }

    /// Fan the record out into storage rows.
    ///
    /// Without per-set variation this is a single [`LocalOrder::AllSets`]
    /// row; otherwise one row per set, in set order.
    pub fn expand_to_rows(&self) -> Vec<WorkoutSetRow> {
        let p = &self.performance;
        let row = |local_order, index| WorkoutSetRow {
            schedule_id: self.schedule_id,
            feeling: p.feeling,
            local_order,
            sets: p.sets,
            measure: p.measures.at(index),
            units: p.units,
        };

        if !p.has_per_set_variation() {
            return vec![row(LocalOrder::AllSets, 0)];
        }

        (0..p.sets)
            .map(|i| row(LocalOrder::Set(i), i as usize))
            .collect()
    }

    /// Reassemble a record from its stored rows.
    ///
    /// Only uniform (all-sets) records come back exactly as recorded. Stored
    /// rows do not say which fields were given as lists, so the rebuilt
    /// record is the one that expands to the same rows: a field identical on
    /// every expanded strength row comes back as a single value, unless that
    /// would make the record non-varying. Expanded cardio rows always come
    /// back as lists.
    pub fn from_rows(rows: &[WorkoutSetRow]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::CorruptRows("no rows to reassemble".into()))?;

        for row in rows {
            if row.schedule_id != first.schedule_id
                || row.sets != first.sets
                || row.feeling != first.feeling
                || row.units != first.units
                || row.measure.mode() != first.measure.mode()
            {
                return Err(Error::CorruptRows(format!(
                    "rows of schedule {} disagree on sets, feeling, units or mode",
                    first.schedule_id
                )));
            }
        }

        let measures = if first.local_order == LocalOrder::AllSets {
            if rows.len() != 1 {
                return Err(Error::CorruptRows(format!(
                    "schedule {} mixes an all-sets row with other rows",
                    first.schedule_id
                )));
            }
            match first.measure {
                SetMeasure::Strength {
                    weight,
                    repetitions,
                } => Measures::Strength {
                    weight: SetValue::Scalar(weight),
                    repetitions: SetValue::Scalar(repetitions),
                },
                SetMeasure::Cardio { time, speed } => Measures::Cardio {
                    time: SetValue::Scalar(time),
                    speed: SetValue::Scalar(speed),
                },
            }
        } else {
            let mut ordered: Vec<&WorkoutSetRow> = rows.iter().collect();
            ordered.sort_by_key(|r| r.local_order);
            let expected: Vec<LocalOrder> = (0..first.sets).map(LocalOrder::Set).collect();
            let actual: Vec<LocalOrder> = ordered.iter().map(|r| r.local_order).collect();
            if actual != expected {
                return Err(Error::CorruptRows(format!(
                    "schedule {} has set indices {:?}, expected 0..{}",
                    first.schedule_id,
                    actual.iter().map(|o| i64::from(*o)).collect::<Vec<_>>(),
                    first.sets
                )));
            }

            match first.measure.mode() {
                Mode::Strength => {
                    let weights: Vec<f64> = ordered.iter().filter_map(|r| r.weight()).collect();
                    let reps: Vec<u32> = ordered.iter().filter_map(|r| r.repetitions()).collect();
                    let weight_uniform = weights.windows(2).all(|w| w[0] == w[1]);
                    let reps_uniform = reps.windows(2).all(|w| w[0] == w[1]);

                    if weight_uniform && reps_uniform {
                        Measures::Strength {
                            weight: SetValue::PerSet(weights),
                            repetitions: SetValue::PerSet(reps),
                        }
                    } else {
                        Measures::Strength {
                            weight: collapse(weights, weight_uniform),
                            repetitions: collapse(reps, reps_uniform),
                        }
                    }
                }
                Mode::Cardio => Measures::Cardio {
                    time: SetValue::PerSet(ordered.iter().filter_map(|r| r.time()).collect()),
                    speed: SetValue::PerSet(ordered.iter().filter_map(|r| r.speed()).collect()),
                },
            }
        };

        Ok(Self {
            schedule_id: first.schedule_id,
            performance: Performance {
                sets: first.sets,
                feeling: first.feeling,
                units: first.units,
                measures,
            },
        })
    }
}

fn collapse<T: Copy>(values: Vec<T>, uniform: bool) -> SetValue<T> {
    match values.first() {
        Some(&value) if uniform => SetValue::Scalar(value),
        _ => SetValue::PerSet(values),
    }
}
