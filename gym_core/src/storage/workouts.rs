//! Stored workout rows: one per set, or one for a whole uniform workout.

use super::schedule::{date_from_sql, date_to_sql};
use super::{is_foreign_key_violation, is_unique_violation, Database};
use crate::{
    Error, HistoryRow, LocalOrder, Result, SetMeasure, Units, WorkoutRecord, WorkoutSetRow,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

const ROW_COLUMNS: &str = "w.schedule_id, w.feeling, w.local_order, w.sets,
     w.weight, w.repetitions, w.time, w.speed, w.units";

/// Workout row exactly as stored, before mode reconstruction
#[derive(Debug)]
struct FlatRow {
    schedule_id: i64,
    feeling: Option<i64>,
    local_order: i64,
    sets: i64,
    weight: Option<f64>,
    repetitions: Option<i64>,
    time: Option<i64>,
    speed: Option<f64>,
    units: Option<String>,
}

impl FlatRow {
    /// Read the `ROW_COLUMNS` starting at column `offset`.
    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            schedule_id: row.get(offset)?,
            feeling: row.get(offset + 1)?,
            local_order: row.get(offset + 2)?,
            sets: row.get(offset + 3)?,
            weight: row.get(offset + 4)?,
            repetitions: row.get(offset + 5)?,
            time: row.get(offset + 6)?,
            speed: row.get(offset + 7)?,
            units: row.get(offset + 8)?,
        })
    }
}

fn to_u32(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::CorruptRows(format!("{} {} out of range", field, value)))
}

impl TryFrom<FlatRow> for WorkoutSetRow {
    type Error = Error;

    fn try_from(row: FlatRow) -> Result<Self> {
        let measure = match (row.weight, row.repetitions, row.time, row.speed) {
            (Some(weight), Some(repetitions), None, None) => SetMeasure::Strength {
                weight,
                repetitions: to_u32("repetitions", repetitions)?,
            },
            (None, None, Some(time), Some(speed)) => SetMeasure::Cardio {
                time: to_u32("time", time)?,
                speed,
            },
            _ => {
                return Err(Error::CorruptRows(format!(
                    "row of schedule {} mixes strength and cardio fields",
                    row.schedule_id
                )))
            }
        };

        let feeling = row
            .feeling
            .map(|f| {
                u8::try_from(f)
                    .map_err(|_| Error::CorruptRows(format!("feeling {} out of range", f)))
            })
            .transpose()?;

        let units = row
            .units
            .map(|u| {
                u.parse::<Units>()
                    .map_err(|_| Error::CorruptRows(format!("unknown units {:?}", u)))
            })
            .transpose()?;

        Ok(WorkoutSetRow {
            schedule_id: row.schedule_id,
            feeling,
            local_order: LocalOrder::try_from(row.local_order)?,
            sets: to_u32("sets", row.sets)?,
            measure,
            units,
        })
    }
}

/// Insert rows, returning their ids. Callers wrap this in a transaction.
pub(crate) fn insert_rows(conn: &Connection, rows: &[WorkoutSetRow]) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "INSERT INTO workouts
         (schedule_id, feeling, local_order, sets, weight, repetitions, time, speed, units)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;

    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        let local_order = i64::from(row.local_order);
        stmt.execute(params![
            row.schedule_id,
            row.feeling,
            local_order,
            row.sets,
            row.weight(),
            row.repetitions(),
            row.time(),
            row.speed(),
            row.units.map(|u| u.as_str()),
        ])
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateWorkoutRow {
                    schedule_id: row.schedule_id,
                    local_order,
                }
            } else if is_foreign_key_violation(&e) {
                Error::NotFound(format!("schedule entry {}", row.schedule_id))
            } else {
                Error::Sqlite(e)
            }
        })?;
        ids.push(conn.last_insert_rowid());
    }

    tracing::debug!("Inserted {} workout rows", ids.len());
    Ok(ids)
}

pub(crate) fn rows_for_schedule(conn: &Connection, schedule_id: i64) -> Result<Vec<WorkoutSetRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM workouts w WHERE w.schedule_id = ?1 ORDER BY w.local_order",
        ROW_COLUMNS
    ))?;
    let flat = stmt
        .query_map(params![schedule_id], |row| FlatRow::from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    flat.into_iter().map(WorkoutSetRow::try_from).collect()
}

pub(crate) fn delete_for_schedule(conn: &Connection, schedule_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM workouts WHERE schedule_id = ?1",
        params![schedule_id],
    )?)
}

/// Restricts [`Database::history`] to a date and/or an exercise
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub date: Option<NaiveDate>,
    pub exercise_id: Option<i64>,
}

impl Database {
    /// Expand a validated record and store all its rows atomically.
    pub fn add_workout(&mut self, record: &WorkoutRecord) -> Result<Vec<i64>> {
        let rows = record.expand_to_rows();
        let tx = self.transaction()?;
        let ids = insert_rows(&tx, &rows)?;
        tx.commit()?;
        Ok(ids)
    }

    /// Stored rows of one schedule entry, in set order.
    pub fn workout_rows(&self, schedule_id: i64) -> Result<Vec<WorkoutSetRow>> {
        rows_for_schedule(self.connection(), schedule_id)
    }

    /// Delete the rows of one schedule entry, keeping the entry.
    pub fn delete_workouts_by_schedule(&self, schedule_id: i64) -> Result<usize> {
        delete_for_schedule(self.connection(), schedule_id)
    }

    /// Stored rows joined with date, exercise name and position.
    ///
    /// Ordered by date, position and set.
    pub fn history(&self, filter: HistoryFilter) -> Result<Vec<HistoryRow>> {
        let mut stmt = self.connection().prepare(&format!(
            "SELECT w.id, s.date, e.name, s.order_number, {}
             FROM workouts w
             JOIN schedule s ON w.schedule_id = s.id
             JOIN exercises e ON s.exercise_id = e.id
             WHERE (?1 IS NULL OR s.date = ?1) AND (?2 IS NULL OR s.exercise_id = ?2)
             ORDER BY s.date, s.order_number, w.local_order",
            ROW_COLUMNS
        ))?;

        let raw = stmt
            .query_map(
                params![filter.date.map(date_to_sql), filter.exercise_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, u32>(3)?,
                        FlatRow::from_row(row, 4)?,
                    ))
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(workout_id, date, exercise, order_number, flat)| {
                Ok(HistoryRow {
                    workout_id,
                    date: date_from_sql(&date)?,
                    exercise,
                    order_number,
                    row: WorkoutSetRow::try_from(flat)?,
                })
            })
            .collect()
    }
}
