//! Schedule ledger: which exercise was done at which position on which date.

use super::{is_foreign_key_violation, is_unique_violation, Database};
use crate::{Error, Result, ScheduleEntry};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn date_from_sql(text: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(text, DATE_FORMAT)?)
}

/// Raw schedule row before date parsing
struct ScheduleRow {
    id: i64,
    date: String,
    exercise_id: i64,
    order_number: u32,
}

impl ScheduleRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            exercise_id: row.get(2)?,
            order_number: row.get(3)?,
        })
    }
}

impl TryFrom<ScheduleRow> for ScheduleEntry {
    type Error = Error;

    fn try_from(row: ScheduleRow) -> Result<Self> {
        Ok(ScheduleEntry {
            id: row.id,
            date: date_from_sql(&row.date)?,
            exercise_id: row.exercise_id,
            order_number: row.order_number,
        })
    }
}

pub(crate) fn insert(
    conn: &Connection,
    date: NaiveDate,
    exercise_id: i64,
    order_number: u32,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO schedule (date, exercise_id, order_number) VALUES (?1, ?2, ?3)",
        params![date_to_sql(date), exercise_id, order_number],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            Error::DuplicateSchedule(format!(
                "{} already has exercise {} or an exercise at position {}",
                date, exercise_id, order_number
            ))
        } else if is_foreign_key_violation(&e) {
            Error::NotFound(format!("exercise {}", exercise_id))
        } else {
            Error::Sqlite(e)
        }
    })?;

    let id = conn.last_insert_rowid();
    tracing::debug!(
        "Scheduled exercise {} on {} at position {} as {}",
        exercise_id,
        date,
        order_number,
        id
    );
    Ok(id)
}

pub(crate) fn find(
    conn: &Connection,
    date: NaiveDate,
    exercise_id: i64,
) -> Result<Option<ScheduleEntry>> {
    let row = conn
        .query_row(
            "SELECT id, date, exercise_id, order_number FROM schedule
             WHERE date = ?1 AND exercise_id = ?2",
            params![date_to_sql(date), exercise_id],
            ScheduleRow::from_row,
        )
        .optional()?;
    row.map(ScheduleEntry::try_from).transpose()
}

/// Delete a schedule entry after its workout rows.
pub(crate) fn delete_cascade(conn: &Connection, schedule_id: i64) -> Result<usize> {
    let rows = super::workouts::delete_for_schedule(conn, schedule_id)?;
    let deleted = conn.execute("DELETE FROM schedule WHERE id = ?1", params![schedule_id])?;
    tracing::debug!(
        "Deleted schedule entry {} and {} workout rows",
        schedule_id,
        rows
    );
    Ok(deleted)
}

impl Database {
    /// Add a schedule entry and return its id.
    pub fn add_schedule_entry(
        &self,
        date: NaiveDate,
        exercise_id: i64,
        order_number: u32,
    ) -> Result<i64> {
        insert(self.connection(), date, exercise_id, order_number)
    }

    /// Find the entry for an exercise on a date.
    pub fn schedule_entry(
        &self,
        date: NaiveDate,
        exercise_id: i64,
    ) -> Result<Option<ScheduleEntry>> {
        find(self.connection(), date, exercise_id)
    }

    /// Entries on a date, by position.
    pub fn schedule_for_date(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, date, exercise_id, order_number FROM schedule
             WHERE date = ?1 ORDER BY order_number",
        )?;
        let rows = stmt
            .query_map(params![date_to_sql(date)], ScheduleRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ScheduleEntry::try_from).collect()
    }

    /// Distinct dates with at least one entry, ascending.
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT DISTINCT date FROM schedule ORDER BY date")?;
        let dates = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        dates.iter().map(|d| date_from_sql(d)).collect()
    }

    /// Delete every entry on a date together with its workout rows.
    ///
    /// Returns the number of schedule entries removed.
    pub fn delete_date(&mut self, date: NaiveDate) -> Result<usize> {
        let entries = self.schedule_for_date(date)?;

        let tx = self.transaction()?;
        for entry in &entries {
            delete_cascade(&tx, entry.id)?;
        }
        tx.commit()?;

        tracing::info!("Deleted {} workouts on {}", entries.len(), date);
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewExercise, RawWorkout};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn setup() -> (Database, i64, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let id1 = db.add_exercise(&NewExercise::new("A")).unwrap();
        let id2 = db.add_exercise(&NewExercise::new("B")).unwrap();
        let id3 = db.add_exercise(&NewExercise::new("C")).unwrap();
        (db, id1, id2, id3)
    }

    #[test]
    fn test_add_schedule_entry_uniqueness() {
        let (db, id1, id2, id3) = setup();

        db.add_schedule_entry(date("2024-01-01"), id1, 1).unwrap();
        db.add_schedule_entry(date("2024-01-01"), id2, 2).unwrap();
        db.add_schedule_entry(date("2024-01-02"), id1, 1).unwrap();

        // order slot taken
        assert!(matches!(
            db.add_schedule_entry(date("2024-01-01"), id3, 1),
            Err(Error::DuplicateSchedule(_))
        ));
        // exercise already on that date
        assert!(matches!(
            db.add_schedule_entry(date("2024-01-01"), id1, 3),
            Err(Error::DuplicateSchedule(_))
        ));
    }

    #[test]
    fn test_schedule_requires_existing_exercise() {
        let (db, ..) = setup();
        assert!(matches!(
            db.add_schedule_entry(date("2024-01-01"), 999, 1),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_find_schedule_entry() {
        let (db, id1, id2, _) = setup();
        let id = db.add_schedule_entry(date("2024-01-01"), id1, 1).unwrap();

        let entry = db.schedule_entry(date("2024-01-01"), id1).unwrap().unwrap();
        assert_eq!(
            entry,
            ScheduleEntry {
                id,
                date: date("2024-01-01"),
                exercise_id: id1,
                order_number: 1,
            }
        );
        assert!(db.schedule_entry(date("2024-01-01"), id2).unwrap().is_none());
        assert!(db.schedule_entry(date("2000-01-01"), id1).unwrap().is_none());
    }

    #[test]
    fn test_dates_and_day_order() {
        let (db, id1, id2, id3) = setup();
        db.add_schedule_entry(date("2025-04-05"), id1, 3).unwrap();
        db.add_schedule_entry(date("2025-03-27"), id2, 1).unwrap();
        db.add_schedule_entry(date("2025-04-05"), id2, 1).unwrap();
        db.add_schedule_entry(date("2025-04-05"), id3, 2).unwrap();

        assert_eq!(
            db.dates().unwrap(),
            vec![date("2025-03-27"), date("2025-04-05")]
        );
        let order: Vec<_> = db
            .schedule_for_date(date("2025-04-05"))
            .unwrap()
            .into_iter()
            .map(|e| (e.order_number, e.exercise_id))
            .collect();
        assert_eq!(order, vec![(1, id2), (2, id3), (3, id1)]);
    }

    #[test]
    fn test_delete_date_cascades() {
        let (mut db, ..) = setup();
        let day = date("2025-04-18");
        let other = date("2025-04-19");
        db.record_workout(day, "A", 1, RawWorkout::strength(3, 40.0, vec![10, 10, 8]))
            .unwrap();
        db.record_workout(day, "B", 2, RawWorkout::cardio(2, vec![180, 60], vec![5.5, 6.5]))
            .unwrap();
        db.record_workout(other, "A", 1, RawWorkout::strength(1, 42.5, 8))
            .unwrap();

        assert_eq!(db.delete_date(day).unwrap(), 2);
        assert_eq!(db.delete_date(day).unwrap(), 0);
        assert_eq!(db.dates().unwrap(), vec![other]);

        let rows: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
