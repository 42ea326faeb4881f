//! Recording and querying workouts by date and exercise name.
//!
//! This is the layer the CLI talks to: it resolves exercise names and
//! aliases, validates raw input before touching storage, and keeps the
//! schedule entry and its rows consistent.

use crate::storage::{schedule, workouts, Database, HistoryFilter};
use crate::{
    Error, HistoryRow, Performance, RawWorkout, Result, ScheduleEntry, WorkoutRecord,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

impl Database {
    /// Record a workout for an exercise at a position on a date.
    ///
    /// The exercise is resolved before the input is validated, and nothing
    /// is written unless both succeed. The schedule entry and all expanded
    /// rows are written in one transaction.
    pub fn record_workout(
        &mut self,
        date: NaiveDate,
        exercise: &str,
        order_number: u32,
        raw: RawWorkout,
    ) -> Result<WorkoutRecord> {
        let exercise_id = self.resolve_exercise(exercise)?;
        let performance = Performance::new(raw)?;

        let tx = self.transaction()?;
        let schedule_id = schedule::insert(&tx, date, exercise_id, order_number)?;
        let record = WorkoutRecord::from_performance(schedule_id, performance);
        workouts::insert_rows(&tx, &record.expand_to_rows())?;
        tx.commit()?;

        tracing::info!(
            "Recorded {} on {} (position {}, {} sets)",
            exercise,
            date,
            order_number,
            record.sets()
        );
        Ok(record)
    }

    /// Replace the sets recorded for an exercise on a date.
    ///
    /// The schedule entry (and its position) is kept; its rows are swapped
    /// atomically.
    pub fn amend_workout(
        &mut self,
        date: NaiveDate,
        exercise: &str,
        raw: RawWorkout,
    ) -> Result<WorkoutRecord> {
        let entry = self.require_entry(date, exercise)?;
        let performance = Performance::new(raw)?;

        let tx = self.transaction()?;
        workouts::delete_for_schedule(&tx, entry.id)?;
        let record = WorkoutRecord::from_performance(entry.id, performance);
        workouts::insert_rows(&tx, &record.expand_to_rows())?;
        tx.commit()?;

        tracing::info!("Amended {} on {}", exercise, date);
        Ok(record)
    }

    /// The workout recorded for an exercise on a date, if any.
    ///
    /// Fails with `UnknownExercise` when the exercise itself does not exist.
    pub fn find_workout(
        &self,
        date: NaiveDate,
        exercise: &str,
    ) -> Result<Option<(ScheduleEntry, WorkoutRecord)>> {
        let exercise_id = self.resolve_exercise(exercise)?;
        let Some(entry) = self.schedule_entry(date, exercise_id)? else {
            return Ok(None);
        };

        let rows = self.workout_rows(entry.id)?;
        if rows.is_empty() {
            return Ok(None);
        }
        let record = WorkoutRecord::from_rows(&rows)?;
        Ok(Some((entry, record)))
    }

    /// Delete the workout for an exercise on a date.
    pub fn delete_workout(&mut self, date: NaiveDate, exercise: &str) -> Result<()> {
        let entry = self.require_entry(date, exercise)?;

        let tx = self.transaction()?;
        schedule::delete_cascade(&tx, entry.id)?;
        tx.commit()?;

        tracing::info!("Deleted {} on {}", exercise, date);
        Ok(())
    }

    /// Every stored set on a date, by position.
    pub fn day_summary(&self, date: NaiveDate) -> Result<Vec<HistoryRow>> {
        self.history(HistoryFilter {
            date: Some(date),
            ..HistoryFilter::default()
        })
    }

    /// Every stored set of one exercise, oldest first.
    pub fn exercise_history(&self, exercise: &str) -> Result<Vec<HistoryRow>> {
        let exercise_id = self.resolve_exercise(exercise)?;
        self.history(HistoryFilter {
            exercise_id: Some(exercise_id),
            ..HistoryFilter::default()
        })
    }

    /// Heaviest weight lifted per date for an exercise.
    ///
    /// Cardio rows are ignored; dates are ascending.
    pub fn weight_progress(&self, exercise: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let mut best: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for entry in self.exercise_history(exercise)? {
            if let Some(weight) = entry.row.weight() {
                best.entry(entry.date)
                    .and_modify(|w| *w = w.max(weight))
                    .or_insert(weight);
            }
        }
        Ok(best.into_iter().collect())
    }

    fn require_entry(&self, date: NaiveDate, exercise: &str) -> Result<ScheduleEntry> {
        let exercise_id = self.resolve_exercise(exercise)?;
        self.schedule_entry(date, exercise_id)?
            .ok_or_else(|| Error::NotFound(format!("no {} workout on {}", exercise, date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocalOrder, NewExercise, SetValue};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.add_exercise(
            &NewExercise::new("Seated Row")
                .with_alias("row")
                .with_muscle_group("Back (Lats)"),
        )
        .unwrap();
        db.add_exercise(&NewExercise::new("Treadmill").with_muscle_group("Legs"))
            .unwrap();
        db
    }

    #[test]
    fn test_record_and_find_workout() {
        let mut db = setup();
        let day = date(2025, 4, 5);
        let raw = RawWorkout::strength(3, vec![35.0, 37.5, 37.5], 10)
            .units("kg")
            .feeling(3);

        let recorded = db.record_workout(day, "row", 3, raw).unwrap();
        let (entry, found) = db.find_workout(day, "Seated Row").unwrap().unwrap();

        assert_eq!(entry.order_number, 3);
        assert_eq!(found, recorded);
        assert_eq!(db.workout_rows(entry.id).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_input_touches_nothing() {
        let mut db = setup();
        let day = date(2025, 4, 5);
        let raw = RawWorkout::cardio(3, 600, vec![5.0, 6.5, 5.0]);

        assert!(matches!(
            db.record_workout(day, "Treadmill", 1, raw),
            Err(Error::InconsistentVariation)
        ));
        assert!(db.dates().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_exercise() {
        let mut db = setup();
        let result = db.record_workout(
            date(2025, 4, 5),
            "Squat",
            1,
            RawWorkout::strength(1, 100.0, 5),
        );
        assert!(matches!(result, Err(Error::UnknownExercise(name)) if name == "Squat"));

        assert!(matches!(
            db.find_workout(date(2025, 4, 5), "Squat"),
            Err(Error::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_unknown_exercise_reported_before_invalid_input() {
        let mut db = setup();
        let day = date(2025, 4, 5);
        let invalid = || RawWorkout::cardio(3, 600, vec![5.0, 6.5, 5.0]);

        assert!(matches!(
            db.record_workout(day, "Rowing Machine", 1, invalid()),
            Err(Error::UnknownExercise(name)) if name == "Rowing Machine"
        ));
        assert!(matches!(
            db.amend_workout(day, "Rowing Machine", invalid()),
            Err(Error::UnknownExercise(_))
        ));
        assert!(db.dates().unwrap().is_empty());
    }

    #[test]
    fn test_missing_entry_reported_before_invalid_input() {
        let mut db = setup();
        assert!(matches!(
            db.amend_workout(
                date(2025, 4, 5),
                "Treadmill",
                RawWorkout::cardio(3, 600, vec![5.0, 6.5, 5.0])
            ),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_schedule_leaves_no_rows() {
        let mut db = setup();
        let day = date(2025, 3, 27);
        db.record_workout(day, "Seated Row", 1, RawWorkout::strength(3, 35.0, 10))
            .unwrap();

        // same exercise twice on one day
        assert!(matches!(
            db.record_workout(day, "row", 2, RawWorkout::strength(3, 40.0, 10)),
            Err(Error::DuplicateSchedule(_))
        ));
        // two exercises in one slot
        assert!(matches!(
            db.record_workout(day, "Treadmill", 1, RawWorkout::cardio(1, 600, 5.5)),
            Err(Error::DuplicateSchedule(_))
        ));

        assert_eq!(db.day_summary(day).unwrap().len(), 1);
    }

    #[test]
    fn test_find_missing_workout() {
        let mut db = setup();
        db.record_workout(date(2025, 3, 27), "Seated Row", 1, RawWorkout::strength(3, 35.0, 10))
            .unwrap();

        assert!(db.find_workout(date(2000, 1, 1), "Seated Row").unwrap().is_none());
        assert!(db.find_workout(date(2025, 3, 27), "Treadmill").unwrap().is_none());
    }

    #[test]
    fn test_amend_workout_replaces_rows() {
        let mut db = setup();
        let day = date(2025, 4, 18);
        db.record_workout(day, "Treadmill", 1, RawWorkout::cardio(1, 600, 5.5))
            .unwrap();

        let amended = RawWorkout::cardio(
            5,
            vec![180, 60, 120, 60, 300],
            vec![5.5, 6.5, 8.5, 6.5, 5.5],
        )
        .units("kph")
        .feeling(4);
        db.amend_workout(day, "Treadmill", amended).unwrap();

        let (entry, record) = db.find_workout(day, "Treadmill").unwrap().unwrap();
        assert_eq!(entry.order_number, 1);
        assert_eq!(record.sets(), 5);
        let rows = record.expand_to_rows();
        assert_eq!(rows[2].speed(), Some(8.5));
        assert_eq!(rows[4].local_order, LocalOrder::Set(4));
    }

    #[test]
    fn test_amend_keeps_old_rows_on_invalid_input() {
        let mut db = setup();
        let day = date(2025, 4, 18);
        db.record_workout(day, "Seated Row", 1, RawWorkout::strength(3, 40.0, 10))
            .unwrap();

        let bad = RawWorkout::strength(3, vec![40.0, 42.5], 10);
        assert!(matches!(
            db.amend_workout(day, "Seated Row", bad),
            Err(Error::SetCountMismatch { .. })
        ));
        let (_, record) = db.find_workout(day, "Seated Row").unwrap().unwrap();
        match record.performance().measures() {
            crate::Measures::Strength { weight, .. } => assert_eq!(weight, &SetValue::Scalar(40.0)),
            other => panic!("unexpected measures {:?}", other),
        }
    }

    #[test]
    fn test_amend_missing_workout() {
        let mut db = setup();
        assert!(matches!(
            db.amend_workout(date(2025, 1, 1), "Treadmill", RawWorkout::cardio(1, 600, 5.5)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_workout() {
        let mut db = setup();
        let day = date(2025, 3, 27);
        let varying = RawWorkout::strength(3, vec![35.0, 37.5, 37.5], 10);
        db.record_workout(day, "Seated Row", 1, varying).unwrap();
        db.record_workout(day, "Treadmill", 2, RawWorkout::cardio(1, 600, 5.5))
            .unwrap();

        db.delete_workout(day, "row").unwrap();

        let summary = db.day_summary(day).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].exercise, "Treadmill");
        assert!(matches!(
            db.delete_workout(day, "row"),
            Err(Error::NotFound(_))
        ));

        // the freed slot and exercise can be reused
        db.record_workout(day, "Seated Row", 1, RawWorkout::strength(1, 40.0, 8))
            .unwrap();
    }

    #[test]
    fn test_weight_progress() {
        let mut db = setup();
        let logs = [
            (date(2025, 3, 27), "Seated Row", 2, RawWorkout::strength(3, 35.0, 10)),
            (
                date(2025, 4, 5),
                "Seated Row",
                3,
                RawWorkout::strength(3, vec![35.0, 37.5, 37.5], 10),
            ),
            (
                date(2025, 4, 18),
                "Seated Row",
                2,
                RawWorkout::strength(3, 40.0, vec![10, 10, 8]),
            ),
            (date(2025, 4, 18), "Treadmill", 1, RawWorkout::cardio(1, 600, 5.5)),
        ];
        for (day, exercise, order, raw) in logs {
            db.record_workout(day, exercise, order, raw).unwrap();
        }

        assert_eq!(
            db.weight_progress("row").unwrap(),
            vec![
                (date(2025, 3, 27), 35.0),
                (date(2025, 4, 5), 37.5),
                (date(2025, 4, 18), 40.0),
            ]
        );
        assert!(db.weight_progress("Treadmill").unwrap().is_empty());
        assert!(matches!(
            db.weight_progress("Squat"),
            Err(Error::UnknownExercise(_))
        ));
    }
}
