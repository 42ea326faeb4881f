//! Exercise registry: names, aliases and muscle groups.

use super::{is_unique_violation, Database};
use crate::{catalog, Error, Exercise, NewExercise, Result};
use rusqlite::{params, Connection, OptionalExtension};

pub(crate) fn insert(conn: &Connection, exercise: &NewExercise) -> Result<i64> {
    conn.execute(
        "INSERT INTO exercises (name, alias, target_muscle_group) VALUES (?1, ?2, ?3)",
        params![exercise.name, exercise.alias, exercise.muscle_group],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            Error::DuplicateExercise(exercise.name.clone())
        } else {
            Error::Sqlite(e)
        }
    })?;

    let id = conn.last_insert_rowid();
    tracing::debug!("Inserted exercise {:?} as {}", exercise.name, id);
    Ok(id)
}

pub(crate) fn find_id(conn: &Connection, name: &str, may_be_alias: bool) -> Result<Option<i64>> {
    let id = if may_be_alias {
        conn.query_row(
            "SELECT id FROM exercises WHERE name = ?1 OR alias = ?1
             ORDER BY name = ?1 DESC LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
    } else {
        conn.query_row(
            "SELECT id FROM exercises WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
    };
    Ok(id)
}

/// Delete an exercise after its schedule entries and their workout rows.
pub(crate) fn delete_cascade(conn: &Connection, exercise_id: i64) -> Result<usize> {
    let rows = conn.execute(
        "DELETE FROM workouts
         WHERE schedule_id IN (SELECT id FROM schedule WHERE exercise_id = ?1)",
        params![exercise_id],
    )?;
    let entries = conn.execute(
        "DELETE FROM schedule WHERE exercise_id = ?1",
        params![exercise_id],
    )?;
    let deleted = conn.execute("DELETE FROM exercises WHERE id = ?1", params![exercise_id])?;

    tracing::debug!(
        "Deleted exercise {} with {} schedule entries and {} workout rows",
        exercise_id,
        entries,
        rows
    );
    Ok(deleted)
}

fn exercise_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        name: row.get(1)?,
        alias: row.get(2)?,
        muscle_group: row.get(3)?,
    })
}

impl Database {
    /// Register a new exercise and return its id.
    pub fn add_exercise(&self, exercise: &NewExercise) -> Result<i64> {
        insert(self.connection(), exercise)
    }

    /// Look up an exercise id by name, or also by alias when `may_be_alias`.
    pub fn exercise_id(&self, name: &str, may_be_alias: bool) -> Result<Option<i64>> {
        find_id(self.connection(), name, may_be_alias)
    }

    /// Resolve a name or alias to an id, failing with `UnknownExercise`.
    pub fn resolve_exercise(&self, name_or_alias: &str) -> Result<i64> {
        self.exercise_id(name_or_alias, true)?
            .ok_or_else(|| Error::UnknownExercise(name_or_alias.to_string()))
    }

    /// Get an exercise by id.
    pub fn exercise(&self, id: i64) -> Result<Option<Exercise>> {
        let exercise = self
            .connection()
            .query_row(
                "SELECT id, name, alias, target_muscle_group FROM exercises WHERE id = ?1",
                params![id],
                exercise_from_row,
            )
            .optional()?;
        Ok(exercise)
    }

    /// All exercises, in registration order.
    pub fn exercises(&self) -> Result<Vec<Exercise>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id, name, alias, target_muscle_group FROM exercises ORDER BY id")?;
        let exercises = stmt
            .query_map([], exercise_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(exercises)
    }

    /// Delete an exercise (by name or alias) and everything recorded for it.
    pub fn delete_exercise(&mut self, name_or_alias: &str) -> Result<()> {
        let exercise_id = self.resolve_exercise(name_or_alias)?;

        let tx = self.transaction()?;
        delete_cascade(&tx, exercise_id)?;
        tx.commit()?;

        tracing::info!("Deleted exercise {:?}", name_or_alias);
        Ok(())
    }

    /// Register the built-in exercises, skipping any whose name or alias is
    /// already taken. Returns the number added.
    pub fn seed_default_exercises(&mut self) -> Result<usize> {
        let tx = self.transaction()?;
        let mut added = 0;

        for exercise in catalog::default_exercises() {
            let name_taken = find_id(&tx, &exercise.name, true)?.is_some();
            let alias_taken = match &exercise.alias {
                Some(alias) => find_id(&tx, alias, true)?.is_some(),
                None => false,
            };
            if name_taken || alias_taken {
                tracing::debug!("Skipping existing exercise {:?}", exercise.name);
                continue;
            }
            insert(&tx, exercise)?;
            added += 1;
        }

        tx.commit()?;
        tracing::info!("Seeded {} default exercises", added);
        Ok(added)
    }
}
