//! Database schema definitions.

/// Tables in dependency order (parents first).
pub const TABLES: [&str; 3] = ["exercises", "schedule", "workouts"];

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Exercise registry
CREATE TABLE IF NOT EXISTS exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    alias TEXT UNIQUE,
    target_muscle_group TEXT
);

-- One exercise at one position on one date
CREATE TABLE IF NOT EXISTS schedule (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    exercise_id INTEGER NOT NULL REFERENCES exercises(id),
    order_number INTEGER NOT NULL,
    UNIQUE(date, exercise_id),
    UNIQUE(date, order_number)
);

-- One row per set, or a single row with local_order = -1 for identical sets
CREATE TABLE IF NOT EXISTS workouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    schedule_id INTEGER NOT NULL REFERENCES schedule(id),
    feeling INTEGER CHECK(feeling BETWEEN 1 AND 5),
    local_order INTEGER NOT NULL CHECK(local_order >= -1 AND local_order < sets),
    sets INTEGER NOT NULL CHECK(sets > 0),
    weight REAL,
    repetitions INTEGER CHECK(repetitions > 0),
    time INTEGER CHECK(time > 0),
    speed REAL CHECK(speed > 0),
    units TEXT CHECK(units IN ('kg', 'lbs', 'kph', 'mph') OR units IS NULL),
    CHECK(
        (weight IS NOT NULL AND repetitions IS NOT NULL AND time IS NULL AND speed IS NULL)
        OR
        (time IS NOT NULL AND speed IS NOT NULL AND weight IS NULL AND repetitions IS NULL)
    ),
    UNIQUE(schedule_id, local_order)
);

CREATE INDEX IF NOT EXISTS idx_schedule_exercise ON schedule(exercise_id);
CREATE INDEX IF NOT EXISTS idx_workouts_schedule ON workouts(schedule_id);
"#;
