//! Built-in exercise list used to seed a fresh database.

use crate::types::NewExercise;
use once_cell::sync::Lazy;

/// Cached default exercises - built once and reused
static DEFAULT_EXERCISES: Lazy<Vec<NewExercise>> = Lazy::new(build_default_exercises);

/// Get a reference to the cached default exercises
pub fn default_exercises() -> &'static [NewExercise] {
    &DEFAULT_EXERCISES
}

fn build_default_exercises() -> Vec<NewExercise> {
    let entry = |name: &str, alias: &str, group: &str| {
        NewExercise::new(name)
            .with_alias(alias)
            .with_muscle_group(group)
    };

    vec![
        entry("Neutral Pull Up", "neutral pullup", "Arms (Biceps)"),
        entry("Wide Pull Up", "wide pullup", "Back"),
        entry("Leg Extension", "leg ext", "Legs (Quadriceps)"),
        entry("Seated Row", "row", "Back (Lats)"),
        entry("Wide Grip Lat Pulldown", "pulldown", "Back"),
        entry("Seated Leg Curl", "leg curl", "Legs (Hamstrings)"),
        entry("Pec Deck", "fly", "Chest"),
        entry("Cable Rope Pushdown", "pushdown", "Arms (Triceps)"),
        entry("Chest Press Machine", "chest press", "Chest"),
        entry("Treadmill", "run", "Legs"),
        entry("Barbell Curl", "curl", "Arms (Biceps)"),
    ]
}
