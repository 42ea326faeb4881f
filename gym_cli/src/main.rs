mod input;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gym_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(about = "Personal workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    Init,

    /// Drop and recreate all tables, deleting every record
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Add the built-in exercises
    Seed,

    /// Manage exercises
    #[command(subcommand)]
    Exercise(ExerciseCommands),

    /// Log a workout
    Log {
        /// Date (YYYY-MM-DD, MM-DD or "today")
        #[arg(long, value_parser = input::date_arg)]
        date: NaiveDate,

        /// Exercise name or alias
        #[arg(long)]
        exercise: String,

        /// Position in the day's session (defaults to the next free one)
        #[arg(long)]
        order: Option<u32>,

        /// Number of sets
        #[arg(long)]
        sets: u32,

        /// Weight, or comma-separated weights per set
        #[arg(long, allow_negative_numbers = true, value_parser = input::set_value_arg::<f64>)]
        weight: Option<SetValue<f64>>,

        /// Repetitions, or comma-separated repetitions per set
        #[arg(long, value_parser = input::set_value_arg::<u32>)]
        reps: Option<SetValue<u32>>,

        /// Time in seconds, or comma-separated times per set
        #[arg(long, value_parser = input::set_value_arg::<u32>)]
        time: Option<SetValue<u32>>,

        /// Speed, or comma-separated speeds per set
        #[arg(long, value_parser = input::set_value_arg::<f64>)]
        speed: Option<SetValue<f64>>,

        /// kg or lbs for strength, kph or mph for cardio
        #[arg(long)]
        units: Option<String>,

        /// How it felt, 1 to 5
        #[arg(long, allow_negative_numbers = true)]
        feeling: Option<i64>,

        /// Replace the workout already logged for this exercise and date
        #[arg(long, conflicts_with = "order")]
        replace: bool,
    },

    /// Show the workout logged for an exercise on a date
    Find {
        #[arg(long, value_parser = input::date_arg)]
        date: NaiveDate,

        #[arg(long)]
        exercise: String,
    },

    /// Show every set logged on a date
    Show {
        #[arg(long, value_parser = input::date_arg)]
        date: NaiveDate,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List dates with logged workouts
    Dates,

    /// Delete every workout on a date
    DeleteDate {
        #[arg(long, value_parser = input::date_arg)]
        date: NaiveDate,

        #[arg(long)]
        yes: bool,
    },

    /// Delete the workout for an exercise on a date
    DeleteWorkout {
        #[arg(long, value_parser = input::date_arg)]
        date: NaiveDate,

        #[arg(long)]
        exercise: String,

        #[arg(long)]
        yes: bool,
    },

    /// Heaviest weight per date for an exercise
    Progress {
        #[arg(long)]
        exercise: String,
    },

    /// Export every logged set to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Register an exercise
    Add {
        name: String,

        #[arg(long)]
        alias: Option<String>,

        #[arg(long)]
        muscle_group: Option<String>,
    },

    /// List registered exercises
    List,

    /// Delete an exercise and everything logged for it
    Delete {
        /// Name or alias
        name: String,

        #[arg(long)]
        yes: bool,
    },
}

/// Workout fields collected from `gymlog log`
struct LogArgs {
    date: NaiveDate,
    exercise: String,
    order: Option<u32>,
    replace: bool,
    raw: RawWorkout,
}

fn main() -> Result<()> {
    gym_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let db_path = cli.db.unwrap_or_else(|| config.data.db_path.clone());
    tracing::debug!("Using database {:?}", db_path);

    match cli.command {
        Commands::Init => cmd_init(&db_path),
        Commands::Reset { yes } => cmd_reset(&db_path, yes),
        Commands::Seed => cmd_seed(&db_path),
        Commands::Exercise(command) => cmd_exercise(&db_path, command),
        Commands::Log {
            date,
            exercise,
            order,
            sets,
            weight,
            reps,
            time,
            speed,
            units,
            feeling,
            replace,
        } => {
            let raw = RawWorkout {
                sets,
                weight,
                repetitions: reps,
                time,
                speed,
                units,
                feeling,
            }
            .with_default_units(Some(config.units.strength), Some(config.units.cardio));
            cmd_log(
                &db_path,
                LogArgs {
                    date,
                    exercise,
                    order,
                    replace,
                    raw,
                },
            )
        }
        Commands::Find { date, exercise } => cmd_find(&db_path, date, &exercise),
        Commands::Show { date, json } => cmd_show(&db_path, date, json),
        Commands::Dates => cmd_dates(&db_path),
        Commands::DeleteDate { date, yes } => cmd_delete_date(&db_path, date, yes),
        Commands::DeleteWorkout {
            date,
            exercise,
            yes,
        } => cmd_delete_workout(&db_path, date, &exercise, yes),
        Commands::Progress { exercise } => cmd_progress(&db_path, &exercise),
        Commands::Export { out } => cmd_export(&db_path, &out),
    }
}

fn cmd_init(db_path: &Path) -> Result<()> {
    tracing::debug!("Initializing database at {:?}", db_path);
    Database::open(db_path)?;
    println!("✓ Database ready at {}", db_path.display());
    Ok(())
}

fn cmd_reset(db_path: &Path, yes: bool) -> Result<()> {
    if !confirm("Delete ALL exercises and workouts?", yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let db = Database::open(db_path)?;
    db.reset()?;
    tracing::info!("Reset database at {:?}", db_path);
    println!("✓ Database reset");
    Ok(())
}

fn cmd_seed(db_path: &Path) -> Result<()> {
    let mut db = Database::open(db_path)?;
    let added = db.seed_default_exercises()?;
    println!("✓ Added {} exercises", added);
    Ok(())
}

fn cmd_exercise(db_path: &Path, command: ExerciseCommands) -> Result<()> {
    let mut db = Database::open(db_path)?;

    match command {
        ExerciseCommands::Add {
            name,
            alias,
            muscle_group,
        } => {
            let exercise = NewExercise {
                name,
                alias,
                muscle_group,
            };
            db.add_exercise(&exercise)?;
            println!("✓ Added {}", exercise.name);
        }
        ExerciseCommands::List => {
            let exercises = db.exercises()?;
            if exercises.is_empty() {
                println!("No exercises. Run `gymlog seed` to add the built-in ones.");
            }
            for exercise in exercises {
                println!(
                    "{:<28} {:<16} {}",
                    exercise.name,
                    exercise.alias.as_deref().unwrap_or("-"),
                    exercise.muscle_group.as_deref().unwrap_or("-")
                );
            }
        }
        ExerciseCommands::Delete { name, yes } => {
            let prompt = format!("Delete {} and every workout logged for it?", name);
            if !confirm(&prompt, yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            db.delete_exercise(&name)?;
            println!("✓ Deleted {}", name);
        }
    }

    Ok(())
}

fn cmd_log(db_path: &Path, args: LogArgs) -> Result<()> {
    let mut db = Database::open(db_path)?;

    let record = if args.replace {
        db.amend_workout(args.date, &args.exercise, args.raw)?
    } else {
        let order = match args.order {
            Some(order) => order,
            None => {
                let order = next_position(&db, args.date)?;
                tracing::debug!("No --order given, using position {}", order);
                order
            }
        };
        db.record_workout(args.date, &args.exercise, order, args.raw)?
    };

    println!(
        "✓ Logged {} on {}: {}",
        args.exercise,
        args.date,
        describe(record.performance())
    );
    Ok(())
}

fn next_position(db: &Database, date: NaiveDate) -> Result<u32> {
    let last = db
        .schedule_for_date(date)?
        .last()
        .map(|entry| entry.order_number);
    position_after(last)
}

/// The position following `last`, or 1 on an empty day
fn position_after(last: Option<u32>) -> Result<u32> {
    match last {
        None => Ok(1),
        Some(n) => n.checked_add(1).ok_or_else(|| {
            Error::InvalidValue(format!(
                "no position after {}; pass --order explicitly",
                n
            ))
        }),
    }
}

fn cmd_find(db_path: &Path, date: NaiveDate, exercise: &str) -> Result<()> {
    let db = Database::open(db_path)?;

    match db.find_workout(date, exercise)? {
        Some((entry, record)) => println!(
            "{} #{} {}: {}",
            entry.date,
            entry.order_number,
            exercise,
            describe(record.performance())
        ),
        None => println!("No {} workout on {}", exercise, date),
    }
    Ok(())
}

fn cmd_show(db_path: &Path, date: NaiveDate, json: bool) -> Result<()> {
    let db = Database::open(db_path)?;
    let rows = db.day_summary(date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No workouts on {}", date);
        return Ok(());
    }

    println!("{}", date);
    for entry in &rows {
        let set = match entry.row.local_order {
            LocalOrder::AllSets => format!("{} sets", entry.row.sets),
            LocalOrder::Set(i) => format!("set {}/{}", i + 1, entry.row.sets),
        };
        let units = entry.row.units.map(|u| u.as_str()).unwrap_or("");
        let measure = match entry.row.measure {
            SetMeasure::Strength {
                weight,
                repetitions,
            } => format!("{}{} x {}", weight, units, repetitions),
            SetMeasure::Cardio { time, speed } => format!("{}s @ {}{}", time, speed, units),
        };
        let feeling = entry
            .row
            .feeling
            .map(|f| format!("  feeling {}", f))
            .unwrap_or_default();
        println!(
            "  {:>2}. {:<24} {:<10} {}{}",
            entry.order_number, entry.exercise, set, measure, feeling
        );
    }
    Ok(())
}

fn cmd_dates(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    for date in db.dates()? {
        println!("{}", date);
    }
    Ok(())
}

fn cmd_delete_date(db_path: &Path, date: NaiveDate, yes: bool) -> Result<()> {
    let prompt = format!("Delete every workout on {}?", date);
    if !confirm(&prompt, yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut db = Database::open(db_path)?;
    let deleted = db.delete_date(date)?;
    println!("✓ Deleted {} workouts on {}", deleted, date);
    Ok(())
}

fn cmd_delete_workout(db_path: &Path, date: NaiveDate, exercise: &str, yes: bool) -> Result<()> {
    let prompt = format!("Delete the {} workout on {}?", exercise, date);
    if !confirm(&prompt, yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut db = Database::open(db_path)?;
    db.delete_workout(date, exercise)?;
    println!("✓ Deleted {} on {}", exercise, date);
    Ok(())
}

fn cmd_progress(db_path: &Path, exercise: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    let progress = db.weight_progress(exercise)?;

    if progress.is_empty() {
        println!("No weights logged for {}", exercise);
        return Ok(());
    }
    for (date, weight) in progress {
        println!("{}  {}", date, weight);
    }
    Ok(())
}

fn cmd_export(db_path: &Path, out: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let count = export_history_csv(&db, out)?;
    println!("✓ Exported {} rows to {}", count, out.display());
    Ok(())
}

/// One-line summary of a workout, e.g. `3 sets, 35/37.5/37.5 kg x 10, feeling 3`
fn describe(performance: &Performance) -> String {
    let units = performance
        .units()
        .map(|u| format!(" {}", u))
        .unwrap_or_default();
    let measures = match performance.measures() {
        Measures::Strength {
            weight,
            repetitions,
        } => format!("{}{} x {}", slashed(weight), units, slashed(repetitions)),
        Measures::Cardio { time, speed } => {
            format!("{}s @ {}{}", slashed(time), slashed(speed), units)
        }
    };
    let feeling = performance
        .feeling()
        .map(|f| format!(", feeling {}", f))
        .unwrap_or_default();
    format!("{} sets, {}{}", performance.sets(), measures, feeling)
}

fn slashed<T: Copy + std::fmt::Display>(value: &SetValue<T>) -> String {
    value
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    print!("{} (y/N) ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let confirmed = input::is_yes(&answer);
    if !confirmed {
        tracing::debug!("Not confirmed: {:?}", answer.trim());
    }
    Ok(confirmed)
}
