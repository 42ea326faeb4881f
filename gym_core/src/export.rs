//! CSV export of the full workout history.

use crate::{Database, HistoryFilter, HistoryRow, LocalOrder, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    order_number: u32,
    exercise: String,
    set: Option<u32>,
    sets: u32,
    weight: Option<f64>,
    repetitions: Option<u32>,
    time: Option<u32>,
    speed: Option<f64>,
    units: Option<&'static str>,
    feeling: Option<u8>,
}

impl From<&HistoryRow> for CsvRow {
    fn from(entry: &HistoryRow) -> Self {
        let row = &entry.row;
        CsvRow {
            date: entry.date.to_string(),
            order_number: entry.order_number,
            exercise: entry.exercise.clone(),
            // 1-based, empty for an all-sets row
            set: match row.local_order {
                LocalOrder::AllSets => None,
                LocalOrder::Set(i) => Some(i + 1),
            },
            sets: row.sets,
            weight: row.weight(),
            repetitions: row.repetitions(),
            time: row.time(),
            speed: row.speed(),
            units: row.units.map(|u| u.as_str()),
            feeling: row.feeling,
        }
    }
}

/// Write every stored set to `path` as CSV with a header row.
///
/// The file is replaced if it exists. Returns the number of data rows.
pub fn export_history_csv(db: &Database, path: &Path) -> Result<usize> {
    let history = db.history(HistoryFilter::default())?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for entry in &history {
        writer.serialize(CsvRow::from(entry))?;
    }

    // serialize() only emits headers with the first record
    if history.is_empty() {
        writer.write_record([
            "date",
            "order_number",
            "exercise",
            "set",
            "sets",
            "weight",
            "repetitions",
            "time",
            "speed",
            "units",
            "feeling",
        ])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", history.len(), path);
    Ok(history.len())
}
