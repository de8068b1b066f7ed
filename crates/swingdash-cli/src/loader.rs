//! CSV session loading and discovery

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use swingdash_analysis::dataset::{Dataset, Value};

const BOM: char = '\u{feff}';

/// A CSV file found by [`discover_sessions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub label: String,
    pub path: PathBuf,
}

/// Read a launch-monitor export into a dataset
///
/// Empty cells become missing. A column whose non-empty cells all parse as
/// numbers is read as numbers; every other column is kept as text.
pub fn read_session_csv<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open session CSV: {}", path.display()))?;
    let dataset = read_session(file)
        .with_context(|| format!("Failed to read session CSV: {}", path.display()))?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.column_names().count(),
        path.display()
    );
    Ok(dataset)
}

pub fn read_session<R>(reader: R) -> anyhow::Result<Dataset>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    let headers = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches(BOM) } else { h };
            h.to_owned()
        })
        .collect::<Vec<_>>();

    let mut columns = vec![Vec::new(); headers.len()];
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed record {}", row + 1))?;
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            column.push(cell.to_owned());
        }
    }

    let dataset = Dataset::from_columns(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| (name, typed_column(cells))),
    )?;
    Ok(dataset)
}

fn typed_column(cells: Vec<String>) -> Vec<Value> {
    let numbers = cells
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            if cell.is_empty() {
                Some(None)
            } else {
                cell.parse::<f64>().ok().map(Some)
            }
        })
        .collect::<Option<Vec<_>>>();
    match numbers {
        Some(numbers) => numbers.into_iter().map(Value::from).collect(),
        None => cells
            .into_iter()
            .map(|cell| {
                if cell.trim().is_empty() {
                    Value::Missing
                } else {
                    Value::Text(cell)
                }
            })
            .collect(),
    }
}

/// Find `*.csv` files in `dirs`
///
/// Files are listed per directory in name order. Labels are the file stems;
/// a stem seen before gets a ` (2)`, ` (3)`, ... suffix. Directories that do
/// not exist are skipped.
pub fn discover_sessions<P>(dirs: &[P]) -> anyhow::Result<Vec<SessionFile>>
where
    P: AsRef<Path>,
{
    let mut sessions: Vec<SessionFile> = Vec::new();
    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            log::debug!("skipping missing session directory {}", dir.display());
            continue;
        }
        let mut paths = fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"));
        paths.sort();

        for path in paths {
            let stem = path
                .file_stem()
                .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
            let mut label = stem.clone();
            let mut suffix = 1;
            while sessions.iter().any(|s| s.label == label) {
                suffix += 1;
                label = format!("{stem} ({suffix})");
            }
            sessions.push(SessionFile { label, path });
        }
    }
    Ok(sessions)
}
