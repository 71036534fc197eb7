// src/monitor/export.rs
//! CSV export of the session history
//!
//! One row per sample: `category,timestamp,c1..c8`. EMG fills all eight
//! value columns, orientation fills x/y/z/w, gyroscope and acceleration
//! fill x/y/z; unused columns are left empty.

use crate::acquisition::ring_buffer::Sample;
use crate::acquisition::sample_store::Category;
use crate::hal::types::EMG_CHANNEL_COUNT;
use crate::monitor::history::SessionHistory;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const VALUE_COLUMNS: usize = EMG_CHANNEL_COUNT;

/// Export failures; the history is never modified by an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("access denied writing {path}: check the file is not open elsewhere ({source})")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write CSV to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            ErrorKind::PermissionDenied => ExportError::PermissionDenied { path, source },
            _ => ExportError::Io { path, source },
        }
    }
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

pub fn header() -> Vec<String> {
    let mut columns = vec!["category".to_string(), "timestamp".to_string()];
    columns.extend((1..=VALUE_COLUMNS).map(|i| format!("c{}", i)));
    columns
}

fn write_rows<W: Write, P>(
    writer: &mut csv::Writer<W>,
    category: Category,
    samples: &[Sample<P>],
    values: impl Fn(&P) -> Vec<String>,
) -> Result<usize, csv::Error> {
    for sample in samples {
        let mut record = Vec::with_capacity(VALUE_COLUMNS + 2);
        record.push(category.name().to_string());
        record.push(sample.timestamp.to_string());
        record.extend(values(&sample.payload));
        record.resize(VALUE_COLUMNS + 2, String::new());
        writer.write_record(&record)?;
    }
    Ok(samples.len())
}

fn floats<const N: usize>(values: [f32; N]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Write the whole history as CSV; returns the number of data rows
pub fn write_csv<W: Write>(history: &SessionHistory, out: W) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header())?;

    let mut rows = 0;
    rows += write_rows(&mut writer, Category::Emg, history.emg(), |frame| {
        frame.iter().map(|v| v.to_string()).collect()
    })?;
    rows += write_rows(&mut writer, Category::Orientation, history.orientation(), |q| {
        floats(q.to_array())
    })?;
    rows += write_rows(&mut writer, Category::Gyroscope, history.gyroscope(), |v| {
        floats(v.to_array())
    })?;
    rows += write_rows(&mut writer, Category::Acceleration, history.acceleration(), |v| {
        floats(v.to_array())
    })?;

    writer.flush()?;
    Ok(rows)
}

/// Write the history to `path`, creating missing parent directories
///
/// No partial-file cleanup is attempted on failure.
pub fn export_history(history: &SessionHistory, path: &Path) -> Result<ExportSummary, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::io(path, e))?;
    }
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;

    let rows = write_csv(history, file).map_err(|source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    });

    match rows {
        Ok(rows) => {
            info!(path = %path.display(), rows, "session exported");
            Ok(ExportSummary { path: path.to_path_buf(), rows })
        }
        Err(e) => {
            warn!("Export failed: {}", e);
            Err(e)
        }
    }
}
