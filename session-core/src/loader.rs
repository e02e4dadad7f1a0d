use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::{ColumnMap, RawTable, SessionTable};

/// File name the analysis notebook exports.
pub const DEFAULT_DATASET_PATH: &str = "datos_dashboard.csv";

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(
        "dataset '{}' not found; run every cell of the analysis notebook so it exports the file, then restart the dashboard",
        .path.display()
    )]
    Missing { path: PathBuf },
    #[error("failed to read dataset '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset '{}' is not valid UTF-8 CSV: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl DatasetError {
    /// Steps shown to the user when the dashboard starts without data.
    pub fn remediation(&self) -> Vec<String> {
        let file = match self {
            DatasetError::Missing { path }
            | DatasetError::Io { path, .. }
            | DatasetError::Csv { path, .. } => path.display().to_string(),
        };
        vec![
            "Open the analysis notebook that prepares the session data.".to_string(),
            "Run all of its cells.".to_string(),
            format!("Check that '{file}' was generated next to the dashboard."),
            "Start the dashboard again.".to_string(),
        ]
    }
}

/// Loaded table plus the identifiers used to populate the selector.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub table: SessionTable,
    pub subjects: Vec<String>,
}

impl Dataset {
    pub fn from_table(table: SessionTable) -> Self {
        let subjects = table.subjects();
        Self { table, subjects }
    }
}

/// Parse CSV text into header + string cells. A leading byte-order mark is ignored.
pub fn parse_csv(text: &str) -> Result<RawTable, csv::Error> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(RawTable::new(headers, rows))
}

/// Read the session table once. Only existence and CSV well-formedness are checked;
/// absent columns degrade downstream.
pub fn load_dataset(path: &Path, columns: &ColumnMap) -> Result<Dataset, DatasetError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(DatasetError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let raw = parse_csv(&text).map_err(|source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(columns = raw.headers.len(), rows = raw.rows.len(), "parsed csv");

    let dataset = Dataset::from_table(SessionTable::from_raw(&raw, columns));
    info!(
        path = %path.display(),
        records = dataset.table.len(),
        subjects = dataset.subjects.len(),
        metrics = dataset.table.metrics().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogicalField;
    use std::io::Write;

    #[test]
    fn missing_file_names_the_generating_step() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("datos_dashboard.csv");
        let err = load_dataset(&path, &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Missing { .. }));
        let msg = err.to_string();
        assert!(msg.contains("datos_dashboard.csv"));
        assert!(msg.contains("notebook"));
        assert_eq!(err.remediation().len(), 4);
    }

    #[test]
    fn bom_is_tolerated_and_subjects_sorted() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("data.csv");
        let mut file = fs::File::create(&path).expect("create");
        write!(
            file,
            "\u{feff}player_name_clean,partido_num,evaluacion\nLeo,1,accurate\nAna,2,overestimated\nAna,1,accurate\n"
        )
        .expect("write");

        let dataset = load_dataset(&path, &ColumnMap::default()).expect("load");
        assert_eq!(dataset.subjects, vec!["Ana".to_string(), "Leo".to_string()]);
        assert_eq!(dataset.table.len(), 3);
        assert!(dataset.table.capabilities().has(LogicalField::Subject));
        assert!(dataset.table.capabilities().has(LogicalField::Outcome));
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let raw = parse_csv("player_name_clean,partido_num\n").expect("parse");
        let dataset = Dataset::from_table(SessionTable::from_raw(&raw, &ColumnMap::default()));
        assert!(dataset.table.is_empty());
        assert!(dataset.subjects.is_empty());
    }

    #[test]
    fn short_rows_read_as_missing_cells() {
        let raw = parse_csv("a,b,c\n1,2\n").expect("parse");
        assert_eq!(raw.cell(0, 1), Some("2"));
        assert_eq!(raw.cell(0, 2), None);
    }
}
