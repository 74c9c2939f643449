//! Array-backed series from CSV rows.
//!
//! Each row of the CSV is one series: its fields are the terms, in order.
//! Design goals, matching the rest of the input layer:
//!
//! - **Row-level validation**: a malformed row is reported and skipped, the
//!   remaining rows still load
//! - **Deterministic naming**: `file.csv#<row>`, rows numbered from 1

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::series::ArraySeriesFactory;
use crate::domain::SeriesDescriptor;
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: loaded descriptors plus whatever rows had to be skipped.
pub struct CsvIngest {
    pub descriptors: Vec<SeriesDescriptor>,
    pub row_errors: Vec<RowError>,
}

/// Load one array-backed series per CSV row.
pub fn load_series_csv(path: &Path) -> Result<CsvIngest, AppError> {
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open series CSV '{}': {e}", path.display()),
        )
    })?;
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_series_csv(file, &label)
}

/// Parse CSV series data from any reader; `label` names the source in
/// generated series names.
pub fn parse_series_csv(reader: impl Read, label: &str) -> Result<CsvIngest, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut descriptors = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, record) in csv_reader.records().enumerate() {
        let line = idx + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let mut terms = Vec::with_capacity(record.len());
        let mut bad_field = None;
        for field in record.iter() {
            if field.is_empty() {
                continue;
            }
            match field.parse::<f64>() {
                Ok(value) => terms.push(value),
                Err(_) => {
                    bad_field = Some(field.to_string());
                    break;
                }
            }
        }
        if let Some(field) = bad_field {
            row_errors.push(RowError {
                line,
                message: format!("not a number: '{field}'"),
            });
            continue;
        }
        if terms.is_empty() {
            continue;
        }

        match ArraySeriesFactory::new(terms) {
            Ok(factory) => descriptors.push(SeriesDescriptor::new(
                format!("{label}#{line}"),
                Vec::new(),
                Arc::new(factory),
            )),
            Err(e) => row_errors.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    Ok(CsvIngest {
        descriptors,
        row_errors,
    })
}
