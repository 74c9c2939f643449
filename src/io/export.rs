//! Export trial results and events to JSON and CSV.
//!
//! JSON keeps the nested record structure. CSV flattens it: the series,
//! accelerator, and error context columns repeat on every row that belongs
//! to the same result, one row per computed point, so the files drop
//! straight into spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::{ErrorRecord, TrialEvent, TrialResult};
use crate::error::AppError;

const RESULTS_HEADER: [&str; 13] = [
    "series_name",
    "series_limit",
    "series_argument_binding",
    "accel_name",
    "accel_m_value",
    "accel_additional_args",
    "error_description",
    "error_context",
    "computed_n",
    "computed_partial_sum",
    "computed_partial_sum_deviation",
    "computed_accel_value",
    "computed_accel_value_deviation",
];

const EVENTS_HEADER: [&str; 10] = [
    "event_name",
    "event_data",
    "series_name",
    "series_limit",
    "series_argument_binding",
    "accel_name",
    "accel_m_value",
    "accel_additional_args",
    "error_description",
    "error_context",
];

/// Serialize results as a JSON array.
pub fn results_to_json(results: &[TrialResult]) -> Result<String, AppError> {
    serde_json::to_string_pretty(results)
        .map_err(|e| AppError::new(2, format!("Failed to serialize results JSON: {e}")))
}

/// Serialize events as a JSON array.
pub fn events_to_json(events: &[TrialEvent]) -> Result<String, AppError> {
    serde_json::to_string_pretty(events)
        .map_err(|e| AppError::new(2, format!("Failed to serialize events JSON: {e}")))
}

/// Flatten results to CSV text, one row per computed point.
///
/// A result with no computed points (pure construction failure) contributes
/// no rows; it is still present in the JSON export.
pub fn results_to_csv(results: &[TrialResult]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(RESULTS_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write results CSV header: {e}")))?;

    for result in results {
        let context = result_context(result);
        for point in &result.computed {
            let mut row = context.clone();
            row.push(point.n.to_string());
            row.push(point.partial_sum.to_string());
            row.push(point.partial_sum_deviation.to_string());
            row.push(point.accel_value.to_string());
            row.push(point.accel_value_deviation.to_string());
            writer
                .write_record(&row)
                .map_err(|e| AppError::new(2, format!("Failed to write results CSV row: {e}")))?;
        }
    }

    finish_csv(writer)
}

/// Flatten events to CSV text, one row per event.
///
/// The series/accel/error context comes from the result each event points
/// at; an event referencing an id absent from `results` is a defect.
pub fn events_to_csv(events: &[TrialEvent], results: &[TrialResult]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EVENTS_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write events CSV header: {e}")))?;

    for event in events {
        let result = results
            .iter()
            .find(|r| r.id == event.result_id)
            .ok_or_else(|| {
                AppError::new(
                    2,
                    format!("Event references unknown result id '{}'", event.result_id),
                )
            })?;

        let data = serde_json::to_string(&event.data)
            .map_err(|e| AppError::new(2, format!("Failed to serialize event data: {e}")))?;

        let mut row = vec![event.kind.as_str().to_string(), data];
        row.extend(result_context(result));
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write events CSV row: {e}")))?;
    }

    finish_csv(writer)
}

/// Write the results JSON file.
pub fn write_results_json(path: &Path, results: &[TrialResult]) -> Result<(), AppError> {
    write_text(path, &results_to_json(results)?)
}

/// Write the results CSV file.
pub fn write_results_csv(path: &Path, results: &[TrialResult]) -> Result<(), AppError> {
    write_text(path, &results_to_csv(results)?)
}

/// Write the events JSON file.
pub fn write_events_json(path: &Path, events: &[TrialEvent]) -> Result<(), AppError> {
    write_text(path, &events_to_json(events)?)
}

/// Write the events CSV file.
pub fn write_events_csv(
    path: &Path,
    events: &[TrialEvent],
    results: &[TrialResult],
) -> Result<(), AppError> {
    write_text(path, &events_to_csv(events, results)?)
}

/// Series/accel/error context columns shared by every row of one result.
fn result_context(result: &TrialResult) -> Vec<String> {
    let empty = ErrorRecord::empty();
    let error = result.error.as_ref().unwrap_or(&empty);

    vec![
        result.series.name.clone(),
        result
            .series
            .limit
            .map(|limit| limit.to_string())
            .unwrap_or_default(),
        result.series.argument_binding.to_compact_string(),
        result.accel.name.clone(),
        result.accel.m_value.to_string(),
        result.accel.additional_args.clone(),
        error.description.clone(),
        error
            .context
            .map(|n| n.to_string())
            .unwrap_or_default(),
    ]
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String, AppError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::new(2, format!("CSV is not UTF-8: {e}")))
}

fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    std::fs::write(path, text)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::domain::{
        AccelDescriptor, AccelRecord, Assignment, ComputedPoint, ParamValue, SeriesDescriptor,
        SeriesRecord,
    };
    use crate::scan::scan_events;
    use crate::trial::{SweepOptions, run_trials};

    fn sample_result(id: &str, points: usize, error: Option<ErrorRecord>) -> TrialResult {
        let computed = (0..points)
            .map(|i| ComputedPoint {
                n: (i as u32 + 1) * 2,
                partial_sum: 0.9 + i as f64 * 0.01,
                partial_sum_deviation: 0.1 - i as f64 * 0.01,
                accel_value: 0.99,
                accel_value_deviation: 0.01 / (i as f64 + 1.0),
            })
            .collect();
        TrialResult {
            id: id.to_string(),
            series: SeriesRecord {
                name: "geometric".to_string(),
                limit: Some(1.0),
                argument_binding: Assignment::from_entries(vec![(
                    "x".to_string(),
                    ParamValue::Float(0.5),
                )]),
            },
            accel: AccelRecord {
                name: "shanks".to_string(),
                m_value: 1,
                additional_args: String::new(),
            },
            computed,
            error,
        }
    }

    fn catalog_descriptors() -> (Vec<SeriesDescriptor>, Vec<AccelDescriptor>) {
        let series = SeriesDescriptor::new(
            "geometric",
            vec![(
                "x".to_string(),
                vec![ParamValue::Float(0.25), ParamValue::Float(0.5)],
            )],
            catalog::series_factory("geometric").unwrap(),
        );
        let accel = AccelDescriptor::new(
            "shanks",
            vec![2, 3, 4],
            vec![1],
            Vec::new(),
            catalog::accel_factory("shanks").unwrap(),
        );
        (vec![series], vec![accel])
    }

    #[test]
    fn one_csv_row_per_computed_point_with_repeated_context() {
        let result = sample_result("r1", 3, None);
        let csv_text = results_to_csv(&[result]).unwrap();

        let lines: Vec<&str> = csv_text.trim_end().lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 points

        let context_of = |line: &str| {
            line.split(',').take(8).map(str::to_string).collect::<Vec<_>>()
        };
        assert_eq!(context_of(lines[1]), context_of(lines[2]));
        assert_eq!(context_of(lines[2]), context_of(lines[3]));
        assert!(lines[1].starts_with("geometric,1,x=0.5,shanks,1,,,"));
    }

    #[test]
    fn construction_failures_emit_no_csv_rows() {
        let error = ErrorRecord {
            description: "domain error: |x| must be < 1".to_string(),
            context: None,
        };
        let result = sample_result("r1", 0, Some(error));
        let csv_text = results_to_csv(&[result]).unwrap();
        assert_eq!(csv_text.trim_end().lines().count(), 1); // header only
    }

    #[test]
    fn error_context_columns_carry_the_failing_n() {
        let error = ErrorRecord {
            description: "computation error: division by zero".to_string(),
            context: Some(6),
        };
        let result = sample_result("r1", 2, Some(error));
        let csv_text = results_to_csv(&[result]).unwrap();
        let row = csv_text.trim_end().lines().nth(1).unwrap();
        assert!(row.contains("computation error: division by zero,6,"));
    }

    #[test]
    fn results_round_trip_through_json() {
        let results = vec![
            sample_result("r1", 2, None),
            sample_result(
                "r2",
                1,
                Some(ErrorRecord {
                    description: "computation error: overflow".to_string(),
                    context: Some(8),
                }),
            ),
        ];
        let json = results_to_json(&results).unwrap();
        let back: Vec<TrialResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn decimal_arguments_round_trip_as_strings() {
        let mut result = sample_result("r1", 1, None);
        result.series.argument_binding = Assignment::from_entries(vec![(
            "x".to_string(),
            ParamValue::Decimal("0.333333333333333333333333".to_string()),
        )]);
        let json = results_to_json(std::slice::from_ref(&result)).unwrap();
        assert!(json.contains("\"0.333333333333333333333333\""));

        let back: Vec<TrialResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], result);
    }

    #[test]
    fn identical_runs_export_byte_identical_json() {
        let (series, accels) = catalog_descriptors();
        let options = SweepOptions::default();

        let first = run_trials(&series, &accels, &options).unwrap();
        let second = run_trials(&series, &accels, &options).unwrap();

        let json_first = results_to_json(&first).unwrap();
        let json_second = results_to_json(&second).unwrap();
        assert_eq!(json_first, json_second);

        let events_first = events_to_json(&scan_events(&first)).unwrap();
        let events_second = events_to_json(&scan_events(&second)).unwrap();
        assert_eq!(events_first, events_second);
    }

    #[test]
    fn events_csv_joins_result_context_by_id() {
        let (series, accels) = catalog_descriptors();
        let results = run_trials(&series, &accels, &SweepOptions::default()).unwrap();
        let events = scan_events(&results);
        assert!(!events.is_empty());

        let csv_text = events_to_csv(&events, &results).unwrap();
        let lines: Vec<&str> = csv_text.trim_end().lines().collect();
        assert_eq!(lines.len(), events.len() + 1);
        assert!(lines[0].starts_with("event_name,event_data,series_name"));
        assert!(lines[1].contains("geometric"));

        // An event pointing at a missing result is a defect, not a blank row.
        let orphan = TrialEvent {
            result_id: "missing".to_string(),
            ..events[0].clone()
        };
        assert!(events_to_csv(&[orphan], &results).is_err());
    }
}
