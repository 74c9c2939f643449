//! Sweep-file loading and descriptor resolution.
//!
//! A sweep file is a JSON document listing which series to probe and which
//! acceleration methods to run them through:
//!
//! ```json
//! {
//!   "series": [{"name": "geometric", "x": [0.25, 0.5]}],
//!   "methods": [{"name": "levin", "n": [4, 8], "m": 2, "args": {"beta": [1, 2]}}]
//! }
//! ```
//!
//! Scalars promote to one-element lists. Names resolve through the catalog
//! here, at load time; an unknown name is a configuration error that aborts
//! the run before anything executes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::catalog;
use crate::domain::{AccelDescriptor, Axes, ParamValue, SeriesDescriptor};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct SweepFile {
    #[serde(default)]
    series: Vec<SeriesEntry>,
    #[serde(default)]
    methods: Vec<MethodEntry>,
}

#[derive(Debug, Deserialize)]
struct SeriesEntry {
    name: String,
    #[serde(default)]
    x: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
struct MethodEntry {
    name: String,
    n: OneOrMany,
    m: OneOrMany,
    /// Option-name → candidate values, crossed cartesian at execution time.
    /// A `BTreeMap` keeps the axis order deterministic (alphabetical).
    #[serde(default)]
    args: BTreeMap<String, OneOrMany>,
}

/// Accepts `"x": 0.5` and `"x": [0.5, 0.9]` alike.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(ParamValue),
    Many(Vec<ParamValue>),
}

impl OneOrMany {
    fn into_values(self) -> Vec<ParamValue> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Load a sweep file and resolve every named capability.
pub fn load_sweep_file(
    path: &Path,
) -> Result<(Vec<SeriesDescriptor>, Vec<AccelDescriptor>), AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(2, format!("Failed to read sweep file '{}': {e}", path.display()))
    })?;
    parse_sweep_json(&text)
}

/// Parse sweep JSON text into resolved descriptors.
pub fn parse_sweep_json(
    text: &str,
) -> Result<(Vec<SeriesDescriptor>, Vec<AccelDescriptor>), AppError> {
    let file: SweepFile = serde_json::from_str(text)
        .map_err(|e| AppError::new(2, format!("Invalid sweep JSON: {e}")))?;

    let mut series = Vec::with_capacity(file.series.len());
    for entry in file.series {
        let factory = catalog::series_factory(&entry.name).ok_or_else(|| {
            AppError::new(
                2,
                format!("Unknown series '{}'; run `trials list`.", entry.name),
            )
        })?;
        let arguments: Axes = match entry.x {
            Some(x) => vec![("x".to_string(), x.into_values())],
            None => Vec::new(),
        };
        series.push(SeriesDescriptor::new(entry.name, arguments, factory));
    }

    let mut accels = Vec::with_capacity(file.methods.len());
    for entry in file.methods {
        let factory = catalog::accel_factory(&entry.name).ok_or_else(|| {
            AppError::new(
                2,
                format!("Unknown acceleration method '{}'; run `trials list`.", entry.name),
            )
        })?;
        let n_values = to_u32_list(entry.n.into_values(), &entry.name, "n")?;
        let m_values = to_u32_list(entry.m.into_values(), &entry.name, "m")?;
        let additional_args: Axes = entry
            .args
            .into_iter()
            .map(|(name, values)| (name, values.into_values()))
            .collect();
        accels.push(AccelDescriptor::new(
            entry.name,
            n_values,
            m_values,
            additional_args,
            factory,
        ));
    }

    Ok((series, accels))
}

fn to_u32_list(values: Vec<ParamValue>, method: &str, field: &str) -> Result<Vec<u32>, AppError> {
    values
        .into_iter()
        .map(|value| {
            value.as_u32().ok_or_else(|| {
                AppError::new(
                    2,
                    format!(
                        "Method '{method}': '{field}' values must be non-negative integers, got {value}"
                    ),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_promote_to_one_element_lists() {
        let (series, accels) = parse_sweep_json(
            r#"{
                "series": [{"name": "geometric", "x": 0.5}],
                "methods": [{"name": "shanks", "n": 4, "m": 1}]
            }"#,
        )
        .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name(), "geometric");
        assert_eq!(series[0].arguments().len(), 1);
        assert_eq!(series[0].arguments()[0].1, vec![ParamValue::Float(0.5)]);

        assert_eq!(accels.len(), 1);
        assert_eq!(accels[0].n_values(), &[4]);
        assert_eq!(accels[0].m_values(), &[1]);
        assert!(accels[0].additional_args().is_empty());
    }

    #[test]
    fn method_args_become_cartesian_axes() {
        let (_, accels) = parse_sweep_json(
            r#"{
                "methods": [{"name": "levin", "n": [4, 8], "m": [1, 2],
                             "args": {"beta": [1.0, 2.0]}}]
            }"#,
        )
        .unwrap();

        let args = accels[0].additional_args();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].0, "beta");
        assert_eq!(args[0].1.len(), 2);
    }

    #[test]
    fn unknown_names_fail_at_load_time() {
        let err = parse_sweep_json(r#"{"series": [{"name": "zeta_prime"}]}"#).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("zeta_prime"));

        let err =
            parse_sweep_json(r#"{"methods": [{"name": "wat", "n": 1, "m": 1}]}"#).unwrap_err();
        assert!(err.to_string().contains("wat"));
    }

    #[test]
    fn non_integer_term_counts_are_rejected() {
        let err = parse_sweep_json(r#"{"methods": [{"name": "shanks", "n": 2.5, "m": 1}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn argument_free_series_have_no_axes() {
        let (series, _) = parse_sweep_json(r#"{"series": [{"name": "basel"}]}"#).unwrap();
        assert!(series[0].arguments().is_empty());
    }
}
