//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the engine stays clean and testable
//! - output changes are localized

use crate::catalog;
use crate::domain::{EventKind, TrialEvent, TrialResult};

/// Format the sweep summary (configuration counts + failures + events).
pub fn format_run_summary(results: &[TrialResult], events: &[TrialEvent]) -> String {
    let mut out = String::new();

    let points: usize = results.iter().map(|r| r.computed.len()).sum();
    let failed: Vec<&TrialResult> = results.iter().filter(|r| r.error.is_some()).collect();

    out.push_str("=== trials - series acceleration sweep ===\n");
    out.push_str(&format!(
        "Configurations: {} | points: {points} | failed: {}\n",
        results.len(),
        failed.len()
    ));

    let slow = events
        .iter()
        .filter(|e| e.kind == EventKind::SlowAcceleration)
        .count();
    let divergent = events
        .iter()
        .filter(|e| e.kind == EventKind::DivergentAcceleration)
        .count();
    out.push_str(&format!(
        "Events: slow_acceleration={slow} divergent_acceleration={divergent}\n"
    ));

    if !failed.is_empty() {
        out.push_str("\nFailed configurations:\n");
        for result in failed {
            if let Some(error) = &result.error {
                let at = match error.context {
                    Some(n) => format!(" at n={n}"),
                    None => String::new(),
                };
                out.push_str(&format!("- {}{at}: {}\n", result.id, error.description));
            }
        }
    }

    out
}

/// Format the built-in capability listing for `trials list`.
pub fn format_catalog_listing() -> String {
    let mut out = String::new();

    out.push_str("Series:\n");
    for (name, summary) in catalog::list_series() {
        out.push_str(&format!("  {name:<14} {summary}\n"));
    }

    out.push_str("\nAcceleration methods:\n");
    for (name, summary) in catalog::list_accels() {
        out.push_str(&format!("  {name:<14} {summary}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccelRecord, Assignment, ErrorRecord, SeriesRecord};

    #[test]
    fn summary_counts_failures_and_events() {
        let ok = TrialResult {
            id: "a:b#0000".to_string(),
            series: SeriesRecord {
                name: "a".to_string(),
                limit: Some(1.0),
                argument_binding: Assignment::empty(),
            },
            accel: AccelRecord {
                name: "b".to_string(),
                m_value: 1,
                additional_args: String::new(),
            },
            computed: Vec::new(),
            error: None,
        };
        let mut bad = ok.clone();
        bad.id = "a:b#0001".to_string();
        bad.error = Some(ErrorRecord {
            description: "computation error: division by zero".to_string(),
            context: Some(5),
        });

        let summary = format_run_summary(&[ok, bad], &[]);
        assert!(summary.contains("Configurations: 2"));
        assert!(summary.contains("failed: 1"));
        assert!(summary.contains("a:b#0001 at n=5: computation error: division by zero"));
    }

    #[test]
    fn catalog_listing_names_every_capability() {
        let listing = format_catalog_listing();
        for (name, _) in catalog::list_series() {
            assert!(listing.contains(name));
        }
        for (name, _) in catalog::list_accels() {
            assert!(listing.contains(name));
        }
    }
}
