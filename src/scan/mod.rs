//! Post-hoc scan of trial results for acceleration-quality anomalies.
//!
//! The scanner walks the computed sequence of every result and emits at most
//! one event per kind per result: the first matching point, carried whole so
//! the anomaly can be replayed from the event alone.

use crate::domain::{ComputedPoint, EventKind, TrialEvent, TrialResult};

/// Which comparison the slow-acceleration scan uses.
///
/// The historical behavior of this tool family flags the first point where
/// the accelerated estimate already deviates *less* than the raw partial sum
/// (a monitoring signal: acceleration engaged here). The inverse reading,
/// flagging where acceleration is *not* beating the raw sums, is kept
/// implemented so the scan stays a one-constant change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlowScanPolarity {
    /// Flag the first point where the accelerator beats the partial sum.
    AccelLeads,
    /// Flag the first point where the accelerator fails to beat it.
    AccelLags,
}

/// Polarity used by `scan_events`.
pub const SLOW_SCAN_POLARITY: SlowScanPolarity = SlowScanPolarity::AccelLeads;

/// Scan results with the default slow-scan polarity.
pub fn scan_events(results: &[TrialResult]) -> Vec<TrialEvent> {
    scan_events_with(results, SLOW_SCAN_POLARITY)
}

/// Scan results, flagging slow acceleration under the given polarity.
pub fn scan_events_with(results: &[TrialResult], polarity: SlowScanPolarity) -> Vec<TrialEvent> {
    let mut events = Vec::new();
    for result in results {
        if let Some(point) = slow_acceleration(result, polarity) {
            events.push(TrialEvent {
                result_id: result.id.clone(),
                kind: EventKind::SlowAcceleration,
                data: point.clone(),
            });
        }
        if let Some(point) = divergent_acceleration(result) {
            events.push(TrialEvent {
                result_id: result.id.clone(),
                kind: EventKind::DivergentAcceleration,
                data: point.clone(),
            });
        }
    }
    events
}

fn slow_acceleration(result: &TrialResult, polarity: SlowScanPolarity) -> Option<&ComputedPoint> {
    result.computed.iter().find(|point| match polarity {
        SlowScanPolarity::AccelLeads => {
            point.accel_value_deviation < point.partial_sum_deviation
        }
        SlowScanPolarity::AccelLags => {
            point.accel_value_deviation >= point.partial_sum_deviation
        }
    })
}

/// First index `i >= 1` where the accelerated deviation increased over the
/// previous probed `n`. Fewer than two points can never diverge.
fn divergent_acceleration(result: &TrialResult) -> Option<&ComputedPoint> {
    result
        .computed
        .windows(2)
        .find(|pair| pair[1].accel_value_deviation > pair[0].accel_value_deviation)
        .map(|pair| &pair[1])
}
