use roadtrip_parser::parse_timestamp;
use tracing::warn;

use crate::error::TripError;
use crate::extractors::TimePair;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Drive time in hours of every segment: departure from checkpoint `i` to
/// arrival at checkpoint `i + 1`.
///
/// Fewer than two checkpoints yield no segments. Timestamps out of
/// chronological order produce negative durations; they are logged, not
/// rejected (see [`ensure_chronological`]).
pub fn compute_durations(time_pairs: &[TimePair]) -> Result<Vec<f64>, TripError> {
    time_pairs
        .windows(2)
        .enumerate()
        .map(|(segment, pair)| {
            let hours = segment_hours(&pair[0], &pair[1])?;
            if hours < 0.0 {
                warn!(segment, hours, "segment duration is negative");
            }
            Ok(hours)
        })
        .collect()
}

fn segment_hours(from: &TimePair, to: &TimePair) -> Result<f64, TripError> {
    let departed = parse_timestamp(&from.departed)?;
    let arrived = parse_timestamp(&to.arrived)?;
    Ok((arrived - departed).num_seconds() as f64 / SECONDS_PER_HOUR)
}

/// Rejects the first segment whose duration is negative.
pub fn ensure_chronological(durations: &[f64]) -> Result<(), TripError> {
    match durations.iter().position(|hours| *hours < 0.0) {
        Some(segment) => Err(TripError::OutOfOrder {
            segment,
            hours: durations[segment],
        }),
        None => Ok(()),
    }
}
