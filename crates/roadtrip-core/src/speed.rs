use serde::{Deserialize, Serialize};

use crate::error::TripError;

/// How distances and drive times are paired into speeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPairing {
    /// One speed fewer than the shorter input, i.e. the final segment never
    /// gets a speed. Matches the historical trip reports.
    #[default]
    Literal,
    /// One speed per segment present in both inputs.
    Corrected,
}

impl SpeedPairing {
    pub fn segment_count(&self, distances: usize, durations: usize) -> usize {
        let shared = distances.min(durations);
        match self {
            SpeedPairing::Literal => shared.saturating_sub(1),
            SpeedPairing::Corrected => shared,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPairing::Literal => "literal",
            SpeedPairing::Corrected => "corrected",
        }
    }
}

/// Average speed (mph) of each paired segment.
pub fn compute_speeds(
    distances: &[f64],
    durations: &[f64],
    pairing: SpeedPairing,
) -> Result<Vec<f64>, TripError> {
    let count = pairing.segment_count(distances.len(), durations.len());
    distances
        .iter()
        .zip(durations)
        .take(count)
        .enumerate()
        .map(|(segment, (&miles, &hours))| {
            if hours == 0.0 {
                Err(TripError::Division {
                    what: "drive time",
                    segment,
                })
            } else {
                Ok(miles / hours)
            }
        })
        .collect()
}
