use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// One recorded stop of the trip.
///
/// Timestamps are kept as the raw `MM.DD.YYYY HH:MM` strings; they are only
/// parsed when drive times are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub coordinate: Coordinate,
    pub arrived: String,
    pub fuel_at_arrival: f64,
    pub departed: String,
    pub fuel_at_departure: f64,
}

impl Checkpoint {
    pub fn new(
        coordinate: Coordinate,
        arrived: impl Into<String>,
        fuel_at_arrival: f64,
        departed: impl Into<String>,
        fuel_at_departure: f64,
    ) -> Self {
        Self {
            coordinate,
            arrived: arrived.into(),
            fuel_at_arrival,
            departed: departed.into(),
            fuel_at_departure,
        }
    }
}

/// Column positions of the checkpoint fields in a raw table row.
///
/// The defaults match the `road_trip` table produced by the spreadsheet
/// import, where column 0 is the row index and column 1 the stop name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RowLayout {
    pub longitude: usize,
    pub latitude: usize,
    pub arrived: usize,
    pub fuel_at_arrival: usize,
    pub departed: usize,
    pub fuel_at_departure: usize,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            longitude: 2,
            latitude: 3,
            arrived: 4,
            fuel_at_arrival: 5,
            departed: 6,
            fuel_at_departure: 7,
        }
    }
}

impl RowLayout {
    /// Minimum number of columns a row needs to satisfy this layout.
    pub fn width(&self) -> usize {
        [
            self.longitude,
            self.latitude,
            self.arrived,
            self.fuel_at_arrival,
            self.departed,
            self.fuel_at_departure,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}
