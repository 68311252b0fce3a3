use roadtrip_parser::{Checkpoint, Coordinate};
use serde::{Deserialize, Serialize};

/// Raw arrival/departure timestamps of one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePair {
    pub arrived: String,
    pub departed: String,
}

impl TimePair {
    pub fn new(arrived: impl Into<String>, departed: impl Into<String>) -> Self {
        Self {
            arrived: arrived.into(),
            departed: departed.into(),
        }
    }
}

/// Fuel levels (gallons) of one checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPair {
    pub at_arrival: f64,
    pub at_departure: f64,
}

impl FuelPair {
    pub fn new(at_arrival: f64, at_departure: f64) -> Self {
        Self {
            at_arrival,
            at_departure,
        }
    }
}

pub fn extract_coordinates(checkpoints: &[Checkpoint]) -> Vec<Coordinate> {
    checkpoints.iter().map(|c| c.coordinate).collect()
}

pub fn extract_time_pairs(checkpoints: &[Checkpoint]) -> Vec<TimePair> {
    checkpoints
        .iter()
        .map(|c| TimePair::new(c.arrived.as_str(), c.departed.as_str()))
        .collect()
}

pub fn extract_fuel_pairs(checkpoints: &[Checkpoint]) -> Vec<FuelPair> {
    checkpoints
        .iter()
        .map(|c| FuelPair::new(c.fuel_at_arrival, c.fuel_at_departure))
        .collect()
}
