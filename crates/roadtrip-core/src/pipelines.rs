use std::fmt;

use once_cell::sync::Lazy;
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "runtime")]
use std::sync::Arc;

use crate::{
    config::PipelineConfig,
    distance::compute_distances,
    duration::{compute_durations, ensure_chronological},
    error::{PipelineError, Result, TripError},
    extractors::{extract_coordinates, extract_fuel_pairs, extract_time_pairs, FuelPair},
    fuel_economy::fuel_economy,
    report,
    selector::argmax_speed,
    speed::{compute_speeds, SpeedPairing},
};
use roadtrip_parser::Checkpoint;

/// One step of the trip pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GetCoordinates,
    GetTimeData,
    GetGallonsOfGasData,
    ComputeDistances,
    ComputeDriveTimes,
    ComputeSpeeds,
    GetHighestSpeedSegment,
    ComputeMilesPerGallon,
}

impl Stage {
    pub fn code_identifier(&self) -> &'static str {
        match self {
            Stage::GetCoordinates => "get_coordinates",
            Stage::GetTimeData => "get_time_data",
            Stage::GetGallonsOfGasData => "get_gallons_of_gas_data",
            Stage::ComputeDistances => "compute_distances",
            Stage::ComputeDriveTimes => "compute_drive_times",
            Stage::ComputeSpeeds => "compute_speeds",
            Stage::GetHighestSpeedSegment => "get_highest_speed_segment",
            Stage::ComputeMilesPerGallon => "compute_miles_per_gallon",
        }
    }

    pub fn from_code(code: &str) -> Option<Stage> {
        all_stage_descriptors()
            .iter()
            .map(|descriptor| descriptor.stage)
            .find(|stage| stage.code_identifier() == code)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code_identifier())
    }
}

#[derive(Debug, Clone)]
pub struct StageDescriptor {
    pub stage: Stage,
    pub depends_on: &'static [Stage],
    pub description: &'static str,
}

static STAGES: Lazy<Vec<StageDescriptor>> = Lazy::new(|| {
    vec![
        StageDescriptor {
            stage: Stage::GetCoordinates,
            depends_on: &[],
            description: "Project checkpoints onto their coordinates",
        },
        StageDescriptor {
            stage: Stage::GetTimeData,
            depends_on: &[],
            description: "Project checkpoints onto arrival/departure timestamps",
        },
        StageDescriptor {
            stage: Stage::GetGallonsOfGasData,
            depends_on: &[],
            description: "Project checkpoints onto arrival/departure fuel levels",
        },
        StageDescriptor {
            stage: Stage::ComputeDistances,
            depends_on: &[Stage::GetCoordinates],
            description: "Great-circle distance of each segment in miles",
        },
        StageDescriptor {
            stage: Stage::ComputeDriveTimes,
            depends_on: &[Stage::GetTimeData],
            description: "Hours from departure to the next arrival",
        },
        StageDescriptor {
            stage: Stage::ComputeSpeeds,
            depends_on: &[Stage::ComputeDistances, Stage::ComputeDriveTimes],
            description: "Average speed of each segment in mph",
        },
        StageDescriptor {
            stage: Stage::GetHighestSpeedSegment,
            depends_on: &[Stage::ComputeSpeeds],
            description: "Index of the fastest segment",
        },
        StageDescriptor {
            stage: Stage::ComputeMilesPerGallon,
            depends_on: &[
                Stage::GetHighestSpeedSegment,
                Stage::ComputeDistances,
                Stage::GetGallonsOfGasData,
            ],
            description: "Fuel economy of the fastest segment",
        },
    ]
});

/// The stage DAG in execution order.
pub fn all_stage_descriptors() -> &'static [StageDescriptor] {
    STAGES.as_slice()
}

pub fn stage_descriptor(stage: Stage) -> Option<&'static StageDescriptor> {
    STAGES.iter().find(|descriptor| descriptor.stage == stage)
}

/// Every stage that directly or transitively depends on `stage`, in
/// execution order. These are the stages skipped when `stage` fails.
pub fn downstream_stages(stage: Stage) -> Vec<Stage> {
    let mut affected = vec![stage];
    for descriptor in STAGES.iter() {
        if descriptor
            .depends_on
            .iter()
            .any(|upstream| affected.contains(upstream))
        {
            affected.push(descriptor.stage);
        }
    }
    affected.remove(0);
    affected
}

/// Everything the pipeline derived from one checkpoint sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub checkpoint_count: usize,
    pub speed_pairing: SpeedPairing,
    pub distances_mi: Vec<f64>,
    pub durations_h: Vec<f64>,
    pub speeds_mph: Vec<f64>,
    pub fastest_segment: usize,
    pub fuel_consumed_gal: f64,
    pub miles_per_gallon: f64,
}

impl TripSummary {
    pub fn segment_count(&self) -> usize {
        self.distances_mi.len()
    }

    pub fn segment_report(&self) -> PolarsResult<DataFrame> {
        report::segment_report(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TripPipeline {
    config: PipelineConfig,
}

impl TripPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every stage in order on the calling thread.
    pub fn run(&self, checkpoints: &[Checkpoint]) -> Result<TripSummary> {
        info!(
            checkpoints = checkpoints.len(),
            pairing = self.config.speed_pairing.as_str(),
            "running trip pipeline"
        );
        let distances = distance_branch(checkpoints)?;
        let durations = duration_branch(checkpoints, self.config.require_chronological)?;
        let fuel_pairs = fuel_branch(checkpoints)?;
        self.finish(checkpoints.len(), distances, durations, &fuel_pairs)
    }

    /// Runs the distance, drive-time and fuel branches on the blocking pool
    /// and joins them before the speed stage.
    ///
    /// When several branches fail, the error of the earliest branch in
    /// registry order is returned.
    #[cfg(feature = "runtime")]
    pub async fn run_concurrent(&self, checkpoints: Arc<[Checkpoint]>) -> Result<TripSummary> {
        info!(
            checkpoints = checkpoints.len(),
            pairing = self.config.speed_pairing.as_str(),
            "running trip pipeline concurrently"
        );
        let require_chronological = self.config.require_chronological;
        let (distances, durations, fuel_pairs) = tokio::join!(
            spawn_branch(Arc::clone(&checkpoints), distance_branch),
            spawn_branch(Arc::clone(&checkpoints), move |checkpoints| {
                duration_branch(checkpoints, require_chronological)
            }),
            spawn_branch(Arc::clone(&checkpoints), fuel_branch),
        );
        self.finish(checkpoints.len(), distances?, durations?, &fuel_pairs?)
    }

    fn finish(
        &self,
        checkpoint_count: usize,
        distances: Vec<f64>,
        durations: Vec<f64>,
        fuel_pairs: &[FuelPair],
    ) -> Result<TripSummary> {
        let pairing = self.config.speed_pairing;
        let speeds = run_stage(Stage::ComputeSpeeds, || {
            compute_speeds(&distances, &durations, pairing)
        })?;
        let fastest = run_stage(Stage::GetHighestSpeedSegment, || argmax_speed(&speeds))?;
        let economy = run_stage(Stage::ComputeMilesPerGallon, || {
            fuel_economy(fastest, &distances, fuel_pairs)
        })?;

        info!(
            fastest_segment = fastest,
            speed_mph = speeds[fastest],
            miles_per_gallon = economy.miles_per_gallon,
            "trip fuel economy computed"
        );

        Ok(TripSummary {
            checkpoint_count,
            speed_pairing: pairing,
            distances_mi: distances,
            durations_h: durations,
            speeds_mph: speeds,
            fastest_segment: fastest,
            fuel_consumed_gal: economy.fuel_consumed_gal,
            miles_per_gallon: economy.miles_per_gallon,
        })
    }
}

fn run_stage<T, F>(stage: Stage, compute: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, TripError>,
{
    let output = compute().map_err(PipelineError::at(stage))?;
    debug!(stage = stage.code_identifier(), "stage finished");
    Ok(output)
}

fn distance_branch(checkpoints: &[Checkpoint]) -> Result<Vec<f64>> {
    let coordinates = run_stage(Stage::GetCoordinates, || {
        Ok(extract_coordinates(checkpoints))
    })?;
    let distances = run_stage(Stage::ComputeDistances, || compute_distances(&coordinates))?;
    debug!(segments = distances.len(), "distances computed");
    Ok(distances)
}

fn duration_branch(checkpoints: &[Checkpoint], require_chronological: bool) -> Result<Vec<f64>> {
    let time_pairs = run_stage(Stage::GetTimeData, || Ok(extract_time_pairs(checkpoints)))?;
    let durations = run_stage(Stage::ComputeDriveTimes, || {
        let durations = compute_durations(&time_pairs)?;
        if require_chronological {
            ensure_chronological(&durations)?;
        }
        Ok(durations)
    })?;
    debug!(segments = durations.len(), "drive times computed");
    Ok(durations)
}

fn fuel_branch(checkpoints: &[Checkpoint]) -> Result<Vec<FuelPair>> {
    run_stage(Stage::GetGallonsOfGasData, || {
        Ok(extract_fuel_pairs(checkpoints))
    })
}

#[cfg(feature = "runtime")]
async fn spawn_branch<T, F>(checkpoints: Arc<[Checkpoint]>, branch: F) -> Result<T>
where
    F: FnOnce(&[Checkpoint]) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || branch(&checkpoints)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_topologically_ordered() {
        let stages: Vec<Stage> = all_stage_descriptors().iter().map(|d| d.stage).collect();
        for (position, descriptor) in all_stage_descriptors().iter().enumerate() {
            for upstream in descriptor.depends_on {
                let upstream_position = stages.iter().position(|s| s == upstream).unwrap();
                assert!(upstream_position < position, "{upstream} after {}", descriptor.stage);
            }
        }
    }

    #[test]
    fn stage_codes_round_trip_through_lookup() {
        for descriptor in all_stage_descriptors() {
            let code = descriptor.stage.code_identifier();
            assert_eq!(Stage::from_code(code), Some(descriptor.stage));
        }
        assert_eq!(Stage::from_code("unknown"), None);
    }

    #[test]
    fn serde_name_matches_code() {
        let json = serde_json::to_string(&Stage::GetGallonsOfGasData).unwrap();
        assert_eq!(json, "\"get_gallons_of_gas_data\"");
    }
}
