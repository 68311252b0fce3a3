//! Trip statistics pipeline: extract -> distances / drive times -> speeds ->
//! fastest segment -> miles per gallon.

pub mod config;
#[cfg(feature = "runtime")]
pub mod db;
pub mod distance;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fuel_economy;
pub mod pipelines;
pub mod report;
pub mod selector;
pub mod speed;

pub use config::{InputConfig, PipelineConfig};
pub use error::{PipelineError, Result, TripError};
pub use extractors::{FuelPair, TimePair};
pub use pipelines::{Stage, TripPipeline, TripSummary};
pub use roadtrip_parser::{Checkpoint, Coordinate, RowLayout};
pub use speed::SpeedPairing;
