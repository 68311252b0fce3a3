use std::path::PathBuf;

use roadtrip_parser::{ParserError, TimestampError};
use thiserror::Error;

use crate::pipelines::Stage;

/// Failures of the individual trip computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error(transparent)]
    Parse(#[from] TimestampError),

    #[error("need at least {required} {what}, found {found}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        found: usize,
    },

    #[error("{what} is zero for segment {segment}")]
    Division { what: &'static str, segment: usize },

    #[error("cannot select from an empty {0} sequence")]
    EmptySequence(&'static str),

    #[error("index {index} is out of range for {what} of length {len}")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("segment {segment} arrives before it departs ({hours} h)")]
    OutOfOrder { segment: usize, hours: f64 },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: TripError,
    },

    #[error("checkpoint table could not be loaded: {0}")]
    Load(#[from] ParserError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[cfg(feature = "runtime")]
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[cfg(feature = "runtime")]
    #[error("stage task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl PipelineError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(TripError) -> Self {
        move |source| PipelineError::Stage { stage, source }
    }

    /// The stage that failed, if the error came from a computation stage.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn trip_error(&self) -> Option<&TripError> {
        match self {
            PipelineError::Stage { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
