use std::io::Write;

use polars::df;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;

use crate::pipelines::TripSummary;

/// One row per segment of the trip.
///
/// `speed_mph` is null for segments the pairing policy left without a speed,
/// which under literal pairing is always the last one.
pub fn segment_report(summary: &TripSummary) -> PolarsResult<DataFrame> {
    let segments = summary.segment_count();

    let index: Vec<u32> = (0..segments as u32).collect();
    let durations: Vec<Option<f64>> = (0..segments)
        .map(|i| summary.durations_h.get(i).copied())
        .collect();
    let speeds: Vec<Option<f64>> = (0..segments)
        .map(|i| summary.speeds_mph.get(i).copied())
        .collect();
    let fastest: Vec<bool> = (0..segments)
        .map(|i| i == summary.fastest_segment)
        .collect();

    df!(
        "segment" => index,
        "distance_mi" => summary.distances_mi.clone(),
        "duration_h" => durations,
        "speed_mph" => speeds,
        "fastest" => fastest,
    )
}

/// Writes `df` as zstd-compressed Parquet, returning the bytes written.
pub fn write_parquet<W: Write>(df: &mut DataFrame, writer: W) -> PolarsResult<u64> {
    ParquetWriter::new(writer)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(df)
}
