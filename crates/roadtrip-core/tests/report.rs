use anyhow::Result;
use polars::prelude::*;
use roadtrip_core::{report::write_parquet, SpeedPairing, TripSummary};

fn summary(pairing: SpeedPairing, speeds: Vec<f64>, fastest: usize) -> TripSummary {
    TripSummary {
        checkpoint_count: 4,
        speed_pairing: pairing,
        distances_mi: vec![100.0, 60.0, 45.0],
        durations_h: vec![2.0, 1.0, 0.5],
        speeds_mph: speeds,
        fastest_segment: fastest,
        fuel_consumed_gal: 2.0,
        miles_per_gallon: 30.0,
    }
}

#[test]
fn literal_report_leaves_last_speed_null() -> Result<()> {
    let df = summary(SpeedPairing::Literal, vec![50.0, 60.0], 1).segment_report()?;

    assert_eq!(df.height(), 3);
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["segment", "distance_mi", "duration_h", "speed_mph", "fastest"]
    );
    assert_eq!(df.column("segment")?.dtype(), &DataType::UInt32);

    let speeds = df.column("speed_mph")?.f64()?;
    assert_eq!(speeds.get(0), Some(50.0));
    assert_eq!(speeds.get(2), None);
    assert_eq!(speeds.null_count(), 1);

    let fastest: Vec<Option<bool>> = df.column("fastest")?.bool()?.into_iter().collect();
    assert_eq!(fastest, vec![Some(false), Some(true), Some(false)]);
    Ok(())
}

#[test]
fn corrected_report_has_every_speed() -> Result<()> {
    let df = summary(SpeedPairing::Corrected, vec![50.0, 60.0, 90.0], 2).segment_report()?;
    assert_eq!(df.column("speed_mph")?.null_count(), 0);

    let durations = df.column("duration_h")?.f64()?;
    assert_eq!(durations.get(2), Some(0.5));
    Ok(())
}

#[test]
fn report_writes_parquet() -> Result<()> {
    let mut df = summary(SpeedPairing::Literal, vec![50.0, 60.0], 1).segment_report()?;
    let mut buffer = Vec::new();
    let written = write_parquet(&mut df, &mut buffer)?;

    assert!(written > 0);
    assert!(buffer.starts_with(b"PAR1"));
    assert!(buffer.ends_with(b"PAR1"));

    let read = ParquetReader::new(std::io::Cursor::new(buffer)).finish()?;
    assert!(read.equals_missing(&df));
    Ok(())
}
