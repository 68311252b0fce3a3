use roadtrip_parser::{Checkpoint, Coordinate, RowLayout};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::info;

use crate::error::{PipelineError, Result};

pub type DbPool = SqlitePool;

/// Opens a connection pool to the SQLite database holding the trip table.
pub async fn connect(database_url: &str) -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!(database_url, "database connection pool established");
    Ok(pool)
}

/// Loads every row of `table` as a checkpoint, in insertion order.
///
/// Columns are read by position through `layout`, so the table may carry
/// any number of extra columns (row index, stop name, notes).
pub async fn load_checkpoints(
    pool: &DbPool,
    table: &str,
    layout: &RowLayout,
) -> Result<Vec<Checkpoint>> {
    validate_table_name(table)?;

    let query = format!(r#"SELECT * FROM "{table}" ORDER BY rowid"#);
    let rows = sqlx::query(&query).fetch_all(pool).await?;
    if rows.is_empty() {
        return Err(PipelineError::Validation(format!(
            "table '{table}' contains no checkpoints"
        )));
    }

    let checkpoints = rows
        .iter()
        .map(|row| checkpoint_from_row(row, layout))
        .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;

    info!(table, rows = checkpoints.len(), "loaded checkpoints");
    Ok(checkpoints)
}

fn checkpoint_from_row(
    row: &SqliteRow,
    layout: &RowLayout,
) -> std::result::Result<Checkpoint, sqlx::Error> {
    let longitude: f64 = row.try_get(layout.longitude)?;
    let latitude: f64 = row.try_get(layout.latitude)?;
    let arrived: String = row.try_get(layout.arrived)?;
    let fuel_at_arrival: f64 = row.try_get(layout.fuel_at_arrival)?;
    let departed: String = row.try_get(layout.departed)?;
    let fuel_at_departure: f64 = row.try_get(layout.fuel_at_departure)?;

    Ok(Checkpoint::new(
        Coordinate::new(latitude, longitude),
        arrived,
        fuel_at_arrival,
        departed,
        fuel_at_departure,
    ))
}

fn validate_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PipelineError::Validation(format!(
            "invalid table name '{table}'"
        )))
    }
}
