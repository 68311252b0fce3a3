use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

use crate::errors::ParserError;
use crate::model::{Checkpoint, Coordinate, RowLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    pub has_headers: bool,
    pub delimiter: char,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: ',',
        }
    }
}

impl TableOptions {
    fn delimiter_byte(&self) -> Result<u8, ParserError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ParserError::Options(format!(
                    "delimiter must be a single ASCII character, got '{}'",
                    self.delimiter
                ))
            })
    }
}

/// Reads a checkpoint table from disk. See [`parse_checkpoint_table`].
pub fn read_checkpoint_table(
    path: impl AsRef<Path>,
    layout: &RowLayout,
    options: &TableOptions,
) -> Result<Vec<Checkpoint>, ParserError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_checkpoint_table(&text, layout, options)
}

/// Converts the rows of a delimited checkpoint table into named records,
/// preserving row order.
///
/// Columns are located by position through `layout`; any other columns are
/// ignored. Coordinates and fuel levels must be numeric, timestamps are kept
/// verbatim.
pub fn parse_checkpoint_table(
    text: &str,
    layout: &RowLayout,
    options: &TableOptions,
) -> Result<Vec<Checkpoint>, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter_byte()?)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut checkpoints = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line_index = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);
        if record.iter().all(str::is_empty) {
            continue;
        }
        checkpoints.push(checkpoint_from_record(&record, layout, line_index)?);
    }

    if checkpoints.is_empty() {
        return Err(ParserError::EmptyData);
    }
    Ok(checkpoints)
}

fn checkpoint_from_record(
    record: &StringRecord,
    layout: &RowLayout,
    line_index: usize,
) -> Result<Checkpoint, ParserError> {
    let row = RowFields { record, line_index };
    Ok(Checkpoint {
        coordinate: Coordinate {
            latitude: row.number(layout.latitude, "latitude")?,
            longitude: row.number(layout.longitude, "longitude")?,
        },
        arrived: row.text(layout.arrived, "arrival timestamp")?.to_string(),
        fuel_at_arrival: row.number(layout.fuel_at_arrival, "fuel at arrival")?,
        departed: row.text(layout.departed, "departure timestamp")?.to_string(),
        fuel_at_departure: row.number(layout.fuel_at_departure, "fuel at departure")?,
    })
}

struct RowFields<'r> {
    record: &'r StringRecord,
    line_index: usize,
}

impl<'r> RowFields<'r> {
    fn text(&self, column: usize, field: &'static str) -> Result<&'r str, ParserError> {
        match self.record.get(column) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ParserError::MissingField {
                line_index: self.line_index,
                column,
                field,
            }),
        }
    }

    fn number(&self, column: usize, field: &'static str) -> Result<f64, ParserError> {
        let value = self.text(column, field)?;
        value.parse::<f64>().map_err(|err| ParserError::DataRow {
            line_index: self.line_index,
            message: format!("{field} '{value}' is not a number: {err}"),
        })
    }
}
