//! Checkpoint table parsing: named checkpoint records, the `MM.DD.YYYY HH:MM`
//! timestamp format and the CSV loader for exported trip tables.

pub mod errors;
pub mod model;
mod table;
pub mod timestamp;

pub use errors::{ParserError, TimestampError};
pub use model::{Checkpoint, Coordinate, RowLayout};
pub use table::{parse_checkpoint_table, read_checkpoint_table, TableOptions};
pub use timestamp::{format_timestamp, parse_timestamp, TIMESTAMP_LAYOUT};
