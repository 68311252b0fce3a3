use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::TimestampError;

pub const TIMESTAMP_LAYOUT: &str = "MM.DD.YYYY HH:MM";

const FORMAT: &str = "%m.%d.%Y %H:%M";

/// Parses a naive `MM.DD.YYYY HH:MM` timestamp.
///
/// The input must hold exactly one date token and one time token separated
/// by whitespace. Every component has to be made of ASCII digits and the
/// result has to exist on the calendar.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimestampError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [date, time] = tokens.as_slice() else {
        return Err(layout(input, "expected a date and a time separated by whitespace"));
    };

    let date_parts: Vec<&str> = date.split('.').collect();
    let [month, day, year] = date_parts.as_slice() else {
        return Err(layout(input, "date must be MM.DD.YYYY"));
    };

    let time_parts: Vec<&str> = time.split(':').collect();
    let [hour, minute] = time_parts.as_slice() else {
        return Err(layout(input, "time must be HH:MM"));
    };

    let month: u32 = numeric(input, "month", month)?;
    let day: u32 = numeric(input, "day", day)?;
    let year: i32 = numeric(input, "year", year)?;
    let hour: u32 = numeric(input, "hour", hour)?;
    let minute: u32 = numeric(input, "minute", minute)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| TimestampError::OutOfRange {
            input: input.to_string(),
        })
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(FORMAT).to_string()
}

fn layout(input: &str, reason: &'static str) -> TimestampError {
    TimestampError::Layout {
        input: input.to_string(),
        reason,
    }
}

fn numeric<T: FromStr>(input: &str, field: &'static str, token: &str) -> Result<T, TimestampError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::NonNumeric {
            input: input.to_string(),
            field,
            token: token.to_string(),
        });
    }
    // all digits, so the only failure left is overflow
    token.parse::<T>().map_err(|_| TimestampError::OutOfRange {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_month_first_layout() {
        let ts = parse_timestamp("10.17.2021 14:05").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2021, 10, 17));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 5, 0));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let ts = parse_timestamp("  01.02.2021\t7:30 ").unwrap();
        assert_eq!(format_timestamp(&ts), "01.02.2021 07:30");
    }

    #[test]
    fn rejects_month_thirteen() {
        let err = parse_timestamp("13.01.2021 10:00").unwrap_err();
        assert!(matches!(err, TimestampError::OutOfRange { .. }));
    }

    #[test]
    fn rejects_impossible_day_and_time() {
        assert!(parse_timestamp("02.30.2021 10:00").is_err());
        assert!(parse_timestamp("02.01.2021 24:00").is_err());
        assert!(parse_timestamp("02.01.2021 10:60").is_err());
    }

    #[test]
    fn rejects_wrong_token_counts() {
        for input in [
            "",
            "10.17.2021",
            "10.17.2021 10:00 extra",
            "10.17 10:00",
            "10.17.2021.1 10:00",
            "10.17.2021 10",
            "10.17.2021 10:00:00",
        ] {
            let err = parse_timestamp(input).unwrap_err();
            assert!(
                matches!(err, TimestampError::Layout { .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn layout_error_names_the_expected_layout() {
        let err = parse_timestamp("2021-10-17 10:00").unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "timestamp '2021-10-17 10:00' does not match {TIMESTAMP_LAYOUT}: date must be MM.DD.YYYY"
            )
        );
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let err = parse_timestamp("Oct.17.2021 10:00").unwrap_err();
        assert_eq!(
            err,
            TimestampError::NonNumeric {
                input: "Oct.17.2021 10:00".into(),
                field: "month",
                token: "Oct".into(),
            }
        );
        assert!(parse_timestamp("10.17.2021 -1:00").is_err());
        assert!(parse_timestamp("10..2021 10:00").is_err());
    }
}
