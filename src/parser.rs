//! # Sensor Report Parsing
//!
//! Turns the text report produced by the deployed sensors into
//! [`SensorRecord`]s. One record per line:
//!
//! ```text
//! Sensor at x=2, y=18: closest beacon is at x=-2, y=15
//! ```
//!
//! Blank lines are skipped and surrounding whitespace is ignored. Any other
//! deviation is reported with its 1-based line number.

use crate::model::SensorRecord;
use crate::Position;
use std::num::ParseIntError;
use thiserror::Error;

const SENSOR_PREFIX: &str = "Sensor at ";
const BEACON_SEPARATOR: &str = ": closest beacon is at ";

/// Errors that can occur while parsing a sensor report.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not start with `Sensor at `
    #[error("line {line}: expected a line starting with \"Sensor at \", found {text:?}")]
    MissingSensorPrefix { line: usize, text: String },

    /// Line has no `: closest beacon is at ` part
    #[error("line {line}: missing closest beacon in {text:?}")]
    MissingBeacon { line: usize, text: String },

    /// Coordinate pair is not of the form `x=<int>, y=<int>`
    #[error("line {line}: malformed position {text:?}")]
    MalformedPosition { line: usize, text: String },

    /// Coordinate value is not an integer
    #[error("line {line}: invalid coordinate {text:?}: {source}")]
    InvalidCoordinate {
        line: usize,
        text: String,
        source: ParseIntError,
    },
}

/// Parse a full report.
///
/// # Example
/// ```
/// use beacon_zone_lib::parser::parse_report;
/// use beacon_zone_lib::SensorRecord;
///
/// let records = parse_report("Sensor at x=8, y=7: closest beacon is at x=2, y=10\n").unwrap();
/// assert_eq!(records, vec![SensorRecord::new(8, 7, 2, 10)]);
/// ```
pub fn parse_report(text: &str) -> Result<Vec<SensorRecord>, ParseError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(number, line)| parse_line(number, line))
        .collect()
}

/// Parse one non-empty report line.
pub fn parse_line(number: usize, line: &str) -> Result<SensorRecord, ParseError> {
    let rest = line
        .strip_prefix(SENSOR_PREFIX)
        .ok_or_else(|| ParseError::MissingSensorPrefix {
            line: number,
            text: line.to_string(),
        })?;

    let (sensor, beacon) = rest
        .split_once(BEACON_SEPARATOR)
        .ok_or_else(|| ParseError::MissingBeacon {
            line: number,
            text: line.to_string(),
        })?;

    Ok(SensorRecord {
        sensor: parse_position(number, sensor)?,
        beacon: parse_position(number, beacon)?,
    })
}

/// Parse `x=<int>, y=<int>`.
fn parse_position(number: usize, text: &str) -> Result<Position, ParseError> {
    let malformed = || ParseError::MalformedPosition {
        line: number,
        text: text.to_string(),
    };

    let (x, y) = text.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().strip_prefix("x=").ok_or_else(malformed)?;
    let y = y.trim().strip_prefix("y=").ok_or_else(malformed)?;

    Ok(Position::new(
        parse_coordinate(number, x)?,
        parse_coordinate(number, y)?,
    ))
}

fn parse_coordinate(number: usize, text: &str) -> Result<i64, ParseError> {
    text.trim()
        .parse()
        .map_err(|source| ParseError::InvalidCoordinate {
            line: number,
            text: text.to_string(),
            source,
        })
}
