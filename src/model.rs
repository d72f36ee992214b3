//! # Report Model
//!
//! Immutable sensors and known beacons, built once from parsed report records.
//! A sensor's coverage radius is fixed at construction as the Manhattan distance
//! to the beacon it reported.

use crate::parser::{parse_report, ParseError};
use crate::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One report line: a sensor position and the closest beacon it detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub sensor: Position,
    pub beacon: Position,
}

impl SensorRecord {
    pub const fn new(sensor_x: i64, sensor_y: i64, beacon_x: i64, beacon_y: i64) -> Self {
        Self {
            sensor: Position::new(sensor_x, sensor_y),
            beacon: Position::new(beacon_x, beacon_y),
        }
    }
}

/// A sensor with its coverage radius.
///
/// Every position within `radius` (Manhattan distance) of `position` is known
/// not to hold an undetected beacon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub position: Position,
    pub radius: i64,
}

impl Sensor {
    pub fn new(position: Position, closest_beacon: Position) -> Self {
        Self {
            position,
            radius: position.manhattan_distance(closest_beacon),
        }
    }

    /// Half-width of this sensor's coverage on `row`.
    ///
    /// Negative when the row lies outside the diamond.
    pub fn reach_at(&self, row: i64) -> i64 {
        let dy = i64::try_from(self.position.y.abs_diff(row)).unwrap_or(i64::MAX);
        self.radius.saturating_sub(dy)
    }

    pub fn covers(&self, point: Position) -> bool {
        self.position.manhattan_distance(point) <= self.radius
    }
}

/// A beacon at a known, exact location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beacon {
    pub position: Position,
}

/// Sensors and known beacons from one report.
///
/// Both lists keep report order. Beacons shared by several sensors appear once
/// per record; queries apply set semantics where it matters.
///
/// # Example
/// ```
/// use beacon_zone_lib::{Report, SensorRecord};
///
/// let report = Report::new([SensorRecord::new(8, 7, 2, 10)]);
///
/// assert_eq!(report.sensors()[0].radius, 9);
/// assert_eq!(report.beacons().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    sensors: Vec<Sensor>,
    beacons: Vec<Beacon>,
}

impl Report {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SensorRecord>,
    {
        let records = records.into_iter();
        let (lower, _) = records.size_hint();
        let mut sensors = Vec::with_capacity(lower);
        let mut beacons = Vec::with_capacity(lower);

        for record in records {
            sensors.push(Sensor::new(record.sensor, record.beacon));
            beacons.push(Beacon {
                position: record.beacon,
            });
        }

        Self { sensors, beacons }
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn beacons(&self) -> &[Beacon] {
        &self.beacons
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

impl FromStr for Report {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Report::new(parse_report(text)?))
    }
}
