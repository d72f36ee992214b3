//! # Beacon Exclusion Core Library
//!
//! This library models a field of sensors, each of which reports the position of
//! its closest beacon, and answers two questions about the area those sensors cover:
//!
//! 1. **Exclusion count**: on a single row, how many positions cannot hold an
//!    undetected beacon?
//! 2. **Gap search**: inside a bounded square, which single position is not
//!    covered by any sensor, and what is its tuning frequency?
//!
//! ## Design Philosophy
//!
//! ### Coverage as Intervals
//! Each sensor covers a diamond of radius `r` (Manhattan distance to its beacon).
//! Intersected with a row, a diamond is a single inclusive x-range. All queries work
//! on those per-row ranges:
//! - **No materialization**: rows are never expanded into per-position sets on the
//!   hot path, so the bounded search stays tractable over millions of rows
//! - **Fresh per row**: intervals are derived, sorted and swept for every row; nothing
//!   is cached between rows
//!
//! ### Explicit Dependencies
//! The [`model::Report`] is built once by the caller and passed by reference into
//! every coverage query. There is no process-wide state.
//!
//! ### Data Flow
//! 1. **Parse**: report text → [`model::SensorRecord`] quadruples ([`parser`])
//! 2. **Model**: records → immutable sensors with radii and known beacons ([`model`])
//! 3. **Query**: per-row intervals → merged coverage → count or gap ([`coverage`])
//!
//! ## Core Types
//!
//! - [`Position`]: An integer point in the plane
//! - [`model::Report`]: Sensors and known beacons, immutable after load
//! - [`coverage::Gap`]: The located uncovered position with its tuning frequency

use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod coverage;
pub mod interval;
pub mod model;
pub mod parallel;
pub mod parser;


pub use coverage::{excluded_count, find_gap, Gap};
pub use model::{Beacon, Report, Sensor, SensorRecord};
pub use parallel::{find_gap_parallel, SearchError};

/// An integer position in the plane.
///
/// `x` grows to the right and `y` grows downward, as in the sensor reports.
/// Coordinates are `i64` so that tuning frequencies (`x * 4_000_000 + y`)
/// never overflow for realistic search bounds.
///
/// # Example
/// ```
/// use beacon_zone_lib::Position;
///
/// let sensor = Position::new(8, 7);
/// let beacon = Position::new(2, 10);
///
/// assert_eq!(sensor.manhattan_distance(beacon), 9);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column
    pub x: i64,
    /// Row
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance: `|x1 - x2| + |y1 - y2|`.
    ///
    /// Saturates at `i64::MAX` for points at opposite ends of the plane.
    pub fn manhattan_distance(self, other: Position) -> i64 {
        let distance = self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y));
        i64::try_from(distance).unwrap_or(i64::MAX)
    }
}
