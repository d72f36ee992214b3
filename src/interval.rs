//! # Row Intervals
//!
//! A sensor's diamond intersected with a single row is one inclusive x-range.
//! This module derives those ranges, clips them to a search bound and merges
//! them into disjoint coverage.

use crate::model::Sensor;
use serde::{Deserialize, Serialize};

/// Inclusive x-range `[lower, upper]` on one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowInterval {
    pub lower: i64,
    pub upper: i64,
}

impl RowInterval {
    pub const fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// Coverage of `sensor` on `row`, or `None` when the row is out of reach.
    ///
    /// For `reach = radius - |sensor.y - row|` the interval is
    /// `[sensor.x - reach, sensor.x + reach]`.
    pub fn for_sensor(sensor: &Sensor, row: i64) -> Option<Self> {
        let reach = sensor.reach_at(row);
        if reach < 0 {
            return None;
        }

        let x = sensor.position.x;
        Some(Self::new(x.saturating_sub(reach), x.saturating_add(reach)))
    }

    /// Restrict to `[min_coord, max_coord]`.
    ///
    /// Returns `None` when nothing of the interval lies inside the bound.
    pub fn clip(self, min_coord: i64, max_coord: i64) -> Option<Self> {
        let lower = self.lower.max(min_coord);
        let upper = self.upper.min(max_coord);
        (lower <= upper).then_some(Self::new(lower, upper))
    }

    /// Number of integer positions covered, saturating at `u64::MAX`.
    pub fn width(&self) -> u64 {
        self.lower.abs_diff(self.upper).saturating_add(1)
    }

    pub fn contains(&self, x: i64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Merge `other` into `self` if they overlap or abut.
    ///
    /// `[1, 2]` and `[3, 4]` merge into `[1, 4]`; `[1, 2]` and `[4, 5]` do not.
    pub fn merge(self, other: Self) -> Option<Self> {
        let (first, second) = if self.lower <= other.lower {
            (self, other)
        } else {
            (other, self)
        };

        if second.lower <= first.upper.saturating_add(1) {
            Some(Self::new(first.lower, first.upper.max(second.upper)))
        } else {
            None
        }
    }
}

/// Sort `intervals` by lower bound and sweep them into disjoint, non-adjacent
/// coverage, in ascending order.
pub fn merge_all(intervals: &mut [RowInterval]) -> Vec<RowInterval> {
    intervals.sort_unstable_by_key(|interval| interval.lower);

    let mut merged: Vec<RowInterval> = Vec::with_capacity(intervals.len());
    for &interval in intervals.iter() {
        match merged.last_mut() {
            Some(last) => match last.merge(interval) {
                Some(joined) => *last = joined,
                None => merged.push(interval),
            },
            None => merged.push(interval),
        }
    }

    merged
}

/// Total positions covered by a merged (disjoint) interval list.
pub fn covered_len(merged: &[RowInterval]) -> u64 {
    merged
        .iter()
        .map(RowInterval::width)
        .fold(0, u64::saturating_add)
}
