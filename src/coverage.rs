//! # Coverage Engine
//!
//! Answers the two coverage questions against a [`Report`]:
//!
//! - [`excluded_count`]: positions on one unbounded row that cannot hold an
//!   undetected beacon
//! - [`find_gap`]: the first position, scanning rows upward, inside a bounded
//!   square that no sensor covers
//!
//! ## Row Sweep
//!
//! Every query derives the row's [`RowInterval`]s fresh from the sensors, sorts
//! them by lower bound and sweeps left to right. The gap search never expands a
//! row into individual positions: with bounds of `0..=4_000_000` that would be
//! ~1.6×10^13 positions. Endpoint comparison keeps each row at
//! `O(n log n)` for `n` sensors.
//!
//! ## Search Precondition
//!
//! The gap search assumes exactly one uncovered position inside the square.
//! When the whole square is covered the result is `None`, never a fabricated
//! coordinate.

use crate::interval::{covered_len, merge_all, RowInterval};
use crate::model::Report;
use crate::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Fixed multiplier applied to a gap's x-coordinate for its tuning frequency.
pub const TUNING_MULTIPLIER: i64 = 4_000_000;

/// `x * 4_000_000 + y`
pub fn tuning_frequency(position: Position) -> i64 {
    position.x * TUNING_MULTIPLIER + position.y
}

/// An uncovered position found by the gap search.
///
/// # Example
/// ```
/// use beacon_zone_lib::{Gap, Position};
///
/// let gap = Gap::new(Position::new(14, 11));
/// assert_eq!(gap.tuning_frequency, 56_000_011);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub position: Position,
    pub tuning_frequency: i64,
}

impl Gap {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            tuning_frequency: tuning_frequency(position),
        }
    }
}

/// Unclipped coverage intervals of every sensor that reaches `row`.
pub fn row_intervals(report: &Report, row: i64) -> impl Iterator<Item = RowInterval> + '_ {
    report
        .sensors()
        .iter()
        .filter_map(move |sensor| RowInterval::for_sensor(sensor, row))
}

/// Count positions on `row` that cannot contain an undetected beacon.
///
/// A position counts when it lies inside at least one sensor's coverage and is
/// not a known beacon. Overlapping sensors never double-count, and a beacon
/// reported by several sensors is subtracted once.
///
/// # Example
/// ```
/// use beacon_zone_lib::{excluded_count, Report, SensorRecord};
///
/// let report = Report::new([SensorRecord::new(0, 0, 0, 5)]);
/// assert_eq!(excluded_count(&report, 0), 11);
/// ```
pub fn excluded_count(report: &Report, row: i64) -> u64 {
    let mut intervals: Vec<RowInterval> = row_intervals(report, row).collect();
    let merged = merge_all(&mut intervals);

    let beacons_in_coverage: HashSet<i64> = report
        .beacons()
        .iter()
        .map(|beacon| beacon.position)
        .filter(|position| position.y == row)
        .map(|position| position.x)
        .filter(|x| merged.iter().any(|interval| interval.contains(*x)))
        .collect();

    let count = covered_len(&merged) - beacons_in_coverage.len() as u64;
    debug!(
        row,
        intervals = merged.len(),
        beacons = beacons_in_coverage.len(),
        count,
        "Computed exclusion count"
    );
    count
}

/// The excluded positions on `row`, materialized one by one.
///
/// Same answer as [`excluded_count`] (`excluded_positions(r, y).len()`), built
/// the direct way: every covered position goes into a set, then known beacons
/// are removed. Only suitable for rows of moderate width.
pub fn excluded_positions(report: &Report, row: i64) -> HashSet<i64> {
    let mut positions: HashSet<i64> = row_intervals(report, row)
        .flat_map(|interval| interval.lower..=interval.upper)
        .collect();

    for beacon in report.beacons() {
        if beacon.position.y == row {
            positions.remove(&beacon.position.x);
        }
    }

    positions
}

/// First uncovered x in `[min_coord, max_coord]` given one row's clipped intervals.
///
/// Sorts `intervals` by lower bound, then sweeps once, tracking the furthest
/// contiguously covered position. An empty list leaves the whole row open, so
/// the gap is at `min_coord`.
pub fn gap_in_row(intervals: &mut [RowInterval], min_coord: i64, max_coord: i64) -> Option<i64> {
    intervals.sort_unstable_by_key(|interval| interval.lower);

    let (first, rest) = match intervals.split_first() {
        Some(split) => split,
        None => return Some(min_coord),
    };

    if first.lower > min_coord {
        return Some(min_coord);
    }

    let mut reachable_upper = first.upper;
    for interval in rest {
        if interval.lower > reachable_upper.saturating_add(1) {
            return Some(reachable_upper + 1);
        }
        reachable_upper = reachable_upper.max(interval.upper);
    }

    (reachable_upper < max_coord).then_some(reachable_upper + 1)
}

/// Reusable per-row working buffer for the gap search.
///
/// Intervals are rebuilt from scratch for every row; only the allocation is
/// carried over.
#[derive(Debug, Default)]
pub struct RowScanner {
    intervals: Vec<RowInterval>,
}

impl RowScanner {
    pub fn new(capacity: usize) -> Self {
        Self {
            intervals: Vec::with_capacity(capacity),
        }
    }

    /// Uncovered x on `row` inside `[min_coord, max_coord]`, if any.
    pub fn scan(
        &mut self,
        report: &Report,
        row: i64,
        min_coord: i64,
        max_coord: i64,
    ) -> Option<i64> {
        self.intervals.clear();
        self.intervals.extend(
            row_intervals(report, row).filter_map(|interval| interval.clip(min_coord, max_coord)),
        );

        gap_in_row(&mut self.intervals, min_coord, max_coord)
    }
}

/// Scan `rows` in increasing order and return the first gap.
///
/// `keep_going` is consulted before each row; returning `false` stops the scan
/// without a result.
pub(crate) fn scan_rows<F>(
    report: &Report,
    rows: RangeInclusive<i64>,
    min_coord: i64,
    max_coord: i64,
    mut keep_going: F,
) -> Option<Gap>
where
    F: FnMut(i64) -> bool,
{
    let mut scanner = RowScanner::new(report.sensors().len());

    for row in rows {
        if !keep_going(row) {
            return None;
        }
        if let Some(x) = scanner.scan(report, row, min_coord, max_coord) {
            let gap = Gap::new(Position::new(x, row));
            trace!(x, row, "Found uncovered position");
            return Some(gap);
        }
    }

    None
}

/// Find the uncovered position inside `[min_coord, max_coord]²`.
///
/// Rows are scanned from `min_coord` upward and the first gap found is returned.
/// `None` means every position in the square is covered.
///
/// # Example
/// ```
/// use beacon_zone_lib::{find_gap, Position, Report, SensorRecord};
///
/// let report = Report::new([SensorRecord::new(0, 0, 0, 5)]);
/// let gap = find_gap(&report, 0, 10).unwrap();
///
/// assert_eq!(gap.position, Position::new(6, 0));
/// ```
pub fn find_gap(report: &Report, min_coord: i64, max_coord: i64) -> Option<Gap> {
    debug!(
        sensors = report.sensors().len(),
        min_coord, max_coord, "Searching for uncovered position"
    );

    let gap = scan_rows(report, min_coord..=max_coord, min_coord, max_coord, |_| true);
    if gap.is_none() {
        debug!(min_coord, max_coord, "Search square fully covered");
    }
    gap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SensorRecord;

    fn single_sensor_report() -> Report {
        Report::new([SensorRecord::new(0, 0, 0, 5)])
    }

    #[test]
    fn test_tuning_frequency() {
        assert_eq!(tuning_frequency(Position::new(14, 11)), 56_000_011);
        assert_eq!(tuning_frequency(Position::new(0, 7)), 7);
        assert_eq!(
            tuning_frequency(Position::new(4_000_000, 4_000_000)),
            16_000_004_000_000
        );
    }

    #[test]
    fn test_single_sensor_excluded_count() {
        let report = single_sensor_report();

        assert_eq!(excluded_count(&report, 0), 11);
        assert_eq!(excluded_count(&report, 3), 5);
        assert_eq!(excluded_count(&report, -5), 1);
        assert_eq!(excluded_count(&report, 6), 0);
        // The reported beacon sits alone on row 5.
        assert_eq!(excluded_count(&report, 5), 0);
    }

    #[test]
    fn test_shared_beacon_subtracted_once() {
        let report = Report::new([
            SensorRecord::new(0, 0, 2, 0),
            SensorRecord::new(4, 0, 2, 0),
        ]);

        // Coverage [-2, 6] minus the single beacon at x = 2.
        assert_eq!(excluded_count(&report, 0), 8);
        assert_eq!(excluded_positions(&report, 0).len(), 8);
    }

    #[test]
    fn test_gap_in_empty_row_is_at_min() {
        assert_eq!(gap_in_row(&mut [], 0, 20), Some(0));
    }

    #[test]
    fn test_gap_before_first_interval() {
        let mut intervals = [RowInterval::new(3, 20), RowInterval::new(1, 5)];
        assert_eq!(gap_in_row(&mut intervals, 0, 20), Some(0));
    }

    #[test]
    fn test_gap_between_intervals() {
        let mut intervals = [
            RowInterval::new(9, 20),
            RowInterval::new(0, 4),
            RowInterval::new(2, 7),
        ];
        assert_eq!(gap_in_row(&mut intervals, 0, 20), Some(8));
    }

    #[test]
    fn test_adjacent_intervals_leave_no_gap() {
        let mut intervals = [RowInterval::new(0, 4), RowInterval::new(5, 20)];
        assert_eq!(gap_in_row(&mut intervals, 0, 20), None);
    }

    #[test]
    fn test_gap_after_last_interval() {
        let mut intervals = [RowInterval::new(0, 12), RowInterval::new(4, 17)];
        assert_eq!(gap_in_row(&mut intervals, 0, 20), Some(18));
    }

    #[test]
    fn test_contained_interval_does_not_shrink_reach() {
        let mut intervals = [
            RowInterval::new(0, 15),
            RowInterval::new(2, 3),
            RowInterval::new(16, 20),
        ];
        assert_eq!(gap_in_row(&mut intervals, 0, 20), None);
    }

    #[test]
    fn test_single_sensor_gap_is_past_clipped_reach() {
        let report = single_sensor_report();
        let mut scanner = RowScanner::default();

        assert_eq!(scanner.scan(&report, 0, 0, 10), Some(6));
        assert_eq!(
            find_gap(&report, 0, 10),
            Some(Gap::new(Position::new(6, 0)))
        );
    }

    #[test]
    fn test_row_out_of_reach_reports_min_coord() {
        let report = single_sensor_report();
        let mut scanner = RowScanner::default();

        assert_eq!(scanner.scan(&report, 9, 0, 10), Some(0));
    }

    #[test]
    fn test_sensor_at_plane_edge_does_not_overflow() {
        let report = Report::new([
            SensorRecord::new(i64::MAX - 1, 0, i64::MAX - 1, 5),
            SensorRecord::new(0, 0, 0, 0),
        ]);

        assert_eq!(find_gap(&report, 0, 3), Some(Gap::new(Position::new(1, 0))));
        assert_eq!(excluded_count(&report, 0), 7);
    }

    #[test]
    fn test_gap_in_row_at_coordinate_limits() {
        let mut intervals = [
            RowInterval::new(i64::MIN, 0),
            RowInterval::new(2, i64::MAX),
        ];
        assert_eq!(gap_in_row(&mut intervals, i64::MIN, i64::MAX), Some(1));

        let mut intervals = [RowInterval::new(i64::MIN, i64::MAX)];
        assert_eq!(gap_in_row(&mut intervals, i64::MIN, i64::MAX), None);
    }

    #[test]
    fn test_fully_covered_square_has_no_gap() {
        let report = Report::new([SensorRecord::new(5, 5, 5, 25)]);

        assert_eq!(find_gap(&report, 0, 10), None);
    }

    #[test]
    fn test_empty_report_gap_at_origin_corner() {
        let report = Report::default();

        assert_eq!(
            find_gap(&report, -3, 3),
            Some(Gap::new(Position::new(-3, -3)))
        );
    }

    #[test]
    fn test_scan_rows_honours_stop_signal() {
        let report = single_sensor_report();

        let gap = scan_rows(&report, 0..=10, 0, 10, |row| row < 0);
        assert_eq!(gap, None);
    }
}
