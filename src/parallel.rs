//! # Parallel Gap Search
//!
//! Splits the row range of a gap search into contiguous bands and scans each band
//! on tokio's blocking pool. Rows are independent, and the [`Report`] is shared
//! read-only through an [`Arc`], so workers need no locks.
//!
//! ## Cancellation
//!
//! Workers share one atomic "best row" (initially `i64::MAX`). A worker that finds
//! a gap lowers it with `fetch_min`; every worker checks it before each row and
//! stops once its current row is past the best one. Bands below the best row keep
//! scanning, so the final answer is always the gap with the smallest row, the same
//! one [`find_gap`](crate::coverage::find_gap) returns.
//!
//! A band whose worker fails was never fully scanned, so a failure is returned
//! as [`SearchError`] instead of being folded into a "fully covered" answer. The
//! remaining workers are told to stop by pushing the best row below every band.

use crate::coverage::{scan_rows, Gap};
use crate::model::Report;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, warn};

/// Errors from the parallel gap search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A band worker panicked or was cancelled before finishing its rows
    #[error("gap search worker failed: {0}")]
    WorkerFailed(#[from] JoinError),
}

/// Split `[min_coord, max_coord]` into at most `workers` contiguous bands.
fn row_bands(min_coord: i64, max_coord: i64, workers: usize) -> Vec<RangeInclusive<i64>> {
    if min_coord > max_coord {
        return Vec::new();
    }

    let rows = max_coord.abs_diff(min_coord).saturating_add(1);
    let workers = (workers.max(1) as u64).min(rows);
    let band = rows.div_ceil(workers);

    let mut bands = Vec::with_capacity(workers as usize);
    let mut start = min_coord;
    loop {
        let end = start
            .checked_add_unsigned(band - 1)
            .map_or(max_coord, |end| end.min(max_coord));
        bands.push(start..=end);
        if end >= max_coord {
            break;
        }
        start = end + 1;
    }
    bands
}

/// Parallel rendition of [`find_gap`](crate::coverage::find_gap).
///
/// Returns the same gap the sequential search would. Must be awaited inside a
/// multi-threaded tokio runtime for the bands to actually run concurrently.
///
/// # Errors
/// [`SearchError::WorkerFailed`] when any band's worker panics or is cancelled.
///
/// # Example
/// ```
/// use beacon_zone_lib::{find_gap_parallel, Position, Report, SensorRecord};
/// use std::sync::Arc;
///
/// let report = Arc::new(Report::new([SensorRecord::new(0, 0, 0, 5)]));
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let gap = rt.block_on(find_gap_parallel(report, 0, 10, 4)).unwrap().unwrap();
///
/// assert_eq!(gap.position, Position::new(6, 0));
/// ```
pub async fn find_gap_parallel(
    report: Arc<Report>,
    min_coord: i64,
    max_coord: i64,
    workers: usize,
) -> Result<Option<Gap>, SearchError> {
    let bands = row_bands(min_coord, max_coord, workers);
    debug!(
        sensors = report.sensors().len(),
        bands = bands.len(),
        min_coord,
        max_coord,
        "Searching for uncovered position in parallel"
    );

    let found = search_bands(bands, move |rows, best_row| {
        scan_rows(&report, rows, min_coord, max_coord, |row| {
            row <= best_row.load(Ordering::Relaxed)
        })
    })
    .await?;

    if found.is_none() {
        debug!(min_coord, max_coord, "Search square fully covered");
    }
    Ok(found)
}

/// Run `scan` for every band on the blocking pool and keep the lowest-row gap.
///
/// `scan` receives the shared best row and must stop once it is passed.
async fn search_bands<F>(
    bands: Vec<RangeInclusive<i64>>,
    scan: F,
) -> Result<Option<Gap>, SearchError>
where
    F: Fn(RangeInclusive<i64>, &AtomicI64) -> Option<Gap> + Send + Sync + 'static,
{
    let scan = Arc::new(scan);
    let best_row = Arc::new(AtomicI64::new(i64::MAX));
    let mut handles = Vec::with_capacity(bands.len());

    for rows in bands {
        let scan = Arc::clone(&scan);
        let best_row = Arc::clone(&best_row);

        handles.push(tokio::task::spawn_blocking(move || {
            let gap = scan(rows, &best_row);
            if let Some(gap) = gap {
                best_row.fetch_min(gap.position.y, Ordering::Relaxed);
            }
            gap
        }));
    }

    let mut found: Option<Gap> = None;
    for handle in handles {
        match handle.await {
            Ok(Some(gap)) => {
                if found.map_or(true, |best| gap.position.y < best.position.y) {
                    found = Some(gap);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Gap search worker failed: {}", e);
                best_row.store(i64::MIN, Ordering::Relaxed);
                return Err(SearchError::WorkerFailed(e));
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::find_gap;
    use crate::{Position, SensorRecord};

    #[test]
    fn test_row_bands_cover_range_exactly() {
        let bands = row_bands(0, 20, 4);

        assert_eq!(bands, vec![0..=5, 6..=11, 12..=17, 18..=20]);
    }

    #[test]
    fn test_row_bands_more_workers_than_rows() {
        assert_eq!(row_bands(-1, 1, 8), vec![-1..=-1, 0..=0, 1..=1]);
    }

    #[test]
    fn test_row_bands_zero_workers_is_one_band() {
        assert_eq!(row_bands(3, 9, 0), vec![3..=9]);
    }

    #[test]
    fn test_row_bands_empty_range() {
        assert!(row_bands(5, 4, 2).is_empty());
    }

    #[test]
    fn test_row_bands_full_i64_range() {
        assert_eq!(
            row_bands(i64::MIN, i64::MAX, 2),
            vec![i64::MIN..=-1, 0..=i64::MAX]
        );
        assert_eq!(row_bands(i64::MIN, i64::MAX, 1), vec![i64::MIN..=i64::MAX]);
        assert_eq!(row_bands(i64::MAX, i64::MAX, 3), vec![i64::MAX..=i64::MAX]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_band_is_reported_not_covered() {
        let bands = row_bands(0, 7, 2);

        let result = search_bands(bands, |rows, _| {
            if *rows.start() == 4 {
                panic!("band {:?} failed", rows);
            }
            None
        })
        .await;

        assert!(
            matches!(result, Err(SearchError::WorkerFailed(ref e)) if e.is_panic()),
            "A failed band must surface as an error, got {:?}",
            result
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_band_error_even_when_other_band_finds_gap() {
        let bands = row_bands(0, 7, 2);

        let result = search_bands(bands, |rows, _| {
            if *rows.start() == 0 {
                panic!("band {:?} failed", rows);
            }
            Some(Gap::new(Position::new(0, *rows.start())))
        })
        .await;

        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parallel_sensor_at_plane_edge() {
        let report = Arc::new(Report::new([
            SensorRecord::new(i64::MAX - 1, 0, i64::MAX - 1, 5),
            SensorRecord::new(0, 0, 0, 0),
        ]));

        let gap = find_gap_parallel(report, 0, 3, 1).await.unwrap();
        assert_eq!(gap, Some(Gap::new(Position::new(1, 0))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parallel_picks_smallest_row() {
        // Rows 0..=12 are never covered past x = 4, so every band sees a gap; the
        // lowest row must win.
        let report = Arc::new(Report::new([SensorRecord::new(0, 1, 0, 5)]));

        let parallel = find_gap_parallel(Arc::clone(&report), 0, 12, 3).await.unwrap();
        let sequential = find_gap(&report, 0, 12);

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.map(|gap| gap.position), Some(Position::new(4, 0)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parallel_fully_covered() {
        let report = Arc::new(Report::new([SensorRecord::new(5, 5, 5, 25)]));

        assert_eq!(find_gap_parallel(report, 0, 10, 4).await.unwrap(), None);
    }
}
