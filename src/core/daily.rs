//! Daily aggregate series derived from transaction batches.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::TransactionRecord;
use crate::error::{AnalyticsError, Result};

/// A daily total series: one entry per distinct calendar date, ordered.
///
/// Dates are strictly increasing; this is the invariant the forecaster
/// relies on when extending the calendar past the last observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    totals: Vec<f64>,
}

impl DailySeries {
    /// Create a series from parallel date/total vectors.
    ///
    /// Fails if the lengths differ or the dates are not strictly
    /// increasing.
    pub fn new(dates: Vec<NaiveDate>, totals: Vec<f64>) -> Result<Self> {
        if dates.len() != totals.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: dates.len(),
                got: totals.len(),
            });
        }
        for window in dates.windows(2) {
            if window[1] <= window[0] {
                return Err(AnalyticsError::DateError(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { dates, totals })
    }

    /// Aggregate a transaction batch into per-date totals.
    ///
    /// Input order is irrelevant; amounts on the same date are summed.
    /// An empty batch yields an empty series.
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.date).or_insert(0.0) += record.amount;
        }
        let (dates, totals) = totals.into_iter().unzip();
        Self { dates, totals }
    }

    /// Number of distinct dates in the series.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Ordered dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Per-date totals, parallel to `dates`.
    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    /// Earliest date, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Latest date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
