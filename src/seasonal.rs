//! Seasonal aggregation by calendar month, weekday, and quarter.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::core::TransactionRecord;

/// Month names indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday names, Monday-first, indexed by weekday number.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Amount totals bucketed by calendar period.
///
/// Amounts are summed across all years present in the batch; this is a
/// pattern-shape summary, not a year-over-year comparison. Each bucket
/// array sums to the batch total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalSummary {
    /// Totals per calendar month, index 0 = January.
    pub monthly_totals: [f64; 12],
    /// Totals per weekday, index 0 = Monday.
    pub weekday_totals: [f64; 7],
    /// Totals per quarter, index 0 = Q1.
    pub quarterly_totals: [f64; 4],
    /// Month (1-12) with the largest total; `None` for an empty batch.
    pub peak_month: Option<u32>,
    /// Weekday (0 = Monday) with the largest total; `None` for an empty
    /// batch.
    pub peak_weekday: Option<u32>,
}

impl SeasonalSummary {
    /// Name of the peak month, if any.
    pub fn peak_month_name(&self) -> Option<&'static str> {
        self.peak_month.map(|m| MONTH_NAMES[(m - 1) as usize])
    }

    /// Name of the peak weekday, if any.
    pub fn peak_weekday_name(&self) -> Option<&'static str> {
        self.peak_weekday.map(|d| WEEKDAY_NAMES[d as usize])
    }

    /// Quarter (1-4) with the largest total; `None` for an empty batch.
    pub fn peak_quarter(&self) -> Option<u32> {
        if self.peak_month.is_none() {
            return None;
        }
        argmax(&self.quarterly_totals).map(|i| i as u32 + 1)
    }

    /// Total amount across all buckets.
    pub fn total(&self) -> f64 {
        self.monthly_totals.iter().sum()
    }
}

/// Bucket each record's amount by month, weekday, and quarter.
pub fn seasonal_patterns(records: &[TransactionRecord]) -> SeasonalSummary {
    let mut monthly_totals = [0.0; 12];
    let mut weekday_totals = [0.0; 7];
    let mut quarterly_totals = [0.0; 4];

    for record in records {
        let month = record.date.month() as usize;
        let weekday = record.date.weekday().num_days_from_monday() as usize;

        monthly_totals[month - 1] += record.amount;
        weekday_totals[weekday] += record.amount;
        quarterly_totals[(month - 1) / 3] += record.amount;
    }

    let (peak_month, peak_weekday) = if records.is_empty() {
        (None, None)
    } else {
        (
            argmax(&monthly_totals).map(|i| i as u32 + 1),
            argmax(&weekday_totals).map(|i| i as u32),
        )
    };

    SeasonalSummary {
        monthly_totals,
        weekday_totals,
        quarterly_totals,
        peak_month,
        peak_weekday,
    }
}

/// Index of the largest value; first index wins ties.
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
