//! Calendar feature extraction for daily series.
//!
//! Maps calendar dates to the numeric feature vectors consumed by the
//! forecast ensemble. The same mapping is applied to historical and
//! future dates, so a model fitted on the design matrix can score any
//! date past the end of the series.

use chrono::{Datelike, NaiveDate};

use crate::core::DailySeries;

/// Number of features produced per date.
pub const FEATURE_COUNT: usize = 4;

/// Build the feature vector for a single date.
///
/// Features are `[day_offset, day_of_week, month, is_weekend]` where
/// `day_offset` counts days since `origin`, `day_of_week` is 0 for
/// Monday through 6 for Sunday, `month` is 1-12, and `is_weekend` is
/// 1.0 for Saturday and Sunday.
///
/// # Arguments
/// * `date` - Date to featurize (historical or future)
/// * `origin` - Earliest date in the batch, anchoring `day_offset`
pub fn calendar_features(date: NaiveDate, origin: NaiveDate) -> [f64; FEATURE_COUNT] {
    let day_offset = (date - origin).num_days() as f64;
    let day_of_week = date.weekday().num_days_from_monday();
    let is_weekend = if day_of_week >= 5 { 1.0 } else { 0.0 };

    [
        day_offset,
        day_of_week as f64,
        date.month() as f64,
        is_weekend,
    ]
}

/// Build the design matrix for every date in a daily series.
///
/// Rows are parallel to `series.dates()`, anchored at the series'
/// first date. An empty series yields an empty matrix.
pub fn design_matrix(series: &DailySeries) -> Vec<Vec<f64>> {
    let Some(origin) = series.first_date() else {
        return Vec::new();
    };

    series
        .dates()
        .iter()
        .map(|&date| calendar_features(date, origin).to_vec())
        .collect()
}
