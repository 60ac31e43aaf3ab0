//! Sales forecaster built on the bagged tree ensemble.

use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::DailySeries;
use crate::error::{AnalyticsError, Result};
use crate::features::{calendar_features, design_matrix};
use crate::forecast::forest::RandomForest;
use crate::utils::{quantile_normal, r_squared, std_dev};

/// Minimum number of distinct calendar dates required to fit.
pub const MIN_HISTORY_DAYS: usize = 7;

/// Default number of trees in the ensemble.
pub const DEFAULT_TREE_COUNT: usize = 100;

/// Default random seed.
pub const DEFAULT_SEED: u64 = 42;

/// How the reported fit score is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccuracyMode {
    /// R-squared on the training data itself.
    ///
    /// This is a fit-quality indicator, not a generalization estimate:
    /// scoring the model on the data it was trained on is optimistically
    /// biased. Kept as the default for compatibility with existing
    /// dashboards.
    InSample,
    /// R-squared of a model trained on the head of the series, scored
    /// on the held-out tail. Affects only the reported score; the
    /// forecast itself is always produced by the full-data model.
    Holdout {
        /// Fraction of the series (from the end) held out for scoring.
        fraction: f64,
    },
}

/// Result of a forecast call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Forecast dates, contiguous and strictly increasing, starting the
    /// day after the last historical date.
    pub dates: Vec<NaiveDate>,
    /// Point estimates, parallel to `dates`.
    pub point: Vec<f64>,
    /// Lower confidence bound, parallel to `dates`.
    pub lower: Vec<f64>,
    /// Upper confidence bound, parallel to `dates`.
    pub upper: Vec<f64>,
    /// Fit score per the configured [`AccuracyMode`].
    pub fit_score: f64,
    /// The historical daily series the model was fitted on.
    pub history: DailySeries,
}

impl ForecastResult {
    /// Number of forecast days.
    pub fn horizon(&self) -> usize {
        self.dates.len()
    }

    /// Sum of the point estimates over the horizon.
    pub fn total(&self) -> f64 {
        self.point.iter().sum()
    }

    /// Mean daily point estimate over the horizon.
    pub fn mean_daily(&self) -> f64 {
        if self.point.is_empty() {
            return f64::NAN;
        }
        self.total() / self.point.len() as f64
    }
}

/// Forecasts daily sales totals with a symmetric confidence band.
///
/// Fits a [`RandomForest`] over calendar features of the historical
/// dates, then scores the same features for each future day. The band is
/// `point ± z * sigma` where `sigma` is the standard deviation of the
/// training residuals; its width is constant across the horizon, so it
/// should not be read as calibrated beyond short horizons.
#[derive(Debug, Clone)]
pub struct SalesForecaster {
    tree_count: usize,
    seed: u64,
    confidence: f64,
    accuracy: AccuracyMode,
}

impl SalesForecaster {
    /// Create a forecaster with default settings (100 trees, seed 42,
    /// 95% band, in-sample fit score).
    pub fn new() -> Self {
        Self {
            tree_count: DEFAULT_TREE_COUNT,
            seed: DEFAULT_SEED,
            confidence: 0.95,
            accuracy: AccuracyMode::InSample,
        }
    }

    /// Set the number of trees in the ensemble.
    pub fn with_tree_count(mut self, tree_count: usize) -> Self {
        self.tree_count = tree_count.max(1);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the confidence level for the band (e.g. 0.95).
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set how the reported fit score is computed.
    pub fn with_accuracy_mode(mut self, accuracy: AccuracyMode) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Forecast the next `horizon` calendar days of the series.
    ///
    /// # Errors
    /// * `InvalidParameter` - `horizon` is zero or the confidence level
    ///   is outside (0, 1)
    /// * `InsufficientHistory` - fewer than [`MIN_HISTORY_DAYS`]
    ///   distinct dates in the series
    pub fn forecast(&self, series: &DailySeries, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "horizon must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.confidence) || self.confidence == 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence
            )));
        }
        if series.len() < MIN_HISTORY_DAYS {
            return Err(AnalyticsError::InsufficientHistory {
                needed: MIN_HISTORY_DAYS,
                got: series.len(),
            });
        }

        let origin = series.first_date().ok_or(AnalyticsError::EmptyData)?;
        let last = series.last_date().ok_or(AnalyticsError::EmptyData)?;

        let x = design_matrix(series);
        let y = series.totals();

        debug!(
            "fitting {} trees on {} daily totals, horizon {}",
            self.tree_count,
            series.len(),
            horizon
        );

        let mut forest = RandomForest::new(self.tree_count, self.seed);
        forest.fit(&x, y)?;

        let fitted = forest.predict_batch(&x)?;
        let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(a, f)| a - f).collect();
        let sigma = std_dev(&residuals);
        let z = quantile_normal(0.5 + self.confidence / 2.0);
        let band = z * sigma;

        let mut dates = Vec::with_capacity(horizon);
        let mut point = Vec::with_capacity(horizon);
        for step in 1..=horizon as i64 {
            let date = last + Duration::days(step);
            let features = calendar_features(date, origin);
            dates.push(date);
            point.push(forest.predict(&features)?);
        }

        let lower: Vec<f64> = point.iter().map(|p| p - band).collect();
        let upper: Vec<f64> = point.iter().map(|p| p + band).collect();

        let fit_score = match self.accuracy {
            AccuracyMode::InSample => r_squared(y, &fitted),
            AccuracyMode::Holdout { fraction } => {
                self.holdout_score(series, &x, y, fraction)
                    .unwrap_or_else(|| {
                        warn!("holdout split too small, falling back to in-sample score");
                        r_squared(y, &fitted)
                    })
            }
        };

        Ok(ForecastResult {
            dates,
            point,
            lower,
            upper,
            fit_score,
            history: series.clone(),
        })
    }

    /// Score a model trained on the head of the series against the tail.
    ///
    /// Returns `None` when the requested split leaves either side too
    /// small to be meaningful.
    fn holdout_score(
        &self,
        series: &DailySeries,
        x: &[Vec<f64>],
        y: &[f64],
        fraction: f64,
    ) -> Option<f64> {
        if !(0.0..1.0).contains(&fraction) || fraction == 0.0 {
            return None;
        }

        let n = series.len();
        let holdout = ((n as f64) * fraction).round() as usize;
        if holdout == 0 || n - holdout < MIN_HISTORY_DAYS {
            return None;
        }
        let train = n - holdout;

        let mut forest = RandomForest::new(self.tree_count, self.seed);
        forest.fit(&x[..train], &y[..train]).ok()?;

        let predicted = forest.predict_batch(&x[train..]).ok()?;
        Some(r_squared(&y[train..], &predicted))
    }
}

impl Default for SalesForecaster {
    fn default() -> Self {
        Self::new()
    }
}
