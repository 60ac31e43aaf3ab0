//! # ledger-analytics
//!
//! Predictive analytics over accounting transaction batches.
//!
//! Provides time-series sales forecasting with confidence bands, RFM
//! customer segmentation via k-means clustering, product movement
//! classification using quantile thresholds, seasonal aggregation, and
//! KPI combination.
//!
//! Every operation is a single-shot, stateless computation over a
//! caller-supplied batch of [`core::TransactionRecord`]s: nothing is
//! cached or persisted between calls, and concurrent invocations with
//! independent inputs need no locking. Acquiring records from the
//! accounting system and rendering the result structures are the
//! caller's concern.

pub mod core;
pub mod error;
pub mod features;
pub mod forecast;
pub mod kpi;
pub mod seasonal;
pub mod segmentation;
pub mod trend;
pub mod utils;

pub use error::{AnalyticsError, Result};

pub mod prelude {
    pub use crate::core::{DailySeries, TransactionRecord};
    pub use crate::error::{AnalyticsError, Result};
    pub use crate::forecast::{AccuracyMode, ForecastResult, SalesForecaster};
    pub use crate::kpi::{calculate_kpis, InventoryRow, OutstandingRow};
    pub use crate::seasonal::{seasonal_patterns, SeasonalSummary};
    pub use crate::segmentation::{
        segment_customers, Segmentation, SegmentationConfig, SegmentNaming,
    };
    pub use crate::trend::{classify_movement, MovementCategory, TrendAnalysis};
}
