//! Sales forecasting: bagged regression trees over calendar features.

mod forest;
mod model;
mod tree;

pub use forest::RandomForest;
pub use model::{
    AccuracyMode, ForecastResult, SalesForecaster, DEFAULT_SEED, DEFAULT_TREE_COUNT,
    MIN_HISTORY_DAYS,
};
pub use tree::RegressionTree;
