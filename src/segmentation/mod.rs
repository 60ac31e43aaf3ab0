//! Customer behavioral segmentation via clustered RFM metrics.

mod engine;
mod kmeans;
mod rfm;

pub use engine::{
    segment_customers, RfmRecord, Segmentation, SegmentationConfig, SegmentNaming, SegmentStats,
    MAX_SEGMENTS, MIN_CUSTOMERS, SEGMENT_NAMES,
};
pub use kmeans::{kmeans, KMeansConfig, KMeansResult};
pub use rfm::{compute_rfm, feature_matrix, RfmMetrics};
