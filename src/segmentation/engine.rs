//! Customer segmentation: RFM metrics clustered into named segments.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::TransactionRecord;
use crate::error::{AnalyticsError, Result};
use crate::segmentation::kmeans::{kmeans, KMeansConfig};
use crate::segmentation::rfm::{compute_rfm, feature_matrix, RfmMetrics};
use crate::utils::mean;

/// Minimum number of distinct counterparties required to segment.
pub const MIN_CUSTOMERS: usize = 3;

/// Maximum number of segments.
pub const MAX_SEGMENTS: usize = 4;

/// Segment names, indexed by cluster id under positional naming.
pub const SEGMENT_NAMES: [&str; MAX_SEGMENTS] =
    ["Champions", "Loyal Customers", "Potential Loyalists", "At Risk"];

/// How cluster ids map to segment names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SegmentNaming {
    /// Name clusters by their raw id: cluster 0 is always "Champions".
    ///
    /// Cluster id assignment depends on the data, so the same name can
    /// attach to different customer profiles across batches. Kept as the
    /// default for compatibility with existing dashboards.
    #[default]
    Positional,
    /// Assign names in descending order of a cluster's mean monetary
    /// value, so "Champions" is always the highest-spending segment.
    RankedByMonetary,
}

/// Segmentation parameters.
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// Cluster-id-to-name policy.
    pub naming: SegmentNaming,
    /// Random seed for clustering.
    pub seed: u64,
    /// Number of k-means restarts.
    pub restarts: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            naming: SegmentNaming::Positional,
            seed: 42,
            restarts: 10,
        }
    }
}

impl SegmentationConfig {
    /// Set the naming policy.
    pub fn naming(mut self, naming: SegmentNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of k-means restarts.
    pub fn restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts.max(1);
        self
    }
}

/// One counterparty's RFM metrics plus its assigned segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    /// Counterparty name.
    pub counterparty: String,
    /// Days since last transaction, relative to the batch maximum date.
    pub recency_days: i64,
    /// Number of distinct voucher ids.
    pub frequency: usize,
    /// Sum of transaction amounts.
    pub monetary: f64,
    /// Cluster id (0-based).
    pub segment: usize,
    /// Segment name per the configured [`SegmentNaming`].
    pub segment_name: String,
}

/// Aggregate statistics for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Segment name.
    pub name: String,
    /// Mean recency in days.
    pub mean_recency: f64,
    /// Mean distinct-voucher frequency.
    pub mean_frequency: f64,
    /// Mean monetary total.
    pub mean_monetary: f64,
    /// Number of counterparties in the segment.
    pub members: usize,
}

/// Result of a segmentation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// One record per distinct counterparty.
    pub records: Vec<RfmRecord>,
    /// Per-segment aggregate statistics, ordered by cluster id; empty
    /// clusters are omitted.
    pub stats: Vec<SegmentStats>,
    /// Raw cluster centers in standardized feature space, for
    /// diagnostics.
    pub centers: Vec<Vec<f64>>,
}

/// Segment counterparties by clustered RFM metrics.
///
/// # Errors
/// * `InsufficientCustomers` - fewer than [`MIN_CUSTOMERS`] distinct
///   counterparties in the batch
pub fn segment_customers(
    records: &[TransactionRecord],
    config: &SegmentationConfig,
) -> Result<Segmentation> {
    let metrics = compute_rfm(records);
    if metrics.len() < MIN_CUSTOMERS {
        return Err(AnalyticsError::InsufficientCustomers {
            needed: MIN_CUSTOMERS,
            got: metrics.len(),
        });
    }

    let k = MAX_SEGMENTS.min(metrics.len());
    debug!("clustering {} counterparties into {k} segments", metrics.len());

    let features = feature_matrix(&metrics);
    let clustering = kmeans(
        &features,
        &KMeansConfig::default()
            .k(k)
            .n_init(config.restarts)
            .seed(config.seed),
    );

    let names = segment_names(config.naming, k, &metrics, &clustering.labels);

    let rfm_records: Vec<RfmRecord> = metrics
        .into_iter()
        .zip(&clustering.labels)
        .map(|(m, &label)| RfmRecord {
            counterparty: m.counterparty,
            recency_days: m.recency_days,
            frequency: m.frequency,
            monetary: m.monetary,
            segment: label,
            segment_name: names[label].clone(),
        })
        .collect();

    let mut stats = Vec::new();
    for cluster in 0..k {
        let members: Vec<&RfmRecord> = rfm_records
            .iter()
            .filter(|r| r.segment == cluster)
            .collect();
        if members.is_empty() {
            continue;
        }

        let recencies: Vec<f64> = members.iter().map(|r| r.recency_days as f64).collect();
        let frequencies: Vec<f64> = members.iter().map(|r| r.frequency as f64).collect();
        let monetaries: Vec<f64> = members.iter().map(|r| r.monetary).collect();

        stats.push(SegmentStats {
            name: names[cluster].clone(),
            mean_recency: mean(&recencies),
            mean_frequency: mean(&frequencies),
            mean_monetary: mean(&monetaries),
            members: members.len(),
        });
    }

    Ok(Segmentation {
        records: rfm_records,
        stats,
        centers: clustering.centroids,
    })
}

/// Resolve the name of each cluster id under the given policy.
fn segment_names(
    naming: SegmentNaming,
    k: usize,
    metrics: &[RfmMetrics],
    labels: &[usize],
) -> Vec<String> {
    match naming {
        SegmentNaming::Positional => (0..k).map(|id| SEGMENT_NAMES[id].to_string()).collect(),
        SegmentNaming::RankedByMonetary => {
            let mut cluster_monetary: Vec<(usize, f64)> = (0..k)
                .map(|cluster| {
                    let values: Vec<f64> = metrics
                        .iter()
                        .zip(labels)
                        .filter(|(_, &l)| l == cluster)
                        .map(|(m, _)| m.monetary)
                        .collect();
                    let m = if values.is_empty() {
                        f64::NEG_INFINITY
                    } else {
                        mean(&values)
                    };
                    (cluster, m)
                })
                .collect();

            cluster_monetary
                .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            let mut names = vec![String::new(); k];
            for (rank, (cluster, _)) in cluster_monetary.into_iter().enumerate() {
                names[cluster] = SEGMENT_NAMES[rank].to_string();
            }
            names
        }
    }
}
