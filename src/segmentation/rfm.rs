//! Recency/Frequency/Monetary metrics per counterparty.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::TransactionRecord;
use crate::utils::{mean, std_dev};

/// Raw RFM metrics for one counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmMetrics {
    /// Counterparty name.
    pub counterparty: String,
    /// Days since the counterparty's last transaction, relative to the
    /// latest date in the batch. Smaller is better.
    pub recency_days: i64,
    /// Number of distinct voucher ids.
    pub frequency: usize,
    /// Sum of transaction amounts.
    pub monetary: f64,
}

/// Compute RFM metrics for every distinct counterparty in the batch.
///
/// Counterparties are returned in lexicographic order, so the output is
/// deterministic regardless of input order. An empty batch yields an
/// empty vector.
pub fn compute_rfm(records: &[TransactionRecord]) -> Vec<RfmMetrics> {
    let Some(latest) = records.iter().map(|r| r.date).max() else {
        return Vec::new();
    };

    let mut per_party: BTreeMap<&str, (chrono::NaiveDate, BTreeSet<&str>, f64)> = BTreeMap::new();
    for record in records {
        let entry = per_party
            .entry(record.counterparty.as_str())
            .or_insert((record.date, BTreeSet::new(), 0.0));
        entry.0 = entry.0.max(record.date);
        entry.1.insert(record.voucher_id.as_str());
        entry.2 += record.amount;
    }

    per_party
        .into_iter()
        .map(|(counterparty, (last_date, vouchers, monetary))| RfmMetrics {
            counterparty: counterparty.to_string(),
            recency_days: (latest - last_date).num_days(),
            frequency: vouchers.len(),
            monetary,
        })
        .collect()
}

/// Build the standardized feature matrix the clustering step consumes.
///
/// Recency is inverted as `1 / (recency + 1)` so that larger is better
/// in every dimension, then each of the three columns is standardized
/// to zero mean and unit variance. A zero-variance column maps to all
/// zeros.
pub fn feature_matrix(metrics: &[RfmMetrics]) -> Vec<Vec<f64>> {
    if metrics.is_empty() {
        return Vec::new();
    }

    let columns = [
        metrics
            .iter()
            .map(|m| 1.0 / (m.recency_days as f64 + 1.0))
            .collect::<Vec<f64>>(),
        metrics.iter().map(|m| m.frequency as f64).collect(),
        metrics.iter().map(|m| m.monetary).collect(),
    ];

    let standardized: Vec<Vec<f64>> = columns.iter().map(|col| standardize(col)).collect();

    (0..metrics.len())
        .map(|row| standardized.iter().map(|col| col[row]).collect())
        .collect()
}

fn standardize(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let s = std_dev(values);
    if s == 0.0 || !s.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - m) / s).collect()
}
