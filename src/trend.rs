//! Product/ledger movement classification via quantile thresholds.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::TransactionRecord;
use crate::utils::quantile;

/// Quantile at which the velocity and frequency thresholds are cut.
pub const MOVEMENT_QUANTILE: f64 = 0.7;

/// Movement category of an item.
///
/// The four categories are mutually exclusive and exhaustive over the
/// classified items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementCategory {
    /// High velocity and high frequency.
    FastMover,
    /// High velocity only.
    HighValue,
    /// High frequency only.
    FrequentSeller,
    /// Neither threshold reached.
    SlowMover,
}

impl MovementCategory {
    /// Display name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementCategory::FastMover => "Fast Mover",
            MovementCategory::HighValue => "High Value",
            MovementCategory::FrequentSeller => "Frequent Seller",
            MovementCategory::SlowMover => "Slow Mover",
        }
    }
}

impl fmt::Display for MovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why classification could not run on a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailableReason {
    /// The batch was empty.
    NoRecords,
    /// No record in the batch carried an item identifier.
    MissingItemIds,
}

/// Aggregated metrics and category for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTrendRecord {
    /// Item (product or ledger) identifier.
    pub item_id: String,
    /// Sum of transaction amounts.
    pub total_amount: f64,
    /// Number of transactions.
    pub transaction_count: usize,
    /// Average amount per transaction.
    pub velocity: f64,
    /// Assigned movement category.
    pub category: MovementCategory,
}

/// Classified items plus the thresholds that produced the categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// One record per distinct item id, in lexicographic order.
    pub records: Vec<EntityTrendRecord>,
    /// 70th-percentile velocity across the batch.
    pub velocity_threshold: f64,
    /// 70th-percentile transaction count across the batch.
    pub frequency_threshold: f64,
}

impl TrendReport {
    /// Records in a specific category.
    pub fn in_category(&self, category: MovementCategory) -> Vec<&EntityTrendRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Fast movers: high velocity and high frequency.
    pub fn fast_movers(&self) -> Vec<&EntityTrendRecord> {
        self.in_category(MovementCategory::FastMover)
    }

    /// Slow movers: below both thresholds.
    pub fn slow_movers(&self) -> Vec<&EntityTrendRecord> {
        self.in_category(MovementCategory::SlowMover)
    }
}

/// Outcome of a classification call.
///
/// A batch without usable item identifiers is a soft
/// [`TrendAnalysis::Unavailable`] outcome rather than an error, so
/// callers can fall back to a coarser grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrendAnalysis {
    /// Items were classified.
    Classified(TrendReport),
    /// Classification could not run on this batch.
    Unavailable(UnavailableReason),
}

/// Classify items into movement categories.
///
/// Thresholds are the 70th percentiles of per-item velocity and
/// transaction count, recomputed from the supplied batch on every call.
/// Records without an item id are skipped; if none carry one, the
/// result is [`TrendAnalysis::Unavailable`].
pub fn classify_movement(records: &[TransactionRecord]) -> TrendAnalysis {
    if records.is_empty() {
        return TrendAnalysis::Unavailable(UnavailableReason::NoRecords);
    }

    let mut per_item: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        if let Some(item_id) = record.item_id.as_deref() {
            let entry = per_item.entry(item_id).or_insert((0.0, 0));
            entry.0 += record.amount;
            entry.1 += 1;
        }
    }

    if per_item.is_empty() {
        return TrendAnalysis::Unavailable(UnavailableReason::MissingItemIds);
    }

    let aggregates: Vec<(&str, f64, usize, f64)> = per_item
        .into_iter()
        .map(|(item_id, (total, count))| (item_id, total, count, total / count as f64))
        .collect();

    let velocities: Vec<f64> = aggregates.iter().map(|a| a.3).collect();
    let counts: Vec<f64> = aggregates.iter().map(|a| a.2 as f64).collect();
    let velocity_threshold = quantile(&velocities, MOVEMENT_QUANTILE);
    let frequency_threshold = quantile(&counts, MOVEMENT_QUANTILE);

    let records = aggregates
        .into_iter()
        .map(|(item_id, total_amount, transaction_count, velocity)| {
            let fast = velocity >= velocity_threshold;
            let frequent = transaction_count as f64 >= frequency_threshold;
            let category = match (fast, frequent) {
                (true, true) => MovementCategory::FastMover,
                (true, false) => MovementCategory::HighValue,
                (false, true) => MovementCategory::FrequentSeller,
                (false, false) => MovementCategory::SlowMover,
            };

            EntityTrendRecord {
                item_id: item_id.to_string(),
                total_amount,
                transaction_count,
                velocity,
                category,
            }
        })
        .collect();

    TrendAnalysis::Classified(TrendReport {
        records,
        velocity_threshold,
        frequency_threshold,
    })
}
