//! Key performance indicators combined from independent snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::TransactionRecord;
use crate::utils::mean;

/// One inventory line from the accounting system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    /// Item name.
    pub item: String,
    /// Value of the closing stock.
    pub closing_value: f64,
    /// Closing stock quantity.
    pub closing_balance: f64,
    /// Reorder threshold quantity.
    pub reorder_level: f64,
}

/// One outstanding-balance line from the accounting system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstandingRow {
    /// Party (customer) name.
    pub party: String,
    /// Outstanding closing balance; positive means receivable.
    pub closing_balance: f64,
}

/// Combine sales, inventory, and outstanding snapshots into named
/// scalar indicators.
///
/// An indicator's key is present only if its source snapshot was
/// non-empty; absent sources produce absent keys, never zeros.
pub fn calculate_kpis(
    sales: &[TransactionRecord],
    inventory: &[InventoryRow],
    outstanding: &[OutstandingRow],
) -> BTreeMap<String, f64> {
    let mut kpis = BTreeMap::new();

    if !sales.is_empty() {
        let amounts: Vec<f64> = sales.iter().map(|r| r.amount).collect();
        kpis.insert("total_sales".to_string(), amounts.iter().sum());
        kpis.insert("avg_transaction_value".to_string(), mean(&amounts));
        kpis.insert("sales_count".to_string(), sales.len() as f64);
    }

    if !inventory.is_empty() {
        kpis.insert(
            "total_inventory_value".to_string(),
            inventory.iter().map(|r| r.closing_value).sum(),
        );
        kpis.insert("inventory_items".to_string(), inventory.len() as f64);
        kpis.insert(
            "low_stock_items".to_string(),
            inventory
                .iter()
                .filter(|r| r.closing_balance <= r.reorder_level)
                .count() as f64,
        );
    }

    if !outstanding.is_empty() {
        kpis.insert(
            "total_receivables".to_string(),
            outstanding.iter().map(|r| r.closing_balance).sum(),
        );
        kpis.insert(
            "overdue_customers".to_string(),
            outstanding.iter().filter(|r| r.closing_balance > 0.0).count() as f64,
        );
    }

    kpis
}
