//! End-to-end tests driving each operation from raw transaction batches.

use chrono::{Duration, NaiveDate};
use ledger_analytics::core::{DailySeries, TransactionRecord};
use ledger_analytics::error::AnalyticsError;
use ledger_analytics::forecast::SalesForecaster;
use ledger_analytics::kpi::{calculate_kpis, InventoryRow, OutstandingRow};
use ledger_analytics::seasonal::seasonal_patterns;
use ledger_analytics::segmentation::{segment_customers, SegmentationConfig};
use ledger_analytics::trend::{classify_movement, MovementCategory, TrendAnalysis};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two weeks of daily sales, one voucher per day.
fn fortnight_batch() -> Vec<TransactionRecord> {
    let totals = [
        100.0, 120.0, 90.0, 110.0, 130.0, 95.0, 105.0, 115.0, 125.0, 98.0, 108.0, 118.0, 128.0,
        102.0,
    ];
    totals
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            TransactionRecord::new(
                date(2024, 1, 1) + Duration::days(i as i64),
                amount,
                format!("Customer {}", i % 4),
                format!("V-{i:03}"),
            )
            .with_item(format!("Item {}", i % 3))
        })
        .collect()
}

#[test]
fn forecast_continues_the_calendar_for_the_full_horizon() {
    let series = DailySeries::from_records(&fortnight_batch());

    let result = SalesForecaster::new().forecast(&series, 7).unwrap();

    assert_eq!(result.horizon(), 7);
    // Day 15 onwards, one day at a time.
    assert_eq!(result.dates[0], date(2024, 1, 15));
    assert_eq!(result.dates[6], date(2024, 1, 21));
    for window in result.dates.windows(2) {
        assert_eq!(window[1] - window[0], Duration::days(1));
    }
    for i in 0..7 {
        assert!(result.lower[i] <= result.point[i]);
        assert!(result.point[i] <= result.upper[i]);
    }
}

#[test]
fn forecast_rejects_five_distinct_dates() {
    let records: Vec<TransactionRecord> = (0..5)
        .map(|i| {
            TransactionRecord::new(
                date(2024, 1, 1) + Duration::days(i),
                50.0,
                "Acme",
                format!("V-{i}"),
            )
        })
        .collect();
    let series = DailySeries::from_records(&records);

    let result = SalesForecaster::new().forecast(&series, 7);

    assert_eq!(
        result,
        Err(AnalyticsError::InsufficientHistory { needed: 7, got: 5 })
    );
}

#[test]
fn duplicate_dates_count_once_toward_history() {
    // Ten records, but only five distinct dates.
    let records: Vec<TransactionRecord> = (0..10)
        .map(|i| {
            TransactionRecord::new(
                date(2024, 1, 1) + Duration::days(i % 5),
                50.0,
                "Acme",
                format!("V-{i}"),
            )
        })
        .collect();
    let series = DailySeries::from_records(&records);

    let result = SalesForecaster::new().forecast(&series, 7);

    assert!(matches!(
        result,
        Err(AnalyticsError::InsufficientHistory { got: 5, .. })
    ));
}

#[test]
fn segmentation_rejects_two_counterparties() {
    let records = vec![
        TransactionRecord::new(date(2024, 1, 1), 100.0, "Acme", "V-1"),
        TransactionRecord::new(date(2024, 1, 3), 40.0, "Birch", "V-2"),
        TransactionRecord::new(date(2024, 1, 5), 60.0, "Acme", "V-3"),
    ];

    let result = segment_customers(&records, &SegmentationConfig::default());

    assert_eq!(
        result,
        Err(AnalyticsError::InsufficientCustomers { needed: 3, got: 2 })
    );
}

#[test]
fn segmentation_covers_every_counterparty_exactly_once() {
    let segmentation =
        segment_customers(&fortnight_batch(), &SegmentationConfig::default()).unwrap();

    assert_eq!(segmentation.records.len(), 4);
    let members: usize = segmentation.stats.iter().map(|s| s.members).sum();
    assert_eq!(members, 4);
}

#[test]
fn trend_extremes_classify_as_fast_and_slow() {
    let mut records = Vec::new();
    // Entity A: velocity 1000, frequency 50.
    for i in 0..50 {
        records.push(
            TransactionRecord::new(
                date(2024, 1, 1) + Duration::days(i % 30),
                1000.0,
                "Acme",
                format!("A-{i}"),
            )
            .with_item("A"),
        );
    }
    // Entity B: velocity 10, frequency 1.
    records.push(TransactionRecord::new(date(2024, 1, 2), 10.0, "Acme", "B-0").with_item("B"));
    // Filler entities to shape the 70th-percentile thresholds.
    for (item, amount, count) in [("C", 400.0, 10), ("D", 200.0, 15), ("E", 30.0, 2)] {
        for i in 0..count {
            records.push(
                TransactionRecord::new(
                    date(2024, 1, 1) + Duration::days(i),
                    amount,
                    "Acme",
                    format!("{item}-{i}"),
                )
                .with_item(item),
            );
        }
    }

    let TrendAnalysis::Classified(report) = classify_movement(&records) else {
        panic!("expected classification");
    };

    let a = report.records.iter().find(|r| r.item_id == "A").unwrap();
    let b = report.records.iter().find(|r| r.item_id == "B").unwrap();
    assert_eq!(a.category, MovementCategory::FastMover);
    assert_eq!(b.category, MovementCategory::SlowMover);
}

#[test]
fn trend_is_unavailable_without_item_ids() {
    let records = vec![
        TransactionRecord::new(date(2024, 1, 1), 100.0, "Acme", "V-1"),
        TransactionRecord::new(date(2024, 1, 2), 200.0, "Birch", "V-2"),
    ];

    assert!(matches!(
        classify_movement(&records),
        TrendAnalysis::Unavailable(_)
    ));
}

#[test]
fn seasonal_totals_conserve_mass() {
    let batch = fortnight_batch();
    let summary = seasonal_patterns(&batch);
    let total: f64 = batch.iter().map(|r| r.amount).sum();

    let monthly: f64 = summary.monthly_totals.iter().sum();
    let weekday: f64 = summary.weekday_totals.iter().sum();
    let quarterly: f64 = summary.quarterly_totals.iter().sum();

    assert!((monthly - total).abs() < 1e-9);
    assert!((weekday - total).abs() < 1e-9);
    assert!((quarterly - total).abs() < 1e-9);
}

#[test]
fn kpis_from_sales_only() {
    let kpis = calculate_kpis(&fortnight_batch(), &[], &[]);

    assert!(kpis.contains_key("total_sales"));
    assert!(kpis.contains_key("avg_transaction_value"));
    assert!(kpis.contains_key("sales_count"));
    assert_eq!(kpis.len(), 3);
}

#[test]
fn kpis_absent_sources_have_absent_keys() {
    let inventory = vec![InventoryRow {
        item: "Widget".to_string(),
        closing_value: 100.0,
        closing_balance: 5.0,
        reorder_level: 10.0,
    }];

    let kpis = calculate_kpis(&[], &inventory, &[]);

    assert!(!kpis.contains_key("total_sales"));
    assert!(!kpis.contains_key("total_receivables"));
    assert!(kpis.contains_key("total_inventory_value"));
}

#[test]
fn kpis_with_all_sources() {
    let inventory = vec![InventoryRow {
        item: "Widget".to_string(),
        closing_value: 100.0,
        closing_balance: 5.0,
        reorder_level: 10.0,
    }];
    let outstanding = vec![OutstandingRow {
        party: "Acme".to_string(),
        closing_balance: 450.0,
    }];

    let kpis = calculate_kpis(&fortnight_batch(), &inventory, &outstanding);

    assert_eq!(kpis.len(), 8);
    assert_eq!(kpis["overdue_customers"], 1.0);
}

#[test]
fn operations_are_deterministic_end_to_end() {
    let batch = fortnight_batch();
    let series = DailySeries::from_records(&batch);

    let forecast_a = SalesForecaster::new().forecast(&series, 10).unwrap();
    let forecast_b = SalesForecaster::new().forecast(&series, 10).unwrap();
    assert_eq!(forecast_a, forecast_b);

    let seg_a = segment_customers(&batch, &SegmentationConfig::default()).unwrap();
    let seg_b = segment_customers(&batch, &SegmentationConfig::default()).unwrap();
    assert_eq!(seg_a, seg_b);

    assert_eq!(classify_movement(&batch), classify_movement(&batch));
}
