//! Property-based tests for the analytics engine.
//!
//! These verify invariants that should hold for all valid inputs, using
//! randomly generated transaction batches.

use chrono::{Duration, NaiveDate};
use ledger_analytics::core::{DailySeries, TransactionRecord};
use ledger_analytics::error::AnalyticsError;
use ledger_analytics::forecast::SalesForecaster;
use ledger_analytics::kpi::calculate_kpis;
use ledger_analytics::seasonal::seasonal_patterns;
use ledger_analytics::segmentation::{segment_customers, SegmentationConfig};
use ledger_analytics::trend::{classify_movement, MovementCategory, TrendAnalysis};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// One record per day with the given totals.
fn daily_series(totals: &[f64]) -> DailySeries {
    let records: Vec<TransactionRecord> = totals
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            TransactionRecord::new(
                base_date() + Duration::days(i as i64),
                amount,
                "Acme",
                format!("V-{i}"),
            )
        })
        .collect();
    DailySeries::from_records(&records)
}

/// Strategy for valid daily totals.
fn totals_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..10_000.0_f64, min_len..max_len)
}

/// Strategy for a batch of records spread over counterparties and days.
///
/// A seed record per counterparty guarantees the requested number of
/// distinct counterparties actually appears.
fn batch_strategy(
    n_customers: std::ops::Range<usize>,
) -> impl Strategy<Value = Vec<TransactionRecord>> {
    n_customers.prop_flat_map(|customers| {
        prop::collection::vec(
            (0..customers, 0i64..120, 1.0..5_000.0_f64),
            customers..customers * 6,
        )
        .prop_map(move |rows| {
            let mut records: Vec<TransactionRecord> = rows
                .into_iter()
                .enumerate()
                .map(|(i, (customer, day, amount))| {
                    TransactionRecord::new(
                        base_date() + Duration::days(day),
                        amount,
                        format!("Customer {customer}"),
                        format!("V-{i}"),
                    )
                })
                .collect();
            for customer in 0..customers {
                records.push(TransactionRecord::new(
                    base_date(),
                    100.0,
                    format!("Customer {customer}"),
                    format!("Seed-{customer}"),
                ));
            }
            records
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn forecast_horizon_and_bounds_hold(
        totals in totals_strategy(7, 40),
        horizon in 1usize..20,
    ) {
        let series = daily_series(&totals);
        let result = SalesForecaster::new()
            .with_tree_count(10)
            .forecast(&series, horizon)
            .unwrap();

        prop_assert_eq!(result.horizon(), horizon);

        // Dates start the day after the last observation and are
        // contiguous.
        let last = series.last_date().unwrap();
        prop_assert_eq!(result.dates[0], last + Duration::days(1));
        for window in result.dates.windows(2) {
            prop_assert_eq!(window[1] - window[0], Duration::days(1));
        }

        for i in 0..horizon {
            prop_assert!(result.lower[i] <= result.point[i]);
            prop_assert!(result.point[i] <= result.upper[i]);
        }
    }

    #[test]
    fn short_history_always_errors(
        totals in totals_strategy(1, 7),
        horizon in 1usize..20,
    ) {
        let got = totals.len();
        let series = daily_series(&totals);
        let result = SalesForecaster::new().forecast(&series, horizon);

        prop_assert_eq!(
            result,
            Err(AnalyticsError::InsufficientHistory { needed: 7, got })
        );
    }

    #[test]
    fn segment_member_counts_sum_to_customer_count(
        batch in batch_strategy(3..12),
    ) {
        let segmentation =
            segment_customers(&batch, &SegmentationConfig::default()).unwrap();

        let distinct = segmentation.records.len();
        let members: usize = segmentation.stats.iter().map(|s| s.members).sum();
        prop_assert_eq!(members, distinct);

        for record in &segmentation.records {
            prop_assert!(record.segment < 4);
        }
    }

    #[test]
    fn movement_categories_partition_items(
        batch in batch_strategy(1..8),
    ) {
        // Tag every record with an item derived from its counterparty.
        let tagged: Vec<TransactionRecord> = batch
            .into_iter()
            .map(|r| {
                let item = format!("Item {}", r.counterparty);
                r.with_item(item)
            })
            .collect();

        let TrendAnalysis::Classified(report) = classify_movement(&tagged) else {
            return Err(TestCaseError::fail("expected classification"));
        };

        let buckets = [
            MovementCategory::FastMover,
            MovementCategory::HighValue,
            MovementCategory::FrequentSeller,
            MovementCategory::SlowMover,
        ];
        let total: usize = buckets
            .iter()
            .map(|&c| report.in_category(c).len())
            .sum();
        prop_assert_eq!(total, report.records.len());

        let mut ids: Vec<&str> =
            report.records.iter().map(|r| r.item_id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    #[test]
    fn seasonal_bucketings_conserve_mass(
        batch in batch_strategy(1..6),
    ) {
        let summary = seasonal_patterns(&batch);
        let total: f64 = batch.iter().map(|r| r.amount).sum();

        let monthly: f64 = summary.monthly_totals.iter().sum();
        let weekday: f64 = summary.weekday_totals.iter().sum();
        let quarterly: f64 = summary.quarterly_totals.iter().sum();

        let tolerance = 1e-6 * total.abs().max(1.0);
        prop_assert!((monthly - total).abs() < tolerance);
        prop_assert!((weekday - total).abs() < tolerance);
        prop_assert!((quarterly - total).abs() < tolerance);
    }

    #[test]
    fn kpi_keys_track_source_presence(
        batch in batch_strategy(1..6),
    ) {
        let kpis = calculate_kpis(&batch, &[], &[]);

        prop_assert!(kpis.contains_key("total_sales"));
        prop_assert!(kpis.contains_key("avg_transaction_value"));
        prop_assert!(kpis.contains_key("sales_count"));
        prop_assert!(!kpis.contains_key("total_inventory_value"));
        prop_assert!(!kpis.contains_key("total_receivables"));

        prop_assert_eq!(kpis["sales_count"], batch.len() as f64);
    }

    #[test]
    fn forecast_is_seed_deterministic(
        totals in totals_strategy(7, 25),
        seed in 0u64..1_000,
    ) {
        let series = daily_series(&totals);
        let forecaster = SalesForecaster::new().with_tree_count(10).with_seed(seed);

        let a = forecaster.forecast(&series, 5).unwrap();
        let b = forecaster.forecast(&series, 5).unwrap();
        prop_assert_eq!(a, b);
    }
}
