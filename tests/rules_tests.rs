// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use finmind::advisor::metrics::MetricsSnapshot;
use finmind::advisor::rules::{self, Severity};
use rust_decimal::Decimal;

// a snapshot no rule fires on
fn healthy() -> MetricsSnapshot {
    MetricsSnapshot {
        asset_total: Decimal::from(10_000),
        liability_total: Decimal::ZERO,
        net_worth: Decimal::from(10_000),
        debt_to_asset_ratio: Some(Decimal::ZERO),
        total_income: Decimal::from(5_000),
        total_expense: Decimal::from(1_000),
        savings_amount: Decimal::from(4_000),
        savings_rate: Some(Decimal::new(8, 1)),
        expense_by_category: BTreeMap::new(),
        average_daily_expense: Decimal::from(1_000) / Decimal::from(30),
        monthly_burn: Decimal::from(1_000),
        transaction_count: 3,
    }
}

fn ids(m: &MetricsSnapshot) -> Vec<String> {
    rules::evaluate(m).into_iter().map(|f| f.id).collect()
}

#[test]
fn healthy_snapshot_fires_nothing() {
    assert!(rules::evaluate(&healthy()).is_empty());
}

#[test]
fn debt_ratio_bands_are_mutually_exclusive() {
    let mut m = healthy();

    m.debt_to_asset_ratio = Some(Decimal::new(5, 1)); // 0.5: healthy
    assert!(ids(&m).is_empty());

    m.debt_to_asset_ratio = Some(Decimal::new(55, 2)); // 0.55: warning band
    assert_eq!(ids(&m), vec!["debt-ratio-warning"]);

    m.debt_to_asset_ratio = Some(Decimal::new(9, 1)); // 0.9: critical only
    assert_eq!(ids(&m), vec!["debt-ratio-critical"]);

    m.debt_to_asset_ratio = Some(Decimal::new(12, 1)); // 1.2
    assert_eq!(ids(&m), vec!["debt-ratio-critical"]);

    m.debt_to_asset_ratio = None;
    assert!(ids(&m).is_empty());
}

#[test]
fn no_assets_with_debt_is_critical() {
    let mut m = healthy();
    m.asset_total = Decimal::ZERO;
    m.net_worth = Decimal::from(-1_000);
    m.liability_total = Decimal::from(1_000);
    m.debt_to_asset_ratio = None;

    let findings = rules::evaluate(&m);
    assert_eq!(findings[0].id, "no-assets");
    assert_eq!(findings[0].severity, Severity::Critical);
}

#[test]
fn savings_rules_can_co_fire() {
    let mut m = healthy();

    m.savings_rate = Some(Decimal::new(1, 1)); // exactly 0.1: healthy
    assert!(ids(&m).is_empty());

    m.savings_rate = Some(Decimal::new(9, 2)); // 0.09
    assert_eq!(ids(&m), vec!["low-savings-rate"]);

    m.savings_rate = Some(Decimal::new(-2, 1)); // -0.2 fires both, in order
    assert_eq!(ids(&m), vec!["low-savings-rate", "negative-savings"]);
}

#[test]
fn expense_over_income_needs_income() {
    let mut m = healthy();
    m.total_income = Decimal::ZERO;
    m.total_expense = Decimal::from(400);
    m.savings_amount = Decimal::from(-400);
    m.savings_rate = None;
    assert!(!ids(&m).contains(&"expense-over-income".to_string()));

    m.total_income = Decimal::from(300);
    m.savings_rate = Some(Decimal::from(-1));
    assert!(ids(&m).contains(&"expense-over-income".to_string()));
}

#[test]
fn short_runway_under_three_months() {
    let mut m = healthy();
    m.net_worth = Decimal::from(2_000);
    m.monthly_burn = Decimal::from(1_000);
    let findings = rules::evaluate(&m);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].id, "short-runway");
    assert!(findings[0].message.contains("2"));

    m.monthly_burn = Decimal::ZERO;
    assert!(ids(&m).is_empty());

    m.net_worth = Decimal::ZERO;
    m.monthly_burn = Decimal::from(1_000);
    assert!(ids(&m).is_empty());
}

#[test]
fn concentration_names_the_dominant_category() {
    let mut m = healthy();
    m.expense_by_category = BTreeMap::from([
        ("Dining".to_string(), Decimal::from(320)),
        ("Debt".to_string(), Decimal::from(420)),
        ("Living".to_string(), Decimal::from(180)),
    ]);
    let findings = rules::evaluate(&m);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].id, "expense-concentration");
    assert_eq!(findings[0].severity, Severity::Info);
    assert!(findings[0].message.contains("Debt"));
    assert!(findings[0].message.contains('%'));
}

#[test]
fn concentration_tie_break_is_stable() {
    let mut m = healthy();
    m.expense_by_category = BTreeMap::from([
        ("Travel".to_string(), Decimal::from(500)),
        ("Dining".to_string(), Decimal::from(500)),
    ]);
    for _ in 0..3 {
        let findings = rules::evaluate(&m);
        assert!(findings[0].message.contains("Dining"));
    }
}

#[test]
fn concentration_needs_a_strict_majority_share() {
    let mut m = healthy();
    m.expense_by_category = BTreeMap::from([
        ("A".to_string(), Decimal::from(40)),
        ("B".to_string(), Decimal::from(30)),
        ("C".to_string(), Decimal::from(30)),
    ]);
    // 40% exactly does not fire
    assert!(ids(&m).is_empty());
}

#[test]
fn stressed_scenario_fires_catalog_subset_in_order() {
    let m = MetricsSnapshot {
        asset_total: Decimal::from(40_000),
        liability_total: Decimal::from(36_000),
        net_worth: Decimal::from(4_000),
        debt_to_asset_ratio: Some(Decimal::new(9, 1)),
        total_income: Decimal::from(3_000),
        total_expense: Decimal::from(4_000),
        savings_amount: Decimal::from(-1_000),
        savings_rate: Some(Decimal::new(-33, 2)),
        expense_by_category: BTreeMap::from([
            ("Debt".to_string(), Decimal::from(2_500)),
            ("Living".to_string(), Decimal::from(1_500)),
        ]),
        average_daily_expense: Decimal::from(4_000) / Decimal::from(30),
        monthly_burn: Decimal::from(4_000),
        transaction_count: 6,
    };
    let got = ids(&m);
    for expected in [
        "debt-ratio-critical",
        "negative-savings",
        "expense-over-income",
        "expense-concentration",
    ] {
        assert!(got.contains(&expected.to_string()), "missing {}", expected);
    }
    // declaration order is preserved
    let pos = |id: &str| got.iter().position(|g| g == id).unwrap();
    assert!(pos("debt-ratio-critical") < pos("low-savings-rate"));
    assert!(pos("low-savings-rate") < pos("negative-savings"));
    assert!(pos("negative-savings") < pos("expense-over-income"));
    assert!(pos("expense-over-income") < pos("expense-concentration"));
}
