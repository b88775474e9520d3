// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use finmind::advisor::metrics::{self, UNCATEGORIZED};
use finmind::models::{Asset, Liability, Transaction, TxnKind};
use rust_decimal::Decimal;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
}

fn asset(id: i64, value: i64) -> Asset {
    Asset {
        id,
        user_id: 1,
        name: format!("asset-{}", id),
        tag: None,
        value: Decimal::from(value),
    }
}

fn liability(id: i64, value: i64) -> Liability {
    Liability {
        id,
        user_id: 1,
        name: format!("liability-{}", id),
        tag: None,
        value: Decimal::from(value),
    }
}

fn txn(
    id: i64,
    kind: TxnKind,
    amount: i64,
    category: Option<&str>,
    date: Option<NaiveDate>,
) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        title: format!("txn-{}", id),
        category: category.map(|c| c.to_string()),
        kind,
        amount: Decimal::from(amount),
        date,
        created_at: now(),
    }
}

#[test]
fn reference_scenario_last_30d() {
    let today = now().date_naive();
    let assets = vec![asset(1, 50_000), asset(2, 25_000)];
    let liabilities = vec![liability(1, 20_000)];
    let txns = vec![
        txn(1, TxnKind::Income, 5_000, Some("Salary"), Some(today)),
        txn(2, TxnKind::Income, 2_500, Some("Freelance"), Some(today)),
        txn(3, TxnKind::Expense, -1_800, Some("Rent"), Some(today)),
        txn(4, TxnKind::Expense, -700, Some("Food"), Some(today)),
    ];

    let m = metrics::aggregate(&assets, &liabilities, &txns, "last_30d", now());

    assert_eq!(m.asset_total, Decimal::from(75_000));
    assert_eq!(m.liability_total, Decimal::from(20_000));
    assert_eq!(m.net_worth, Decimal::from(55_000));
    assert_eq!(
        m.debt_to_asset_ratio.unwrap().round_dp(3),
        Decimal::new(267, 3)
    );
    assert_eq!(m.total_income, Decimal::from(7_500));
    assert_eq!(m.total_expense, Decimal::from(2_500));
    assert_eq!(m.savings_amount, Decimal::from(5_000));
    assert_eq!(m.savings_rate.unwrap().round_dp(3), Decimal::new(667, 3));
    assert_eq!(m.expense_by_category.len(), 2);
    assert_eq!(m.expense_by_category["Rent"], Decimal::from(1_800));
    assert_eq!(m.expense_by_category["Food"], Decimal::from(700));
    assert_eq!(m.transaction_count, 4);
    assert_eq!(
        m.average_daily_expense,
        Decimal::from(2_500) / Decimal::from(30)
    );
    assert_eq!(m.monthly_burn, m.average_daily_expense * Decimal::from(30));
}

#[test]
fn balances_ignore_the_period_but_flows_do_not() {
    let old = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
    let assets = vec![asset(1, 10_000)];
    let liabilities = vec![liability(1, 4_000)];
    let txns = vec![txn(1, TxnKind::Expense, -900, Some("Travel"), Some(old))];

    let m = metrics::aggregate(&assets, &liabilities, &txns, "last_30d", now());
    assert_eq!(m.asset_total, Decimal::from(10_000));
    assert_eq!(m.liability_total, Decimal::from(4_000));
    assert_eq!(m.total_expense, Decimal::ZERO);
    assert_eq!(m.transaction_count, 0);

    // an unrecognized token drops the lower bound entirely
    let m = metrics::aggregate(&assets, &liabilities, &txns, "all", now());
    assert_eq!(m.total_expense, Decimal::from(900));
    assert_eq!(m.transaction_count, 1);
    // per-day normalization still uses the 90-day fallback
    assert_eq!(
        m.average_daily_expense,
        Decimal::from(900) / Decimal::from(90)
    );
}

#[test]
fn dateless_transactions_fall_back_to_creation_date() {
    let m = metrics::aggregate(
        &[],
        &[],
        &[txn(1, TxnKind::Expense, -50, None, None)],
        "last_30d",
        now(),
    );
    assert_eq!(m.transaction_count, 1);
    assert_eq!(m.expense_by_category[UNCATEGORIZED], Decimal::from(50));
}

#[test]
fn ratios_are_null_safe() {
    let m = metrics::aggregate(&[], &[liability(1, 500)], &[], "last_30d", now());
    assert!(m.debt_to_asset_ratio.is_none());
    assert!(m.savings_rate.is_none());
    assert_eq!(m.net_worth, Decimal::from(-500));

    let m = metrics::aggregate(&[asset(1, 500)], &[], &[], "last_30d", now());
    assert_eq!(m.debt_to_asset_ratio, Some(Decimal::ZERO));
}

#[test]
fn category_totals_sum_to_total_expense() {
    let today = now().date_naive();
    let txns = vec![
        txn(1, TxnKind::Expense, -320, Some("Dining"), Some(today)),
        txn(2, TxnKind::Expense, -420, Some("Debt"), Some(today)),
        txn(3, TxnKind::Expense, -180, Some("Living"), Some(today)),
        txn(4, TxnKind::Expense, -80, None, Some(today)),
        txn(5, TxnKind::Expense, -20, Some("Dining"), Some(today)),
        txn(6, TxnKind::Income, 5_200, Some("Salary"), Some(today)),
    ];
    let m = metrics::aggregate(&[], &[], &txns, "last_90d", now());
    let sum: Decimal = m.expense_by_category.values().copied().sum();
    assert_eq!(sum, m.total_expense);
    assert_eq!(m.expense_by_category["Dining"], Decimal::from(340));
    assert_eq!(m.expense_by_category[UNCATEGORIZED], Decimal::from(80));
    assert_eq!(m.total_income, Decimal::from(5_200));
}

#[test]
fn savings_can_go_negative() {
    let today = now().date_naive();
    let txns = vec![
        txn(1, TxnKind::Income, 3_000, None, Some(today)),
        txn(2, TxnKind::Expense, -4_000, Some("Debt"), Some(today)),
    ];
    let m = metrics::aggregate(&[], &[], &txns, "last_30d", now());
    assert_eq!(m.savings_amount, Decimal::from(-1_000));
    assert!(m.savings_rate.unwrap() < Decimal::ZERO);
}
