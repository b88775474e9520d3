// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};

use crate::advisor::period;
use crate::models::{Asset, Liability, Transaction, TxnKind};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Point-in-time balances over the full asset/liability sets plus flow metrics
/// over the period-filtered transactions. Balances are deliberately not
/// filtered by the period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(with = "rust_decimal::serde::float")]
    pub asset_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub liability_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_worth: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub debt_to_asset_ratio: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub savings_rate: Option<Decimal>,
    #[serde(serialize_with = "decimal_map")]
    pub expense_by_category: BTreeMap<String, Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_daily_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_burn: Decimal,
    pub transaction_count: usize,
}

fn decimal_map<S: Serializer>(
    map: &BTreeMap<String, Decimal>,
    s: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    let mut out = s.serialize_map(Some(map.len()))?;
    for (k, v) in map {
        out.serialize_entry(k, &v.to_f64().unwrap_or_default())?;
    }
    out.end()
}

pub fn aggregate(
    assets: &[Asset],
    liabilities: &[Liability],
    txns: &[Transaction],
    period_token: &str,
    now: DateTime<Utc>,
) -> MetricsSnapshot {
    let window = period::resolve(period_token, now);

    let asset_total: Decimal = assets.iter().map(|a| a.value).sum();
    let liability_total: Decimal = liabilities.iter().map(|l| l.value).sum();
    let net_worth = asset_total - liability_total;
    let debt_to_asset_ratio =
        (asset_total > Decimal::ZERO).then(|| liability_total / asset_total);

    let from_day = window.from.map(|f| f.date_naive());
    let to_day = window.to.date_naive();

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut transaction_count = 0usize;

    for txn in txns {
        let day = txn.effective_date();
        if from_day.is_some_and(|f| day < f) || day > to_day {
            continue;
        }
        transaction_count += 1;
        let magnitude = txn.amount.abs();
        match txn.kind {
            TxnKind::Income => total_income += magnitude,
            TxnKind::Expense => {
                total_expense += magnitude;
                let bucket = txn
                    .category
                    .clone()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                *expense_by_category.entry(bucket).or_insert(Decimal::ZERO) += magnitude;
            }
        }
    }

    let savings_amount = total_income - total_expense;
    let savings_rate = (total_income > Decimal::ZERO).then(|| savings_amount / total_income);
    let average_daily_expense = total_expense / Decimal::from(window.days);
    let monthly_burn = average_daily_expense * Decimal::from(30);

    MetricsSnapshot {
        asset_total,
        liability_total,
        net_worth,
        debt_to_asset_ratio,
        total_income,
        total_expense,
        savings_amount,
        savings_rate,
        expense_by_category,
        average_daily_expense,
        monthly_burn,
        transaction_count,
    }
}
