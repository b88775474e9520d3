// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Trial,
    Plus,
    Prime,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Trial => "trial",
            Plan::Plus => "plus",
            Plan::Prime => "prime",
        }
    }

    pub fn parse(s: &str) -> Option<Plan> {
        match s {
            "free" => Some(Plan::Free),
            "trial" => Some(Plan::Trial),
            "plus" => Some(Plan::Plus),
            "prime" => Some(Plan::Prime),
            _ => None,
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, Plan::Plus | Plan::Prime)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Income => "income",
            TxnKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<TxnKind> {
        match s {
            "income" => Some(TxnKind::Income),
            "expense" => Some(TxnKind::Expense),
            _ => None,
        }
    }

    /// Sign convention: income amounts are >= 0, expense amounts are <= 0.
    pub fn sign_ok(&self, amount: Decimal) -> bool {
        match self {
            TxnKind::Income => amount >= Decimal::ZERO,
            TxnKind::Expense => amount <= Decimal::ZERO,
        }
    }
}

impl std::fmt::Display for TxnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i64,
    #[serde(rename = "ownerId")]
    pub user_id: i64,
    pub name: String,
    pub tag: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    pub id: i64,
    #[serde(rename = "ownerId")]
    pub user_id: i64,
    pub name: String,
    pub tag: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "ownerId")]
    pub user_id: i64,
    pub title: String,
    pub category: Option<String>,
    pub kind: TxnKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// None when the stored transaction date was absent or unparseable.
    #[serde(rename = "occurredOn")]
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Date used for period filtering: the transaction date, falling back to
    /// the creation date when the transaction date is unusable.
    pub fn effective_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.created_at.date_naive())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub plan: Plan,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub trial_expires_at: Option<DateTime<Utc>>,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub ai_quota: i64,
    pub ai_quota_remaining: i64,
}
