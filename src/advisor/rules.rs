// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::advisor::metrics::MetricsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleFinding {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub tags: Vec<String>,
}

struct Rule {
    id: &'static str,
    severity: Severity,
    title: &'static str,
    tags: &'static [&'static str],
    check: fn(&MetricsSnapshot) -> Option<String>,
}

// Catalog order is the output order; never reorder entries.
const CATALOG: &[Rule] = &[
    Rule {
        id: "no-assets",
        severity: Severity::Critical,
        title: "No asset coverage",
        tags: &["assets", "debt"],
        check: no_assets,
    },
    Rule {
        id: "debt-ratio-critical",
        severity: Severity::Critical,
        title: "Debt ratio critical",
        tags: &["debt"],
        check: debt_ratio_critical,
    },
    Rule {
        id: "debt-ratio-warning",
        severity: Severity::Warning,
        title: "Debt ratio elevated",
        tags: &["debt"],
        check: debt_ratio_warning,
    },
    Rule {
        id: "low-savings-rate",
        severity: Severity::Warning,
        title: "Low savings rate",
        tags: &["savings"],
        check: low_savings_rate,
    },
    Rule {
        id: "negative-savings",
        severity: Severity::Critical,
        title: "Spending exceeds income",
        tags: &["savings"],
        check: negative_savings,
    },
    Rule {
        id: "expense-over-income",
        severity: Severity::Warning,
        title: "Expenses above income",
        tags: &["spending"],
        check: expense_over_income,
    },
    Rule {
        id: "short-runway",
        severity: Severity::Warning,
        title: "Short runway",
        tags: &["runway"],
        check: short_runway,
    },
    Rule {
        id: "expense-concentration",
        severity: Severity::Info,
        title: "Spending concentrated",
        tags: &["spending"],
        check: expense_concentration,
    },
];

pub fn evaluate(metrics: &MetricsSnapshot) -> Vec<RuleFinding> {
    CATALOG
        .iter()
        .filter_map(|rule| {
            (rule.check)(metrics).map(|message| RuleFinding {
                id: rule.id.to_string(),
                severity: rule.severity,
                title: rule.title.to_string(),
                message,
                tags: rule.tags.iter().map(|t| t.to_string()).collect(),
            })
        })
        .collect()
}

fn pct(ratio: Decimal) -> Decimal {
    (ratio * Decimal::from(100)).round()
}

fn no_assets(m: &MetricsSnapshot) -> Option<String> {
    (m.asset_total.is_zero() && m.liability_total > Decimal::ZERO).then(|| {
        "You have liabilities recorded but no assets; nothing covers your debt.".to_string()
    })
}

fn debt_ratio_critical(m: &MetricsSnapshot) -> Option<String> {
    let ratio = m.debt_to_asset_ratio?;
    (ratio >= Decimal::new(9, 1))
        .then(|| format!("Liabilities are {}% of your assets.", pct(ratio)))
}

// Only the highest-severity band fires; 0.5 itself is healthy, 0.9 is critical.
fn debt_ratio_warning(m: &MetricsSnapshot) -> Option<String> {
    let ratio = m.debt_to_asset_ratio?;
    (ratio > Decimal::new(5, 1) && ratio < Decimal::new(9, 1))
        .then(|| format!("Liabilities are {}% of your assets.", pct(ratio)))
}

fn low_savings_rate(m: &MetricsSnapshot) -> Option<String> {
    let rate = m.savings_rate?;
    (rate < Decimal::new(1, 1))
        .then(|| format!("You kept {}% of your income this period.", pct(rate)))
}

fn negative_savings(m: &MetricsSnapshot) -> Option<String> {
    let rate = m.savings_rate?;
    (rate < Decimal::ZERO).then(|| "You spent more than you earned this period.".to_string())
}

fn expense_over_income(m: &MetricsSnapshot) -> Option<String> {
    (m.total_expense > m.total_income && m.total_income > Decimal::ZERO).then(|| {
        format!(
            "Expenses ({}) exceed income ({}) this period.",
            m.total_expense.round_dp(2),
            m.total_income.round_dp(2)
        )
    })
}

fn short_runway(m: &MetricsSnapshot) -> Option<String> {
    if m.net_worth <= Decimal::ZERO || m.monthly_burn <= Decimal::ZERO {
        return None;
    }
    let months = m.net_worth / m.monthly_burn;
    (months < Decimal::from(3)).then(|| {
        format!(
            "Net worth covers about {} months of current spending.",
            months.round_dp(1)
        )
    })
}

// Ties resolve to the lexicographically first category: the map iterates in
// key order and only a strictly larger total displaces the leader.
fn expense_concentration(m: &MetricsSnapshot) -> Option<String> {
    let total: Decimal = m.expense_by_category.values().copied().sum();
    if total <= Decimal::ZERO {
        return None;
    }
    let (top_category, top_amount) = m
        .expense_by_category
        .iter()
        .fold(None::<(&String, Decimal)>, |best, (cat, amt)| match best {
            Some((_, lead)) if *amt <= lead => best,
            _ => Some((cat, *amt)),
        })?;
    let share = top_amount / total;
    (share > Decimal::new(4, 1)).then(|| {
        format!(
            "{} accounts for {}% of spending this period.",
            top_category,
            pct(share)
        )
    })
}
