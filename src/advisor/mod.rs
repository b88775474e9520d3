// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod advice;
pub mod entitlement;
pub mod metrics;
pub mod period;
pub mod quota;
pub mod rules;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::advisor::advice::AdviceClient;
use crate::advisor::metrics::MetricsSnapshot;
use crate::advisor::rules::RuleFinding;
use crate::store::Store;

/// Upper bound on transactions pulled for one aggregation pass.
pub const TXN_FETCH_LIMIT: usize = 1000;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("an active plan is required")]
    PlanRequired,
    #[error("ai advice quota exhausted")]
    QuotaExhausted,
    #[error("account missing")]
    AccountMissing,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct Insights {
    pub period: String,
    pub lang: String,
    pub metrics: MetricsSnapshot,
    pub rules: Vec<RuleFinding>,
    pub llm_advice: Option<String>,
}

/// One insights request: normalize entitlement, gate, aggregate, evaluate,
/// settle quota, then best-effort advice. The advice call happens after the
/// quota settles; its failure can neither fail the response nor re-charge.
pub fn run(
    store: &dyn Store,
    advice: Option<&AdviceClient>,
    user_id: i64,
    period: &str,
    lang: &str,
    now: DateTime<Utc>,
) -> Result<Insights, AdvisorError> {
    let account = entitlement::normalize_on_access(store, user_id, now)?
        .ok_or(AdvisorError::AccountMissing)?;
    quota::authorize(&account, now)?;

    let assets = store.list_assets(user_id)?;
    let liabilities = store.list_liabilities(user_id)?;
    let txns = store.list_transactions(user_id, TXN_FETCH_LIMIT)?;

    let metrics = metrics::aggregate(&assets, &liabilities, &txns, period, now);
    let findings = rules::evaluate(&metrics);

    quota::settle(store, &account)?;

    let llm_advice = advice.and_then(|client| client.generate(&metrics, &findings, lang));

    Ok(Insights {
        period: period.to_string(),
        lang: lang.to_string(),
        metrics,
        rules: findings,
        llm_advice,
    })
}
