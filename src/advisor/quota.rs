// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};

use crate::advisor::entitlement;
use crate::advisor::AdvisorError;
use crate::models::{Account, Plan};
use crate::store::Store;

/// Gate an insights request on a normalized entitlement. Trial and prime are
/// unmetered; plus is checked against its remaining allotment.
pub fn authorize(account: &Account, now: DateTime<Utc>) -> Result<(), AdvisorError> {
    if !entitlement::is_premium(account, now) {
        return Err(AdvisorError::PlanRequired);
    }
    if account.plan == Plan::Plus && account.ai_quota_remaining <= 0 {
        return Err(AdvisorError::QuotaExhausted);
    }
    Ok(())
}

/// Consume one credit once the request is committed to being served. The
/// decrement is a single conditional update in the store, so a concurrent
/// request can never drive the balance below zero.
pub fn settle(store: &dyn Store, account: &Account) -> Result<(), AdvisorError> {
    if account.plan == Plan::Plus {
        store.consume_ai_credit(account.id)?;
    }
    Ok(())
}
