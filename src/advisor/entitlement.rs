// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, Duration, Months, Utc};

use crate::models::{Account, Plan};
use crate::store::Store;

pub const TRIAL_DAYS: i64 = 7;
pub const PLUS_AI_QUOTA: i64 = 10;
// Prime is unmetered; the allotment is recorded but never enforced.
pub const PRIME_AI_QUOTA: i64 = 30;

pub fn quota_for(plan: Plan) -> i64 {
    match plan {
        Plan::Plus => PLUS_AI_QUOTA,
        Plan::Prime => PRIME_AI_QUOTA,
        Plan::Free | Plan::Trial => 0,
    }
}

#[derive(Debug, Clone)]
pub struct NewEntitlement {
    pub plan: Plan,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub trial_expires_at: Option<DateTime<Utc>>,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub ai_quota: i64,
    pub ai_quota_remaining: i64,
}

/// Signup default is a 7-day trial; an explicit premium plan is applied
/// immediately with its quota and no trial window.
pub fn at_signup(requested: Option<Plan>, now: DateTime<Utc>) -> NewEntitlement {
    match requested {
        Some(plan) if plan.is_premium() => NewEntitlement {
            plan,
            trial_started_at: None,
            trial_expires_at: None,
            plan_expires_at: Some(now + Months::new(1)),
            ai_quota: quota_for(plan),
            ai_quota_remaining: quota_for(plan),
        },
        _ => NewEntitlement {
            plan: Plan::Trial,
            trial_started_at: Some(now),
            trial_expires_at: Some(now + Duration::days(TRIAL_DAYS)),
            plan_expires_at: None,
            ai_quota: 0,
            ai_quota_remaining: 0,
        },
    }
}

/// Purchase confirmation: move straight to the paid plan, clear any trial
/// expiry, reset the quota to the plan allotment.
pub fn purchase(account: &Account, plan: Plan, now: DateTime<Utc>) -> Account {
    let quota = quota_for(plan);
    Account {
        plan,
        trial_expires_at: None,
        plan_expires_at: Some(now + Months::new(1)),
        ai_quota: quota,
        ai_quota_remaining: quota,
        ..account.clone()
    }
}

/// Lazy downgrade of elapsed trials and paid plans. Returns None when the
/// stored state is already current; idempotent on an already-downgraded row.
pub fn normalize(account: &Account, now: DateTime<Utc>) -> Option<Account> {
    let lapsed = match account.plan {
        Plan::Trial => account.trial_expires_at.map_or(true, |t| t <= now),
        Plan::Plus | Plan::Prime => account.plan_expires_at.is_some_and(|t| t <= now),
        Plan::Free => false,
    };
    lapsed.then(|| Account {
        plan: Plan::Free,
        ai_quota: 0,
        ai_quota_remaining: 0,
        ..account.clone()
    })
}

pub fn is_premium(account: &Account, now: DateTime<Utc>) -> bool {
    match account.plan {
        Plan::Plus | Plan::Prime => true,
        Plan::Trial => account.trial_expires_at.is_some_and(|t| t > now),
        Plan::Free => false,
    }
}

/// The pull-based recomputation invoked on every authenticated access: read,
/// normalize, and persist only when the state actually changed. There is no
/// background expiry job.
pub fn normalize_on_access(
    store: &dyn Store,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<Account>> {
    let Some(account) = store.get_entitlement(user_id)? else {
        return Ok(None);
    };
    match normalize(&account, now) {
        Some(fresh) => Ok(Some(store.persist_entitlement(&fresh)?)),
        None => Ok(Some(account)),
    }
}
