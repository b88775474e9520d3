// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use finmind::advisor::AdvisorError;
use finmind::advisor::entitlement::{self, NewEntitlement};
use finmind::advisor::quota;
use finmind::models::{Account, Plan};
use finmind::store::{MemoryStore, Store};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap()
}

fn account(plan: Plan, remaining: i64) -> Account {
    Account {
        id: 1,
        email: "user@example.com".to_string(),
        plan,
        trial_started_at: None,
        trial_expires_at: None,
        plan_expires_at: None,
        ai_quota: remaining,
        ai_quota_remaining: remaining,
    }
}

#[test]
fn non_premium_is_denied_with_plan_required() {
    let err = quota::authorize(&account(Plan::Free, 0), now()).unwrap_err();
    assert!(matches!(err, AdvisorError::PlanRequired));

    // an expired trial is not premium either
    let mut trial = account(Plan::Trial, 0);
    trial.trial_expires_at = Some(now() - Duration::hours(1));
    let err = quota::authorize(&trial, now()).unwrap_err();
    assert!(matches!(err, AdvisorError::PlanRequired));
}

#[test]
fn plus_is_metered_and_prime_is_not() {
    let err = quota::authorize(&account(Plan::Plus, 0), now()).unwrap_err();
    assert!(matches!(err, AdvisorError::QuotaExhausted));

    assert!(quota::authorize(&account(Plan::Plus, 1), now()).is_ok());
    assert!(quota::authorize(&account(Plan::Prime, 0), now()).is_ok());

    let mut trial = account(Plan::Trial, 0);
    trial.trial_expires_at = Some(now() + Duration::days(1));
    assert!(quota::authorize(&trial, now()).is_ok());
}

fn plus_account(store: &MemoryStore, remaining: i64) -> Account {
    let init = NewEntitlement {
        plan: Plan::Plus,
        trial_started_at: None,
        trial_expires_at: None,
        plan_expires_at: Some(now() + Duration::days(30)),
        ai_quota: entitlement::PLUS_AI_QUOTA,
        ai_quota_remaining: remaining,
    };
    store.create_account("plus@example.com", "hash", &init).unwrap()
}

#[test]
fn settle_decrements_plus_by_exactly_one() {
    let store = MemoryStore::new();
    let account = plus_account(&store, 3);

    quota::settle(&store, &account).unwrap();
    assert_eq!(
        store
            .get_entitlement(account.id)
            .unwrap()
            .unwrap()
            .ai_quota_remaining,
        2
    );
}

#[test]
fn decrement_floors_at_zero() {
    let store = MemoryStore::new();
    let account = plus_account(&store, 1);

    assert!(store.consume_ai_credit(account.id).unwrap());
    assert!(!store.consume_ai_credit(account.id).unwrap());
    assert!(!store.consume_ai_credit(account.id).unwrap());
    assert_eq!(
        store
            .get_entitlement(account.id)
            .unwrap()
            .unwrap()
            .ai_quota_remaining,
        0
    );
}

#[test]
fn settle_never_touches_trial_or_prime() {
    let store = MemoryStore::new();
    let init = NewEntitlement {
        plan: Plan::Prime,
        trial_started_at: None,
        trial_expires_at: None,
        plan_expires_at: Some(now() + Duration::days(30)),
        ai_quota: entitlement::PRIME_AI_QUOTA,
        ai_quota_remaining: entitlement::PRIME_AI_QUOTA,
    };
    let prime = store.create_account("prime@example.com", "hash", &init).unwrap();
    quota::settle(&store, &prime).unwrap();
    assert_eq!(
        store
            .get_entitlement(prime.id)
            .unwrap()
            .unwrap()
            .ai_quota_remaining,
        entitlement::PRIME_AI_QUOTA
    );

    let trial = store
        .create_account(
            "trial@example.com",
            "hash",
            &entitlement::at_signup(None, now()),
        )
        .unwrap();
    quota::settle(&store, &trial).unwrap();
    assert_eq!(
        store
            .get_entitlement(trial.id)
            .unwrap()
            .unwrap()
            .ai_quota_remaining,
        0
    );
}
