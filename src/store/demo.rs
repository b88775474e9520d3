// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::advisor::entitlement;
use crate::models::TxnKind;
use crate::server::auth::hash_password;
use crate::store::Store;

pub const DEMO_EMAIL: &str = "demo@finmind.ai";
pub const DEMO_PASSWORD: &str = "demo-pass";

/// Seed a trial account with a small, realistic dataset so `serve --demo`
/// produces non-empty insights out of the box.
pub fn seed_demo(store: &dyn Store) -> Result<()> {
    let now = Utc::now();
    let account = store.create_account(
        DEMO_EMAIL,
        &hash_password(DEMO_PASSWORD),
        &entitlement::at_signup(None, now),
    )?;

    store.create_asset(account.id, "Savings account", Some("cash"), Decimal::from(50_000))?;
    store.create_asset(account.id, "Brokerage", Some("invest"), Decimal::from(25_000))?;
    store.create_liability(account.id, "Student loan", Some("loan"), Decimal::from(20_000))?;

    let today = now.date_naive();
    store.create_transaction(
        account.id,
        "Salary",
        Some("Salary"),
        TxnKind::Income,
        Decimal::from(5_000),
        Some(today),
    )?;
    store.create_transaction(
        account.id,
        "Freelance invoice",
        Some("Freelance"),
        TxnKind::Income,
        Decimal::from(2_500),
        Some(today),
    )?;
    store.create_transaction(
        account.id,
        "Monthly rent",
        Some("Rent"),
        TxnKind::Expense,
        Decimal::from(-1_800),
        Some(today),
    )?;
    store.create_transaction(
        account.id,
        "Groceries",
        Some("Food"),
        TxnKind::Expense,
        Decimal::from(-700),
        Some(today),
    )?;

    log::info!("seeded demo account '{}'", DEMO_EMAIL);
    Ok(())
}
