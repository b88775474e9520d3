// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod demo;
pub mod memory;
pub mod sqlite;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::advisor::entitlement::NewEntitlement;
use crate::models::{Account, Asset, Liability, Transaction, TxnKind};

pub use demo::seed_demo;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence capability behind the API. Two implementations: the relational
/// store and the in-memory demo store, selected at startup.
pub trait Store: Send + Sync {
    fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        init: &NewEntitlement,
    ) -> Result<Account>;
    fn account_by_email(&self, email: &str) -> Result<Option<(Account, String)>>;
    fn get_entitlement(&self, user_id: i64) -> Result<Option<Account>>;
    fn persist_entitlement(&self, account: &Account) -> Result<Account>;
    /// Conditional decrement: takes one credit iff the account is on `plus`
    /// and still has quota. Returns whether a credit was consumed. Must be a
    /// single atomic read-modify-write against the account row.
    fn consume_ai_credit(&self, user_id: i64) -> Result<bool>;

    fn create_session(&self, user_id: i64, token: &str) -> Result<()>;
    fn resolve_session(&self, token: &str) -> Result<Option<i64>>;

    fn list_assets(&self, user_id: i64) -> Result<Vec<Asset>>;
    fn create_asset(
        &self,
        user_id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Asset>;
    fn update_asset(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Option<Asset>>;
    fn delete_asset(&self, user_id: i64, id: i64) -> Result<bool>;

    fn list_liabilities(&self, user_id: i64) -> Result<Vec<Liability>>;
    fn create_liability(
        &self,
        user_id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Liability>;
    fn update_liability(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Option<Liability>>;
    fn delete_liability(&self, user_id: i64, id: i64) -> Result<bool>;

    fn list_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>>;
    #[allow(clippy::too_many_arguments)]
    fn create_transaction(
        &self,
        user_id: i64,
        title: &str,
        category: Option<&str>,
        kind: TxnKind,
        amount: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<Transaction>;
    #[allow(clippy::too_many_arguments)]
    fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        title: &str,
        category: Option<&str>,
        kind: TxnKind,
        amount: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<Option<Transaction>>;
    fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool>;
}
