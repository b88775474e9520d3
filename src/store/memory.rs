// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::advisor::entitlement::NewEntitlement;
use crate::models::{Account, Asset, Liability, Plan, Transaction, TxnKind};
use crate::store::Store;

struct UserRow {
    account: Account,
    password_hash: String,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: Vec<UserRow>,
    sessions: HashMap<String, i64>,
    assets: Vec<Asset>,
    liabilities: Vec<Liability>,
    txns: Vec<Transaction>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process demo store. Every mutation runs under one lock acquisition, so
/// the conditional quota decrement is as atomic as the sqlite one.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl Store for MemoryStore {
    fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        init: &NewEntitlement,
    ) -> Result<Account> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|u| u.account.email == email) {
            return Err(anyhow!("Account '{}' already exists", email));
        }
        let account = Account {
            id: inner.next_id(),
            email: email.to_string(),
            plan: init.plan,
            trial_started_at: init.trial_started_at,
            trial_expires_at: init.trial_expires_at,
            plan_expires_at: init.plan_expires_at,
            ai_quota: init.ai_quota,
            ai_quota_remaining: init.ai_quota_remaining,
        };
        inner.users.push(UserRow {
            account: account.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(account)
    }

    fn account_by_email(&self, email: &str) -> Result<Option<(Account, String)>> {
        let inner = self.lock()?;
        Ok(inner
            .users
            .iter()
            .find(|u| u.account.email == email)
            .map(|u| (u.account.clone(), u.password_hash.clone())))
    }

    fn get_entitlement(&self, user_id: i64) -> Result<Option<Account>> {
        let inner = self.lock()?;
        Ok(inner
            .users
            .iter()
            .find(|u| u.account.id == user_id)
            .map(|u| u.account.clone()))
    }

    fn persist_entitlement(&self, account: &Account) -> Result<Account> {
        let mut inner = self.lock()?;
        let row = inner
            .users
            .iter_mut()
            .find(|u| u.account.id == account.id)
            .ok_or_else(|| anyhow!("Account {} not found", account.id))?;
        row.account = account.clone();
        Ok(row.account.clone())
    }

    fn consume_ai_credit(&self, user_id: i64) -> Result<bool> {
        let mut inner = self.lock()?;
        if let Some(row) = inner.users.iter_mut().find(|u| u.account.id == user_id) {
            if row.account.plan == Plan::Plus && row.account.ai_quota_remaining > 0 {
                row.account.ai_quota_remaining -= 1;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn create_session(&self, user_id: i64, token: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.sessions.insert(token.to_string(), user_id);
        Ok(())
    }

    fn resolve_session(&self, token: &str) -> Result<Option<i64>> {
        let inner = self.lock()?;
        Ok(inner.sessions.get(token).copied())
    }

    fn list_assets(&self, user_id: i64) -> Result<Vec<Asset>> {
        let inner = self.lock()?;
        Ok(inner
            .assets
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    fn create_asset(
        &self,
        user_id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Asset> {
        let mut inner = self.lock()?;
        let asset = Asset {
            id: inner.next_id(),
            user_id,
            name: name.to_string(),
            tag: tag.map(|t| t.to_string()),
            value,
        };
        inner.assets.push(asset.clone());
        Ok(asset)
    }

    fn update_asset(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Option<Asset>> {
        let mut inner = self.lock()?;
        let Some(asset) = inner
            .assets
            .iter_mut()
            .find(|a| a.id == id && a.user_id == user_id)
        else {
            return Ok(None);
        };
        asset.name = name.to_string();
        asset.tag = tag.map(|t| t.to_string());
        asset.value = value;
        Ok(Some(asset.clone()))
    }

    fn delete_asset(&self, user_id: i64, id: i64) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.assets.len();
        inner.assets.retain(|a| !(a.id == id && a.user_id == user_id));
        Ok(inner.assets.len() < before)
    }

    fn list_liabilities(&self, user_id: i64) -> Result<Vec<Liability>> {
        let inner = self.lock()?;
        Ok(inner
            .liabilities
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    fn create_liability(
        &self,
        user_id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Liability> {
        let mut inner = self.lock()?;
        let liability = Liability {
            id: inner.next_id(),
            user_id,
            name: name.to_string(),
            tag: tag.map(|t| t.to_string()),
            value,
        };
        inner.liabilities.push(liability.clone());
        Ok(liability)
    }

    fn update_liability(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Option<Liability>> {
        let mut inner = self.lock()?;
        let Some(liability) = inner
            .liabilities
            .iter_mut()
            .find(|l| l.id == id && l.user_id == user_id)
        else {
            return Ok(None);
        };
        liability.name = name.to_string();
        liability.tag = tag.map(|t| t.to_string());
        liability.value = value;
        Ok(Some(liability.clone()))
    }

    fn delete_liability(&self, user_id: i64, id: i64) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.liabilities.len();
        inner
            .liabilities
            .retain(|l| !(l.id == id && l.user_id == user_id));
        Ok(inner.liabilities.len() < before)
    }

    fn list_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        let inner = self.lock()?;
        let mut out: Vec<Transaction> = inner
            .txns
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()).then(b.id.cmp(&a.id)));
        out.truncate(limit);
        Ok(out)
    }

    fn create_transaction(
        &self,
        user_id: i64,
        title: &str,
        category: Option<&str>,
        kind: TxnKind,
        amount: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<Transaction> {
        let mut inner = self.lock()?;
        let txn = Transaction {
            id: inner.next_id(),
            user_id,
            title: title.to_string(),
            category: category.map(|c| c.to_string()),
            kind,
            amount,
            date,
            created_at: Utc::now(),
        };
        inner.txns.push(txn.clone());
        Ok(txn)
    }

    fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        title: &str,
        category: Option<&str>,
        kind: TxnKind,
        amount: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<Option<Transaction>> {
        let mut inner = self.lock()?;
        let Some(txn) = inner
            .txns
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
        else {
            return Ok(None);
        };
        txn.title = title.to_string();
        txn.category = category.map(|c| c.to_string());
        txn.kind = kind;
        txn.amount = amount;
        txn.date = date;
        Ok(Some(txn.clone()))
    }

    fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.txns.len();
        inner.txns.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(inner.txns.len() < before)
    }
}
