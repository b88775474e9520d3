// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::advisor::entitlement::NewEntitlement;
use crate::db;
use crate::models::{Account, Asset, Liability, Plan, Transaction, TxnKind};
use crate::store::Store;
use crate::utils::{parse_decimal, parse_timestamp};

const ACCOUNT_COLUMNS: &str = "id, email, plan, trial_started_at, trial_expires_at, \
     plan_expires_at, ai_quota, ai_quota_remaining";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(db::open_or_init()?))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        Ok(Self::new(db::open_at(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(db::open_in_memory()?))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sqlite connection lock poisoned"))
    }
}

type AccountRow = (
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    i64,
    i64,
);

fn account_from_row(row: AccountRow) -> Result<Account> {
    let (id, email, plan, trial_started_at, trial_expires_at, plan_expires_at, quota, remaining) =
        row;
    Ok(Account {
        id,
        email,
        plan: Plan::parse(&plan).ok_or_else(|| anyhow!("Unknown plan '{}'", plan))?,
        trial_started_at: parse_opt_timestamp(trial_started_at)?,
        trial_expires_at: parse_opt_timestamp(trial_expires_at)?,
        plan_expires_at: parse_opt_timestamp(plan_expires_at)?,
        ai_quota: quota,
        ai_quota_remaining: remaining,
    })
}

fn parse_opt_timestamp(v: Option<String>) -> Result<Option<DateTime<Utc>>> {
    v.map(|s| parse_timestamp(&s)).transpose()
}

fn rfc3339_opt(v: Option<DateTime<Utc>>) -> Option<String> {
    v.map(|t| t.to_rfc3339())
}

type TransactionRow = (
    i64,
    i64,
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    String,
);

fn transaction_from_row(row: TransactionRow) -> Result<Transaction> {
    let (id, user_id, title, category, kind, amount, date, created_at) = row;
    Ok(Transaction {
        id,
        user_id,
        title,
        category,
        kind: TxnKind::parse(&kind).ok_or_else(|| anyhow!("Unknown kind '{}'", kind))?,
        amount: parse_decimal(&amount)?,
        // unparseable dates fall back to the creation date downstream
        date: date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        created_at: parse_timestamp(&created_at)
            .with_context(|| format!("Transaction {} created_at", id))?,
    })
}

impl Store for SqliteStore {
    fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        init: &NewEntitlement,
    ) -> Result<Account> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users(email, password_hash, plan, trial_started_at, trial_expires_at,
                               plan_expires_at, ai_quota, ai_quota_remaining)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                email,
                password_hash,
                init.plan.as_str(),
                rfc3339_opt(init.trial_started_at),
                rfc3339_opt(init.trial_expires_at),
                rfc3339_opt(init.plan_expires_at),
                init.ai_quota,
                init.ai_quota_remaining
            ],
        )
        .with_context(|| format!("Create account '{}'", email))?;
        Ok(Account {
            id: conn.last_insert_rowid(),
            email: email.to_string(),
            plan: init.plan,
            trial_started_at: init.trial_started_at,
            trial_expires_at: init.trial_expires_at,
            plan_expires_at: init.plan_expires_at,
            ai_quota: init.ai_quota,
            ai_quota_remaining: init.ai_quota_remaining,
        })
    }

    fn account_by_email(&self, email: &str) -> Result<Option<(Account, String)>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {}, password_hash FROM users WHERE email=?1",
            ACCOUNT_COLUMNS
        );
        let row: Option<(AccountRow, String)> = conn
            .query_row(&sql, params![email], |r| {
                Ok((
                    (
                        r.get(0)?,
                        r.get(1)?,
                        r.get(2)?,
                        r.get(3)?,
                        r.get(4)?,
                        r.get(5)?,
                        r.get(6)?,
                        r.get(7)?,
                    ),
                    r.get(8)?,
                ))
            })
            .optional()?;
        match row {
            Some((raw, hash)) => Ok(Some((account_from_row(raw)?, hash))),
            None => Ok(None),
        }
    }

    fn get_entitlement(&self, user_id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users WHERE id=?1", ACCOUNT_COLUMNS);
        let row: Option<AccountRow> = conn
            .query_row(&sql, params![user_id], |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                ))
            })
            .optional()?;
        row.map(account_from_row).transpose()
    }

    fn persist_entitlement(&self, account: &Account) -> Result<Account> {
        let conn = self.conn()?;
        let n = conn.execute(
            "UPDATE users SET plan=?1, trial_started_at=?2, trial_expires_at=?3,
                              plan_expires_at=?4, ai_quota=?5, ai_quota_remaining=?6
             WHERE id=?7",
            params![
                account.plan.as_str(),
                rfc3339_opt(account.trial_started_at),
                rfc3339_opt(account.trial_expires_at),
                rfc3339_opt(account.plan_expires_at),
                account.ai_quota,
                account.ai_quota_remaining,
                account.id
            ],
        )?;
        if n == 0 {
            return Err(anyhow!("Account {} not found", account.id));
        }
        Ok(account.clone())
    }

    fn consume_ai_credit(&self, user_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        // single conditional update; sqlite's row-level atomicity keeps the
        // balance from ever crossing zero under concurrent requests
        let n = conn.execute(
            "UPDATE users SET ai_quota_remaining = ai_quota_remaining - 1
             WHERE id=?1 AND plan='plus' AND ai_quota_remaining > 0",
            params![user_id],
        )?;
        Ok(n > 0)
    }

    fn create_session(&self, user_id: i64, token: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions(token, user_id) VALUES (?1, ?2)",
            params![token, user_id],
        )?;
        Ok(())
    }

    fn resolve_session(&self, token: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token=?1",
                params![token],
                |r| r.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn list_assets(&self, user_id: i64) -> Result<Vec<Asset>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, tag, value FROM assets WHERE user_id=?1 ORDER BY id")?;
        let rows = stmt.query_map(params![user_id], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<String>>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, tag, value) = row?;
            out.push(Asset {
                id,
                user_id,
                name,
                tag,
                value: parse_decimal(&value)?,
            });
        }
        Ok(out)
    }

    fn create_asset(
        &self,
        user_id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Asset> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO assets(user_id, name, tag, value) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, name, tag, value.to_string()],
        )?;
        Ok(Asset {
            id: conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            tag: tag.map(|t| t.to_string()),
            value,
        })
    }

    fn update_asset(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Option<Asset>> {
        let conn = self.conn()?;
        let n = conn.execute(
            "UPDATE assets SET name=?1, tag=?2, value=?3 WHERE id=?4 AND user_id=?5",
            params![name, tag, value.to_string(), id, user_id],
        )?;
        Ok((n > 0).then(|| Asset {
            id,
            user_id,
            name: name.to_string(),
            tag: tag.map(|t| t.to_string()),
            value,
        }))
    }

    fn delete_asset(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let n = conn.execute(
            "DELETE FROM assets WHERE id=?1 AND user_id=?2",
            params![id, user_id],
        )?;
        Ok(n > 0)
    }

    fn list_liabilities(&self, user_id: i64) -> Result<Vec<Liability>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, tag, value FROM liabilities WHERE user_id=?1 ORDER BY id")?;
        let rows = stmt.query_map(params![user_id], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<String>>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, tag, value) = row?;
            out.push(Liability {
                id,
                user_id,
                name,
                tag,
                value: parse_decimal(&value)?,
            });
        }
        Ok(out)
    }

    fn create_liability(
        &self,
        user_id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Liability> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO liabilities(user_id, name, tag, value) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, name, tag, value.to_string()],
        )?;
        Ok(Liability {
            id: conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            tag: tag.map(|t| t.to_string()),
            value,
        })
    }

    fn update_liability(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
        tag: Option<&str>,
        value: Decimal,
    ) -> Result<Option<Liability>> {
        let conn = self.conn()?;
        let n = conn.execute(
            "UPDATE liabilities SET name=?1, tag=?2, value=?3 WHERE id=?4 AND user_id=?5",
            params![name, tag, value.to_string(), id, user_id],
        )?;
        Ok((n > 0).then(|| Liability {
            id,
            user_id,
            name: name.to_string(),
            tag: tag.map(|t| t.to_string()),
            value,
        }))
    }

    fn delete_liability(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let n = conn.execute(
            "DELETE FROM liabilities WHERE id=?1 AND user_id=?2",
            params![id, user_id],
        )?;
        Ok(n > 0)
    }

    fn list_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, category, kind, amount, date, created_at
             FROM transactions WHERE user_id=?1
             ORDER BY date DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], |r| {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
                r.get(7)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(transaction_from_row(row?)?);
        }
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
        let conn = self.conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO transactions(user_id, title, category, kind, amount, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                title,
                category,
                kind.as_str(),
                amount.to_string(),
                date.map(|d| d.to_string()),
                created_at.to_rfc3339()
            ],
        )?;
        Ok(Transaction {
            id: conn.last_insert_rowid(),
            user_id,
            title: title.to_string(),
            category: category.map(|c| c.to_string()),
            kind,
            amount,
            date,
            created_at,
        })
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
        let conn = self.conn()?;
        let n = conn.execute(
            "UPDATE transactions SET title=?1, category=?2, kind=?3, amount=?4, date=?5
             WHERE id=?6 AND user_id=?7",
            params![
                title,
                category,
                kind.as_str(),
                amount.to_string(),
                date.map(|d| d.to_string()),
                id,
                user_id
            ],
        )?;
        if n == 0 {
            return Ok(None);
        }
        let created_at: String = conn.query_row(
            "SELECT created_at FROM transactions WHERE id=?1",
            params![id],
            |r| r.get(0),
        )?;
        Ok(Some(Transaction {
            id,
            user_id,
            title: title.to_string(),
            category: category.map(|c| c.to_string()),
            kind,
            amount,
            date,
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let n = conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
            params![id, user_id],
        )?;
        Ok(n > 0)
    }
}
