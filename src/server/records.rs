// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Asset, Liability, Transaction, TxnKind};
use crate::server::AppState;
use crate::server::auth::AuthUser;
use crate::server::error::AppError;

const DEFAULT_LIST_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct HoldingPayload {
    pub name: String,
    pub tag: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

impl HoldingPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        if self.value < Decimal::ZERO {
            return Err(AppError::Validation("value must be non-negative".into()));
        }
        Ok(())
    }
}

pub async fn list_assets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Asset>>, AppError> {
    Ok(Json(state.store.list_assets(user_id)?))
}

pub async fn create_asset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<HoldingPayload>,
) -> Result<(StatusCode, Json<Asset>), AppError> {
    req.validate()?;
    let asset = state.store.create_asset(
        user_id,
        req.name.trim(),
        req.tag.as_deref(),
        req.value,
    )?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn update_asset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<HoldingPayload>,
) -> Result<Json<Asset>, AppError> {
    req.validate()?;
    state
        .store
        .update_asset(user_id, id, req.name.trim(), req.tag.as_deref(), req.value)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn delete_asset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_asset(user_id, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn list_liabilities(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Liability>>, AppError> {
    Ok(Json(state.store.list_liabilities(user_id)?))
}

pub async fn create_liability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<HoldingPayload>,
) -> Result<(StatusCode, Json<Liability>), AppError> {
    req.validate()?;
    let liability = state.store.create_liability(
        user_id,
        req.name.trim(),
        req.tag.as_deref(),
        req.value,
    )?;
    Ok((StatusCode::CREATED, Json(liability)))
}

pub async fn update_liability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<HoldingPayload>,
) -> Result<Json<Liability>, AppError> {
    req.validate()?;
    state
        .store
        .update_liability(user_id, id, req.name.trim(), req.tag.as_deref(), req.value)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn delete_liability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_liability(user_id, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub title: String,
    pub category: Option<String>,
    pub kind: TxnKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, rename = "occurredOn")]
    pub date: Option<NaiveDate>,
}

impl TransactionPayload {
    // the sign invariant is re-checked on every create and edit
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        if !self.kind.sign_ok(self.amount) {
            return Err(AppError::Validation(format!(
                "{} amounts must be {}",
                self.kind,
                match self.kind {
                    TxnKind::Income => "non-negative",
                    TxnKind::Expense => "non-positive",
                }
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(state.store.list_transactions(user_id, limit)?))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    req.validate()?;
    let txn = state.store.create_transaction(
        user_id,
        req.title.trim(),
        req.category.as_deref(),
        req.kind,
        req.amount,
        req.date,
    )?;
    Ok((StatusCode::CREATED, Json(txn)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<TransactionPayload>,
) -> Result<Json<Transaction>, AppError> {
    req.validate()?;
    state
        .store
        .update_transaction(
            user_id,
            id,
            req.title.trim(),
            req.category.as_deref(),
            req.kind,
            req.amount,
            req.date,
        )?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_transaction(user_id, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
