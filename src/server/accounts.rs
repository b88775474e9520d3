// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advisor::entitlement;
use crate::models::{Account, Plan};
use crate::server::AppState;
use crate::server::auth::{self, AuthUser};
use crate::server::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub plan: Option<Plan>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: i64,
    pub email: String,
    pub plan: Plan,
    pub trial_expires_at: Option<DateTime<Utc>>,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub ai_quota: i64,
    pub ai_quota_remaining: i64,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        AccountView {
            id: a.id,
            email: a.email,
            plan: a.plan,
            trial_expires_at: a.trial_expires_at,
            plan_expires_at: a.plan_expires_at,
            ai_quota: a.ai_quota,
            ai_quota_remaining: a.ai_quota_remaining,
        }
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AccountView>), AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".into()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    if state.store.account_by_email(&email)?.is_some() {
        return Err(AppError::Validation("email already registered".into()));
    }
    let init = entitlement::at_signup(req.plan, Utc::now());
    let account = state
        .store
        .create_account(&email, &auth::hash_password(&req.password), &init)?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let (account, password_hash) = state
        .store
        .account_by_email(&email)?
        .ok_or(AppError::Unauthorized)?;
    if !auth::verify_password(&password_hash, &req.password) {
        return Err(AppError::Unauthorized);
    }
    let token = auth::new_session_token();
    state.store.create_session(account.id, &token)?;
    Ok(Json(TokenResponse { token }))
}

/// The entitlement view is normalized on every read, so an expired trial
/// shows up as `free` without any background job.
pub async fn account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<AccountView>, AppError> {
    let account = entitlement::normalize_on_access(state.store.as_ref(), user_id, Utc::now())?
        .ok_or(AppError::NotFound)?;
    Ok(Json(account.into()))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPlanRequest {
    pub plan: Plan,
}

pub async fn confirm_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ConfirmPlanRequest>,
) -> Result<Json<AccountView>, AppError> {
    if !req.plan.is_premium() {
        return Err(AppError::Validation(
            "plan must be 'plus' or 'prime'".into(),
        ));
    }
    let account = state
        .store
        .get_entitlement(user_id)?
        .ok_or(AppError::NotFound)?;
    let upgraded = entitlement::purchase(&account, req.plan, Utc::now());
    let account = state.store.persist_entitlement(&upgraded)?;
    Ok(Json(account.into()))
}
