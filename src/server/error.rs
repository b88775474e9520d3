// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::advisor::AdvisorError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("an active plan is required")]
    PlanRequired,
    #[error("ai advice quota exhausted")]
    QuotaExhausted,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::PlanRequired => AppError::PlanRequired,
            AdvisorError::QuotaExhausted => AppError::QuotaExhausted,
            AdvisorError::AccountMissing => AppError::NotFound,
            AdvisorError::Store(inner) => AppError::Internal(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "auth_required"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::PlanRequired => (StatusCode::PAYMENT_REQUIRED, "plan_required"),
            AppError::QuotaExhausted => (StatusCode::PAYMENT_REQUIRED, "quota_exhausted"),
            AppError::Internal(err) => {
                log::error!("request failed: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        let body = match &self {
            AppError::Validation(detail) => json!({ "error": code, "detail": detail }),
            _ => json!({ "error": code }),
        };
        (status, Json(body)).into_response()
    }
}
