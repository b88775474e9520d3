// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;

use crate::advisor::{self, Insights};
use crate::server::AppState;
use crate::server::auth::AuthUser;
use crate::server::error::AppError;

const DEFAULT_PERIOD: &str = "last_90d";
const DEFAULT_LANG: &str = "en";

#[derive(Debug, Deserialize)]
pub struct InsightsParams {
    pub period: Option<String>,
    pub lang: Option<String>,
}

/// The whole pipeline (store reads, aggregation, quota settle, blocking
/// advice call) runs off the async runtime.
pub async fn insights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<InsightsParams>,
) -> Result<Json<Insights>, AppError> {
    let period = params.period.unwrap_or_else(|| DEFAULT_PERIOD.to_string());
    let lang = params.lang.unwrap_or_else(|| DEFAULT_LANG.to_string());
    let store = state.store.clone();
    let advice = state.advice.clone();
    let insights = tokio::task::spawn_blocking(move || {
        advisor::run(
            store.as_ref(),
            advice.as_deref(),
            user_id,
            &period,
            &lang,
            Utc::now(),
        )
    })
    .await
    .map_err(|err| AppError::Internal(anyhow::anyhow!("insights task failed: {err}")))??;
    Ok(Json(insights))
}
