// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Deserialize;

use crate::advisor::metrics::MetricsSnapshot;
use crate::advisor::rules::RuleFinding;
use crate::utils::http_client;

/// Client for the external natural-language advice generator. Strictly
/// best-effort: every failure mode degrades to None.
pub struct AdviceClient {
    endpoint: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct AdviceResponse {
    advice: String,
}

impl AdviceClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            token,
            client: http_client()?,
        })
    }

    pub fn generate(
        &self,
        metrics: &MetricsSnapshot,
        findings: &[RuleFinding],
        lang: &str,
    ) -> Option<String> {
        match self.request(metrics, findings, lang) {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(err) => {
                log::debug!("advice generator unavailable: {err:#}");
                None
            }
        }
    }

    fn request(
        &self,
        metrics: &MetricsSnapshot,
        findings: &[RuleFinding],
        lang: &str,
    ) -> Result<String> {
        let payload = serde_json::json!({
            "lang": lang,
            "metrics": metrics,
            "findings": findings
                .iter()
                .map(|f| serde_json::json!({
                    "id": f.id,
                    "severity": f.severity,
                    "message": f.message,
                }))
                .collect::<Vec<_>>(),
        });
        let mut req = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp: AdviceResponse = req.send()?.error_for_status()?.json()?;
        Ok(resp.advice)
    }
}
