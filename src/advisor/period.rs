// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Window used when a token selects no lower bound; only feeds the per-day
/// normalization, never the filter.
pub const FALLBACK_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy)]
pub struct PeriodWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: DateTime<Utc>,
    pub days: i64,
}

pub fn resolve(token: &str, now: DateTime<Utc>) -> PeriodWindow {
    match token {
        "last_30d" => PeriodWindow {
            from: Some(now - Duration::days(30)),
            to: now,
            days: 30,
        },
        "last_90d" => PeriodWindow {
            from: Some(now - Duration::days(90)),
            to: now,
            days: 90,
        },
        "ytd" => {
            let from = Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(now);
            let days = ((now - from).num_seconds() + 86_399) / 86_400;
            PeriodWindow {
                from: Some(from),
                to: now,
                days: days.max(1),
            }
        }
        _ => PeriodWindow {
            from: None,
            to: now,
            days: FALLBACK_DAYS,
        },
    }
}
