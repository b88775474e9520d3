// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod insights;
pub mod records;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::{get, post, put};

use crate::advisor::advice::AdviceClient;
use crate::store::{self, MemoryStore, SqliteStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub advice: Option<Arc<AdviceClient>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(accounts::signup))
        .route("/auth/login", post(accounts::login))
        .route("/account", get(accounts::account))
        .route("/billing/confirm", post(accounts::confirm_plan))
        .route(
            "/assets",
            get(records::list_assets).post(records::create_asset),
        )
        .route(
            "/assets/{id}",
            put(records::update_asset).delete(records::delete_asset),
        )
        .route(
            "/liabilities",
            get(records::list_liabilities).post(records::create_liability),
        )
        .route(
            "/liabilities/{id}",
            put(records::update_liability).delete(records::delete_liability),
        )
        .route(
            "/transactions",
            get(records::list_transactions).post(records::create_transaction),
        )
        .route(
            "/transactions/{id}",
            put(records::update_transaction).delete(records::delete_transaction),
        )
        .route("/advisor/insights", get(insights::insights))
        .with_state(state)
}

pub fn run(sub: &clap::ArgMatches) -> Result<()> {
    let addr = sub
        .get_one::<String>("addr")
        .map(|s| s.as_str())
        .unwrap_or("127.0.0.1:8080");
    let demo = sub.get_flag("demo");
    let memory = demo || sub.get_flag("memory");

    let store: Arc<dyn Store> = if memory {
        let mem = MemoryStore::new();
        if demo {
            store::seed_demo(&mem)?;
        }
        log::info!("using in-memory store");
        Arc::new(mem)
    } else if let Some(path) = sub.get_one::<String>("db") {
        log::info!("using sqlite store at {}", path);
        Arc::new(SqliteStore::open_at(Path::new(path))?)
    } else {
        Arc::new(SqliteStore::open_default()?)
    };

    let advice_url = sub
        .get_one::<String>("advice-url")
        .cloned()
        .or_else(|| std::env::var("FINMIND_ADVICE_URL").ok());
    let advice_token = sub
        .get_one::<String>("advice-token")
        .cloned()
        .or_else(|| std::env::var("FINMIND_ADVICE_TOKEN").ok());
    let advice = match advice_url {
        Some(url) => {
            log::info!("advice generator configured at {}", url);
            Some(Arc::new(AdviceClient::new(url, advice_token)?))
        }
        None => {
            log::info!("advice generator not configured; llm_advice will be null");
            None
        }
    };

    let app = router(AppState { store, advice });
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("finmind listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        Ok(())
    })
}
