//! Wiring of adapters into the sweep and the API server

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use dailyverse_api::ApiState;
use dailyverse_dispatch::{DispatchOpts, DispatchRunner, SweepReport};
use dailyverse_push::{ApnsConfig, ApnsSender};
use dailyverse_store_adapter_sqlite::StoreAdapterSqlite;
use dailyverse_types::prelude::*;

/// Installs the log subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_target(false)
		.init();
}

/// Runs one complete sweep.
///
/// Push credentials are loaded and validated before the database is opened,
/// so a misconfigured process fails without touching any subscriber.
pub async fn run_sweep(config: &ServerConfig, apns: &ApnsConfig) -> DvResult<SweepReport> {
	let sender = Arc::new(ApnsSender::new(apns)?);
	let store = Arc::new(StoreAdapterSqlite::new(&config.db_path).await?);

	let runner = DispatchRunner::new(store.clone(), store, sender)
		.with_opts(DispatchOpts { concurrency: config.concurrency, ..Default::default() });
	runner.run().await
}

/// Serves the HTTP API until ctrl-c
pub async fn run_api(config: &ServerConfig) -> DvResult<()> {
	let store = Arc::new(StoreAdapterSqlite::new(&config.db_path).await?);
	let router = dailyverse_api::router(ApiState { store: store.clone(), content: store });

	let listener = tokio::net::TcpListener::bind(config.listen.as_ref()).await?;
	info!("Listening on {}", config.listen);

	axum::serve(listener, router)
		.with_graceful_shutdown(async {
			if let Err(err) = tokio::signal::ctrl_c().await {
				error!("failed to listen for shutdown signal: {}", err);
			}
			info!("shutting down");
		})
		.await?;
	Ok(())
}

// vim: ts=4
