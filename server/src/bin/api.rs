//! Registration and verse API server

use std::process::ExitCode;

use dailyverse_server::{ServerConfig, app};
use dailyverse_types::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
	app::init_tracing();

	let config = match ServerConfig::from_env() {
		Ok(config) => config,
		Err(err) => {
			error!("configuration error: {}", err);
			return ExitCode::FAILURE;
		}
	};

	if let Err(err) = app::run_api(&config).await {
		error!("server failed: {}", err);
		return ExitCode::FAILURE;
	}
	ExitCode::SUCCESS
}

// vim: ts=4
