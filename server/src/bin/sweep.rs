//! One dispatch sweep. Exits non-zero when the sweep could not run.

use std::process::ExitCode;

use dailyverse_push::ApnsConfig;
use dailyverse_server::{ServerConfig, app};
use dailyverse_types::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
	app::init_tracing();

	let configs = ServerConfig::from_env().and_then(|server| Ok((server, ApnsConfig::from_env()?)));
	let (config, apns) = match configs {
		Ok(configs) => configs,
		Err(err) => {
			error!("configuration error: {}", err);
			return ExitCode::FAILURE;
		}
	};
	debug!("config: {:?} {:?}", config, apns);

	match app::run_sweep(&config, &apns).await {
		Ok(_report) => ExitCode::SUCCESS,
		Err(err) => {
			error!("sweep failed: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
