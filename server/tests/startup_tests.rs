//! Sweep start-up checks that run before any subscriber is touched

use dailyverse_push::{ApnsConfig, ApnsEnv};
use dailyverse_server::{ServerConfig, app};
use dailyverse_types::error::Error;
use tempfile::TempDir;

fn apns_config(private_key_pem: &str) -> ApnsConfig {
	ApnsConfig {
		team_id: "TEAM123456".into(),
		key_id: "KEY1234567".into(),
		private_key_pem: private_key_pem.into(),
		bundle_id: "com.example.dailyverse".into(),
		env: ApnsEnv::Sandbox,
	}
}

fn server_config(temp_dir: &TempDir) -> ServerConfig {
	ServerConfig {
		db_path: temp_dir.path().join("bible_web.sqlite"),
		concurrency: 4,
		listen: "127.0.0.1:0".into(),
	}
}

#[tokio::test]
async fn test_bad_key_fails_before_opening_database() {
	let temp_dir = TempDir::new().unwrap();
	let config = server_config(&temp_dir);

	let err = app::run_sweep(&config, &apns_config("not a key")).await.unwrap_err();

	assert!(matches!(err, Error::InvalidKeyMaterial(_)));
	assert!(err.is_sweep_fatal());
	assert!(!config.db_path.exists());
}

#[tokio::test]
async fn test_empty_key_is_missing_credential() {
	let temp_dir = TempDir::new().unwrap();
	let config = server_config(&temp_dir);

	let err = app::run_sweep(&config, &apns_config("")).await.unwrap_err();

	assert!(matches!(err, Error::MissingCredentialConfig("APNS_PRIVATE_KEY")));
	assert!(!config.db_path.exists());
}

// vim: ts=4
