//! APNs notification delivery over HTTP/2

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::StatusCode;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApnsConfig;
use crate::prelude::*;
use crate::token::TokenSigner;
use dailyverse_types::{push_sender::PushSender, types::short_token};

/// Upper bound for one delivery attempt, connect to last response byte
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct Alert<'a> {
	title: &'a str,
	body: &'a str,
}

#[derive(Serialize)]
struct Aps<'a> {
	alert: Alert<'a>,
	sound: &'a str,
}

#[derive(Serialize)]
struct Payload<'a> {
	aps: Aps<'a>,
}

/// `{"aps":{"alert":{"title":..,"body":..},"sound":"default"}}`
pub fn build_payload(title: &str, body: &str) -> DvResult<Vec<u8>> {
	let payload = Payload { aps: Aps { alert: Alert { title, body }, sound: "default" } };
	Ok(serde_json::to_vec(&payload)?)
}

/// Builds the POST request for one device
pub fn build_request(
	base_url: &str,
	device_token: &str,
	bundle_id: &str,
	auth_token: &str,
	payload: Vec<u8>,
) -> DvResult<hyper::Request<Full<Bytes>>> {
	hyper::Request::builder()
		.method(hyper::Method::POST)
		.uri(format!("{}/3/device/{}", base_url, device_token))
		.header("authorization", format!("bearer {}", auth_token))
		.header("apns-topic", bundle_id)
		.header("content-type", "application/json")
		.body(Full::new(Bytes::from(payload)))
		.map_err(|e| Error::Internal(format!("Request build error: {}", e)))
}

/// Anything but 200 is a rejected notification
fn check_response(status: StatusCode, body: &[u8]) -> DvResult<()> {
	if status == StatusCode::OK {
		Ok(())
	} else {
		Err(Error::DeliveryFailure {
			status: status.as_u16(),
			body: String::from_utf8_lossy(body).into(),
		})
	}
}

pub struct ApnsSender {
	client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
	signer: Arc<TokenSigner>,
	base_url: Box<str>,
	bundle_id: Box<str>,
	timeout: Duration,
}

impl std::fmt::Debug for ApnsSender {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApnsSender")
			.field("base_url", &self.base_url)
			.field("bundle_id", &self.bundle_id)
			.field("signer", &self.signer)
			.finish_non_exhaustive()
	}
}

impl ApnsSender {
	/// Validates the signing key and sets up the shared HTTP/2 client.
	///
	/// Fails before any delivery is attempted if the credentials are unusable.
	pub fn new(config: &ApnsConfig) -> DvResult<Self> {
		let signer = Arc::new(TokenSigner::from_config(config)?);

		let connector = HttpsConnectorBuilder::new()
			.with_provider_and_native_roots(rustls::crypto::aws_lc_rs::default_provider())
			.map_err(|e| Error::ConfigError(format!("TLS error: {}", e)))?
			.https_only()
			.enable_http2()
			.build();
		let client = Client::builder(TokioExecutor::new()).http2_only(true).build(connector);

		info!("APNs host: {}", config.env.base_url());

		Ok(Self {
			client,
			signer,
			base_url: config.env.base_url().into(),
			bundle_id: config.bundle_id.clone(),
			timeout: DELIVERY_TIMEOUT,
		})
	}
}

#[async_trait]
impl PushSender for ApnsSender {
	async fn send(&self, device_token: &str, title: &str, body: &str) -> DvResult<()> {
		let credential = self.signer.credential()?;
		let payload = build_payload(title, body)?;
		let request =
			build_request(&self.base_url, device_token, &self.bundle_id, &credential.token, payload)?;

		debug!(
			device = %short_token(device_token),
			len = device_token.len(),
			"APNs request"
		);

		let attempt = async {
			let response = self
				.client
				.request(request)
				.await
				.map_err(|e| Error::TransportFailure(format!("Network error: {}", e)))?;
			let status = response.status();
			let body = response
				.into_body()
				.collect()
				.await
				.map_err(|e| Error::TransportFailure(format!("Body read error: {}", e)))?
				.to_bytes();
			Ok::<_, Error>((status, body))
		};

		let (status, body) = tokio::time::timeout(self.timeout, attempt).await.map_err(|_| {
			Error::TransportFailure(format!("timed out after {:?}", self.timeout))
		})??;

		if status == StatusCode::FORBIDDEN {
			// ExpiredProviderToken / InvalidProviderToken: sign a new one next time
			warn!(status = %status, "APNs rejected provider token, dropping cached token");
			self.signer.invalidate();
		}

		check_response(status, &body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ApnsEnv;
	use crate::token::tests::TEST_P256_KEY;
	use tokio::net::TcpListener;

	/// Sender pointed at a local address, trusting no certificates
	fn local_sender(base_url: String, timeout: Duration) -> ApnsSender {
		let config = ApnsConfig {
			team_id: "TEAM123456".into(),
			key_id: "KEY1234567".into(),
			private_key_pem: TEST_P256_KEY.into(),
			bundle_id: "com.example.dailyverse".into(),
			env: ApnsEnv::Sandbox,
		};
		let tls = rustls::ClientConfig::builder_with_provider(Arc::new(
			rustls::crypto::aws_lc_rs::default_provider(),
		))
		.with_safe_default_protocol_versions()
		.unwrap()
		.with_root_certificates(rustls::RootCertStore::empty())
		.with_no_client_auth();
		let connector = HttpsConnectorBuilder::new()
			.with_tls_config(tls)
			.https_only()
			.enable_http2()
			.build();

		ApnsSender {
			client: Client::builder(TokioExecutor::new()).http2_only(true).build(connector),
			signer: Arc::new(TokenSigner::from_config(&config).unwrap()),
			base_url: base_url.into(),
			bundle_id: config.bundle_id,
			timeout,
		}
	}

	#[tokio::test]
	async fn test_silent_gateway_times_out() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		// Accept and hold connections without ever answering
		let server = tokio::spawn(async move {
			let mut held = Vec::new();
			while let Ok((socket, _)) = listener.accept().await {
				held.push(socket);
			}
		});

		let sender = local_sender(format!("https://{}", addr), Duration::from_millis(300));
		let res = sender.send("abc123", "title", "body").await;
		server.abort();

		match res {
			Err(err @ Error::TransportFailure(_)) => {
				assert!(!err.is_sweep_fatal());
				assert!(err.to_string().contains("300ms"), "message: {}", err);
			}
			other => panic!("unexpected {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_refused_connection_is_transport_failure() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let sender = local_sender(format!("https://{}", addr), Duration::from_secs(5));
		match sender.send("abc123", "title", "body").await {
			Err(err @ Error::TransportFailure(_)) => {
				assert!(!err.is_sweep_fatal());
				assert!(err.to_string().contains("Network error"), "message: {}", err);
			}
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn test_payload_format() {
		let payload = build_payload("Verse of the Day", "Be still — Psalm 46:10").unwrap();
		let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"aps": {
					"alert": { "title": "Verse of the Day", "body": "Be still — Psalm 46:10" },
					"sound": "default"
				}
			})
		);
	}

	#[test]
	fn test_request_format() {
		let payload = build_payload("t", "b").unwrap();
		let request = build_request(
			"https://api.sandbox.push.apple.com",
			"abc123",
			"com.example.dailyverse",
			"eyJ.token.sig",
			payload,
		)
		.unwrap();

		assert_eq!(*request.method(), hyper::Method::POST);
		assert_eq!(request.uri(), "https://api.sandbox.push.apple.com/3/device/abc123");
		let headers = request.headers();
		assert_eq!(headers["authorization"], "bearer eyJ.token.sig");
		assert_eq!(headers["apns-topic"], "com.example.dailyverse");
		assert_eq!(headers["content-type"], "application/json");
	}

	#[test]
	fn test_invalid_device_token_fails_request_build() {
		let res = build_request("https://api.push.apple.com", "bad token", "b", "t", vec![]);
		assert!(matches!(res, Err(Error::Internal(_))));
	}

	#[test]
	fn test_only_200_is_success() {
		assert!(check_response(StatusCode::OK, b"").is_ok());

		match check_response(StatusCode::GONE, br#"{"reason":"Unregistered"}"#) {
			Err(Error::DeliveryFailure { status, body }) => {
				assert_eq!(status, 410);
				assert_eq!(body.as_ref(), r#"{"reason":"Unregistered"}"#);
			}
			other => panic!("unexpected {:?}", other),
		}

		assert!(matches!(
			check_response(StatusCode::ACCEPTED, b""),
			Err(Error::DeliveryFailure { status: 202, .. })
		));
	}
}

// vim: ts=4
