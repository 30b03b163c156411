// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport to the translation service.
//!
//! [`TranslationBackend`] is the seam between the SDK and the network;
//! [`HttpBackend`] is the production implementation.

use std::time::Duration;

use apalize_core::{ApplicationId, MissingKeyReport, TranslationDocument};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::error::{ApalizeError, Result};

/// SDK version for identification.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
pub const SDK_NAME: &str = "apalize-rust";

/// Default base URL of the public translation API.
pub const DEFAULT_BASE_URL: &str = "https://api.apalize.com/public";

/// Fetches translations and receives missing-key reports.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
	/// Fetches the translation document for an application.
	async fn fetch_translations(&self, application_id: &ApplicationId)
		-> Result<TranslationDocument>;

	/// Sends a batch of missing keys. The response body is ignored.
	async fn submit_missing(
		&self,
		application_id: &ApplicationId,
		report: &MissingKeyReport,
	) -> Result<()>;
}

/// Returns the User-Agent sent with every request: `apalize-rust/{version}`.
pub fn user_agent() -> String {
	format!("{SDK_NAME}/{SDK_VERSION}")
}

/// Validates a base URL and strips trailing slashes.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
	let trimmed = base_url.trim().trim_end_matches('/');

	let url = Url::parse(trimmed).map_err(|e| ApalizeError::InvalidBaseUrl(e.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ApalizeError::InvalidBaseUrl(format!(
			"unsupported scheme '{}'",
			url.scheme()
		)));
	}

	Ok(trimmed.to_string())
}

/// HTTP implementation of [`TranslationBackend`].
///
/// - `GET {base_url}/{application_id}.json` loads translations.
/// - `PUT {base_url}/{application_id}` submits missing keys as JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
	base_url: String,
	http_client: Client,
}

impl HttpBackend {
	/// Creates a backend for `base_url` with the given request timeout.
	pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
		let base_url = normalize_base_url(base_url)?;

		let http_client = Client::builder()
			.user_agent(user_agent())
			.timeout(request_timeout)
			.build()
			.map_err(ApalizeError::RequestFailed)?;

		Ok(Self {
			base_url,
			http_client,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn translations_url(&self, application_id: &ApplicationId) -> String {
		format!("{}/{}.json", self.base_url, application_id)
	}

	fn report_url(&self, application_id: &ApplicationId) -> String {
		format!("{}/{}", self.base_url, application_id)
	}
}

async fn ensure_success(response: Response) -> Result<Response> {
	if response.status().is_success() {
		return Ok(response);
	}

	let status = response.status().as_u16();
	let message = response.text().await.unwrap_or_default();
	Err(ApalizeError::ServerError { status, message })
}

#[async_trait]
impl TranslationBackend for HttpBackend {
	async fn fetch_translations(
		&self,
		application_id: &ApplicationId,
	) -> Result<TranslationDocument> {
		let url = self.translations_url(application_id);
		debug!(url = %url, "Fetching translations");

		let response = self.http_client.get(&url).send().await?;
		let response = ensure_success(response).await?;

		let body = response.bytes().await?;
		let document: TranslationDocument = serde_json::from_slice(&body)?;
		Ok(document)
	}

	async fn submit_missing(
		&self,
		application_id: &ApplicationId,
		report: &MissingKeyReport,
	) -> Result<()> {
		let url = self.report_url(application_id);
		debug!(url = %url, count = report.translations.len(), "Submitting missing translations");

		let response = self.http_client.put(&url).json(report).send().await?;
		ensure_success(response).await?;
		Ok(())
	}
}
