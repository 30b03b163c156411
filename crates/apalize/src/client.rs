// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use apalize_core::{ApplicationId, MissingTranslation, SchemaVariant, Substitution, Translation};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{HttpBackend, TranslationBackend, DEFAULT_BASE_URL, SDK_NAME, SDK_VERSION};
use crate::collector::MissingKeyCollector;
use crate::error::{ApalizeError, ResolveError, Result};
use crate::reporter::{MissingKeyReporter, ReportConfig, ReportScheduler};
use crate::resolver::{Resolution, Resolver, ResolverOptions};
use crate::session::SessionContext;
use crate::store::TranslationStore;
use crate::visitor::{RandomVisitorId, SharedVisitorIdentifier, VisitorIdentifier};

/// Configuration for the translation client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Timeout for HTTP requests.
	pub request_timeout: Duration,
	/// Deferred missing-key report settings.
	pub report: ReportConfig,
	/// Resolution settings.
	pub resolver: ResolverOptions,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
			report: ReportConfig::default(),
			resolver: ResolverOptions::default(),
		}
	}
}

/// Builder for constructing an [`ApalizeClient`].
pub struct ApalizeClientBuilder {
	application_id: Option<String>,
	base_url: Option<String>,
	locale: Option<String>,
	referrer: Option<String>,
	config: ClientConfig,
	backend: Option<Arc<dyn TranslationBackend>>,
	visitor_identifier: Option<SharedVisitorIdentifier>,
}

impl ApalizeClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			application_id: None,
			base_url: None,
			locale: None,
			referrer: None,
			config: ClientConfig::default(),
			backend: None,
			visitor_identifier: None,
		}
	}

	/// Sets the application ID translations are fetched for. Required.
	pub fn application_id(mut self, id: impl Into<String>) -> Self {
		self.application_id = Some(id.into());
		self
	}

	/// Sets the base URL of the translation API.
	///
	/// Defaults to `https://api.apalize.com/public`.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	/// Sets the initial locale.
	pub fn locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());
		self
	}

	/// Sets the page or location reported alongside missing keys.
	pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
		self.referrer = Some(referrer.into());
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Sets the delay before missing keys are reported.
	pub fn report_delay(mut self, delay: Duration) -> Self {
		self.config.report.report_delay = delay;
		self
	}

	/// Sets how long the report waits for visitor identification.
	pub fn identify_timeout(mut self, timeout: Duration) -> Self {
		self.config.report.identify_timeout = timeout;
		self
	}

	/// Sets the shape of missing-key records.
	pub fn schema(mut self, schema: SchemaVariant) -> Self {
		self.config.resolver.schema = schema;
		self
	}

	/// Sets how repeated placeholders are substituted.
	pub fn substitution(mut self, substitution: Substitution) -> Self {
		self.config.resolver.substitution = substitution;
		self
	}

	/// Uses a custom transport instead of HTTP. `base_url` is ignored.
	pub fn backend(mut self, backend: impl TranslationBackend + 'static) -> Self {
		self.backend = Some(Arc::new(backend));
		self
	}

	/// Uses a custom visitor identifier. Defaults to [`RandomVisitorId`].
	pub fn visitor_identifier(mut self, identifier: impl VisitorIdentifier) -> Self {
		self.visitor_identifier = Some(Arc::new(identifier));
		self
	}

	/// Builds the client without loading translations or starting background
	/// work. The store stays unloaded until [`ApalizeClient::load`] succeeds.
	pub fn build(self) -> Result<ApalizeClient> {
		let application_id = self
			.application_id
			.ok_or(ApalizeError::MissingApplicationId)?;
		let application_id = ApplicationId::new(application_id)?;

		let backend: Arc<dyn TranslationBackend> = match self.backend {
			Some(backend) => backend,
			None => {
				let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
				Arc::new(HttpBackend::new(base_url, self.config.request_timeout)?)
			}
		};

		let visitor_identifier = self
			.visitor_identifier
			.unwrap_or_else(|| Arc::new(RandomVisitorId::new()));

		let store = Arc::new(TranslationStore::new());
		let collector = Arc::new(MissingKeyCollector::new());
		let session = Arc::new(SessionContext::new(
			application_id.clone(),
			self.locale,
			self.referrer,
		));

		let resolver = Resolver::new(
			Arc::clone(&store),
			Arc::clone(&collector),
			Arc::clone(&session),
			self.config.resolver,
		);
		let reporter = Arc::new(MissingKeyReporter::new(
			Arc::clone(&backend),
			Arc::clone(&collector),
			Arc::clone(&session),
		));

		let inner = Arc::new(ClientInner {
			backend,
			visitor_identifier,
			store,
			collector,
			session,
			resolver,
			reporter,
			config: self.config,
			tasks: Mutex::new(BackgroundTasks::default()),
			closed: AtomicBool::new(false),
		});

		info!(
			application_id = %application_id,
			sdk_name = SDK_NAME,
			sdk_version = SDK_VERSION,
			"Translation client initialized"
		);

		Ok(ApalizeClient { inner })
	}

	/// Builds the client, loads translations, starts visitor identification
	/// and schedules the missing-key report.
	///
	/// A failed load is logged and not returned: the client still works and
	/// serves fallbacks. Only configuration errors fail this call.
	pub async fn init(self) -> Result<ApalizeClient> {
		let client = self.build()?;

		if let Err(e) = client.load().await {
			warn!(
				application_id = %client.application_id(),
				error = %e,
				"Failed to load translations"
			);
		}

		client.start_background_tasks();
		Ok(client)
	}
}

impl Default for ApalizeClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Default)]
struct BackgroundTasks {
	identification: Option<JoinHandle<()>>,
	report: Option<ReportScheduler>,
}

/// Internal client state.
struct ClientInner {
	backend: Arc<dyn TranslationBackend>,
	visitor_identifier: SharedVisitorIdentifier,
	store: Arc<TranslationStore>,
	collector: Arc<MissingKeyCollector>,
	session: Arc<SessionContext>,
	resolver: Resolver,
	reporter: Arc<MissingKeyReporter>,
	config: ClientConfig,
	tasks: Mutex<BackgroundTasks>,
	closed: AtomicBool,
}

impl Drop for ClientInner {
	fn drop(&mut self) {
		if let Ok(tasks) = self.tasks.get_mut() {
			if let Some(handle) = tasks.identification.take() {
				handle.abort();
			}
		}
	}
}

/// Client for serving translations of one application.
///
/// Each client owns its own store, missing-key list and session, so several
/// clients can coexist in one process. Cloning is cheap and clones share
/// state.
///
/// # Example
///
/// ```ignore
/// use std::collections::HashMap;
/// use apalize::ApalizeClient;
///
/// let client = ApalizeClient::builder()
///     .application_id("3f2b9c1e")
///     .locale("fr")
///     .init()
///     .await?;
///
/// let title = client.t("Welcome Message", None, None);
///
/// let vars = HashMap::from([("name".to_string(), "Ann".to_string())]);
/// let greeting = client.translate("Greeting", Some(&vars), Some("Hello {name}"));
///
/// client.set_locale("de");
/// ```
#[derive(Clone)]
pub struct ApalizeClient {
	inner: Arc<ClientInner>,
}

impl ApalizeClient {
	/// Creates a new builder for constructing an ApalizeClient.
	pub fn builder() -> ApalizeClientBuilder {
		ApalizeClientBuilder::new()
	}

	/// Fetches translations and replaces the store.
	///
	/// On failure the store is left as it was. Returns the number of
	/// translations loaded.
	pub async fn load(&self) -> Result<usize> {
		self.check_closed()?;

		let application_id = self.inner.session.application_id();
		let document = self.inner.backend.fetch_translations(application_id).await?;
		let count = self.inner.store.replace(document)?;

		info!(application_id = %application_id, count, "Translations loaded");
		Ok(count)
	}

	/// Translates `key` for the active locale.
	///
	/// Never fails: when there is no translation the result is
	/// `default_value`, or `key` itself. `{name}` placeholders are replaced from
	/// `variables`.
	pub fn translate(
		&self,
		key: &str,
		variables: Option<&HashMap<String, String>>,
		default_value: Option<&str>,
	) -> String {
		self.inner.resolver.translate(key, variables, default_value)
	}

	/// Alias for [`ApalizeClient::translate`].
	pub fn t(
		&self,
		key: &str,
		variables: Option<&HashMap<String, String>>,
		default_value: Option<&str>,
	) -> String {
		self.translate(key, variables, default_value)
	}

	/// Like [`ApalizeClient::translate`] but reports why resolution failed.
	pub fn resolve(
		&self,
		key: &str,
		variables: Option<&HashMap<String, String>>,
		default_value: Option<&str>,
	) -> std::result::Result<Resolution, ResolveError> {
		self.inner.resolver.resolve(key, variables, default_value)
	}

	/// Changes the active locale for subsequent translations.
	pub fn set_locale(&self, locale: impl Into<String>) {
		let locale = locale.into();
		debug!(locale = %locale, "Locale changed");
		self.inner.session.set_locale(Some(locale));
	}

	/// Clears the active locale.
	pub fn clear_locale(&self) {
		self.inner.session.set_locale(None);
	}

	/// The active locale.
	pub fn locale(&self) -> Option<String> {
		self.inner.session.locale().ok().flatten()
	}

	/// Snapshot of the loaded translations, or `None` before the first load.
	pub fn translations(&self) -> Option<Vec<Translation>> {
		self.inner.store.snapshot().map(|t| t.to_vec())
	}

	/// Returns true once translations have been loaded.
	pub fn is_loaded(&self) -> bool {
		self.inner.store.is_loaded()
	}

	/// Every missing-key record collected so far.
	pub fn missing_translations(&self) -> Vec<MissingTranslation> {
		self.inner.collector.records()
	}

	/// Sends pending missing keys now. Returns the number sent.
	pub async fn flush_missing(&self) -> Result<usize> {
		self.check_closed()?;
		self.inner.reporter.flush().await
	}

	pub fn application_id(&self) -> &ApplicationId {
		self.inner.session.application_id()
	}

	/// The visitor identifier, once identification has completed.
	pub fn visitor_id(&self) -> Option<String> {
		self.inner.session.visitor_id()
	}

	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// Starts visitor identification and schedules the missing-key report.
	///
	/// Called by [`ApalizeClientBuilder::init`]. Calling it again has no effect.
	/// Must be called from within a tokio runtime.
	pub fn start_background_tasks(&self) {
		let Ok(mut tasks) = self.inner.tasks.lock() else {
			return;
		};
		if tasks.report.is_some() || self.is_closed() {
			return;
		}

		let identifier = Arc::clone(&self.inner.visitor_identifier);
		let session = Arc::clone(&self.inner.session);
		tasks.identification = Some(tokio::spawn(async move {
			match identifier.identify().await {
				Ok(id) => {
					session.set_visitor_id(id);
					debug!("Visitor identified");
				}
				Err(e) => warn!(error = %e, "Visitor identification failed"),
			}
		}));

		tasks.report = Some(ReportScheduler::schedule(
			Arc::clone(&self.inner.reporter),
			self.inner.config.report.clone(),
		));
	}

	/// Stops background work. A report that has not fired is cancelled;
	/// translation keeps working.
	pub fn shutdown(&self) {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return;
		}

		if let Ok(mut tasks) = self.inner.tasks.lock() {
			if let Some(handle) = tasks.identification.take() {
				handle.abort();
			}
			if let Some(mut report) = tasks.report.take() {
				report.cancel();
			}
		}

		info!("Translation client shutdown");
	}

	/// Returns true if the client has been shut down.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	fn check_closed(&self) -> Result<()> {
		if self.is_closed() {
			return Err(ApalizeError::ClientShutdown);
		}
		Ok(())
	}
}
