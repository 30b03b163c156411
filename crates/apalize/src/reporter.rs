// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reporting of missing keys back to the translation service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use apalize_core::MissingKeyReport;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::TranslationBackend;
use crate::collector::MissingKeyCollector;
use crate::error::Result;
use crate::session::SessionContext;

/// Configuration for the deferred missing-key report.
#[derive(Debug, Clone)]
pub struct ReportConfig {
	/// Delay between client start and the report.
	pub report_delay: Duration,
	/// How long the report waits for visitor identification once the delay
	/// has elapsed.
	pub identify_timeout: Duration,
}

impl Default for ReportConfig {
	fn default() -> Self {
		Self {
			report_delay: Duration::from_secs(10),
			identify_timeout: Duration::from_secs(2),
		}
	}
}

/// Sends pending missing-key records to the backend.
pub struct MissingKeyReporter {
	backend: Arc<dyn TranslationBackend>,
	collector: Arc<MissingKeyCollector>,
	session: Arc<SessionContext>,
	flush_lock: Mutex<()>,
}

impl MissingKeyReporter {
	pub fn new(
		backend: Arc<dyn TranslationBackend>,
		collector: Arc<MissingKeyCollector>,
		session: Arc<SessionContext>,
	) -> Self {
		Self {
			backend,
			collector,
			session,
			flush_lock: Mutex::new(()),
		}
	}

	/// Sends every pending record in one request.
	///
	/// Does nothing when nothing is pending. Records are marked sent only when
	/// the backend accepts them; on error they stay pending. Returns the number
	/// of records sent.
	pub async fn flush(&self) -> Result<usize> {
		let _guard = self.flush_lock.lock().await;

		let translations = self.collector.pending();
		if translations.is_empty() {
			return Ok(0);
		}

		let count = translations.len();
		let report = MissingKeyReport {
			translations,
			visitor_id: self.session.visitor_id(),
			referrer: self.session.referrer().map(str::to_string),
		};

		debug!(count, visitor_id = ?report.visitor_id, "Flushing missing translations");
		self.backend
			.submit_missing(self.session.application_id(), &report)
			.await?;

		self.collector.mark_sent(count);
		Ok(count)
	}

	/// Waits for the visitor identifier, bounded by `identify_timeout`, then
	/// flushes.
	pub async fn flush_after_identification(&self, identify_timeout: Duration) -> Result<usize> {
		if self.collector.pending_len() == 0 {
			return Ok(0);
		}

		if self
			.session
			.wait_for_visitor_id(identify_timeout)
			.await
			.is_none()
		{
			debug!("Visitor identification still pending, reporting without visitor ID");
		}

		self.flush().await
	}
}

/// A one-shot deferred report.
///
/// The report runs once, `report_delay` after scheduling. Dropping the
/// scheduler cancels a report that has not fired yet.
#[derive(Debug)]
pub struct ReportScheduler {
	fired: Arc<AtomicBool>,
	task_handle: Option<JoinHandle<()>>,
}

impl ReportScheduler {
	/// Spawns the deferred report on the current tokio runtime.
	pub fn schedule(reporter: Arc<MissingKeyReporter>, config: ReportConfig) -> Self {
		let fired = Arc::new(AtomicBool::new(false));
		let fired_flag = Arc::clone(&fired);

		let handle = tokio::spawn(async move {
			tokio::time::sleep(config.report_delay).await;
			fired_flag.store(true, Ordering::SeqCst);

			match reporter
				.flush_after_identification(config.identify_timeout)
				.await
			{
				Ok(0) => debug!("No missing translations to report"),
				Ok(count) => info!(count, "Reported missing translations"),
				Err(e) => warn!(error = %e, "Failed to report missing translations"),
			}
		});

		Self {
			fired,
			task_handle: Some(handle),
		}
	}

	/// Returns true once the delay has elapsed and the report has started.
	pub fn has_fired(&self) -> bool {
		self.fired.load(Ordering::SeqCst)
	}

	/// Cancels the report if it has not completed yet.
	pub fn cancel(&mut self) {
		if let Some(handle) = self.task_handle.take() {
			handle.abort();
		}
	}

	/// Waits for the report task to finish.
	pub async fn join(mut self) {
		if let Some(handle) = self.task_handle.take() {
			let _ = handle.await;
		}
	}
}

impl Drop for ReportScheduler {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ApalizeError;
	use apalize_core::{ApplicationId, MissingTranslation, SchemaVariant, TranslationDocument};
	use async_trait::async_trait;
	use std::sync::atomic::AtomicUsize;

	struct MockBackend {
		reports: Mutex<Vec<MissingKeyReport>>,
		calls: AtomicUsize,
		should_fail: AtomicBool,
	}

	impl MockBackend {
		fn new() -> Self {
			Self {
				reports: Mutex::new(Vec::new()),
				calls: AtomicUsize::new(0),
				should_fail: AtomicBool::new(false),
			}
		}

		async fn reports(&self) -> Vec<MissingKeyReport> {
			self.reports.lock().await.clone()
		}
	}

	#[async_trait]
	impl TranslationBackend for MockBackend {
		async fn fetch_translations(&self, _: &ApplicationId) -> Result<TranslationDocument> {
			Ok(TranslationDocument::default())
		}

		async fn submit_missing(&self, _: &ApplicationId, report: &MissingKeyReport) -> Result<()> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if self.should_fail.load(Ordering::SeqCst) {
				return Err(ApalizeError::ServerError {
					status: 500,
					message: "mock failure".to_string(),
				});
			}
			self.reports.lock().await.push(report.clone());
			Ok(())
		}
	}

	struct Fixture {
		backend: Arc<MockBackend>,
		collector: Arc<MissingKeyCollector>,
		session: Arc<SessionContext>,
		reporter: Arc<MissingKeyReporter>,
	}

	fn fixture() -> Fixture {
		let backend = Arc::new(MockBackend::new());
		let collector = Arc::new(MissingKeyCollector::new());
		let session = Arc::new(SessionContext::new(
			ApplicationId::new("app").unwrap(),
			Some("en".to_string()),
			Some("https://example.com/checkout".to_string()),
		));
		let reporter = Arc::new(MissingKeyReporter::new(
			backend.clone(),
			Arc::clone(&collector),
			Arc::clone(&session),
		));
		Fixture {
			backend,
			collector,
			session,
			reporter,
		}
	}

	fn record(key: &str) -> MissingTranslation {
		MissingTranslation::for_request(SchemaVariant::Localized, key, key, None, None)
	}

	#[tokio::test]
	async fn flush_with_nothing_pending_makes_no_call() {
		let f = fixture();

		assert_eq!(f.reporter.flush().await.unwrap(), 0);
		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn flush_sends_pending_with_visitor_and_referrer() {
		let f = fixture();
		f.session.set_visitor_id("visitor-1");
		f.collector.record_if_absent(record("a")).unwrap();
		f.collector.record_if_absent(record("b")).unwrap();

		assert_eq!(f.reporter.flush().await.unwrap(), 2);

		let reports = f.backend.reports().await;
		assert_eq!(reports.len(), 1);
		assert_eq!(reports[0].translations.len(), 2);
		assert_eq!(reports[0].visitor_id.as_deref(), Some("visitor-1"));
		assert_eq!(
			reports[0].referrer.as_deref(),
			Some("https://example.com/checkout")
		);
	}

	#[tokio::test]
	async fn successful_flush_is_not_resent() {
		let f = fixture();
		f.collector.record_if_absent(record("a")).unwrap();

		f.reporter.flush().await.unwrap();
		assert_eq!(f.reporter.flush().await.unwrap(), 0);
		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 1);

		f.collector.record_if_absent(record("b")).unwrap();
		f.reporter.flush().await.unwrap();

		let reports = f.backend.reports().await;
		assert_eq!(reports.len(), 2);
		assert_eq!(reports[1].translations.len(), 1);
		assert_eq!(reports[1].translations[0].key, "b");
	}

	#[tokio::test]
	async fn failed_flush_keeps_records_pending() {
		let f = fixture();
		f.collector.record_if_absent(record("a")).unwrap();
		f.backend.should_fail.store(true, Ordering::SeqCst);

		let result = f.reporter.flush().await;
		assert!(matches!(result, Err(ApalizeError::ServerError { status: 500, .. })));
		assert_eq!(f.collector.pending_len(), 1);

		f.backend.should_fail.store(false, Ordering::SeqCst);
		assert_eq!(f.reporter.flush().await.unwrap(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn scheduler_fires_once_after_delay() {
		let f = fixture();
		f.session.set_visitor_id("visitor-1");
		f.collector.record_if_absent(record("a")).unwrap();

		let scheduler = ReportScheduler::schedule(Arc::clone(&f.reporter), ReportConfig::default());

		tokio::time::sleep(Duration::from_secs(9)).await;
		assert!(!scheduler.has_fired());
		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);

		tokio::time::sleep(Duration::from_secs(2)).await;
		assert!(scheduler.has_fired());
		scheduler.join().await;

		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 1);
		assert_eq!(f.collector.pending_len(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn scheduler_waits_for_visitor_id() {
		let f = fixture();
		f.collector.record_if_absent(record("a")).unwrap();

		let scheduler = ReportScheduler::schedule(
			Arc::clone(&f.reporter),
			ReportConfig {
				report_delay: Duration::from_secs(10),
				identify_timeout: Duration::from_secs(5),
			},
		);

		tokio::time::sleep(Duration::from_secs(11)).await;
		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);

		f.session.set_visitor_id("late-visitor");
		scheduler.join().await;

		let reports = f.backend.reports().await;
		assert_eq!(reports.len(), 1);
		assert_eq!(reports[0].visitor_id.as_deref(), Some("late-visitor"));
	}

	#[tokio::test(start_paused = true)]
	async fn scheduler_reports_without_visitor_after_timeout() {
		let f = fixture();
		f.collector.record_if_absent(record("a")).unwrap();

		let scheduler = ReportScheduler::schedule(Arc::clone(&f.reporter), ReportConfig::default());
		scheduler.join().await;

		let reports = f.backend.reports().await;
		assert_eq!(reports.len(), 1);
		assert_eq!(reports[0].visitor_id, None);
	}

	#[tokio::test(start_paused = true)]
	async fn scheduler_with_nothing_pending_makes_no_call() {
		let f = fixture();

		let scheduler = ReportScheduler::schedule(Arc::clone(&f.reporter), ReportConfig::default());
		scheduler.join().await;

		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn cancelled_scheduler_never_reports() {
		let f = fixture();
		f.collector.record_if_absent(record("a")).unwrap();

		let mut scheduler =
			ReportScheduler::schedule(Arc::clone(&f.reporter), ReportConfig::default());
		scheduler.cancel();

		tokio::time::sleep(Duration::from_secs(30)).await;
		assert!(!scheduler.has_fired());
		assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
	}
}
