// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-client session state: application, locale, referrer and visitor.

use std::sync::RwLock;
use std::time::Duration;

use apalize_core::ApplicationId;
use tokio::sync::watch;

use crate::error::ResolveError;

/// Session state shared by the resolver and the reporter.
#[derive(Debug)]
pub struct SessionContext {
	application_id: ApplicationId,
	referrer: Option<String>,
	locale: RwLock<Option<String>>,
	visitor_id: watch::Sender<Option<String>>,
}

impl SessionContext {
	pub fn new(
		application_id: ApplicationId,
		locale: Option<String>,
		referrer: Option<String>,
	) -> Self {
		let (visitor_id, _) = watch::channel(None);
		Self {
			application_id,
			referrer,
			locale: RwLock::new(locale),
			visitor_id,
		}
	}

	pub fn application_id(&self) -> &ApplicationId {
		&self.application_id
	}

	pub fn referrer(&self) -> Option<&str> {
		self.referrer.as_deref()
	}

	/// The active locale.
	pub fn locale(&self) -> Result<Option<String>, ResolveError> {
		self.locale
			.read()
			.map(|locale| locale.clone())
			.map_err(|_| ResolveError::StatePoisoned("session"))
	}

	/// Replaces the active locale for all later lookups.
	pub fn set_locale(&self, locale: Option<String>) {
		match self.locale.write() {
			Ok(mut guard) => *guard = locale,
			Err(poisoned) => *poisoned.into_inner() = locale,
		}
	}

	/// The visitor identifier, once identification has completed.
	pub fn visitor_id(&self) -> Option<String> {
		self.visitor_id.borrow().clone()
	}

	/// Records the visitor identifier. Only the first call has an effect.
	///
	/// Returns true if the identifier was stored.
	pub fn set_visitor_id(&self, id: impl Into<String>) -> bool {
		let id = id.into();
		self.visitor_id.send_if_modified(|current| {
			if current.is_some() {
				return false;
			}
			*current = Some(id);
			true
		})
	}

	/// Waits up to `timeout` for the visitor identifier.
	///
	/// Returns whatever is known when the wait ends, which may be `None`.
	pub async fn wait_for_visitor_id(&self, timeout: Duration) -> Option<String> {
		let mut rx = self.visitor_id.subscribe();
		let id = match tokio::time::timeout(timeout, rx.wait_for(|id| id.is_some())).await {
			Ok(Ok(id)) => (*id).clone(),
			_ => None,
		};
		id.or_else(|| self.visitor_id())
	}
}
