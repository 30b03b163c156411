// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation resolution.
//!
//! For every request the resolver normalizes the key, looks it up for the
//! active locale, records a miss, picks the first available value out of
//! `stored value`, `default value` and `raw key`, and substitutes variables.

use std::collections::HashMap;
use std::sync::Arc;

use apalize_core::{interpolate, slugify, MissingTranslation, SchemaVariant, Substitution};
use tracing::{debug, error, warn};

use crate::collector::MissingKeyCollector;
use crate::error::ResolveError;
use crate::session::SessionContext;
use crate::store::{Lookup, TranslationStore};

/// Tunables for resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
	/// Shape of the missing-key records written on a miss.
	pub schema: SchemaVariant,
	/// How repeated placeholders are substituted.
	pub substitution: Substitution,
}

/// Where a resolved string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
	Store,
	Default,
	Key,
}

/// A successfully resolved translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	pub value: String,
	pub source: ResolutionSource,
	/// True if this request added a new missing-key record.
	pub recorded_missing: bool,
}

/// Resolves translation requests against a store.
#[derive(Debug, Clone)]
pub struct Resolver {
	store: Arc<TranslationStore>,
	collector: Arc<MissingKeyCollector>,
	session: Arc<SessionContext>,
	options: ResolverOptions,
}

impl Resolver {
	pub fn new(
		store: Arc<TranslationStore>,
		collector: Arc<MissingKeyCollector>,
		session: Arc<SessionContext>,
		options: ResolverOptions,
	) -> Self {
		Self {
			store,
			collector,
			session,
			options,
		}
	}

	/// Resolves `key`, reporting failures to the caller.
	///
	/// Returns [`ResolveError::NotLoaded`] without recording anything while the
	/// store is unloaded.
	pub fn resolve(
		&self,
		key: &str,
		variables: Option<&HashMap<String, String>>,
		default_value: Option<&str>,
	) -> Result<Resolution, ResolveError> {
		let slug = slugify(key);
		let locale = self.session.locale()?;

		let (stored, absent) = match self.store.lookup(&slug, locale.as_deref())? {
			Lookup::NotLoaded => return Err(ResolveError::NotLoaded),
			Lookup::Found(value) => (Some(value), false),
			Lookup::Untranslated => (None, false),
			Lookup::Absent => (None, true),
		};

		// Only unknown keys are reported. A key with no value for the active
		// locale falls back without a record, and an empty slug addresses nothing.
		let mut recorded_missing = false;
		if absent && !slug.is_empty() {
			let record = MissingTranslation::for_request(
				self.options.schema,
				&slug,
				key,
				locale.as_deref(),
				default_value,
			);
			recorded_missing = self.collector.record_if_absent(record)?;
			if recorded_missing {
				debug!(key = %slug, locale = ?locale, "Recorded missing translation");
			}
		}

		let (value, source) = match (stored, default_value) {
			(Some(value), _) => (value, ResolutionSource::Store),
			(None, Some(default)) => (default.to_string(), ResolutionSource::Default),
			(None, None) => (key.to_string(), ResolutionSource::Key),
		};

		let value = match variables {
			Some(vars) => interpolate(&value, vars, self.options.substitution),
			None => value,
		};

		Ok(Resolution {
			value,
			source,
			recorded_missing,
		})
	}

	/// Resolves `key` and always returns something displayable.
	///
	/// Failures are logged and fall back to `default_value`, then to `key`.
	pub fn translate(
		&self,
		key: &str,
		variables: Option<&HashMap<String, String>>,
		default_value: Option<&str>,
	) -> String {
		match self.resolve(key, variables, default_value) {
			Ok(resolution) => resolution.value,
			Err(ResolveError::NotLoaded) => {
				warn!(key = %key, "Translations are not loaded, using fallback");
				default_value.unwrap_or(key).to_string()
			}
			Err(e) => {
				error!(error = %e, key = %key, "Failed to resolve translation");
				default_value.unwrap_or(key).to_string()
			}
		}
	}

	pub fn options(&self) -> ResolverOptions {
		self.options
	}
}
