// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deduplicated collection of keys that had no translation.

use std::collections::HashSet;
use std::sync::Mutex;

use apalize_core::MissingTranslation;

use crate::error::ResolveError;

#[derive(Debug, Default)]
struct CollectorState {
	records: Vec<MissingTranslation>,
	keys: HashSet<String>,
	/// Records before this index have been delivered.
	sent: usize,
}

/// Accumulates missing-key records until they are reported.
///
/// At most one record is kept per key; the first request for a key decides its
/// context. Records are only ever appended, and a watermark tracks which have
/// been delivered so a later flush never resends them.
#[derive(Debug, Default)]
pub struct MissingKeyCollector {
	state: Mutex<CollectorState>,
}

impl MissingKeyCollector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `record` unless a record with the same key already exists.
	///
	/// Returns true if the record was added.
	pub fn record_if_absent(&self, record: MissingTranslation) -> Result<bool, ResolveError> {
		let mut state = self
			.state
			.lock()
			.map_err(|_| ResolveError::StatePoisoned("collector"))?;

		if state.keys.contains(&record.key) {
			return Ok(false);
		}

		state.keys.insert(record.key.clone());
		state.records.push(record);
		Ok(true)
	}

	/// All records collected so far, sent or not.
	pub fn records(&self) -> Vec<MissingTranslation> {
		self.state
			.lock()
			.map(|state| state.records.clone())
			.unwrap_or_default()
	}

	/// Records not yet delivered, in the order they were first requested.
	pub fn pending(&self) -> Vec<MissingTranslation> {
		self.state
			.lock()
			.map(|state| state.records[state.sent..].to_vec())
			.unwrap_or_default()
	}

	/// Marks the first `count` pending records as delivered.
	pub fn mark_sent(&self, count: usize) {
		if let Ok(mut state) = self.state.lock() {
			state.sent = (state.sent + count).min(state.records.len());
		}
	}

	pub fn len(&self) -> usize {
		self.state.lock().map(|state| state.records.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn pending_len(&self) -> usize {
		self.state
			.lock()
			.map(|state| state.records.len() - state.sent)
			.unwrap_or(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use apalize_core::{MissingContext, SchemaVariant};
	use proptest::prelude::*;

	fn record(key: &str, default: Option<&str>) -> MissingTranslation {
		MissingTranslation::for_request(SchemaVariant::Localized, key, key, Some("en"), default)
	}

	#[test]
	fn first_record_per_key_wins() {
		let collector = MissingKeyCollector::new();

		assert!(collector.record_if_absent(record("foo", Some("first"))).unwrap());
		assert!(!collector.record_if_absent(record("foo", Some("second"))).unwrap());

		let records = collector.records();
		assert_eq!(records.len(), 1);
		match &records[0].context {
			MissingContext::Localized { values } => assert_eq!(values[0].value, "first"),
			other => panic!("unexpected context {other:?}"),
		}
	}

	#[test]
	fn keeps_request_order() {
		let collector = MissingKeyCollector::new();
		for key in ["b", "a", "c", "a"] {
			collector.record_if_absent(record(key, None)).unwrap();
		}

		let keys: Vec<_> = collector.records().into_iter().map(|r| r.key).collect();
		assert_eq!(keys, vec!["b", "a", "c"]);
	}

	#[test]
	fn mark_sent_advances_pending() {
		let collector = MissingKeyCollector::new();
		collector.record_if_absent(record("a", None)).unwrap();
		collector.record_if_absent(record("b", None)).unwrap();

		collector.mark_sent(2);
		assert_eq!(collector.pending_len(), 0);
		assert!(collector.pending().is_empty());
		assert_eq!(collector.len(), 2);

		collector.record_if_absent(record("c", None)).unwrap();
		let pending: Vec<_> = collector.pending().into_iter().map(|r| r.key).collect();
		assert_eq!(pending, vec!["c"]);
	}

	#[test]
	fn sent_keys_are_not_recorded_again() {
		let collector = MissingKeyCollector::new();
		collector.record_if_absent(record("a", None)).unwrap();
		collector.mark_sent(1);

		assert!(!collector.record_if_absent(record("a", None)).unwrap());
		assert_eq!(collector.pending_len(), 0);
	}

	#[test]
	fn mark_sent_is_clamped() {
		let collector = MissingKeyCollector::new();
		collector.record_if_absent(record("a", None)).unwrap();
		collector.mark_sent(10);
		assert_eq!(collector.pending_len(), 0);
	}

	proptest! {
		#[test]
		fn one_record_per_distinct_key(keys in prop::collection::vec("[a-d]", 0..40)) {
			let collector = MissingKeyCollector::new();
			for key in &keys {
				collector.record_if_absent(record(key, None)).unwrap();
			}

			let distinct: HashSet<_> = keys.iter().collect();
			prop_assert_eq!(collector.len(), distinct.len());
		}
	}
}
