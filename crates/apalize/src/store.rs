// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory translation store.

use std::sync::{Arc, RwLock};

use apalize_core::{Translation, TranslationDocument};

use crate::error::ResolveError;

/// Outcome of a store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
	/// Nothing has been loaded yet.
	NotLoaded,
	/// Loaded, but no entry has this key.
	Absent,
	/// The key exists but has no value for the requested locale.
	Untranslated,
	/// The stored value. May be empty.
	Found(String),
}

/// Translations loaded from the service.
///
/// The store starts out unloaded and is replaced as a whole by
/// [`TranslationStore::replace`]; readers never observe a partial load.
#[derive(Debug, Default)]
pub struct TranslationStore {
	translations: RwLock<Option<Arc<Vec<Translation>>>>,
}

impl TranslationStore {
	/// Creates an unloaded store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Atomically replaces the contents with a freshly fetched document.
	///
	/// Keys are re-normalized before they are stored. Returns the number of
	/// translations now held.
	pub fn replace(&self, document: TranslationDocument) -> Result<usize, ResolveError> {
		let translations = document.normalized().translations;
		let count = translations.len();

		let mut guard = self
			.translations
			.write()
			.map_err(|_| ResolveError::StatePoisoned("store"))?;
		*guard = Some(Arc::new(translations));

		Ok(count)
	}

	/// Looks up `slug` for `locale`. The first entry with a matching key wins.
	pub fn lookup(&self, slug: &str, locale: Option<&str>) -> Result<Lookup, ResolveError> {
		let guard = self
			.translations
			.read()
			.map_err(|_| ResolveError::StatePoisoned("store"))?;

		let Some(translations) = guard.as_ref() else {
			return Ok(Lookup::NotLoaded);
		};

		let Some(translation) = translations.iter().find(|t| t.key == slug) else {
			return Ok(Lookup::Absent);
		};

		Ok(match translation.value_for(locale) {
			Some(value) => Lookup::Found(value.to_string()),
			None => Lookup::Untranslated,
		})
	}

	/// Returns true once a load has succeeded.
	pub fn is_loaded(&self) -> bool {
		self.translations
			.read()
			.map(|guard| guard.is_some())
			.unwrap_or(false)
	}

	/// Returns the loaded translations, or `None` before the first load.
	pub fn snapshot(&self) -> Option<Arc<Vec<Translation>>> {
		self.translations
			.read()
			.ok()
			.and_then(|guard| guard.as_ref().map(Arc::clone))
	}

	/// Number of loaded translations (zero when unloaded).
	pub fn len(&self) -> usize {
		self.snapshot().map_or(0, |t| t.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn document(translations: Vec<Translation>) -> TranslationDocument {
		TranslationDocument { translations }
	}

	#[test]
	fn new_store_is_not_loaded() {
		let store = TranslationStore::new();
		assert!(!store.is_loaded());
		assert!(store.snapshot().is_none());
		assert_eq!(store.lookup("anything", Some("en")).unwrap(), Lookup::NotLoaded);
	}

	#[test]
	fn empty_load_is_loaded_but_missing() {
		let store = TranslationStore::new();
		assert_eq!(store.replace(document(vec![])).unwrap(), 0);

		assert!(store.is_loaded());
		assert!(store.is_empty());
		assert_eq!(store.lookup("anything", None).unwrap(), Lookup::Absent);
	}

	#[test]
	fn finds_scalar_and_localized_values() {
		let store = TranslationStore::new();
		store
			.replace(document(vec![
				Translation::scalar("welcome-message", "Hi there"),
				Translation::localized("sign-in", [("en", "Sign in"), ("fr", "Connexion")]),
			]))
			.unwrap();

		assert_eq!(
			store.lookup("welcome-message", None).unwrap(),
			Lookup::Found("Hi there".to_string())
		);
		assert_eq!(
			store.lookup("sign-in", Some("fr")).unwrap(),
			Lookup::Found("Connexion".to_string())
		);
		assert_eq!(store.lookup("sign-in", Some("de")).unwrap(), Lookup::Untranslated);
		assert_eq!(store.lookup("sign-in", None).unwrap(), Lookup::Untranslated);
		assert_eq!(store.lookup("sign-out", Some("fr")).unwrap(), Lookup::Absent);
	}

	#[test]
	fn empty_value_is_found() {
		let store = TranslationStore::new();
		store
			.replace(document(vec![Translation::scalar("blank", "")]))
			.unwrap();

		assert_eq!(store.lookup("blank", None).unwrap(), Lookup::Found(String::new()));
	}

	#[test]
	fn first_duplicate_key_wins() {
		let store = TranslationStore::new();
		store
			.replace(document(vec![
				Translation::scalar("dup", "first"),
				Translation::scalar("dup", "second"),
			]))
			.unwrap();

		assert_eq!(store.lookup("dup", None).unwrap(), Lookup::Found("first".to_string()));
	}

	#[test]
	fn raw_service_keys_are_normalized() {
		let store = TranslationStore::new();
		store
			.replace(document(vec![Translation::scalar("Welcome Message", "Hi")]))
			.unwrap();

		assert_eq!(
			store.lookup("welcome-message", None).unwrap(),
			Lookup::Found("Hi".to_string())
		);
	}

	#[test]
	fn replace_swaps_whole_contents() {
		let store = TranslationStore::new();
		store
			.replace(document(vec![Translation::scalar("old", "1")]))
			.unwrap();
		let before = store.snapshot().unwrap();

		store
			.replace(document(vec![Translation::scalar("new", "2")]))
			.unwrap();

		assert_eq!(before.len(), 1);
		assert_eq!(before[0].key, "old");
		assert_eq!(store.lookup("old", None).unwrap(), Lookup::Absent);
		assert_eq!(store.len(), 1);
	}
}
