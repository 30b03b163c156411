// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation documents served by the translation service.
//!
//! Two entry shapes exist and both are accepted on the same document:
//!
//! ```json
//! {"translations": [
//!   {"key": "welcome-message", "value": "Hi there"},
//!   {"key": "sign-in", "values": [{"locale": "en", "value": "Sign in"}, {"locale": "fr", "value": "Connexion"}]}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// A single value of a translation for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationValue {
	pub locale: String,
	pub value: String,
}

impl TranslationValue {
	pub fn new(locale: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			locale: locale.into(),
			value: value.into(),
		}
	}
}

/// The payload of a translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationContent {
	/// Locale-aware entry with one value per locale.
	Localized { values: Vec<TranslationValue> },
	/// Locale-less entry with a single value.
	Scalar { value: String },
}

/// A translation entry addressed by its normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
	pub key: String,
	#[serde(flatten)]
	pub content: TranslationContent,
}

impl Translation {
	/// Creates a locale-less translation.
	pub fn scalar(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			content: TranslationContent::Scalar {
				value: value.into(),
			},
		}
	}

	/// Creates a locale-aware translation from `(locale, value)` pairs.
	pub fn localized<L, V>(key: impl Into<String>, values: impl IntoIterator<Item = (L, V)>) -> Self
	where
		L: Into<String>,
		V: Into<String>,
	{
		Self {
			key: key.into(),
			content: TranslationContent::Localized {
				values: values
					.into_iter()
					.map(|(locale, value)| TranslationValue::new(locale, value))
					.collect(),
			},
		}
	}

	/// Selects the value to serve for `locale`.
	///
	/// Scalar entries answer every locale, including none. Localized entries
	/// answer only an exact locale match; the first matching entry wins.
	pub fn value_for(&self, locale: Option<&str>) -> Option<&str> {
		match &self.content {
			TranslationContent::Scalar { value } => Some(value),
			TranslationContent::Localized { values } => {
				let locale = locale?;
				values
					.iter()
					.find(|v| v.locale == locale)
					.map(|v| v.value.as_str())
			}
		}
	}

	/// Locales this entry has a value for. Empty for scalar entries.
	pub fn locales(&self) -> impl Iterator<Item = &str> {
		let values: &[TranslationValue] = match &self.content {
			TranslationContent::Localized { values } => values,
			TranslationContent::Scalar { .. } => &[],
		};
		values.iter().map(|v| v.locale.as_str())
	}
}

/// Response body of `GET {base_url}/{application_id}.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationDocument {
	pub translations: Vec<Translation>,
}

impl TranslationDocument {
	/// Re-normalizes every key so lookups by slug always hit.
	///
	/// Order is preserved, so duplicate keys keep first-match-wins semantics.
	pub fn normalized(mut self) -> Self {
		for translation in &mut self.translations {
			translation.key = slugify(&translation.key);
		}
		self
	}

	pub fn len(&self) -> usize {
		self.translations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.translations.is_empty()
	}
}
