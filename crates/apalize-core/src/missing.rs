// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Missing-key records and the report sent back to the translation service.

use serde::{Deserialize, Serialize};

use crate::translation::TranslationValue;

/// Which translation schema missing-key records are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
	/// Records carry the requested default for the active locale.
	#[default]
	Localized,
	/// Records carry the raw key when normalization changed it.
	Scalar,
}

/// Context captured alongside a missing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissingContext {
	Localized {
		values: Vec<TranslationValue>,
	},
	Scalar {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<String>,
	},
}

/// A key that was requested but had no translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTranslation {
	pub key: String,
	#[serde(flatten)]
	pub context: MissingContext,
}

impl MissingTranslation {
	/// Builds the record for a lookup miss.
	///
	/// `slug` is the normalized form of `raw_key`. In the localized variant the
	/// record proposes `default_value` for `locale` only when both are known. In
	/// the scalar variant it keeps `raw_key` only when normalization altered it.
	pub fn for_request(
		variant: SchemaVariant,
		slug: &str,
		raw_key: &str,
		locale: Option<&str>,
		default_value: Option<&str>,
	) -> Self {
		let context = match variant {
			SchemaVariant::Localized => MissingContext::Localized {
				values: match (locale, default_value) {
					(Some(locale), Some(value)) => vec![TranslationValue::new(locale, value)],
					_ => Vec::new(),
				},
			},
			SchemaVariant::Scalar => MissingContext::Scalar {
				value: (slug != raw_key).then(|| raw_key.to_string()),
			},
		};

		Self {
			key: slug.to_string(),
			context,
		}
	}
}

/// Body of `PUT {base_url}/{application_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingKeyReport {
	pub translations: Vec<MissingTranslation>,
	pub visitor_id: Option<String>,
	pub referrer: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn localized_record_carries_default_for_active_locale() {
		let record = MissingTranslation::for_request(
			SchemaVariant::Localized,
			"greeting",
			"Greeting",
			Some("fr"),
			Some("Bonjour"),
		);

		assert_eq!(
			serde_json::to_value(&record).unwrap(),
			json!({"key": "greeting", "values": [{"locale": "fr", "value": "Bonjour"}]})
		);
	}

	#[test]
	fn localized_record_is_empty_without_locale_or_default() {
		for (locale, default) in [(None, Some("x")), (Some("en"), None), (None, None)] {
			let record =
				MissingTranslation::for_request(SchemaVariant::Localized, "k", "k", locale, default);
			assert_eq!(
				record.context,
				MissingContext::Localized { values: Vec::new() }
			);
		}
	}

	#[test]
	fn scalar_record_keeps_raw_key_only_when_changed() {
		let changed =
			MissingTranslation::for_request(SchemaVariant::Scalar, "sign-in", "Sign In", None, None);
		assert_eq!(
			serde_json::to_value(&changed).unwrap(),
			json!({"key": "sign-in", "value": "Sign In"})
		);

		let unchanged =
			MissingTranslation::for_request(SchemaVariant::Scalar, "sign-in", "sign-in", Some("en"), Some("x"));
		assert_eq!(serde_json::to_value(&unchanged).unwrap(), json!({"key": "sign-in"}));
	}

	#[test]
	fn report_serializes_null_visitor_and_referrer() {
		let report = MissingKeyReport {
			translations: vec![MissingTranslation::for_request(
				SchemaVariant::Localized,
				"foo",
				"Foo",
				None,
				None,
			)],
			visitor_id: None,
			referrer: None,
		};

		assert_eq!(
			serde_json::to_value(&report).unwrap(),
			json!({
				"translations": [{"key": "foo", "values": []}],
				"visitor_id": null,
				"referrer": null,
			})
		);
	}

	#[test]
	fn schema_variant_defaults_to_localized() {
		assert_eq!(SchemaVariant::default(), SchemaVariant::Localized);
	}
}
