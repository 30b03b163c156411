// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `{name}` placeholder substitution.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// How repeated placeholders are substituted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substitution {
	/// Every occurrence of `{name}` is replaced.
	#[default]
	All,
	/// Only the first occurrence of each `{name}` is replaced, for templates
	/// written against older clients.
	FirstOccurrence,
}

/// Replaces `{name}` placeholders in `template` with values from `variables`.
///
/// The template is scanned once from left to right, so substituted values are
/// never re-scanned for placeholders. Placeholders without a variable are left
/// as they are and variables not referenced by the template are ignored.
///
/// ```
/// use std::collections::HashMap;
/// use apalize_core::{interpolate, Substitution};
///
/// let vars = HashMap::from([("name".to_string(), "Ann".to_string())]);
/// assert_eq!(interpolate("Hello {name}, {other}", &vars, Substitution::All), "Hello Ann, {other}");
/// ```
pub fn interpolate(
	template: &str,
	variables: &HashMap<String, String>,
	mode: Substitution,
) -> String {
	if variables.is_empty() || !template.contains('{') {
		return template.to_string();
	}

	let mut out = String::with_capacity(template.len());
	let mut substituted: HashSet<&str> = HashSet::new();
	let mut rest = template;

	while let Some(open) = rest.find('{') {
		out.push_str(&rest[..open]);
		let after = &rest[open + 1..];

		// A placeholder ends at the first '}' unless another '{' comes first.
		if let Some(close) = after.find(['{', '}']) {
			if after[close..].starts_with('}') {
				if let Some((name, value)) = variables.get_key_value(&after[..close]) {
					let first = substituted.insert(name.as_str());
					if first || mode == Substitution::All {
						out.push_str(value);
						rest = &after[close + 1..];
						continue;
					}
				}
			}
		}

		out.push('{');
		rest = after;
	}

	out.push_str(rest);
	out
}
