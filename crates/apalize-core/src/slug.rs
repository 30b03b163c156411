// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation key normalization.
//!
//! Every key is reduced to a slug before it touches the store or the
//! missing-key collector, so `"Welcome Message"`, `"welcome  message"` and
//! `"WELCOME_MESSAGE"` all address the same translation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Separator used between words of a slug.
pub const SEPARATOR: char = '-';

/// Converts an arbitrary human-readable key into its canonical slug.
///
/// The slug contains only `[a-z0-9-]`, never starts or ends with a hyphen and
/// never contains two hyphens in a row. Accents are stripped (`Café` becomes
/// `cafe`); any other character outside ASCII letters and digits acts as a
/// word separator.
///
/// ```
/// use apalize_core::slugify;
///
/// assert_eq!(slugify("  Hello,   World! "), "hello-world");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// assert_eq!(slugify("nav.sign_in"), "nav-sign-in");
/// ```
pub fn slugify(raw: &str) -> String {
	let folded = raw.to_uppercase().to_lowercase();

	let mut slug = String::with_capacity(folded.len());
	let mut pending_separator = false;

	for c in folded.nfd().filter(|c| !is_combining_mark(*c)) {
		if c.is_ascii_alphanumeric() {
			if pending_separator && !slug.is_empty() {
				slug.push(SEPARATOR);
			}
			pending_separator = false;
			slug.push(c.to_ascii_lowercase());
		} else {
			pending_separator = true;
		}
	}

	slug
}

/// Returns true if `key` is already in canonical slug form.
pub fn is_slug(key: &str) -> bool {
	!key.starts_with(SEPARATOR)
		&& !key.ends_with(SEPARATOR)
		&& !key.contains("--")
		&& key
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == SEPARATOR)
}
