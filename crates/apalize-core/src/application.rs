// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Identifier of an application registered with the translation service.
///
/// The identifier is interpolated into request paths
/// (`{base_url}/{application_id}.json`), so it is restricted to characters that
/// never need escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

impl ApplicationId {
	/// Validates and wraps an application identifier.
	pub fn new(id: impl Into<String>) -> Result<Self> {
		let id = id.into();
		let trimmed = id.trim();

		if trimmed.is_empty() {
			return Err(CoreError::EmptyApplicationId);
		}

		if !trimmed
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
		{
			return Err(CoreError::InvalidApplicationId(id));
		}

		Ok(Self(trimmed.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ApplicationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for ApplicationId {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self> {
		Self::new(s)
	}
}

impl TryFrom<String> for ApplicationId {
	type Error = CoreError;

	fn try_from(value: String) -> Result<Self> {
		Self::new(value)
	}
}

impl From<ApplicationId> for String {
	fn from(id: ApplicationId) -> Self {
		id.0
	}
}

impl AsRef<str> for ApplicationId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
