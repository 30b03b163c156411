// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the translation SDK.

use apalize_core::CoreError;
use thiserror::Error;

/// Translation SDK errors.
#[derive(Debug, Error)]
pub enum ApalizeError {
	/// No application ID was configured.
	#[error("application ID is required")]
	MissingApplicationId,

	/// The configured application ID is not usable.
	#[error("invalid application ID: {0}")]
	InvalidApplicationId(#[from] CoreError),

	/// Base URL is missing or invalid.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error response.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// Response body could not be decoded.
	#[error("failed to decode response: {0}")]
	Decode(#[from] serde_json::Error),

	/// Visitor identification failed.
	#[error("visitor identification failed: {0}")]
	Identification(String),

	/// Shared client state could not be updated.
	#[error(transparent)]
	Resolve(#[from] ResolveError),

	/// Client has been shut down.
	#[error("client has been shut down")]
	ClientShutdown,
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, ApalizeError>;

/// Errors from resolving a single translation request.
///
/// These never escape [`crate::ApalizeClient::translate`], which logs them and
/// falls back to a displayable string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// Translations have not been loaded (yet).
	#[error("translations are not loaded")]
	NotLoaded,

	/// A lock guarding shared state was poisoned by a panicking thread.
	#[error("{0} state is poisoned")]
	StatePoisoned(&'static str),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn core_errors_convert() {
		let err: ApalizeError = CoreError::EmptyApplicationId.into();
		assert!(matches!(err, ApalizeError::InvalidApplicationId(_)));
		assert_eq!(
			err.to_string(),
			"invalid application ID: application ID must not be empty"
		);
	}

	#[test]
	fn server_error_message_includes_status() {
		let err = ApalizeError::ServerError {
			status: 404,
			message: "not found".to_string(),
		};
		assert_eq!(err.to_string(), "server error (404): not found");
	}

	#[test]
	fn resolve_error_messages() {
		assert_eq!(ResolveError::NotLoaded.to_string(), "translations are not loaded");
		assert_eq!(
			ResolveError::StatePoisoned("store").to_string(),
			"store state is poisoned"
		);
	}
}
