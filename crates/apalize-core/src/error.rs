// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors raised while validating core values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
	#[error("application ID must not be empty")]
	EmptyApplicationId,

	#[error("invalid application ID {0:?}: only ASCII letters, digits, '-' and '_' are allowed")]
	InvalidApplicationId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
