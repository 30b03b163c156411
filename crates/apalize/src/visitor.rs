// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visitor identification.
//!
//! Missing-key reports are attributed to a visitor so the service can tell one
//! noisy session apart from many. Identification runs in the background after
//! the client starts; implement [`VisitorIdentifier`] to plug in a fingerprinting
//! service or an existing session identifier.
//!
//! # Example
//!
//! ```ignore
//! use apalize::{ApalizeClient, StaticVisitorId};
//!
//! let client = ApalizeClient::builder()
//!     .application_id("my-app")
//!     .visitor_identifier(StaticVisitorId::new(session.user_hash()))
//!     .init()
//!     .await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ApalizeError, Result};

/// Resolves a stable identifier for the current visitor.
#[async_trait]
pub trait VisitorIdentifier: Send + Sync + 'static {
	/// Returns the visitor identifier.
	async fn identify(&self) -> Result<String>;
}

/// Type alias for a shared visitor identifier.
pub type SharedVisitorIdentifier = Arc<dyn VisitorIdentifier>;

/// Always answers with an identifier chosen by the embedder.
///
/// A blank identifier fails identification, so reports go out without one.
#[derive(Debug, Clone)]
pub struct StaticVisitorId {
	id: String,
}

impl StaticVisitorId {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}
}

#[async_trait]
impl VisitorIdentifier for StaticVisitorId {
	async fn identify(&self) -> Result<String> {
		let id = self.id.trim();
		if id.is_empty() {
			return Err(ApalizeError::Identification(
				"visitor ID must not be blank".to_string(),
			));
		}
		Ok(id.to_string())
	}
}

/// Generates a random UUIDv4 once per instance.
///
/// The default identifier. It is stable for the lifetime of the client only.
#[derive(Debug, Clone)]
pub struct RandomVisitorId {
	id: String,
}

impl RandomVisitorId {
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
		}
	}
}

impl Default for RandomVisitorId {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl VisitorIdentifier for RandomVisitorId {
	async fn identify(&self) -> Result<String> {
		Ok(self.id.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn static_id_is_returned_verbatim() {
		let id = StaticVisitorId::new("visitor-42");
		assert_eq!(id.identify().await.unwrap(), "visitor-42");
	}

	#[tokio::test]
	async fn blank_static_id_fails() {
		let result = StaticVisitorId::new("  ").identify().await;
		assert!(matches!(result, Err(ApalizeError::Identification(_))));
	}

	#[tokio::test]
	async fn random_id_is_stable_per_instance() {
		let id = RandomVisitorId::new();
		let first = id.identify().await.unwrap();
		let second = id.identify().await.unwrap();

		assert_eq!(first, second);
		assert!(Uuid::parse_str(&first).is_ok());
	}

	#[tokio::test]
	async fn random_ids_differ_between_instances() {
		let a = RandomVisitorId::new().identify().await.unwrap();
		let b = RandomVisitorId::new().identify().await.unwrap();
		assert_ne!(a, b);
	}
}
