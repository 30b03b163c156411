// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Localization Rust SDK for Apalize.
//!
//! This crate loads an application's translations from the Apalize service and
//! resolves human-readable keys against them. Keys that have no translation are
//! collected and reported back to the service once, shortly after start-up.
//!
//! # Features
//!
//! - **Forgiving keys**: `"Welcome Message"`, `"welcome_message"` and
//!   `"WELCOME-MESSAGE"` all resolve to the same entry
//! - **Never fails**: translation falls back to the default value, then the key
//! - **Placeholders**: `{name}` tokens are replaced from a variable map
//! - **Missing-key reports**: unknown keys are deduplicated and sent in a
//!   single deferred request
//!
//! # Example
//!
//! ```ignore
//! use std::collections::HashMap;
//! use apalize::ApalizeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApalizeClient::builder()
//!         .application_id("3f2b9c1e")
//!         .locale("en")
//!         .referrer("https://shop.example.com/checkout")
//!         .init()
//!         .await?;
//!
//!     println!("{}", client.t("Welcome Message", None, None));
//!
//!     let vars = HashMap::from([("count".to_string(), "3".to_string())]);
//!     println!("{}", client.t("Cart Items", Some(&vars), Some("{count} items")));
//!
//!     client.flush_missing().await?;
//!     Ok(())
//! }
//! ```

mod backend;
mod client;
mod collector;
mod error;
mod reporter;
mod resolver;
mod session;
mod store;
mod visitor;

pub use backend::{
	normalize_base_url, user_agent, HttpBackend, TranslationBackend, DEFAULT_BASE_URL, SDK_NAME,
	SDK_VERSION,
};
pub use client::{ApalizeClient, ApalizeClientBuilder, ClientConfig};
pub use collector::MissingKeyCollector;
pub use error::{ApalizeError, ResolveError, Result};
pub use reporter::{MissingKeyReporter, ReportConfig, ReportScheduler};
pub use resolver::{Resolution, ResolutionSource, Resolver, ResolverOptions};
pub use session::SessionContext;
pub use store::{Lookup, TranslationStore};
pub use visitor::{RandomVisitorId, SharedVisitorIdentifier, StaticVisitorId, VisitorIdentifier};

// Re-export core types for convenience
pub use apalize_core::{
	interpolate, is_slug, slugify, ApplicationId, MissingContext, MissingKeyReport,
	MissingTranslation, SchemaVariant, Substitution, Translation, TranslationContent,
	TranslationDocument, TranslationValue,
};
