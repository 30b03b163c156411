// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Apalize translation SDK.
//!
//! This crate holds everything that does not touch the network: the key
//! normalizer, the translation document schema, missing-key records and the
//! report payload, and placeholder substitution. It is used by the client SDK
//! (`apalize`) and the command line tool (`apalize-cli`).
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use apalize_core::{interpolate, slugify, Substitution, Translation};
//!
//! assert_eq!(slugify("Welcome Message"), "welcome-message");
//!
//! let translation = Translation::localized("welcome-message", [("en", "Hi {name}")]);
//! let template = translation.value_for(Some("en")).unwrap();
//!
//! let vars = HashMap::from([("name".to_string(), "Ann".to_string())]);
//! assert_eq!(interpolate(template, &vars, Substitution::All), "Hi Ann");
//! ```

pub mod application;
pub mod error;
pub mod interpolate;
pub mod missing;
pub mod slug;
pub mod translation;

pub use application::ApplicationId;
pub use error::{CoreError, Result};
pub use interpolate::{interpolate, Substitution};
pub use missing::{MissingContext, MissingKeyReport, MissingTranslation, SchemaVariant};
pub use slug::{is_slug, slugify};
pub use translation::{Translation, TranslationContent, TranslationDocument, TranslationValue};
