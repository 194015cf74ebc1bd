// SPDX-License-Identifier: MPL-2.0
//! `tripplan_client` holds the configuration, localization resources and
//! language detection of a map-based trip-planning client.
//!
//! It provides the client configuration (base layers, modules, geocoders,
//! info widgets, travel-mode labels), per-locale date/time profiles, a
//! language detector reading the query string, a cookie or the environment,
//! and a translation façade with printf-style substitution, plural forms and
//! context variants.
//!
//! # Example
//!
//! ```
//! use tripplan_client::bootstrap::ClientSession;
//! use tripplan_client::config::{Configuration, Registry};
//! use tripplan_client::detect::BrowserContext;
//! use tripplan_client::i18n::EmbeddedResources;
//!
//! let context = BrowserContext::default().with_search("?setLng=de");
//! let session = ClientSession::start(
//!     Configuration::default(),
//!     &context,
//!     &EmbeddedResources,
//!     &Registry::with_builtins(),
//! )?;
//! assert_eq!(session.language().as_str(), "de");
//! assert_eq!(session.translator().translate("Bicycle Only", &[]), "Nur Fahrrad");
//! # Ok::<(), tripplan_client::error::Error>(())
//! ```

#![doc(html_root_url = "https://docs.rs/tripplan_client/0.3.0")]

pub mod bootstrap;
pub mod config;
pub mod detect;
pub mod error;
pub mod i18n;
pub mod locale;
