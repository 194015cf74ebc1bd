// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Language detection**: query parameter and cookie names
//! - **Translation**: fallback language, resource paths, separators
//! - **Formatting**: date and time patterns
//! - **Map**: zoom bounds

// ==========================================================================
// Language Detection Defaults
// ==========================================================================

/// Query string parameter carrying a one-shot language override.
pub const DEFAULT_QUERY_KEY: &str = "setLng";

/// Cookie remembering the last explicitly chosen language.
pub const DEFAULT_COOKIE_NAME: &str = "i18next";

// ==========================================================================
// Translation Defaults
// ==========================================================================

/// Language used when detection yields nothing or a catalog is missing.
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en";

/// Catalog path template; `__lng__` and `__ns__` are substituted.
pub const DEFAULT_RESOURCE_PATH: &str = "locale/__lng__.json";

/// Namespace used when a key carries none.
pub const DEFAULT_NAMESPACE: &str = "translation";

/// Separates a namespace from a key. Chosen so `:` can appear in keys.
pub const DEFAULT_NS_SEPARATOR: &str = ";;";

/// Separates nested key segments. Chosen so `.` can appear in keys.
pub const DEFAULT_KEY_SEPARATOR: &str = "_|_";

/// Suffix joining a key and its context.
pub const CONTEXT_SEPARATOR: &str = "_";

/// Suffix marking the plural form of a key.
pub const PLURAL_SUFFIX: &str = "_plural";

/// Name of the built-in printf-style post-processor.
pub const SPRINTF_PROCESSOR: &str = "sprintf";

// ==========================================================================
// Formatting Defaults
// ==========================================================================

/// Default time display pattern.
pub const DEFAULT_TIME_FORMAT: &str = "h:mma";

/// Default date display pattern.
pub const DEFAULT_DATE_FORMAT: &str = "MMM Do YYYY";

// ==========================================================================
// Map Defaults
// ==========================================================================

/// Lowest zoom level accepted for map overrides.
pub const MIN_ZOOM_LEVEL: u8 = 0;

/// Highest zoom level accepted for map overrides.
pub const MAX_ZOOM_LEVEL: u8 = 22;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(!DEFAULT_QUERY_KEY.is_empty());
    assert!(!DEFAULT_COOKIE_NAME.is_empty());
    assert!(!DEFAULT_NS_SEPARATOR.is_empty());
    assert!(!DEFAULT_KEY_SEPARATOR.is_empty());
    assert!(MAX_ZOOM_LEVEL > MIN_ZOOM_LEVEL);
};
