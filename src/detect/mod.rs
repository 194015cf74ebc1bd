// SPDX-License-Identifier: MPL-2.0
//! Language detection.
//!
//! The detector looks at three sources in a fixed order and stops at the
//! first one that yields a usable tag:
//!
//! 1. the query string parameter named by [`DetectionOptions::query_key`]
//! 2. the cookie named by [`DetectionOptions::cookie_name`]
//! 3. the language reported by the environment (browser or OS)
//!
//! Sources that are unavailable in the [`BrowserContext`] are skipped, so
//! detection also works outside a browser. Values are taken verbatim:
//! `es-ES` stays `es-ES`.

pub mod cookie;
pub mod query;

pub use cookie::CookieJar;

use crate::config::defaults::{DEFAULT_COOKIE_NAME, DEFAULT_QUERY_KEY};
use crate::locale::LocaleTag;
use tracing::debug;

/// What the page can see about its surroundings.
///
/// Every field is optional: `None` stands for a source that does not exist
/// in the current environment (no `window`, no `document`, no `navigator`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserContext {
    /// The location search string, with or without the leading `?`.
    pub search: Option<String>,
    /// The `document.cookie` header.
    pub cookie: Option<String>,
    /// The standard reported language.
    pub language: Option<String>,
    /// Legacy reported language, consulted when `language` is absent.
    pub user_language: Option<String>,
}

impl BrowserContext {
    /// A context for code running outside any browser: only the operating
    /// system locale is available.
    pub fn from_process() -> Self {
        Self {
            language: sys_locale::get_locale(),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn reported_language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .filter(|l| !l.is_empty())
            .or_else(|| self.user_language.as_deref().filter(|l| !l.is_empty()))
    }
}

/// Which source produced the detected language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    QueryString,
    Cookie,
    Environment,
}

/// Knobs of the detector; normally taken from the translation options of the
/// client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionOptions {
    pub query_key: String,
    pub use_cookie: bool,
    pub cookie_name: String,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            query_key: DEFAULT_QUERY_KEY.to_string(),
            use_cookie: true,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LanguageDetector {
    options: DetectionOptions,
}

impl LanguageDetector {
    pub fn new(options: DetectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Returns the detected language, or `None` when no source has one.
    pub fn detect(&self, context: &BrowserContext) -> Option<LocaleTag> {
        self.detect_with_source(context).map(|(tag, _)| tag)
    }

    /// Like [`detect`](Self::detect) but also reports where the tag came from.
    pub fn detect_with_source(
        &self,
        context: &BrowserContext,
    ) -> Option<(LocaleTag, DetectionSource)> {
        let detected = self
            .from_query(context)
            .map(|tag| (tag, DetectionSource::QueryString))
            .or_else(|| self.from_cookie(context).map(|tag| (tag, DetectionSource::Cookie)))
            .or_else(|| {
                Self::from_environment(context).map(|tag| (tag, DetectionSource::Environment))
            });

        match &detected {
            Some((tag, source)) => debug!(language = %tag, ?source, "language detected"),
            None => debug!("no language source available"),
        }
        detected
    }

    fn from_query(&self, context: &BrowserContext) -> Option<LocaleTag> {
        let search = context.search.as_deref()?;
        let raw = query::param(search, &self.options.query_key)?;
        accept(raw, DetectionSource::QueryString)
    }

    fn from_cookie(&self, context: &BrowserContext) -> Option<LocaleTag> {
        if !self.options.use_cookie {
            return None;
        }
        let header = context.cookie.as_deref()?;
        let raw = cookie::read_header(header, &self.options.cookie_name)?;
        if raw.is_empty() {
            return None;
        }
        accept(&raw, DetectionSource::Cookie)
    }

    fn from_environment(context: &BrowserContext) -> Option<LocaleTag> {
        accept(context.reported_language()?, DetectionSource::Environment)
    }
}

/// Malformed values are skipped so detection can move on to the next source.
fn accept(raw: &str, source: DetectionSource) -> Option<LocaleTag> {
    match LocaleTag::new(raw) {
        Ok(tag) => Some(tag),
        Err(err) => {
            debug!(?source, %err, "ignoring malformed language value");
            None
        }
    }
}
