// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the client.
//!
//! This module provides the translation façade: key lookup in per-language
//! JSON catalogs, printf-style substitution, pluralization and
//! context-qualified keys.
//!
//! # Features
//!
//! - Catalogs embedded in the crate or read from disk through a path template
//! - Fallback from a region tag to its language, then to the fallback language
//! - Plural forms selected per language (`key_plural`, `key_plural_few`, ...)
//! - Context variants (`key_context`)
//! - Named post-processors, `sprintf` built in
//!
//! # Example
//!
//! ```
//! use tripplan_client::config::I18nOptions;
//! use tripplan_client::i18n::{EmbeddedResources, Translator};
//! use tripplan_client::tr;
//!
//! let translator = Translator::load("de".parse()?, I18nOptions::default(), &EmbeddedResources)?;
//! assert_eq!(tr!(translator, "Walk Only"), "Nur zu Fuß");
//! assert_eq!(translator.translate_plural("%d minute", "%d minutes", 5), "5 Minuten");
//! # Ok::<(), tripplan_client::error::Error>(())
//! ```

pub mod plural;
pub mod resources;
pub mod sprintf;
mod translator;

pub use plural::{plural_category, PluralCategory};
pub use resources::{EmbeddedResources, FileResources, MemoryResources, ResourceLoader};
pub use sprintf::{sprintf, FormatValue, Values};
pub use translator::{LookupOptions, PostProcessor, Translator};

/// Variadic form of [`Translator::translate`].
///
/// `tr!(t, "key")` looks the key up unmodified; `tr!(t, "key", a, b)` passes
/// `a` and `b` as positional substitution values.
#[macro_export]
macro_rules! tr {
    ($translator:expr, $key:expr $(,)?) => {
        $translator.translate($key, &[])
    };
    ($translator:expr, $key:expr, $($value:expr),+ $(,)?) => {
        $translator.translate(
            $key,
            &[$($crate::i18n::FormatValue::from($value)),+],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::I18nOptions;

    #[test]
    fn tr_macro_without_values() {
        let loader = MemoryResources::new().with("en", r#"{"Transit":"Public transport"}"#);
        let t = Translator::load("en".parse().unwrap(), I18nOptions::default(), &loader).unwrap();
        assert_eq!(tr!(t, "Transit"), "Public transport");
    }

    #[test]
    fn tr_macro_with_values() {
        let loader = MemoryResources::new().with("en", r#"{"from_to":"From %s to %s"}"#);
        let t = Translator::load("en".parse().unwrap(), I18nOptions::default(), &loader).unwrap();
        assert_eq!(tr!(t, "from_to", "Tabor", "Center"), "From Tabor to Center");
    }

    #[test]
    fn embedded_german_catalog_translates_modes() {
        let t = Translator::load("de".parse().unwrap(), I18nOptions::default(), &EmbeddedResources)
            .unwrap();
        assert_eq!(tr!(t, "Bicycle Only"), "Nur Fahrrad");
        assert_eq!(t.translate_plural("%d minute", "%d minutes", 1), "1 Minute");
    }
}
