// SPDX-License-Identifier: MPL-2.0
//! Language tags as they travel through query strings, cookies and the
//! environment.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A short language/region identifier such as `en`, `es-ES` or `ca_ES`.
///
/// The tag is kept exactly as it was received. No case folding or separator
/// rewriting is applied, so `es-ES` coming from the environment stays
/// `es-ES`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Validates and wraps a raw tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locale`] for empty tags or tags containing characters
    /// other than ASCII alphanumerics, `-` and `_`.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(Error::Locale("empty language tag".to_string()));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Locale(format!("invalid language tag '{}'", raw)));
        }
        Ok(Self(raw))
    }

    /// Wraps a tag literal known to be valid at compile time.
    pub(crate) fn from_static(raw: &'static str) -> Self {
        debug_assert!(Self::new(raw).is_ok(), "invalid static tag {raw}");
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag, i.e. everything before the first `-` or `_`.
    pub fn primary(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(&self.0)
    }

    /// Whether the tag carries a region or script part.
    pub fn is_qualified(&self) -> bool {
        self.primary().len() != self.0.len()
    }

    /// The primary subtag as a tag of its own, for qualified tags.
    pub fn primary_tag(&self) -> Option<LocaleTag> {
        if !self.is_qualified() {
            return None;
        }
        Self::new(self.primary()).ok()
    }

    /// The same tag spelled with the other separator: `ca-ES` ↔ `ca_ES`.
    pub fn with_swapped_separator(&self) -> Option<LocaleTag> {
        if !self.is_qualified() {
            return None;
        }
        let swapped = self
            .0
            .chars()
            .map(|c| match c {
                '-' => '_',
                '_' => '-',
                other => other,
            })
            .collect();
        Some(Self(swapped))
    }

    /// Whether `other` names the same language, ignoring region and case.
    pub fn same_language(&self, other: &LocaleTag) -> bool {
        self.primary().eq_ignore_ascii_case(other.primary())
    }

    /// Parses the tag as a Unicode language identifier, if it is one.
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.0.parse().ok()
    }

    /// Lowercase language code used to select plural rules.
    pub fn language(&self) -> String {
        self.language_identifier()
            .map(|id| id.language.as_str().to_string())
            .unwrap_or_else(|| self.primary().to_ascii_lowercase())
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}

impl AsRef<str> for LocaleTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_region_qualified_tag_verbatim() {
        let tag = LocaleTag::new("es-ES").unwrap();
        assert_eq!(tag.as_str(), "es-ES");
        assert_eq!(tag.primary(), "es");
        assert!(tag.is_qualified());
    }

    #[test]
    fn underscore_separator_is_understood() {
        let tag: LocaleTag = "ca_ES".parse().unwrap();
        assert_eq!(tag.primary(), "ca");
        assert_eq!(tag.language(), "ca");
    }

    #[test]
    fn bare_language_is_not_qualified() {
        let tag = LocaleTag::new("sl").unwrap();
        assert!(!tag.is_qualified());
        assert_eq!(tag.primary(), "sl");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(LocaleTag::new("").is_err());
        assert!(LocaleTag::new("en US").is_err());
        assert!(LocaleTag::new("<script>").is_err());
    }

    #[test]
    fn separator_swap_and_primary_tag() {
        let tag = LocaleTag::new("ca-ES").unwrap();
        assert_eq!(tag.with_swapped_separator().unwrap().as_str(), "ca_ES");
        assert_eq!(tag.primary_tag().unwrap().as_str(), "ca");
        let bare = LocaleTag::new("ca").unwrap();
        assert_eq!(bare.with_swapped_separator(), None);
        assert_eq!(bare.primary_tag(), None);
        assert!(bare.same_language(&tag));
        assert!(!bare.same_language(&LocaleTag::new("cs").unwrap()));
    }

    #[test]
    fn language_lowercases_primary_subtag() {
        let tag = LocaleTag::new("EN-gb").unwrap();
        assert_eq!(tag.language(), "en");
    }
}
