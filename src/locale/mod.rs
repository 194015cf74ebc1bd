// SPDX-License-Identifier: MPL-2.0
//! Locale profiles: the language's own name, its unit system and the
//! date/time patterns used when rendering itineraries.
//!
//! Profiles ship with the crate as TOML files under `assets/locales/` and are
//! embedded at build time. A [`LocaleCatalog`] never fails a lookup: a tag
//! without a profile resolves to the catalog's default profile.

mod tag;

pub use tag::LocaleTag;

use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(RustEmbed)]
#[folder = "assets/locales/"]
struct Asset;

/// Date/time strings for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFields {
    /// Combined date and time pattern.
    pub format: String,
    pub date_format: String,
    pub time_format: String,
    /// Pattern understood by the time picker widget.
    #[serde(default)]
    pub time_format_picker: Option<String>,
    #[serde(default)]
    pub hour_abbrev: Option<String>,
    #[serde(default)]
    pub hours_abbrev: Option<String>,
    #[serde(default)]
    pub hour: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub minute: Option<String>,
    #[serde(default)]
    pub minutes: Option<String>,
    #[serde(default)]
    pub minute_abbrev: Option<String>,
    #[serde(default)]
    pub minutes_abbrev: Option<String>,
    #[serde(default)]
    pub second_abbrev: Option<String>,
    #[serde(default)]
    pub seconds_abbrev: Option<String>,
    /// Short month names, January first.
    #[serde(default)]
    pub months: Vec<String>,
}

/// One locale profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleDictionary {
    /// Name of the language written in the language itself.
    pub display_name: String,
    /// `true` for metric units, `false` for imperial.
    pub use_metric: bool,
    /// Code of the translation catalog for this locale.
    pub locale_short: LocaleTag,
    /// Regional code of the date picker; the catalog code when absent.
    #[serde(default)]
    pub datepicker_locale: Option<String>,
    pub time: TimeFields,
}

impl LocaleDictionary {
    pub fn datepicker_locale(&self) -> &str {
        self.datepicker_locale
            .as_deref()
            .unwrap_or_else(|| self.locale_short.as_str())
    }

    /// Unit label for a duration in minutes, singular or plural.
    pub fn minutes_label(&self, minutes: u64, abbreviated: bool) -> Option<&str> {
        let (one, many) = if abbreviated {
            (&self.time.minute_abbrev, &self.time.minutes_abbrev)
        } else {
            (&self.time.minute, &self.time.minutes)
        };
        if minutes == 1 {
            one.as_deref()
        } else {
            many.as_deref()
        }
    }

    /// Unit label for a duration in hours, singular or plural.
    pub fn hours_label(&self, hours: u64, abbreviated: bool) -> Option<&str> {
        let (one, many) = if abbreviated {
            (&self.time.hour_abbrev, &self.time.hours_abbrev)
        } else {
            (&self.time.hour, &self.time.hours)
        };
        if hours == 1 {
            one.as_deref()
        } else {
            many.as_deref()
        }
    }

    /// Short month name for a 1-based month number.
    pub fn month_name(&self, month: u32) -> Option<&str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.time.months.get(index).map(String::as_str)
    }
}

/// The set of known locale profiles plus the designated default.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    dictionaries: BTreeMap<LocaleTag, LocaleDictionary>,
    default_tag: LocaleTag,
    default_dictionary: LocaleDictionary,
}

impl LocaleCatalog {
    /// Builds a catalog from explicit profiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locale`] when `default_tag` has no profile, since the
    /// default is what every failed lookup resolves to.
    pub fn new(
        dictionaries: impl IntoIterator<Item = (LocaleTag, LocaleDictionary)>,
        default_tag: LocaleTag,
    ) -> Result<Self> {
        let dictionaries: BTreeMap<_, _> = dictionaries.into_iter().collect();
        let Some(default_dictionary) = dictionaries.get(&default_tag).cloned() else {
            return Err(Error::Locale(format!(
                "default locale '{}' has no dictionary",
                default_tag
            )));
        };
        Ok(Self {
            dictionaries,
            default_tag,
            default_dictionary,
        })
    }

    /// Loads every profile bundled with the crate.
    ///
    /// Files that fail to parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locale`] when the default tag is not among the
    /// bundled profiles.
    pub fn bundled(default_tag: LocaleTag) -> Result<Self> {
        let mut dictionaries = BTreeMap::new();
        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(code) = filename.strip_suffix(".toml") else {
                continue;
            };
            let Ok(tag) = LocaleTag::new(code) else {
                warn!(filename, "skipping locale profile with invalid name");
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            match toml::from_str::<LocaleDictionary>(&String::from_utf8_lossy(&content.data)) {
                Ok(dictionary) => {
                    debug!(locale = %tag, "loaded locale profile");
                    dictionaries.insert(tag, dictionary);
                }
                Err(err) => warn!(filename, %err, "failed to parse locale profile"),
            }
        }
        Self::new(dictionaries, default_tag)
    }

    pub fn default_tag(&self) -> &LocaleTag {
        &self.default_tag
    }

    pub fn contains(&self, tag: &LocaleTag) -> bool {
        self.dictionaries.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &LocaleTag> {
        self.dictionaries.keys()
    }

    /// Returns the profile for `tag`, trying the full tag, then its primary
    /// subtag, then the default profile.
    pub fn get(&self, tag: &LocaleTag) -> &LocaleDictionary {
        self.resolve(tag).1
    }

    /// Like [`get`](Self::get) but also reports which tag actually matched.
    pub fn resolve(&self, tag: &LocaleTag) -> (&LocaleTag, &LocaleDictionary) {
        self.find(tag).unwrap_or_else(|| {
            debug!(requested = %tag, fallback = %self.default_tag, "no locale profile, using default");
            (&self.default_tag, &self.default_dictionary)
        })
    }

    /// Profile matching `tag` without falling back to the default.
    ///
    /// Tries the tag as given, the tag with `-` and `_` swapped, its primary
    /// subtag, and finally any regional profile of the same language, so
    /// `ca-ES` and `ca` both find `ca_ES`.
    pub fn find(&self, tag: &LocaleTag) -> Option<(&LocaleTag, &LocaleDictionary)> {
        if let Some(found) = self.dictionaries.get_key_value(tag) {
            return Some(found);
        }
        if let Some(found) = tag
            .with_swapped_separator()
            .and_then(|swapped| self.dictionaries.get_key_value(&swapped))
        {
            return Some(found);
        }
        let primary = tag.primary_tag().unwrap_or_else(|| tag.clone());
        if let Some(found) = self.dictionaries.get_key_value(&primary) {
            return Some(found);
        }
        self.dictionaries
            .range(primary.clone()..)
            .take_while(|(candidate, _)| candidate.as_str().starts_with(primary.as_str()))
            .find(|(candidate, _)| candidate.primary() == primary.as_str())
    }
}
