// SPDX-License-Identifier: MPL-2.0
//! Where translation catalogs come from.
//!
//! A catalog is a JSON object for one language and one namespace. Loaders
//! report a missing catalog as `Ok(None)`; only genuine read failures are
//! errors.

use crate::config::defaults::{DEFAULT_NAMESPACE, DEFAULT_RESOURCE_PATH};
use crate::config::I18nOptions;
use crate::error::Result;
use crate::locale::LocaleTag;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Source of raw catalog text.
pub trait ResourceLoader: Send + Sync {
    /// Returns the catalog for `lng` and `ns`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog exists but cannot be read.
    fn load(&self, lng: &LocaleTag, ns: &str) -> Result<Option<String>>;

    /// Languages this loader is known to have catalogs for.
    ///
    /// Used to reach regional catalogs (`ca_ES`) from a bare or differently
    /// spelled tag. Loaders that cannot enumerate report nothing.
    fn languages(&self) -> Vec<LocaleTag> {
        Vec::new()
    }
}

/// Catalogs compiled into the crate from `assets/i18n/`.
///
/// The default namespace lives in `<lng>.json`, other namespaces in
/// `<ns>/<lng>.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResources;

impl EmbeddedResources {
    fn file_name(lng: &LocaleTag, ns: &str) -> String {
        if ns == DEFAULT_NAMESPACE {
            format!("{}.json", lng)
        } else {
            format!("{}/{}.json", ns, lng)
        }
    }
}

impl ResourceLoader for EmbeddedResources {
    fn load(&self, lng: &LocaleTag, ns: &str) -> Result<Option<String>> {
        Ok(Asset::get(&Self::file_name(lng, ns))
            .map(|file| String::from_utf8_lossy(&file.data).into_owned()))
    }

    /// Languages with a catalog in the default namespace.
    fn languages(&self) -> Vec<LocaleTag> {
        Asset::iter()
            .filter_map(|file| {
                file.strip_suffix(".json")
                    .filter(|name| !name.contains('/'))
                    .and_then(|name| LocaleTag::new(name).ok())
            })
            .collect()
    }
}

/// Catalogs read from disk through a path template.
///
/// `__lng__` and `__ns__` in the template are replaced by the language and
/// namespace; relative paths are resolved against `base_dir`.
#[derive(Debug, Clone)]
pub struct FileResources {
    base_dir: PathBuf,
    template: String,
}

impl FileResources {
    pub fn new(base_dir: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            template: template.into(),
        }
    }

    /// Uses the `res_get_path` template of the translation options.
    pub fn from_options(base_dir: impl Into<PathBuf>, options: &I18nOptions) -> Self {
        Self::new(base_dir, options.res_get_path.clone())
    }

    /// Uses the default `locale/__lng__.json` layout under `base_dir`.
    pub fn with_default_layout(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(base_dir, DEFAULT_RESOURCE_PATH)
    }

    pub fn path_for(&self, lng: &LocaleTag, ns: &str) -> PathBuf {
        let relative = self
            .template
            .replace("__lng__", lng.as_str())
            .replace("__ns__", ns);
        self.base_dir.join(relative)
    }
}

impl ResourceLoader for FileResources {
    fn load(&self, lng: &LocaleTag, ns: &str) -> Result<Option<String>> {
        let path = self.path_for(lng, ns);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "catalog not found");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Catalogs held in memory, keyed by language and namespace.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    catalogs: HashMap<(String, String), String>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog for the default namespace.
    pub fn with(self, lng: &str, json: impl Into<String>) -> Self {
        self.with_namespace(lng, DEFAULT_NAMESPACE, json)
    }

    pub fn with_namespace(mut self, lng: &str, ns: &str, json: impl Into<String>) -> Self {
        self.catalogs
            .insert((lng.to_string(), ns.to_string()), json.into());
        self
    }
}

impl ResourceLoader for MemoryResources {
    fn load(&self, lng: &LocaleTag, ns: &str) -> Result<Option<String>> {
        Ok(self
            .catalogs
            .get(&(lng.as_str().to_string(), ns.to_string()))
            .cloned())
    }

    fn languages(&self) -> Vec<LocaleTag> {
        let mut languages: Vec<LocaleTag> = self
            .catalogs
            .keys()
            .filter_map(|(lng, _)| LocaleTag::new(lng.as_str()).ok())
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }
}
