// SPDX-License-Identifier: MPL-2.0
//! This module handles the client configuration: map base layers, UI modules,
//! geocoders, info widgets, travel-mode labels and the translation options.
//!
//! The configuration is read once, from a `client.toml` file or from the
//! built-in defaults, and is treated as read-only afterwards.
//!
//! # Examples
//!
//! ```no_run
//! use tripplan_client::config::{self, Configuration};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.locale_short = "de".parse().unwrap();
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("client.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded.locale_short.as_str(), "de");
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;
pub mod modes;
pub mod registry;

pub use defaults::*;
pub use modes::{ModeSet, TravelMode};
pub use registry::{Registry, ResolvedClient};

use crate::detect::{query, DetectionOptions};
use crate::error::Result;
use crate::i18n::Translator;
use crate::locale::LocaleTag;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_FILE: &str = "client.toml";
const APP_NAME: &str = "TripPlan";

/// A base map tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    /// Unique name, used both for display and as a reference from modules.
    pub name: String,
    /// Tile service address, e.g. `https://{s}.tile.example.org/{z}/{x}/{y}.png`.
    pub tile_url: String,
    pub attribution: String,
    #[serde(default)]
    pub subdomains: Vec<String>,
}

impl BaseLayer {
    /// Expands the `{s}`, `{z}`, `{x}` and `{y}` placeholders of the tile URL.
    ///
    /// Subdomains rotate with the tile coordinates so neighbouring tiles are
    /// spread over the available hosts.
    pub fn tile_address(&self, z: u8, x: u32, y: u32) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (u64::from(x) + u64::from(y)) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };
        self.tile_url
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// A client module to load at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub id: String,
    /// Registry identifier of the module implementation.
    pub class_name: String,
    #[serde(default)]
    pub default_base_layer: Option<String>,
    /// Shown by default; at most one module may set this.
    #[serde(default)]
    pub is_default: bool,
}

/// An address geocoding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub name: String,
    /// Registry identifier of the geocoder implementation.
    pub class_name: String,
    pub url: String,
    /// Name of the API parameter carrying the address.
    pub address_param: String,
}

/// A non-module information widget reachable from the top bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoWidget {
    #[serde(default)]
    pub title: Option<String>,
    /// HTML content.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub css_class: Option<String>,
    /// Marks the language chooser widget; its content is generated.
    #[serde(default)]
    pub languages: bool,
}

/// A language offered in the language chooser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveLocale {
    pub code: LocaleTag,
    /// Name of the language written in the language itself.
    pub name: String,
}

/// Untranslated label of a travel-mode combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeEntry {
    /// Composite mode key such as `TRANSIT,WALK`.
    pub key: String,
    /// Translation key of the label.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    #[default]
    Sync,
    Async,
}

/// Translation options: language detection, catalogs and lookup syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nOptions {
    /// Query parameter carrying a language override.
    pub detect_lng_qs: String,
    pub use_cookie: bool,
    pub cookie_name: String,
    /// Lifetime of the language cookie; a session cookie when absent.
    pub cookie_expiration_minutes: Option<i64>,
    pub cookie_domain: Option<String>,
    pub fallback_lng: LocaleTag,
    /// Forces a language, bypassing detection.
    pub lng: Option<LocaleTag>,
    /// Catalog path template with `__lng__` (and optionally `__ns__`).
    pub res_get_path: String,
    pub namespaces: Vec<String>,
    pub ns_separator: String,
    pub key_separator: String,
    /// Extra languages loaded up front.
    pub preload: Vec<LocaleTag>,
    /// Treat empty catalog values as missing.
    pub fallback_on_empty: bool,
    /// Post-processor applied to every lookup.
    pub post_process: Option<String>,
    pub load_mode: LoadMode,
}

impl Default for I18nOptions {
    fn default() -> Self {
        Self {
            detect_lng_qs: DEFAULT_QUERY_KEY.to_string(),
            use_cookie: true,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_expiration_minutes: None,
            cookie_domain: None,
            fallback_lng: fallback_tag(),
            lng: None,
            res_get_path: DEFAULT_RESOURCE_PATH.to_string(),
            namespaces: vec![DEFAULT_NAMESPACE.to_string()],
            ns_separator: DEFAULT_NS_SEPARATOR.to_string(),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            preload: Vec::new(),
            fallback_on_empty: true,
            post_process: None,
            load_mode: LoadMode::Sync,
        }
    }
}

impl I18nOptions {
    pub fn detection_options(&self) -> DetectionOptions {
        DetectionOptions {
            query_key: self.detect_lng_qs.clone(),
            use_cookie: self.use_cookie,
            cookie_name: self.cookie_name.clone(),
        }
    }
}

fn fallback_tag() -> LocaleTag {
    LocaleTag::from_static(DEFAULT_FALLBACK_LANGUAGE)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub debug: bool,

    /// Catalog language of this deployment, always preloaded by a session.
    pub locale_short: LocaleTag,
    pub active_locales: Vec<ActiveLocale>,

    pub hostname: String,
    pub rest_service: String,
    pub time_offset: i32,

    pub base_layers: Vec<BaseLayer>,

    /// When set, these override the map extent reported by the server.
    pub init_lat_lng: Option<LatLng>,
    pub init_zoom: Option<u8>,
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,

    /// Fit the map to the itinerary when a result arrives.
    pub zoom_to_fit_results: bool,

    pub site_name: String,
    pub site_description: String,
    pub logo_graphic: String,
    pub bikeshare_name: String,
    pub show_logo: bool,
    pub show_title: bool,
    pub show_module_selector: bool,
    pub metric: bool,

    pub modules: Vec<ModuleConfig>,
    pub geocoders: Vec<GeocoderConfig>,
    pub info_widgets: Vec<InfoWidget>,

    pub show_add_this: bool,
    pub add_this_pub_id: Option<String>,
    pub add_this_title: Option<String>,

    pub modes: Vec<ModeEntry>,

    pub time_format: String,
    pub date_format: String,

    pub i18n: I18nOptions,
}

impl Default for Configuration {
    fn default() -> Self {
        let attribution = "Map data &copy; <a href=\"https://www.openstreetmap.org/copyright\" \
                           target=\"_blank\">OpenStreetMap</a> contributors"
            .to_string();
        Self {
            debug: false,
            locale_short: fallback_tag(),
            active_locales: vec![
                ActiveLocale {
                    code: fallback_tag(),
                    name: "English".to_string(),
                },
                ActiveLocale {
                    code: LocaleTag::from_static("de"),
                    name: "Deutsch".to_string(),
                },
            ],
            hostname: String::new(),
            rest_service: "otp-rest-servlet".to_string(),
            time_offset: 0,
            base_layers: vec![
                BaseLayer {
                    name: "OSM Standard".to_string(),
                    tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                    attribution: attribution.clone(),
                    subdomains: vec!["a".into(), "b".into(), "c".into()],
                },
                BaseLayer {
                    name: "OSM Humanitarian".to_string(),
                    tile_url: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".to_string(),
                    attribution,
                    subdomains: vec!["a".into(), "b".into()],
                },
            ],
            init_lat_lng: None,
            init_zoom: None,
            min_zoom: None,
            max_zoom: None,
            zoom_to_fit_results: false,
            site_name: "Trip Planner".to_string(),
            site_description: "Multimodal trip planner".to_string(),
            logo_graphic: "images/logo_40px.png".to_string(),
            bikeshare_name: "Bike Share".to_string(),
            show_logo: true,
            show_title: true,
            show_module_selector: true,
            metric: true,
            modules: vec![
                ModuleConfig {
                    id: "planner".to_string(),
                    class_name: "multimodal_planner".to_string(),
                    default_base_layer: Some("OSM Standard".to_string()),
                    is_default: true,
                },
                ModuleConfig {
                    id: "bikeshare".to_string(),
                    class_name: "bikeshare".to_string(),
                    default_base_layer: None,
                    is_default: false,
                },
            ],
            geocoders: Vec::new(),
            info_widgets: vec![InfoWidget {
                title: Some("About".to_string()),
                content: "<p>Plan trips combining transit, walking and cycling.</p>".to_string(),
                css_class: None,
                languages: false,
            }],
            show_add_this: false,
            add_this_pub_id: None,
            add_this_title: None,
            modes: default_modes(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            i18n: I18nOptions::default(),
        }
    }
}

fn default_modes() -> Vec<ModeEntry> {
    [
        ("TRANSIT,WALK", "Transit"),
        ("BUSISH,WALK", "Bus Only"),
        ("BICYCLE", "Bicycle Only"),
        ("TRANSIT,BICYCLE", "Bicycle &amp; Transit"),
        ("WALK", "Walk Only"),
        ("CAR", "Drive Only"),
        ("WALK,BICYCLE", "Rented Bicycle"),
        ("TRANSIT,WALK,BICYCLE", "Transit & Rented Bicycle"),
    ]
    .into_iter()
    .map(|(key, label)| ModeEntry {
        key: key.to_string(),
        label: label.to_string(),
    })
    .collect()
}

impl Configuration {
    pub fn detection_options(&self) -> DetectionOptions {
        self.i18n.detection_options()
    }

    pub fn base_layer(&self, name: &str) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|layer| layer.name == name)
    }

    pub fn default_module(&self) -> Option<&ModuleConfig> {
        self.modules.iter().find(|module| module.is_default)
    }

    /// Link that switches the client to `code` on load.
    pub fn language_switch_link(&self, code: &LocaleTag) -> String {
        query::single_param(&self.i18n.detect_lng_qs, code.as_str())
    }

    /// HTML list of links switching to each active locale.
    pub fn language_chooser(&self) -> String {
        let mut html = String::from("<ul>");
        for locale in &self.active_locales {
            html.push_str(&format!(
                "<li><a href=\"{}\">{} ({})</a></li>",
                self.language_switch_link(&locale.code),
                locale.name,
                locale.code
            ));
        }
        html.push_str("</ul>");
        html
    }

    /// Content of an info widget, generating the language chooser where
    /// requested.
    pub fn widget_content(&self, widget: &InfoWidget) -> String {
        if widget.languages {
            self.language_chooser()
        } else {
            widget.content.clone()
        }
    }

    /// Travel-mode labels in the translator's language, in configured order.
    pub fn mode_labels(&self, translator: &Translator) -> Vec<(String, String)> {
        self.modes
            .iter()
            .map(|entry| (entry.key.clone(), translator.translate(&entry.label, &[])))
            .collect()
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Configuration> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Configuration::default())
}

pub fn save(config: &Configuration) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Configuration> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!(path = %path.display(), %err, "invalid configuration, using defaults");
            Ok(Configuration::default())
        }
    }
}

pub fn save_to_path(config: &Configuration, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_language() {
        let config = Configuration {
            locale_short: "sl".parse().unwrap(),
            metric: false,
            ..Configuration::default()
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("client.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("client.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Configuration::default());
    }

    #[test]
    fn load_from_missing_path_is_an_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("client.toml");
        fs::write(
            &config_path,
            "site_name = \"Daljinko\"\n[i18n]\ncookie_name = \"trip_lang\"\n",
        )
        .unwrap();

        let loaded = load_from_path(&config_path).unwrap();
        assert_eq!(loaded.site_name, "Daljinko");
        assert_eq!(loaded.i18n.cookie_name, "trip_lang");
        assert_eq!(loaded.i18n.detect_lng_qs, DEFAULT_QUERY_KEY);
        assert_eq!(loaded.modules, Configuration::default().modules);
    }

    #[test]
    fn default_config_has_single_default_module() {
        let config = Configuration::default();
        assert_eq!(config.modules.iter().filter(|m| m.is_default).count(), 1);
        assert_eq!(config.default_module().unwrap().id, "planner");
    }

    #[test]
    fn language_chooser_links_every_active_locale() {
        let config = Configuration::default();
        assert_eq!(
            config.language_chooser(),
            "<ul><li><a href=\"?setLng=en\">English (en)</a></li>\
             <li><a href=\"?setLng=de\">Deutsch (de)</a></li></ul>"
        );
    }

    #[test]
    fn language_widget_content_is_generated() {
        let config = Configuration::default();
        let widget = InfoWidget {
            title: Some("Language".to_string()),
            content: String::new(),
            css_class: None,
            languages: true,
        };
        assert!(config.widget_content(&widget).starts_with("<ul>"));
    }

    #[test]
    fn tile_address_rotates_subdomains() {
        let layer = &Configuration::default().base_layers[0];
        assert_eq!(
            layer.tile_address(12, 2200, 1400),
            "https://a.tile.openstreetmap.org/12/2200/1400.png"
        );
        assert_eq!(
            layer.tile_address(12, 2201, 1400),
            "https://b.tile.openstreetmap.org/12/2201/1400.png"
        );
    }

    #[test]
    fn detection_options_follow_i18n_settings() {
        let mut config = Configuration::default();
        config.i18n.detect_lng_qs = "lang".to_string();
        config.i18n.use_cookie = false;
        let options = config.detection_options();
        assert_eq!(options.query_key, "lang");
        assert!(!options.use_cookie);
    }
}
