// SPDX-License-Identifier: MPL-2.0
//! Maps the module and geocoder identifiers used in the configuration to the
//! code implementing them.
//!
//! Resolution happens once, right after the configuration is read, so an
//! unknown identifier or an inconsistent module list is reported before any
//! UI is built.

use super::{
    Configuration, GeocoderConfig, ModeSet, ModuleConfig, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL,
};
use crate::detect::query;
use crate::error::{RegistryError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// A client module instantiated from the configuration.
pub trait ClientModule: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    /// Translation key of the module's name in the module selector.
    fn title_key(&self) -> &'static str;

    fn default_base_layer(&self) -> Option<&str>;
}

/// An address lookup service.
pub trait Geocoder: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Request URL for looking up `address`.
    fn request_url(&self, address: &str) -> String;
}

pub type ModuleFactory = fn(&ModuleConfig) -> Box<dyn ClientModule>;
pub type GeocoderFactory = fn(&GeocoderConfig) -> Box<dyn Geocoder>;

#[derive(Debug)]
struct BuiltinModule {
    id: String,
    title_key: &'static str,
    default_base_layer: Option<String>,
}

impl ClientModule for BuiltinModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn title_key(&self) -> &'static str {
        self.title_key
    }

    fn default_base_layer(&self) -> Option<&str> {
        self.default_base_layer.as_deref()
    }
}

fn builtin(config: &ModuleConfig, title_key: &'static str) -> Box<dyn ClientModule> {
    Box::new(BuiltinModule {
        id: config.id.clone(),
        title_key,
        default_base_layer: config.default_base_layer.clone(),
    })
}

fn multimodal_planner(config: &ModuleConfig) -> Box<dyn ClientModule> {
    builtin(config, "Trip Planner")
}

fn planner(config: &ModuleConfig) -> Box<dyn ClientModule> {
    builtin(config, "Planner")
}

fn bikeshare(config: &ModuleConfig) -> Box<dyn ClientModule> {
    builtin(config, "Bike Share Planner")
}

fn analyst(config: &ModuleConfig) -> Box<dyn ClientModule> {
    builtin(config, "Analyst")
}

/// Geocoder speaking a plain `GET url?param=address` protocol.
#[derive(Debug)]
struct HttpGeocoder {
    name: String,
    url: String,
    address_param: String,
}

impl Geocoder for HttpGeocoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_url(&self, address: &str) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}={}",
            self.url,
            separator,
            self.address_param,
            query::encode_value(address)
        )
    }
}

fn http_geocoder(config: &GeocoderConfig) -> Box<dyn Geocoder> {
    Box::new(HttpGeocoder {
        name: config.name.clone(),
        url: config.url.clone(),
        address_param: config.address_param.clone(),
    })
}

/// Identifier → factory tables for modules and geocoders.
#[derive(Clone, Default)]
pub struct Registry {
    modules: HashMap<String, ModuleFactory>,
    geocoders: HashMap<String, GeocoderFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modules: Vec<_> = self.modules.keys().collect();
        modules.sort();
        let mut geocoders: Vec<_> = self.geocoders.keys().collect();
        geocoders.sort();
        f.debug_struct("Registry")
            .field("modules", &modules)
            .field("geocoders", &geocoders)
            .finish()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing every module and geocoder shipped with the crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_module("multimodal_planner", multimodal_planner)
            .register_module("planner", planner)
            .register_module("bikeshare", bikeshare)
            .register_module("analyst", analyst)
            .register_geocoder("http_geocoder", http_geocoder);
        registry
    }

    pub fn register_module(&mut self, class_name: &str, factory: ModuleFactory) -> &mut Self {
        self.modules.insert(class_name.to_string(), factory);
        self
    }

    pub fn register_geocoder(&mut self, class_name: &str, factory: GeocoderFactory) -> &mut Self {
        self.geocoders.insert(class_name.to_string(), factory);
        self
    }

    /// Checks the configuration and instantiates its modules and geocoders.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] (wrapped in [`crate::error::Error`]) for
    /// duplicate module ids, more than one default module, references to
    /// unknown base layers, unknown module or geocoder identifiers,
    /// unparseable travel-mode keys and inconsistent zoom overrides.
    pub fn resolve(&self, config: &Configuration) -> Result<ResolvedClient> {
        check_zoom(config)?;

        let mut seen = HashSet::new();
        for module in &config.modules {
            if !seen.insert(module.id.as_str()) {
                return Err(RegistryError::DuplicateModuleId(module.id.clone()).into());
            }
        }

        let defaults: Vec<String> = config
            .modules
            .iter()
            .filter(|m| m.is_default)
            .map(|m| m.id.clone())
            .collect();
        if defaults.len() > 1 {
            return Err(RegistryError::MultipleDefaultModules(defaults).into());
        }

        let mut modules = Vec::with_capacity(config.modules.len());
        for module in &config.modules {
            if let Some(layer) = &module.default_base_layer {
                if config.base_layer(layer).is_none() {
                    return Err(RegistryError::UnknownBaseLayer {
                        module: module.id.clone(),
                        layer: layer.clone(),
                    }
                    .into());
                }
            }
            let factory = self
                .modules
                .get(&module.class_name)
                .ok_or_else(|| RegistryError::UnknownModuleClass(module.class_name.clone()))?;
            modules.push(factory(module));
        }

        let mut geocoders = Vec::with_capacity(config.geocoders.len());
        for geocoder in &config.geocoders {
            let factory = self
                .geocoders
                .get(&geocoder.class_name)
                .ok_or_else(|| RegistryError::UnknownGeocoderClass(geocoder.class_name.clone()))?;
            geocoders.push(factory(geocoder));
        }

        let modes = config
            .modes
            .iter()
            .map(|entry| entry.key.parse::<ModeSet>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let default_module = config.modules.iter().position(|m| m.is_default);
        debug!(
            modules = modules.len(),
            geocoders = geocoders.len(),
            "configuration resolved"
        );

        Ok(ResolvedClient {
            modules,
            default_module,
            geocoders,
            modes,
        })
    }
}

/// Zoom overrides must be supported levels with `min <= init <= max`.
fn check_zoom(config: &Configuration) -> std::result::Result<(), RegistryError> {
    let levels = [
        ("min_zoom", config.min_zoom),
        ("init_zoom", config.init_zoom),
        ("max_zoom", config.max_zoom),
    ];
    for (setting, level) in levels {
        if let Some(level) = level {
            if !(MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&level) {
                return Err(RegistryError::ZoomOutOfRange {
                    setting: setting.to_string(),
                    level,
                });
            }
        }
    }
    let present: Vec<(&str, u8)> = levels
        .iter()
        .filter_map(|(setting, level)| level.map(|level| (*setting, level)))
        .collect();
    for pair in present.windows(2) {
        let ((lower, low), (upper, high)) = (pair[0], pair[1]);
        if low > high {
            return Err(RegistryError::UnorderedZoom {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
    }
    Ok(())
}

/// The configuration after identifiers were turned into implementations.
#[derive(Debug)]
pub struct ResolvedClient {
    modules: Vec<Box<dyn ClientModule>>,
    default_module: Option<usize>,
    geocoders: Vec<Box<dyn Geocoder>>,
    modes: Vec<ModeSet>,
}

impl ResolvedClient {
    pub fn modules(&self) -> &[Box<dyn ClientModule>] {
        &self.modules
    }

    /// The module flagged as default, or the first module when none is.
    pub fn initial_module(&self) -> Option<&dyn ClientModule> {
        self.default_module
            .or(if self.modules.is_empty() { None } else { Some(0) })
            .and_then(|index| self.modules.get(index))
            .map(Box::as_ref)
    }

    pub fn geocoders(&self) -> &[Box<dyn Geocoder>] {
        &self.geocoders
    }

    /// Parsed travel-mode combinations, in configured order.
    pub fn modes(&self) -> &[ModeSet] {
        &self.modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn registry_error(config: &Configuration) -> RegistryError {
        match Registry::with_builtins().resolve(config) {
            Err(Error::Registry(err)) => err,
            other => panic!("expected registry error, got {other:?}"),
        }
    }

    #[test]
    fn default_configuration_resolves() {
        let resolved = Registry::with_builtins()
            .resolve(&Configuration::default())
            .expect("defaults resolve");
        assert_eq!(resolved.modules().len(), 2);
        let initial = resolved.initial_module().unwrap();
        assert_eq!(initial.id(), "planner");
        assert_eq!(initial.title_key(), "Trip Planner");
        assert_eq!(initial.default_base_layer(), Some("OSM Standard"));
        assert_eq!(resolved.modes().len(), Configuration::default().modes.len());
    }

    #[test]
    fn unknown_module_class_is_reported() {
        let mut config = Configuration::default();
        config.modules[1].class_name = "otp.modules.bikeshare.BikeShareModule".to_string();
        assert_eq!(
            registry_error(&config),
            RegistryError::UnknownModuleClass("otp.modules.bikeshare.BikeShareModule".to_string())
        );
    }

    #[test]
    fn second_default_module_is_rejected() {
        let mut config = Configuration::default();
        config.modules[1].is_default = true;
        assert_eq!(
            registry_error(&config),
            RegistryError::MultipleDefaultModules(vec![
                "planner".to_string(),
                "bikeshare".to_string()
            ])
        );
    }

    #[test]
    fn zoom_overrides_within_bounds_resolve() {
        let config = Configuration {
            min_zoom: Some(10),
            init_zoom: Some(14),
            max_zoom: Some(20),
            ..Configuration::default()
        };
        assert!(Registry::with_builtins().resolve(&config).is_ok());
    }

    #[test]
    fn zoom_beyond_supported_levels_is_rejected() {
        let config = Configuration {
            max_zoom: Some(MAX_ZOOM_LEVEL + 1),
            ..Configuration::default()
        };
        assert_eq!(
            registry_error(&config),
            RegistryError::ZoomOutOfRange {
                setting: "max_zoom".to_string(),
                level: MAX_ZOOM_LEVEL + 1,
            }
        );
    }

    #[test]
    fn initial_zoom_outside_min_max_is_rejected() {
        let config = Configuration {
            min_zoom: Some(12),
            init_zoom: Some(8),
            ..Configuration::default()
        };
        assert_eq!(
            registry_error(&config),
            RegistryError::UnorderedZoom {
                lower: "min_zoom".to_string(),
                upper: "init_zoom".to_string(),
            }
        );

        let config = Configuration {
            min_zoom: Some(16),
            max_zoom: Some(10),
            ..Configuration::default()
        };
        assert_eq!(
            registry_error(&config),
            RegistryError::UnorderedZoom {
                lower: "min_zoom".to_string(),
                upper: "max_zoom".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_module_id_is_rejected() {
        let mut config = Configuration::default();
        config.modules[1].id = "planner".to_string();
        assert_eq!(
            registry_error(&config),
            RegistryError::DuplicateModuleId("planner".to_string())
        );
    }

    #[test]
    fn unknown_base_layer_is_rejected() {
        let mut config = Configuration::default();
        config.modules[0].default_base_layer = Some("MapQuest OSM".to_string());
        assert!(matches!(
            registry_error(&config),
            RegistryError::UnknownBaseLayer { layer, .. } if layer == "MapQuest OSM"
        ));
    }

    #[test]
    fn unknown_geocoder_class_is_reported() {
        let mut config = Configuration::default();
        config.geocoders.push(GeocoderConfig {
            name: "geocoder".to_string(),
            class_name: "otp.core.Geocoder".to_string(),
            url: "http://localhost:8080/otp-geocoder/geocode".to_string(),
            address_param: "address".to_string(),
        });
        assert_eq!(
            registry_error(&config),
            RegistryError::UnknownGeocoderClass("otp.core.Geocoder".to_string())
        );
    }

    #[test]
    fn http_geocoder_builds_encoded_request() {
        let mut config = Configuration::default();
        config.geocoders.push(GeocoderConfig {
            name: "geocoder".to_string(),
            class_name: "http_geocoder".to_string(),
            url: "http://localhost:8080/otp-geocoder/geocode".to_string(),
            address_param: "address".to_string(),
        });
        let resolved = Registry::with_builtins().resolve(&config).unwrap();
        let geocoder = &resolved.geocoders()[0];
        assert_eq!(geocoder.name(), "geocoder");
        assert_eq!(
            geocoder.request_url("Glavni trg 1"),
            "http://localhost:8080/otp-geocoder/geocode?address=Glavni%20trg%201"
        );
    }

    #[test]
    fn custom_module_can_be_registered() {
        fn kiosk(config: &ModuleConfig) -> Box<dyn ClientModule> {
            builtin(config, "Kiosk")
        }
        let mut config = Configuration::default();
        config.modules[1].class_name = "kiosk".to_string();
        let mut registry = Registry::with_builtins();
        registry.register_module("kiosk", kiosk);
        let resolved = registry.resolve(&config).unwrap();
        assert_eq!(resolved.modules()[1].title_key(), "Kiosk");
    }

    #[test]
    fn without_default_the_first_module_is_initial() {
        let mut config = Configuration::default();
        config.modules[0].is_default = false;
        let resolved = Registry::with_builtins().resolve(&config).unwrap();
        assert_eq!(resolved.initial_module().unwrap().id(), "planner");
    }

    #[test]
    fn bad_mode_key_is_rejected() {
        let mut config = Configuration::default();
        config.modes[0].key = "TRANSIT,HOVERCRAFT".to_string();
        assert_eq!(
            registry_error(&config),
            RegistryError::UnknownTravelMode("HOVERCRAFT".to_string())
        );
    }
}
