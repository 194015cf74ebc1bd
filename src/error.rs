// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    Locale(String),
    Resource(String),
    Registry(RegistryError),
}

/// Problems found while resolving a configuration against the module and
/// geocoder registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No factory registered for a module class identifier.
    UnknownModuleClass(String),

    /// No factory registered for a geocoder class identifier.
    UnknownGeocoderClass(String),

    /// Two modules share the same id.
    DuplicateModuleId(String),

    /// More than one module is flagged as the default one.
    MultipleDefaultModules(Vec<String>),

    /// A module names a default base layer that is not configured.
    UnknownBaseLayer { module: String, layer: String },

    /// A `modes` key contains an unknown travel mode.
    UnknownTravelMode(String),

    /// A map zoom override lies outside the supported levels.
    ZoomOutOfRange { setting: String, level: u8 },

    /// Zoom overrides contradict each other, e.g. `min_zoom > max_zoom`.
    UnorderedZoom { lower: String, upper: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownModuleClass(class) => {
                write!(f, "unknown module class '{}'", class)
            }
            RegistryError::UnknownGeocoderClass(class) => {
                write!(f, "unknown geocoder class '{}'", class)
            }
            RegistryError::DuplicateModuleId(id) => write!(f, "duplicate module id '{}'", id),
            RegistryError::MultipleDefaultModules(ids) => {
                write!(f, "more than one default module: {}", ids.join(", "))
            }
            RegistryError::UnknownBaseLayer { module, layer } => {
                write!(f, "module '{}' uses unknown base layer '{}'", module, layer)
            }
            RegistryError::UnknownTravelMode(mode) => write!(f, "unknown travel mode '{}'", mode),
            RegistryError::ZoomOutOfRange { setting, level } => {
                write!(f, "{} {} is outside the supported zoom levels", setting, level)
            }
            RegistryError::UnorderedZoom { lower, upper } => {
                write!(f, "{} must not exceed {}", lower, upper)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Locale(e) => write!(f, "Locale Error: {}", e),
            Error::Resource(e) => write!(f, "Resource Error: {}", e),
            Error::Registry(e) => write!(f, "Registry Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Registry(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Resource(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
