// SPDX-License-Identifier: MPL-2.0
//! Travel modes and the composite keys (`"TRANSIT,WALK"`) that label them in
//! the trip options.

use crate::error::RegistryError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TravelMode {
    Transit,
    Busish,
    Trainish,
    Walk,
    Bicycle,
    Car,
}

impl TravelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Transit => "TRANSIT",
            TravelMode::Busish => "BUSISH",
            TravelMode::Trainish => "TRAINISH",
            TravelMode::Walk => "WALK",
            TravelMode::Bicycle => "BICYCLE",
            TravelMode::Car => "CAR",
        }
    }
}

impl FromStr for TravelMode {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TRANSIT" => Ok(TravelMode::Transit),
            "BUSISH" => Ok(TravelMode::Busish),
            "TRAINISH" => Ok(TravelMode::Trainish),
            "WALK" => Ok(TravelMode::Walk),
            "BICYCLE" => Ok(TravelMode::Bicycle),
            "CAR" => Ok(TravelMode::Car),
            other => Err(RegistryError::UnknownTravelMode(other.to_string())),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered combination of travel modes, as written in a mode key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModeSet(Vec<TravelMode>);

impl ModeSet {
    pub fn modes(&self) -> &[TravelMode] {
        &self.0
    }

    pub fn contains(&self, mode: TravelMode) -> bool {
        self.0.contains(&mode)
    }

    /// Whether the combination involves public transport.
    pub fn uses_transit(&self) -> bool {
        self.0
            .iter()
            .any(|m| matches!(m, TravelMode::Transit | TravelMode::Busish | TravelMode::Trainish))
    }
}

impl FromStr for ModeSet {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(RegistryError::UnknownTravelMode(s.to_string()));
        }
        s.split(',')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(ModeSet)
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}
