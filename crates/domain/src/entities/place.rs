//! Places reachable from the world map.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceId {
    Home,
    Cafe,
    Lab,
    Park,
    Office,
}

impl PlaceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceId::Home => "home",
            PlaceId::Cafe => "cafe",
            PlaceId::Lab => "lab",
            PlaceId::Park => "park",
            PlaceId::Office => "office",
        }
    }

    /// Going home is a scene change, not a place event.
    pub fn starts_event(&self) -> bool {
        !matches!(self, PlaceId::Home)
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(PlaceId::Home),
            "cafe" => Ok(PlaceId::Cafe),
            "lab" => Ok(PlaceId::Lab),
            "park" => Ok(PlaceId::Park),
            "office" => Ok(PlaceId::Office),
            other => Err(DomainError::parse(format!("Unknown place: {}", other))),
        }
    }
}
