//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a faction ("Rangers", "Hanza", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub String);

impl FactionId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactionId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a station (a node of the metro graph)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub String);

impl StationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StationId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a military unit within its faction's manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Game turn counter
pub type Turn = u32;

/// The five tradeable resources of the metro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Food,
    CleanWater,
    Scrap,
    Medicine,
    /// Military-grade rounds, the premium currency
    MgrRounds,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Food,
        ResourceType::CleanWater,
        ResourceType::Scrap,
        ResourceType::Medicine,
        ResourceType::MgrRounds,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Food => "food",
            ResourceType::CleanWater => "clean_water",
            ResourceType::Scrap => "scrap",
            ResourceType::Medicine => "medicine",
            ResourceType::MgrRounds => "mgr_rounds",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clamp a signed value into the 0..=100 percentage band
pub fn clamp_percent(value: i64) -> u32 {
    value.clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_id_equality() {
        let a = FactionId::from("Rangers");
        let b = FactionId::new("Rangers");
        let c = FactionId::from("Hanza");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_station_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<StationId, &str> = HashMap::new();
        map.insert(StationId::from("Polis"), "capital");
        assert_eq!(map.get(&StationId::from("Polis")), Some(&"capital"));
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(ResourceType::MgrRounds.to_string(), "mgr_rounds");
        assert_eq!(ResourceType::CleanWater.name(), "clean_water");
        assert_eq!(ResourceType::ALL.len(), 5);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-15), 0);
        assert_eq!(clamp_percent(55), 55);
        assert_eq!(clamp_percent(140), 100);
    }
}
