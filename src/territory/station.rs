//! Stations: the territorial nodes factions fight over

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{clamp_percent, FactionId, StationId};
use crate::economy::ResourcePool;

/// Base defense every station starts with
pub const BASE_DEFENSIVE_VALUE: u32 = 10;

/// Maximum building efficiency level
pub const MAX_BUILDING_LEVEL: u32 = 3;

/// Kinds of infrastructure a station can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    MushroomFarm,
    WaterFilter,
    ScrapWorkshop,
    MedBay,
    Barracks,
    Fortifications,
    Market,
    Library,
}

impl BuildingKind {
    /// Flat bonus added to the station's defensive value when built
    pub fn defensive_value_bonus(&self) -> u32 {
        match self {
            BuildingKind::Barracks => 15,
            BuildingKind::Fortifications => 25,
            _ => 0,
        }
    }

    pub fn is_military(&self) -> bool {
        matches!(self, BuildingKind::Barracks | BuildingKind::Fortifications)
    }
}

/// A building instance at a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    /// Efficiency level, 1-3
    pub level: u32,
    /// 0 = intact, 100 = destroyed
    pub damage: u32,
}

impl Building {
    pub fn new(kind: BuildingKind, level: u32) -> Self {
        Self {
            kind,
            level: level.clamp(1, MAX_BUILDING_LEVEL),
            damage: 0,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.damage < 100
    }

    pub fn apply_damage(&mut self, amount: u32) {
        self.damage = (self.damage + amount).min(100);
    }

    pub fn repair(&mut self, amount: u32) {
        self.damage = self.damage.saturating_sub(amount);
    }
}

/// A metro station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub controlling_faction: FactionId,
    pub population: u32,
    /// 0-100
    pub morale: u32,
    pub defensive_value: u32,
    pub resources: ResourcePool,
    buildings: AHashMap<BuildingKind, Building>,
}

impl Station {
    pub fn new(id: impl Into<StationId>, faction: impl Into<FactionId>) -> Self {
        Self {
            id: id.into(),
            controlling_faction: faction.into(),
            population: 100,
            morale: 50,
            defensive_value: BASE_DEFENSIVE_VALUE,
            resources: ResourcePool::new(),
            buildings: AHashMap::new(),
        }
    }

    pub fn with_population(mut self, population: u32) -> Self {
        self.population = population;
        self
    }

    pub fn with_morale(mut self, morale: u32) -> Self {
        self.morale = morale.min(100);
        self
    }

    pub fn with_resources(mut self, resources: ResourcePool) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_building(mut self, kind: BuildingKind, level: u32) -> Self {
        self.add_building(kind, level);
        self
    }

    /// Construct a building; returns false if one of that kind already exists
    pub fn add_building(&mut self, kind: BuildingKind, level: u32) -> bool {
        if self.buildings.contains_key(&kind) {
            return false;
        }
        self.buildings.insert(kind, Building::new(kind, level));
        self.defensive_value += kind.defensive_value_bonus();
        true
    }

    pub fn building(&self, kind: BuildingKind) -> Option<&Building> {
        self.buildings.get(&kind)
    }

    pub fn building_mut(&mut self, kind: BuildingKind) -> Option<&mut Building> {
        self.buildings.get_mut(&kind)
    }

    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.buildings.contains_key(&kind)
    }

    /// Level of a building if it exists and is not destroyed
    pub fn operational_level(&self, kind: BuildingKind) -> Option<u32> {
        self.buildings
            .get(&kind)
            .filter(|b| b.is_operational())
            .map(|b| b.level)
    }

    pub fn has_military_building(&self) -> bool {
        self.buildings.keys().any(|k| k.is_military())
    }

    pub fn modify_morale(&mut self, delta: i64) {
        self.morale = clamp_percent(self.morale as i64 + delta);
    }

    /// Hand the station to a new faction
    ///
    /// Hostile takeovers cost morale and drive part of the population out.
    pub fn change_control(
        &mut self,
        new_faction: FactionId,
        morale_loss: u32,
        refugee_rate: f64,
        refugee_floor: u32,
    ) -> FactionId {
        let old_faction = std::mem::replace(&mut self.controlling_faction, new_faction);
        self.modify_morale(-(morale_loss as i64));

        if self.population > refugee_floor {
            let fled = (self.population as f64 * refugee_rate) as u32;
            self.population = self.population.saturating_sub(fled).max(refugee_floor);
        }

        tracing::info!(
            "Station {} captured by {} from {}",
            self.id,
            self.controlling_faction,
            old_faction
        );
        old_faction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_military_buildings_raise_defense() {
        let station = Station::new("Polis", "Polis")
            .with_building(BuildingKind::Barracks, 2)
            .with_building(BuildingKind::Fortifications, 1)
            .with_building(BuildingKind::MushroomFarm, 1);
        assert_eq!(station.defensive_value, BASE_DEFENSIVE_VALUE + 15 + 25);
        assert!(station.has_military_building());
    }

    #[test]
    fn test_duplicate_building_rejected() {
        let mut station = Station::new("VDNKh", "Independent");
        assert!(station.add_building(BuildingKind::Barracks, 1));
        assert!(!station.add_building(BuildingKind::Barracks, 3));
        assert_eq!(station.operational_level(BuildingKind::Barracks), Some(1));
    }

    #[test]
    fn test_destroyed_building_not_operational() {
        let mut station = Station::new("Kitay-Gorod", "Hanza").with_building(BuildingKind::Barracks, 3);
        station
            .building_mut(BuildingKind::Barracks)
            .unwrap()
            .apply_damage(150);
        assert!(station.has_building(BuildingKind::Barracks));
        assert_eq!(station.operational_level(BuildingKind::Barracks), None);

        station.building_mut(BuildingKind::Barracks).unwrap().repair(10);
        assert_eq!(station.operational_level(BuildingKind::Barracks), Some(3));
    }

    #[test]
    fn test_building_level_clamped() {
        assert_eq!(Building::new(BuildingKind::Library, 0).level, 1);
        assert_eq!(Building::new(BuildingKind::Library, 9).level, MAX_BUILDING_LEVEL);
    }

    #[test]
    fn test_hostile_takeover_effects() {
        let mut station = Station::new("Chekhovskaya", "Red Line")
            .with_population(200)
            .with_morale(60);
        let old = station.change_control(FactionId::from("Rangers"), 20, 0.1, 50);

        assert_eq!(old, FactionId::from("Red Line"));
        assert_eq!(station.controlling_faction, FactionId::from("Rangers"));
        assert_eq!(station.morale, 40);
        assert_eq!(station.population, 180);
    }

    #[test]
    fn test_takeover_respects_population_floor() {
        let mut station = Station::new("Tverskaya", "Fourth Reich").with_population(52).with_morale(10);
        station.change_control(FactionId::from("Rangers"), 20, 0.1, 50);
        assert_eq!(station.population, 50);
        assert_eq!(station.morale, 0);

        let mut small = Station::new("Dead End", "Independent").with_population(30);
        small.change_control(FactionId::from("Hanza"), 20, 0.1, 50);
        assert_eq!(small.population, 30);
    }
}
