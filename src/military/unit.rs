//! Military unit instances
//!
//! A unit is one recruited formation of a given kind. Its mutable state is
//! health, morale, experience and equipment; everything else comes from the
//! static catalog.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::unit_type::{UnitKind, UnitTypeSpec};
use crate::core::types::{clamp_percent, FactionId, ResourceType, StationId, UnitId};

/// Equipment levels run 1-5
pub const MAX_EQUIPMENT_LEVEL: u32 = 5;

/// What happened to a unit after taking damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Survived,
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryUnit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub faction: FactionId,
    /// Current location
    pub station: StationId,
    pub equipment_level: u32,
    pub experience: u32,
    pub health: u32,
    pub morale: u32,
    pub active: bool,
}

impl MilitaryUnit {
    pub fn new(id: UnitId, kind: UnitKind, faction: FactionId, station: StationId) -> Self {
        Self {
            id,
            kind,
            faction,
            station,
            equipment_level: 1,
            experience: 0,
            health: 100,
            morale: 100,
            active: true,
        }
    }

    pub fn with_equipment(mut self, level: u32) -> Self {
        self.equipment_level = level.clamp(1, MAX_EQUIPMENT_LEVEL);
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience.min(100);
        self
    }

    pub fn spec(&self) -> &'static UnitTypeSpec {
        self.kind.spec()
    }

    /// Combat strength after equipment, experience, health and morale
    pub fn effective_strength(&self) -> u32 {
        let base = self.spec().combat_strength as f64;
        let equipment_mod = 1.0 + (self.equipment_level as f64 - 1.0) * 0.2;
        let experience_mod = 1.0 + (self.experience as f64 / 100.0) * 0.5;
        let health_mod = self.health as f64 / 100.0;
        let morale_mod = 0.5 + (self.morale as f64 / 100.0) * 0.5;

        (base * equipment_mod * experience_mod * health_mod * morale_mod).floor() as u32
    }

    /// Lose health; a unit reduced to 0 is out for good
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.active = false;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Survived
        }
    }

    pub fn has_ability(&self, tag: &str) -> bool {
        self.spec().has_ability(tag)
    }

    pub fn modify_morale(&mut self, delta: i64) {
        self.morale = clamp_percent(self.morale as i64 + delta);
    }

    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = (self.experience + amount).min(100);
    }

    /// Per-turn upkeep of this unit
    pub fn maintenance_cost(&self) -> &'static AHashMap<ResourceType, u32> {
        &self.spec().maintenance_cost
    }
}
