//! Per-faction military management: recruitment, movement, upkeep

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;
use thiserror::Error;

use super::unit::MilitaryUnit;
use super::unit_type::UnitKind;
use crate::core::config::CombatConfig;
use crate::core::types::{FactionId, ResourceType, StationId, UnitId};
use crate::economy::{ResourceLedger, ResourcePool};
use crate::territory::{BuildingKind, PathFinder, Station, TravelClass};

/// Why a recruitment was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecruitRefusal {
    #[error("Insufficient population: need {required}, have {available}")]
    InsufficientPopulation { required: u32, available: u32 },

    #[error("Insufficient {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: ResourceType,
        required: u32,
        available: u32,
    },

    #[error("{kind} require an operational barracks")]
    MissingBarracks { kind: UnitKind },
}

/// Why a move order was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveRefusal {
    #[error("Unit {0} not found")]
    UnknownUnit(UnitId),

    #[error("Unit {0} is no longer active")]
    Inactive(UnitId),

    #[error("No path from {from} to {to}")]
    NoPath { from: StationId, to: StationId },

    #[error("Target is {distance} moves away, range is {range}")]
    OutOfRange { distance: u32, range: u32 },
}

/// Outcome of one upkeep pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    pub paid: Vec<(ResourceType, u32)>,
    /// (resource, owed, available)
    pub shortfalls: Vec<(ResourceType, u32, u32)>,
    pub deserted: Vec<UnitId>,
}

/// All units of one faction plus the id counter
#[derive(Debug, Clone)]
pub struct MilitaryManager {
    pub faction: FactionId,
    units: Vec<MilitaryUnit>,
    next_id: u32,
}

impl MilitaryManager {
    pub fn new(faction: impl Into<FactionId>) -> Self {
        Self {
            faction: faction.into(),
            units: Vec::new(),
            next_id: 1,
        }
    }

    /// Check every recruitment requirement without touching anything
    pub fn can_recruit(
        &self,
        kind: UnitKind,
        station: &Station,
        resources: &ResourcePool,
    ) -> Result<(), RecruitRefusal> {
        let spec = kind.spec();

        if station.population < spec.population_cost {
            return Err(RecruitRefusal::InsufficientPopulation {
                required: spec.population_cost,
                available: station.population,
            });
        }

        if let Some((resource, required, available)) =
            resources.first_shortfall(&spec.recruitment_cost)
        {
            return Err(RecruitRefusal::InsufficientResource {
                resource,
                required,
                available,
            });
        }

        if kind.is_elite() && station.operational_level(BuildingKind::Barracks).is_none() {
            return Err(RecruitRefusal::MissingBarracks { kind });
        }

        Ok(())
    }

    /// Recruit a unit at `station`, paying from `resources`
    pub fn recruit(
        &mut self,
        kind: UnitKind,
        station: &Station,
        resources: &mut ResourcePool,
    ) -> Result<UnitId, RecruitRefusal> {
        self.can_recruit(kind, station, resources)?;

        let consumed = resources.consume_all(&kind.spec().recruitment_cost);
        debug_assert!(consumed, "affordability checked above");

        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.push(MilitaryUnit::new(
            id,
            kind,
            self.faction.clone(),
            station.id.clone(),
        ));

        tracing::info!("{} recruited {} {} at {}", self.faction, kind, id, station.id);
        Ok(id)
    }

    /// Add an already-built unit, assigning it a fresh id
    pub fn enlist(&mut self, mut unit: MilitaryUnit) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        unit.id = id;
        unit.faction = self.faction.clone();
        self.units.push(unit);
        id
    }

    pub fn unit(&self, id: UnitId) -> Option<&MilitaryUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut MilitaryUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// All units still on the roster, in recruitment order
    pub fn units(&self) -> &[MilitaryUnit] {
        &self.units
    }

    /// Active units at a station, in recruitment order
    pub fn units_at<'a>(
        &'a self,
        station: &'a StationId,
    ) -> impl Iterator<Item = &'a MilitaryUnit> + 'a {
        self.units
            .iter()
            .filter(move |u| u.active && &u.station == station)
    }

    /// Ids of active units at a station, in recruitment order
    pub fn unit_ids_at(&self, station: &StationId) -> Vec<UnitId> {
        self.units_at(station).map(|u| u.id).collect()
    }

    pub fn active_units(&self) -> impl Iterator<Item = &MilitaryUnit> {
        self.units.iter().filter(|u| u.active)
    }

    /// Move a unit along a military route no longer than its range
    pub fn move_unit(
        &mut self,
        id: UnitId,
        target: &StationId,
        paths: &impl PathFinder,
    ) -> Result<(), MoveRefusal> {
        let unit = self.unit(id).ok_or(MoveRefusal::UnknownUnit(id))?;
        if !unit.active {
            return Err(MoveRefusal::Inactive(id));
        }

        let path = paths
            .shortest_path(&unit.station, target, Some(TravelClass::Military))
            .ok_or_else(|| MoveRefusal::NoPath {
                from: unit.station.clone(),
                to: target.clone(),
            })?;

        let distance = path.len().saturating_sub(1) as u32;
        let range = unit.spec().movement_range;
        if distance > range {
            return Err(MoveRefusal::OutOfRange { distance, range });
        }

        if let Some(unit) = self.unit_mut(id) {
            tracing::debug!("Unit {} moved {} -> {}", id, unit.station, target);
            unit.station = target.clone();
        }
        Ok(())
    }

    /// Summed upkeep of all active units
    pub fn total_maintenance(&self) -> AHashMap<ResourceType, u32> {
        let mut total: AHashMap<ResourceType, u32> = AHashMap::new();
        for unit in self.active_units() {
            for (resource, amount) in unit.maintenance_cost() {
                *total.entry(*resource).or_insert(0) += amount;
            }
        }
        total
    }

    /// Pay upkeep; every unpaid resource costs morale and may cause desertion
    pub fn process_maintenance(
        &mut self,
        resources: &mut impl ResourceLedger,
        config: &CombatConfig,
    ) -> MaintenanceReport {
        let owed = self.total_maintenance();
        let mut report = MaintenanceReport::default();

        for resource in ResourceType::ALL {
            let Some(&amount) = owed.get(&resource) else {
                continue;
            };
            if amount == 0 {
                continue;
            }
            if resources.subtract(resource, amount) {
                report.paid.push((resource, amount));
                continue;
            }

            let available = resources.amount(resource);
            tracing::warn!(
                "{} cannot pay {} {} upkeep (has {})",
                self.faction,
                amount,
                resource,
                available
            );
            report.shortfalls.push((resource, amount, available));

            for unit in self.units.iter_mut().filter(|u| u.active) {
                unit.modify_morale(-(config.maintenance_morale_penalty as i64));
                if unit.morale <= config.desertion_morale {
                    unit.active = false;
                    report.deserted.push(unit.id);
                    tracing::info!("{} {} deserted", self.faction, unit.id);
                }
            }
        }

        if !report.deserted.is_empty() {
            self.remove_destroyed();
        }
        report
    }

    /// Drop inactive units; returns how many were removed
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.units.len();
        self.units.retain(|u| u.active);
        before - self.units.len()
    }

    /// Active unit count per kind
    pub fn unit_summary(&self) -> BTreeMap<UnitKind, u32> {
        let mut summary = BTreeMap::new();
        for unit in self.active_units() {
            *summary.entry(unit.kind).or_insert(0) += 1;
        }
        summary
    }

    /// Summed effective strength of active units at a station
    pub fn strength_at(&self, station: &StationId) -> u32 {
        self.units_at(station).map(|u| u.effective_strength()).sum()
    }
}

/// Military managers for every faction
#[derive(Debug, Clone, Default)]
pub struct MilitaryRegistry {
    managers: AHashMap<FactionId, MilitaryManager>,
}

impl MilitaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manager(&self, faction: &FactionId) -> Option<&MilitaryManager> {
        self.managers.get(faction)
    }

    pub fn manager_mut(&mut self, faction: &FactionId) -> Option<&mut MilitaryManager> {
        self.managers.get_mut(faction)
    }

    pub fn get_or_create(&mut self, faction: &FactionId) -> &mut MilitaryManager {
        self.managers
            .entry(faction.clone())
            .or_insert_with(|| MilitaryManager::new(faction.clone()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&FactionId, &mut MilitaryManager)> {
        self.managers.iter_mut()
    }
}
