//! Force aggregation
//!
//! Turns whatever is standing at a station (a unit roster, or failing that
//! the civilian population) into a single `CombatForce`.

use serde::Serialize;

use crate::core::config::CombatConfig;
use crate::core::types::{FactionId, StationId};
use crate::military::{abilities, MilitaryRegistry, MilitaryUnit};
use crate::territory::{BuildingKind, Station, StationRegistry};

/// Abstract combat statistics for one side of a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatForce {
    pub faction: FactionId,
    pub station: StationId,
    pub manpower: u32,
    /// 1-10
    pub equipment_quality: u32,
    /// 10-100 after aggregation
    pub morale: u32,
    /// 0-10
    pub leadership: u32,
    pub defensive_bonus: u32,
    pub terrain_bonus: u32,
    pub supply_bonus: u32,
}

impl CombatForce {
    pub fn new(faction: FactionId, station: StationId) -> Self {
        Self {
            faction,
            station,
            manpower: 0,
            equipment_quality: 1,
            morale: 50,
            leadership: 1,
            defensive_bonus: 0,
            terrain_bonus: 0,
            supply_bonus: 0,
        }
    }

    /// Fallback for an origin that does not exist
    pub fn minimal(faction: FactionId, station: StationId) -> Self {
        Self {
            manpower: 10,
            ..Self::new(faction, station)
        }
    }

    /// Single strength figure fed to the outcome classifier
    pub fn total_strength(&self) -> u32 {
        let base = self.manpower as f64
            * (self.equipment_quality as f64 / 10.0)
            * (0.5 + self.morale as f64 / 200.0)
            * (1.0 + self.leadership as f64 / 20.0);

        (base as u32)
            .saturating_add(self.defensive_bonus)
            .saturating_add(self.terrain_bonus)
            .saturating_add(self.supply_bonus)
    }
}

/// Build the force `faction` can field at `station_id`
///
/// Unknown stations yield the minimal force; this never fails.
pub fn aggregate_force(
    station_id: &StationId,
    faction: &FactionId,
    is_defender: bool,
    stations: &impl StationRegistry,
    armies: &MilitaryRegistry,
    config: &CombatConfig,
) -> CombatForce {
    let Some(station) = stations.station(station_id) else {
        tracing::debug!("No station {}, fielding minimal force for {}", station_id, faction);
        return CombatForce::minimal(faction.clone(), station_id.clone());
    };

    let units: Vec<&MilitaryUnit> = armies
        .manager(faction)
        .map(|m| m.units_at(station_id).collect())
        .unwrap_or_default();

    let force = build_force(station, faction, &units, is_defender, config);
    tracing::debug!(
        "{} force at {}: manpower {}, equipment {}, morale {}, leadership {}, defense {}",
        faction,
        station_id,
        force.manpower,
        force.equipment_quality,
        force.morale,
        force.leadership,
        force.defensive_bonus
    );
    force
}

fn build_force(
    station: &Station,
    faction: &FactionId,
    units: &[&MilitaryUnit],
    is_defender: bool,
    config: &CombatConfig,
) -> CombatForce {
    let profile = config.profile(faction.as_str());
    let mut force = CombatForce::new(faction.clone(), station.id.clone());

    if units.is_empty() {
        // Civilian levy
        force.manpower = (station.population / 20).max(5);
        force.equipment_quality = profile.equipment.saturating_sub(2).max(1);
        force.morale = station.morale.saturating_sub(20).max(30);
        force.leadership = profile.leadership.saturating_sub(2).max(1);
    } else {
        let count = units.len() as f64;
        let total_strength: u32 = units.iter().map(|u| u.effective_strength()).sum();
        let avg_equipment = units.iter().map(|u| u.equipment_level).sum::<u32>() as f64 / count;
        let avg_morale = units.iter().map(|u| u.morale).sum::<u32>() as f64 / count;

        // Elite training only counts for units that are not already leaders
        let leaders = count_with(units, abilities::LEADERSHIP);
        let elite = units
            .iter()
            .filter(|u| {
                !u.has_ability(abilities::LEADERSHIP) && u.has_ability(abilities::ELITE_TRAINING)
            })
            .count() as u32;

        force.manpower = (total_strength / 2).max(10);
        force.equipment_quality = ((avg_equipment * 2.0).round() as u32).min(10);
        force.morale = avg_morale.round() as u32;
        force.leadership = (profile.leadership + leaders * 2 + elite).min(10);
    }

    if let Some(level) = station.operational_level(BuildingKind::Barracks) {
        force.manpower += level * 3;
        force.equipment_quality += level;
    }

    force.equipment_quality = force.equipment_quality.min(10);
    force.morale = force.morale.clamp(10, 100);
    force.leadership = force.leadership.min(10);

    if is_defender {
        let fortification_level = station
            .operational_level(BuildingKind::Fortifications)
            .unwrap_or(0);
        force.defensive_bonus = station.defensive_value
            + fortification_level * 10
            + count_with(units, abilities::FORTIFICATION) * 5;
    }

    force
}

fn count_with(units: &[&MilitaryUnit], tag: &str) -> u32 {
    units.iter().filter(|u| u.has_ability(tag)).count() as u32
}

/// Spend extra military currency on an attacking force
///
/// Returns the bonus points granted.
pub fn apply_supply_boost(force: &mut CombatForce, rounds: u32, config: &CombatConfig) -> u32 {
    if rounds == 0 {
        return 0;
    }
    let bonus = (rounds / config.supply_rounds_per_point.max(1)).min(config.supply_bonus_cap);

    force.equipment_quality = (force.equipment_quality + bonus / 4).min(10);
    force.morale = (force.morale + bonus / 2).min(100);
    force.leadership = (force.leadership + bonus / 10).min(10);

    tracing::info!(
        "{} spent {} rounds on supplies: +{} equipment, +{} morale",
        force.faction,
        rounds,
        bonus / 4,
        bonus / 2
    );
    bonus
}

/// Bonuses implied by the special abilities present in a roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbilityModifiers {
    pub assault_bonus: u32,
    pub defensive_bonus: u32,
    pub morale_bonus: u32,
    pub equipment_bonus: u32,
}

pub fn ability_modifiers<'a>(units: impl IntoIterator<Item = &'a MilitaryUnit>) -> AbilityModifiers {
    let mut modifiers = AbilityModifiers::default();
    for unit in units {
        if unit.has_ability(abilities::ASSAULT) {
            modifiers.assault_bonus += 5;
        }
        if unit.has_ability(abilities::HEAVY_WEAPONS) {
            modifiers.equipment_bonus += 2;
        }
        if unit.has_ability(abilities::ELITE_TRAINING) {
            modifiers.morale_bonus += 10;
        }
        if unit.has_ability(abilities::TUNNEL_WARFARE) {
            modifiers.assault_bonus += 3;
            modifiers.defensive_bonus += 3;
        }
        if unit.has_ability(abilities::LEADERSHIP) {
            modifiers.morale_bonus += 5;
        }
    }
    modifiers
}
