//! Battle reports and the append-only battle history

use serde::{Deserialize, Serialize};

use super::outcome::{AttackType, CombatResult};
use crate::core::types::{FactionId, ResourceType, StationId, Turn};

/// Record of one resolved attack; never modified once logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub attacker: FactionId,
    pub defender: FactionId,
    pub attack_type: AttackType,
    pub attacker_strength: u32,
    pub defender_strength: u32,
    pub result: CombatResult,
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub territory_changed: bool,
    /// Non-zero captures only, in resource order
    pub resources_captured: Vec<(ResourceType, u32)>,
    pub battle_description: String,
    pub turn_number: Turn,
    pub attacker_station: StationId,
    pub defender_station: StationId,
}

impl BattleReport {
    pub fn involves(&self, faction: &FactionId) -> bool {
        &self.attacker == faction || &self.defender == faction
    }

    pub fn captured(&self, resource: ResourceType) -> u32 {
        self.resources_captured
            .iter()
            .find(|(r, _)| *r == resource)
            .map_or(0, |(_, amount)| *amount)
    }
}

/// Narrative line for a battle, one template per outcome
pub fn describe_battle(
    attacker: &FactionId,
    defender: &FactionId,
    station: &StationId,
    result: CombatResult,
    attacker_casualties: u32,
    defender_casualties: u32,
) -> String {
    let headline = match result {
        CombatResult::DecisiveVictory => {
            format!("{} forces overwhelmed {} defenders at {}", attacker, defender, station)
        }
        CombatResult::Victory => {
            format!("{} successfully captured {} from {}", attacker, station, defender)
        }
        CombatResult::PyrrhicVictory => format!("{} took {} but at heavy cost", attacker, station),
        CombatResult::Stalemate => format!("Fierce fighting at {} ended in stalemate", station),
        CombatResult::Defeat => format!("{} repelled {} attack on {}", defender, attacker, station),
        CombatResult::CrushingDefeat => format!("{} forces were routed at {}", attacker, station),
    };
    format!(
        "{}. Casualties: {} {}, {} {}",
        headline, attacker, attacker_casualties, defender, defender_casualties
    )
}

/// Every battle resolved so far, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleHistory {
    reports: Vec<BattleReport>,
}

impl BattleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: BattleReport) {
        self.reports.push(report);
    }

    /// The last `limit` reports, oldest first
    pub fn recent(&self, limit: usize) -> &[BattleReport] {
        let start = self.reports.len().saturating_sub(limit);
        &self.reports[start..]
    }

    pub fn involving<'a>(&'a self, faction: &FactionId) -> impl Iterator<Item = &'a BattleReport> + 'a {
        let faction = faction.clone();
        self.reports.iter().filter(move |r| r.involves(&faction))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
