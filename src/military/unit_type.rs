//! Unit kinds and their static stat table
//!
//! The table is built once on first access and never mutated.

use std::fmt;
use std::sync::OnceLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::ResourceType;

/// Ability tags the combat core looks at
pub mod abilities {
    pub const LEADERSHIP: &str = "leadership";
    pub const ELITE_TRAINING: &str = "elite_training";
    pub const FORTIFICATION: &str = "fortification";
    pub const ASSAULT: &str = "assault";
    pub const HEAVY_WEAPONS: &str = "heavy_weapons";
    pub const TUNNEL_WARFARE: &str = "tunnel_warfare";
}

/// Kind of military unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    // Basic - cheap, numerous
    Militia,
    Conscripts,

    // Elite - need barracks
    Stormtroopers,
    Rangers,

    // Specialist
    Scouts,
    Spies,
    Stalkers,

    // Support
    Caravans,
    Engineers,
}

impl UnitKind {
    pub const ALL: [UnitKind; 9] = [
        UnitKind::Militia,
        UnitKind::Conscripts,
        UnitKind::Stormtroopers,
        UnitKind::Rangers,
        UnitKind::Scouts,
        UnitKind::Spies,
        UnitKind::Stalkers,
        UnitKind::Caravans,
        UnitKind::Engineers,
    ];

    /// Static stats for this kind
    pub fn spec(&self) -> &'static UnitTypeSpec {
        &catalog()[*self as usize]
    }

    /// Elite kinds can only be raised at a station with working barracks
    pub fn is_elite(&self) -> bool {
        matches!(self, UnitKind::Stormtroopers | UnitKind::Rangers)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Militia => "militia",
            UnitKind::Conscripts => "conscripts",
            UnitKind::Stormtroopers => "stormtroopers",
            UnitKind::Rangers => "rangers",
            UnitKind::Scouts => "scouts",
            UnitKind::Spies => "spies",
            UnitKind::Stalkers => "stalkers",
            UnitKind::Caravans => "caravans",
            UnitKind::Engineers => "engineers",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable per-kind statistics
#[derive(Debug, Clone)]
pub struct UnitTypeSpec {
    pub kind: UnitKind,
    pub combat_strength: u32,
    pub movement_range: u32,
    pub recruitment_cost: AHashMap<ResourceType, u32>,
    pub population_cost: u32,
    /// Per-turn upkeep
    pub maintenance_cost: AHashMap<ResourceType, u32>,
    pub special_abilities: &'static [&'static str],
}

impl UnitTypeSpec {
    pub fn has_ability(&self, tag: &str) -> bool {
        self.special_abilities.contains(&tag)
    }
}

fn costs(pairs: &[(ResourceType, u32)]) -> AHashMap<ResourceType, u32> {
    pairs.iter().copied().collect()
}

static CATALOG: OnceLock<Vec<UnitTypeSpec>> = OnceLock::new();

/// The process-wide unit table, indexed by `UnitKind as usize`
pub fn catalog() -> &'static [UnitTypeSpec] {
    CATALOG.get_or_init(build_catalog)
}

fn build_catalog() -> Vec<UnitTypeSpec> {
    use ResourceType::{Food, Medicine, MgrRounds, Scrap};

    let catalog = vec![
        UnitTypeSpec {
            kind: UnitKind::Militia,
            combat_strength: 10,
            movement_range: 2,
            recruitment_cost: costs(&[(Food, 5), (Scrap, 3)]),
            population_cost: 2,
            maintenance_cost: costs(&[(Food, 1)]),
            special_abilities: &["local_knowledge"],
        },
        UnitTypeSpec {
            kind: UnitKind::Conscripts,
            combat_strength: 15,
            movement_range: 2,
            recruitment_cost: costs(&[(Food, 8), (Scrap, 5), (Medicine, 2)]),
            population_cost: 3,
            maintenance_cost: costs(&[(Food, 2)]),
            special_abilities: &["disciplined"],
        },
        UnitTypeSpec {
            kind: UnitKind::Stormtroopers,
            combat_strength: 35,
            movement_range: 3,
            recruitment_cost: costs(&[(Food, 20), (Scrap, 15), (Medicine, 8), (MgrRounds, 5)]),
            population_cost: 5,
            maintenance_cost: costs(&[(Food, 3), (Scrap, 2)]),
            special_abilities: &[abilities::ASSAULT, abilities::HEAVY_WEAPONS],
        },
        UnitTypeSpec {
            kind: UnitKind::Rangers,
            combat_strength: 40,
            movement_range: 4,
            recruitment_cost: costs(&[(Food, 25), (Scrap, 20), (Medicine, 10), (MgrRounds, 8)]),
            population_cost: 4,
            maintenance_cost: costs(&[(Food, 3), (Medicine, 1)]),
            special_abilities: &[
                abilities::ELITE_TRAINING,
                abilities::TUNNEL_WARFARE,
                abilities::LEADERSHIP,
            ],
        },
        UnitTypeSpec {
            kind: UnitKind::Scouts,
            combat_strength: 8,
            movement_range: 5,
            recruitment_cost: costs(&[(Food, 10), (Scrap, 8)]),
            population_cost: 1,
            maintenance_cost: costs(&[(Food, 1)]),
            special_abilities: &["stealth", "reconnaissance", "fast_movement"],
        },
        UnitTypeSpec {
            kind: UnitKind::Spies,
            combat_strength: 5,
            movement_range: 3,
            recruitment_cost: costs(&[(Food, 15), (Medicine, 5), (MgrRounds, 3)]),
            population_cost: 1,
            maintenance_cost: costs(&[(Food, 2)]),
            special_abilities: &["infiltration", "sabotage", "intelligence"],
        },
        UnitTypeSpec {
            kind: UnitKind::Stalkers,
            combat_strength: 25,
            movement_range: 4,
            recruitment_cost: costs(&[(Food, 18), (Scrap, 12), (Medicine, 6)]),
            population_cost: 2,
            maintenance_cost: costs(&[(Food, 2), (Scrap, 1)]),
            special_abilities: &["anomaly_resistance", "scavenging", "survival"],
        },
        UnitTypeSpec {
            kind: UnitKind::Caravans,
            combat_strength: 3,
            movement_range: 3,
            recruitment_cost: costs(&[(Scrap, 20), (Food, 5)]),
            population_cost: 3,
            maintenance_cost: costs(&[(Scrap, 1)]),
            special_abilities: &["cargo_transport", "trade_bonus"],
        },
        UnitTypeSpec {
            kind: UnitKind::Engineers,
            combat_strength: 8,
            movement_range: 2,
            recruitment_cost: costs(&[(Scrap, 25), (Medicine, 8), (MgrRounds, 2)]),
            population_cost: 4,
            maintenance_cost: costs(&[(Scrap, 2)]),
            special_abilities: &["construction", "repair", abilities::FORTIFICATION],
        },
    ];

    debug_assert!(catalog
        .iter()
        .enumerate()
        .all(|(i, spec)| spec.kind as usize == i));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_indexed_by_kind() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn test_elite_kinds() {
        let elite: Vec<UnitKind> = UnitKind::ALL.into_iter().filter(|k| k.is_elite()).collect();
        assert_eq!(elite, vec![UnitKind::Stormtroopers, UnitKind::Rangers]);
    }

    #[test]
    fn test_rangers_abilities() {
        let spec = UnitKind::Rangers.spec();
        assert!(spec.has_ability(abilities::LEADERSHIP));
        assert!(spec.has_ability(abilities::ELITE_TRAINING));
        assert!(!spec.has_ability(abilities::FORTIFICATION));
    }

    #[test]
    fn test_stat_values_distinct() {
        let militia = UnitKind::Militia.spec();
        assert_eq!(militia.combat_strength, 10);
        assert_eq!(militia.recruitment_cost.get(&ResourceType::Food), Some(&5));
        assert_eq!(UnitKind::Engineers.spec().population_cost, 4);
        assert_eq!(
            UnitKind::Stormtroopers.spec().recruitment_cost.get(&ResourceType::MgrRounds),
            Some(&5)
        );
    }
}
