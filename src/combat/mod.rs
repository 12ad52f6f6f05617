//! Combat resolution between factions
//!
//! Leaf first: `force` aggregates each side, `outcome` classifies the
//! encounter, `casualties` writes losses back onto rosters and `system`
//! orchestrates a whole attack.

pub mod casualties;
pub mod force;
pub mod jitter;
pub mod outcome;
pub mod report;
pub mod system;

pub use casualties::{apply_casualties, CasualtyReport};
pub use force::{ability_modifiers, aggregate_force, apply_supply_boost, AbilityModifiers, CombatForce};
pub use jitter::{FixedJitter, RandomSource};
pub use outcome::{
    classify, classify_ratio, resolve_ratio, strength_ratio, victory_odds, AttackType,
    Classification, CombatResult,
};
pub use report::{describe_battle, BattleHistory, BattleReport};
pub use system::{
    AttackOrder, AttackPreview, AttackRefusal, AttackResult, CombatContext, CombatSystem,
    FactionStrength,
};
