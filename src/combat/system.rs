//! The combat orchestrator
//!
//! `CombatSystem` validates and prices an attack, builds both forces,
//! classifies the encounter and applies the consequences. State it does not
//! own (stations, rosters, relations) comes in through `CombatContext`.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::casualties::{apply_casualties, CasualtyReport};
use super::force::{ability_modifiers, aggregate_force, apply_supply_boost, AbilityModifiers};
use super::jitter::RandomSource;
use super::outcome::{classify, strength_ratio, victory_odds, AttackType};
use super::report::{describe_battle, BattleHistory, BattleReport};
use crate::core::config::{config, CombatConfig};
use crate::core::types::{FactionId, ResourceType, StationId, Turn};
use crate::diplomacy::{HostilePairs, Relations};
use crate::economy::ResourceLedger;
use crate::military::{MilitaryRegistry, UnitKind};
use crate::territory::{PathFinder, StationRegistry};

/// Why an attack was refused; nothing is mutated when this is returned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttackRefusal {
    #[error("Target station {0} not found")]
    UnknownStation(StationId),

    #[error("Cannot attack your own stations")]
    SelfAttack,

    #[error("Cannot attack {defender} - not at war (relationship {relationship})")]
    NotAtWar {
        defender: FactionId,
        relationship: i32,
    },

    #[error("Insufficient {resource} for attack (need {required}, have {available})")]
    InsufficientResources {
        resource: ResourceType,
        required: u32,
        available: u32,
    },
}

/// Collaborators an attack reads and mutates
pub struct CombatContext<'a, M> {
    pub map: &'a mut M,
    pub armies: &'a mut MilitaryRegistry,
    /// Falls back to `HostilePairs` when absent
    pub relations: Option<&'a dyn Relations>,
}

impl<'a, M> CombatContext<'a, M> {
    pub fn new(map: &'a mut M, armies: &'a mut MilitaryRegistry) -> Self {
        Self {
            map,
            armies,
            relations: None,
        }
    }

    pub fn with_relations(mut self, relations: &'a dyn Relations) -> Self {
        self.relations = Some(relations);
        self
    }

    fn relationship(&self, a: &FactionId, b: &FactionId) -> i32 {
        match self.relations {
            Some(relations) => relations.relationship_value(a, b),
            None => HostilePairs.relationship_value(a, b),
        }
    }
}

/// An attack order: who strikes where, how, and with what extra supplies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOrder {
    pub origin: StationId,
    pub target: StationId,
    pub attacker: FactionId,
    pub attack_type: AttackType,
    /// Extra military currency spent on the attacking force
    pub supply_rounds: u32,
}

impl AttackOrder {
    pub fn new(
        origin: impl Into<StationId>,
        target: impl Into<StationId>,
        attacker: impl Into<FactionId>,
    ) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
            attacker: attacker.into(),
            attack_type: AttackType::Assault,
            supply_rounds: 0,
        }
    }

    pub fn with_type(mut self, attack_type: AttackType) -> Self {
        self.attack_type = attack_type;
        self
    }

    pub fn with_supply(mut self, rounds: u32) -> Self {
        self.supply_rounds = rounds;
        self
    }
}

/// Everything a resolved attack produced
#[derive(Debug, Clone, Serialize)]
pub struct AttackResult {
    /// Any of the three winning outcomes
    pub success: bool,
    pub message: String,
    pub report: BattleReport,
    pub territory_changed: bool,
    pub resources_captured: Vec<(ResourceType, u32)>,
    /// Military currency spent, supplies included
    pub cost_paid: u32,
    pub supply_bonus: u32,
    pub attacker_losses: CasualtyReport,
    pub defender_losses: CasualtyReport,
}

/// Read-only estimate of an attack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackPreview {
    pub attacker_strength: u32,
    pub defender_strength: u32,
    /// Attacker share of combined strength, truncated percent
    pub success_chance: u32,
    /// Probability of at least a pyrrhic victory
    pub victory_odds: f64,
    /// Price of an assault
    pub attack_cost: u32,
    pub estimated_casualties: u32,
    pub defender_faction: FactionId,
    pub ability_modifiers: AbilityModifiers,
}

/// Military standing of one faction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionStrength {
    pub faction: FactionId,
    pub total_stations: u32,
    pub military_stations: u32,
    pub total_manpower: u32,
    pub average_defensive_value: u32,
    pub equipment_quality: u32,
    pub leadership_quality: u32,
    pub units: BTreeMap<UnitKind, u32>,
}

#[derive(Debug, Clone, Default)]
pub struct CombatSystem {
    config: CombatConfig,
    history: BattleHistory,
}

impl CombatSystem {
    /// A system using the global config
    pub fn new() -> Self {
        Self::with_config(config().clone())
    }

    /// A system using an explicit config
    ///
    /// The config is not rejected here; a failed `validate()` is logged.
    pub fn with_config(config: CombatConfig) -> Self {
        if let Err(reason) = config.validate() {
            tracing::warn!("Combat config failed validation: {}", reason);
        }
        tracing::info!("Combat system initialized");
        Self {
            config,
            history: BattleHistory::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn history(&self) -> &BattleHistory {
        &self.history
    }

    /// Check that `attacker` may attack `target`; yields the defender
    pub fn can_attack<M: StationRegistry>(
        &self,
        ctx: &CombatContext<'_, M>,
        attacker: &FactionId,
        target: &StationId,
    ) -> Result<FactionId, AttackRefusal> {
        let station = ctx
            .map
            .station(target)
            .ok_or_else(|| AttackRefusal::UnknownStation(target.clone()))?;
        let defender = station.controlling_faction.clone();

        if &defender == attacker {
            return Err(AttackRefusal::SelfAttack);
        }

        let relationship = ctx.relationship(attacker, &defender);
        if relationship >= 0 {
            return Err(AttackRefusal::NotAtWar {
                defender,
                relationship,
            });
        }

        Ok(defender)
    }

    /// Military currency needed for an attack, supplies excluded
    pub fn attack_cost(
        &self,
        paths: &impl PathFinder,
        origin: &StationId,
        target: &StationId,
        attack_type: AttackType,
    ) -> u32 {
        let config = &self.config;
        let distance_cost = match paths.shortest_path(origin, target, Some(config.pricing_travel_class)) {
            Some(path) => path.len() as u32 * config.cost_per_path_node,
            None => config.unreachable_path_cost,
        };
        let raw = (config.base_attack_cost + distance_cost) as f64 * attack_type.cost_multiplier(config);
        raw.round() as u32
    }

    /// Resolve an attack and apply its consequences
    ///
    /// Validation and payment happen before anything else; a refusal leaves
    /// every pool, roster and station untouched.
    pub fn execute_attack<M, L, R>(
        &mut self,
        ctx: &mut CombatContext<'_, M>,
        order: &AttackOrder,
        resources: &mut L,
        turn: Turn,
        rng: &mut R,
    ) -> Result<AttackResult, AttackRefusal>
    where
        M: StationRegistry + PathFinder,
        L: ResourceLedger,
        R: RandomSource,
    {
        let defender = match self.can_attack(ctx, &order.attacker, &order.target) {
            Ok(defender) => defender,
            Err(refusal) => {
                tracing::warn!("{} attack refused: {}", order.attacker, refusal);
                return Err(refusal);
            }
        };

        // Price and pay in one step
        let currency = self.config.military_currency;
        let cost = self.attack_cost(&*ctx.map, &order.origin, &order.target, order.attack_type);
        let required = cost.saturating_add(order.supply_rounds);
        let available = resources.amount(currency);
        if available < required || !resources.subtract(currency, required) {
            let refusal = AttackRefusal::InsufficientResources {
                resource: currency,
                required,
                available,
            };
            tracing::warn!("{} attack refused: {}", order.attacker, refusal);
            return Err(refusal);
        }

        let config = &self.config;
        let mut attacker_force = aggregate_force(
            &order.origin,
            &order.attacker,
            false,
            &*ctx.map,
            &*ctx.armies,
            config,
        );
        let supply_bonus = apply_supply_boost(&mut attacker_force, order.supply_rounds, config);
        let defender_force = aggregate_force(&order.target, &defender, true, &*ctx.map, &*ctx.armies, config);

        let attacker_strength = attacker_force.total_strength();
        let defender_strength = defender_force.total_strength();
        let outcome = classify(attacker_strength, defender_strength, order.attack_type, config, rng);
        let result = outcome.result;

        let attacker_casualties = (attacker_force.manpower as f64 * outcome.rates.attacker).floor() as u32;
        let defender_casualties = (defender_force.manpower as f64 * outcome.rates.defender).floor() as u32;
        let territory_changed = result.transfers_territory();

        let mut messages = Vec::new();
        let mut captured = Vec::new();
        if territory_changed {
            if let Some(station) = ctx.map.station_mut(&order.target) {
                let rate = result.capture_rate(config);
                captured = station
                    .resources
                    .amounts()
                    .map(|(resource, amount)| (resource, (amount as f64 * rate).floor() as u32))
                    .filter(|(_, amount)| *amount > 0)
                    .collect();

                let old_faction = station.change_control(
                    order.attacker.clone(),
                    config.capture_morale_loss,
                    config.refugee_rate,
                    config.refugee_floor,
                );
                messages.push(format!("Captured {} from {}", order.target, old_faction));

                for (resource, amount) in &captured {
                    station.resources.subtract(*resource, *amount);
                    resources.add(*resource, *amount);
                }
                if !captured.is_empty() {
                    let summary: Vec<String> = captured
                        .iter()
                        .map(|(resource, amount)| format!("{} {}", amount, resource))
                        .collect();
                    messages.push(format!("Captured resources: {}", summary.join(", ")));
                }
            }
        }

        let attacker_losses = match ctx.armies.manager_mut(&order.attacker) {
            Some(manager) => apply_casualties(manager, &order.origin, attacker_casualties, config),
            None => CasualtyReport::default(),
        };
        let defender_losses = match ctx.armies.manager_mut(&defender) {
            Some(manager) => apply_casualties(manager, &order.target, defender_casualties, config),
            None => CasualtyReport::default(),
        };

        let description = describe_battle(
            &order.attacker,
            &defender,
            &order.target,
            result,
            attacker_casualties,
            defender_casualties,
        );
        let mut message = description.clone();
        if !messages.is_empty() {
            message.push_str(". ");
            message.push_str(&messages.join(". "));
        }

        let report = BattleReport {
            attacker: order.attacker.clone(),
            defender,
            attack_type: order.attack_type,
            attacker_strength,
            defender_strength,
            result,
            attacker_casualties,
            defender_casualties,
            territory_changed,
            resources_captured: captured.clone(),
            battle_description: description,
            turn_number: turn,
            attacker_station: order.origin.clone(),
            defender_station: order.target.clone(),
        };

        tracing::info!(
            "Turn {}: {} {} {} at {} ({} vs {}, ratio {:.2}): {}",
            turn,
            report.attacker,
            order.attack_type,
            report.defender,
            order.target,
            attacker_strength,
            defender_strength,
            outcome.ratio,
            result
        );
        self.history.push(report.clone());

        Ok(AttackResult {
            success: result.is_success(),
            message,
            report,
            territory_changed,
            resources_captured: captured,
            cost_paid: required,
            supply_bonus,
            attacker_losses,
            defender_losses,
        })
    }

    /// Estimate an assault without resolving it
    pub fn get_attack_preview<M>(
        &self,
        ctx: &CombatContext<'_, M>,
        origin: &StationId,
        target: &StationId,
        attacker: &FactionId,
    ) -> Result<AttackPreview, AttackRefusal>
    where
        M: StationRegistry + PathFinder,
    {
        let defender = self.can_attack(ctx, attacker, target)?;
        let config = &self.config;

        let attacker_force = aggregate_force(origin, attacker, false, &*ctx.map, &*ctx.armies, config);
        let defender_force = aggregate_force(target, &defender, true, &*ctx.map, &*ctx.armies, config);
        let attacker_strength = attacker_force.total_strength();
        let defender_strength = defender_force.total_strength();

        let success_chance = if attacker_strength == 0 && defender_strength == 0 {
            50
        } else {
            (strength_ratio(attacker_strength, defender_strength) * 100.0) as u32
        };

        let modifiers = ctx
            .armies
            .manager(attacker)
            .map(|m| ability_modifiers(m.units_at(origin)))
            .unwrap_or_default();

        Ok(AttackPreview {
            attacker_strength,
            defender_strength,
            success_chance,
            victory_odds: victory_odds(attacker_strength, defender_strength, AttackType::Assault, config),
            attack_cost: self.attack_cost(&*ctx.map, origin, target, AttackType::Assault),
            estimated_casualties: (attacker_force.manpower as f64 * config.preview_casualty_rate) as u32,
            defender_faction: defender,
            ability_modifiers: modifiers,
        })
    }

    /// The last `limit` battles, oldest first
    pub fn get_battle_history(&self, limit: usize) -> &[BattleReport] {
        self.history.recent(limit)
    }

    pub fn battles_involving(&self, faction: &FactionId) -> Vec<&BattleReport> {
        self.history.involving(faction).collect()
    }

    /// Defensive standing of every station a faction holds
    pub fn get_faction_military_strength<M: StationRegistry>(
        &self,
        ctx: &CombatContext<'_, M>,
        faction: &FactionId,
    ) -> FactionStrength {
        let config = &self.config;
        let mut total_stations = 0;
        let mut military_stations = 0;
        let mut total_manpower = 0;
        let mut total_defense = 0;

        for id in ctx.map.station_ids() {
            let Some(station) = ctx.map.station(&id) else {
                continue;
            };
            if &station.controlling_faction != faction {
                continue;
            }
            total_stations += 1;
            if station.has_military_building() {
                military_stations += 1;
            }
            let force = aggregate_force(&id, faction, true, &*ctx.map, &*ctx.armies, config);
            total_manpower += force.manpower;
            total_defense += force.defensive_bonus;
        }

        let profile = config.profile(faction.as_str());
        FactionStrength {
            faction: faction.clone(),
            total_stations,
            military_stations,
            total_manpower,
            average_defensive_value: total_defense / total_stations.max(1),
            equipment_quality: profile.equipment,
            leadership_quality: profile.leadership,
            units: ctx
                .armies
                .manager(faction)
                .map(|m| m.unit_summary())
                .unwrap_or_default(),
        }
    }
}
