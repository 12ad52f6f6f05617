//! Combat configuration with documented constants
//!
//! Every number the combat core uses lives here so that balance passes
//! only ever touch one file (or a TOML override of it).

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{ConflictError, Result};
use crate::core::types::ResourceType;
use crate::territory::TravelClass;

/// Base equipment and leadership quality of a faction (both 0-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionProfile {
    pub equipment: u32,
    pub leadership: u32,
}

impl FactionProfile {
    pub const fn new(equipment: u32, leadership: u32) -> Self {
        Self { equipment, leadership }
    }
}

impl Default for FactionProfile {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

/// Cost multipliers per attack type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackMultipliers {
    pub assault: f64,
    pub siege: f64,
    pub raid: f64,
    pub infiltration: f64,
}

impl Default for AttackMultipliers {
    fn default() -> Self {
        Self {
            assault: 1.0,
            siege: 1.5,
            raid: 0.7,
            infiltration: 0.8,
        }
    }
}

/// Lower bounds of the five upper outcome buckets; anything below
/// `defeat` is a crushing defeat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeThresholds {
    pub decisive_victory: f64,
    pub victory: f64,
    pub pyrrhic_victory: f64,
    pub stalemate: f64,
    pub defeat: f64,
}

impl Default for OutcomeThresholds {
    fn default() -> Self {
        Self {
            decisive_victory: 0.8,
            victory: 0.65,
            pyrrhic_victory: 0.55,
            stalemate: 0.45,
            defeat: 0.3,
        }
    }
}

impl OutcomeThresholds {
    fn descending(&self) -> [f64; 5] {
        [
            self.decisive_victory,
            self.victory,
            self.pyrrhic_victory,
            self.stalemate,
            self.defeat,
        ]
    }
}

/// Fraction of manpower lost by (attacker, defender)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    pub attacker: f64,
    pub defender: f64,
}

impl RatePair {
    pub const fn new(attacker: f64, defender: f64) -> Self {
        Self { attacker, defender }
    }
}

/// Casualty rates for each of the six outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasualtyRates {
    pub decisive_victory: RatePair,
    pub victory: RatePair,
    pub pyrrhic_victory: RatePair,
    pub stalemate: RatePair,
    pub defeat: RatePair,
    pub crushing_defeat: RatePair,
}

impl Default for CasualtyRates {
    fn default() -> Self {
        Self {
            decisive_victory: RatePair::new(0.05, 0.30),
            victory: RatePair::new(0.10, 0.25),
            pyrrhic_victory: RatePair::new(0.20, 0.20),
            stalemate: RatePair::new(0.15, 0.15),
            defeat: RatePair::new(0.25, 0.10),
            crushing_defeat: RatePair::new(0.30, 0.05),
        }
    }
}

impl CasualtyRates {
    fn all(&self) -> [RatePair; 6] {
        [
            self.decisive_victory,
            self.victory,
            self.pyrrhic_victory,
            self.stalemate,
            self.defeat,
            self.crushing_defeat,
        ]
    }
}

/// Configuration for the combat core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === ATTACK PRICING ===
    /// Flat military-currency cost of any attack
    pub base_attack_cost: u32,

    /// Extra cost per node on the approach path (path includes both ends)
    pub cost_per_path_node: u32,

    /// Distance cost charged when no path exists
    pub unreachable_path_cost: u32,

    pub attack_multipliers: AttackMultipliers,

    /// Resource spent on attacks and supply boosts
    pub military_currency: ResourceType,

    /// Travel class used when pricing the approach
    pub pricing_travel_class: TravelClass,

    // === RESOLUTION ===
    /// Half-width of the uniform perturbation added to the strength ratio
    pub perturbation_spread: f64,

    /// Raids map a ratio r to `raid_base + r * raid_scale`
    pub raid_base: f64,
    pub raid_scale: f64,

    /// Flat ratio bonus for sieges
    pub siege_bonus: f64,

    pub thresholds: OutcomeThresholds,
    pub casualty_rates: CasualtyRates,

    /// Fraction of each defender resource seized on a decisive victory
    pub decisive_capture_rate: f64,

    /// Fraction of each defender resource seized on a plain victory
    pub victory_capture_rate: f64,

    // === CASUALTY APPLICATION ===
    /// Health lost per casualty assigned to a unit (capped at 100)
    ///
    /// At 10, a unit that absorbs ten casualties dies outright even from
    /// full health.
    pub casualty_health_factor: u32,

    /// Morale lost by units that survive a battle
    pub survivor_morale_penalty: u32,

    // === FACTIONS ===
    /// Base equipment/leadership per faction name
    pub faction_profiles: AHashMap<String, FactionProfile>,

    /// Profile for factions not listed above
    pub default_profile: FactionProfile,

    // === MAINTENANCE ===
    /// Morale lost by every active unit per unpaid maintenance resource
    pub maintenance_morale_penalty: u32,

    /// Units at or below this morale after a penalty desert
    pub desertion_morale: u32,

    // === SUPPLY BOOST ===
    /// Rounds needed per bonus point
    pub supply_rounds_per_point: u32,

    /// Maximum bonus points from one boost
    pub supply_bonus_cap: u32,

    // === PREVIEW ===
    /// Rough attacker casualty rate quoted by previews
    pub preview_casualty_rate: f64,

    // === CAPTURE ===
    /// Station morale lost on a hostile takeover
    pub capture_morale_loss: u32,

    /// Fraction of population that flees a hostile takeover
    pub refugee_rate: f64,

    /// Population below which nobody flees
    pub refugee_floor: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        let faction_profiles = [
            ("Rangers", FactionProfile::new(8, 8)),
            ("Fourth Reich", FactionProfile::new(7, 7)),
            ("Red Line", FactionProfile::new(5, 6)),
            ("Polis", FactionProfile::new(9, 7)),
            ("Hanza", FactionProfile::new(6, 5)),
            ("Invisible Watchers", FactionProfile::new(8, 9)),
            ("Independent", FactionProfile::new(4, 3)),
        ]
        .into_iter()
        .map(|(name, profile)| (name.to_string(), profile))
        .collect();

        Self {
            base_attack_cost: 50,
            cost_per_path_node: 5,
            unreachable_path_cost: 25,
            attack_multipliers: AttackMultipliers::default(),
            military_currency: ResourceType::MgrRounds,
            pricing_travel_class: TravelClass::Military,

            perturbation_spread: 0.2,
            raid_base: 0.3,
            raid_scale: 0.4,
            siege_bonus: 0.1,
            thresholds: OutcomeThresholds::default(),
            casualty_rates: CasualtyRates::default(),
            decisive_capture_rate: 0.3,
            victory_capture_rate: 0.2,

            casualty_health_factor: 10,
            survivor_morale_penalty: 10,

            faction_profiles,
            default_profile: FactionProfile::default(),

            maintenance_morale_penalty: 15,
            desertion_morale: 10,

            supply_rounds_per_point: 5,
            supply_bonus_cap: 20,

            preview_casualty_rate: 0.15,

            capture_morale_loss: 20,
            refugee_rate: 0.1,
            refugee_floor: 50,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document; missing keys keep defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate().map_err(ConflictError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Combat config loaded from {}", path.display());
        Ok(config)
    }

    /// Base profile for a faction, falling back to the default profile
    pub fn profile(&self, faction: &str) -> FactionProfile {
        self.faction_profiles
            .get(faction)
            .copied()
            .unwrap_or(self.default_profile)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let thresholds = self.thresholds.descending();
        if thresholds.iter().any(|t| *t <= 0.0 || *t >= 1.0) {
            return Err(format!("outcome thresholds must lie inside (0, 1): {:?}", thresholds));
        }
        if thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(format!("outcome thresholds must be strictly descending: {:?}", thresholds));
        }

        for pair in self.casualty_rates.all() {
            if !(0.0..=1.0).contains(&pair.attacker) || !(0.0..=1.0).contains(&pair.defender) {
                return Err(format!("casualty rates must lie in [0, 1]: {:?}", pair));
            }
        }

        for rate in [self.decisive_capture_rate, self.victory_capture_rate, self.refugee_rate] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("rate {} must lie in [0, 1]", rate));
            }
        }

        let m = self.attack_multipliers;
        if [m.assault, m.siege, m.raid, m.infiltration].iter().any(|x| *x <= 0.0) {
            return Err("attack multipliers must be positive".into());
        }

        if self.raid_scale <= 0.0 {
            return Err("raid_scale must be positive".into());
        }

        if self.perturbation_spread < 0.0 {
            return Err("perturbation_spread must not be negative".into());
        }

        if self.supply_rounds_per_point == 0 {
            return Err("supply_rounds_per_point must be at least 1".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<CombatConfig> = OnceLock::new();

/// Get the global combat config (initializes with defaults if not set)
pub fn config() -> &'static CombatConfig {
    CONFIG.get_or_init(CombatConfig::default)
}

/// Set the global combat config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: CombatConfig) -> std::result::Result<(), CombatConfig> {
    CONFIG.set(config)
}
