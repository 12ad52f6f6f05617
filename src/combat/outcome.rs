//! Outcome classification from a strength ratio

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::jitter::RandomSource;
use crate::core::config::{CombatConfig, RatePair};

/// The six discrete battle results, best for the attacker first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResult {
    DecisiveVictory,
    Victory,
    PyrrhicVictory,
    Stalemate,
    Defeat,
    CrushingDefeat,
}

impl CombatResult {
    pub const ALL: [CombatResult; 6] = [
        CombatResult::DecisiveVictory,
        CombatResult::Victory,
        CombatResult::PyrrhicVictory,
        CombatResult::Stalemate,
        CombatResult::Defeat,
        CombatResult::CrushingDefeat,
    ];

    /// Any of the three winning outcomes
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CombatResult::DecisiveVictory | CombatResult::Victory | CombatResult::PyrrhicVictory
        )
    }

    /// Only clear victories change who holds the station
    pub fn transfers_territory(&self) -> bool {
        matches!(self, CombatResult::DecisiveVictory | CombatResult::Victory)
    }

    /// Fraction of each defender resource seized
    pub fn capture_rate(&self, config: &CombatConfig) -> f64 {
        match self {
            CombatResult::DecisiveVictory => config.decisive_capture_rate,
            CombatResult::Victory => config.victory_capture_rate,
            _ => 0.0,
        }
    }

    /// (attacker, defender) casualty rates
    pub fn casualty_rates(&self, config: &CombatConfig) -> RatePair {
        let rates = &config.casualty_rates;
        match self {
            CombatResult::DecisiveVictory => rates.decisive_victory,
            CombatResult::Victory => rates.victory,
            CombatResult::PyrrhicVictory => rates.pyrrhic_victory,
            CombatResult::Stalemate => rates.stalemate,
            CombatResult::Defeat => rates.defeat,
            CombatResult::CrushingDefeat => rates.crushing_defeat,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombatResult::DecisiveVictory => "decisive_victory",
            CombatResult::Victory => "victory",
            CombatResult::PyrrhicVictory => "pyrrhic_victory",
            CombatResult::Stalemate => "stalemate",
            CombatResult::Defeat => "defeat",
            CombatResult::CrushingDefeat => "crushing_defeat",
        }
    }
}

impl fmt::Display for CombatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an attack is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    #[default]
    Assault,
    Siege,
    Raid,
    Infiltration,
}

impl AttackType {
    pub const ALL: [AttackType; 4] = [
        AttackType::Assault,
        AttackType::Siege,
        AttackType::Raid,
        AttackType::Infiltration,
    ];

    pub fn cost_multiplier(&self, config: &CombatConfig) -> f64 {
        let m = &config.attack_multipliers;
        match self {
            AttackType::Assault => m.assault,
            AttackType::Siege => m.siege,
            AttackType::Raid => m.raid,
            AttackType::Infiltration => m.infiltration,
        }
    }

    /// Slope and offset of the ratio adjustment: `ratio * slope + offset`
    fn adjustment(&self, config: &CombatConfig) -> (f64, f64) {
        match self {
            AttackType::Raid => (config.raid_scale, config.raid_base),
            AttackType::Siege => (1.0, config.siege_bonus),
            AttackType::Assault | AttackType::Infiltration => (1.0, 0.0),
        }
    }

    /// Apply the attack-type adjustment to a (perturbed) ratio
    pub fn adjust(&self, ratio: f64, config: &CombatConfig) -> f64 {
        let (slope, offset) = self.adjustment(config);
        ratio * slope + offset
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttackType::Assault => "assault",
            AttackType::Siege => "siege",
            AttackType::Raid => "raid",
            AttackType::Infiltration => "infiltration",
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttackType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown attack type '{}'", s))
    }
}

/// Attacker share of the combined strength; 0.5 when both are zero
pub fn strength_ratio(attacker: u32, defender: u32) -> f64 {
    let total = attacker as f64 + defender as f64;
    if total == 0.0 {
        0.5
    } else {
        attacker as f64 / total
    }
}

/// Bucket an already adjusted and clamped ratio
pub fn classify_ratio(ratio: f64, config: &CombatConfig) -> CombatResult {
    let t = &config.thresholds;
    if ratio >= t.decisive_victory {
        CombatResult::DecisiveVictory
    } else if ratio >= t.victory {
        CombatResult::Victory
    } else if ratio >= t.pyrrhic_victory {
        CombatResult::PyrrhicVictory
    } else if ratio >= t.stalemate {
        CombatResult::Stalemate
    } else if ratio >= t.defeat {
        CombatResult::Defeat
    } else {
        CombatResult::CrushingDefeat
    }
}

/// Perturb, adjust for attack type, then clamp to [0, 1]
pub fn resolve_ratio(
    attacker: u32,
    defender: u32,
    attack_type: AttackType,
    config: &CombatConfig,
    rng: &mut impl RandomSource,
) -> f64 {
    let perturbed = strength_ratio(attacker, defender) + rng.perturbation(config.perturbation_spread);
    attack_type.adjust(perturbed, config).clamp(0.0, 1.0)
}

/// A classified encounter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub result: CombatResult,
    /// Final ratio the result was read from
    pub ratio: f64,
    pub rates: RatePair,
}

/// Map two strengths to a result and its casualty rates
///
/// Draws exactly one perturbation from `rng`.
pub fn classify(
    attacker: u32,
    defender: u32,
    attack_type: AttackType,
    config: &CombatConfig,
    rng: &mut impl RandomSource,
) -> Classification {
    let ratio = resolve_ratio(attacker, defender, attack_type, config, rng);
    let result = classify_ratio(ratio, config);
    Classification {
        result,
        ratio,
        rates: result.casualty_rates(config),
    }
}

/// Probability that the attack ends in at least a pyrrhic victory
///
/// Exact under the uniform perturbation.
pub fn victory_odds(
    attacker: u32,
    defender: u32,
    attack_type: AttackType,
    config: &CombatConfig,
) -> f64 {
    let raw = strength_ratio(attacker, defender);
    let (slope, offset) = attack_type.adjustment(config);
    if slope <= 0.0 {
        // A flat adjustment ignores the ratio entirely
        let reaches = offset.clamp(0.0, 1.0) >= config.thresholds.pyrrhic_victory;
        return if reaches { 1.0 } else { 0.0 };
    }
    // Smallest perturbed ratio that still reaches the threshold
    let needed = (config.thresholds.pyrrhic_victory - offset) / slope;
    let spread = config.perturbation_spread;

    if spread <= 0.0 {
        return if raw >= needed { 1.0 } else { 0.0 };
    }
    ((raw + spread - needed) / (2.0 * spread)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::jitter::FixedJitter;

    #[test]
    fn test_overwhelming_assault_is_decisive() {
        let config = CombatConfig::default();
        let c = classify(100, 20, AttackType::Assault, &config, &mut FixedJitter(0.0));
        assert!((c.ratio - 100.0 / 120.0).abs() < 1e-9);
        assert_eq!(c.result, CombatResult::DecisiveVictory);
        assert_eq!(c.rates, RatePair::new(0.05, 0.30));
    }

    #[test]
    fn test_raid_compresses_ratio() {
        let config = CombatConfig::default();
        let c = classify(90, 10, AttackType::Raid, &config, &mut FixedJitter(0.0));
        assert!((c.ratio - 0.66).abs() < 1e-9);
        assert_eq!(c.result, CombatResult::Victory);
    }

    #[test]
    fn test_siege_bonus() {
        let config = CombatConfig::default();
        // 0.5 + 0.1 lands in pyrrhic territory
        let c = classify(50, 50, AttackType::Siege, &config, &mut FixedJitter(0.0));
        assert_eq!(c.result, CombatResult::PyrrhicVictory);
        let c = classify(50, 50, AttackType::Infiltration, &config, &mut FixedJitter(0.0));
        assert_eq!(c.result, CombatResult::Stalemate);
    }

    #[test]
    fn test_zero_strengths_are_even() {
        assert_eq!(strength_ratio(0, 0), 0.5);
        let config = CombatConfig::default();
        let c = classify(0, 0, AttackType::Assault, &config, &mut FixedJitter(0.0));
        assert_eq!(c.result, CombatResult::Stalemate);
    }

    #[test]
    fn test_ratio_clamped() {
        let config = CombatConfig::default();
        let high = resolve_ratio(100, 0, AttackType::Siege, &config, &mut FixedJitter(0.2));
        assert_eq!(high, 1.0);
        let low = resolve_ratio(0, 100, AttackType::Assault, &config, &mut FixedJitter(-0.2));
        assert_eq!(low, 0.0);
        assert_eq!(classify_ratio(low, &config), CombatResult::CrushingDefeat);
    }

    #[test]
    fn test_thresholds_inclusive() {
        let config = CombatConfig::default();
        assert_eq!(classify_ratio(0.8, &config), CombatResult::DecisiveVictory);
        assert_eq!(classify_ratio(0.65, &config), CombatResult::Victory);
        assert_eq!(classify_ratio(0.3, &config), CombatResult::Defeat);
        assert_eq!(classify_ratio(0.2999, &config), CombatResult::CrushingDefeat);
    }

    #[test]
    fn test_loser_takes_larger_rate() {
        let config = CombatConfig::default();
        for result in CombatResult::ALL {
            let rates = result.casualty_rates(&config);
            if result.is_success() && result != CombatResult::PyrrhicVictory {
                assert!(rates.defender > rates.attacker);
            }
            if matches!(result, CombatResult::Defeat | CombatResult::CrushingDefeat) {
                assert!(rates.attacker > rates.defender);
            }
        }
    }

    #[test]
    fn test_only_clear_victories_transfer() {
        let transferring: Vec<_> = CombatResult::ALL
            .into_iter()
            .filter(|r| r.transfers_territory())
            .collect();
        assert_eq!(transferring, vec![CombatResult::DecisiveVictory, CombatResult::Victory]);
        assert!(CombatResult::PyrrhicVictory.is_success());
    }

    #[test]
    fn test_victory_odds() {
        let config = CombatConfig::default();
        // Even fight: need +0.05 out of [-0.2, 0.2]
        let even = victory_odds(50, 50, AttackType::Assault, &config);
        assert!((even - 0.375).abs() < 1e-9);
        assert_eq!(victory_odds(100, 0, AttackType::Assault, &config), 1.0);
        assert_eq!(victory_odds(0, 100, AttackType::Assault, &config), 0.0);
        assert!(victory_odds(50, 50, AttackType::Siege, &config) > even);
    }

    #[test]
    fn test_victory_odds_flat_raid_is_finite() {
        let mut config = CombatConfig::default();
        config.raid_scale = 0.0;
        assert_eq!(victory_odds(90, 10, AttackType::Raid, &config), 0.0);

        config.raid_base = 0.6;
        assert_eq!(victory_odds(10, 90, AttackType::Raid, &config), 1.0);
    }

    #[test]
    fn test_attack_type_parse() {
        assert_eq!("Siege".parse::<AttackType>(), Ok(AttackType::Siege));
        assert!("blitz".parse::<AttackType>().is_err());
    }
}
