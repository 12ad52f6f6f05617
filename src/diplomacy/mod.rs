//! Diplomatic relationship queries
//!
//! The combat core only ever asks one question: how do two factions feel
//! about each other? Negative values mean hostility.

use ahash::AHashMap;

use crate::core::types::FactionId;

/// Relationship value given to the fallback hostile pairs
pub const FALLBACK_HOSTILITY: i32 = -70;

/// Source of signed faction relationship values
pub trait Relations {
    fn relationship_value(&self, a: &FactionId, b: &FactionId) -> i32;

    fn is_hostile(&self, a: &FactionId, b: &FactionId) -> bool {
        self.relationship_value(a, b) < 0
    }
}

fn pair_key(a: &FactionId, b: &FactionId) -> (FactionId, FactionId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Symmetric relationship table; unknown pairs are neutral
#[derive(Debug, Clone, Default)]
pub struct RelationTable {
    values: AHashMap<(FactionId, FactionId), i32>,
}

impl RelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, a: &FactionId, b: &FactionId, value: i32) {
        self.values.insert(pair_key(a, b), value.clamp(-100, 100));
    }

    /// Shift a relationship, keeping it within [-100, 100]
    pub fn modify(&mut self, a: &FactionId, b: &FactionId, delta: i32) -> i32 {
        let entry = self.values.entry(pair_key(a, b)).or_insert(0);
        *entry = (*entry + delta).clamp(-100, 100);
        *entry
    }
}

impl Relations for RelationTable {
    fn relationship_value(&self, a: &FactionId, b: &FactionId) -> i32 {
        self.values.get(&pair_key(a, b)).copied().unwrap_or(0)
    }
}

/// Static hostilities used when no diplomacy collaborator is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct HostilePairs;

impl HostilePairs {
    const PAIRS: [(&'static str, &'static str); 4] = [
        ("Rangers", "Fourth Reich"),
        ("Rangers", "Red Line"),
        ("Fourth Reich", "Red Line"),
        ("Polis", "Invisible Watchers"),
    ];
}

impl Relations for HostilePairs {
    fn relationship_value(&self, a: &FactionId, b: &FactionId) -> i32 {
        let (a, b) = (a.as_str(), b.as_str());
        let hostile = Self::PAIRS
            .iter()
            .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a));
        if hostile {
            FALLBACK_HOSTILITY
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_symmetric() {
        let mut table = RelationTable::new();
        let hanza = FactionId::from("Hanza");
        let reich = FactionId::from("Fourth Reich");
        table.set(&hanza, &reich, -40);
        assert_eq!(table.relationship_value(&reich, &hanza), -40);
        assert!(table.is_hostile(&hanza, &reich));
    }

    #[test]
    fn test_table_defaults_to_neutral() {
        let table = RelationTable::new();
        assert_eq!(
            table.relationship_value(&"Polis".into(), &"Hanza".into()),
            0
        );
    }

    #[test]
    fn test_modify_clamps() {
        let mut table = RelationTable::new();
        let a = FactionId::from("Rangers");
        let b = FactionId::from("Red Line");
        assert_eq!(table.modify(&a, &b, -80), -80);
        assert_eq!(table.modify(&b, &a, -80), -100);
    }

    #[test]
    fn test_fallback_pairs() {
        let pairs = HostilePairs;
        assert_eq!(
            pairs.relationship_value(&"Red Line".into(), &"Rangers".into()),
            FALLBACK_HOSTILITY
        );
        assert_eq!(
            pairs.relationship_value(&"Rangers".into(), &"Polis".into()),
            0
        );
    }
}
