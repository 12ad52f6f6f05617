//! Resource pools held by factions and stations

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::ResourceType;

/// The only resource operations the combat core relies on
pub trait ResourceLedger {
    /// Current amount of a resource
    fn amount(&self, resource: ResourceType) -> u32;

    /// Remove `amount` of a resource; refuses and changes nothing when short
    fn subtract(&mut self, resource: ResourceType, amount: u32) -> bool;

    /// Deposit `amount` of a resource
    fn add(&mut self, resource: ResourceType, amount: u32);

    fn has_at_least(&self, resource: ResourceType, amount: u32) -> bool {
        self.amount(resource) >= amount
    }
}

/// A pool of resources; amounts can never go negative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    resources: AHashMap<ResourceType, u32>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from (resource, amount) pairs
    pub fn with_amounts(amounts: &[(ResourceType, u32)]) -> Self {
        let mut pool = Self::new();
        for (resource, amount) in amounts {
            pool.set(*resource, *amount);
        }
        pool
    }

    /// Overwrite the stored amount of a resource
    pub fn set(&mut self, resource: ResourceType, amount: u32) {
        self.resources.insert(resource, amount);
    }

    /// Check if the pool covers every requirement
    pub fn has_all(&self, requirements: &AHashMap<ResourceType, u32>) -> bool {
        requirements
            .iter()
            .all(|(resource, amount)| self.amount(*resource) >= *amount)
    }

    /// First requirement the pool cannot cover, in resource order
    pub fn first_shortfall(
        &self,
        requirements: &AHashMap<ResourceType, u32>,
    ) -> Option<(ResourceType, u32, u32)> {
        ResourceType::ALL.iter().find_map(|resource| {
            let needed = requirements.get(resource).copied().unwrap_or(0);
            let have = self.amount(*resource);
            (have < needed).then_some((*resource, needed, have))
        })
    }

    /// Consume all requirements or none of them
    pub fn consume_all(&mut self, requirements: &AHashMap<ResourceType, u32>) -> bool {
        if !self.has_all(requirements) {
            return false;
        }
        for (resource, amount) in requirements {
            if let Some(stored) = self.resources.get_mut(resource) {
                *stored -= *amount;
            }
        }
        true
    }

    /// Non-zero amounts in resource order
    pub fn amounts(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL
            .into_iter()
            .map(|resource| (resource, self.amount(resource)))
            .filter(|(_, amount)| *amount > 0)
    }
}

impl ResourceLedger for ResourcePool {
    fn amount(&self, resource: ResourceType) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    fn subtract(&mut self, resource: ResourceType, amount: u32) -> bool {
        let stored = self.amount(resource);
        if stored < amount {
            tracing::debug!("Insufficient {}: have {}, need {}", resource, stored, amount);
            return false;
        }
        self.resources.insert(resource, stored - amount);
        true
    }

    fn add(&mut self, resource: ResourceType, amount: u32) {
        let entry = self.resources.entry(resource).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}
