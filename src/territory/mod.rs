//! Territory: stations, their infrastructure, and the tunnel graph

pub mod metro_map;
pub mod station;

pub use metro_map::{MetroMap, TravelClass, Tunnel, TunnelState};
pub use station::{Building, BuildingKind, Station};

use crate::core::types::StationId;

/// Lookup of stations by id
pub trait StationRegistry {
    fn station(&self, id: &StationId) -> Option<&Station>;
    fn station_mut(&mut self, id: &StationId) -> Option<&mut Station>;
    /// All station ids, in a stable order
    fn station_ids(&self) -> Vec<StationId>;
}

/// Shortest-path queries over the territorial graph
pub trait PathFinder {
    /// Ordered list of nodes from `from` to `to` (inclusive), or None when unreachable
    fn shortest_path(
        &self,
        from: &StationId,
        to: &StationId,
        class: Option<TravelClass>,
    ) -> Option<Vec<StationId>>;
}
