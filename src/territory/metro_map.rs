//! The metro graph: stations connected by tunnels
//!
//! Path queries run Dijkstra over tunnel travel costs. Which tunnels are
//! usable depends on the travel class of whoever is moving.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use super::station::Station;
use super::{PathFinder, StationRegistry};
use crate::core::types::StationId;

/// Tunnels more dangerous than this are avoided by path queries
pub const MAX_SAFE_DANGER: u32 = 50;

/// Who is traveling; decides tunnel passability and cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelClass {
    #[default]
    Military,
    Civilian,
    Scout,
}

impl TravelClass {
    fn base_cost(&self) -> u32 {
        match self {
            TravelClass::Military => 2,
            TravelClass::Civilian => 3,
            TravelClass::Scout => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TunnelState {
    #[default]
    Clear,
    Hazardous,
    Infested,
    Anomalous,
    Collapsed,
}

impl TunnelState {
    fn base_danger(&self) -> u32 {
        match self {
            TunnelState::Clear => 0,
            TunnelState::Hazardous => 30,
            TunnelState::Infested => 60,
            TunnelState::Anomalous => 80,
            TunnelState::Collapsed => 100,
        }
    }

    /// Cost multiplier in percent
    fn cost_percent(&self) -> u32 {
        match self {
            TunnelState::Clear => 100,
            TunnelState::Hazardous => 150,
            TunnelState::Infested => 200,
            TunnelState::Anomalous => 300,
            TunnelState::Collapsed => 0,
        }
    }
}

/// An undirected tunnel between two stations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tunnel {
    pub a: StationId,
    pub b: StationId,
    pub state: TunnelState,
    /// 0-100
    pub hazard: u32,
}

impl Tunnel {
    pub fn new(a: impl Into<StationId>, b: impl Into<StationId>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            state: TunnelState::Clear,
            hazard: 0,
        }
    }

    pub fn with_state(mut self, state: TunnelState) -> Self {
        self.state = state;
        self
    }

    pub fn with_hazard(mut self, hazard: u32) -> Self {
        self.hazard = hazard.min(100);
        self
    }

    pub fn is_passable(&self, class: TravelClass) -> bool {
        match self.state {
            TunnelState::Collapsed => false,
            TunnelState::Anomalous => class == TravelClass::Scout,
            TunnelState::Infested => class != TravelClass::Civilian,
            _ => true,
        }
    }

    pub fn danger(&self) -> u32 {
        (self.state.base_danger() + self.hazard).min(100)
    }

    pub fn travel_cost(&self, class: TravelClass) -> u32 {
        let cost = class.base_cost() * self.state.cost_percent() * (100 + self.hazard) / 10_000;
        cost.max(1)
    }

    fn other_end(&self, from: &StationId) -> &StationId {
        if &self.a == from {
            &self.b
        } else {
            &self.a
        }
    }
}

/// In-memory metro graph owning its stations
#[derive(Debug, Clone, Default)]
pub struct MetroMap {
    stations: AHashMap<StationId, Station>,
    tunnels: Vec<Tunnel>,
    /// Station -> indices into `tunnels`
    adjacency: AHashMap<StationId, Vec<usize>>,
}

impl MetroMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a station; returns false if the id is taken
    pub fn add_station(&mut self, station: Station) -> bool {
        if self.stations.contains_key(&station.id) {
            return false;
        }
        self.adjacency.entry(station.id.clone()).or_default();
        self.stations.insert(station.id.clone(), station);
        true
    }

    /// Add a tunnel; both ends must already exist
    pub fn add_tunnel(&mut self, tunnel: Tunnel) -> bool {
        if !self.stations.contains_key(&tunnel.a) || !self.stations.contains_key(&tunnel.b) {
            return false;
        }
        let index = self.tunnels.len();
        self.adjacency.entry(tunnel.a.clone()).or_default().push(index);
        self.adjacency.entry(tunnel.b.clone()).or_default().push(index);
        self.tunnels.push(tunnel);
        true
    }

    pub fn tunnel_mut(&mut self, a: &StationId, b: &StationId) -> Option<&mut Tunnel> {
        self.tunnels
            .iter_mut()
            .find(|t| (&t.a == a && &t.b == b) || (&t.a == b && &t.b == a))
    }
}

impl StationRegistry for MetroMap {
    fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    fn station_mut(&mut self, id: &StationId) -> Option<&mut Station> {
        self.stations.get_mut(id)
    }

    fn station_ids(&self) -> Vec<StationId> {
        let mut ids: Vec<StationId> = self.stations.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl PathFinder for MetroMap {
    fn shortest_path(
        &self,
        from: &StationId,
        to: &StationId,
        class: Option<TravelClass>,
    ) -> Option<Vec<StationId>> {
        if !self.stations.contains_key(from) || !self.stations.contains_key(to) {
            return None;
        }
        if from == to {
            return Some(vec![from.clone()]);
        }

        let class = class.unwrap_or_default();
        let mut distances: AHashMap<&StationId, u32> = AHashMap::new();
        let mut came_from: AHashMap<&StationId, &StationId> = AHashMap::new();
        let mut closed: AHashSet<&StationId> = AHashSet::new();
        let mut open = BinaryHeap::new();

        distances.insert(from, 0);
        open.push(Reverse((0u32, from)));

        while let Some(Reverse((cost, current))) = open.pop() {
            if !closed.insert(current) {
                continue;
            }

            if current == to {
                let mut path = vec![to.clone()];
                let mut node = to;
                while let Some(prev) = came_from.get(node) {
                    path.push((*prev).clone());
                    node = *prev;
                }
                path.reverse();
                return Some(path);
            }

            for &index in self.adjacency.get(current).into_iter().flatten() {
                let tunnel = &self.tunnels[index];
                if !tunnel.is_passable(class) || tunnel.danger() > MAX_SAFE_DANGER {
                    continue;
                }
                let next = tunnel.other_end(current);
                if closed.contains(next) {
                    continue;
                }
                let next_cost = cost + tunnel.travel_cost(class);
                if distances.get(next).map_or(true, |d| next_cost < *d) {
                    distances.insert(next, next_cost);
                    came_from.insert(next, current);
                    open.push(Reverse((next_cost, next)));
                }
            }
        }

        tracing::debug!("No {:?} path from {} to {}", class, from, to);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_map() -> MetroMap {
        let mut map = MetroMap::new();
        for name in ["A", "B", "C", "D"] {
            map.add_station(Station::new(name, "Independent"));
        }
        map.add_tunnel(Tunnel::new("A", "B"));
        map.add_tunnel(Tunnel::new("B", "C"));
        map.add_tunnel(Tunnel::new("C", "D"));
        map
    }

    #[test]
    fn test_path_includes_both_ends() {
        let map = line_map();
        let path = map
            .shortest_path(&"A".into(), &"D".into(), Some(TravelClass::Military))
            .unwrap();
        let names: Vec<&str> = path.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_path_to_self() {
        let map = line_map();
        assert_eq!(
            map.shortest_path(&"B".into(), &"B".into(), None),
            Some(vec![StationId::from("B")])
        );
    }

    #[test]
    fn test_collapsed_tunnel_blocks_path() {
        let mut map = line_map();
        map.tunnel_mut(&"B".into(), &"C".into()).unwrap().state = TunnelState::Collapsed;
        assert!(map.shortest_path(&"A".into(), &"D".into(), None).is_none());
    }

    #[test]
    fn test_unknown_station_has_no_path() {
        let map = line_map();
        assert!(map.shortest_path(&"A".into(), &"Z".into(), None).is_none());
    }

    #[test]
    fn test_dangerous_tunnel_avoided() {
        let mut map = line_map();
        map.add_station(Station::new("E", "Independent"));
        map.add_tunnel(Tunnel::new("B", "E"));
        map.add_tunnel(Tunnel::new("E", "C"));

        // Direct B-C is cheaper while clear
        let direct = map.shortest_path(&"A".into(), &"C".into(), None).unwrap();
        assert_eq!(direct.len(), 3);

        // Hazardous (30) plus hazard 25 pushes danger past the limit
        let tunnel = map.tunnel_mut(&"B".into(), &"C".into()).unwrap();
        tunnel.state = TunnelState::Hazardous;
        tunnel.hazard = 25;
        let detour = map.shortest_path(&"A".into(), &"C".into(), None).unwrap();
        assert_eq!(detour.len(), 4);
        assert_eq!(detour[2], StationId::from("E"));
    }

    #[test]
    fn test_passability_by_class() {
        let infested = Tunnel::new("A", "B").with_state(TunnelState::Infested);
        assert!(infested.is_passable(TravelClass::Military));
        assert!(!infested.is_passable(TravelClass::Civilian));

        let anomalous = Tunnel::new("A", "B").with_state(TunnelState::Anomalous);
        assert!(anomalous.is_passable(TravelClass::Scout));
        assert!(!anomalous.is_passable(TravelClass::Military));
    }
}
