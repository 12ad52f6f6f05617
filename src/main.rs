//! Metro Conflict - Skirmish Runner
//!
//! Raises garrisons on a small built-in metro map and resolves a series of
//! seeded attacks along its front lines.

use std::path::PathBuf;

use ahash::AHashMap;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use metro_conflict::combat::{AttackOrder, AttackType, CombatContext, CombatSystem};
use metro_conflict::core::error::Result;
use metro_conflict::core::{CombatConfig, FactionId, ResourceType, StationId};
use metro_conflict::economy::ResourcePool;
use metro_conflict::military::{MilitaryRegistry, UnitKind};
use metro_conflict::territory::{BuildingKind, MetroMap, Station, StationRegistry, Tunnel, TunnelState};

/// Metro Conflict skirmish runner
#[derive(Parser, Debug)]
#[command(name = "metro-conflict")]
#[command(about = "Resolve seeded faction battles on a built-in metro map")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Combat config TOML (missing keys keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of attacks to attempt
    #[arg(long, default_value_t = 10)]
    battles: u32,

    /// assault, siege, raid or infiltration
    #[arg(long, default_value = "assault")]
    attack_type: AttackType,

    /// Print one JSON object per attack instead of text
    #[arg(long)]
    json: bool,
}

/// Stations, their owners and population
const STATIONS: [(&str, &str, u32); 8] = [
    ("Smolenskaya", "Rangers", 300),
    ("Arbatskaya", "Rangers", 250),
    ("Pushkinskaya", "Fourth Reich", 400),
    ("Tverskaya", "Fourth Reich", 350),
    ("Okhotny Ryad", "Red Line", 500),
    ("Chekhovskaya", "Red Line", 200),
    ("Borovitskaya", "Polis", 600),
    ("Kurskaya", "Hanza", 450),
];

const TUNNELS: [(&str, &str); 9] = [
    ("Smolenskaya", "Arbatskaya"),
    ("Arbatskaya", "Borovitskaya"),
    ("Arbatskaya", "Pushkinskaya"),
    ("Pushkinskaya", "Tverskaya"),
    ("Pushkinskaya", "Chekhovskaya"),
    ("Tverskaya", "Okhotny Ryad"),
    ("Chekhovskaya", "Okhotny Ryad"),
    ("Okhotny Ryad", "Kurskaya"),
    ("Borovitskaya", "Okhotny Ryad"),
];

/// Initial recruitment orders: (faction, station, kind, count)
const GARRISONS: [(&str, &str, UnitKind, u32); 9] = [
    ("Rangers", "Arbatskaya", UnitKind::Rangers, 2),
    ("Rangers", "Arbatskaya", UnitKind::Scouts, 1),
    ("Rangers", "Smolenskaya", UnitKind::Engineers, 1),
    ("Fourth Reich", "Pushkinskaya", UnitKind::Stormtroopers, 2),
    ("Fourth Reich", "Tverskaya", UnitKind::Conscripts, 3),
    ("Red Line", "Okhotny Ryad", UnitKind::Conscripts, 4),
    ("Red Line", "Chekhovskaya", UnitKind::Militia, 3),
    ("Polis", "Borovitskaya", UnitKind::Stalkers, 2),
    ("Hanza", "Kurskaya", UnitKind::Militia, 2),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("metro_conflict=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    tracing::info!("Metro Conflict starting (seed {})", seed);

    let mut map = build_metro();
    let mut treasuries = starting_treasuries();
    let mut armies = MilitaryRegistry::new();
    raise_garrisons(&map, &mut armies, &mut treasuries);

    let mut system = CombatSystem::with_config(config.clone());
    let fronts = front_lines(&map);

    for turn in 1..=args.battles {
        let (origin, target) = &fronts[rng.gen_range(0..fronts.len())];
        let Some(attacker) = map.station(origin).map(|s| s.controlling_faction.clone()) else {
            continue;
        };
        let order = AttackOrder::new(origin.clone(), target.clone(), attacker.clone())
            .with_type(args.attack_type);

        let treasury = treasuries.entry(attacker.clone()).or_default();
        let mut ctx = CombatContext::new(&mut map, &mut armies);
        match system.execute_attack(&mut ctx, &order, treasury, turn, &mut rng) {
            Ok(result) => {
                if args.json {
                    println!("{}", serde_json::to_string(&result)?);
                } else {
                    println!("Turn {:>3}: {}", turn, result.message);
                }
            }
            Err(refusal) => {
                if !args.json {
                    println!("Turn {:>3}: {} holds back: {}", turn, attacker, refusal);
                }
            }
        }

        for (faction, manager) in armies.iter_mut() {
            let treasury = treasuries.entry(faction.clone()).or_default();
            manager.process_maintenance(treasury, &config);
        }
    }

    if !args.json {
        print_summary(&system, &mut map, &mut armies);
    }
    Ok(())
}

fn build_metro() -> MetroMap {
    let mut map = MetroMap::new();
    for (name, faction, population) in STATIONS {
        let mut station = Station::new(name, faction)
            .with_population(population)
            .with_resources(ResourcePool::with_amounts(&[
                (ResourceType::Food, population / 2),
                (ResourceType::CleanWater, population / 3),
                (ResourceType::Scrap, population / 4),
                (ResourceType::MgrRounds, population / 10),
            ]));
        match name {
            "Arbatskaya" | "Pushkinskaya" => station.add_building(BuildingKind::Barracks, 2),
            "Borovitskaya" => station.add_building(BuildingKind::Fortifications, 3),
            "Okhotny Ryad" => station.add_building(BuildingKind::Barracks, 1),
            _ => false,
        };
        map.add_station(station);
    }
    for (a, b) in TUNNELS {
        map.add_tunnel(Tunnel::new(a, b));
    }
    if let Some(tunnel) = map.tunnel_mut(&"Okhotny Ryad".into(), &"Kurskaya".into()) {
        tunnel.state = TunnelState::Hazardous;
    }
    map
}

fn starting_treasuries() -> AHashMap<FactionId, ResourcePool> {
    STATIONS
        .iter()
        .map(|(_, faction, _)| {
            let pool = ResourcePool::with_amounts(&[
                (ResourceType::Food, 400),
                (ResourceType::Scrap, 300),
                (ResourceType::Medicine, 120),
                (ResourceType::MgrRounds, 600),
            ]);
            (FactionId::from(*faction), pool)
        })
        .collect()
}

fn raise_garrisons(
    map: &MetroMap,
    armies: &mut MilitaryRegistry,
    treasuries: &mut AHashMap<FactionId, ResourcePool>,
) {
    for (faction, station, kind, count) in GARRISONS {
        let faction = FactionId::from(faction);
        let Some(station) = map.station(&station.into()) else {
            continue;
        };
        let treasury = treasuries.entry(faction.clone()).or_default();
        let manager = armies.get_or_create(&faction);
        for _ in 0..count {
            if let Err(refusal) = manager.recruit(kind, station, treasury) {
                tracing::warn!("{} could not recruit {}: {}", faction, kind, refusal);
                break;
            }
        }
    }
}

/// Adjacent station pairs, in both directions
fn front_lines(map: &MetroMap) -> Vec<(StationId, StationId)> {
    let mut fronts = Vec::new();
    for (a, b) in TUNNELS {
        let (a, b) = (StationId::from(a), StationId::from(b));
        if map.station(&a).is_some() && map.station(&b).is_some() {
            fronts.push((a.clone(), b.clone()));
            fronts.push((b, a));
        }
    }
    fronts
}

fn print_summary(system: &CombatSystem, map: &mut MetroMap, armies: &mut MilitaryRegistry) {
    println!();
    println!("=== FRONT AFTER {} BATTLES ===", system.history().len());
    let factions: Vec<FactionId> = {
        let mut names: Vec<FactionId> = STATIONS.iter().map(|(_, f, _)| FactionId::from(*f)).collect();
        names.sort();
        names.dedup();
        names
    };
    let ctx = CombatContext::new(map, armies);
    for faction in factions {
        let strength = system.get_faction_military_strength(&ctx, &faction);
        println!(
            "{:<20} stations {:>2}  manpower {:>4}  avg defense {:>3}  units {:?}",
            faction.as_str(),
            strength.total_stations,
            strength.total_manpower,
            strength.average_defensive_value,
            strength.units
        );
    }
}
