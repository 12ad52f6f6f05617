//! Recruitment, upkeep and movement integration tests

use metro_conflict::combat::{AttackOrder, CombatContext, CombatSystem, FixedJitter};
use metro_conflict::core::{CombatConfig, FactionId, ResourceType};
use metro_conflict::economy::{ResourceLedger, ResourcePool};
use metro_conflict::military::{MilitaryRegistry, MoveRefusal, RecruitRefusal, UnitKind};
use metro_conflict::territory::{
    BuildingKind, MetroMap, Station, StationRegistry, Tunnel, TunnelState,
};

fn reich_map() -> MetroMap {
    let mut map = MetroMap::new();
    map.add_station(
        Station::new("Pushkinskaya", "Fourth Reich")
            .with_population(300)
            .with_building(BuildingKind::Barracks, 1),
    );
    map.add_station(Station::new("Tverskaya", "Fourth Reich").with_population(300));
    map.add_station(Station::new("Chekhovskaya", "Red Line"));
    map.add_tunnel(Tunnel::new("Pushkinskaya", "Tverskaya"));
    map.add_tunnel(Tunnel::new("Pushkinskaya", "Chekhovskaya"));
    map
}

fn war_chest() -> ResourcePool {
    ResourcePool::with_amounts(&[
        (ResourceType::Food, 200),
        (ResourceType::Scrap, 150),
        (ResourceType::Medicine, 60),
        (ResourceType::MgrRounds, 300),
    ])
}

#[test]
fn test_elite_recruitment_needs_working_barracks() {
    let mut map = reich_map();
    let mut armies = MilitaryRegistry::new();
    let mut pool = war_chest();
    let reich = FactionId::from("Fourth Reich");

    let tverskaya = map.station(&"Tverskaya".into()).unwrap().clone();
    let refusal = armies
        .get_or_create(&reich)
        .recruit(UnitKind::Stormtroopers, &tverskaya, &mut pool)
        .unwrap_err();
    assert!(matches!(refusal, RecruitRefusal::MissingBarracks { .. }));
    assert_eq!(pool, war_chest());

    let pushkinskaya = map.station(&"Pushkinskaya".into()).unwrap().clone();
    armies
        .get_or_create(&reich)
        .recruit(UnitKind::Stormtroopers, &pushkinskaya, &mut pool)
        .unwrap();
    assert_eq!(pool.amount(ResourceType::Food), 180);
    assert_eq!(pool.amount(ResourceType::Scrap), 135);
    assert_eq!(pool.amount(ResourceType::Medicine), 52);
    assert_eq!(pool.amount(ResourceType::MgrRounds), 295);

    // Wrecked barracks no longer qualify
    map.station_mut(&"Pushkinskaya".into())
        .unwrap()
        .building_mut(BuildingKind::Barracks)
        .unwrap()
        .apply_damage(100);
    let wrecked = map.station(&"Pushkinskaya".into()).unwrap().clone();
    assert!(armies
        .get_or_create(&reich)
        .recruit(UnitKind::Rangers, &wrecked, &mut pool)
        .is_err());
    assert_eq!(pool.amount(ResourceType::MgrRounds), 295);
}

#[test]
fn test_unpaid_upkeep_erodes_then_deserts() {
    let map = reich_map();
    let mut armies = MilitaryRegistry::new();
    let mut pool = war_chest();
    let reich = FactionId::from("Fourth Reich");
    let config = CombatConfig::default();

    let station = map.station(&"Tverskaya".into()).unwrap();
    let manager = armies.get_or_create(&reich);
    for _ in 0..3 {
        manager.recruit(UnitKind::Conscripts, station, &mut pool).unwrap();
    }
    assert_eq!(manager.total_maintenance().get(&ResourceType::Food), Some(&6));

    let mut empty = ResourcePool::new();
    // 100 -> 85 -> 70 -> 55 -> 40 -> 25 -> 10 (deserts on the sixth miss)
    for _ in 0..5 {
        let report = manager.process_maintenance(&mut empty, &config);
        assert!(report.deserted.is_empty());
    }
    assert!(manager.units().iter().all(|u| u.morale == 25));

    let report = manager.process_maintenance(&mut empty, &config);
    assert_eq!(report.deserted.len(), 3);
    assert!(manager.units().is_empty());
    assert_eq!(manager.strength_at(&station.id), 0);
}

#[test]
fn test_moved_units_fight_from_their_new_station() {
    let mut map = reich_map();
    let mut armies = MilitaryRegistry::new();
    let mut pool = war_chest();
    let reich = FactionId::from("Fourth Reich");

    let tverskaya = map.station(&"Tverskaya".into()).unwrap().clone();
    let id = armies
        .get_or_create(&reich)
        .recruit(UnitKind::Conscripts, &tverskaya, &mut pool)
        .unwrap();

    // A collapsed tunnel cuts the only route
    map.tunnel_mut(&"Pushkinskaya".into(), &"Tverskaya".into())
        .unwrap()
        .state = TunnelState::Collapsed;
    assert!(matches!(
        armies
            .get_or_create(&reich)
            .move_unit(id, &"Pushkinskaya".into(), &map),
        Err(MoveRefusal::NoPath { .. })
    ));

    map.tunnel_mut(&"Pushkinskaya".into(), &"Tverskaya".into())
        .unwrap()
        .state = TunnelState::Clear;
    armies
        .get_or_create(&reich)
        .move_unit(id, &"Pushkinskaya".into(), &map)
        .unwrap();

    let mut system = CombatSystem::with_config(CombatConfig::default());
    let order = AttackOrder::new("Pushkinskaya", "Chekhovskaya", "Fourth Reich");
    let mut ctx = CombatContext::new(&mut map, &mut armies);
    let result = system
        .execute_attack(&mut ctx, &order, &mut pool, 1, &mut FixedJitter(0.0))
        .unwrap();

    // The conscripts now stand at the origin and take the attacker's losses
    let unit = armies.manager(&reich).unwrap().unit(id);
    let losses = &result.attacker_losses;
    assert!(losses.damaged.contains(&id) || losses.destroyed.contains(&id));
    if let Some(unit) = unit {
        assert!(unit.health < 100);
    }
}
