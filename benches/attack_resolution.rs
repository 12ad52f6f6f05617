//! Attack resolution benchmarks
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use metro_conflict::combat::{
    classify, AttackOrder, AttackType, CombatContext, CombatSystem,
};
use metro_conflict::core::{CombatConfig, FactionId, ResourceType, UnitId};
use metro_conflict::economy::ResourcePool;
use metro_conflict::military::{MilitaryRegistry, MilitaryUnit, UnitKind};
use metro_conflict::territory::{BuildingKind, MetroMap, Station, Tunnel};

fn front() -> (MetroMap, MilitaryRegistry) {
    let mut map = MetroMap::new();
    map.add_station(
        Station::new("Arbatskaya", "Rangers")
            .with_population(250)
            .with_building(BuildingKind::Barracks, 2),
    );
    map.add_station(
        Station::new("Pushkinskaya", "Fourth Reich")
            .with_population(400)
            .with_resources(ResourcePool::with_amounts(&[
                (ResourceType::Food, 200),
                (ResourceType::MgrRounds, 40),
            ])),
    );
    map.add_tunnel(Tunnel::new("Arbatskaya", "Pushkinskaya"));

    let mut armies = MilitaryRegistry::new();
    let sides = [
        ("Rangers", "Arbatskaya", UnitKind::Rangers),
        ("Fourth Reich", "Pushkinskaya", UnitKind::Stormtroopers),
    ];
    for (faction, station, kind) in sides {
        let faction = FactionId::from(faction);
        for _ in 0..8 {
            let unit = MilitaryUnit::new(UnitId(0), kind, faction.clone(), station.into());
            armies.get_or_create(&faction).enlist(unit);
        }
    }
    (map, armies)
}

fn bench_classify(c: &mut Criterion) {
    let config = CombatConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("classify_assault", |b| {
        b.iter(|| {
            classify(
                black_box(216),
                black_box(140),
                AttackType::Assault,
                &config,
                &mut rng,
            )
        })
    });
}

fn bench_execute_attack(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_attack");
    group.sample_size(100);

    for attack_type in AttackType::ALL {
        group.bench_function(attack_type.name(), |b| {
            b.iter_batched(
                front,
                |(mut map, mut armies)| {
                    let mut system = CombatSystem::with_config(CombatConfig::default());
                    let mut pool = ResourcePool::with_amounts(&[(ResourceType::MgrRounds, 500)]);
                    let mut rng = ChaCha8Rng::seed_from_u64(42);
                    let order = AttackOrder::new("Arbatskaya", "Pushkinskaya", "Rangers")
                        .with_type(attack_type)
                        .with_supply(25);
                    let mut ctx = CombatContext::new(&mut map, &mut armies);
                    black_box(system.execute_attack(&mut ctx, &order, &mut pool, 1, &mut rng))
                        .is_ok()
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let (mut map, mut armies) = front();
    let system = CombatSystem::with_config(CombatConfig::default());

    c.bench_function("attack_preview", |b| {
        let ctx = CombatContext::new(&mut map, &mut armies);
        b.iter(|| {
            system.get_attack_preview(
                &ctx,
                black_box(&"Arbatskaya".into()),
                black_box(&"Pushkinskaya".into()),
                &"Rangers".into(),
            )
        })
    });
}

criterion_group!(benches, bench_classify, bench_execute_attack, bench_preview);
criterion_main!(benches);
