//! Tick throughput for the built-in systems.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ringecs::{
    components::{Comflabulation, Position, Velocity},
    ecs::{ComponentsManager, EntityAllocator},
    engine::{Engine, EngineBuilder, EngineSettings},
    systems::{ComflabulationSystem, GravitySystem, MovementSystem},
};

fn populated(entities: usize) -> (ComponentsManager, Engine) {
    let mut manager = ComponentsManager::new();
    manager.register::<Position>(entities).unwrap();
    manager.register::<Velocity>(entities).unwrap();
    manager.register::<Comflabulation>(entities).unwrap();

    let mut allocator = EntityAllocator::new();
    for i in 0..entities {
        let entity = allocator.allocate();
        manager.add(entity, Position::new(i as f32, 0.0)).unwrap();
        manager.add(entity, Velocity::new(1.0, 0.0)).unwrap();
        // half the entities carry the extra load component
        if i % 2 == 0 {
            manager.add(entity, Comflabulation::default()).unwrap();
        }
    }

    let engine = EngineBuilder::new(EngineSettings::new("bench", 1.0 / 60.0))
        .with_system(GravitySystem::default())
        .with_system(MovementSystem::new())
        .with_system(ComflabulationSystem::new())
        .build()
        .unwrap();
    (manager, engine)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for entities in [1_000usize, 10_000] {
        let (mut manager, mut engine) = populated(entities);
        group.bench_with_input(BenchmarkId::from_parameter(entities), &entities, |b, _| {
            b.iter(|| black_box(engine.step(&mut manager).unwrap()))
        });
    }
    group.finish();
}

fn bench_entities_with(c: &mut Criterion) {
    let (manager, _) = populated(10_000);
    c.bench_function("entities_with/position_velocity", |b| {
        b.iter(|| black_box(manager.entities_with::<(Position, Velocity)>().count()))
    });
}

criterion_group!(benches, bench_tick, bench_entities_with);
criterion_main!(benches);
