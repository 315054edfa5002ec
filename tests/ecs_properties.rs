use approx::assert_relative_eq;
use ringecs::{
    ecs::{ComponentsManager, EcsError, Entity, FixedRing},
    systems::{BoundingSystem, Bounds, GravitySystem, MovementSystem, System},
    Position, Velocity,
};

fn manager_with(capacity: usize) -> ComponentsManager {
    ringecs::logging::init_for_tests();
    let mut manager = ComponentsManager::new();
    manager
        .register::<Position>(capacity)
        .expect("position pool");
    manager
        .register::<Velocity>(capacity)
        .expect("velocity pool");
    manager
}

#[test]
fn movement_integrates_velocity() {
    let mut manager = manager_with(4);
    let e = Entity::from_raw(1);
    manager.add(e, Position::new(0.0, 0.0)).unwrap();
    manager.add(e, Velocity::new(2.0, 3.0)).unwrap();

    MovementSystem::new().update(&mut manager, 1.0).unwrap();

    let position = *manager.get::<Position>(e).unwrap();
    assert_relative_eq!(position.x, 2.0);
    assert_relative_eq!(position.y, 3.0);
}

#[test]
fn gravity_accelerates_downwards() {
    let mut manager = manager_with(4);
    let e = Entity::from_raw(1);
    manager.add(e, Velocity::new(0.0, 0.0)).unwrap();

    GravitySystem::default().update(&mut manager, 1.0).unwrap();

    assert_relative_eq!(manager.get::<Velocity>(e).unwrap().y, -9.8);
}

#[test]
fn bounding_clamps_into_rectangle() {
    let mut manager = manager_with(4);
    let e = Entity::from_raw(1);
    manager.add(e, Position::new(150.0, 0.0)).unwrap();

    BoundingSystem::new(Bounds::new(0.0, 100.0, 0.0, 100.0))
        .expect("valid bounds")
        .update(&mut manager, 1.0)
        .unwrap();

    assert_eq!(*manager.get::<Position>(e).unwrap(), Position::new(100.0, 0.0));
}

#[test]
fn overflow_evicts_previous_owner() {
    let mut manager = ComponentsManager::new();
    manager.register::<Position>(1).unwrap();
    let a = Entity::from_raw(1);
    let b = Entity::from_raw(2);

    assert_eq!(manager.add(a, Position::new(1.0, 1.0)).unwrap(), None);
    assert_eq!(manager.add(b, Position::new(2.0, 2.0)).unwrap(), Some(a));

    assert!(!manager.has::<Position>(a));
    assert!(manager.has::<Position>(b));
    assert_eq!(manager.len::<Position>().unwrap(), 1);
}

#[test]
fn ring_evicts_in_insertion_order() {
    let mut ring = FixedRing::new(3).unwrap();
    let first = ring.insert(10).slot;
    ring.insert(20);
    ring.insert(30);

    let overflow = ring.insert(40);
    assert_eq!(overflow.evicted, Some(10));
    assert_eq!(overflow.slot.index(), first.index());
    assert!(ring.len() <= ring.capacity());
}

#[test]
fn membership_matches_has_for_every_type() {
    let mut manager = manager_with(8);
    for id in 0..6 {
        let e = Entity::from_raw(id);
        if id % 2 == 0 {
            manager.add(e, Position::new(0.0, 0.0)).unwrap();
        }
        if id % 3 == 0 {
            manager.add(e, Velocity::new(0.0, 0.0)).unwrap();
        }
    }

    let both: Vec<Entity> = manager.entities_with::<(Position, Velocity)>().collect();
    assert_eq!(both, vec![Entity::from_raw(0)]);
    for id in 0..6 {
        let e = Entity::from_raw(id);
        let expected = manager.has::<Position>(e) && manager.has::<Velocity>(e);
        assert_eq!(both.contains(&e), expected, "{e}");
    }
}

#[test]
fn add_remove_round_trip_and_duplicate_rejection() {
    let mut manager = manager_with(4);
    let e = Entity::from_raw(3);

    manager.add(e, Position::new(1.0, 2.0)).unwrap();
    let err = manager.add(e, Position::new(9.0, 9.0)).unwrap_err();
    assert!(matches!(err, EcsError::DuplicateComponent { .. }));
    assert_eq!(*manager.get::<Position>(e).unwrap(), Position::new(1.0, 2.0));

    assert_eq!(manager.remove::<Position>(e).unwrap(), Position::new(1.0, 2.0));
    assert!(!manager.has::<Position>(e));
    assert!(matches!(
        manager.remove::<Position>(e),
        Err(EcsError::MissingComponent { .. })
    ));
}

#[test]
fn deferred_removal_waits_for_flush() {
    let mut manager = manager_with(4);
    let e = Entity::from_raw(5);
    manager.add(e, Position::new(0.0, 0.0)).unwrap();
    manager.add(e, Velocity::new(0.0, 0.0)).unwrap();

    manager.queue_removal(e);
    manager.queue_removal(e);
    assert!(manager.has::<Position>(e));

    assert_eq!(manager.flush_removals(), 1);
    assert!(!manager.has::<Position>(e));
    assert!(!manager.has::<Velocity>(e));
    assert!(manager.pending_removals().is_empty());
}

#[test]
fn unregistered_type_is_a_configuration_error() {
    let mut manager = ComponentsManager::new();
    manager.register::<Position>(2).unwrap();

    let err = manager
        .add(Entity::from_raw(0), Velocity::new(0.0, 0.0))
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(
        MovementSystem::new().update(&mut manager, 1.0),
        Err(EcsError::Unregistered { .. })
    ));
}

#[test]
fn inverted_bounds_are_an_error_not_a_panic() {
    let err = BoundingSystem::new(Bounds::new(10.0, 0.0, 0.0, 10.0)).unwrap_err();
    assert!(matches!(err, EcsError::InvalidSystem { .. }));
    assert!(err.is_configuration());
}
