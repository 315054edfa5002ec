//! Scheduler - manages tick loop and system execution

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::ecs::{ComponentsManager, FixedRing};
use crate::systems::System;

const MAX_STATS_HISTORY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(capacity) => capacity,
    None => panic!("stats history capacity must be non-zero"),
};

/// Statistics for a single tick
#[derive(Debug, Clone)]
pub struct TickStats {
    pub tick: u64,
    pub duration: Duration,
    pub system_times: Vec<(String, Duration)>,
    /// Entities removed by the end-of-tick flush.
    pub removed_entities: usize,
}

/// Runs systems in registration order, once per tick.
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
    tick_count: u64,
    dt: f32,
    stats_history: FixedRing<TickStats>,
}

impl Scheduler {
    pub fn new(dt: f32) -> Self {
        Self {
            systems: Vec::new(),
            tick_count: 0,
            dt,
            stats_history: FixedRing::with_capacity(MAX_STATS_HISTORY),
        }
    }

    /// Add a system to the scheduler
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Execute one tick, then apply deferred entity removals.
    pub fn tick(&mut self, manager: &mut ComponentsManager) -> Result<TickStats> {
        let tick_start = Instant::now();
        let tick = self.tick_count + 1;
        let mut system_times = Vec::with_capacity(self.systems.len());

        for system in &mut self.systems {
            let system_start = Instant::now();
            system
                .update(manager, self.dt)
                .with_context(|| format!("system '{}' failed on tick {tick}", system.name()))?;
            let elapsed = system_start.elapsed();
            log::trace!("tick {tick}: {} took {elapsed:?}", system.name());
            system_times.push((system.name().to_string(), elapsed));
        }

        let removed_entities = manager.flush_removals();
        self.tick_count = tick;

        let stats = TickStats {
            tick,
            duration: tick_start.elapsed(),
            system_times,
            removed_entities,
        };
        log::debug!(
            "tick {tick} finished in {:?} ({} systems, {removed_entities} entities removed)",
            stats.duration,
            self.systems.len()
        );

        self.stats_history.insert(stats.clone());
        Ok(stats)
    }

    /// Recent tick statistics, oldest first.
    pub fn recent_stats(&self) -> Vec<&TickStats> {
        self.stats_history
            .iter_by_age()
            .map(|(_, stats)| stats)
            .collect()
    }

    /// Get average tick time from recent history
    pub fn average_tick_time(&self) -> Option<Duration> {
        if self.stats_history.is_empty() {
            return None;
        }

        let total: Duration = self
            .stats_history
            .iter()
            .map(|(_, stats)| stats.duration)
            .sum();
        Some(total / self.stats_history.len() as u32)
    }

    /// Run simulation for a number of ticks
    pub fn run(&mut self, manager: &mut ComponentsManager, num_ticks: u64) -> Result<()> {
        for _ in 0..num_ticks {
            self.tick(manager)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{EcsError, Entity};

    struct TestSystem {
        call_count: u32,
    }

    impl System for TestSystem {
        fn name(&self) -> &str {
            "test_system"
        }

        fn update(&mut self, _manager: &mut ComponentsManager, _dt: f32) -> Result<(), EcsError> {
            self.call_count += 1;
            Ok(())
        }
    }

    struct FailingSystem;

    impl System for FailingSystem {
        fn name(&self) -> &str {
            "failing"
        }

        fn update(&mut self, _manager: &mut ComponentsManager, _dt: f32) -> Result<(), EcsError> {
            Err(EcsError::Unregistered { component: "Nothing" })
        }
    }

    #[test]
    fn test_scheduler_ticks() {
        let mut scheduler = Scheduler::new(1.0);
        let mut manager = ComponentsManager::new();
        scheduler.add_system(Box::new(TestSystem { call_count: 0 }));

        assert_eq!(scheduler.tick_count(), 0);

        scheduler.tick(&mut manager).unwrap();
        assert_eq!(scheduler.tick_count(), 1);

        scheduler.run(&mut manager, 4).unwrap();
        assert_eq!(scheduler.tick_count(), 5);
        assert_eq!(scheduler.system_names(), vec!["test_system"]);
    }

    #[test]
    fn test_scheduler_stats_history_is_bounded() {
        let mut scheduler = Scheduler::new(1.0);
        let mut manager = ComponentsManager::new();
        scheduler.add_system(Box::new(TestSystem { call_count: 0 }));

        scheduler.run(&mut manager, 130).unwrap();

        let stats = scheduler.recent_stats();
        assert_eq!(stats.len(), 100);
        assert_eq!(stats.first().map(|s| s.tick), Some(31));
        assert_eq!(stats.last().map(|s| s.tick), Some(130));
        assert!(scheduler.average_tick_time().is_some());
    }

    #[test]
    fn test_scheduler_flushes_removals_after_tick() {
        let mut scheduler = Scheduler::new(1.0);
        let mut manager = ComponentsManager::new();
        manager.register::<crate::components::Position>(2).unwrap();
        let entity = Entity::from_raw(4);
        manager
            .add(entity, crate::components::Position::new(0.0, 0.0))
            .unwrap();
        manager.queue_removal(entity);

        let stats = scheduler.tick(&mut manager).unwrap();
        assert_eq!(stats.removed_entities, 1);
        assert!(!manager.has::<crate::components::Position>(entity));
    }

    #[test]
    fn test_scheduler_reports_failing_system() {
        let mut scheduler = Scheduler::new(1.0);
        let mut manager = ComponentsManager::new();
        scheduler.add_system(Box::new(FailingSystem));

        let err = scheduler.tick(&mut manager).unwrap_err();
        assert!(err.to_string().contains("system 'failing' failed on tick 1"));
        assert_eq!(scheduler.tick_count(), 0);
    }
}
