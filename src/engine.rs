//! Engine: a named, configured scheduler driving a [`ComponentsManager`]

use anyhow::{ensure, Result};

use crate::ecs::ComponentsManager;
use crate::scheduler::{Scheduler, TickStats};
use crate::systems::System;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub name: String,
    pub dt: f32,
}

impl EngineSettings {
    pub fn new(name: impl Into<String>, dt: f32) -> Self {
        Self {
            name: name.into(),
            dt,
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Result<Engine> {
        ensure!(
            self.settings.dt.is_finite() && self.settings.dt > 0.0,
            "engine '{}' needs a positive dt, got {}",
            self.settings.name,
            self.settings.dt
        );

        let mut scheduler = Scheduler::new(self.settings.dt);
        for system in self.systems {
            scheduler.add_system(system);
        }
        log::debug!(
            "engine '{}' built with systems {:?}",
            self.settings.name,
            scheduler.system_names()
        );

        Ok(Engine {
            settings: self.settings,
            scheduler,
        })
    }
}

pub struct Engine {
    settings: EngineSettings,
    scheduler: Scheduler,
}

impl Engine {
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn current_tick(&self) -> u64 {
        self.scheduler.tick_count()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn step(&mut self, manager: &mut ComponentsManager) -> Result<TickStats> {
        self.scheduler.tick(manager)
    }

    pub fn run(&mut self, manager: &mut ComponentsManager, ticks: u64) -> Result<()> {
        self.run_with_hook(manager, ticks, |_| {})
    }

    /// Runs `ticks` ticks, handing each tick's statistics to `hook`.
    pub fn run_with_hook<F>(
        &mut self,
        manager: &mut ComponentsManager,
        ticks: u64,
        mut hook: F,
    ) -> Result<()>
    where
        F: FnMut(&TickStats),
    {
        for _ in 0..ticks {
            let stats = self.scheduler.tick(manager)?;
            hook(&stats);
        }
        if let Some(average) = self.scheduler.average_tick_time() {
            log::info!(
                "engine '{}' reached tick {} (avg tick {average:?})",
                self.settings.name,
                self.current_tick()
            );
        }
        Ok(())
    }
}
