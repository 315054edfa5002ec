//! Scenario files: YAML configuration turned into a ready-to-run simulation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::{Comflabulation, Position, Velocity};
use crate::config::SimulationConfig;
use crate::ecs::{ComponentsManager, Entity, EntityAllocator};
use crate::engine::{Engine, EngineBuilder, EngineSettings};
use crate::systems::BuiltinSystem;

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<SimulationConfig> {
        let path = self.base_dir.join(file);
        let config = SimulationConfig::from_path(&path)
            .with_context(|| format!("Failed to load scenario file {}", path.display()))?;
        log::info!(
            "loaded scenario '{}' from {} ({} systems, {} spawn groups)",
            config.name,
            path.display(),
            config.systems.len(),
            config.spawns.len()
        );
        Ok(config)
    }
}

/// Everything needed to tick a scenario.
pub struct Simulation {
    pub manager: ComponentsManager,
    pub allocator: EntityAllocator,
    pub engine: Engine,
    /// Spawned entities in creation order.
    pub entities: Vec<Entity>,
}

impl Simulation {
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        self.engine.run(&mut self.manager, ticks)
    }
}

impl SimulationConfig {
    /// Registers one pool per configured capacity.
    pub fn build_manager(&self) -> Result<ComponentsManager> {
        let mut manager = ComponentsManager::new();
        if self.pools.position > 0 {
            manager.register::<Position>(self.pools.position)?;
        }
        if self.pools.velocity > 0 {
            manager.register::<Velocity>(self.pools.velocity)?;
        }
        if self.pools.comflabulation > 0 {
            manager.register::<Comflabulation>(self.pools.comflabulation)?;
        }
        Ok(manager)
    }

    /// Creates the configured entities. Positions are jittered with a
    /// generator seeded from `seed`, so equal configs spawn equal worlds.
    pub fn spawn_entities(
        &self,
        manager: &mut ComponentsManager,
        allocator: &mut EntityAllocator,
    ) -> Result<Vec<Entity>> {
        self.warn_on_overcommitted_pools();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut entities = Vec::new();

        for (group, spawn) in self.spawns.iter().enumerate() {
            for _ in 0..spawn.count {
                let entity = allocator.allocate();
                if let Some(mut position) = spawn.position {
                    if spawn.jitter > 0.0 {
                        position.x += rng.gen_range(-spawn.jitter..=spawn.jitter);
                        position.y += rng.gen_range(-spawn.jitter..=spawn.jitter);
                    }
                    manager
                        .add(entity, position)
                        .with_context(|| format!("spawn group {group}: adding position"))?;
                }
                if let Some(velocity) = spawn.velocity {
                    manager
                        .add(entity, velocity)
                        .with_context(|| format!("spawn group {group}: adding velocity"))?;
                }
                if let Some(comflabulation) = spawn.comflabulation {
                    manager
                        .add(entity, comflabulation)
                        .with_context(|| format!("spawn group {group}: adding comflabulation"))?;
                }
                entities.push(entity);
            }
        }

        log::debug!("scenario '{}' spawned {} entities", self.name, entities.len());
        Ok(entities)
    }

    pub fn build_engine(&self) -> Result<Engine> {
        let mut builder = EngineBuilder::new(EngineSettings::new(self.name.clone(), self.dt));
        for system in &self.systems {
            builder.push_system(BuiltinSystem::from_config(system)?);
        }
        builder.build()
    }

    pub fn build(&self) -> Result<Simulation> {
        let mut manager = self.build_manager()?;
        let mut allocator = EntityAllocator::new();
        let entities = self.spawn_entities(&mut manager, &mut allocator)?;
        let engine = self
            .build_engine()
            .with_context(|| format!("Failed to build engine for scenario '{}'", self.name))?;

        Ok(Simulation {
            manager,
            allocator,
            engine,
            entities,
        })
    }

    fn warn_on_overcommitted_pools(&self) {
        let mut demand = [0u64; 3];
        for spawn in &self.spawns {
            let count = u64::from(spawn.count);
            demand[0] += if spawn.position.is_some() { count } else { 0 };
            demand[1] += if spawn.velocity.is_some() { count } else { 0 };
            demand[2] += if spawn.comflabulation.is_some() { count } else { 0 };
        }

        let capacities = [
            ("position", self.pools.position),
            ("velocity", self.pools.velocity),
            ("comflabulation", self.pools.comflabulation),
        ];
        for ((component, capacity), wanted) in capacities.into_iter().zip(demand) {
            if wanted > capacity as u64 {
                log::warn!(
                    "scenario '{}' spawns {wanted} {component} components into a pool of {capacity}; the oldest will be evicted",
                    self.name
                );
            }
        }
    }
}
