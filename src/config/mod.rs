//! Configuration module for simulation setup

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{Comflabulation, Position, Velocity};
use crate::systems::{Bounds, DEFAULT_GRAVITY};

/// Main configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub pools: PoolConfig,
    /// Run in this order every tick.
    #[serde(default)]
    pub systems: Vec<SystemConfig>,
    #[serde(default)]
    pub spawns: Vec<SpawnConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ring capacity per component type. Zero leaves the type unregistered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub position: usize,
    #[serde(default)]
    pub velocity: usize,
    #[serde(default)]
    pub comflabulation: usize,
}

impl PoolConfig {
    /// Configured capacity for a pool key (`position`, `velocity`, `comflabulation`).
    pub fn capacity_of(&self, component: &str) -> usize {
        match component {
            "position" => self.position,
            "velocity" => self.velocity,
            "comflabulation" => self.comflabulation,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SystemConfig {
    Movement,
    Gravity {
        #[serde(default = "default_gravity")]
        gravity: f32,
    },
    Bounding(Bounds),
    Bounce {
        #[serde(default)]
        floor: f32,
        #[serde(default = "default_restitution")]
        restitution: f32,
    },
    Comflabulation,
}

/// A batch of identical entities created at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    #[serde(default = "default_spawn_count")]
    pub count: u32,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub velocity: Option<Velocity>,
    #[serde(default)]
    pub comflabulation: Option<Comflabulation>,
    /// Uniform +/- offset applied to each position axis.
    #[serde(default)]
    pub jitter: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl SystemConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SystemConfig::Movement => "movement",
            SystemConfig::Gravity { .. } => "gravity",
            SystemConfig::Bounding(_) => "bounding",
            SystemConfig::Bounce { .. } => "bounce",
            SystemConfig::Comflabulation => "comflabulation",
        }
    }

    /// Pool keys this system reads every tick.
    pub fn required_pools(&self) -> &'static [&'static str] {
        match self {
            SystemConfig::Movement | SystemConfig::Bounce { .. } => &["position", "velocity"],
            SystemConfig::Gravity { .. } => &["velocity"],
            SystemConfig::Bounding(_) => &["position"],
            SystemConfig::Comflabulation => &["comflabulation"],
        }
    }
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_gravity() -> f32 {
    DEFAULT_GRAVITY
}

fn default_restitution() -> f32 {
    0.8
}

fn default_spawn_count() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("configuration validation error: {0}")]
    Validation(String),
}

impl SimulationConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Tick count to run, preferring an explicit override.
    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(120)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("name must not be empty".into()));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "dt must be a positive number, got {}",
                self.dt
            )));
        }

        for system in &self.systems {
            match system {
                SystemConfig::Bounding(bounds) if !bounds.is_valid() => {
                    return Err(ConfigError::Validation(format!(
                        "bounding rectangle is inverted: {bounds:?}"
                    )));
                }
                SystemConfig::Bounce { restitution, .. } if *restitution < 0.0 => {
                    return Err(ConfigError::Validation(
                        "bounce restitution must not be negative".into(),
                    ));
                }
                _ => {}
            }
            if let Some(component) = system
                .required_pools()
                .iter()
                .find(|component| self.pools.capacity_of(component) == 0)
            {
                return Err(ConfigError::Validation(format!(
                    "system {} needs {component} but pools.{component} is not configured",
                    system.kind()
                )));
            }
        }

        for (index, spawn) in self.spawns.iter().enumerate() {
            if !spawn.jitter.is_finite() || spawn.jitter < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "spawn {index}: jitter must be a non-negative number"
                )));
            }
            let missing_pool = [
                ("position", spawn.position.is_some()),
                ("velocity", spawn.velocity.is_some()),
                ("comflabulation", spawn.comflabulation.is_some()),
            ]
            .into_iter()
            .find(|(component, used)| *used && self.pools.capacity_of(component) == 0);
            if let Some((component, _)) = missing_pool {
                return Err(ConfigError::Validation(format!(
                    "spawn {index} attaches {component} but pools.{component} is not configured"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: minimal
pools:
  position: 8
  velocity: 8
systems:
  - kind: gravity
  - kind: movement
  - kind: bounding
    min_x: 0.0
    max_x: 10.0
    min_y: 0.0
    max_y: 10.0
spawns:
  - count: 2
    position: { x: 1.0, y: 2.0 }
    velocity: { x: 0.0, y: 0.0 }
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = SimulationConfig::from_yaml_str(MINIMAL).unwrap();

        assert_eq!(config.name, "minimal");
        assert_eq!(config.seed, 0);
        assert_eq!(config.pools.comflabulation, 0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ticks(None), 120);
        assert_eq!(config.ticks(Some(5)), 5);
        assert_eq!(
            config.systems,
            vec![
                SystemConfig::Gravity { gravity: -9.8 },
                SystemConfig::Movement,
                SystemConfig::Bounding(Bounds::new(0.0, 10.0, 0.0, 10.0)),
            ]
        );
        assert_eq!(config.spawns[0].count, 2);
        assert_eq!(config.spawns[0].jitter, 0.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = SimulationConfig::from_yaml_str(MINIMAL).unwrap();

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("minimal.yaml");
        config.to_path(&path).unwrap();

        let loaded = SimulationConfig::from_path(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_validation_rejects_unconfigured_pool() {
        let text = MINIMAL.replace("  velocity: 8\n", "");
        let err = SimulationConfig::from_yaml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("pools.velocity")));
    }

    #[test]
    fn test_validation_rejects_system_without_pool() {
        let err = SimulationConfig::from_yaml_str("name: bare\nsystems:\n  - kind: movement\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ref msg) if msg.contains("movement") && msg.contains("pools.position")
        ));

        let text = "name: churn\npools: { position: 4 }\nsystems:\n  - kind: comflabulation\n";
        let err = SimulationConfig::from_yaml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("pools.comflabulation")));

        let text = "name: ok\npools: { velocity: 4 }\nsystems:\n  - kind: gravity\n";
        assert!(SimulationConfig::from_yaml_str(text).is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let inverted = MINIMAL.replace("max_x: 10.0", "max_x: -1.0");
        assert!(matches!(
            SimulationConfig::from_yaml_str(&inverted),
            Err(ConfigError::Validation(_))
        ));

        let mut config = SimulationConfig::from_yaml_str(MINIMAL).unwrap();
        config.dt = 0.0;
        assert!(config.validate().is_err());

        assert!(matches!(
            SimulationConfig::from_yaml_str("name: [unclosed"),
            Err(ConfigError::Parse(_))
        ));
    }
}
