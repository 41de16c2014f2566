//! Arena tuning and deployment environment
//!
//! Tuning is persisted as a JSON file next to the binary; missing fields fall
//! back to the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::GridConfig;

/// Deployment environment (guards destructive endpoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Environment variable consulted by `from_env`
    pub const ENV_VAR: &'static str = "ARENA_ENV";

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Read from `ARENA_ENV`, defaulting to development
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .ok()
            .and_then(|v| Self::from_str(&v))
            .unwrap_or_default()
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// Arena tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Cells per side (odd)
    pub grid_size: i32,
    /// World units per cell
    pub cell_size: f32,

    // === Layout ===
    /// Chance per eligible cell of a destructible obstacle
    pub destructible_probability: f64,

    // === Power-ups ===
    /// Concurrent health items allowed
    pub max_health_items: usize,
    /// Seconds between health spawn attempts
    pub health_interval: f32,
    /// Seconds between defensive item rolls
    pub defensive_interval: f32,
    /// Chance a defensive roll spawns
    pub defensive_probability: f64,

    // === Sampler ===
    /// Draws before a spawn attempt is skipped
    pub max_attempts: u32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            cell_size: CELL_SIZE,

            destructible_probability: DESTRUCTIBLE_PROBABILITY,

            max_health_items: MAX_HEALTH_ITEMS,
            health_interval: HEALTH_SPAWN_INTERVAL,
            defensive_interval: DEFENSIVE_SPAWN_INTERVAL,
            defensive_probability: DEFENSIVE_SPAWN_PROBABILITY,

            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ArenaSettings {
    /// Environment variable naming the settings file used by the binary
    pub const PATH_ENV_VAR: &'static str = "ARENA_SETTINGS";

    /// Reject tuning the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(5..=MAX_GRID_SIZE).contains(&self.grid_size) || self.grid_size % 2 == 0 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        for (name, value) in [
            ("destructible_probability", self.destructible_probability),
            ("defensive_probability", self.defensive_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        for (name, value) in [
            ("health_interval", self.health_interval),
            ("defensive_interval", self.defensive_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidInterval { name, value });
            }
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// Grid geometry described by these settings
    pub fn grid(&self) -> GridConfig {
        GridConfig::new(self.grid_size, self.cell_size)
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ArenaSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid().extent(), 6);
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let even = ArenaSettings {
            grid_size: 14,
            ..Default::default()
        };
        assert!(matches!(even.validate(), Err(ConfigError::InvalidGridSize(14))));

        for grid_size in [257, 2_000_000_001] {
            let huge = ArenaSettings {
                grid_size,
                ..Default::default()
            };
            assert!(matches!(huge.validate(), Err(ConfigError::InvalidGridSize(n)) if n == grid_size));
        }
        let largest = ArenaSettings {
            grid_size: 255,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());

        let cell = ArenaSettings {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(cell.validate(), Err(ConfigError::InvalidCellSize(_))));

        let prob = ArenaSettings {
            defensive_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            prob.validate(),
            Err(ConfigError::InvalidProbability { name: "defensive_probability", .. })
        ));

        let attempts = ArenaSettings {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(attempts.validate(), Err(ConfigError::ZeroAttempts)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ArenaSettings = serde_json::from_str(r#"{"grid_size": 11}"#).unwrap();
        assert_eq!(settings.grid_size, 11);
        assert_eq!(settings.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(settings.max_health_items, MAX_HEALTH_ITEMS);
    }

    #[test]
    fn test_load_save() {
        let path = std::env::temp_dir().join(format!(
            "arena_settings_{}.json",
            std::process::id()
        ));
        let missing = ArenaSettings::load(&path).unwrap();
        assert_eq!(missing, ArenaSettings::default());

        let custom = ArenaSettings {
            cell_size: 2.0,
            health_interval: 5.0,
            ..Default::default()
        };
        custom.save(&path).unwrap();
        let loaded = ArenaSettings::load(&path).unwrap();
        assert_eq!(loaded, custom);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::from_str("PROD"), Some(Environment::Production));
        assert_eq!(Environment::from_str("development"), Some(Environment::Development));
        assert_eq!(Environment::from_str("staging"), None);
        assert!(Environment::Production.is_production());
    }
}
