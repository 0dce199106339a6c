//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline machine shape (one core, 64 MiB) and the headless batch size.
//! 2. **Structures:** Hierarchical config for general, system, and scheduler settings.
//! 3. **Validation:** Rejection of shapes that cannot be simulated.
//!
//! Configuration is read from JSON (every field optional) and then overridden by
//! command-line flags, or built with `Config::default()`.

use serde::Deserialize;

use crate::common::SimError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of harts.
    pub const CORE_COUNT: usize = 1;

    /// Physical memory size in bytes.
    pub const MEMORY_SIZE: usize = crate::common::constants::DEFAULT_MEMORY_SIZE;

    /// Steps per core per headless batch.
    pub const BATCH_STEPS: u64 = crate::common::HEADLESS_BATCH_STEPS;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use mcsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "interactive": true },
///     "system": { "core_count": 4, "memory_size": 1048576 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.general.interactive);
/// assert_eq!(config.system.core_count, 4);
/// assert_eq!(config.scheduler.batch_steps, 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Machine shape
    pub system: SystemConfig,
    /// Headless scheduling parameters
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks that the configuration describes a machine that can be simulated.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a zero core count, memory size, or batch size.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.system.core_count == 0 {
            return Err(SimError::InvalidConfig(
                "core_count must be at least 1".to_string(),
            ));
        }
        if self.system.memory_size == 0 {
            return Err(SimError::InvalidConfig(
                "memory_size must be at least 1 byte".to_string(),
            ));
        }
        if self.scheduler.batch_steps == 0 {
            return Err(SimError::InvalidConfig(
                "batch_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Start in the interactive debug console instead of running headless.
    pub interactive: bool,
}

/// Machine shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Number of harts.
    pub core_count: usize,

    /// Physical memory size in bytes.
    pub memory_size: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            core_count: defaults::CORE_COUNT,
            memory_size: defaults::MEMORY_SIZE,
        }
    }
}

/// Headless scheduling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Steps each core executes per headless batch (also the interleave).
    pub batch_steps: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_steps: defaults::BATCH_STEPS,
        }
    }
}
