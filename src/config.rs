//! Farm configuration

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmConfig {
    #[serde(default)]
    pub capacity: CapacityRules,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    #[serde(default)]
    pub stock_on_recompute: StockPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityRules {
    #[serde(default = "default_per_tile_base")]
    pub per_tile_base: u32,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_bonus_enabled")]
    pub bonus_enabled: bool,
}

fn default_per_tile_base() -> u32 {
    2
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_bonus_enabled() -> bool {
    true
}

impl CapacityRules {
    /// Rejects multipliers that would silently zero every boosted pasture
    pub fn validate(&self) -> Result<()> {
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(anyhow!(
                "capacity multiplier must be finite and non-negative, got {}",
                self.multiplier
            ));
        }
        Ok(())
    }
}

impl Default for CapacityRules {
    fn default() -> Self {
        Self {
            per_tile_base: default_per_tile_base(),
            multiplier: default_multiplier(),
            bonus_enabled: default_bonus_enabled(),
        }
    }
}

/// How the edge of the tile universe is treated when deciding whether a
/// region is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Every exit from a region must be an explicit fence
    #[default]
    RequireFences,
    /// A missing tile closes a region just like a fence
    GridEdgeIsWall,
}

/// What happens to animals when pastures are rebuilt after a fence edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Rebuilt pastures start empty
    #[default]
    Discard,
    /// Pastures whose tile set is unchanged keep their animals
    CarryOverUnchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
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

impl FarmConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text).context("Failed to parse farm config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.capacity.validate().context("Invalid capacity rules")
    }

    /// Load configuration from YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Save configuration to YAML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}
