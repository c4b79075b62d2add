//! Configuration for an interning context.
//!
//! Loaded from `intern.toml`:
//!
//! ```toml
//! initialKeyCapacity = 64
//! initialIndexCapacity = 16
//! initialPositionSlots = 16
//! growth = { geometric = { factor = 1.5 } }
//! ```

use crate::error::{InternError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest accepted factor for [`GrowthPolicy::Geometric`].
pub const MIN_GROWTH_FACTOR: f64 = 1.5;

/// How table capacity grows once it is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrowthPolicy {
    /// `2n + step`: `2n + 1` for key storage, `2n + 2` for index storage.
    #[default]
    Compatible,
    /// `ceil(n * factor)`, but always at least `n + step`.
    Geometric { factor: f64 },
}

impl GrowthPolicy {
    /// Capacity to grow to from `current`. `None` on overflow.
    pub fn next_capacity(self, current: usize, step: usize) -> Option<usize> {
        let minimum = current.checked_add(step)?;
        match self {
            GrowthPolicy::Compatible => current.checked_mul(2)?.checked_add(step),
            GrowthPolicy::Geometric { factor } => {
                let grown = (current as f64 * factor).ceil();
                if grown >= usize::MAX as f64 {
                    return None;
                }
                Some((grown as usize).max(minimum))
            }
        }
    }

    pub fn validate(self) -> Result<()> {
        match self {
            GrowthPolicy::Compatible => Ok(()),
            GrowthPolicy::Geometric { factor } => {
                if factor.is_finite() && factor >= MIN_GROWTH_FACTOR {
                    Ok(())
                } else {
                    Err(InternError::InvalidGrowthFactor(factor))
                }
            }
        }
    }
}

/// Sizing and growth settings for an [`InternContext`](crate::InternContext).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternConfig {
    /// Key slots reserved up front.
    #[serde(default)]
    pub initial_key_capacity: usize,

    /// Internal index slots reserved up front.
    #[serde(default)]
    pub initial_index_capacity: usize,

    /// Unset reverse-array slots created up front.
    #[serde(default)]
    pub initial_position_slots: usize,

    /// Growth policy shared by both registries.
    #[serde(default)]
    pub growth: GrowthPolicy,
}

impl InternConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: InternConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the per-user config if one exists, otherwise defaults.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/xsaccessor/intern.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xsaccessor").join("intern.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        self.growth.validate()
    }
}
