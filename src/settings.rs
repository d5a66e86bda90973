//! Host settings
//!
//! Loaded from JSON handed over by the host; every field is optional and
//! falls back to its default.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SUBSTEPS;
use crate::error::ArcadeError;

/// Seed used when none is configured, so native runs are reproducible
pub const DEFAULT_SEED: u64 = 0x5EED_A5CA_DE00_0001;

/// Arcade host settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed shared by all games (each game derives its own stream)
    pub seed: Option<u64>,
    /// Maximum ticks run per frame before the backlog is dropped
    pub max_substeps: u32,

    // === HUD ===
    /// Append score/moves/status text to every frame
    pub show_hud: bool,
    /// Draw a crosshair at the pointer for pointer-driven games
    pub show_pointer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_substeps: MAX_SUBSTEPS,
            show_hud: true,
            show_pointer: true,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.max_substeps = settings.max_substeps.max(1);
        log::info!("Loaded settings: {settings:?}");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Configured seed, or the fixed default
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}
