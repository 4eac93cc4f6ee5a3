//! Simulation settings
//!
//! Loaded from JSON by the host; every field has a default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SCROLL_SPEED;
use crate::error::ConfigError;
use crate::sim::Biome;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live trail particles behind the player
    pub fn max_trail_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 48,
            QualityPreset::High => 128,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle quality preset
    pub quality: QualityPreset,
    /// Particle effects (trail, shimmer, bursts, footsteps)
    pub particles: bool,
    /// World scroll speed (units/tick)
    pub scroll_speed: f32,
    /// Distance below the viewport bottom before the player counts as lost
    pub fall_margin: f32,
    /// Biome rotation, indexed by level
    pub biomes: Vec<Biome>,
    /// Fixed run seed (None = host picks one)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            scroll_speed: SCROLL_SPEED,
            fall_margin: 200.0,
            biomes: Biome::ALL.to_vec(),
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
    }

    /// Effective trail particle cap
    pub fn max_trail_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_trail_particles()
        }
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scroll_speed.is_finite() || self.scroll_speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scroll_speed must be a non-negative number, got {}",
                self.scroll_speed
            )));
        }
        if !self.fall_margin.is_finite() || self.fall_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fall_margin must be a non-negative number, got {}",
                self.fall_margin
            )));
        }
        if self.biomes.is_empty() {
            return Err(ConfigError::Invalid("biomes must not be empty".into()));
        }
        Ok(())
    }
}
