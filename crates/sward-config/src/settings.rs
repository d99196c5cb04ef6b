//! Settings structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Foliage field tuning.
    pub field: FieldSettings,
    /// Demo terrain shape.
    pub terrain: TerrainSettings,
    /// Demo run parameters.
    pub demo: DemoSettings,
    /// Debug/development settings.
    pub debug: DebugSettings,
}

/// Foliage field tuning. Values are clamped into their valid ranges when
/// applied to the runtime field configuration, so a hand-edited file can
/// never produce an invalid field state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldSettings {
    /// Retention radius in world units.
    pub view_distance: f32,
    /// Target density for the camera's cell (instances per square unit).
    pub density_near: f32,
    /// Target density for the camera's ring cells.
    pub density_ring: f32,
    /// Target density for peripheral cells.
    pub density_far: f32,
    /// Distance below which instances render at the closest LOD.
    pub lod0_distance: f32,
    /// Distance below which instances render at the middle LOD.
    pub lod1_distance: f32,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    /// Margin added to the half-FOV for the retention cone, degrees.
    pub cone_offset_degrees: f32,
    /// Density transition progress per second.
    pub transition_speed: f32,
    /// Elevation below which instances are not rendered.
    pub sea_level: f32,
    /// Uniform scale variation minimum.
    pub scale_min: f32,
    /// Uniform scale variation maximum.
    pub scale_max: f32,
    /// Upper bound on cells generated from the admission queue per tick.
    pub max_admissions_per_tick: u32,
    /// Camera rotation that triggers reclassification, degrees.
    pub reclassify_angle_degrees: f32,
    /// World seed for deterministic generation.
    pub world_seed: u64,
}

/// Demo terrain shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainSettings {
    /// Noise seed.
    pub seed: u32,
    /// Edge length of the square terrain, centered on the origin.
    pub size: f32,
    /// Height range above the base elevation.
    pub amplitude: f32,
    /// Noise frequency.
    pub frequency: f64,
    /// Lowest terrain elevation.
    pub base_elevation: f32,
}

/// Demo run parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoSettings {
    /// Number of simulated ticks.
    pub ticks: u32,
    /// Fixed tick duration in seconds.
    pub tick_seconds: f32,
    /// Camera forward speed in units per second.
    pub camera_speed: f32,
    /// Camera yaw rate in degrees per second.
    pub turn_rate_degrees: f32,
    /// Viewport aspect ratio for the culling frustum.
    pub aspect: f32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugSettings {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            view_distance: 50.0,
            density_near: 10.0,
            density_ring: 4.0,
            density_far: 1.0,
            lod0_distance: 20.0,
            lod1_distance: 35.0,
            fov_degrees: 90.0,
            cone_offset_degrees: 10.0,
            transition_speed: 1.0,
            sea_level: 0.0,
            scale_min: 0.8,
            scale_max: 1.2,
            max_admissions_per_tick: 2,
            reclassify_angle_degrees: 10.0,
            world_seed: 0,
        }
    }
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            seed: 7,
            size: 1000.0,
            amplitude: 8.0,
            frequency: 0.015,
            base_elevation: 0.0,
        }
    }
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            ticks: 600,
            tick_seconds: 1.0 / 60.0,
            camera_speed: 6.0,
            turn_rate_degrees: 12.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Settings {
    /// Load settings from the given directory, or create a default file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let settings: Settings = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded settings from {}", config_path.display());
            Ok(settings)
        } else {
            let settings = Settings::default();
            settings.save(config_dir)?;
            log::info!("Created default settings at {}", config_path.display());
            Ok(settings)
        }
    }

    /// Save settings to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_settings)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_settings: Settings = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_settings != self {
            log::info!("Settings reloaded with changes");
            Ok(Some(new_settings))
        } else {
            Ok(None)
        }
    }
}
