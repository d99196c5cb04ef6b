//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Settings;

/// Sward demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "sward", about = "Sward foliage streaming demo")]
pub struct CliArgs {
    /// World seed for deterministic generation.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Retention radius in world units.
    #[arg(long)]
    pub view_distance: Option<f32>,

    /// Horizontal field of view in degrees.
    #[arg(long)]
    pub fov: Option<f32>,

    /// Density transition progress per second.
    #[arg(long)]
    pub transition_speed: Option<f32>,

    /// Number of simulated ticks.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Camera forward speed in units per second.
    #[arg(long)]
    pub camera_speed: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Settings {
    /// Apply CLI overrides to loaded settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.field.world_seed = seed;
        }
        if let Some(vd) = args.view_distance {
            self.field.view_distance = vd;
        }
        if let Some(fov) = args.fov {
            self.field.fov_degrees = fov;
        }
        if let Some(speed) = args.transition_speed {
            self.field.transition_speed = speed;
        }
        if let Some(ticks) = args.ticks {
            self.demo.ticks = ticks;
        }
        if let Some(speed) = args.camera_speed {
            self.demo.camera_speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
