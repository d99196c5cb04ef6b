//! Headless demo: flies a camera across a noise terrain and streams foliage.
//!
//! Settings are loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p sward-demo` for the default 10-second
//! flight, or e.g. `cargo run -p sward-demo -- --seed 42 --ticks 1200` to
//! change the world and duration. No GPU is touched; draw submission goes
//! through a counting backend and the per-second statistics are logged.

use clap::Parser;
use glam::{Vec2, Vec3};
use sward_config::{CliArgs, Settings, default_config_dir};
use sward_field::{CameraPose, FieldConfig, FoliageField, Tier};
use sward_render::{
    AssetProvider, CountingBackend, FoliageRenderer, Frustum, LodBuckets, MaterialHandle,
    MeshHandle, WindParams, view_projection,
};
use sward_terrain::{NoiseTerrain, TerrainExtent, TerrainSampler};
use tracing::{info, warn};

/// Fixed demo assets: every tier resolves to a synthetic handle pair.
struct DemoAssets;

impl AssetProvider for DemoAssets {
    fn tier_assets(&self, tier: usize) -> Option<(MeshHandle, MaterialHandle)> {
        Some((MeshHandle(tier as u64), MaterialHandle(100 + tier as u64)))
    }
}

/// Build the runtime field configuration from persisted settings.
///
/// Every value passes through the clamping setters, so out-of-range numbers
/// in a hand-edited file are pulled into their valid ranges here.
fn field_config(settings: &Settings) -> FieldConfig {
    let s = &settings.field;
    let mut config = FieldConfig::default();
    config.set_view_distance(s.view_distance);
    config.set_density(Tier::Near, s.density_near);
    config.set_density(Tier::Ring, s.density_ring);
    config.set_density(Tier::Far, s.density_far);
    config.set_lod_distances(s.lod0_distance, s.lod1_distance);
    config.set_fov_degrees(s.fov_degrees);
    config.set_cone_offset_degrees(s.cone_offset_degrees);
    config.set_transition_speed(s.transition_speed);
    config.set_sea_level(s.sea_level);
    config.set_scale_range(s.scale_min, s.scale_max);
    config.set_max_admissions_per_tick(s.max_admissions_per_tick);
    config.set_reclassify_angle_degrees(s.reclassify_angle_degrees);
    config.set_world_seed(s.world_seed);
    config
}

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut settings = match Settings::load_or_create(&config_dir) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("could not load settings ({err}), using defaults");
            Settings::default()
        }
    };
    settings.apply_cli_overrides(&args);

    sward_log::init_logging(None, cfg!(debug_assertions), Some(&settings));

    let terrain = NoiseTerrain::new(
        settings.terrain.seed,
        TerrainExtent::new(
            Vec2::splat(-settings.terrain.size * 0.5),
            Vec2::splat(settings.terrain.size),
        ),
        settings.terrain.base_elevation,
        settings.terrain.amplitude,
        settings.terrain.frequency,
    );

    let mut field = FoliageField::new(field_config(&settings));
    let mut buckets = LodBuckets::new();
    let mut renderer = FoliageRenderer::new();
    let mut backend = CountingBackend::default();
    let wind = WindParams::default();

    let dt = settings.demo.tick_seconds;
    let turn_rate = settings.demo.turn_rate_degrees.to_radians();
    let aspect = settings.demo.aspect;
    let view_distance = field.config().view_distance();
    let fov = field.config().fov_degrees();

    info!(
        seed = settings.field.world_seed,
        ticks = settings.demo.ticks,
        view_distance,
        "starting foliage flight"
    );

    let mut position = Vec3::ZERO;
    let mut yaw = 0.0f32;
    let mut total_draw_calls = 0u64;
    let mut total_instances = 0u64;

    for tick in 0..settings.demo.ticks {
        yaw += turn_rate * dt;
        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        position += forward * settings.demo.camera_speed * dt;
        position.y = terrain.sample_height(position.x, position.z) + 1.7;
        let pose = CameraPose::new(position, forward);

        let report = field.tick(&pose, dt, &terrain);

        let vp = view_projection(pose.position, pose.forward, fov, aspect, 0.1, view_distance);
        let bucket_stats = buckets.rebuild(&field, pose.position, &Frustum::from_view_projection(&vp));

        renderer.refresh_assets(&DemoAssets);
        let submit_stats = renderer.render(&buckets, &wind, &mut backend);
        total_draw_calls += u64::from(submit_stats.draw_calls);
        total_instances += submit_stats.instances as u64;
        if submit_stats.tiers_skipped > 0 {
            warn!(skipped = submit_stats.tiers_skipped, "foliage tiers without assets");
        }

        // One status line per simulated second.
        if tick % 60 == 0 {
            let stats = field.stats();
            info!(
                tick,
                resident = stats.resident,
                pending = stats.pending,
                transitioning = stats.transitioning,
                visible = stats.visible_instances,
                cells_drawn = bucket_stats.cells_visible,
                draw_calls = submit_stats.draw_calls,
                classified = report.classified,
                "field status"
            );
        }
    }

    let stats = field.stats();
    info!(
        resident = stats.resident,
        visible = stats.visible_instances,
        total_draw_calls,
        total_instances,
        "flight complete"
    );
}
