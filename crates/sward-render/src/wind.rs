//! Wind shader parameters, passed through to the foliage materials.

use glam::Vec2;

/// Uniforms pushed once per tick to each LOD tier's material.
///
/// The field never interprets these values; they exist so the host's
/// foliage shaders sway consistently across tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindParams {
    /// Sway amplitude.
    pub strength: f32,
    /// Sway frequency in hertz.
    pub frequency: f32,
    /// Planar wind direction.
    pub direction: Vec2,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            strength: 0.35,
            frequency: 1.2,
            direction: Vec2::X,
        }
    }
}
