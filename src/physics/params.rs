//! GPU physics params uniform (144 bytes, 16-byte aligned).
//!
//! One snapshot per frame of every knob the kernels read. Must match
//! `PhysicsParams` in hair_physics.wgsl and hair_occupancy.wgsl.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::HairConfig;

/// Per-frame uniform for the occupancy and physics kernels.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PhysicsParams {
    pub gravity: [f32; 3],
    pub delta_time: f32,
    // -- 16 bytes --
    pub wind_direction: [f32; 3],
    pub wind_turbulence: f32,
    // -- 16 bytes --
    pub wind_frequency: [f32; 3],
    pub wind_turbulence2: f32,
    // -- 16 bytes --
    pub wind_direction2: [f32; 3],
    pub time: f32,
    // -- 16 bytes --
    pub wind_frequency2: [f32; 3],
    pub damping: f32,
    // -- 16 bytes --
    pub stiffness: f32,
    pub retention: f32,
    pub strand_count: u32,
    pub points_per_strand: u32,
    // -- 16 bytes --
    /// Occupancy region center.
    pub center: [f32; 3],
    pub wind_enabled: u32,
    // -- 16 bytes --
    /// Occupancy region half-extents.
    pub bounds: [f32; 3],
    pub self_collision: u32,
    // -- 16 bytes --
    pub collider_count: u32,
    pub _pad: [u32; 3],
    // -- 16 bytes --
    // Total: 144 bytes
}

impl PhysicsParams {
    /// Snapshot the configuration for one frame.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &HairConfig,
        delta_time: f32,
        time: f32,
        strand_count: u32,
        points_per_strand: u32,
        center: Vec3,
        bounds: Vec3,
        collider_count: u32,
    ) -> Self {
        Self {
            gravity: config.gravity.into(),
            delta_time,
            wind_direction: config.wind.direction.into(),
            wind_turbulence: config.wind.turbulence,
            wind_frequency: config.wind.frequency.into(),
            wind_turbulence2: config.wind2.turbulence,
            wind_direction2: config.wind2.direction.into(),
            time,
            wind_frequency2: config.wind2.frequency.into(),
            damping: config.damping,
            stiffness: config.stiffness,
            retention: config.retention,
            strand_count,
            points_per_strand,
            center: center.into(),
            wind_enabled: u32::from(config.wind_enabled),
            bounds: bounds.into(),
            self_collision: u32::from(config.self_collision),
            collider_count,
            _pad: [0; 3],
        }
    }
}
