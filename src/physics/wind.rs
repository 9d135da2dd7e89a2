//! Wind force sampling.
//!
//! Up to two independent wind fields, each a base direction plus coherent
//! Perlin turbulence modulated per axis by the field's frequency. The
//! waveform only needs to be smooth and deterministic for a given seed;
//! the GPU kernel uses an equivalent value noise.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

use crate::config::{HairConfig, WindField};

/// Samples the combined wind force at a point in time.
pub struct WindSampler {
    noise: Perlin,
    noise2: Perlin,
}

impl WindSampler {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            noise2: Perlin::new(seed.wrapping_add(0x9E3779B9)),
        }
    }

    fn sample_field(&self, field: &WindField, noise: &Perlin, time: f32) -> Vec3 {
        // Per-axis turbulence in [-1, 1], each axis on its own noise lane.
        let t = |axis: f64, freq: f32| {
            noise.get([(time * freq) as f64, axis]) as f32
        };
        let turbulence = Vec3::new(
            t(0.0, field.frequency.x),
            t(17.0, field.frequency.y),
            t(29.0, field.frequency.z),
        );
        field.direction + field.direction.length() * field.turbulence * turbulence
    }

    /// Combined force of both wind fields at `time`. Zero when wind is
    /// disabled.
    pub fn sample(&self, config: &HairConfig, time: f32) -> Vec3 {
        if !config.wind_enabled {
            return Vec3::ZERO;
        }
        self.sample_field(&config.wind, &self.noise, time)
            + self.sample_field(&config.wind2, &self.noise2, time)
    }
}
