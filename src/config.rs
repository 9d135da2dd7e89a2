//! Simulation configuration.
//!
//! Every knob driving generation and physics lives here. Values are read
//! at the start of an operation (a generation slice or a physics frame);
//! changing them never affects a dispatch already in flight.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::types::{Result, Vec3};

/// One wind field: a base direction plus coherent turbulence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WindField {
    /// Base wind direction and magnitude (not normalized).
    pub direction: Vec3,
    /// Turbulence amplitude added on top of the base direction.
    pub turbulence: f32,
    /// Per-axis noise frequency.
    pub frequency: Vec3,
}

impl Default for WindField {
    fn default() -> Self {
        Self {
            direction: Vec3::ZERO,
            turbulence: 0.5,
            frequency: Vec3::ONE,
        }
    }
}

/// User-facing simulation configuration.
///
/// `points_per_strand` is a simulation-wide constant: every strand of one
/// simulated object has the same point count, and consumers of the GPU
/// buffers must take it from here rather than deriving it from buffer
/// sizes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HairConfig {
    // -- Generation --
    /// Points per strand (minimum 3).
    pub points_per_strand: u32,
    /// Strands generated per scalp triangle.
    pub density: u32,
    /// Nominal strand length in meters.
    pub base_length: f32,
    /// Fraction of length randomized away per strand (0 = uniform).
    pub base_length_variation: f32,
    /// Strand thickness at the root.
    pub root_thickness: f32,
    /// Strand thickness at the tip.
    pub tip_thickness: f32,
    /// Default per-point stiffness painted onto new guide hairs.
    pub base_stiffness: f32,
    /// Default per-point retention painted onto new guide hairs.
    pub base_retention: f32,
    /// Strand color at the root (RGB).
    pub root_color: [f32; 3],
    /// Strand color at the tip (RGB).
    pub tip_color: [f32; 3],
    /// Maximum angle (degrees) between two guide directions that still
    /// permits cross-blending during generation.
    pub blend_angle_limit: f32,

    // -- Physics --
    pub gravity: Vec3,
    /// Velocity damping in [0, 1]; 1 kills all motion carry-over.
    pub damping: f32,
    /// Global multiplier on per-point stiffness.
    pub stiffness: f32,
    /// Global multiplier on per-point retention.
    pub retention: f32,
    /// Master wind toggle.
    pub wind_enabled: bool,
    pub wind: WindField,
    pub wind2: WindField,
    /// Voxel-grid self-collision toggle, read once per frame.
    pub self_collision: bool,
}

impl Default for HairConfig {
    fn default() -> Self {
        Self {
            points_per_strand: 10,
            density: 3,
            base_length: 0.1,
            base_length_variation: 0.0,
            root_thickness: 0.002,
            tip_thickness: 0.002,
            base_stiffness: 0.0,
            base_retention: 0.75,
            root_color: [1.0, 1.0, 1.0],
            tip_color: [1.0, 1.0, 1.0],
            blend_angle_limit: 45.0,
            gravity: Vec3::new(0.0, -0.01, 0.0),
            damping: 0.8,
            stiffness: 1.0,
            retention: 1.0,
            wind_enabled: false,
            wind: WindField::default(),
            wind2: WindField::default(),
            self_collision: false,
        }
    }
}

impl HairConfig {
    /// Validate the generation-critical knobs.
    ///
    /// Called at the start of every rebuild; a failing config leaves the
    /// previous strand buffer untouched.
    pub fn validate(&self) -> Result<()> {
        use crate::core::error::Error;

        if self.points_per_strand < 3 {
            return Err(Error::InvalidConfiguration(format!(
                "points_per_strand must be at least 3, got {}",
                self.points_per_strand
            )));
        }
        if self.base_length <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "base_length must be positive, got {}",
                self.base_length
            )));
        }
        if self.density == 0 {
            return Err(Error::InvalidConfiguration(
                "density must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HairConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_low_point_count() {
        let cfg = HairConfig {
            points_per_strand: 2,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_length() {
        let cfg = HairConfig {
            base_length: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_density() {
        let cfg = HairConfig {
            density: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = HairConfig {
            points_per_strand: 16,
            wind_enabled: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: HairConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points_per_strand, 16);
        assert!(back.wind_enabled);
    }
}
