//! Guide hair authoring set.
//!
//! Sparse control strands anchored to scalp vertices — 1:1 with vertices
//! when auto-generated, independently editable afterward. Created on
//! reset, destroyed and regenerated wholesale on the next reset, mutated
//! by brush commands. Upstream of the strand buffer only; never simulated.

pub mod brush;
pub mod hair;

pub use brush::{apply_move_brush, apply_property_brush, MoveBrush, PropertyBrush, StrokeSample};
pub use hair::GuideHair;

use glam::Vec3;

use crate::config::HairConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::generation::scalp::ScalpMesh;

/// The full set of guide hairs for one simulated object.
#[derive(Clone, Debug, Default)]
pub struct GuideHairSet {
    guides: Vec<GuideHair>,
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

impl GuideHairSet {
    /// Create one guide hair: `point_count` control points evenly spaced
    /// from the root along the normal, base properties interpolated
    /// root→tip.
    pub fn create(
        root_position: Vec3,
        root_normal: Vec3,
        point_count: u32,
        config: &HairConfig,
    ) -> Result<GuideHair> {
        if point_count < 3 {
            return Err(Error::InvalidConfiguration(format!(
                "guide hair needs at least 3 points, got {point_count}"
            )));
        }

        let n = point_count as usize;
        let mut points = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        let mut thickness = Vec::with_capacity(n);

        for i in 0..n {
            let t = i as f32 / (n - 1) as f32;
            points.push(root_position + root_normal * (t * config.base_length));
            colors.push(lerp3(config.root_color, config.tip_color, t));
            thickness.push(
                config.root_thickness + (config.tip_thickness - config.root_thickness) * t,
            );
        }

        Ok(GuideHair {
            root_normal,
            points,
            colors,
            thickness,
            stiffness: vec![config.base_stiffness; n],
            retention: vec![config.base_retention; n],
            length: config.base_length,
            length_variation: config.base_length_variation,
        })
    }

    /// Build one guide per scalp vertex. The wholesale regeneration that
    /// backs a "Reset".
    pub fn from_scalp(scalp: &ScalpMesh, config: &HairConfig) -> Result<Self> {
        config.validate()?;
        if scalp.vertex_count() == 0 {
            return Err(Error::EmptyInput("scalp mesh has no vertices".into()));
        }

        let guides = scalp
            .vertices()
            .iter()
            .zip(scalp.normals())
            .map(|(&pos, &normal)| {
                Self::create(pos, normal, config.points_per_strand, config)
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!("created {} guide hairs from scalp vertices", guides.len());
        Ok(Self { guides })
    }

    /// Check every guide against the configured point count. Guides are
    /// regenerated on reset, so a mismatch means the point count changed
    /// without one.
    pub fn ensure_point_count(&self, points_per_strand: u32) -> Result<()> {
        let n = points_per_strand as usize;
        for guide in &self.guides {
            if guide.point_count() != n {
                return Err(Error::InvalidConfiguration(format!(
                    "guide hair has {} points, config expects {n}; reset the guides",
                    guide.point_count()
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GuideHair> {
        self.guides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut GuideHair> {
        self.guides.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GuideHair> {
        self.guides.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GuideHair> {
        self.guides.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalp_quad() -> ScalpMesh {
        ScalpMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![Vec3::Y; 4],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_create_spacing_and_properties() {
        let config = HairConfig {
            points_per_strand: 5,
            base_length: 0.4,
            root_thickness: 0.004,
            tip_thickness: 0.001,
            root_color: [1.0, 0.0, 0.0],
            tip_color: [0.0, 0.0, 1.0],
            ..Default::default()
        };
        let g = GuideHairSet::create(Vec3::ZERO, Vec3::Y, 5, &config).unwrap();

        assert_eq!(g.point_count(), 5);
        assert_eq!(g.points[0], Vec3::ZERO);
        assert!((g.points[4].y - 0.4).abs() < 1e-6);
        assert!((g.points[1].y - 0.1).abs() < 1e-6);
        assert!((g.thickness[0] - 0.004).abs() < 1e-6);
        assert!((g.thickness[4] - 0.001).abs() < 1e-6);
        assert_eq!(g.colors[0], [1.0, 0.0, 0.0]);
        assert_eq!(g.colors[4], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_create_rejects_two_points() {
        let config = HairConfig::default();
        assert!(GuideHairSet::create(Vec3::ZERO, Vec3::Y, 2, &config).is_err());
    }

    #[test]
    fn test_from_scalp_one_guide_per_vertex() {
        let set = GuideHairSet::from_scalp(&scalp_quad(), &HairConfig::default()).unwrap();
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_from_scalp_empty_is_error() {
        let scalp = ScalpMesh::new(vec![], vec![], vec![]);
        let err = GuideHairSet::from_scalp(&scalp, &HairConfig::default());
        assert!(matches!(err, Err(Error::EmptyInput(_))));
    }
}
