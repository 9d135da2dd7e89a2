//! Scalp mesh input.
//!
//! The host provides vertices, normals, and a triangle list in the
//! object's local space; the transform is baked to world space once at
//! initialization/rebuild time, never per frame.

use glam::{Mat4, Vec3};

/// Scalp surface the strands grow from. Guide hairs are 1:1 with its
/// vertices.
#[derive(Clone, Debug, Default)]
pub struct ScalpMesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl ScalpMesh {
    /// Build from world-space data.
    pub fn new(vertices: Vec<Vec3>, normals: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        debug_assert_eq!(vertices.len(), normals.len());
        Self {
            vertices,
            normals,
            triangles,
        }
    }

    /// Build from local-space data, baking `local_to_world` into the
    /// vertices and (normalized) normals.
    pub fn from_local(
        vertices: &[Vec3],
        normals: &[Vec3],
        triangles: Vec<[u32; 3]>,
        local_to_world: Mat4,
    ) -> Self {
        let world_vertices = vertices
            .iter()
            .map(|&v| local_to_world.transform_point3(v))
            .collect();
        let world_normals = normals
            .iter()
            .map(|&n| {
                local_to_world
                    .transform_vector3(n)
                    .try_normalize()
                    .unwrap_or(Vec3::Y)
            })
            .collect();
        Self {
            vertices: world_vertices,
            normals: world_normals,
            triangles,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_local_bakes_transform() {
        let scalp = ScalpMesh::from_local(
            &[Vec3::ZERO, Vec3::X],
            &[Vec3::Y, Vec3::Y],
            vec![],
            Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        );
        assert_eq!(scalp.vertices()[0], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(scalp.vertices()[1], Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(scalp.normals()[0], Vec3::Y);
    }

    #[test]
    fn test_from_local_normalizes_scaled_normals() {
        let scalp = ScalpMesh::from_local(
            &[Vec3::ZERO],
            &[Vec3::Y],
            vec![],
            Mat4::from_scale(Vec3::splat(3.0)),
        );
        assert!((scalp.normals()[0].length() - 1.0).abs() < 1e-6);
    }
}
