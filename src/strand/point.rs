//! GPU-layout strand data.
//!
//! `HairPoint` and `HairStrand` are the two storage-buffer element types
//! every other part of the system reads or writes. Layouts are 16-byte
//! packed and must match `HairPoint`/`HairStrand` in the WGSL kernels.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One sample along a strand (80 bytes).
///
/// Points of a strand occupy a contiguous run in the point buffer, so a
/// point is addressable as `strand_index * points_per_strand + point_index`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct HairPoint {
    pub position: [f32; 3],
    pub thickness: f32,
    // -- 16 bytes --
    /// Previous frame position for Verlet velocity reconstruction.
    pub prev_position: [f32; 3],
    pub stiffness: f32,
    // -- 16 bytes --
    /// Rest direction of the inbound segment expressed in the propagated
    /// tangent frame: (dot tangent, dot bitangent, dot normal).
    pub rest_angles: [f32; 3],
    pub retention: f32,
    // -- 16 bytes --
    pub color: [f32; 3],
    pub strand_index: u32,
    // -- 16 bytes --
    /// Contiguous 0..points_per_strand-1 within the owning strand.
    pub point_index: u32,
    pub _pad: [u32; 3],
    // -- 16 bytes --
    // Total: 80 bytes
}

/// Per-strand data (32 bytes): the root tangent frame the solver
/// reconstructs rest shape from, and the rest segment length.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct HairStrand {
    pub tangent: [f32; 3],
    /// Rest length of every segment: total length / point count.
    pub segment_length: f32,
    // -- 16 bytes --
    pub bitangent: [f32; 3],
    pub _pad: f32,
    // -- 16 bytes --
    // Total: 32 bytes
}

impl HairPoint {
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn prev_position_vec(&self) -> Vec3 {
        Vec3::from(self.prev_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hair_point_size() {
        assert_eq!(std::mem::size_of::<HairPoint>(), 80);
    }

    #[test]
    fn test_hair_point_alignment() {
        assert_eq!(std::mem::size_of::<HairPoint>() % 16, 0);
    }

    #[test]
    fn test_hair_strand_size() {
        assert_eq!(std::mem::size_of::<HairStrand>(), 32);
    }

    #[test]
    fn test_bytemuck_cast() {
        let p = HairPoint::zeroed();
        assert_eq!(bytemuck::bytes_of(&p).len(), 80);
        let s = HairStrand::zeroed();
        assert_eq!(bytemuck::bytes_of(&s).len(), 32);
    }
}
