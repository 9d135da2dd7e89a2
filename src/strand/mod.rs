//! Flat strand storage.
//!
//! `StrandBuffer` is the canonical arena of simulated hair: one flat
//! `HairPoint` array plus one `HairStrand` array, indexed by
//! `(strand_index, point_index)`. The generator fills it, the physics
//! solver mutates it in place, the renderer reads it. There is no
//! per-point heap node anywhere.

pub mod point;

pub use point::{HairPoint, HairStrand};

use glam::Vec3;

const EPS: f32 = 1e-6;

/// Normalize or fall back when the direction is degenerate.
#[inline]
pub(crate) fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Root tangent frame plus per-point rest orientation angles for one
/// strand, derived from its authored point positions.
pub struct StrandFrame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    /// `(d0, d1, d2)` per point: inbound rest direction dotted with the
    /// propagated (tangent, bitangent, normal) frame. Index 0 is unused,
    /// index 1 is `(0, 0, 1)` so the reconstruction
    /// `d0*t + d1*b + d2*n` yields the root normal.
    pub rest_angles: Vec<Vec3>,
}

impl StrandFrame {
    /// Derive the frame from rest positions. Needs at least 2 points;
    /// coincident points fall back to the previous segment direction.
    pub fn from_points(points: &[Vec3]) -> Self {
        debug_assert!(points.len() >= 2);

        let normal = normalize_or(points[1] - points[0], Vec3::Y);

        // Root tangent from whichever world axis is less aligned with the
        // root direction.
        let c1 = normal.cross(Vec3::Z);
        let c2 = normal.cross(Vec3::Y);
        let tangent = if c1.length_squared() > c2.length_squared() {
            normalize_or(c1, Vec3::X)
        } else {
            normalize_or(c2, Vec3::X)
        };
        let bitangent = normalize_or(tangent.cross(normal), Vec3::Z);

        let mut rest_angles = vec![Vec3::ZERO; points.len()];
        rest_angles[1] = Vec3::new(0.0, 0.0, 1.0);

        let mut prev_tangent = tangent;
        let mut prev_bitangent = bitangent;

        for i in 2..points.len() {
            let prev_normal = normalize_or(points[i - 1] - points[i - 2], normal);
            let dir = normalize_or(points[i] - points[i - 1], prev_normal);

            let d0 = dir.dot(prev_tangent);
            let d1 = dir.dot(prev_bitangent);
            let d2 = dir.dot(prev_normal);
            rest_angles[i] = Vec3::new(d0, d1, d2);

            // Propagate the frame along the rest shape. Re-orthogonalizing
            // against the reconstructed normal accumulates a small error,
            // same as the source data this was authored from.
            let cur_normal = normalize_or(
                prev_normal * d2 + prev_tangent * d0 + prev_bitangent * d1,
                prev_normal,
            );
            prev_tangent = normalize_or(prev_tangent - cur_normal * d0, prev_tangent);
            prev_bitangent = normalize_or(prev_bitangent - cur_normal * d1, prev_bitangent);
        }

        Self {
            tangent,
            bitangent,
            rest_angles,
        }
    }
}

/// Per-point material properties fed alongside positions when a strand is
/// appended.
pub struct StrandProperties<'a> {
    pub colors: &'a [[f32; 3]],
    pub thickness: &'a [f32],
    pub stiffness: &'a [f32],
    pub retention: &'a [f32],
}

/// The canonical point + strand arrays for one simulated hair object.
#[derive(Default)]
pub struct StrandBuffer {
    points: Vec<HairPoint>,
    strands: Vec<HairStrand>,
    points_per_strand: u32,
}

impl StrandBuffer {
    /// Create an empty buffer for strands of `points_per_strand` samples.
    pub fn new(points_per_strand: u32) -> Self {
        Self {
            points: Vec::new(),
            strands: Vec::new(),
            points_per_strand,
        }
    }

    pub fn points_per_strand(&self) -> u32 {
        self.points_per_strand
    }

    pub fn strand_count(&self) -> usize {
        self.strands.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }

    pub fn points(&self) -> &[HairPoint] {
        &self.points
    }

    pub fn strands(&self) -> &[HairStrand] {
        &self.strands
    }

    /// Drop all strands, keeping the configured point count.
    pub fn clear(&mut self) {
        self.points.clear();
        self.strands.clear();
    }

    /// Reset for a new point count (full rebuild only).
    pub fn reset(&mut self, points_per_strand: u32) {
        self.clear();
        self.points_per_strand = points_per_strand;
    }

    /// Points of one strand as a contiguous slice.
    pub fn strand_points(&self, strand: usize) -> &[HairPoint] {
        let n = self.points_per_strand as usize;
        &self.points[strand * n..(strand + 1) * n]
    }

    pub fn strand_points_mut(&mut self, strand: usize) -> &mut [HairPoint] {
        let n = self.points_per_strand as usize;
        &mut self.points[strand * n..(strand + 1) * n]
    }

    pub fn strand(&self, strand: usize) -> &HairStrand {
        &self.strands[strand]
    }

    /// Parallel view: per-strand chunks of points zipped with strand data.
    pub fn par_strands_mut(
        &mut self,
    ) -> impl rayon::iter::IndexedParallelIterator<Item = (&mut [HairPoint], &HairStrand)> {
        use rayon::prelude::*;
        let n = self.points_per_strand as usize;
        self.points
            .par_chunks_mut(n)
            .zip(self.strands.par_iter())
    }

    /// Append one strand from authored positions and properties.
    ///
    /// Derives the root tangent frame and per-point rest angles from the
    /// positions, so the solver can reconstruct the rest shape later.
    /// `length` is the randomized final strand length; segment rest length
    /// is `length / point count` regardless of the current point spacing
    /// (the solver's reprojection settles the strand onto it).
    pub fn push_strand(&mut self, positions: &[Vec3], props: &StrandProperties, length: f32) {
        debug_assert_eq!(positions.len(), self.points_per_strand as usize);
        debug_assert_eq!(props.colors.len(), positions.len());

        let frame = StrandFrame::from_points(positions);
        let strand_index = self.strands.len() as u32;
        let segment_length = (length / positions.len() as f32).max(EPS);

        for (i, &pos) in positions.iter().enumerate() {
            self.points.push(HairPoint {
                position: pos.into(),
                thickness: props.thickness[i],
                prev_position: pos.into(),
                stiffness: props.stiffness[i],
                rest_angles: frame.rest_angles[i].into(),
                retention: props.retention[i],
                color: props.colors[i],
                strand_index,
                point_index: i as u32,
                _pad: [0; 3],
            });
        }

        self.strands.push(HairStrand {
            tangent: frame.tangent.into(),
            segment_length,
            bitangent: frame.bitangent.into(),
            _pad: 0.0,
        });
    }

    /// Re-anchor every strand root to a new position, without disturbing
    /// the rest of the strand. The only way roots ever move.
    pub fn anchor_root(&mut self, strand: usize, position: Vec3) {
        let n = self.points_per_strand as usize;
        let root = &mut self.points[strand * n];
        root.position = position.into();
        root.prev_position = position.into();
    }
}
