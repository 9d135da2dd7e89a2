//! Strand generator.
//!
//! For each scalp triangle and each density sample, a new strand is the
//! barycentric blend of the triangle's three guide hairs. Blending across
//! a guide pair is gated by the angle between their root directions, so
//! hair parted in opposite directions never smears across the parting
//! line; the root point always uses the ungated weights so it sits
//! exactly on the surface interpolation.
//!
//! Generation is incremental: a cursor walks the triangle list and each
//! `generate_slice` call consumes the next run of unprocessed triangles
//! exactly once, so interactive rebuilds stay responsive on large scalps
//! and re-invocation after completion is a no-op.

use glam::Vec3;

use crate::config::HairConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::generation::scalp::ScalpMesh;
use crate::guide::GuideHairSet;
use crate::strand::{StrandBuffer, StrandProperties};

/// Deterministic per-triangle random stream (integer hash based, so the
/// same seed and triangle index always produce the same strands no matter
/// how the rebuild is sliced).
struct HashRng {
    state: u32,
}

impl HashRng {
    fn for_triangle(seed: u32, triangle: usize) -> Self {
        let mut h = (triangle as u32)
            .wrapping_mul(374761393)
            .wrapping_add(seed.wrapping_mul(1274126177));
        h = (h ^ (h >> 13)).wrapping_mul(1103515245);
        Self { state: h ^ (h >> 16) }
    }

    fn next_u32(&mut self) -> u32 {
        // PCG-XSH-RR style output on an LCG state.
        self.state = self.state.wrapping_mul(747796405).wrapping_add(2891336453);
        let s = self.state;
        let word = ((s >> ((s >> 28) + 4)) ^ s).wrapping_mul(277803737);
        (word >> 22) ^ word
    }

    /// Uniform in [0, 1).
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [min, max].
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Barycentric draw: uniform in (0, 1], never exactly zero so a guide
    /// always carries some weight before gating.
    fn bary(&mut self) -> f32 {
        self.next_f32().max(1e-5)
    }
}

/// Gated alignment coefficient for one guide pair.
///
/// Binary by construction: 1 if the directions are within
/// `blend_angle_limit` degrees (mapped through `(dot+1)/2`), else 0.
pub(crate) fn alignment_gate(dir_a: Vec3, dir_b: Vec3, blend_angle_limit: f32) -> f32 {
    let da = ((dir_a.dot(dir_b) + 1.0) * 0.5).clamp(0.0, 1.0);
    let gated = (da + blend_angle_limit / 180.0).min(1.0);
    if gated < 1.0 { 0.0 } else { gated }
}

/// Attenuate the two non-dominant barycentric weights by the gate of
/// their pair with the dominant guide, then renormalize. Pair gates:
/// `da[0]` = (0,1), `da[1]` = (1,2), `da[2]` = (2,0).
pub(crate) fn blend_weights(c: [f32; 3], da: [f32; 3]) -> [f32; 3] {
    let [c0, c1, c2] = c;
    let [mut tc0, mut tc1, mut tc2] = c;

    if c0 >= c1 && c0 >= c2 {
        tc1 *= da[0];
        tc2 *= da[2];
    } else if c1 >= c0 && c1 >= c2 {
        tc0 *= da[0];
        tc2 *= da[1];
    } else {
        tc0 *= da[2];
        tc1 *= da[1];
    }

    let norm = (tc0 + tc1 + tc2).max(1e-4);
    [tc0 / norm, tc1 / norm, tc2 / norm]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Incremental strand generator. One instance per simulated object;
/// `start_rebuild` resets the cursor, `generate_slice` advances it.
pub struct StrandGenerator {
    seed: u32,
    next_triangle: usize,
}

impl StrandGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            next_triangle: 0,
        }
    }

    /// Begin a new rebuild pass. Validates the configuration up front so
    /// a bad config never touches the strand buffer.
    pub fn start_rebuild(&mut self, config: &HairConfig) -> Result<()> {
        config.validate()?;
        self.next_triangle = 0;
        Ok(())
    }

    /// Triangles processed so far, as a fraction of `scalp`'s total.
    pub fn progress(&self, scalp: &ScalpMesh) -> f32 {
        if scalp.triangle_count() == 0 {
            return 1.0;
        }
        self.next_triangle as f32 / scalp.triangle_count() as f32
    }

    pub fn is_complete(&self, scalp: &ScalpMesh) -> bool {
        self.next_triangle >= scalp.triangle_count()
    }

    /// Process up to `max_triangles` unprocessed triangles, appending
    /// `density` strands per triangle into `buffer`. Exactly-once: the
    /// cursor only moves forward, and calls after completion emit nothing.
    ///
    /// A zero-triangle scalp or empty guide set is a warning-level no-op,
    /// not an error; the buffer is left as it was.
    ///
    /// Returns the number of strands emitted by this slice.
    pub fn generate_slice(
        &mut self,
        scalp: &ScalpMesh,
        guides: &GuideHairSet,
        config: &HairConfig,
        buffer: &mut StrandBuffer,
        max_triangles: usize,
    ) -> Result<usize> {
        if scalp.triangle_count() == 0 || guides.is_empty() {
            log::warn!("strand generation skipped: scalp or guide set is empty");
            return Ok(0);
        }

        guides.ensure_point_count(config.points_per_strand)?;

        let end = (self.next_triangle + max_triangles).min(scalp.triangle_count());
        let mut emitted = 0;

        for tri in self.next_triangle..end {
            emitted += self.build_triangle(scalp, guides, config, buffer, tri)?;
        }
        self.next_triangle = end;

        log::debug!(
            "generated {} strands, {}/{} triangles done",
            emitted,
            self.next_triangle,
            scalp.triangle_count()
        );
        Ok(emitted)
    }

    /// Run the remaining triangles to completion.
    pub fn generate_all(
        &mut self,
        scalp: &ScalpMesh,
        guides: &GuideHairSet,
        config: &HairConfig,
        buffer: &mut StrandBuffer,
    ) -> Result<usize> {
        let remaining = scalp.triangle_count().saturating_sub(self.next_triangle);
        let emitted = self.generate_slice(scalp, guides, config, buffer, remaining)?;
        if emitted > 0 {
            log::info!(
                "rebuild complete: {} strands, {} points",
                buffer.strand_count(),
                buffer.point_count()
            );
        }
        Ok(emitted)
    }

    fn build_triangle(
        &self,
        scalp: &ScalpMesh,
        guides: &GuideHairSet,
        config: &HairConfig,
        buffer: &mut StrandBuffer,
        tri: usize,
    ) -> Result<usize> {
        let [i0, i1, i2] = scalp.triangles()[tri];
        let lookup = |i: u32| {
            guides.get(i as usize).ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "triangle references guide {i} but only {} guides exist",
                    guides.len()
                ))
            })
        };
        let g0 = lookup(i0)?;
        let g1 = lookup(i1)?;
        let g2 = lookup(i2)?;

        // Pair gates from the guides' root directions.
        let a0 = g0.root_direction();
        let a1 = g1.root_direction();
        let a2 = g2.root_direction();
        let da = [
            alignment_gate(a0, a1, config.blend_angle_limit),
            alignment_gate(a1, a2, config.blend_angle_limit),
            alignment_gate(a2, a0, config.blend_angle_limit),
        ];

        let n = config.points_per_strand as usize;
        let mut rng = HashRng::for_triangle(self.seed, tri);

        let mut positions = vec![Vec3::ZERO; n];
        let mut colors = vec![[0.0f32; 3]; n];
        let mut thickness = vec![0.0f32; n];
        let mut stiffness = vec![0.0f32; n];
        let mut retention = vec![0.0f32; n];

        for _ in 0..config.density {
            let raw = {
                let c0 = rng.bary();
                let c1 = rng.bary();
                let c2 = rng.bary();
                let sum = c0 + c1 + c2;
                [c0 / sum, c1 / sum, c2 / sum]
            };
            let tc = blend_weights(raw, da);

            for c in 0..n {
                // Root point uses the raw weights so it lands exactly on
                // the surface interpolation regardless of gating.
                let w = if c == 0 { raw } else { tc };

                positions[c] =
                    g0.points[c] * w[0] + g1.points[c] * w[1] + g2.points[c] * w[2];
                for k in 0..3 {
                    colors[c][k] = g0.colors[c][k] * w[0]
                        + g1.colors[c][k] * w[1]
                        + g2.colors[c][k] * w[2];
                }
                thickness[c] =
                    g0.thickness[c] * w[0] + g1.thickness[c] * w[1] + g2.thickness[c] * w[2];
                stiffness[c] =
                    g0.stiffness[c] * w[0] + g1.stiffness[c] * w[1] + g2.stiffness[c] * w[2];
                retention[c] =
                    g0.retention[c] * w[0] + g1.retention[c] * w[1] + g2.retention[c] * w[2];
            }

            // Randomized final length between a variation-weighted minimum
            // and the nominal maximum.
            let blended_normal =
                g0.root_normal * raw[0] + g1.root_normal * raw[1] + g2.root_normal * raw[2];
            let max_len = config.base_length * blended_normal.length();
            let variation = (g0.length_variation * raw[0]
                + g1.length_variation * raw[1]
                + g2.length_variation * raw[2])
                .clamp(0.0, 1.0);
            let min_len = lerp(max_len, 0.0, variation);
            let length = rng.range(min_len, max_len);

            buffer.push_strand(
                &positions,
                &StrandProperties {
                    colors: &colors,
                    thickness: &thickness,
                    stiffness: &stiffness,
                    retention: &retention,
                },
                length,
            );
        }

        Ok(config.density as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::GuideHairSet;

    fn scalp_two_triangles() -> ScalpMesh {
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

    fn setup(config: &HairConfig) -> (ScalpMesh, GuideHairSet) {
        let scalp = scalp_two_triangles();
        let guides = GuideHairSet::from_scalp(&scalp, config).unwrap();
        (scalp, guides)
    }

    #[test]
    fn test_blend_weights_sum_to_one() {
        for &(c, da) in &[
            ([0.5, 0.3, 0.2], [1.0, 1.0, 1.0]),
            ([0.6, 0.3, 0.1], [0.0, 1.0, 0.0]),
            ([0.1, 0.2, 0.7], [0.0, 0.0, 0.0]),
            ([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], [1.0, 0.0, 1.0]),
        ] {
            let tc = blend_weights(c, da);
            let sum: f32 = tc.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "weights {tc:?} sum to {sum}");
        }
    }

    #[test]
    fn test_alignment_gate_is_binary() {
        let limit = 45.0;
        for (a, b) in [
            (Vec3::Y, Vec3::Y),
            (Vec3::Y, Vec3::new(0.3, 1.0, 0.0).normalize()),
            (Vec3::Y, Vec3::X),
            (Vec3::Y, -Vec3::Y),
        ] {
            let g = alignment_gate(a, b, limit);
            assert!(g == 0.0 || g == 1.0);
        }
    }

    #[test]
    fn test_gate_zero_limit_blocks_non_parallel() {
        // Limit 0: only exactly parallel directions may blend.
        assert_eq!(alignment_gate(Vec3::Y, Vec3::Y, 0.0), 1.0);
        let tilted = Vec3::new(0.01, 1.0, 0.0).normalize();
        assert_eq!(alignment_gate(Vec3::Y, tilted, 0.0), 0.0);
    }

    #[test]
    fn test_gate_full_limit_allows_everything() {
        assert_eq!(alignment_gate(Vec3::Y, -Vec3::Y, 180.0), 1.0);
        assert_eq!(alignment_gate(Vec3::Y, Vec3::X, 180.0), 1.0);
    }

    #[test]
    fn test_rebuild_strand_and_point_counts() {
        let config = HairConfig {
            points_per_strand: 5,
            density: 1,
            blend_angle_limit: 45.0,
            ..Default::default()
        };
        let (scalp, guides) = setup(&config);
        let mut buffer = StrandBuffer::new(config.points_per_strand);
        let mut generator = StrandGenerator::new(7);

        generator.start_rebuild(&config).unwrap();
        generator
            .generate_all(&scalp, &guides, &config, &mut buffer)
            .unwrap();

        assert_eq!(buffer.strand_count(), 2); // 2 triangles x density 1
        assert_eq!(buffer.point_count(), 10);
        // Strand length within the variation bounds (variation 0 here).
        for s in 0..buffer.strand_count() {
            let total = buffer.strand(s).segment_length * 5.0;
            assert!(
                (total - config.base_length).abs() < 1e-5,
                "strand {s} length {total}"
            );
        }
    }

    #[test]
    fn test_root_exactness() {
        // Root must equal the raw barycentric blend even with gating that
        // zeroes cross-influence. Give the guides wildly different root
        // directions and a zero blend limit.
        let config = HairConfig {
            points_per_strand: 5,
            density: 1,
            blend_angle_limit: 0.0,
            ..Default::default()
        };
        let scalp = scalp_two_triangles();
        let mut guides = GuideHairSet::from_scalp(&scalp, &config).unwrap();
        // Tilt guide 1 so its direction is gated out.
        for p in guides.get_mut(1).unwrap().points.iter_mut().skip(1) {
            p.x += 0.5;
        }

        let mut buffer = StrandBuffer::new(5);
        let mut generator = StrandGenerator::new(123);
        generator.start_rebuild(&config).unwrap();
        generator
            .generate_slice(&scalp, &guides, &config, &mut buffer, 1)
            .unwrap();

        // Reproduce the raw weights from the same stream.
        let mut rng = HashRng::for_triangle(123, 0);
        let c0 = rng.bary();
        let c1 = rng.bary();
        let c2 = rng.bary();
        let sum = c0 + c1 + c2;
        let expected = guides.get(0).unwrap().points[0] * (c0 / sum)
            + guides.get(1).unwrap().points[0] * (c1 / sum)
            + guides.get(2).unwrap().points[0] * (c2 / sum);

        let root = buffer.strand_points(0)[0].position_vec();
        assert!((root - expected).length() < 1e-5);
    }

    #[test]
    fn test_incremental_exactly_once() {
        let config = HairConfig {
            points_per_strand: 5,
            density: 2,
            ..Default::default()
        };
        let (scalp, guides) = setup(&config);
        let mut buffer = StrandBuffer::new(5);
        let mut generator = StrandGenerator::new(1);

        generator.start_rebuild(&config).unwrap();
        generator
            .generate_slice(&scalp, &guides, &config, &mut buffer, 1)
            .unwrap();
        assert_eq!(buffer.strand_count(), 2);
        assert!(!generator.is_complete(&scalp));

        generator
            .generate_slice(&scalp, &guides, &config, &mut buffer, 1)
            .unwrap();
        assert_eq!(buffer.strand_count(), 4);
        assert!(generator.is_complete(&scalp));

        // Further slices must not double-emit.
        for _ in 0..3 {
            let emitted = generator
                .generate_slice(&scalp, &guides, &config, &mut buffer, 10)
                .unwrap();
            assert_eq!(emitted, 0);
        }
        assert_eq!(buffer.strand_count(), 4);
    }

    #[test]
    fn test_incremental_matches_full_rebuild() {
        let config = HairConfig {
            points_per_strand: 5,
            density: 3,
            ..Default::default()
        };
        let (scalp, guides) = setup(&config);

        let mut full = StrandBuffer::new(5);
        let mut g1 = StrandGenerator::new(42);
        g1.start_rebuild(&config).unwrap();
        g1.generate_all(&scalp, &guides, &config, &mut full).unwrap();

        let mut sliced = StrandBuffer::new(5);
        let mut g2 = StrandGenerator::new(42);
        g2.start_rebuild(&config).unwrap();
        while !g2.is_complete(&scalp) {
            g2.generate_slice(&scalp, &guides, &config, &mut sliced, 1)
                .unwrap();
        }

        assert_eq!(full.strand_count(), sliced.strand_count());
        for (a, b) in full.points().iter().zip(sliced.points()) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_empty_scalp_is_warning_noop() {
        let config = HairConfig::default();
        let scalp = ScalpMesh::new(vec![], vec![], vec![]);
        let guides = GuideHairSet::default();
        let mut buffer = StrandBuffer::new(config.points_per_strand);
        let mut generator = StrandGenerator::new(0);

        generator.start_rebuild(&config).unwrap();
        let emitted = generator
            .generate_slice(&scalp, &guides, &config, &mut buffer, 100)
            .unwrap();
        assert_eq!(emitted, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_generation() {
        let config = HairConfig {
            density: 0,
            ..Default::default()
        };
        let mut generator = StrandGenerator::new(0);
        assert!(generator.start_rebuild(&config).is_err());
    }
}
