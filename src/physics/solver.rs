//! CPU strand integrator.
//!
//! Authoritative implementation of the per-frame step; the WGSL kernel in
//! `crate::render` mirrors it stage for stage. Each strand is solved
//! independently (one rayon task per strand, one GPU thread per strand),
//! walking its points root to tip so every constraint reads the already
//! settled parent point.
//!
//! Per point, in order: force integration, rest-shape retention, stiffness
//! straightening, sphere collision, self-collision repulsion, and segment
//! length reprojection last so nothing downstream can stretch the strand.
//! Point 0 is the anchored root and is never touched.

use glam::Vec3;
use rayon::prelude::*;

use crate::config::HairConfig;
use crate::math::Aabb;
use crate::strand::{normalize_or, HairPoint, HairStrand, StrandBuffer};

use super::collider::SphereCollider;
use super::occupancy::OccupancyGrid;
use super::wind::WindSampler;

/// Self-collision push per excess neighbor, as a fraction of the smallest
/// grid cell. Keeps the per-frame displacement well under one cell so the
/// repulsion cannot outrun the grid it samples.
const REPULSION_STEP: f32 = 0.05;
const REPULSION_MAX: f32 = 0.25;

/// Rounds of sphere push-out / length reprojection alternation. Matches
/// `COLLISION_PASSES` in hair_physics.wgsl.
const COLLISION_PASSES: u32 = 4;

/// Per-frame strand physics over a [`StrandBuffer`].
pub struct PhysicsSolver {
    wind: WindSampler,
    occupancy: OccupancyGrid,
}

impl PhysicsSolver {
    pub fn new(seed: u32) -> Self {
        Self {
            wind: WindSampler::new(seed),
            occupancy: OccupancyGrid::new(),
        }
    }

    /// The self-collision grid as of the last step.
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Simulation region: centroid of the strand roots, grown per axis to
    /// the farthest root and inflated by the longest possible strand.
    pub fn compute_bounds(buffer: &StrandBuffer) -> Aabb {
        if buffer.is_empty() {
            return Aabb::from_center_half_extent(Vec3::ZERO, Vec3::ONE);
        }
        let n = buffer.points_per_strand() as f32;
        let roots: Vec<Vec3> = (0..buffer.strand_count())
            .map(|s| buffer.strand_points(s)[0].position_vec())
            .collect();
        let center = roots.iter().sum::<Vec3>() / roots.len() as f32;

        let mut reach = Vec3::ZERO;
        let mut max_length = 0.0f32;
        for (s, root) in roots.iter().enumerate() {
            reach = reach.max((*root - center).abs());
            max_length = max_length.max(buffer.strand(s).segment_length * n);
        }
        Aabb::from_center_half_extent(center, reach).inflated(max_length)
    }

    /// Advance every strand by `dt`. `time` drives the wind turbulence and
    /// must be monotonic across calls for coherent motion.
    pub fn step(
        &mut self,
        buffer: &mut StrandBuffer,
        config: &HairConfig,
        colliders: &[SphereCollider],
        dt: f32,
        time: f32,
    ) {
        if buffer.is_empty() {
            return;
        }

        let force = config.gravity + self.wind.sample(config, time);

        if config.self_collision {
            let region = Self::compute_bounds(buffer);
            let positions: Vec<Vec3> =
                buffer.points().iter().map(HairPoint::position_vec).collect();
            self.occupancy.rebuild_over(positions, region);
        }

        let occupancy = config.self_collision.then_some(&self.occupancy);
        buffer.par_strands_mut().for_each(|(points, strand)| {
            solve_strand(points, strand, config, colliders, occupancy, force, dt);
        });
    }
}

/// One strand, root to tip.
fn solve_strand(
    points: &mut [HairPoint],
    strand: &HairStrand,
    config: &HairConfig,
    colliders: &[SphereCollider],
    occupancy: Option<&OccupancyGrid>,
    force: Vec3,
    dt: f32,
) {
    let seg = strand.segment_length;
    let damping = config.damping.clamp(0.0, 1.0);

    // Rest frame propagated from the root, same walk that authored the
    // rest angles. rest_angles[1] is (0,0,1) so the first reconstruction
    // yields the root normal.
    let mut frame_tangent = Vec3::from(strand.tangent);
    let mut frame_bitangent = Vec3::from(strand.bitangent);
    let mut frame_normal = normalize_or(frame_bitangent.cross(frame_tangent), Vec3::Y);

    for i in 1..points.len() {
        let parent = points[i - 1].position_vec();
        let pos = points[i].position_vec();
        let prev = points[i].prev_position_vec();

        // Damped Verlet.
        let mut p = pos + (pos - prev) * (1.0 - damping) + force * dt * dt;
        points[i].prev_position = pos.into();

        // Rest direction of this segment in world space.
        let a = Vec3::from(points[i].rest_angles);
        let rest_dir = normalize_or(
            frame_tangent * a.x + frame_bitangent * a.y + frame_normal * a.z,
            frame_normal,
        );

        // Retention: pull toward the rest shape anchored at the parent.
        let retention = (points[i].retention * config.retention).clamp(0.0, 1.0);
        if retention > 0.0 {
            p = p.lerp(parent + rest_dir * seg, retention);
        }

        // Stiffness: pull toward the continuation of the previous segment.
        if i >= 2 {
            let stiffness = (points[i].stiffness * config.stiffness).clamp(0.0, 1.0);
            if stiffness > 0.0 {
                let inbound = normalize_or(parent - points[i - 2].position_vec(), rest_dir);
                p = p.lerp(parent + inbound * seg, stiffness);
            }
        }

        for collider in colliders {
            p = collider.push_out(p);
        }

        if let Some(grid) = occupancy {
            let count = grid.query(p);
            if count > 1 {
                let gradient = grid.gradient(p);
                if let Some(dir) = gradient.try_normalize() {
                    let cell = grid.cell_size().min_element();
                    let push = (REPULSION_STEP * (count - 1) as f32).min(REPULSION_MAX);
                    p -= dir * cell * push;
                }
            }
        }

        // Reprojection last: whatever the constraints did, the segment
        // keeps its rest length. Reprojecting can drag a pushed-out point
        // back into a sphere, so push-out and reprojection alternate until
        // the point satisfies both (always ending on the reprojection).
        let mut dir = normalize_or(p - parent, rest_dir);
        p = parent + dir * seg;
        for _ in 0..COLLISION_PASSES {
            if !colliders.iter().any(|c| c.contains(p)) {
                break;
            }
            for collider in colliders {
                p = collider.push_out(p);
            }
            dir = normalize_or(p - parent, rest_dir);
            p = parent + dir * seg;
        }
        points[i].position = p.into();

        // Advance the rest frame.
        frame_tangent = normalize_or(frame_tangent - rest_dir * a.x, frame_tangent);
        frame_bitangent = normalize_or(frame_bitangent - rest_dir * a.y, frame_bitangent);
        frame_normal = rest_dir;
    }
}
