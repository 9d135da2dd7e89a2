//! A single guide hair: authored control points plus paintable per-point
//! properties. Guide hairs are authoring-time data only — they feed the
//! generator and are never simulated.

use glam::Vec3;

use crate::physics::collider::SphereCollider;
use crate::strand::normalize_or;

/// Authored control strand anchored to the scalp surface.
#[derive(Clone, Debug)]
pub struct GuideHair {
    /// Scalp normal at the root, captured at creation.
    pub root_normal: Vec3,
    /// Control point positions in world space. `points[0]` is the root.
    pub points: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    pub thickness: Vec<f32>,
    pub stiffness: Vec<f32>,
    pub retention: Vec<f32>,
    /// Total authored length.
    pub length: f32,
    /// Fraction of length randomized away for strands blended from this
    /// guide (0 = full length always).
    pub length_variation: f32,
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl GuideHair {
    /// Point count of this guide.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Rest length of one segment.
    pub fn segment_length(&self) -> f32 {
        self.length / self.points.len() as f32
    }

    /// Direction of the root segment, used for blend-angle gating.
    pub fn root_direction(&self) -> Vec3 {
        normalize_or(self.points[1] - self.points[0], self.root_normal)
    }

    /// Rescale segment spacing to a new total length, preserving the
    /// direction of every existing segment. A pure reshape.
    pub fn change_length(&mut self, new_length: f32) {
        let seg = new_length / self.points.len() as f32;
        let offsets: Vec<Vec3> = (1..self.points.len())
            .map(|i| self.points[i] - self.points[i - 1])
            .collect();
        for i in 1..self.points.len() {
            let dir = normalize_or(offsets[i - 1], self.root_normal);
            self.points[i] = self.points[i - 1] + dir * seg;
        }
        self.length = new_length;
    }

    /// Push any control point inside a collider out to its surface along
    /// the outward radial direction.
    pub fn collide_against_spheres(&mut self, spheres: &[SphereCollider]) {
        for sphere in spheres {
            for point in &mut self.points {
                *point = sphere.push_out(*point);
            }
        }
    }

    /// Two-pass constraint solve producing uniform segment lengths
    /// anchored at `pivot`: walk backward from the pivot to index 1
    /// re-anchoring the brushed region toward the root, then forward from
    /// index 1 to the tip. The backward pass must run first so the forward
    /// pass propagates the change outward without re-disturbing it.
    pub fn restretch_from(&mut self, pivot: usize) {
        let seg = self.segment_length();

        for c in (2..=pivot.min(self.points.len() - 1)).rev() {
            let dir = normalize_or(self.points[c - 1] - self.points[c], self.root_normal);
            self.points[c - 1] = self.points[c] + dir * seg;
        }

        for c in 1..self.points.len() {
            let dir = normalize_or(self.points[c - 1] - self.points[c], -self.root_normal);
            self.points[c] = self.points[c - 1] - dir * seg;
        }
    }

    /// Relax each interior point toward the straight continuation of its
    /// two predecessors. Nearly-straight sections barely move; sharp bends
    /// relax more (the bend-dependent factor), both scaled by `stiffness`.
    pub fn straighten(&mut self, stiffness: f32) {
        let seg = self.segment_length();

        for c in 2..self.points.len() {
            let diff = self.points[c - 2] - self.points[c - 1];
            let diff2 = self.points[c - 1] - self.points[c];
            if diff.length_squared() == 0.0 || diff2.length_squared() == 0.0 {
                continue;
            }

            let straight = self.points[c - 1] - diff.normalize() * seg;
            let bend = 1.0 - diff.normalize().dot(diff2.normalize()).max(0.0);
            let t = stiffness * lerp(bend, 1.0, stiffness);
            self.points[c] = self.points[c].lerp(straight, t.clamp(0.0, 1.0));
        }
    }
}
