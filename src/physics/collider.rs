//! Sphere colliders.
//!
//! The host refreshes the collider list every frame; nonuniform scale is
//! resolved to a single effective radius before it reaches the solver.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Margin added to every collider radius so strands rest slightly off the
/// surface instead of z-fighting through it.
pub const COLLIDER_MARGIN: f32 = 0.01;

/// Deterministic push direction when a point sits exactly on a collider
/// center and no radial direction exists.
pub const DEGENERATE_PUSH_DIR: Vec3 = Vec3::Y;

/// One sphere collider in world space. `radius` already includes the
/// margin and any scale resolution.
#[derive(Clone, Copy, Debug)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereCollider {
    /// Collider from a world-space center and raw radius.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius + COLLIDER_MARGIN,
        }
    }

    /// Collider from a possibly nonuniformly scaled transform: the
    /// largest scale axis wins.
    pub fn from_scaled(center: Vec3, radius: f32, scale: Vec3) -> Self {
        let max_scale = scale.x.max(scale.y).max(scale.z);
        Self::new(center, radius * max_scale)
    }

    /// Whether the point is strictly inside the sphere (margin included).
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() < self.radius * self.radius
    }

    /// Push a point inside the sphere to its surface along the outward
    /// radial direction. Points outside are returned unchanged.
    pub fn push_out(&self, point: Vec3) -> Vec3 {
        let offset = point - self.center;
        let dist = offset.length();
        if dist >= self.radius {
            return point;
        }
        let dir = offset.try_normalize().unwrap_or(DEGENERATE_PUSH_DIR);
        self.center + dir * self.radius
    }
}

/// GPU-side collider data (16 bytes). Must match `SphereCollider` in
/// hair_physics.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuSphereCollider {
    pub center: [f32; 3],
    pub radius: f32,
}

impl From<&SphereCollider> for GpuSphereCollider {
    fn from(c: &SphereCollider) -> Self {
        Self {
            center: c.center.into(),
            radius: c.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_out_inside() {
        let c = SphereCollider::new(Vec3::ZERO, 0.1);
        let pushed = c.push_out(Vec3::new(0.05, 0.0, 0.0));
        assert!((pushed.length() - (0.1 + COLLIDER_MARGIN)).abs() < 1e-6);
        assert!(pushed.x > 0.0);
    }

    #[test]
    fn test_contains() {
        let c = SphereCollider::new(Vec3::ZERO, 0.1);
        assert!(c.contains(Vec3::new(0.05, 0.0, 0.0)));
        assert!(!c.contains(Vec3::new(0.2, 0.0, 0.0)));
    }

    #[test]
    fn test_push_out_outside_unchanged() {
        let c = SphereCollider::new(Vec3::ZERO, 0.1);
        let p = Vec3::new(0.5, 0.0, 0.0);
        assert_eq!(c.push_out(p), p);
    }

    #[test]
    fn test_push_out_degenerate_center() {
        // Point exactly at the center: pushed along the deterministic
        // fallback direction to radius + margin.
        let c = SphereCollider::new(Vec3::splat(1.0), 0.1);
        let pushed = c.push_out(Vec3::splat(1.0));
        let expected = Vec3::splat(1.0) + DEGENERATE_PUSH_DIR * (0.1 + COLLIDER_MARGIN);
        assert!((pushed - expected).length() < 1e-6);
    }

    #[test]
    fn test_from_scaled_takes_max_axis() {
        let c = SphereCollider::from_scaled(Vec3::ZERO, 0.1, Vec3::new(1.0, 3.0, 2.0));
        assert!((c.radius - (0.3 + COLLIDER_MARGIN)).abs() < 1e-6);
    }

    #[test]
    fn test_gpu_collider_size() {
        assert_eq!(std::mem::size_of::<GpuSphereCollider>(), 16);
    }
}
