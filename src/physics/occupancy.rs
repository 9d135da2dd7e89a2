//! Self-collision occupancy grid.
//!
//! A dense 64³ grid of point counts over the strand bounding region,
//! rebuilt from scratch every frame before the collision pass. Stale
//! occupancy would repel against positions that no longer exist after
//! fast motion, so nothing persists across frames.

use glam::{UVec3, Vec3};

use crate::math::Aabb;

/// Grid resolution per axis. Matches `GRID_RES` in the WGSL kernels.
pub const GRID_RES: u32 = 64;

/// Dense voxel occupancy counts over an axis-aligned region.
pub struct OccupancyGrid {
    cells: Vec<u32>,
    center: Vec3,
    half_extents: Vec3,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![0; (GRID_RES * GRID_RES * GRID_RES) as usize],
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// World-space size of one cell.
    pub fn cell_size(&self) -> Vec3 {
        self.half_extents * 2.0 / GRID_RES as f32
    }

    /// Cell coordinates for a world position, clamped to the grid.
    pub fn cell_of(&self, position: Vec3) -> UVec3 {
        let norm = (position - self.center + self.half_extents)
            / (self.half_extents * 2.0).max(Vec3::splat(f32::EPSILON));
        let scaled = norm * GRID_RES as f32;
        UVec3::new(
            (scaled.x as i32).clamp(0, GRID_RES as i32 - 1) as u32,
            (scaled.y as i32).clamp(0, GRID_RES as i32 - 1) as u32,
            (scaled.z as i32).clamp(0, GRID_RES as i32 - 1) as u32,
        )
    }

    fn index(cell: UVec3) -> usize {
        (cell.x + cell.y * GRID_RES + cell.z * GRID_RES * GRID_RES) as usize
    }

    /// Clear and refill the grid from point positions over the given
    /// region. O(points); called once per frame when self-collision is on.
    pub fn rebuild(
        &mut self,
        points: impl IntoIterator<Item = Vec3>,
        center: Vec3,
        half_extents: Vec3,
    ) {
        self.cells.fill(0);
        self.center = center;
        self.half_extents = half_extents.max(Vec3::splat(f32::EPSILON));
        for p in points {
            let idx = Self::index(self.cell_of(p));
            self.cells[idx] += 1;
        }
    }

    /// Rebuild over the bounds of an AABB.
    pub fn rebuild_over(&mut self, points: impl IntoIterator<Item = Vec3>, region: Aabb) {
        self.rebuild(points, region.center(), region.half_extent());
    }

    /// Occupancy count at a world position (clamped to grid bounds).
    pub fn query(&self, position: Vec3) -> u32 {
        self.cells[Self::index(self.cell_of(position))]
    }

    /// Central-difference density gradient at a world position. Points
    /// should be pushed opposite this to leave crowded regions.
    pub fn gradient(&self, position: Vec3) -> Vec3 {
        let cell = self.cell_of(position);
        let sample = |x: i32, y: i32, z: i32| -> f32 {
            let c = UVec3::new(
                (cell.x as i32 + x).clamp(0, GRID_RES as i32 - 1) as u32,
                (cell.y as i32 + y).clamp(0, GRID_RES as i32 - 1) as u32,
                (cell.z as i32 + z).clamp(0, GRID_RES as i32 - 1) as u32,
            );
            self.cells[Self::index(c)] as f32
        };
        Vec3::new(
            sample(1, 0, 0) - sample(-1, 0, 0),
            sample(0, 1, 0) - sample(0, -1, 0),
            sample(0, 0, 1) - sample(0, 0, -1),
        ) * 0.5
    }

    /// Raw cell data for GPU upload comparisons and debugging.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_counts_points() {
        let mut grid = OccupancyGrid::new();
        let p = Vec3::new(0.1, 0.2, 0.3);
        grid.rebuild([p, p, Vec3::new(-0.4, 0.0, 0.0)], Vec3::ZERO, Vec3::ONE);
        assert_eq!(grid.query(p), 2);
        assert_eq!(grid.query(Vec3::new(-0.4, 0.0, 0.0)), 1);
    }

    #[test]
    fn test_rebuild_discards_previous_frame() {
        let mut grid = OccupancyGrid::new();
        let p = Vec3::splat(0.2);
        grid.rebuild([p], Vec3::ZERO, Vec3::ONE);
        assert_eq!(grid.query(p), 1);
        grid.rebuild(std::iter::empty(), Vec3::ZERO, Vec3::ONE);
        assert_eq!(grid.query(p), 0);
    }

    #[test]
    fn test_query_clamps_outside_positions() {
        let mut grid = OccupancyGrid::new();
        grid.rebuild([Vec3::splat(10.0)], Vec3::ZERO, Vec3::ONE);
        // The far-outside point lands in the corner cell; querying any
        // position past that corner maps to the same cell.
        assert_eq!(grid.query(Vec3::splat(99.0)), 1);
    }

    #[test]
    fn test_gradient_points_toward_density() {
        let mut grid = OccupancyGrid::new();
        let cell = grid.cell_size();
        let dense = Vec3::ZERO;
        let probe = dense - Vec3::new(cell.x, 0.0, 0.0);
        grid.rebuild([dense; 8], Vec3::ZERO, Vec3::ONE);

        let g = grid.gradient(probe);
        assert!(g.x > 0.0, "gradient should point toward the dense cell");
    }

    #[test]
    fn test_empty_grid_zero_gradient() {
        let grid = OccupancyGrid::new();
        assert_eq!(grid.gradient(Vec3::ZERO), Vec3::ZERO);
    }
}
