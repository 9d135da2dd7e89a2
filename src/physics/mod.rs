//! Strand physics.
//!
//! The per-frame integrator and its supporting pieces: sphere colliders,
//! wind fields, the self-collision occupancy grid, and the GPU params
//! uniform. `solver` is the authoritative CPU implementation of the
//! kernel; `crate::render` mirrors it in WGSL.

pub mod collider;
pub mod occupancy;
pub mod params;
pub mod solver;
pub mod wind;

pub use collider::SphereCollider;
pub use occupancy::OccupancyGrid;
pub use params::PhysicsParams;
pub use solver::PhysicsSolver;
pub use wind::WindSampler;
