//! Hairsim - strand-based hair simulation core
//!
//! Generates hair strands procedurally over a scalp mesh from a sparse set
//! of authored guide hairs, then evolves them each frame with a strand
//! physics kernel (gravity, wind, damping, retention and stiffness springs,
//! sphere collision, voxel-grid self-collision). The renderer consumes the
//! resulting point/strand buffers read-only.

pub mod core;
pub mod math;
pub mod config;
pub mod strand;
pub mod guide;
pub mod generation;
pub mod physics;
pub mod render;
pub mod sim;

pub use config::HairConfig;
pub use sim::HairSimulation;
