//! Procedural strand generation.
//!
//! Expands the sparse guide hair set into the dense strand population by
//! barycentric interpolation across scalp triangles, with blend-angle
//! gating and deterministic per-triangle jitter.

pub mod generator;
pub mod scalp;

pub use generator::StrandGenerator;
pub use scalp::ScalpMesh;
