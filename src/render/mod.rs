//! GPU mirror of the simulation.
//!
//! Storage buffers for the point/strand arrays plus the two compute
//! pipelines (occupancy build, strand physics) that run the same step the
//! CPU solver implements. The host uploads once per frame and dispatches;
//! results stay GPU-resident for the renderer.

pub mod buffer;
pub mod pipeline;

pub use buffer::HairGpuBuffers;
pub use pipeline::HairComputePipelines;
