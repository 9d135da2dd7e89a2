//! GPU-resident hair buffers.
//!
//! One set per simulated hair object: points and strands (read-write for
//! the physics kernel, read-only for the renderer), sphere colliders, the
//! occupancy grid, and the per-frame params uniform. Buffers are sized at
//! creation for the rebuilt strand set; a rebuild that changes counts
//! recreates the set.

use wgpu::util::DeviceExt;

use crate::core::error::Error;
use crate::core::Result;
use crate::physics::collider::GpuSphereCollider;
use crate::physics::occupancy::GRID_RES;
use crate::physics::{PhysicsParams, SphereCollider};
use crate::strand::StrandBuffer;

pub struct HairGpuBuffers {
    point_buffer: wgpu::Buffer,
    strand_buffer: wgpu::Buffer,
    collider_buffer: wgpu::Buffer,
    occupancy_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,
    point_count: u32,
    strand_count: u32,
    collider_capacity: u32,
}

impl HairGpuBuffers {
    /// Allocate and fill from a rebuilt strand buffer.
    ///
    /// Fails with [`Error::ResourceExhaustion`] on an empty buffer: wgpu
    /// rejects zero-sized storage bindings, and there is nothing to
    /// simulate anyway.
    pub fn new(
        device: &wgpu::Device,
        strands: &StrandBuffer,
        max_colliders: u32,
    ) -> Result<Self> {
        if strands.is_empty() {
            log::warn!("skipping GPU buffer allocation for empty strand buffer");
            return Err(Error::ResourceExhaustion(
                "no strands to allocate GPU buffers for".into(),
            ));
        }

        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hair_points"),
            contents: bytemuck::cast_slice(strands.points()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let strand_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hair_strands"),
            contents: bytemuck::cast_slice(strands.strands()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let collider_capacity = max_colliders.max(1);
        let collider_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hair_colliders"),
            size: (collider_capacity as u64)
                * std::mem::size_of::<GpuSphereCollider>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let occupancy_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hair_occupancy"),
            size: (GRID_RES as u64).pow(3) * std::mem::size_of::<u32>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hair_physics_params"),
            size: std::mem::size_of::<PhysicsParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!(
            "allocated hair GPU buffers: {} strands, {} points",
            strands.strand_count(),
            strands.point_count()
        );

        Ok(Self {
            point_buffer,
            strand_buffer,
            collider_buffer,
            occupancy_buffer,
            params_buffer,
            point_count: strands.point_count() as u32,
            strand_count: strands.strand_count() as u32,
            collider_capacity,
        })
    }

    /// Re-upload the full point array (after brushing or a CPU-side step).
    pub fn upload_points(&self, queue: &wgpu::Queue, strands: &StrandBuffer) {
        queue.write_buffer(
            &self.point_buffer,
            0,
            bytemuck::cast_slice(strands.points()),
        );
    }

    /// Upload this frame's colliders, truncating to capacity. Returns the
    /// count actually uploaded for the params uniform.
    pub fn upload_colliders(&self, queue: &wgpu::Queue, colliders: &[SphereCollider]) -> u32 {
        let count = colliders.len().min(self.collider_capacity as usize);
        if count < colliders.len() {
            log::warn!(
                "collider list truncated to {} of {}",
                count,
                colliders.len()
            );
        }
        if count > 0 {
            let gpu: Vec<GpuSphereCollider> =
                colliders[..count].iter().map(GpuSphereCollider::from).collect();
            queue.write_buffer(&self.collider_buffer, 0, bytemuck::cast_slice(&gpu));
        }
        count as u32
    }

    pub fn upload_params(&self, queue: &wgpu::Queue, params: &PhysicsParams) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));
    }

    pub fn point_buffer(&self) -> &wgpu::Buffer {
        &self.point_buffer
    }

    pub fn strand_buffer(&self) -> &wgpu::Buffer {
        &self.strand_buffer
    }

    pub fn collider_buffer(&self) -> &wgpu::Buffer {
        &self.collider_buffer
    }

    pub fn occupancy_buffer(&self) -> &wgpu::Buffer {
        &self.occupancy_buffer
    }

    pub fn params_buffer(&self) -> &wgpu::Buffer {
        &self.params_buffer
    }

    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    pub fn strand_count(&self) -> u32 {
        self.strand_count
    }
}
