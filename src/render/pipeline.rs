//! Hair compute pipelines.
//!
//! Two passes per frame: occupancy build (one thread per point, atomic
//! bin counts) then strand physics (one thread per strand). They are
//! separate compute passes so the occupancy writes are visible to the
//! physics kernel's plain reads.

use super::buffer::HairGpuBuffers;

const WORKGROUP_SIZE: u32 = 64;

pub struct HairComputePipelines {
    occupancy_pipeline: wgpu::ComputePipeline,
    physics_pipeline: wgpu::ComputePipeline,
    occupancy_bind_group: wgpu::BindGroup,
    physics_bind_group: wgpu::BindGroup,
}

impl HairComputePipelines {
    pub fn new(device: &wgpu::Device, buffers: &HairGpuBuffers) -> Self {
        let occupancy_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hair_occupancy_shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../shaders/hair_occupancy.wgsl").into(),
            ),
        });
        let physics_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hair_physics_shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../shaders/hair_physics.wgsl").into(),
            ),
        });

        let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        // Occupancy: params, points (read), grid (write).
        let occupancy_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("hair_occupancy_layout"),
                entries: &[
                    uniform_entry(0),
                    storage_entry(1, true),
                    storage_entry(2, false),
                ],
            });
        let occupancy_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hair_occupancy_bind_group"),
            layout: &occupancy_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.params_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.point_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.occupancy_buffer().as_entire_binding(),
                },
            ],
        });

        // Physics: params, points (write), strands, colliders, grid (read).
        let physics_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("hair_physics_layout"),
                entries: &[
                    uniform_entry(0),
                    storage_entry(1, false),
                    storage_entry(2, true),
                    storage_entry(3, true),
                    storage_entry(4, true),
                ],
            });
        let physics_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hair_physics_bind_group"),
            layout: &physics_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.params_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.point_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.strand_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: buffers.collider_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: buffers.occupancy_buffer().as_entire_binding(),
                },
            ],
        });

        let occupancy_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("hair_occupancy_pipeline_layout"),
                bind_group_layouts: &[&occupancy_layout],
                immediate_size: 0,
            });
        let occupancy_pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("hair_occupancy_pipeline"),
                layout: Some(&occupancy_pipeline_layout),
                module: &occupancy_shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            });

        let physics_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("hair_physics_pipeline_layout"),
                bind_group_layouts: &[&physics_layout],
                immediate_size: 0,
            });
        let physics_pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("hair_physics_pipeline"),
                layout: Some(&physics_pipeline_layout),
                module: &physics_shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            });

        Self {
            occupancy_pipeline,
            physics_pipeline,
            occupancy_bind_group,
            physics_bind_group,
        }
    }

    /// Record one frame of hair physics. Params and colliders must already
    /// be uploaded. When `self_collision` is false the occupancy pass is
    /// skipped entirely.
    pub fn dispatch(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        buffers: &HairGpuBuffers,
        self_collision: bool,
    ) {
        if self_collision {
            encoder.clear_buffer(buffers.occupancy_buffer(), 0, None);

            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("hair_occupancy_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.occupancy_pipeline);
            pass.set_bind_group(0, &self.occupancy_bind_group, &[]);
            pass.dispatch_workgroups(
                buffers.point_count().div_ceil(WORKGROUP_SIZE),
                1,
                1,
            );
        }

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("hair_physics_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.physics_pipeline);
        pass.set_bind_group(0, &self.physics_bind_group, &[]);
        pass.dispatch_workgroups(
            buffers.strand_count().div_ceil(WORKGROUP_SIZE),
            1,
            1,
        );
    }
}
