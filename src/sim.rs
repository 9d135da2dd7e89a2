//! Simulation orchestrator.
//!
//! `HairSimulation` owns one simulated hair object end to end: the scalp
//! mesh, the guide hair set, the strand generator, the CPU solver, and
//! the strand buffer everything flows through. The host drives it with a
//! small pull-based surface: reset, (incremental) rebuild, brush, step,
//! then read the buffers out for upload.

use glam::Mat4;

use crate::config::HairConfig;
use crate::core::Result;
use crate::math::Aabb;
use crate::generation::{ScalpMesh, StrandGenerator};
use crate::guide::{
    apply_move_brush, apply_property_brush, GuideHairSet, MoveBrush, PropertyBrush,
    StrokeSample,
};
use crate::physics::{PhysicsSolver, SphereCollider};
use crate::strand::{HairPoint, HairStrand, StrandBuffer};

const DEFAULT_SEED: u32 = 0x6841_6972; // arbitrary, fixed for reproducibility

pub struct HairSimulation {
    config: HairConfig,
    scalp: ScalpMesh,
    guides: GuideHairSet,
    generator: StrandGenerator,
    solver: PhysicsSolver,
    buffer: StrandBuffer,
    colliders: Vec<SphereCollider>,
    time: f32,
}

impl HairSimulation {
    pub fn new(config: HairConfig) -> Result<Self> {
        Self::with_seed(config, DEFAULT_SEED)
    }

    /// Like [`new`](Self::new) with an explicit seed for the generator's
    /// random streams and the wind turbulence.
    pub fn with_seed(config: HairConfig, seed: u32) -> Result<Self> {
        config.validate()?;
        let buffer = StrandBuffer::new(config.points_per_strand);
        Ok(Self {
            config,
            scalp: ScalpMesh::default(),
            guides: GuideHairSet::default(),
            generator: StrandGenerator::new(seed),
            solver: PhysicsSolver::new(seed),
            buffer,
            colliders: Vec::new(),
            time: 0.0,
        })
    }

    pub fn config(&self) -> &HairConfig {
        &self.config
    }

    /// Swap in a new configuration. Generation knobs take effect on the
    /// next rebuild; physics knobs on the next step.
    pub fn set_config(&mut self, config: HairConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Install a scalp mesh and regenerate the guide set from its
    /// vertices, discarding all guide edits. Strands are not rebuilt
    /// until [`rebuild`](Self::rebuild) runs.
    pub fn reset(&mut self, scalp: ScalpMesh) -> Result<()> {
        self.guides = GuideHairSet::from_scalp(&scalp, &self.config)?;
        self.scalp = scalp;
        self.buffer.reset(self.config.points_per_strand);
        self.time = 0.0;
        Ok(())
    }

    /// Start a new rebuild pass: drop the current strands and reset the
    /// generation cursor. Follow with [`rebuild_step`](Self::rebuild_step)
    /// or use [`rebuild`](Self::rebuild) to run to completion.
    ///
    /// A rebuild that cannot emit anything — bad config, guides that no
    /// longer match the configured point count, or an empty scalp — leaves
    /// the previous strands in place rather than clearing to nothing.
    pub fn begin_rebuild(&mut self) -> Result<()> {
        self.generator.start_rebuild(&self.config)?;
        self.guides.ensure_point_count(self.config.points_per_strand)?;
        if self.scalp.triangle_count() > 0 && !self.guides.is_empty() {
            self.buffer.reset(self.config.points_per_strand);
        }
        Ok(())
    }

    /// Process up to `max_triangles` more scalp triangles. Returns the
    /// strands emitted; zero once generation is complete.
    pub fn rebuild_step(&mut self, max_triangles: usize) -> Result<usize> {
        self.generator.generate_slice(
            &self.scalp,
            &self.guides,
            &self.config,
            &mut self.buffer,
            max_triangles,
        )
    }

    /// Full rebuild in one call.
    pub fn rebuild(&mut self) -> Result<usize> {
        self.begin_rebuild()?;
        self.generator
            .generate_all(&self.scalp, &self.guides, &self.config, &mut self.buffer)
    }

    /// Fraction of the scalp processed by the current rebuild pass.
    pub fn rebuild_progress(&self) -> f32 {
        self.generator.progress(&self.scalp)
    }

    pub fn is_rebuild_complete(&self) -> bool {
        self.generator.is_complete(&self.scalp)
    }

    /// Replace this frame's collider list.
    pub fn set_colliders(&mut self, colliders: Vec<SphereCollider>) {
        self.colliders = colliders;
    }

    pub fn colliders(&self) -> &[SphereCollider] {
        &self.colliders
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.solver.step(
            &mut self.buffer,
            &self.config,
            &self.colliders,
            dt,
            self.time,
        );
        self.time += dt;
    }

    /// Re-anchor every strand root through a root-space transform (the
    /// scalp moved or deformed since the strands were generated). Only
    /// the roots move; the solver drags the rest of each strand along on
    /// subsequent steps.
    pub fn retarget_roots(&mut self, transform: Mat4) {
        for s in 0..self.buffer.strand_count() {
            let root = self.buffer.strand_points(s)[0].position_vec();
            self.buffer
                .anchor_root(s, transform.transform_point3(root));
        }
    }

    /// Apply one move-brush sample to the guide hairs. Returns true if
    /// any guide changed; the host should rebuild before the next draw.
    pub fn brush_move(&mut self, stroke: &StrokeSample, brush: &MoveBrush) -> bool {
        apply_move_brush(&mut self.guides, stroke, brush, &self.colliders)
    }

    /// Apply one property-brush sample to the guide hairs.
    pub fn brush_property(&mut self, stroke: &StrokeSample, brush: &PropertyBrush) -> bool {
        apply_property_brush(&mut self.guides, stroke, brush)
    }

    /// Simulation region for culling and the self-collision grid.
    pub fn bounds(&self) -> Aabb {
        PhysicsSolver::compute_bounds(&self.buffer)
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn scalp(&self) -> &ScalpMesh {
        &self.scalp
    }

    pub fn guides(&self) -> &GuideHairSet {
        &self.guides
    }

    pub fn guides_mut(&mut self) -> &mut GuideHairSet {
        &mut self.guides
    }

    pub fn buffer(&self) -> &StrandBuffer {
        &self.buffer
    }

    pub fn points(&self) -> &[HairPoint] {
        self.buffer.points()
    }

    pub fn strands(&self) -> &[HairStrand] {
        self.buffer.strands()
    }
}
