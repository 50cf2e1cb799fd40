//! Aggregate compositor: turns size seeds and catalog meshes into one
//! audio-reactive mesh, rebuilt from scratch every frame.

pub mod registry;
pub mod transform;

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Mat3, Mat4};
use rayon::prelude::*;
use tracing::debug;

use crate::audio::Spectrum;
use crate::config::CompositorConfig;
use crate::error::{Result, SonicGeodeError};
use crate::scene::Catalog;
use crate::types::Mesh;

pub use registry::{SubmeshRecord, SubmeshRegistry};
pub use transform::{
    CloneTransform, PALETTE, clone_count, compose_seed, file_scale, palette_color,
};

/// Owns the submesh registry and the global rotation of the aggregate.
#[derive(Debug)]
pub struct Compositor {
    registry: SubmeshRegistry,
    config: CompositorConfig,
    angle: f32,
    frame: u64,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self::with_registry(SubmeshRegistry::new(), config)
    }

    /// Compositor over an existing (possibly shared) registry.
    pub fn with_registry(registry: SubmeshRegistry, config: CompositorConfig) -> Self {
        Self {
            registry,
            config,
            angle: 0.0,
            frame: 0,
        }
    }

    pub fn registry(&self) -> &SubmeshRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Global rotation about +Y, in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Frames rebuilt so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Record `(size, source)` and return its clones composed against silence.
    pub fn register(&self, size: f32, source: Arc<Mesh>) -> Result<Mesh> {
        let mesh = compose_seed(size, &source, &Spectrum::default(), &self.config);
        self.registry.push(size, source)?;
        debug!(
            size,
            vertices = mesh.vertex_count(),
            "Submesh registered"
        );
        Ok(mesh)
    }

    /// Pick a catalog entry by hashing `size` and register its world mesh.
    pub fn register_from_catalog(&self, catalog: &Catalog, size: f32) -> Result<Mesh> {
        let entry = catalog.pick(size, 0.0).ok_or_else(|| {
            SonicGeodeError::Catalog(format!("no entry available for seed {size}"))
        })?;
        debug!(size, entry = %entry.name, "Seed picked catalog entry");
        self.register(size, Arc::new(entry.world_mesh()))
    }

    /// Compose every registered record against `spectrum`, in registration
    /// order, without touching the global rotation.
    pub fn compose(&self, spectrum: &Spectrum) -> Result<Mesh> {
        let records = self.registry.snapshot()?;
        let config = &self.config;

        let parts: Vec<Mesh> = records
            .par_iter()
            .map(|r| compose_seed(r.size, &r.source, spectrum, config))
            .collect();

        let (vertices, indices) = parts.iter().fold((0, 0), |(v, i), p| {
            (v + p.vertex_count(), i + p.index_count())
        });
        let mut aggregate = Mesh::with_capacity(vertices, indices);
        for part in &parts {
            aggregate.append(part);
        }
        Ok(aggregate)
    }

    /// Full per-frame rebuild: compose, advance the global angle by the
    /// rotation step and rotate the whole aggregate about +Y. The angle is
    /// kept in `[0, 2π)`.
    pub fn rebuild(&mut self, spectrum: &Spectrum) -> Result<Mesh> {
        let mut aggregate = self.compose(spectrum)?;

        self.angle = (self.angle + self.config.rotation_step).rem_euclid(TAU);
        self.frame += 1;
        let rotation = Mat3::from_rotation_y(self.angle);
        aggregate.transform_positions(&Mat4::from_mat3(rotation));
        aggregate.rotate_normals(&rotation);

        debug!(
            frame = self.frame,
            vertices = aggregate.vertex_count(),
            triangles = aggregate.triangle_count(),
            angle = self.angle,
            energy = spectrum.energy(),
            "Aggregate rebuilt"
        );
        Ok(aggregate)
    }
}
