use std::path::Path;

use serde::Serialize;

use crate::config::{CatalogConfig, CompositorConfig, SpectrumConfig};
use crate::error::{Result, SonicGeodeError};

/// Statistics of one rebuilt frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub vertices: usize,
    pub triangles: usize,
    /// Mean magnitude of the spectrum the frame was built from.
    pub energy: f32,
    pub rebuild_ms: f64,
}

/// Everything a run did, echoed with the configuration that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generator: String,
    pub seeds: Vec<f32>,
    pub catalog_entries: usize,
    pub compositor: CompositorConfig,
    pub spectrum: SpectrumConfig,
    pub catalog: CatalogConfig,
    pub frames: Vec<FrameStats>,
    pub spectra_received: u64,
    pub total_ms: f64,
}

impl RunReport {
    pub fn new(
        seeds: Vec<f32>,
        catalog_entries: usize,
        compositor: CompositorConfig,
        spectrum: SpectrumConfig,
        catalog: CatalogConfig,
    ) -> Self {
        Self {
            generator: format!("sonic-geode {}", env!("CARGO_PKG_VERSION")),
            seeds,
            catalog_entries,
            compositor,
            spectrum,
            catalog,
            frames: Vec::new(),
            spectra_received: 0,
            total_ms: 0.0,
        }
    }

    pub fn record(&mut self, stats: FrameStats) {
        self.frames.push(stats);
    }

    /// Largest per-frame rebuild time, if any frame ran.
    pub fn peak_rebuild_ms(&self) -> Option<f64> {
        self.frames.iter().map(|f| f.rebuild_ms).reduce(f64::max)
    }

    pub fn mean_rebuild_ms(&self) -> Option<f64> {
        if self.frames.is_empty() {
            return None;
        }
        let sum: f64 = self.frames.iter().map(|f| f.rebuild_ms).sum();
        Some(sum / self.frames.len() as f64)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SonicGeodeError::Output(format!("report serialization: {e}")))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
