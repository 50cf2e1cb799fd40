use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel;
use tracing::{debug, info, warn};

use crate::audio::{Spectrum, SyntheticSpectrum, spectrum_channel};
use crate::compositor::Compositor;
use crate::config::PipelineConfig;
use crate::error::{Result, SonicGeodeError};
use crate::export::{FrameStats, RunReport, write_glb, write_glb_compressed};
use crate::scene::Catalog;
use crate::types::{Material, Mesh};

/// File name of the exported final frame.
pub const GLB_FILE: &str = "final.glb";
/// File name of the run report.
pub const REPORT_FILE: &str = "report.json";
/// How long a frame waits for its spectrum before reusing the previous one.
const FRAME_TIMEOUT: Duration = Duration::from_secs(1);

/// Summary of a completed pipeline run.
#[derive(Debug)]
pub struct ProcessingResult {
    pub frames: u64,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Path of the written GLB, `None` for dry runs.
    pub glb: Option<PathBuf>,
    pub duration: Duration,
}

/// Pipeline orchestrator: catalog, seeds, frames, export.
pub struct Pipeline;

impl Pipeline {
    pub fn run(config: &PipelineConfig) -> Result<ProcessingResult> {
        let start = Instant::now();

        info!(
            output = %config.output.display(),
            frames = config.frames,
            seeds = config.seeds.len(),
            "Starting pipeline"
        );
        Self::check(config)?;

        info!("Stage 1/4: Catalog");
        let catalog = Catalog::assemble(&config.catalog);
        if catalog.is_empty() {
            return Err(SonicGeodeError::Catalog("catalog assembled no entries".into()));
        }

        if config.dry_run {
            info!("--dry-run: catalog assembled, nothing rendered");
            print_catalog_summary(&catalog, config);
            return Ok(ProcessingResult {
                frames: 0,
                vertex_count: 0,
                triangle_count: 0,
                glb: None,
                duration: start.elapsed(),
            });
        }

        info!("Stage 2/4: Seeds");
        let compositor = Self::register_seeds(config, &catalog)?;

        let mut report = RunReport::new(
            config.seeds.clone(),
            catalog.len(),
            config.compositor.clone(),
            config.spectrum.clone(),
            config.catalog.clone(),
        );

        info!("Stage 3/4: Frames");
        let aggregate = Self::run_frames(config, compositor, &mut report)?;

        info!("Stage 4/4: Export");
        aggregate.validate()?;
        let glb = Self::export(config, &aggregate, &mut report, start)?;

        let duration = start.elapsed();
        print_frame_summary(&report);
        info!(
            frames = report.frames.len(),
            vertices = aggregate.vertex_count(),
            triangles = aggregate.triangle_count(),
            elapsed = ?duration,
            "Pipeline complete"
        );

        Ok(ProcessingResult {
            frames: report.frames.len() as u64,
            vertex_count: aggregate.vertex_count(),
            triangle_count: aggregate.triangle_count(),
            glb: Some(glb),
            duration,
        })
    }

    fn check(config: &PipelineConfig) -> Result<()> {
        if config.seeds.is_empty() {
            return Err(SonicGeodeError::Validation("no size seeds given".into()));
        }
        if let Some(bad) = config.seeds.iter().find(|s| !s.is_finite()) {
            return Err(SonicGeodeError::Validation(format!("seed {bad} is not finite")));
        }
        if !config.compositor.audio_gain.is_finite() || !config.compositor.rotation_step.is_finite() {
            return Err(SonicGeodeError::Validation(
                "audio gain and rotation step must be finite".into(),
            ));
        }
        if config.spectrum.bins == 0 {
            warn!("Spectrum has no bins, clones will not react to audio");
        }
        Ok(())
    }

    fn register_seeds(config: &PipelineConfig, catalog: &Catalog) -> Result<Compositor> {
        let compositor = Compositor::new(config.compositor.clone());
        for &size in &config.seeds {
            let mesh = compositor.register_from_catalog(catalog, size)?;
            info!(
                size,
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                "Seed registered"
            );
        }
        Ok(compositor)
    }

    /// Rebuild `config.frames` frames while a producer thread publishes
    /// synthetic spectra, one per frame tick. Returns the last frame, or the
    /// silent aggregate when no frame ran.
    fn run_frames(
        config: &PipelineConfig,
        mut compositor: Compositor,
        report: &mut RunReport,
    ) -> Result<Mesh> {
        if config.frames == 0 {
            return compositor.compose(&Spectrum::default());
        }

        let bins = config.spectrum.bins;
        let frames = config.frames as usize;
        let (publisher, mut feed) = spectrum_channel(config.spectrum.channel_capacity, bins);
        let (tick_tx, tick_rx) = channel::bounded::<()>(1);

        let aggregate = thread::scope(|scope| -> Result<Mesh> {
            scope.spawn(move || {
                let mut published = 0usize;
                for spectrum in SyntheticSpectrum::new(bins).take(frames) {
                    // Hung-up ticks mean the render loop has stopped
                    if tick_rx.recv().is_err() {
                        break;
                    }
                    if publisher.publish(spectrum) {
                        published += 1;
                    }
                }
                debug!(published, "Synthetic spectrum producer finished");
            });

            let mut last = Mesh::default();
            for _ in 0..frames {
                if tick_tx.send(()).is_err() {
                    warn!("Spectrum producer gone, reusing last snapshot");
                }
                let spectrum = feed.wait_latest(FRAME_TIMEOUT).clone();
                let frame_start = Instant::now();
                last = compositor.rebuild(&spectrum)?;
                report.record(FrameStats {
                    frame: compositor.frame(),
                    vertices: last.vertex_count(),
                    triangles: last.triangle_count(),
                    energy: spectrum.energy(),
                    rebuild_ms: frame_start.elapsed().as_secs_f64() * 1e3,
                });
            }
            drop(tick_tx);
            Ok(last)
        })?;

        feed.latest();
        report.spectra_received = feed.received();
        Ok(aggregate)
    }

    fn export(
        config: &PipelineConfig,
        aggregate: &Mesh,
        report: &mut RunReport,
        start: Instant,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&config.output)?;

        // White base colour so the per-clone vertex colours show unchanged
        let material = Material::default();
        let bytes = if config.compress {
            write_glb_compressed(aggregate, Some(&material))?
        } else {
            write_glb(aggregate, Some(&material))?
        };
        let glb_path = config.output.join(GLB_FILE);
        std::fs::write(&glb_path, &bytes)?;
        info!(path = %glb_path.display(), bytes = bytes.len(), "GLB written");

        if config.report {
            report.total_ms = start.elapsed().as_secs_f64() * 1e3;
            let report_path = config.output.join(REPORT_FILE);
            report.write(&report_path)?;
            info!(path = %report_path.display(), "Report written");
        }

        Ok(glb_path)
    }
}

/// Print the assembled catalog and the entry each seed would pick.
fn print_catalog_summary(catalog: &Catalog, config: &PipelineConfig) {
    println!("=== Catalog ===");
    for (i, entry) in catalog.iter().enumerate() {
        println!(
            "  {:>2} {:<18} {:>6} verts {:>6} tris",
            i,
            entry.name,
            entry.shape.mesh.vertex_count(),
            entry.shape.mesh.triangle_count()
        );
    }
    println!("  Total vertices: {}", catalog.total_vertices());
    println!();
    println!("=== Seeds ===");
    for &size in &config.seeds {
        match catalog.pick(size, 0.0) {
            Some(entry) => println!("  {size:>12} -> {}", entry.name),
            None => println!("  {size:>12} -> (none)"),
        }
    }
}

/// Print per-run frame statistics.
fn print_frame_summary(report: &RunReport) {
    println!("=== Frames ===");
    println!("  Frames:           {}", report.frames.len());
    println!("  Spectra received: {}", report.spectra_received);
    if let Some(last) = report.frames.last() {
        println!("  Vertices:         {}", last.vertices);
        println!("  Triangles:        {}", last.triangles);
    }
    if let (Some(mean), Some(peak)) = (report.mean_rebuild_ms(), report.peak_rebuild_ms()) {
        println!("  Rebuild:          {mean:.2} ms mean, {peak:.2} ms peak");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn config(output: PathBuf) -> PipelineConfig {
        PipelineConfig {
            output,
            frames: 3,
            seeds: vec![1_502.0, 150_000.0],
            catalog: CatalogConfig {
                include_creatures: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn empty_seeds_rejected() {
        let mut cfg = config(PathBuf::from("unused"));
        cfg.seeds.clear();
        let err = Pipeline::run(&cfg).unwrap_err();
        assert!(matches!(err, SonicGeodeError::Validation(_)));
    }

    #[test]
    fn non_finite_seed_rejected() {
        let mut cfg = config(PathBuf::from("unused"));
        cfg.seeds.push(f32::NAN);
        assert!(Pipeline::run(&cfg).is_err());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut cfg = config(out.clone());
        cfg.dry_run = true;

        let result = Pipeline::run(&cfg).unwrap();
        assert_eq!(result.frames, 0);
        assert!(result.glb.is_none());
        assert!(!out.exists());
    }

    #[test]
    fn run_writes_glb_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path().to_path_buf());

        let result = Pipeline::run(&cfg).unwrap();
        assert_eq!(result.frames, 3);
        assert!(result.vertex_count > 0);
        assert!(dir.path().join(GLB_FILE).exists());
        assert!(dir.path().join(REPORT_FILE).exists());
    }

    #[test]
    fn every_frame_gets_a_fresh_spectrum() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path().to_path_buf());
        cfg.frames = 40;
        cfg.seeds = vec![1_502.0];

        Pipeline::run(&cfg).unwrap();
        let json = std::fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["spectra_received"], 40);

        let frames = report["frames"].as_array().unwrap();
        let energies: Vec<f32> = frames
            .iter()
            .map(|f| f["energy"].as_f64().unwrap() as f32)
            .collect();
        let expected: Vec<f32> = SyntheticSpectrum::new(cfg.spectrum.bins)
            .take(40)
            .map(|s| s.energy())
            .collect();
        assert_eq!(energies, expected);
        assert!(energies.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn zero_frames_exports_silent_aggregate() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path().to_path_buf());
        cfg.frames = 0;
        cfg.report = false;

        let result = Pipeline::run(&cfg).unwrap();
        assert_eq!(result.frames, 0);
        assert!(result.triangle_count > 0);
        assert!(!dir.path().join(REPORT_FILE).exists());
    }
}
