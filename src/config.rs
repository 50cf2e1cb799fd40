use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

/// Seeds used when none are given on the command line.
pub const DEFAULT_SEEDS: [f32; 6] = [1_502.0, 90_000.0, 150_000.0, 240_000.0, 300_000.0, 10_000_000.0];

/// Aggregate compositor parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositorConfig {
    /// Gain applied to a spectrum magnitude before it scales a clone.
    pub audio_gain: f32,
    /// Global rotation added to the aggregate each frame, in radians.
    pub rotation_step: f32,
    /// Transform normals by the inverse-transpose of each clone matrix.
    pub recompute_normals: bool,
    /// Largest clone offset from the source mesh, per axis.
    pub translation_range: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            audio_gain: 50.0,
            rotation_step: 0.01,
            recompute_normals: false,
            translation_range: 60.0,
        }
    }
}

/// Spectrum feed parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumConfig {
    pub bins: usize,
    /// Snapshots the audio side may queue before new ones are dropped.
    pub channel_capacity: usize,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            bins: 512,
            channel_capacity: 4,
        }
    }
}

/// Scene assembly parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogConfig {
    /// Multiplier applied to every placement translation.
    pub spread: f32,
    /// Add the creature parts (petal, tentacles, antenna, leg, knot, ring).
    pub include_creatures: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            spread: 2.0,
            include_creatures: true,
        }
    }
}

/// Fully resolved pipeline configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output: PathBuf,
    pub frames: u32,
    pub seeds: Vec<f32>,
    pub spectrum: SpectrumConfig,
    pub compositor: CompositorConfig,
    pub catalog: CatalogConfig,
    pub compress: bool,
    pub report: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("out"),
            frames: 120,
            seeds: DEFAULT_SEEDS.to_vec(),
            spectrum: SpectrumConfig::default(),
            compositor: CompositorConfig::default(),
            catalog: CatalogConfig::default(),
            compress: false,
            report: true,
            dry_run: false,
            verbose: false,
            threads: None,
        }
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "sonic-geode",
    about = "Procedural audio-reactive mesh generator",
    version
)]
pub struct CliArgs {
    /// Output directory
    #[arg(short = 'o', long, default_value = "out")]
    pub output: PathBuf,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Size seeds, comma separated (e.g. 1502,150000,300000)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub seeds: Vec<f32>,

    /// Spectrum bins per snapshot
    #[arg(long, default_value_t = 512)]
    pub bins: usize,

    /// Gain applied to spectrum magnitudes
    #[arg(long, default_value_t = 50.0)]
    pub audio_gain: f32,

    /// Global rotation per frame in radians
    #[arg(long, default_value_t = 0.01)]
    pub rotation_step: f32,

    /// Re-orthonormalise normals after clone transforms
    #[arg(long)]
    pub recompute_normals: bool,

    /// Apply EXT_meshopt_compression to the exported GLB
    #[arg(long)]
    pub compress: bool,

    /// Skip writing report.json
    #[arg(long)]
    pub no_report: bool,

    /// Leave the creature parts out of the catalog
    #[arg(long)]
    pub no_creatures: bool,

    /// Assemble the catalog, print a summary and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for PipelineConfig {
    fn from(args: CliArgs) -> Self {
        let seeds = if args.seeds.is_empty() {
            DEFAULT_SEEDS.to_vec()
        } else {
            args.seeds
        };

        PipelineConfig {
            output: args.output,
            frames: args.frames,
            seeds,
            spectrum: SpectrumConfig {
                bins: args.bins,
                ..Default::default()
            },
            compositor: CompositorConfig {
                audio_gain: args.audio_gain,
                rotation_step: args.rotation_step,
                recompute_normals: args.recompute_normals,
                ..Default::default()
            },
            catalog: CatalogConfig {
                include_creatures: !args.no_creatures,
                ..Default::default()
            },
            compress: args.compress,
            report: !args.no_report,
            dry_run: args.dry_run,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_compositor_config() {
        let cc = CompositorConfig::default();
        assert_eq!(cc.audio_gain, 50.0);
        assert_eq!(cc.rotation_step, 0.01);
        assert!(!cc.recompute_normals);
        assert_eq!(cc.translation_range, 60.0);
    }

    #[test]
    fn default_spectrum_and_catalog_config() {
        let sc = SpectrumConfig::default();
        assert_eq!(sc.bins, 512);
        assert_eq!(sc.channel_capacity, 4);

        let cat = CatalogConfig::default();
        assert_eq!(cat.spread, 2.0);
        assert!(cat.include_creatures);
    }

    #[test]
    fn config_serializes_for_report() {
        let json = serde_json::to_value(CompositorConfig::default()).unwrap();
        assert_eq!(json["audio_gain"], 50.0);
        assert_eq!(json["recompute_normals"], false);
    }

    #[test]
    fn cli_args_to_pipeline_config() {
        let args = CliArgs::parse_from([
            "sonic-geode",
            "-o",
            "./frames",
            "--frames",
            "30",
            "--seeds",
            "1502,150000",
            "--bins",
            "256",
            "--audio-gain",
            "10",
            "--rotation-step",
            "0.05",
            "--recompute-normals",
            "--compress",
            "--no-report",
            "--no-creatures",
            "--dry-run",
            "-v",
            "-j",
            "4",
        ]);

        let config: PipelineConfig = args.into();

        assert_eq!(config.output, PathBuf::from("./frames"));
        assert_eq!(config.frames, 30);
        assert_eq!(config.seeds, vec![1502.0, 150_000.0]);
        assert_eq!(config.spectrum.bins, 256);
        assert_eq!(config.compositor.audio_gain, 10.0);
        assert_eq!(config.compositor.rotation_step, 0.05);
        assert!(config.compositor.recompute_normals);
        assert!(config.compress);
        assert!(!config.report);
        assert!(!config.catalog.include_creatures);
        assert!(config.dry_run);
        assert!(config.verbose);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn cli_args_minimal() {
        let args = CliArgs::parse_from(["sonic-geode"]);
        let config: PipelineConfig = args.into();

        assert_eq!(config.output, PathBuf::from("out"));
        assert_eq!(config.frames, 120);
        assert_eq!(config.seeds, DEFAULT_SEEDS.to_vec());
        assert!(config.report);
        assert!(!config.compress);
        assert!(!config.dry_run);
        assert_eq!(config.threads, None);
    }
}
