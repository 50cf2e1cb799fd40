//! End-to-end integration tests.
//!
//! These tests run the full pipeline into a temporary directory and read the
//! exported GLB and report back.

use std::fs;
use std::sync::Arc;

use sonic_geode::audio::Spectrum;
use sonic_geode::config::{CatalogConfig, CompositorConfig, PipelineConfig};
use sonic_geode::geometry::{TubeParams, tetrahedron, tube};
use sonic_geode::pipeline::{GLB_FILE, REPORT_FILE};
use sonic_geode::{Catalog, Compositor, Pipeline};

fn config(output: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        output: output.to_path_buf(),
        frames: 8,
        seeds: vec![1_502.0, 90_000.0, 300_000.0],
        ..Default::default()
    }
}

#[test]
fn full_pipeline_writes_parseable_glb() {
    let tmp = tempfile::tempdir().unwrap();
    let result = Pipeline::run(&config(tmp.path())).unwrap();

    assert_eq!(result.frames, 8);
    let glb_path = tmp.path().join(GLB_FILE);
    assert_eq!(result.glb.as_deref(), Some(glb_path.as_path()));

    let (doc, buffers, _images) = gltf::import(&glb_path).unwrap();
    let prim = doc.meshes().next().unwrap().primitives().next().unwrap();
    let reader = prim.reader(|buf| Some(&buffers[buf.index()]));

    assert_eq!(reader.read_positions().unwrap().count(), result.vertex_count);
    let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
    assert_eq!(indices.len() / 3, result.triangle_count);
    assert!(indices.iter().all(|&i| (i as usize) < result.vertex_count));
    assert!(reader.read_colors(0).is_some(), "clones carry palette colours");

    let base = prim.material().pbr_metallic_roughness().base_color_factor();
    assert!(prim.material().index().is_some());
    assert_eq!(base, [1.0; 4]);
}

#[test]
fn report_matches_run() {
    let tmp = tempfile::tempdir().unwrap();
    let result = Pipeline::run(&config(tmp.path())).unwrap();

    let json_str = fs::read_to_string(tmp.path().join(REPORT_FILE)).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json_str).unwrap();

    let frames = report["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 8);
    assert_eq!(frames[7]["frame"], 8);
    assert_eq!(frames[7]["vertices"], result.vertex_count as u64);
    assert_eq!(report["seeds"].as_array().unwrap().len(), 3);
    assert_eq!(report["catalog_entries"], 30);
    // Every frame of a run has the same topology
    assert!(frames.iter().all(|f| f["triangles"] == frames[0]["triangles"]));
}

#[test]
fn compressed_glb_declares_meshopt() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = config(tmp.path());
    cfg.compress = true;
    cfg.report = false;
    Pipeline::run(&cfg).unwrap();

    let data = fs::read(tmp.path().join(GLB_FILE)).unwrap();
    // The gltf crate does not decode EXT_meshopt_compression; skip validation.
    let gltf_data = gltf::Gltf::from_slice_without_validation(&data).unwrap();
    assert!(
        gltf_data
            .document
            .extensions_required()
            .any(|e| e == "EXT_meshopt_compression")
    );
    assert!(!tmp.path().join(REPORT_FILE).exists());
}

#[test]
fn repeated_runs_export_identical_topology() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let ra = Pipeline::run(&config(a.path())).unwrap();
    let rb = Pipeline::run(&config(b.path())).unwrap();
    assert_eq!(ra.vertex_count, rb.vertex_count);
    assert_eq!(ra.triangle_count, rb.triangle_count);
}

#[test]
fn compositor_counts_follow_seed_scale() {
    let compositor = Compositor::new(CompositorConfig::default());
    let source = Arc::new(tube(
        &[
            glam::Vec3::ZERO,
            glam::Vec3::new(10.0, 0.0, 0.0),
            glam::Vec3::new(20.0, 5.0, 0.0),
        ],
        &TubeParams {
            radial_segments: 6,
            ..Default::default()
        },
    ));
    assert_eq!(source.vertex_count(), 18);
    assert_eq!(source.triangle_count(), 12);

    compositor.register(150_000.0, source.clone()).unwrap();
    compositor.register(1_502.0, Arc::new(tetrahedron(10.0))).unwrap();

    let aggregate = compositor.compose(&Spectrum::silence(64)).unwrap();
    assert_eq!(aggregate.vertex_count(), 2 * 18 + 4);
    assert_eq!(aggregate.triangle_count(), 2 * 12 + 4);
    aggregate.validate().unwrap();
}

#[test]
fn catalog_without_creatures_feeds_compositor() {
    let catalog = Catalog::assemble(&CatalogConfig {
        include_creatures: false,
        ..Default::default()
    });
    let mut compositor = Compositor::new(CompositorConfig::default());
    for seed in [1_502.0, 240_000.0, 10_000_000.0] {
        compositor.register_from_catalog(&catalog, seed).unwrap();
    }
    let frame = compositor.rebuild(&Spectrum::new(vec![0.01; 512])).unwrap();
    assert!(!frame.is_empty());
    frame.validate().unwrap();
}
