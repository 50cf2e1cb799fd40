use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sonic_geode::config::{CliArgs, PipelineConfig};
use sonic_geode::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let filter = if args.verbose {
        EnvFilter::new("sonic_geode=debug")
    } else {
        EnvFilter::new("sonic_geode=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: PipelineConfig = args.into();

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    match Pipeline::run(&config) {
        Ok(result) => {
            match &result.glb {
                Some(path) => println!(
                    "Done: {} frames, {} vertices / {} triangles -> {} in {:.2}s",
                    result.frames,
                    result.vertex_count,
                    result.triangle_count,
                    path.display(),
                    result.duration.as_secs_f64()
                ),
                None => println!("Dry run finished in {:.2}s", result.duration.as_secs_f64()),
            }
            Ok(())
        }
        Err(e) => {
            error!(%e, "Pipeline failed");
            Err(anyhow::anyhow!(e)).context("sonic-geode pipeline failed")
        }
    }
}
