pub mod audio;
pub mod builders;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod noise;
pub mod pipeline;
pub mod scene;
pub mod types;

pub use compositor::Compositor;
pub use config::PipelineConfig;
pub use error::{Result, SonicGeodeError};
pub use pipeline::Pipeline;
pub use scene::Catalog;
pub use types::{Material, Mesh, PrimitiveMode, Shape};
