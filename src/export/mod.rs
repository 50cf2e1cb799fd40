pub mod glb_writer;
pub mod report;

pub use glb_writer::{write_glb, write_glb_compressed};
pub use report::{FrameStats, RunReport};
