//! Spectrum input: snapshots, the audio-to-render channel and a synthetic
//! producer for headless runs.

pub mod feed;
pub mod spectrum;
pub mod synthetic;

pub use feed::{SpectrumFeed, SpectrumPublisher, spectrum_channel};
pub use spectrum::Spectrum;
pub use synthetic::SyntheticSpectrum;
