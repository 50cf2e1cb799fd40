use crate::noise::hash01;

use super::spectrum::Spectrum;

/// Deterministic stand-in for an FFT front end.
///
/// Each frame is a slow travelling bump over the bins with a per-bin hash
/// jitter, rolled off towards the high bins. Magnitudes stay within
/// `[0, peak]`, the range a normalised analyser reports.
#[derive(Debug, Clone)]
pub struct SyntheticSpectrum {
    bins: usize,
    peak: f32,
    frame: u64,
}

impl SyntheticSpectrum {
    pub const DEFAULT_PEAK: f32 = 0.05;

    pub fn new(bins: usize) -> Self {
        Self {
            bins,
            peak: Self::DEFAULT_PEAK,
            frame: 0,
        }
    }

    pub fn with_peak(mut self, peak: f32) -> Self {
        self.peak = peak.max(0.0);
        self
    }

    /// Frames produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Spectrum for an arbitrary frame number.
    pub fn at(&self, frame: u64) -> Spectrum {
        let t = frame as f32;
        let magnitudes = (0..self.bins)
            .map(|b| {
                let x = b as f32;
                let bump = (t * 0.15 + x * 0.05).sin().max(0.0);
                let jitter = 0.75 + 0.25 * hash01(t, x);
                let rolloff = 1.0 / (1.0 + x * 0.02);
                self.peak * bump * jitter * rolloff
            })
            .collect();
        Spectrum::new(magnitudes)
    }
}

impl Iterator for SyntheticSpectrum {
    type Item = Spectrum;

    fn next(&mut self) -> Option<Spectrum> {
        let spectrum = self.at(self.frame);
        self.frame += 1;
        Some(spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_reproducible() {
        let a: Vec<Spectrum> = SyntheticSpectrum::new(64).take(5).collect();
        let b: Vec<Spectrum> = SyntheticSpectrum::new(64).take(5).collect();
        assert_eq!(a, b);
        assert_eq!(a[3], SyntheticSpectrum::new(64).at(3));
    }

    #[test]
    fn magnitudes_are_bounded() {
        let synth = SyntheticSpectrum::new(128).with_peak(0.2);
        for frame in 0..20 {
            let s = synth.at(frame);
            assert_eq!(s.len(), 128);
            assert!(s.magnitudes().iter().all(|&m| (0.0..=0.2).contains(&m)));
        }
    }

    #[test]
    fn spectrum_changes_over_time() {
        let synth = SyntheticSpectrum::new(32);
        assert_ne!(synth.at(0), synth.at(10));
    }

    #[test]
    fn iterator_advances_frame_counter() {
        let mut synth = SyntheticSpectrum::new(4);
        synth.next();
        synth.next();
        assert_eq!(synth.frame(), 2);
    }
}
