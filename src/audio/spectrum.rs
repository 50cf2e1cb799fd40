/// One frame of spectrum magnitudes, owned by whoever consumes it.
///
/// Values are expected non-negative; lookups read NaN and negative bins as
/// silence instead of letting them reach a transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    magnitudes: Vec<f32>,
}

impl Spectrum {
    pub fn new(magnitudes: Vec<f32>) -> Self {
        Self { magnitudes }
    }

    /// `bins` zero magnitudes.
    pub fn silence(bins: usize) -> Self {
        Self {
            magnitudes: vec![0.0; bins],
        }
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Sanitised magnitude of `bin`; out-of-range bins read as zero.
    pub fn magnitude(&self, bin: usize) -> f32 {
        self.magnitudes.get(bin).copied().map_or(0.0, sanitize)
    }

    /// Magnitude for clone `k` of `k_max`: `k / k_max` is mapped onto the bin
    /// range and clamped to the last bin.
    pub fn magnitude_for(&self, k: u32, k_max: u32) -> f32 {
        if self.magnitudes.is_empty() || k_max == 0 {
            return 0.0;
        }
        let len = self.magnitudes.len();
        let bin = ((k as f32 / k_max as f32) * len as f32) as usize;
        self.magnitude(bin.min(len - 1))
    }

    /// Mean sanitised magnitude.
    pub fn energy(&self) -> f32 {
        if self.magnitudes.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.magnitudes.iter().copied().map(sanitize).sum();
        sum / self.magnitudes.len() as f32
    }
}

impl From<Vec<f32>> for Spectrum {
    fn from(magnitudes: Vec<f32>) -> Self {
        Self::new(magnitudes)
    }
}

fn sanitize(m: f32) -> f32 {
    if m.is_finite() && m > 0.0 { m } else { 0.0 }
}
