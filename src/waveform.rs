/// The most recently rendered samples, kept for the plot.
///
/// Length is fixed at construction. Each render either zeroes it or
/// overwrites its head with the new block.
#[derive(Debug, Clone)]
pub struct WaveformBuffer {
    samples: Box<[f32]>,
}

impl WaveformBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }

    /// Copy up to `len()` samples from `source` into the front of the buffer.
    /// Returns how many were written.
    pub fn write_from<I: IntoIterator<Item = f32>>(&mut self, source: I) -> usize {
        let mut written = 0;
        for (slot, value) in self.samples.iter_mut().zip(source) {
            *slot = value;
            written += 1;
        }
        written
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}
