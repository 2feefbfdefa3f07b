//! Bounded sample windows for rolling statistics.

/// A fixed-capacity circular buffer of timing samples.
///
/// Once full, each push overwrites the oldest sample, so the window always
/// holds the most recent `capacity` values. Insertion is O(1); there is no
/// shifting of elements.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: Vec<f64>,
    capacity: usize,
    /// Next write position once the buffer has filled.
    cursor: usize,
}

impl SampleWindow {
    /// Create a window that retains the most recent `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "sample window capacity must be non-zero");
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Push a sample, evicting the oldest one if the window is full.
    pub fn push(&mut self, sample: f64) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.cursor] = sample;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Number of samples currently held. Never exceeds the capacity.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples the window retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Arithmetic mean over the retained samples, or 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// The most recently pushed sample, if any.
    pub fn latest(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let index = if self.samples.len() < self.capacity {
            self.samples.len() - 1
        } else {
            (self.cursor + self.capacity - 1) % self.capacity
        };
        Some(self.samples[index])
    }

    /// Iterate over the retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let split = if self.samples.len() < self.capacity {
            0
        } else {
            self.cursor
        };
        self.samples[split..]
            .iter()
            .chain(self.samples[..split].iter())
            .copied()
    }

    /// Discard all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.cursor = 0;
    }
}
