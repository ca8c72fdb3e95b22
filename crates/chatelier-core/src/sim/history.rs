/// One recorded tick: where the equilibrium sat and how much material there was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub equilibrium: f32,
    pub concentration: f32,
}

impl HistorySample {
    pub const fn new(equilibrium: f32, concentration: f32) -> Self {
        Self { equilibrium, concentration }
    }
}

impl Default for HistorySample {
    fn default() -> Self {
        Self::new(0.5, 1.0)
    }
}

/// Fixed-capacity circular log of past states.
///
/// Always holds exactly `capacity` samples. `cursor` indexes the most recent
/// write; recording advances it and overwrites the oldest slot, so depths
/// older than the buffer keep showing the oldest surviving sample until the
/// cursor wraps past it.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: Vec<HistorySample>,
    cursor: usize,
}

impl HistoryBuffer {
    /// Allocate a buffer of `capacity` slots (at least one), all set to `initial`.
    pub fn new(capacity: usize, initial: HistorySample) -> Self {
        Self {
            samples: vec![initial; capacity.max(1)],
            cursor: 0,
        }
    }

    /// Advance the cursor and overwrite that slot.
    pub fn record(&mut self, equilibrium: f32, concentration: f32) {
        self.cursor = (self.cursor + 1) % self.samples.len();
        self.samples[self.cursor] = HistorySample::new(equilibrium, concentration);
    }

    /// Sample recorded `floor(depth * (N - 1))` ticks ago.
    ///
    /// `depth` 0.0 is the latest write, 1.0 the oldest slot. Out-of-range
    /// depths are clamped and NaN reads as the latest sample.
    pub fn lookup(&self, depth: f32) -> HistorySample {
        let n = self.samples.len();
        let depth = if depth.is_nan() { 0.0 } else { depth.clamp(0.0, 1.0) };
        let lookback = ((depth * (n - 1) as f32).floor() as usize).min(n - 1);
        self.samples[(self.cursor + n - lookback) % n]
    }

    /// Overwrite every slot with `sample` and rewind the cursor.
    pub fn fill(&mut self, sample: HistorySample) {
        self.samples.fill(sample);
        self.cursor = 0;
    }

    /// The most recently recorded sample.
    pub fn latest(&self) -> HistorySample {
        self.samples[self.cursor]
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
