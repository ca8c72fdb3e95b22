use noise::{NoiseFn, Perlin};

/// Seeded 2D Perlin field. Deterministic per coordinate and continuous, so
/// scrolling it a little each tick never pops.
#[derive(Debug, Clone)]
pub struct CoherentNoise {
    perlin: Perlin,
}

impl CoherentNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Sample at `(x, y)`. Output is roughly in [-1, 1].
    ///
    /// Takes f64 so a scroll offset that grows every tick keeps its precision.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        self.perlin.get([x, y]) as f32
    }
}
