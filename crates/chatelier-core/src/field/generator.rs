//! Height and colour field over the terrain grid.
//!
//! Pure mapping from grid coordinate plus history to `(height, colour)`.
//! The grid's y axis doubles as a timeline: the near edge (`-size/2`) shows
//! the latest tick, the far edge (`+size/2`) the oldest sample in history.

use glam::Vec2;

use crate::catalog::ReactionSystem;
use crate::colour::Rgb;
use crate::config::{FieldParams, TerrainConfig};
use crate::sim::history::{HistoryBuffer, HistorySample};

use super::mesh::TerrainMesh;
use super::noise::CoherentNoise;

/// Result of evaluating the field at one grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub height: f32,
    pub colour: Rgb,
}

pub struct FieldGenerator {
    params: FieldParams,
    size: f32,
    noise: CoherentNoise,
}

impl FieldGenerator {
    pub fn new(params: &FieldParams, terrain: &TerrainConfig) -> Self {
        Self {
            params: params.clone(),
            size: terrain.size,
            noise: CoherentNoise::new(params.noise_seed),
        }
    }

    /// Normalized history depth for grid row `y`: 0.0 near edge, 1.0 far edge.
    #[inline]
    pub fn depth_at(&self, y: f32) -> f32 {
        ((y + self.size / 2.0) / self.size).clamp(0.0, 1.0)
    }

    /// Two Gaussian bumps at `x = ∓2h₀`: reactants weighted by
    /// `1 - equilibrium`, products by `equilibrium`, both by concentration.
    #[inline]
    pub fn peak_height(&self, x: f32, sample: HistorySample) -> f32 {
        let h0 = self.params.peak_offset;
        let amplitude = self.params.peak_amplitude;
        let reactant = amplitude * gaussian((x + 2.0 * h0) / h0);
        let product = amplitude * gaussian((x - 2.0 * h0) / h0);
        (reactant * (1.0 - sample.equilibrium) + product * sample.equilibrium)
            * sample.concentration
    }

    /// Scrolling noise texture, scaled by `x / noise_falloff` so it vanishes
    /// along the centre line and grows toward the edges.
    #[inline]
    pub fn noise_height(&self, x: f32, y: f32, frame: u64) -> f32 {
        let p = &self.params;
        let freq = p.noise_frequency as f64;
        let scroll = frame as f64 * p.noise_speed as f64;
        let n = self.noise.sample(x as f64 * freq, y as f64 * freq - scroll);
        n * p.noise_amplitude * (x / p.noise_falloff)
    }

    /// Colour blend factor: left edge 0.0, right edge 1.0, biased toward the
    /// product colour by `equilibrium - 0.5`.
    #[inline]
    pub fn mix_factor(&self, x: f32, equilibrium: f32) -> f32 {
        let base = (x + self.size / 2.0) / self.size;
        (base + (equilibrium - 0.5)).clamp(0.0, 1.0)
    }

    /// Evaluate one grid point.
    pub fn sample(
        &self,
        point: Vec2,
        history: &HistoryBuffer,
        system: &ReactionSystem,
        frame: u64,
    ) -> FieldSample {
        let past = history.lookup(self.depth_at(point.y));
        self.sample_with(point, past, system, frame)
    }

    fn sample_with(
        &self,
        point: Vec2,
        past: HistorySample,
        system: &ReactionSystem,
        frame: u64,
    ) -> FieldSample {
        let height = self.peak_height(point.x, past) + self.noise_height(point.x, point.y, frame);
        let t = self.mix_factor(point.x, past.equilibrium);
        FieldSample {
            height,
            colour: system.reactant_colour.lerp(system.product_colour, t),
        }
    }

    /// Rewrite heights and colours of every vertex in place.
    pub fn apply(
        &self,
        mesh: &mut TerrainMesh,
        history: &HistoryBuffer,
        system: &ReactionSystem,
        frame: u64,
    ) {
        // Vertices come row by row with constant y, so one lookup per row.
        let mut row_y = f32::NAN;
        let mut past = HistorySample::default();
        for v in mesh.vertices_mut() {
            if v.y != row_y {
                row_y = v.y;
                past = history.lookup(self.depth_at(row_y));
            }
            let s = self.sample_with(Vec2::new(v.x, v.y), past, system, frame);
            v.z = s.height;
            v.r = s.colour.r;
            v.g = s.colour.g;
            v.b = s.colour.b;
        }
    }
}

#[inline]
fn gaussian(u: f32) -> f32 {
    (-(u * u)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_blue() -> ReactionSystem {
        ReactionSystem {
            id: "rb".into(),
            equation: "R ⇌ B".into(),
            description: String::new(),
            reactant_colour: Rgb::RED,
            product_colour: Rgb::BLUE,
            is_endothermic: true,
            delta_n: 0,
            temperature_driven: false,
        }
    }

    fn quiet_params() -> FieldParams {
        FieldParams { noise_amplitude: 0.0, ..FieldParams::default() }
    }

    fn generator(params: FieldParams) -> FieldGenerator {
        FieldGenerator::new(&params, &TerrainConfig::default())
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn centre_colour_is_even_mix() {
        let gen = generator(quiet_params());
        let history = HistoryBuffer::new(16, HistorySample::default());
        let s = gen.sample(Vec2::ZERO, &history, &red_blue(), 0);
        assert!(close(s.colour.r, 0.5) && close(s.colour.g, 0.0) && close(s.colour.b, 0.5),
            "got {:?}", s.colour);
    }

    #[test]
    fn mix_factor_edges_and_bias() {
        let gen = generator(quiet_params());
        assert!(close(gen.mix_factor(-50.0, 0.5), 0.0));
        assert!(close(gen.mix_factor(50.0, 0.5), 1.0));
        assert!(close(gen.mix_factor(0.0, 0.8), 0.8));
        assert_eq!(gen.mix_factor(40.0, 1.0), 1.0);
        assert_eq!(gen.mix_factor(-40.0, 0.0), 0.0);
    }

    #[test]
    fn peaks_follow_equilibrium() {
        let gen = generator(quiet_params());
        let h0 = FieldParams::default().peak_offset;
        let amp = FieldParams::default().peak_amplitude;

        let all_reactant = HistorySample::new(0.0, 1.0);
        assert!(close(gen.peak_height(-2.0 * h0, all_reactant), amp));
        assert!(gen.peak_height(2.0 * h0, all_reactant) < 1e-3);

        let all_product = HistorySample::new(1.0, 1.0);
        assert!(close(gen.peak_height(2.0 * h0, all_product), amp));

        let half = HistorySample::new(0.5, 2.0);
        assert!(close(gen.peak_height(-2.0 * h0, half), gen.peak_height(2.0 * h0, half)));
    }

    #[test]
    fn concentration_scales_height() {
        let gen = generator(quiet_params());
        let h0 = FieldParams::default().peak_offset;
        let one = gen.peak_height(2.0 * h0, HistorySample::new(0.7, 1.0));
        let two = gen.peak_height(2.0 * h0, HistorySample::new(0.7, 2.0));
        assert!(close(two, 2.0 * one));
        assert_eq!(gen.peak_height(2.0 * h0, HistorySample::new(0.7, 0.0)), 0.0);
    }

    #[test]
    fn noise_vanishes_on_centre_line() {
        let gen = generator(FieldParams::default());
        for frame in [0u64, 1, 100, 10_000] {
            assert_eq!(gen.noise_height(0.0, 13.0, frame), 0.0);
        }
    }

    #[test]
    fn noise_is_deterministic_and_scrolls() {
        let a = generator(FieldParams::default());
        let b = generator(FieldParams::default());
        assert_eq!(a.noise_height(30.0, 10.0, 5), b.noise_height(30.0, 10.0, 5));

        let moved = (0..20).any(|f| a.noise_height(30.0, 10.0, f) != a.noise_height(30.0, 10.0, 0));
        assert!(moved, "noise should change as frames advance");
    }

    #[test]
    fn depth_maps_near_edge_to_latest() {
        let gen = generator(quiet_params());
        assert_eq!(gen.depth_at(-50.0), 0.0);
        assert_eq!(gen.depth_at(50.0), 1.0);
        assert!(close(gen.depth_at(0.0), 0.5));
        assert_eq!(gen.depth_at(80.0), 1.0);
    }

    #[test]
    fn apply_reads_history_along_depth() {
        let terrain = TerrainConfig { size: 100.0, resolution: 4 };
        let gen = FieldGenerator::new(&quiet_params(), &terrain);
        let mut mesh = TerrainMesh::new(&terrain);

        let mut history = HistoryBuffer::new(8, HistorySample::new(0.0, 1.0));
        history.record(1.0, 1.0);
        gen.apply(&mut mesh, &history, &red_blue(), 0);

        let expected_now = gen.peak_height(25.0, HistorySample::new(1.0, 1.0));
        let expected_old = gen.peak_height(25.0, HistorySample::new(0.0, 1.0));
        assert!(expected_now > expected_old);

        // Bottom row (y = -50) is "now", top row (y = +50) the oldest slot.
        let v = mesh.vertices();
        let near = v.iter().find(|v| v.x == 25.0 && v.y == -50.0).unwrap();
        let far = v.iter().find(|v| v.x == 25.0 && v.y == 50.0).unwrap();
        assert!(close(near.z, expected_now));
        assert!(close(far.z, expected_old));
    }

    #[test]
    fn apply_matches_pointwise_sample() {
        let terrain = TerrainConfig { size: 100.0, resolution: 8 };
        let gen = FieldGenerator::new(&FieldParams::default(), &terrain);
        let mut mesh = TerrainMesh::new(&terrain);
        let mut history = HistoryBuffer::new(32, HistorySample::default());
        for i in 0..20 {
            history.record(i as f32 / 20.0, 1.0 + i as f32 / 10.0);
        }
        let sys = red_blue();
        gen.apply(&mut mesh, &history, &sys, 17);

        for v in mesh.vertices() {
            let s = gen.sample(v.grid(), &history, &sys, 17);
            assert_eq!(v.z, s.height);
            assert_eq!(v.colour(), s.colour);
        }
    }
}
