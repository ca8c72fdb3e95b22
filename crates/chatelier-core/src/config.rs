use serde::Deserialize;

/// Top-level simulation configuration.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks kept in the history ring buffer (default: 2100).
    pub history_len: usize,
    /// Exponential smoothing rate applied to every actual each tick, in (0, 1].
    pub smoothing_rate: f32,
    pub equilibrium: EquilibriumParams,
    pub stress: StressParams,
    pub terrain: TerrainConfig,
    pub field: FieldParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            history_len: 2100,
            smoothing_rate: 0.05,
            equilibrium: EquilibriumParams::default(),
            stress: StressParams::default(),
            terrain: TerrainConfig::default(),
            field: FieldParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from a JSON string and clamp it into range.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Clamp values that would break the model (zero-length history,
    /// smoothing outside (0, 1], empty grid) into usable ranges. Non-finite
    /// numbers (JSON literals past `f32::MAX` parse as infinity) fall back to
    /// their defaults.
    pub fn validated(mut self) -> Self {
        self.history_len = self.history_len.max(1);
        self.smoothing_rate =
            finite_or(self.smoothing_rate, Self::default().smoothing_rate).clamp(f32::EPSILON, 1.0);

        self.equilibrium = self.equilibrium.validated();
        self.stress = self.stress.validated();
        self.field = self.field.validated();

        self.terrain.resolution = self.terrain.resolution.max(1);
        if !(self.terrain.size.is_finite() && self.terrain.size > 0.0) {
            self.terrain.size = TerrainConfig::default().size;
        }
        self
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Hand-tuned sensitivities of the ideal-equilibrium model.
/// These are behavioural constants, not derived chemistry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EquilibriumParams {
    /// Shift in ideal position per unit of normalized temperature deviation.
    pub temperature_sensitivity: f32,
    /// Shift in ideal position per mole of gas per unit of dilution change.
    pub dilution_sensitivity: f32,
    /// Maximum distance the position target moves toward the ideal per tick.
    pub pull_limit: f32,
}

impl Default for EquilibriumParams {
    fn default() -> Self {
        Self {
            temperature_sensitivity: 0.4,
            dilution_sensitivity: 0.15,
            pull_limit: 0.005,
        }
    }
}

impl EquilibriumParams {
    fn validated(self) -> Self {
        let d = Self::default();
        Self {
            temperature_sensitivity: finite_or(self.temperature_sensitivity, d.temperature_sensitivity),
            dilution_sensitivity: finite_or(self.dilution_sensitivity, d.dilution_sensitivity),
            pull_limit: finite_or(self.pull_limit, d.pull_limit).abs(),
        }
    }
}

/// Step sizes and domains for stress events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StressParams {
    pub position_step: f32,
    pub concentration_step: f32,
    pub temperature_step: f32,
    pub dilution_step: f32,
    pub max_concentration: f32,
    pub min_dilution: f32,
    pub max_dilution: f32,
}

impl Default for StressParams {
    fn default() -> Self {
        Self {
            position_step: 0.1,
            concentration_step: 0.1,
            temperature_step: 2.0,
            dilution_step: 0.25,
            max_concentration: 5.0,
            min_dilution: 0.25,
            max_dilution: 4.0,
        }
    }
}

impl StressParams {
    fn validated(self) -> Self {
        let d = Self::default();
        let min_dilution = finite_or(self.min_dilution, d.min_dilution).max(f32::EPSILON);
        Self {
            position_step: finite_or(self.position_step, d.position_step),
            concentration_step: finite_or(self.concentration_step, d.concentration_step),
            temperature_step: finite_or(self.temperature_step, d.temperature_step),
            dilution_step: finite_or(self.dilution_step, d.dilution_step),
            max_concentration: finite_or(self.max_concentration, d.max_concentration).max(0.0),
            min_dilution,
            max_dilution: finite_or(self.max_dilution, d.max_dilution).max(min_dilution),
        }
    }
}

/// Planar grid the terrain is sampled on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the square grid in world units.
    pub size: f32,
    /// Segments per side; the grid has `(resolution + 1)^2` vertices.
    pub resolution: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            resolution: 64,
        }
    }
}

/// Shape of the height/colour field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Width of each Gaussian peak; the peaks sit at `x = ±2 * peak_offset`.
    pub peak_offset: f32,
    /// Height of a peak at full equilibrium weight and unit concentration.
    pub peak_amplitude: f32,
    pub noise_seed: u32,
    pub noise_frequency: f32,
    /// Distance the noise field scrolls along y per tick.
    pub noise_speed: f32,
    pub noise_amplitude: f32,
    /// Noise is scaled by `x / noise_falloff`, so it grows away from the centre.
    pub noise_falloff: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            peak_offset: 12.0,
            peak_amplitude: 15.0,
            noise_seed: 42,
            noise_frequency: 0.05,
            noise_speed: 0.02,
            noise_amplitude: 1.5,
            noise_falloff: 20.0,
        }
    }
}

impl FieldParams {
    fn validated(self) -> Self {
        let d = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };
        Self {
            peak_offset: positive(self.peak_offset, d.peak_offset),
            peak_amplitude: finite_or(self.peak_amplitude, d.peak_amplitude),
            noise_seed: self.noise_seed,
            noise_frequency: finite_or(self.noise_frequency, d.noise_frequency),
            noise_speed: finite_or(self.noise_speed, d.noise_speed),
            noise_amplitude: finite_or(self.noise_amplitude, d.noise_amplitude),
            noise_falloff: positive(self.noise_falloff, d.noise_falloff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimulationConfig::from_json(r#"{ "history_len": 5000 }"#).unwrap();
        assert_eq!(config.history_len, 5000);
        assert_eq!(config.smoothing_rate, 0.05);
        assert_eq!(config.terrain.resolution, 64);
    }

    #[test]
    fn nested_overrides() {
        let json = r#"{
            "terrain": { "resolution": 16 },
            "equilibrium": { "pull_limit": 0.01 }
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.terrain.resolution, 16);
        assert_eq!(config.terrain.size, 100.0);
        assert_eq!(config.equilibrium.pull_limit, 0.01);
        assert_eq!(config.equilibrium.temperature_sensitivity, 0.4);
    }

    #[test]
    fn validated_clamps_degenerate_values() {
        let config = SimulationConfig {
            history_len: 0,
            smoothing_rate: 3.0,
            terrain: TerrainConfig { size: -1.0, resolution: 0 },
            ..SimulationConfig::default()
        }
        .validated();
        assert_eq!(config.history_len, 1);
        assert_eq!(config.smoothing_rate, 1.0);
        assert_eq!(config.terrain.resolution, 1);
        assert_eq!(config.terrain.size, 100.0);
    }

    #[test]
    fn validated_rejects_nan_smoothing() {
        let config = SimulationConfig {
            smoothing_rate: f32::NAN,
            ..SimulationConfig::default()
        }
        .validated();
        assert_eq!(config.smoothing_rate, 0.05);
    }

    #[test]
    fn validated_replaces_non_finite_params() {
        let json = r#"{
            "equilibrium": { "pull_limit": 1e39, "dilution_sensitivity": -1e39 },
            "stress": { "concentration_step": 1e39, "max_concentration": 1e39, "max_dilution": 1e39 },
            "terrain": { "size": 1e39 },
            "field": { "peak_amplitude": 1e39, "noise_falloff": 1e39, "noise_speed": -1e39 }
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        let d = SimulationConfig::default();
        assert_eq!(config.equilibrium, d.equilibrium);
        assert_eq!(config.stress, d.stress);
        assert_eq!(config.terrain, d.terrain);
        assert_eq!(config.field, d.field);
    }

    #[test]
    fn validated_keeps_finite_overrides() {
        let json = r#"{ "stress": { "concentration_step": 0.5, "max_concentration": 8.0 } }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.stress.concentration_step, 0.5);
        assert_eq!(config.stress.max_concentration, 8.0);
    }
}
