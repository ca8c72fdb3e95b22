//! Target-seeking state model.
//!
//! External controls only ever write `target_*` fields (and temperature);
//! `tick` is the sole writer of the actuals.

use serde::Serialize;

use crate::catalog::ReactionSystem;
use crate::config::{EquilibriumParams, SimulationConfig, StressParams};
use crate::error::TickError;

/// Temperature slider range is `[-TEMPERATURE_LIMIT, TEMPERATURE_LIMIT]`.
pub const TEMPERATURE_LIMIT: f32 = 10.0;

/// Snapshot of the simulated scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationState {
    /// Equilibrium fraction: 0.0 all reactants, 1.0 all products.
    pub position: f32,
    pub target_position: f32,
    pub concentration: f32,
    pub target_concentration: f32,
    pub dilution: f32,
    pub target_dilution: f32,
    pub temperature: f32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            position: 0.5,
            target_position: 0.5,
            concentration: 1.0,
            target_concentration: 1.0,
            dilution: 1.0,
            target_dilution: 1.0,
            temperature: 0.0,
        }
    }
}

impl SimulationState {
    fn check_finite(&self) -> Result<(), TickError> {
        let fields = [
            ("position", self.position),
            ("target_position", self.target_position),
            ("concentration", self.concentration),
            ("target_concentration", self.target_concentration),
            ("dilution", self.dilution),
            ("target_dilution", self.target_dilution),
            ("temperature", self.temperature),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TickError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}

/// Discrete stress a user can apply to the equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressKind {
    /// Favour the reactant side and add material.
    Reactant,
    /// Favour the product side and add material.
    Product,
    Heat,
    Cool,
    /// Compress: lower dilution, raise concentration.
    ReduceVolume,
    /// Expand: raise dilution, lower concentration.
    Dilute,
}

impl StressKind {
    pub const ALL: [StressKind; 6] = [
        Self::Reactant, Self::Product, Self::Heat,
        Self::Cool, Self::ReduceVolume, Self::Dilute,
    ];

    /// Parse the UI event name. `reduce-concentration` is an older alias of
    /// `reduce-volume`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "reactant" => Some(Self::Reactant),
            "product" => Some(Self::Product),
            "heat" => Some(Self::Heat),
            "cool" => Some(Self::Cool),
            "reduce-volume" | "reduce-concentration" => Some(Self::ReduceVolume),
            "dilute" => Some(Self::Dilute),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Reactant => "reactant",
            Self::Product => "product",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::ReduceVolume => "reduce-volume",
            Self::Dilute => "dilute",
        }
    }
}

/// Owns the simulation scalars and advances them toward their targets.
#[derive(Debug, Clone)]
pub struct StateModel {
    state: SimulationState,
    smoothing_rate: f32,
    equilibrium: EquilibriumParams,
    stress: StressParams,
}

impl StateModel {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            state: SimulationState::default(),
            smoothing_rate: config.smoothing_rate,
            equilibrium: config.equilibrium.clone(),
            stress: config.stress.clone(),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Jump every actual and target back to its default.
    pub fn reset(&mut self) {
        self.state = SimulationState::default();
    }

    /// Set the position target directly (slider). Clamped into [0, 1];
    /// non-finite input is ignored.
    pub fn set_target_position(&mut self, fraction: f32) {
        if !fraction.is_finite() {
            log::warn!("ignoring non-finite target position {}", fraction);
            return;
        }
        self.state.target_position = fraction.clamp(0.0, 1.0);
    }

    /// Mutate targets for a stress event. Every write is clamped to its domain.
    pub fn apply_stress(&mut self, kind: StressKind, system: &ReactionSystem) {
        let step = self.stress.position_step;
        // `delta_n > 0`: reactant side holds more gas, compression favours products.
        let gas_sign = system.delta_n.signum() as f32;
        let manual = !system.temperature_driven;

        match kind {
            StressKind::Reactant => {
                self.shift_target_position(-step);
                self.shift_target_concentration(self.stress.concentration_step);
            }
            StressKind::Product => {
                self.shift_target_position(step);
                self.shift_target_concentration(self.stress.concentration_step);
            }
            StressKind::Heat => {
                self.shift_temperature(self.stress.temperature_step);
                if manual {
                    self.shift_target_position(system.temperature_sign() * step);
                }
            }
            StressKind::Cool => {
                self.shift_temperature(-self.stress.temperature_step);
                if manual {
                    self.shift_target_position(-system.temperature_sign() * step);
                }
            }
            StressKind::ReduceVolume => {
                self.shift_target_dilution(-self.stress.dilution_step);
                self.shift_target_concentration(self.stress.concentration_step);
                if manual {
                    self.shift_target_position(gas_sign * step);
                }
            }
            StressKind::Dilute => {
                self.shift_target_dilution(self.stress.dilution_step);
                self.shift_target_concentration(-self.stress.concentration_step);
                if manual {
                    self.shift_target_position(-gas_sign * step);
                }
            }
        }
    }

    /// Equilibrium position implied by the current temperature and dilution.
    pub fn ideal_position(&self, system: &ReactionSystem) -> f32 {
        let p = &self.equilibrium;
        let temp_deviation = self.state.temperature / TEMPERATURE_LIMIT;
        let thermal = system.temperature_sign() * temp_deviation * p.temperature_sensitivity;
        let crowding = system.delta_n as f32 * (self.state.dilution - 1.0) * p.dilution_sensitivity;
        (0.5 + thermal - crowding).clamp(0.0, 1.0)
    }

    /// Advance one tick and return the new snapshot.
    ///
    /// The next state is computed and validated before it replaces the
    /// current one; a rejected tick leaves the model untouched.
    pub fn tick(&mut self, system: &ReactionSystem) -> Result<SimulationState, TickError> {
        let mut next = self.state;

        if system.temperature_driven {
            // Fixed-size step: lands on the ideal after |gap| / pull_limit ticks.
            let gap = self.ideal_position(system) - next.target_position;
            next.target_position += gap.signum() * gap.abs().min(self.equilibrium.pull_limit);
        }

        let k = self.smoothing_rate;
        next.position += (next.target_position - next.position) * k;
        next.concentration += (next.target_concentration - next.concentration) * k;
        next.dilution += (next.target_dilution - next.dilution) * k;

        next.check_finite()?;
        self.state = next;
        Ok(next)
    }

    fn shift_target_position(&mut self, delta: f32) {
        self.state.target_position = (self.state.target_position + delta).clamp(0.0, 1.0);
    }

    fn shift_target_concentration(&mut self, delta: f32) {
        self.state.target_concentration = (self.state.target_concentration + delta)
            .clamp(0.0, self.stress.max_concentration);
    }

    fn shift_target_dilution(&mut self, delta: f32) {
        self.state.target_dilution = (self.state.target_dilution + delta)
            .clamp(self.stress.min_dilution, self.stress.max_dilution);
    }

    fn shift_temperature(&mut self, delta: f32) {
        self.state.temperature =
            (self.state.temperature + delta).clamp(-TEMPERATURE_LIMIT, TEMPERATURE_LIMIT);
    }
}
