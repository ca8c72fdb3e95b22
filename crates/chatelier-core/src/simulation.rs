//! Simulation core.
//!
//! Owns the state model, history and terrain mesh for one active reaction
//! system, and fixes the per-tick order: advance state, record history,
//! regenerate the field. The state written this tick is visible to the
//! field on the same tick.

use serde::Serialize;

use crate::catalog::{ReactionCatalog, ReactionSystem};
use crate::config::SimulationConfig;
use crate::error::{ConfigurationError, TickError};
use crate::field::{FieldGenerator, TerrainMesh};
use crate::input::queue::ControlEvent;
use crate::sim::history::{HistoryBuffer, HistorySample};
use crate::sim::state::{SimulationState, StateModel, StressKind};

/// Read-only snapshot for UI readouts, serialized to JSON for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStatus {
    pub system: String,
    pub equation: String,
    pub description: String,
    pub position: f32,
    pub target_position: f32,
    pub concentration: f32,
    pub dilution: f32,
    pub temperature: f32,
    /// `target_position` on the 0-100 slider scale.
    pub slider: f32,
    pub frame: u64,
}

impl SimulationStatus {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub struct Simulation {
    config: SimulationConfig,
    catalog: ReactionCatalog,
    system: ReactionSystem,
    model: StateModel,
    history: HistoryBuffer,
    field: FieldGenerator,
    mesh: TerrainMesh,
    frame: u64,
}

impl Simulation {
    /// Build a simulation running the catalog's default system. The mesh is
    /// generated once up front so the renderer has data before the first tick.
    pub fn new(config: SimulationConfig, catalog: ReactionCatalog) -> Self {
        let config = config.validated();
        let system = catalog.default_system().clone();
        let model = StateModel::new(&config);
        let history = HistoryBuffer::new(config.history_len, Self::initial_sample());
        let field = FieldGenerator::new(&config.field, &config.terrain);
        let mesh = TerrainMesh::new(&config.terrain);

        let mut sim = Self {
            config,
            catalog,
            system,
            model,
            history,
            field,
            mesh,
            frame: 0,
        };
        sim.regenerate();
        log::info!(
            "simulation ready: system '{}', {} vertices, {} history slots",
            sim.system.id,
            sim.mesh.vertex_count(),
            sim.history.capacity()
        );
        sim
    }

    /// Default configuration with the built-in catalog.
    pub fn with_defaults() -> Result<Self, ConfigurationError> {
        Ok(Self::new(SimulationConfig::default(), ReactionCatalog::load()?))
    }

    fn initial_sample() -> HistorySample {
        let s = SimulationState::default();
        HistorySample::new(s.position, s.concentration)
    }

    // -- Controls: targets only --

    pub fn apply_stress(&mut self, kind: StressKind) {
        self.model.apply_stress(kind, &self.system);
    }

    /// Set the position target as a fraction in [0, 1] (clamped).
    pub fn set_target_position(&mut self, fraction: f32) {
        self.model.set_target_position(fraction);
    }

    /// Set the position target from the 0-100 slider scale.
    pub fn set_slider(&mut self, value: f32) {
        self.model.set_target_position(value / 100.0);
    }

    /// Switch to a catalog system by id. Unknown ids leave the simulation
    /// untouched.
    pub fn select_system(&mut self, id: &str) -> Result<(), ConfigurationError> {
        let system = self.catalog.get(id)?.clone();
        self.set_system(system);
        Ok(())
    }

    /// Make `system` active: every actual and target returns to its default
    /// and history is refilled with the default state.
    pub fn set_system(&mut self, system: ReactionSystem) {
        log::info!("switching to reaction system '{}' ({})", system.id, system.equation);
        self.system = system;
        self.restart();
    }

    /// Explicit reset of the current system.
    pub fn reset(&mut self) {
        log::info!("resetting reaction system '{}'", self.system.id);
        self.restart();
    }

    fn restart(&mut self) {
        self.model.reset();
        self.history.fill(Self::initial_sample());
        self.regenerate();
    }

    /// Route one queued UI event.
    pub fn apply_control(&mut self, event: ControlEvent) -> Result<(), ConfigurationError> {
        match event {
            ControlEvent::Stress(kind) => self.apply_stress(kind),
            ControlEvent::Slider(value) => self.set_slider(value),
            ControlEvent::SelectSystem(id) => self.select_system(&id)?,
            ControlEvent::Reset => self.reset(),
        }
        Ok(())
    }

    // -- Tick --

    /// Advance one frame.
    ///
    /// History is written only after the new state passes validation, so a
    /// rejected tick leaves state, history and mesh exactly as they were.
    pub fn tick(&mut self) -> Result<SimulationState, TickError> {
        let state = match self.model.tick(&self.system) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("tick {} rejected: {}", self.frame + 1, e);
                return Err(e);
            }
        };
        self.history.record(state.position, state.concentration);
        self.frame += 1;
        self.regenerate();
        Ok(state)
    }

    fn regenerate(&mut self) {
        self.field.apply(&mut self.mesh, &self.history, &self.system, self.frame);
    }

    // -- Accessors --

    pub fn state(&self) -> &SimulationState {
        self.model.state()
    }

    /// Ideal equilibrium for the current temperature and dilution.
    pub fn ideal_position(&self) -> f32 {
        self.model.ideal_position(&self.system)
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn system(&self) -> &ReactionSystem {
        &self.system
    }

    pub fn catalog(&self) -> &ReactionCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Ticks since start. Drives the noise scroll; not reset on system switch.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn slider(&self) -> f32 {
        self.state().target_position * 100.0
    }

    pub fn status(&self) -> SimulationStatus {
        let s = self.state();
        SimulationStatus {
            system: self.system.id.clone(),
            equation: self.system.equation.clone(),
            description: self.system.description.clone(),
            position: s.position,
            target_position: s.target_position,
            concentration: s.concentration,
            dilution: s.dilution,
            temperature: s.temperature,
            slider: self.slider(),
            frame: self.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Rgb;
    use crate::config::TerrainConfig;

    const CATALOG: &str = r##"{
        "default": "rb",
        "systems": [
            { "id": "rb", "equation": "R ⇌ B", "reactant_colour": "#ff0000",
              "product_colour": "#0000ff", "is_endothermic": true, "delta_n": 0 },
            { "id": "driven", "equation": "X ⇌ Y", "reactant_colour": "#00ff00",
              "product_colour": "#ffffff", "is_endothermic": true, "delta_n": 1,
              "temperature_driven": true }
        ]
    }"##;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            history_len: 64,
            terrain: TerrainConfig { size: 100.0, resolution: 8 },
            ..SimulationConfig::default()
        }
    }

    fn sim() -> Simulation {
        Simulation::new(small_config(), ReactionCatalog::from_json(CATALOG).unwrap())
    }

    #[test]
    fn starts_on_default_system() {
        let s = sim();
        assert_eq!(s.system().id, "rb");
        assert_eq!(*s.state(), SimulationState::default());
        assert_eq!(s.frame(), 0);
        assert_eq!(s.history().capacity(), 64);
    }

    #[test]
    fn built_in_defaults_construct() {
        let s = Simulation::with_defaults().unwrap();
        assert_eq!(s.history().capacity(), 2100);
        assert_eq!(s.mesh().vertex_count(), 65 * 65);
    }

    #[test]
    fn mesh_is_populated_before_first_tick() {
        let s = sim();
        let centre = s.mesh().vertices().iter().find(|v| v.x == 0.0).unwrap();
        assert!((centre.r - 0.5).abs() < 1e-5);
        assert!((centre.b - 0.5).abs() < 1e-5);
        assert!(s.mesh().vertices().iter().any(|v| v.z > 1.0));
    }

    #[test]
    fn tick_records_before_field_reads() {
        let mut s = sim();
        s.set_target_position(1.0);
        let state = s.tick().unwrap();
        assert_eq!(s.frame(), 1);
        assert_eq!(s.history().latest(), HistorySample::new(state.position, state.concentration));

        // Near-edge row reflects this tick's state, not last tick's.
        let v = s.mesh().vertices().iter().find(|v| v.y == -50.0 && v.x == 0.0).unwrap();
        let expected = Rgb::RED.lerp(Rgb::BLUE, 0.5 + (state.position - 0.5));
        assert!((v.b - expected.b).abs() < 1e-5);
        assert!(state.position > 0.5);
    }

    #[test]
    fn product_stress_scenario() {
        let mut s = sim();
        s.apply_stress(StressKind::Product);
        assert!((s.state().target_position - 0.6).abs() < 1e-6);
        for _ in 0..300 {
            s.tick().unwrap();
        }
        assert!((s.state().position - 0.6).abs() < 0.001);
        assert!((s.slider() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn select_system_resets_state_and_history() {
        let mut s = sim();
        s.apply_stress(StressKind::Product);
        s.apply_stress(StressKind::Heat);
        s.apply_stress(StressKind::Dilute);
        for _ in 0..30 {
            s.tick().unwrap();
        }
        let frame = s.frame();

        s.select_system("driven").unwrap();
        assert_eq!(s.system().id, "driven");
        let st = s.state();
        assert_eq!(st.position, 0.5);
        assert_eq!(st.concentration, 1.0);
        assert_eq!(st.dilution, 1.0);
        assert_eq!(st.temperature, 0.0);
        for i in 0..=16 {
            assert_eq!(s.history().lookup(i as f32 / 16.0), HistorySample::new(0.5, 1.0));
        }
        assert_eq!(s.frame(), frame);
    }

    #[test]
    fn unknown_system_is_error_and_changes_nothing() {
        let mut s = sim();
        s.apply_stress(StressKind::Product);
        let before = *s.state();
        let err = s.select_system("nope").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownSystem(_)));
        assert_eq!(s.system().id, "rb");
        assert_eq!(*s.state(), before);
    }

    #[test]
    fn controls_route_to_model() {
        let mut s = sim();
        s.apply_control(ControlEvent::Slider(80.0)).unwrap();
        assert!((s.state().target_position - 0.8).abs() < 1e-6);
        s.apply_control(ControlEvent::Slider(250.0)).unwrap();
        assert_eq!(s.state().target_position, 1.0);
        s.apply_control(ControlEvent::Stress(StressKind::Reactant)).unwrap();
        assert!((s.state().target_position - 0.9).abs() < 1e-6);
        s.apply_control(ControlEvent::Reset).unwrap();
        assert_eq!(*s.state(), SimulationState::default());
        assert!(s.apply_control(ControlEvent::SelectSystem("nope".into())).is_err());
        s.apply_control(ControlEvent::SelectSystem("driven".into())).unwrap();
        assert_eq!(s.system().id, "driven");
    }

    #[test]
    fn driven_system_follows_temperature() {
        let mut s = sim();
        s.select_system("driven").unwrap();
        for _ in 0..5 {
            s.apply_stress(StressKind::Heat);
        }
        assert!((s.ideal_position() - 0.9).abs() < 1e-6);
        for _ in 0..600 {
            s.tick().unwrap();
        }
        assert!((s.state().target_position - 0.9).abs() < 1e-4);
        assert!((s.state().position - 0.9).abs() < 0.01);
    }

    #[test]
    fn rejected_tick_leaves_history_untouched() {
        let mut s = sim();
        // Bypasses config validation to reach a non-finite state.
        let poisoned = SimulationConfig {
            stress: crate::config::StressParams {
                concentration_step: f32::INFINITY,
                max_concentration: f32::INFINITY,
                ..Default::default()
            },
            ..small_config()
        };
        s.model = StateModel::new(&poisoned);
        s.apply_stress(StressKind::Product);
        let cursor = s.history().cursor();
        let latest = s.history().latest();
        let mesh_before: Vec<f32> = s.mesh().as_floats().to_vec();

        assert!(s.tick().is_err());
        assert_eq!(s.frame(), 0);
        assert_eq!(s.history().cursor(), cursor);
        assert_eq!(s.history().latest(), latest);
        assert_eq!(s.mesh().as_floats(), &mesh_before[..]);
    }

    #[test]
    fn config_is_validated_on_construction() {
        let config = SimulationConfig { history_len: 0, ..small_config() };
        let s = Simulation::new(config, ReactionCatalog::from_json(CATALOG).unwrap());
        assert_eq!(s.config().history_len, 1);
        assert_eq!(s.history().capacity(), 1);
    }

    #[test]
    fn overflowing_config_values_keep_ticking() {
        let json = r#"{
            "history_len": 64,
            "terrain": { "resolution": 8 },
            "stress": { "concentration_step": 1e39, "max_concentration": 1e39 },
            "field": { "peak_amplitude": 1e39 }
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        let mut s = Simulation::new(config, ReactionCatalog::from_json(CATALOG).unwrap());
        s.apply_stress(StressKind::Product);
        for _ in 0..200 {
            s.tick().unwrap();
        }
        assert_eq!(s.frame(), 200);
        assert!((s.state().concentration - 1.1).abs() < 1e-3);
        assert!(s.mesh().vertices().iter().all(|v| v.z.is_finite()));
    }

    #[test]
    fn status_serializes() {
        let mut s = sim();
        s.set_slider(25.0);
        let json = s.status().to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["system"], "rb");
        assert_eq!(v["slider"], 25.0);
        assert_eq!(v["frame"], 0);
    }
}
