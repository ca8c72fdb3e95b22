//! `#[wasm_bindgen]` exports for the equilibrium simulator.
//!
//! The JS host calls `sim_init` once, then `sim_tick` from every
//! `requestAnimationFrame`, and reads the terrain buffers straight out of
//! WASM memory:
//!
//! ```text
//! vertices: get_vertex_count() × 6 floats (x, y, z, r, g, b) at get_vertices_ptr()
//! indices:  get_index_count() × u32 at get_indices_ptr()
//! ```
//!
//! Index data never changes after init; vertex data is rewritten every tick.

pub mod runner;

pub use runner::SimulationRunner;

use std::cell::RefCell;

use chatelier_core::{ReactionCatalog, Simulation, SimulationConfig, TerrainVertex};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SimulationRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut SimulationRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Simulation not initialized. Call sim_init() first.");
        f(runner)
    })
}

fn install(sim: Simulation) {
    let runner = SimulationRunner::new(sim);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second init (host re-initialising) keeps the first logger.
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::debug_1(&JsValue::from_str("chatelier: logger already installed"));
    }
}

/// Start with the default configuration and built-in reaction catalog.
#[wasm_bindgen]
pub fn sim_init() -> Result<(), JsValue> {
    init_logging();
    let sim = Simulation::with_defaults().map_err(|e| JsValue::from_str(&e.to_string()))?;
    install(sim);
    log::info!("chatelier: initialized");
    Ok(())
}

/// Start with host-supplied JSON. An empty string selects the built-in
/// configuration / catalog.
#[wasm_bindgen]
pub fn sim_init_with(config_json: &str, catalog_json: &str) -> Result<(), JsValue> {
    init_logging();
    let config = if config_json.trim().is_empty() {
        SimulationConfig::default()
    } else {
        SimulationConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    let catalog = if catalog_json.trim().is_empty() {
        ReactionCatalog::load()
    } else {
        ReactionCatalog::from_json(catalog_json)
    }
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    install(Simulation::new(config, catalog));
    log::info!("chatelier: initialized with custom configuration");
    Ok(())
}

#[wasm_bindgen]
pub fn sim_tick() {
    with_runner(|r| r.tick());
}

// ---- Controls ----

/// Queue a stress event by name (`reactant`, `product`, `heat`, `cool`,
/// `reduce-volume`, `dilute`). Returns false for unknown names.
#[wasm_bindgen]
pub fn sim_stress(name: &str) -> bool {
    with_runner(|r| r.push_stress(name))
}

/// Queue a slider move; `value` in [0, 100].
#[wasm_bindgen]
pub fn sim_set_slider(value: f32) {
    with_runner(|r| r.push_slider(value));
}

#[wasm_bindgen]
pub fn sim_select_system(id: &str) -> Result<(), JsValue> {
    with_runner(|r| r.push_select_system(id)).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn sim_reset() {
    with_runner(|r| r.push_reset());
}

// ---- Buffer accessors ----

#[wasm_bindgen]
pub fn get_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vertices_ptr())
}

#[wasm_bindgen]
pub fn get_vertex_count() -> u32 {
    with_runner(|r| r.vertex_count())
}

#[wasm_bindgen]
pub fn get_vertex_floats() -> u32 {
    TerrainVertex::FLOATS as u32
}

#[wasm_bindgen]
pub fn get_indices_ptr() -> *const u32 {
    with_runner(|r| r.indices_ptr())
}

#[wasm_bindgen]
pub fn get_index_count() -> u32 {
    with_runner(|r| r.index_count())
}

#[wasm_bindgen]
pub fn get_terrain_size() -> f32 {
    with_runner(|r| r.terrain_size())
}

#[wasm_bindgen]
pub fn get_terrain_resolution() -> u32 {
    with_runner(|r| r.terrain_resolution())
}

// ---- Readouts ----

#[wasm_bindgen]
pub fn get_position() -> f32 {
    with_runner(|r| r.simulation().state().position)
}

#[wasm_bindgen]
pub fn get_concentration() -> f32 {
    with_runner(|r| r.simulation().state().concentration)
}

#[wasm_bindgen]
pub fn get_dilution() -> f32 {
    with_runner(|r| r.simulation().state().dilution)
}

#[wasm_bindgen]
pub fn get_temperature() -> f32 {
    with_runner(|r| r.simulation().state().temperature)
}

#[wasm_bindgen]
pub fn get_slider() -> f32 {
    with_runner(|r| r.simulation().slider())
}

/// Status readout as JSON (system, equation, description, scalars, frame).
#[wasm_bindgen]
pub fn get_status_json() -> String {
    with_runner(|r| r.status_json().to_string())
}

/// Catalog ids in file order, for populating the system picker.
#[wasm_bindgen]
pub fn get_system_ids() -> js_sys::Array {
    with_runner(|r| {
        r.system_ids()
            .into_iter()
            .map(JsValue::from)
            .collect::<js_sys::Array>()
    })
}
