use chatelier_core::{
    ConfigurationError, ControlEvent, ControlQueue, Simulation, StressKind,
};

/// Wires the simulation core to the browser frame loop.
///
/// The crate root keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`. UI callbacks only queue controls; `tick`
/// applies them and advances the simulation once per animation frame.
pub struct SimulationRunner {
    sim: Simulation,
    controls: ControlQueue,
    /// Last serialized status, refreshed every tick.
    status_json: String,
}

impl SimulationRunner {
    pub fn new(sim: Simulation) -> Self {
        let mut runner = Self {
            sim,
            controls: ControlQueue::new(),
            status_json: String::new(),
        };
        runner.refresh_status();
        runner
    }

    /// Queue a stress by its UI name. Returns false for unknown names.
    pub fn push_stress(&mut self, name: &str) -> bool {
        match StressKind::parse(name) {
            Some(kind) => {
                self.controls.push(ControlEvent::Stress(kind));
                true
            }
            None => {
                log::warn!("unknown stress '{}'", name);
                false
            }
        }
    }

    /// Queue a slider move (0-100).
    pub fn push_slider(&mut self, value: f32) {
        self.controls.push(ControlEvent::Slider(value));
    }

    /// Queue a system switch. The id is checked now so the caller gets the
    /// error synchronously; the switch itself happens on the next tick.
    pub fn push_select_system(&mut self, id: &str) -> Result<(), ConfigurationError> {
        self.sim.catalog().get(id)?;
        self.controls.push(ControlEvent::SelectSystem(id.to_string()));
        Ok(())
    }

    pub fn push_reset(&mut self) {
        self.controls.push(ControlEvent::Reset);
    }

    /// Run one frame: apply queued controls, advance the simulation,
    /// refresh the status readout.
    pub fn tick(&mut self) {
        for event in self.controls.drain() {
            if let Err(e) = self.sim.apply_control(event) {
                log::error!("control rejected: {}", e);
            }
        }

        // A rejected tick keeps last frame's buffers (the core logs it), but
        // the controls above may have moved targets.
        let _ = self.sim.tick();
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        match self.sim.status().to_json() {
            Ok(json) => self.status_json = json,
            Err(e) => log::error!("status serialization failed: {}", e),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn pending_controls(&self) -> usize {
        self.controls.len()
    }

    // ---- Pointer accessors for zero-copy reads ----

    pub fn vertices_ptr(&self) -> *const f32 {
        self.sim.mesh().vertices_ptr()
    }

    pub fn vertex_count(&self) -> u32 {
        self.sim.mesh().vertex_count()
    }

    pub fn indices_ptr(&self) -> *const u32 {
        self.sim.mesh().indices_ptr()
    }

    pub fn index_count(&self) -> u32 {
        self.sim.mesh().index_count()
    }

    pub fn terrain_size(&self) -> f32 {
        self.sim.mesh().size()
    }

    pub fn terrain_resolution(&self) -> u32 {
        self.sim.mesh().resolution()
    }

    // ---- Readouts ----

    pub fn status_json(&self) -> &str {
        &self.status_json
    }

    pub fn system_ids(&self) -> Vec<String> {
        self.sim.catalog().ids().map(str::to_string).collect()
    }
}
