use crate::sim::state::StressKind;

/// Control events the UI layer can raise.
/// They only ever touch targets; actuals move inside the tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// A stress button was pressed.
    Stress(StressKind),
    /// The equilibrium slider moved; value in [0, 100].
    Slider(f32),
    /// Switch the active reaction system by catalog id.
    SelectSystem(String),
    /// Restore defaults for the current system.
    Reset,
}

/// A queue of control events.
/// JS writes events into the queue; the tick drains them before advancing.
pub struct ControlQueue {
    events: Vec<ControlEvent>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    /// Push a new control event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, ControlEvent> {
        self.events.drain(..)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &ControlEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
