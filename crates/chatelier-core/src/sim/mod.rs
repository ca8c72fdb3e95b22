pub mod history;
pub mod state;

pub use history::{HistoryBuffer, HistorySample};
pub use state::{SimulationState, StateModel, StressKind, TEMPERATURE_LIMIT};
