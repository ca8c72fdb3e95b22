pub mod catalog;
pub mod colour;
pub mod config;
pub mod error;
pub mod field;
pub mod input;
pub mod sim;
pub mod simulation;

// Re-export key types at crate root for convenience
pub use catalog::{ReactionCatalog, ReactionSystem};
pub use colour::Rgb;
pub use config::{EquilibriumParams, FieldParams, SimulationConfig, StressParams, TerrainConfig};
pub use error::{ConfigurationError, TickError};
pub use field::{CoherentNoise, FieldGenerator, FieldSample, TerrainMesh, TerrainVertex};
pub use input::queue::{ControlEvent, ControlQueue};
pub use sim::{HistoryBuffer, HistorySample, SimulationState, StateModel, StressKind, TEMPERATURE_LIMIT};
pub use simulation::{Simulation, SimulationStatus};
