//! Error types for the simulation core.
//!
//! Control inputs are clamped rather than rejected, so the only failures are
//! bad configuration (caught at load time) and ticks that would poison the
//! state with non-finite values.

use thiserror::Error;

/// Catalog and configuration failures.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Lookup of a reaction system id that is not in the catalog.
    #[error("unknown reaction system '{0}'")]
    UnknownSystem(String),

    /// The catalog's declared default id does not name any of its systems.
    #[error("default reaction system '{0}' is not in the catalog")]
    MissingDefault(String),

    #[error("reaction catalog is empty")]
    EmptyCatalog,

    #[error("duplicate reaction system id '{0}'")]
    DuplicateSystem(String),

    /// A colour string that is not `#rrggbb` / `rrggbb`.
    #[error("invalid colour '{value}' in reaction system '{system}'")]
    InvalidColour { system: String, value: String },

    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A tick that was rejected before any state or history was committed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickError {
    #[error("tick produced non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f32 },
}
