//! Reaction system catalog.
//!
//! Loads reaction descriptors from embedded JSON (or a host-supplied document)
//! and validates them once, so every id the simulation holds is known to
//! resolve.

use serde::Deserialize;
use std::collections::HashMap;

use crate::colour::Rgb;
use crate::error::ConfigurationError;

/// Embed the built-in catalog at compile time.
const REACTIONS_JSON: &str = include_str!("../data/reactions.json");

/// Raw JSON reaction structure.
#[derive(Debug, Deserialize)]
pub struct RawReactionSystem {
    pub id: String,
    pub equation: String,
    #[serde(default)]
    pub description: String,
    pub reactant_colour: String,
    pub product_colour: String,
    pub is_endothermic: bool,
    pub delta_n: i32,
    #[serde(default)]
    pub temperature_driven: bool,
}

/// Root structure for the catalog JSON.
#[derive(Debug, Deserialize)]
pub struct CatalogJSON {
    pub default: String,
    pub systems: Vec<RawReactionSystem>,
}

/// Immutable descriptor of one reversible reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionSystem {
    pub id: String,
    /// Display string, e.g. `N2(g) + 3H2(g) ⇌ 2NH3(g)`.
    pub equation: String,
    pub description: String,
    pub reactant_colour: Rgb,
    pub product_colour: Rgb,
    pub is_endothermic: bool,
    /// Moles of gas on the reactant side minus moles on the product side.
    /// Positive means the forward reaction reduces the gas count.
    pub delta_n: i32,
    /// When set, the position target is continuously pulled toward the ideal
    /// equilibrium implied by temperature and dilution.
    pub temperature_driven: bool,
}

impl ReactionSystem {
    /// +1 for endothermic reactions (heat favours products), -1 otherwise.
    pub fn temperature_sign(&self) -> f32 {
        if self.is_endothermic {
            1.0
        } else {
            -1.0
        }
    }

    fn from_raw(raw: RawReactionSystem) -> Result<Self, ConfigurationError> {
        let reactant_colour = parse_colour(&raw.id, &raw.reactant_colour)?;
        let product_colour = parse_colour(&raw.id, &raw.product_colour)?;
        Ok(Self {
            id: raw.id,
            equation: raw.equation,
            description: raw.description,
            reactant_colour,
            product_colour,
            is_endothermic: raw.is_endothermic,
            delta_n: raw.delta_n,
            temperature_driven: raw.temperature_driven,
        })
    }
}

fn parse_colour(system: &str, value: &str) -> Result<Rgb, ConfigurationError> {
    Rgb::from_hex(value).ok_or_else(|| ConfigurationError::InvalidColour {
        system: system.to_string(),
        value: value.to_string(),
    })
}

/// Reaction catalog with O(1) lookup by id, preserving file order.
#[derive(Debug, Clone)]
pub struct ReactionCatalog {
    systems: Vec<ReactionSystem>,
    by_id: HashMap<String, usize>,
    default_id: String,
}

impl ReactionCatalog {
    /// Load the built-in catalog.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::from_json(REACTIONS_JSON)
    }

    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let raw: CatalogJSON = serde_json::from_str(json)?;
        if raw.systems.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut systems = Vec::with_capacity(raw.systems.len());
        let mut by_id = HashMap::with_capacity(raw.systems.len());
        for raw_system in raw.systems {
            let system = ReactionSystem::from_raw(raw_system)?;
            if by_id.contains_key(&system.id) {
                return Err(ConfigurationError::DuplicateSystem(system.id));
            }
            by_id.insert(system.id.clone(), systems.len());
            systems.push(system);
        }

        if !by_id.contains_key(&raw.default) {
            return Err(ConfigurationError::MissingDefault(raw.default));
        }

        log::debug!(
            "reaction catalog loaded: {} systems, default '{}'",
            systems.len(),
            raw.default
        );

        Ok(Self {
            systems,
            by_id,
            default_id: raw.default,
        })
    }

    /// Get a system by id.
    pub fn get(&self, id: &str) -> Result<&ReactionSystem, ConfigurationError> {
        self.by_id
            .get(id)
            .map(|&idx| &self.systems[idx])
            .ok_or_else(|| ConfigurationError::UnknownSystem(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// The default system. Always present: validated at load.
    pub fn default_system(&self) -> &ReactionSystem {
        &self.systems[self.by_id[&self.default_id]]
    }

    /// System ids in file order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
