use serde::{Deserialize, Serialize};

use crate::route::EnclosurePolicy;

/// Defaults for routes the router draws on its own: search results and
/// shield stitches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub enclosure: EnclosurePolicy,
    pub primitive_vias: bool,
    /// Cutoff for the grid and visibility searches.
    pub max_search_steps: Option<usize>,
    /// Treat wires drawn by earlier calls as obstructions in searches.
    pub avoid_routed: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            enclosure: EnclosurePolicy::Uniform,
            primitive_vias: true,
            max_search_steps: None,
            avoid_routed: false,
        }
    }
}
