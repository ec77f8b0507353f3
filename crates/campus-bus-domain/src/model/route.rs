use serde::{Deserialize, Serialize};

/// Bus route reference data. Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    /// Display name, e.g. "Uttara - DSC". Bus records refer to routes by this name.
    pub name: String,
    /// Stop names in travel order
    pub stops: Vec<String>,
    /// Scheduled departure, as shown to riders (e.g. "07:30 AM")
    pub start_time: String,
}
