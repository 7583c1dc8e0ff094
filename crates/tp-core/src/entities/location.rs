use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One candidate returned by the geocoding resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub display: String,
    /// Resolver-assigned relevance, higher is better.
    pub rank: f64,
}
