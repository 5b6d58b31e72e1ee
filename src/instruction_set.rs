//! Named collections of raw instructions.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Named feature instructions, e.g. as served by a configuration endpoint.
///
/// ```json
/// {"features": {"checkout": {"toggle": true, "buckets": ["a", "b"]}}}
/// ```
///
/// Instructions are kept raw and only validated when resolved, so one malformed feature does not
/// prevent the others from parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionSet {
    /// Raw instructions by feature name.
    #[serde(default)]
    pub features: BTreeMap<String, serde_json::Value>,
}

impl InstructionSet {
    /// Parse an instruction set from JSON.
    pub fn from_json(json: &str) -> Result<InstructionSet> {
        Ok(serde_json::from_str(json)?)
    }

    /// The raw instruction of `feature_name`.
    pub fn get(&self, feature_name: &str) -> Option<&serde_json::Value> {
        self.features.get(feature_name)
    }

    /// Add or replace the instruction of `feature_name`.
    pub fn insert(&mut self, feature_name: impl Into<String>, instruction: serde_json::Value) {
        self.features.insert(feature_name.into(), instruction);
    }

    /// Iterate over features and their raw instructions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> + '_ {
        self.features
            .iter()
            .map(|(name, instruction)| (name.as_str(), instruction))
    }
}
