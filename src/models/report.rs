use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finding of the external completeness audit. The sentinel entry
/// reported when no types exist at all carries no type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteType {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub type_name: Option<String>,
    /// Machine reason string: `no_types_defined`, `no_properties` or
    /// `no_property_values`
    pub reason: String,
}

/// Result of the external completeness audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub incomplete_types: Vec<IncompleteType>,
    pub properties_without_values: Vec<String>,
    /// Stamped locally when the report is received
    #[serde(skip_serializing, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.incomplete_types.is_empty() && self.properties_without_values.is_empty()
    }
}

/// Verdict of the rule-based classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub type_name: String,
    pub explanation: Vec<String>,
}

/// Verdict of the learned-model classifier, with per-type probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiClassification {
    #[serde(rename = "type")]
    pub type_name: String,
    pub explanation: Vec<String>,
    pub probabilities: HashMap<String, f64>,
}
