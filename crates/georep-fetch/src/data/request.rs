use std::fmt;

use serde::Serialize;

/// Identifies the resource one transfer attempt fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TransferRequest {
    replicable_name: String,
    model_record_id: u64,
}

impl TransferRequest {
    pub fn new(replicable_name: impl Into<String>, model_record_id: u64) -> Self {
        Self {
            replicable_name: replicable_name.into(),
            model_record_id,
        }
    }

    pub fn replicable_name(&self) -> &str { &self.replicable_name }

    pub fn model_record_id(&self) -> u64 { self.model_record_id }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.replicable_name, self.model_record_id)
    }
}
