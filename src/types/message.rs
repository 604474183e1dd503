//! Incoming scoring request messages

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One row to score: a request identifier plus a feature-name → value map.
///
/// Consumed and discarded after producing a single prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// Caller-supplied identifier echoed back with the prediction
    pub request_id: String,

    /// Feature values keyed by column name; numbers for numerical columns,
    /// strings for categorical ones
    pub data: HashMap<String, Value>,
}
