//! Prediction results emitted by the scoring service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scored message: the decoded class label for a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Unique prediction identifier
    pub prediction_id: String,

    /// Request this prediction answers
    pub request_id: String,

    /// Predicted class label, decoded through the target encoder
    pub label: String,

    /// Raw integer code the model produced
    pub code: usize,

    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    pub fn new(request_id: impl Into<String>, label: impl Into<String>, code: usize) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            request_id: request_id.into(),
            label: label.into(),
            code,
            timestamp: Utc::now(),
        }
    }
}
