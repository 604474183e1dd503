//! NATS message producer for predictions

use crate::types::Prediction;
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing predictions to NATS
#[derive(Clone)]
pub struct PredictionProducer {
    client: Client,
    subject: String,
}

impl PredictionProducer {
    /// Create a new prediction producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a prediction
    pub async fn publish(&self, prediction: &Prediction) -> Result<()> {
        let payload = serde_json::to_vec(prediction)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            prediction_id = %prediction.prediction_id,
            request_id = %prediction.request_id,
            label = %prediction.label,
            "Published prediction"
        );

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
