//! Scoring of individual messages with a frozen artifact bundle.
//!
//! The bundle is loaded once at startup and never refit: scoring applies
//! `transform`, not `fit_transform`, so a message can never perturb the
//! encoders. Per-message failures are returned to the caller for
//! skip-and-continue handling; nothing here ends the consuming loop.

use crate::artifacts::{ArtifactKind, ArtifactStore};
use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use crate::model::Classifier;
use crate::preprocess::{FeaturePreprocessor, LabelEncoder};
use crate::types::{Prediction, ScoringRequest};
use serde_json::Value;
use tracing::info;

/// Frozen (target encoder, feature preprocessor, model) triple applied to
/// one message at a time
pub struct ScoringService {
    target_encoder: LabelEncoder,
    preprocessor: FeaturePreprocessor,
    model: Classifier,
}

impl ScoringService {
    /// Load the latest artifact bundle from the store
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        let target_encoder: LabelEncoder = store.load_latest(ArtifactKind::TargetPreprocessor)?;
        let preprocessor: FeaturePreprocessor =
            store.load_latest(ArtifactKind::FeaturePreprocessor)?;
        let model: Classifier = store.load_latest(ArtifactKind::Model)?;

        info!(
            classes = ?target_encoder.classes(),
            features = preprocessor.schema().feature_names().len(),
            "Scoring service loaded latest artifact bundle"
        );

        Ok(Self {
            target_encoder,
            preprocessor,
            model,
        })
    }

    /// Build a service from already loaded parts
    pub fn from_parts(
        target_encoder: LabelEncoder,
        preprocessor: FeaturePreprocessor,
        model: Classifier,
    ) -> Self {
        Self {
            target_encoder,
            preprocessor,
            model,
        }
    }

    /// Score one request: single-row frame → frozen transform → predict →
    /// decode the label code
    pub fn score(&self, request: &ScoringRequest) -> Result<Prediction> {
        let row = self.single_row_frame(&request.data)?;
        let encoded = self.preprocessor.transform(&row)?;

        let feature_names = self.preprocessor.schema().feature_names().to_vec();
        let matrix = encoded.to_matrix(&feature_names)?;
        let code = self.model.predict(&matrix)?[0];

        let label = self
            .target_encoder
            .inverse(code)
            .ok_or_else(|| {
                PipelineError::Data(format!("model produced unknown label code {code}"))
            })?
            .to_string();

        Ok(Prediction::new(request.request_id.clone(), label, code))
    }

    /// One-row frame from the message's feature map, typed by the schema
    fn single_row_frame(&self, data: &std::collections::HashMap<String, Value>) -> Result<Frame> {
        let schema = self.preprocessor.schema();
        let mut frame = Frame::new();

        for name in schema.numerical() {
            let value = data
                .get(name)
                .ok_or_else(|| PipelineError::MissingColumn(name.clone()))?;
            let number = value.as_f64().ok_or_else(|| {
                PipelineError::Data(format!("column {name:?}: {value} is not a number"))
            })?;
            frame.push_column(name.clone(), Column::Numeric(vec![number]))?;
        }
        for name in schema.categorical() {
            let value = data
                .get(name)
                .ok_or_else(|| PipelineError::MissingColumn(name.clone()))?;
            let text = match value {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            frame.push_column(name.clone(), Column::Categorical(vec![text]))?;
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::preprocess::FeatureSchema;
    use serde_json::json;
    use std::collections::HashMap;

    fn service() -> ScoringService {
        // Train a tiny bundle by hand: low incomes for the young, high for
        // the old, cities NY/LA.
        let schema =
            FeatureSchema::new(vec!["age".to_string()], vec!["city".to_string()]).unwrap();
        let mut train = Frame::new();
        train
            .push_column("age", Column::Numeric(vec![25.0, 30.0, 55.0, 60.0]))
            .unwrap();
        train
            .push_column(
                "city",
                Column::Categorical(vec![
                    "NY".into(),
                    "LA".into(),
                    "NY".into(),
                    "LA".into(),
                ]),
            )
            .unwrap();

        let mut preprocessor = FeaturePreprocessor::new(schema);
        let encoded = preprocessor.fit_transform(&train).unwrap();

        let mut target_encoder = LabelEncoder::new("income");
        let codes = target_encoder
            .fit_transform(&["low", "low", "high", "high"])
            .unwrap();

        let matrix = encoded
            .to_matrix(&["age".to_string(), "city".to_string()])
            .unwrap();
        let model = Classifier::train(
            &matrix,
            &codes,
            &ModelConfig {
                max_depth: 3,
                min_weight_split: 1.0,
            },
        )
        .unwrap();

        ScoringService::from_parts(target_encoder, preprocessor, model)
    }

    fn request(age: f64, city: &str) -> ScoringRequest {
        let mut data = HashMap::new();
        data.insert("age".to_string(), json!(age));
        data.insert("city".to_string(), json!(city));
        ScoringRequest {
            request_id: "req-1".to_string(),
            data,
        }
    }

    #[test]
    fn test_score_decodes_label() {
        let svc = service();
        let prediction = svc.score(&request(26.0, "NY")).unwrap();
        assert_eq!(prediction.request_id, "req-1");
        assert_eq!(prediction.label, "low");

        let prediction = svc.score(&request(58.0, "LA")).unwrap();
        assert_eq!(prediction.label, "high");
    }

    #[test]
    fn test_unseen_category_is_message_scoped() {
        let svc = service();
        let err = svc.score(&request(30.0, "Zurich")).unwrap_err();
        match &err {
            PipelineError::UnseenCategory { column, value } => {
                assert_eq!(column, "city");
                assert_eq!(value, "Zurich");
            }
            other => panic!("expected UnseenCategory, got {other:?}"),
        }
        assert!(err.is_message_scoped());

        // The service keeps working for the next message
        assert!(svc.score(&request(26.0, "NY")).is_ok());
    }

    #[test]
    fn test_missing_feature_is_message_scoped() {
        let svc = service();
        let mut data = HashMap::new();
        data.insert("age".to_string(), json!(30));
        let req = ScoringRequest {
            request_id: "req-2".to_string(),
            data,
        };
        let err = svc.score(&req).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "city"));
        assert!(err.is_message_scoped());
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let svc = service();
        let mut data = HashMap::new();
        data.insert("age".to_string(), json!("thirty"));
        data.insert("city".to_string(), json!("NY"));
        let req = ScoringRequest {
            request_id: "req-3".to_string(),
            data,
        };
        let err = svc.score(&req).unwrap_err();
        assert!(err.is_message_scoped());
        assert!(err.to_string().contains("age"));
    }
}
