//! End-to-end training pipeline.
//!
//! Linear sequence: load raw tables, fit the target encoder and feature
//! preprocessor on training data only, transform both splits with the
//! train-fitted instances, train the classifier, evaluate on the test
//! split, then persist the artifact bundle. Any fit or evaluation failure
//! aborts before a single artifact is written, so `latest-*` never points
//! at a mismatched bundle.

use crate::artifacts::{ArtifactKind, ArtifactStore};
use crate::config::AppConfig;
use crate::data::load_table;
use crate::error::Result;
use crate::model::{ClassificationReport, Classifier};
use crate::preprocess::{FeaturePreprocessor, FeatureSchema, LabelEncoder};
use tracing::info;

/// One-shot training run over the configured train/test tables
pub struct TrainingPipeline {
    config: AppConfig,
}

impl TrainingPipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the full train → evaluate → persist sequence.
    ///
    /// Returns the evaluation report on success.
    pub fn run(&self) -> Result<ClassificationReport> {
        let features = &self.config.features;

        info!("Loading raw tables");
        let df_train = load_table(&self.config.data.train_path, features)?;
        let df_test = load_table(&self.config.data.test_path, features)?;

        let schema = FeatureSchema::new(features.numerical.clone(), features.categorical.clone())?;
        let x_train = df_train.select(schema.feature_names())?;
        let y_train = df_train.categorical(&features.target)?;
        let x_test = df_test.select(schema.feature_names())?;
        let y_test = df_test.categorical(&features.target)?;

        info!("Fitting preprocessors on training data");
        let mut target_encoder = LabelEncoder::new(features.target.clone());
        target_encoder.fit(y_train)?;
        let y_train_codes = target_encoder.transform(y_train)?;

        let mut feature_preprocessor = FeaturePreprocessor::new(schema);
        let x_train_encoded = feature_preprocessor.fit_transform(&x_train)?;

        // The test split is transformed with the train-fitted instances; an
        // unseen category here is a train/test skew bug and fails the run.
        let x_test_encoded = feature_preprocessor.transform(&x_test)?;
        let y_test_codes = target_encoder.transform(y_test)?;

        info!("Training classifier");
        let feature_names = feature_preprocessor.schema().feature_names().to_vec();
        let train_matrix = x_train_encoded.to_matrix(&feature_names)?;
        let model = Classifier::train(&train_matrix, &y_train_codes, &self.config.model)?;

        info!("Evaluating on test data");
        let test_matrix = x_test_encoded.to_matrix(&feature_names)?;
        let predictions = model.predict(&test_matrix)?;
        let report = ClassificationReport::compute(
            &y_test_codes,
            &predictions,
            target_encoder.classes(),
        )?;
        info!("Classification report:\n{report}");

        info!("Storing artifact bundle");
        let store = ArtifactStore::new(&self.config.artifacts.dir);
        let timestamp = ArtifactStore::run_timestamp();
        store.save(ArtifactKind::TargetPreprocessor, &timestamp, &target_encoder)?;
        store.save(
            ArtifactKind::FeaturePreprocessor,
            &timestamp,
            &feature_preprocessor,
        )?;
        store.save(ArtifactKind::Model, &timestamp, &model)?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ArtifactsConfig, DataConfig, FeatureConfig, LoggingConfig, ModelConfig, NatsConfig,
    };
    use crate::error::PipelineError;
    use std::fs;
    use std::path::Path;

    fn test_config(dir: &Path) -> AppConfig {
        AppConfig {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "in".to_string(),
                prediction_subject: "out".to_string(),
            },
            data: DataConfig {
                train_path: dir.join("train.csv").to_string_lossy().into_owned(),
                test_path: dir.join("test.csv").to_string_lossy().into_owned(),
            },
            features: FeatureConfig {
                numerical: vec!["age".to_string()],
                categorical: vec!["city".to_string()],
                target: "income".to_string(),
            },
            model: ModelConfig {
                max_depth: 4,
                min_weight_split: 1.0,
            },
            artifacts: ArtifactsConfig {
                dir: dir.join("models").to_string_lossy().into_owned(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    fn write_tables(dir: &Path) {
        fs::write(
            dir.join("train.csv"),
            "age,city,income\n\
             25,NY,low\n\
             30,NY,low\n\
             28,LA,low\n\
             55,NY,high\n\
             60,LA,high\n\
             58,LA,high\n",
        )
        .unwrap();
        fs::write(
            dir.join("test.csv"),
            "age,city,income\n\
             26,NY,low\n\
             59,LA,high\n",
        )
        .unwrap();
    }

    #[test]
    fn test_run_trains_evaluates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());

        let report = TrainingPipeline::new(test_config(dir.path())).run().unwrap();
        assert_eq!(report.total_support, 2);
        assert_eq!(report.classes.len(), 2);

        let models = dir.path().join("models");
        assert!(models.join("latest-target-preprocessor").exists());
        assert!(models.join("latest-feature-preprocessor").exists());
        assert!(models.join("latest-model").exists());
    }

    #[test]
    fn test_missing_column_aborts_before_persistence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("train.csv"), "age,income\n25,low\n").unwrap();
        fs::write(dir.path().join("test.csv"), "age,income\n26,low\n").unwrap();

        let result = TrainingPipeline::new(test_config(dir.path())).run();
        assert!(matches!(result, Err(PipelineError::MissingColumn(_))));
        assert!(!dir.path().join("models").exists());
    }

    #[test]
    fn test_empty_table_aborts_before_persistence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("train.csv"), "age,city,income\n").unwrap();
        fs::write(dir.path().join("test.csv"), "age,city,income\n26,NY,low\n").unwrap();

        let result = TrainingPipeline::new(test_config(dir.path())).run();
        assert!(matches!(result, Err(PipelineError::EmptyColumn(_))));
        assert!(!dir.path().join("models").exists());
    }

    #[test]
    fn test_unseen_test_category_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("train.csv"),
            "age,city,income\n25,NY,low\n55,NY,high\n",
        )
        .unwrap();
        fs::write(dir.path().join("test.csv"), "age,city,income\n26,SF,low\n").unwrap();

        let result = TrainingPipeline::new(test_config(dir.path())).run();
        match result {
            Err(PipelineError::UnseenCategory { column, value }) => {
                assert_eq!(column, "city");
                assert_eq!(value, "SF");
            }
            other => panic!("expected UnseenCategory, got {other:?}"),
        }
        assert!(!dir.path().join("models").exists());
    }
}
