//! Configuration for the training pipeline and the scoring service.
//!
//! Both halves receive an explicit `AppConfig`; there is no process-wide
//! configuration state.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub data: DataConfig,
    pub features: FeatureConfig,
    pub model: ModelConfig,
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming scoring requests
    pub request_subject: String,
    /// Subject for outgoing predictions
    pub prediction_subject: String,
}

/// Raw table locations for training
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub train_path: String,
    pub test_path: String,
}

/// Declared feature schema: which columns feed the model and how
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    /// Columns passed through as numbers
    pub numerical: Vec<String>,
    /// Columns label-encoded before model consumption
    pub categorical: Vec<String>,
    /// The label column
    pub target: String,
}

/// Decision tree hyperparameters
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_min_weight_split")]
    pub min_weight_split: f32,
}

fn default_max_depth() -> usize {
    12
}

fn default_min_weight_split() -> f32 {
    2.0
}

/// Artifact storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory holding timestamped and latest artifact blobs
    pub dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "app_messages".to_string(),
                prediction_subject: "app_predictions".to_string(),
            },
            data: DataConfig {
                train_path: "data/raw/adult.data.csv".to_string(),
                test_path: "data/raw/adult.test.csv".to_string(),
            },
            features: FeatureConfig {
                numerical: vec![
                    "age".to_string(),
                    "fnlwgt".to_string(),
                    "capital_gain".to_string(),
                    "capital_loss".to_string(),
                    "hours_per_week".to_string(),
                ],
                categorical: vec![
                    "workclass".to_string(),
                    "education".to_string(),
                    "marital_status".to_string(),
                    "occupation".to_string(),
                    "relationship".to_string(),
                    "race".to_string(),
                    "gender".to_string(),
                    "native_country".to_string(),
                ],
                target: "income_bracket".to_string(),
            },
            model: ModelConfig {
                max_depth: default_max_depth(),
                min_weight_split: default_min_weight_split(),
            },
            artifacts: ArtifactsConfig {
                dir: "models".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
