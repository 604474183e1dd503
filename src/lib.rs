//! Income Prediction Pipeline Library
//!
//! Tabular classification with a shared preprocessing core: a training
//! pipeline fits label encoders and a decision tree over CSV tables, and a
//! streaming scoring service applies the frozen bundle to messages arriving
//! over NATS.

pub mod artifacts;
pub mod config;
pub mod consumer;
pub mod data;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod model;
pub mod preprocess;
pub mod producer;
pub mod scoring;
pub mod train;
pub mod types;

pub use artifacts::{ArtifactKind, ArtifactStore};
pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{PipelineError, Result};
pub use frame::{Column, Frame};
pub use model::{ClassificationReport, Classifier};
pub use preprocess::{FeaturePreprocessor, FeatureSchema, LabelEncoder};
pub use producer::PredictionProducer;
pub use scoring::ScoringService;
pub use train::TrainingPipeline;
pub use types::{Prediction, ScoringRequest};
