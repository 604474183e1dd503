//! Classifier training and evaluation

pub mod classifier;
pub mod evaluation;

pub use classifier::Classifier;
pub use evaluation::ClassificationReport;
