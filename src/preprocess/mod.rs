//! Feature and target preprocessing

pub mod encoder;
pub mod features;

pub use encoder::LabelEncoder;
pub use features::{FeaturePreprocessor, FeatureSchema};
