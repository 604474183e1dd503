//! Decision tree classifier over the encoded feature matrix.
//!
//! The tree consumes the preprocessor's output: integer codes for
//! categorical columns, raw numbers for numerical ones. Hyperparameter
//! choice is configuration, not tuned here.

use crate::config::ModelConfig;
use crate::error::{PipelineError, Result};
use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Trained classification model, serializable as part of the artifact
/// bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    tree: DecisionTree<f64, usize>,
    n_features: usize,
}

impl Classifier {
    /// Fit a decision tree on the encoded training matrix.
    ///
    /// `y` holds target codes from the fitted target encoder.
    pub fn train(x: &Array2<f64>, y: &[usize], params: &ModelConfig) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(PipelineError::Training(
                "cannot train on an empty feature matrix".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(PipelineError::Training(format!(
                "feature matrix has {} rows, target has {}",
                x.nrows(),
                y.len()
            )));
        }

        let n_features = x.ncols();
        let dataset = Dataset::new(x.clone(), Array1::from_vec(y.to_vec()));
        let tree = DecisionTree::params()
            .max_depth(Some(params.max_depth))
            .min_weight_split(params.min_weight_split)
            .fit(&dataset)
            .map_err(|e| PipelineError::Training(e.to_string()))?;

        info!(
            rows = x.nrows(),
            features = n_features,
            max_depth = params.max_depth,
            "Classifier trained"
        );

        Ok(Self { tree, n_features })
    }

    /// Predict target codes for each row of the encoded matrix
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        if x.ncols() != self.n_features {
            return Err(PipelineError::Data(format!(
                "input has {} columns, model expects {}",
                x.ncols(),
                self.n_features
            )));
        }
        Ok(self.tree.predict(x).to_vec())
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
