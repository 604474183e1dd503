//! Feature preprocessing shared by training and scoring.
//!
//! One preprocessor instance is fitted during training and serialized with
//! the artifact bundle; scoring reloads and applies the same instance, so
//! the two paths cannot drift apart.

use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use crate::preprocess::encoder::LabelEncoder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Declared feature columns, partitioned into numerical and categorical.
///
/// `feature_names` (numerical followed by categorical) determines the
/// output column order of every transform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    feature_names: Vec<String>,
    numerical: Vec<String>,
    categorical: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from the declared column partition.
    ///
    /// The two sets must be disjoint and non-empty in union.
    pub fn new(numerical: Vec<String>, categorical: Vec<String>) -> Result<Self> {
        if numerical.is_empty() && categorical.is_empty() {
            return Err(PipelineError::Data(
                "feature schema declares no columns".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in numerical.iter().chain(categorical.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::Data(format!(
                    "column {name:?} declared more than once in feature schema"
                )));
            }
        }
        let feature_names = numerical
            .iter()
            .chain(categorical.iter())
            .cloned()
            .collect();
        Ok(Self {
            feature_names,
            numerical,
            categorical,
        })
    }

    /// All feature columns in canonical output order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }
}

/// Encodes categorical columns and passes numerical columns through,
/// returning columns in the canonical schema order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePreprocessor {
    schema: FeatureSchema,
    /// One fitted encoder per categorical column; absent until fit
    encoders: HashMap<String, LabelEncoder>,
    fitted: bool,
}

impl FeaturePreprocessor {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            encoders: HashMap::new(),
            fitted: false,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Encoder for a categorical column, once fitted
    pub fn encoder(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    /// Fit a fresh encoder over each categorical column's training values,
    /// replacing any prior encoder for that column.
    pub fn fit(&mut self, x: &Frame) -> Result<&mut Self> {
        let mut encoders = HashMap::with_capacity(self.schema.categorical.len());
        for name in &self.schema.categorical {
            let values = x.categorical(name)?;
            let mut encoder = LabelEncoder::new(name.clone());
            encoder.fit(values)?;
            encoders.insert(name.clone(), encoder);
        }
        // Numerical columns carry no encoder state but must exist at fit
        // time so a schema typo fails here, not at first transform.
        for name in &self.schema.numerical {
            x.numeric(name)?;
        }
        self.encoders = encoders;
        self.fitted = true;
        Ok(self)
    }

    /// Encode categorical columns and reorder to the schema, dropping any
    /// input columns outside it.
    pub fn transform(&self, x: &Frame) -> Result<Frame> {
        if !self.fitted {
            return Err(PipelineError::NotFitted("FeaturePreprocessor"));
        }
        let mut out = Frame::new();
        for name in &self.schema.feature_names {
            if let Some(encoder) = self.encoders.get(name) {
                let codes = encoder.transform(x.categorical(name)?)?;
                let encoded = codes.into_iter().map(|c| c as f64).collect();
                out.push_column(name.clone(), Column::Numeric(encoded))?;
            } else {
                out.push_column(name.clone(), Column::Numeric(x.numeric(name)?.to_vec()))?;
            }
        }
        Ok(out)
    }

    /// `fit` followed by `transform` over the same frame
    pub fn fit_transform(&mut self, x: &Frame) -> Result<Frame> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec!["age".to_string()], vec!["city".to_string()]).unwrap()
    }

    fn training_frame() -> Frame {
        let mut f = Frame::new();
        f.push_column("age", Column::Numeric(vec![30.0, 40.0])).unwrap();
        f.push_column(
            "city",
            Column::Categorical(vec!["NY".into(), "LA".into()]),
        )
        .unwrap();
        f
    }

    #[test]
    fn test_schema_rejects_overlap() {
        let err = FeatureSchema::new(
            vec!["age".to_string()],
            vec!["age".to_string(), "city".to_string()],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_schema_order_is_numerical_then_categorical() {
        let s = FeatureSchema::new(
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        )
        .unwrap();
        assert_eq!(s.feature_names(), &["a", "b", "c"]);
    }

    #[test]
    fn test_numerical_passthrough_and_categorical_encoding() {
        let mut fp = FeaturePreprocessor::new(schema());
        fp.fit(&training_frame()).unwrap();

        let mut single = Frame::new();
        single.push_column("age", Column::Numeric(vec![35.0])).unwrap();
        single
            .push_column("city", Column::Categorical(vec!["LA".into()]))
            .unwrap();

        let out = fp.transform(&single).unwrap();
        assert_eq!(out.numeric("age").unwrap(), &[35.0]);
        let la_code = fp.encoder("city").unwrap().transform(&["LA"]).unwrap()[0];
        assert_eq!(out.numeric("city").unwrap(), &[la_code as f64]);
    }

    #[test]
    fn test_output_order_ignores_input_order_and_drops_extras() {
        let mut fp = FeaturePreprocessor::new(schema());
        fp.fit(&training_frame()).unwrap();

        // Input in reversed order with an extra undeclared column
        let mut x = Frame::new();
        x.push_column("extra", Column::Numeric(vec![9.0, 9.0])).unwrap();
        x.push_column(
            "city",
            Column::Categorical(vec!["LA".into(), "NY".into()]),
        )
        .unwrap();
        x.push_column("age", Column::Numeric(vec![20.0, 21.0])).unwrap();

        let out = fp.transform(&x).unwrap();
        assert_eq!(out.names(), vec!["age", "city"]);
    }

    #[test]
    fn test_fit_transform_equals_fit_then_transform() {
        let x = training_frame();

        let mut a = FeaturePreprocessor::new(schema());
        let via_fit_transform = a.fit_transform(&x).unwrap();

        let mut b = FeaturePreprocessor::new(schema());
        b.fit(&x).unwrap();
        let via_separate = b.transform(&x).unwrap();

        for name in schema().feature_names() {
            assert_eq!(
                via_fit_transform.numeric(name).unwrap(),
                via_separate.numeric(name).unwrap()
            );
        }
    }

    #[test]
    fn test_transform_before_fit() {
        let fp = FeaturePreprocessor::new(schema());
        assert!(matches!(
            fp.transform(&training_frame()),
            Err(PipelineError::NotFitted(_))
        ));
    }

    #[test]
    fn test_refit_is_idempotent() {
        let x = training_frame();
        let mut fp = FeaturePreprocessor::new(schema());
        fp.fit(&x).unwrap();
        let first = fp.encoder("city").unwrap().clone();
        fp.fit(&x).unwrap();
        assert_eq!(fp.encoder("city").unwrap(), &first);
    }

    #[test]
    fn test_unseen_category_propagates_with_column() {
        let mut fp = FeaturePreprocessor::new(schema());
        fp.fit(&training_frame()).unwrap();

        let mut x = Frame::new();
        x.push_column("age", Column::Numeric(vec![50.0])).unwrap();
        x.push_column("city", Column::Categorical(vec!["Zurich".into()]))
            .unwrap();

        match fp.transform(&x) {
            Err(PipelineError::UnseenCategory { column, value }) => {
                assert_eq!(column, "city");
                assert_eq!(value, "Zurich");
            }
            other => panic!("expected UnseenCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_fit_fails_on_missing_declared_column() {
        let mut x = Frame::new();
        x.push_column("age", Column::Numeric(vec![1.0])).unwrap();
        let mut fp = FeaturePreprocessor::new(schema());
        assert!(matches!(
            fp.fit(&x),
            Err(PipelineError::MissingColumn(_))
        ));
    }
}
