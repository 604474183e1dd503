//! Label encoding for categorical columns.
//!
//! A fitted encoder maps each distinct category value to a code in
//! `[0, k)`, assigned in ascending sorted order of the distinct values.
//! Codes are stable between training and scoring because the same fitted
//! instance is serialized with the artifact bundle and reused read-only.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Bidirectional category ↔ integer-code mapping for one column.
///
/// Created unfitted, fitted exactly once from a training column, then used
/// read-only for every subsequent transform. Re-fitting fully replaces the
/// prior state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelEncoder {
    /// Column this encoder was fitted for, used in error reporting
    column: String,
    /// Distinct fitted values, sorted ascending; index is the code
    classes: Vec<String>,
    /// Value → code lookup
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Create an unfitted encoder for the named column
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            classes: Vec::new(),
            codes: HashMap::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Number of distinct fitted values
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Fitted values in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Observe the distinct values and assign codes in sorted order.
    ///
    /// An empty input is a configuration error surfaced here rather than
    /// a silently empty encoder.
    pub fn fit<S: AsRef<str>>(&mut self, values: &[S]) -> Result<&mut Self> {
        if values.is_empty() {
            return Err(PipelineError::EmptyColumn(self.column.clone()));
        }
        let distinct: BTreeSet<&str> = values.iter().map(|v| v.as_ref()).collect();
        self.classes = distinct.into_iter().map(String::from).collect();
        self.codes = self
            .classes
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code))
            .collect();
        Ok(self)
    }

    /// Map each value to its fitted code.
    ///
    /// A value absent at fit time is an error naming the value and the
    /// column, never a default code.
    pub fn transform<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<usize>> {
        if !self.is_fitted() {
            return Err(PipelineError::NotFitted("LabelEncoder"));
        }
        values
            .iter()
            .map(|value| {
                let value = value.as_ref();
                self.codes
                    .get(value)
                    .copied()
                    .ok_or_else(|| PipelineError::UnseenCategory {
                        column: self.column.clone(),
                        value: value.to_string(),
                    })
            })
            .collect()
    }

    /// Fit then transform the same values
    pub fn fit_transform<S: AsRef<str>>(&mut self, values: &[S]) -> Result<Vec<usize>> {
        self.fit(values)?;
        self.transform(values)
    }

    /// Original value for a code assigned during fit
    pub fn inverse(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}
