//! Minimal column-oriented table used between loading, preprocessing, and
//! the model.
//!
//! Rows are keyed by position; the request id of a scoring message travels
//! with the message itself, not the frame. Columns keep their insertion
//! order, which lets the preprocessor guarantee a canonical output order.

use crate::error::{PipelineError, Result};
use ndarray::Array2;

/// A single column of values
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Column-oriented table with ordered, name-addressed columns
#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: Vec<(String, Column)>,
    nrows: usize,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count; later columns
    /// must match it.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.nrows = column.len();
        } else if column.len() != self.nrows {
            return Err(PipelineError::Data(format!(
                "column {:?} has {} rows, frame has {}",
                name,
                column.len(),
                self.nrows
            )));
        }
        self.columns.retain(|(n, _)| n != &name);
        self.columns.push((name, column));
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Numeric view of a column, or a data error if it is categorical
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(PipelineError::Data(format!(
                "column {name:?} is categorical, expected numeric"
            ))),
        }
    }

    /// Categorical view of a column, or a data error if it is numeric
    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Categorical(v) => Ok(v),
            Column::Numeric(_) => Err(PipelineError::Data(format!(
                "column {name:?} is numeric, expected categorical"
            ))),
        }
    }

    /// New frame holding `names` in the given order, dropping everything
    /// else. Missing names fail the lookup.
    pub fn select(&self, names: &[String]) -> Result<Frame> {
        let mut out = Frame::new();
        for name in names {
            out.push_column(name.clone(), self.column(name)?.clone())?;
        }
        Ok(out)
    }

    /// Dense matrix in the given column order. All selected columns must be
    /// numeric; encoded frames satisfy this by construction.
    pub fn to_matrix(&self, names: &[String]) -> Result<Array2<f64>> {
        let mut data = Vec::with_capacity(self.nrows * names.len());
        let cols: Vec<&[f64]> = names
            .iter()
            .map(|n| self.numeric(n))
            .collect::<Result<_>>()?;
        for row in 0..self.nrows {
            for col in &cols {
                data.push(col[row]);
            }
        }
        Array2::from_shape_vec((self.nrows, names.len()), data)
            .map_err(|e| PipelineError::Data(e.to_string()))
    }
}
