//! Raw tabular input loading.
//!
//! Columns are read as-is with no schema enforcement beyond name lookup:
//! declared numerical columns are parsed as floats, everything else
//! declared (categorical features and the target) stays a string.

use crate::config::FeatureConfig;
use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Load a train or test table from a CSV file, keeping only the declared
/// feature and target columns.
pub fn load_table<P: AsRef<Path>>(path: P, features: &FeatureConfig) -> Result<Frame> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let positions: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();

    let declared: Vec<&String> = features
        .numerical
        .iter()
        .chain(features.categorical.iter())
        .chain(std::iter::once(&features.target))
        .collect();
    for name in &declared {
        if !positions.contains_key(name.as_str()) {
            return Err(PipelineError::MissingColumn(name.to_string()));
        }
    }

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut frame = Frame::new();
    for name in &features.numerical {
        let idx = positions[name.as_str()];
        let parsed = records
            .iter()
            .map(|record| {
                let value = record.get(idx).unwrap_or("").trim();
                value.parse::<f64>().map_err(|_| {
                    PipelineError::Data(format!(
                        "column {name:?}: cannot parse {value:?} as a number"
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        frame.push_column(name.clone(), Column::Numeric(parsed))?;
    }
    for name in features.categorical.iter().chain(std::iter::once(&features.target)) {
        let idx = positions[name.as_str()];
        let values = records
            .iter()
            .map(|record| record.get(idx).unwrap_or("").trim().to_string())
            .collect();
        frame.push_column(name.clone(), Column::Categorical(values))?;
    }

    info!(
        path = %path.display(),
        rows = frame.nrows(),
        columns = frame.ncols(),
        "Loaded table"
    );

    Ok(frame)
}
