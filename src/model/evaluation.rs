//! Per-class evaluation of classifier output.
//!
//! The report is operator-facing: rendered to the log sink after training,
//! never persisted as an artifact.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision/recall/F1/support for one class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class classification report with accuracy and macro averages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub total_support: usize,
}

impl ClassificationReport {
    /// Compute the report from encoded integer labels.
    ///
    /// `class_names[code]` names the class for that code; predictions and
    /// truths outside `[0, class_names.len())` are rejected.
    pub fn compute(y_true: &[usize], y_pred: &[usize], class_names: &[String]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::Data(format!(
                "label length mismatch: {} true vs {} predicted",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(PipelineError::Data(
                "cannot evaluate over zero samples".to_string(),
            ));
        }
        let k = class_names.len();
        if let Some(&bad) = y_true.iter().chain(y_pred.iter()).find(|&&c| c >= k) {
            return Err(PipelineError::Data(format!(
                "label code {bad} out of range for {k} classes"
            )));
        }

        // k x k confusion matrix, rows = truth, columns = prediction
        let mut confusion = vec![vec![0usize; k]; k];
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            confusion[t][p] += 1;
        }

        let mut classes = Vec::with_capacity(k);
        let mut correct = 0usize;
        for code in 0..k {
            let tp = confusion[code][code];
            correct += tp;
            let support: usize = confusion[code].iter().sum();
            let predicted: usize = (0..k).map(|t| confusion[t][code]).sum();

            let precision = if predicted > 0 {
                tp as f64 / predicted as f64
            } else {
                0.0
            };
            let recall = if support > 0 {
                tp as f64 / support as f64
            } else {
                0.0
            };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            classes.push(ClassMetrics {
                label: class_names[code].clone(),
                precision,
                recall,
                f1,
                support,
            });
        }

        let n = classes.len() as f64;
        Ok(Self {
            accuracy: correct as f64 / y_true.len() as f64,
            macro_precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            macro_recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
            macro_f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
            total_support: y_true.len(),
            classes,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .max()
            .unwrap_or(0)
            .max("macro avg".len());

        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        write!(
            f,
            "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
            "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, self.total_support
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["<=50K".to_string(), ">50K".to_string()]
    }

    #[test]
    fn test_perfect_predictions() {
        let y = vec![0, 1, 0, 1, 1];
        let report = ClassificationReport::compute(&y, &y, &names()).unwrap();
        assert_eq!(report.accuracy, 1.0);
        for c in &report.classes {
            assert_eq!(c.precision, 1.0);
            assert_eq!(c.recall, 1.0);
            assert_eq!(c.f1, 1.0);
        }
        assert_eq!(report.classes[0].support, 2);
        assert_eq!(report.classes[1].support, 3);
    }

    #[test]
    fn test_known_confusion() {
        // truth:      0 0 0 0 1 1
        // predicted:  0 0 1 1 1 1
        let y_true = vec![0, 0, 0, 0, 1, 1];
        let y_pred = vec![0, 0, 1, 1, 1, 1];
        let report = ClassificationReport::compute(&y_true, &y_pred, &names()).unwrap();

        let c0 = &report.classes[0];
        assert!((c0.precision - 1.0).abs() < 1e-9);
        assert!((c0.recall - 0.5).abs() < 1e-9);

        let c1 = &report.classes[1];
        assert!((c1.precision - 0.5).abs() < 1e-9);
        assert!((c1.recall - 1.0).abs() < 1e-9);

        assert!((report.accuracy - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        assert!(ClassificationReport::compute(&[0, 1], &[0], &names()).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_code() {
        assert!(ClassificationReport::compute(&[0, 2], &[0, 0], &names()).is_err());
    }

    #[test]
    fn test_display_contains_labels() {
        let report =
            ClassificationReport::compute(&[0, 1, 1], &[0, 1, 0], &names()).unwrap();
        let text = report.to_string();
        assert!(text.contains("<=50K"));
        assert!(text.contains("precision"));
        assert!(text.contains("macro avg"));
    }
}
