use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::accuracy_ratio;

/// Predicted and actual label for one test instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted: i64,
    pub actual: i64,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Predicted class: {} | Actual class: {}",
            self.predicted, self.actual
        )
    }
}

/// Outcome of classifying a whole test set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model: String,
    /// Number of neighbors that actually voted
    pub k: usize,
    pub predictions: Vec<Prediction>,
    correct: usize,
    accuracy: f64,
}

impl EvaluationReport {
    /// Tally predictions into a report
    pub fn new(model: impl Into<String>, k: usize, predictions: Vec<Prediction>) -> Self {
        let correct = predictions.iter().filter(|p| p.is_correct()).count();
        let accuracy = accuracy_ratio(correct, predictions.len());
        Self {
            model: model.into(),
            k,
            predictions,
            correct,
            accuracy,
        }
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn incorrect(&self) -> usize {
        self.total() - self.correct
    }

    pub fn total(&self) -> usize {
        self.predictions.len()
    }

    /// `correct / total`, 0.0 for an empty test set
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// One-line summary: `correct/total Correct --- PREDICTION ACCURACY: acc`
    pub fn summary(&self) -> String {
        format!(
            "{}/{} Correct --- PREDICTION ACCURACY: {}",
            self.correct,
            self.total(),
            self.accuracy
        )
    }
}
