use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::knn_core::feature::validate_features;
use crate::utils::Result;

/// Observed range of one feature across the training data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Width of the range: upper - lower
    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    /// True when every training value for this feature was the same
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Per-feature bounds, indexed identically to the feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    bounds: Vec<Bound>,
}

impl FeatureBounds {
    /// Compute the min and max of every column of a feature matrix
    ///
    /// # Arguments
    /// * `features` - Feature matrix (rows=samples, cols=features)
    ///
    /// # Returns
    /// * `Ok(FeatureBounds)` - One bound per column, `lower <= upper`
    /// * `Err(ClassifierError::ValidationError)` - Empty matrix or NaN/Inf values
    ///
    /// # Note
    /// Constant columns yield `lower == upper`; the distance metric handles them.
    pub fn from_matrix(features: &Array2<f64>) -> Result<Self> {
        validate_features(features)?;

        let bounds = features
            .columns()
            .into_iter()
            .map(|col| {
                let lower = col.iter().copied().fold(f64::INFINITY, f64::min);
                let upper = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Bound::new(lower, upper)
            })
            .collect();

        Ok(Self { bounds })
    }

    /// Compute bounds over every instance of a dataset
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        Self::from_matrix(&dataset.to_matrix()?)
    }

    /// Number of features covered
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bound> {
        self.bounds.iter()
    }
}

impl From<Vec<Bound>> for FeatureBounds {
    fn from(bounds: Vec<Bound>) -> Self {
        Self { bounds }
    }
}
