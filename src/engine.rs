use rayon::prelude::*;
use std::path::Path;

use crate::dataset::{Dataset, Instance};
use crate::evaluation::{EvaluationReport, Prediction};
use crate::knn_core::{check_feature_count, classify, validate_features, FeatureBounds};
use crate::utils::{clamp_k, ClassifierError, Result};

/// Neighbor count used until [`Model::set_k`] is called
pub const DEFAULT_K: usize = 3;

/// Display name used until [`Model::with_name`] is called
pub const DEFAULT_NAME: &str = "Unnamed Model";

/// A trained k-NN classifier
///
/// Holds the training set and the feature bounds derived from it. Both are
/// fixed at construction; only `k` and the current test set change afterwards.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    k: usize,
    training: Dataset,
    bounds: FeatureBounds,
    testing: Option<Dataset>,
}

impl Model {
    /// Build a model from a training dataset
    ///
    /// # Returns
    /// * `Ok(Model)` with bounds computed once from `training`
    /// * `Err(ClassifierError::EmptyTrainingSet)` if `training` has no instances
    /// * `Err(ClassifierError::ValidationError)` if a feature value is NaN or Inf
    pub fn new(training: Dataset) -> Result<Self> {
        if training.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet {
                path: training.name.clone(),
            });
        }

        let bounds = FeatureBounds::from_dataset(&training)?;

        tracing::debug!(
            "Trained model on {} instances with {} features from {}",
            training.len(),
            training.feature_count(),
            training.name
        );

        Ok(Self {
            name: DEFAULT_NAME.to_string(),
            k: DEFAULT_K,
            training,
            bounds,
            testing: None,
        })
    }

    /// Load training data from a file and build a model from it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(Dataset::from_path(path)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.set_k(k);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The k value as requested, before clamping
    pub fn k(&self) -> usize {
        self.k
    }

    /// Change the neighbor count. Bounds and training data are untouched.
    pub fn set_k(&mut self, k: usize) {
        let effective = clamp_k(k, self.training.len());
        if effective != k {
            tracing::warn!(
                "k = {} is outside 1..={}, using k = {}",
                k,
                self.training.len(),
                effective
            );
        }
        self.k = k;
    }

    /// Number of neighbors that actually vote: k clamped to `1..=training size`
    pub fn effective_k(&self) -> usize {
        clamp_k(self.k, self.training.len())
    }

    pub fn feature_count(&self) -> usize {
        self.training.feature_count()
    }

    pub fn training_data(&self) -> &Dataset {
        &self.training
    }

    pub fn bounds(&self) -> &FeatureBounds {
        &self.bounds
    }

    /// Test set used by the most recent [`Model::test`] run
    pub fn testing_data(&self) -> Option<&Dataset> {
        self.testing.as_ref()
    }

    /// Predict the label of a single instance
    pub fn classify(&self, instance: &Instance) -> Result<i64> {
        self.classify_features(instance.features())
    }

    /// Predict the label of a raw feature vector
    pub fn classify_features(&self, features: &[f64]) -> Result<i64> {
        check_feature_count("query", self.feature_count(), features.len())?;
        classify(
            features,
            self.training.instances(),
            &self.bounds,
            self.effective_k(),
        )
    }

    /// Classify every instance of a dataset and tally the results
    ///
    /// Instances are classified independently and in parallel; the report
    /// keeps the dataset order. The model is not modified.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EvaluationReport> {
        let k = self.effective_k();

        if dataset.is_empty() {
            tracing::warn!("Test set {} has no instances", dataset.name);
            return Ok(EvaluationReport::new(self.name.clone(), k, Vec::new()));
        }

        check_feature_count(&dataset.name, self.feature_count(), dataset.feature_count())?;
        validate_features(&dataset.to_matrix()?)?;

        tracing::debug!(
            "Classifying {} instances from {} with k = {}",
            dataset.len(),
            dataset.name,
            k
        );

        let training = self.training.instances();
        let predictions = dataset
            .instances()
            .par_iter()
            .map(|instance| -> Result<Prediction> {
                Ok(Prediction {
                    predicted: classify(instance.features(), training, &self.bounds, k)?,
                    actual: instance.label(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let report = EvaluationReport::new(self.name.clone(), k, predictions);
        tracing::info!("{} (k = {}): {}", self.name, k, report.summary());
        Ok(report)
    }

    /// Load a test set from a file, evaluate it, and keep it as the current test set
    pub fn test(&mut self, path: impl AsRef<Path>) -> Result<EvaluationReport> {
        let dataset = Dataset::from_path(path)?;
        self.test_dataset(dataset)
    }

    /// Evaluate a test set and replace the current one with it
    pub fn test_dataset(&mut self, dataset: Dataset) -> Result<EvaluationReport> {
        let report = self.evaluate(&dataset)?;
        self.testing = Some(dataset);
        Ok(report)
    }
}
