//! Fast k-NN Classifier - a k-nearest-neighbors classifier
//!
//! This library loads labeled examples from space separated text files,
//! derives per-feature bounds from the training data, and classifies new
//! examples by majority vote among the k nearest training instances under a
//! range-normalized Euclidean distance.

pub mod dataset;
pub mod engine;
pub mod evaluation;
pub mod knn_core;
pub mod utils;

pub use dataset::{Dataset, Instance};
pub use engine::{Model, DEFAULT_K, DEFAULT_NAME};
pub use evaluation::{EvaluationReport, Prediction};
pub use knn_core::{Bound, FeatureBounds};
pub use utils::{ClassifierError, Result};
