use ndarray::Array2;

use crate::utils::ClassifierError;

/// Validate feature matrix dimensions and values
///
/// # Arguments
/// * `features` - Feature matrix to validate
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(ClassifierError::ValidationError)` if invalid
pub fn validate_features(features: &Array2<f64>) -> Result<(), ClassifierError> {
    if features.nrows() == 0 {
        return Err(ClassifierError::ValidationError(
            "feature matrix cannot be empty".to_string(),
        ));
    }

    if features.ncols() == 0 {
        return Err(ClassifierError::ValidationError(
            "feature matrix must have at least one column".to_string(),
        ));
    }

    if let Some(((row, col), _)) = features
        .indexed_iter()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(ClassifierError::ValidationError(format!(
            "feature matrix contains NaN or Inf values (row {}, feature {})",
            row, col
        )));
    }

    Ok(())
}

/// Check that a query has as many features as the model was trained with
pub fn check_feature_count(
    context: &str,
    expected: usize,
    actual: usize,
) -> Result<(), ClassifierError> {
    if expected != actual {
        return Err(ClassifierError::FeatureCountMismatch {
            context: context.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
