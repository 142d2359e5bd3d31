/// Clamp a requested neighbor count into `1..=n_train`
///
/// # Arguments
/// * `requested` - The k value set on the model
/// * `n_train` - Number of training instances
///
/// # Returns
/// * The number of neighbors that will actually vote. A request of 0 becomes 1,
///   a request above the training-set size becomes the training-set size.
///   With an empty training set the result is 0.
pub fn clamp_k(requested: usize, n_train: usize) -> usize {
    if n_train == 0 {
        return 0;
    }
    requested.clamp(1, n_train)
}

/// Fraction of correct predictions, defined as 0.0 when nothing was predicted
pub fn accuracy_ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64
}
