/// Classification core: bounds, distance and the k-NN vote
pub mod bounds;
pub mod distance;
pub mod feature;
pub mod knn;

// Re-export commonly used items
pub use bounds::{Bound, FeatureBounds};
pub use distance::{feature_contribution, normalized_distance, DEGENERATE_FEATURE_PENALTY};
pub use feature::{check_feature_count, validate_features};
pub use knn::{classify, nearest_neighbors, Neighbor, VoteCount, VoteTally};
