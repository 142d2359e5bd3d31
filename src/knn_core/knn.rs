//! Brute-force k-nearest-neighbors vote
//!
//! Every query is compared against the whole training set, the distances are
//! stably sorted, and the k closest labels vote. O(n log n) per query.

use std::cmp::Ordering;

use crate::dataset::Instance;
use crate::knn_core::bounds::FeatureBounds;
use crate::knn_core::distance::normalized_distance;
use crate::utils::{ClassifierError, Result};

/// A training instance ranked by its distance to a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position in the training set
    pub index: usize,
    pub label: i64,
    pub distance: f64,
}

/// Votes collected by one label among the k nearest neighbors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteCount {
    pub label: i64,
    pub count: usize,
    /// Distance of the closest neighbor carrying this label
    pub nearest_distance: f64,
}

/// Label tally ordered from winner to loser
///
/// Ordering: count descending, then nearest distance ascending, then label
/// ascending. The order never depends on hashing or insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTally {
    votes: Vec<VoteCount>,
}

impl VoteTally {
    pub fn from_neighbors(neighbors: &[Neighbor]) -> Self {
        let mut votes: Vec<VoteCount> = Vec::new();

        for neighbor in neighbors {
            match votes.iter_mut().find(|v| v.label == neighbor.label) {
                Some(vote) => {
                    vote.count += 1;
                    vote.nearest_distance = vote.nearest_distance.min(neighbor.distance);
                }
                None => votes.push(VoteCount {
                    label: neighbor.label,
                    count: 1,
                    nearest_distance: neighbor.distance,
                }),
            }
        }

        votes.sort_by(compare_votes);
        Self { votes }
    }

    /// Label with the most votes, `None` for an empty tally
    pub fn winner(&self) -> Option<i64> {
        self.votes.first().map(|v| v.label)
    }

    pub fn votes(&self) -> &[VoteCount] {
        &self.votes
    }
}

fn compare_votes(a: &VoteCount, b: &VoteCount) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.nearest_distance.total_cmp(&b.nearest_distance))
        .then_with(|| a.label.cmp(&b.label))
}

/// Find the k training instances closest to a query
///
/// # Arguments
/// * `query` - Feature vector to classify
/// * `training` - Training instances, all with `bounds.len()` features
/// * `bounds` - Per-feature training bounds
/// * `k` - Number of neighbors; larger values return the whole training set
///
/// # Returns
/// * Neighbors sorted by ascending distance. Equal distances keep training order.
pub fn nearest_neighbors(
    query: &[f64],
    training: &[Instance],
    bounds: &FeatureBounds,
    k: usize,
) -> Result<Vec<Neighbor>> {
    let mut neighbors = training
        .iter()
        .enumerate()
        .map(|(index, target)| -> Result<Neighbor> {
            Ok(Neighbor {
                index,
                label: target.label(),
                distance: normalized_distance(query, target.features(), bounds)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // sort_by is stable
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbors.truncate(k);

    Ok(neighbors)
}

/// Predict a label by majority vote among the k nearest training instances
pub fn classify(
    query: &[f64],
    training: &[Instance],
    bounds: &FeatureBounds,
    k: usize,
) -> Result<i64> {
    if training.is_empty() {
        return Err(ClassifierError::ValidationError(
            "cannot classify without training instances".to_string(),
        ));
    }
    if k == 0 {
        return Err(ClassifierError::ValidationError(
            "k must be at least 1".to_string(),
        ));
    }

    let neighbors = nearest_neighbors(query, training, bounds, k)?;
    VoteTally::from_neighbors(&neighbors)
        .winner()
        .ok_or_else(|| ClassifierError::ValidationError("no neighbors voted".to_string()))
}
