//! Regression tree used as the base learner of the forecast ensemble.

use crate::error::{AnalyticsError, Result};
use crate::utils::mean;

const DEFAULT_MAX_DEPTH: usize = 10;
const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;

/// A depth-limited regression tree with variance-reduction splits.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    max_depth: usize,
    min_samples_split: usize,
    root: Option<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl RegressionTree {
    /// Create an unfitted tree with default depth limits.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            root: None,
        }
    }

    /// Set the maximum tree depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Set the minimum number of samples required to split a node.
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    /// Fit the tree to a design matrix and target values.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.is_empty() || y.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }
        if x.len() != y.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }

        let indices: Vec<usize> = (0..x.len()).collect();
        self.root = Some(self.build_node(x, y, &indices, 0));
        Ok(())
    }

    /// Predict the target value for a single feature row.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or(AnalyticsError::FitRequired)?;

        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row.get(*feature).copied().unwrap_or(0.0) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Check if the tree has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    fn build_node(&self, x: &[Vec<f64>], y: &[f64], indices: &[usize], depth: usize) -> Node {
        let values: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let value = mean(&values);

        if depth >= self.max_depth || indices.len() < self.min_samples_split {
            return Node::Leaf { value };
        }

        let Some((feature, threshold)) = best_split(x, y, indices) else {
            return Node::Leaf { value };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| x[i][feature] <= threshold);

        if left_indices.is_empty() || right_indices.is_empty() {
            return Node::Leaf { value };
        }

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build_node(x, y, &left_indices, depth + 1)),
            right: Box::new(self.build_node(x, y, &right_indices, depth + 1)),
        }
    }
}

impl Default for RegressionTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the split minimizing the summed squared error of both children.
///
/// Candidate thresholds are midpoints between consecutive distinct
/// feature values; the SSE scan uses prefix sums over the sorted
/// targets. Returns `None` when no feature has two distinct values.
fn best_split(x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
    let n = indices.len();
    if n < 2 {
        return None;
    }
    let n_features = x[indices[0]].len();

    let mut best: Option<(usize, f64, f64)> = None;

    for feature in 0..n_features {
        let mut pairs: Vec<(f64, f64)> = indices.iter().map(|&i| (x[i][feature], y[i])).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
        let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();

        let mut prefix_sum = 0.0;
        let mut prefix_sq = 0.0;

        for split in 1..n {
            prefix_sum += pairs[split - 1].1;
            prefix_sq += pairs[split - 1].1 * pairs[split - 1].1;

            // Splitting requires distinct feature values on each side.
            if pairs[split].0 <= pairs[split - 1].0 {
                continue;
            }

            let left_n = split as f64;
            let right_n = (n - split) as f64;
            let right_sum = total_sum - prefix_sum;

            let left_sse = prefix_sq - prefix_sum * prefix_sum / left_n;
            let right_sse = (total_sq - prefix_sq) - right_sum * right_sum / right_n;
            let sse = left_sse + right_sse;

            if best.map_or(true, |(_, _, best_sse)| sse < best_sse) {
                let threshold = (pairs[split - 1].0 + pairs[split].0) / 2.0;
                best = Some((feature, threshold, sse));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}
