//! Bagged ensemble of regression trees.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{AnalyticsError, Result};
use crate::forecast::tree::RegressionTree;

/// A bootstrap-aggregated forest of regression trees.
///
/// Each tree is fitted on rows drawn with replacement from the training
/// set; predictions are the mean over all trees. All randomness comes
/// from a single seeded generator, so a given `(data, seed)` pair always
/// produces the same forest.
#[derive(Debug, Clone)]
pub struct RandomForest {
    tree_count: usize,
    max_depth: usize,
    seed: u64,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Create an unfitted forest.
    pub fn new(tree_count: usize, seed: u64) -> Self {
        Self {
            tree_count: tree_count.max(1),
            max_depth: 10,
            seed,
            trees: Vec::new(),
        }
    }

    /// Set the maximum depth of each tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Number of trees in the ensemble.
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    /// Check if the forest has been fitted.
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fit the forest to a design matrix and target values.
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

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.trees = Vec::with_capacity(self.tree_count);

        for _ in 0..self.tree_count {
            let mut sample_x = Vec::with_capacity(n);
            let mut sample_y = Vec::with_capacity(n);
            for _ in 0..n {
                let idx = rng.gen_range(0..n);
                sample_x.push(x[idx].clone());
                sample_y.push(y[idx]);
            }

            let mut tree = RegressionTree::new().with_max_depth(self.max_depth);
            tree.fit(&sample_x, &sample_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predict the target value for a single feature row.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(AnalyticsError::FitRequired);
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict target values for a batch of feature rows.
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
