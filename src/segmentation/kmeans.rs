//! K-means clustering over RFM feature points.
//!
//! Lloyd's algorithm with k-means++ seeding and multiple seeded
//! restarts, keeping the lowest-inertia run.

use rand::prelude::*;
use rand::rngs::StdRng;

/// K-means configuration.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Maximum Lloyd iterations per restart
    pub max_iter: usize,
    /// Number of restarts; the lowest-inertia run wins
    pub n_init: usize,
    /// Convergence tolerance on the inertia change
    pub tolerance: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

impl KMeansConfig {
    /// Set number of clusters.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k.max(1);
        self
    }

    /// Set maximum iterations per restart.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the number of restarts.
    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// K-means clustering result.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster assignments for each point (0-indexed)
    pub labels: Vec<usize>,
    /// Cluster centroids
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the nearest centroid
    pub inertia: f64,
    /// Number of iterations performed by the winning run
    pub n_iter: usize,
}

impl KMeansResult {
    /// Get indices of points in a specific cluster.
    pub fn cluster_members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get the size of each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let k = self.centroids.len();
        let mut sizes = vec![0; k];
        for &label in &self.labels {
            if label < k {
                sizes[label] += 1;
            }
        }
        sizes
    }
}

/// Perform k-means clustering on feature points.
///
/// # Arguments
/// * `points` - Feature rows, all the same width
/// * `config` - K-means configuration
pub fn kmeans(points: &[Vec<f64>], config: &KMeansConfig) -> KMeansResult {
    let n = points.len();
    let k = config.k.min(n);

    if n == 0 || k == 0 {
        return KMeansResult {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
            n_iter: 0,
        };
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut best: Option<KMeansResult> = None;
    for _ in 0..config.n_init {
        let run = lloyd_run(points, k, config, &mut rng);
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    // n_init >= 1, so a run always exists.
    best.unwrap_or(KMeansResult {
        labels: vec![0; n],
        centroids: Vec::new(),
        inertia: 0.0,
        n_iter: 0,
    })
}

/// One restart: k-means++ seeding followed by Lloyd iterations.
fn lloyd_run(points: &[Vec<f64>], k: usize, config: &KMeansConfig, rng: &mut StdRng) -> KMeansResult {
    let n = points.len();
    let mut centroids = initialize_centroids(points, k, rng);

    let mut labels = vec![0; n];
    let mut prev_inertia = f64::INFINITY;
    let mut n_iter = 0;

    for iter in 0..config.max_iter {
        n_iter = iter + 1;

        // Assignment step
        let mut inertia = 0.0;
        for (i, point) in points.iter().enumerate() {
            let (nearest, dist) = find_nearest_centroid(point, &centroids);
            labels[i] = nearest;
            inertia += dist;
        }

        // Check convergence
        if (prev_inertia - inertia).abs() < config.tolerance {
            break;
        }
        prev_inertia = inertia;

        // Update step
        centroids = update_centroids(points, &labels, &centroids, k);
    }

    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum();

    KMeansResult {
        labels,
        centroids,
        inertia,
        n_iter,
    }
}

/// Initialize centroids using the k-means++ scheme.
fn initialize_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);

    centroids.push(points[rng.gen_range(0..n)].clone());

    for _ in 1..k {
        let distances: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        let selected = if total > 0.0 {
            // Sample proportional to squared distance.
            let threshold = rng.gen::<f64>() * total;
            let mut cumsum = 0.0;
            let mut chosen = n - 1;
            for (i, &d) in distances.iter().enumerate() {
                cumsum += d;
                if cumsum >= threshold {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            rng.gen_range(0..n)
        };

        centroids.push(points[selected].clone());
    }

    centroids
}

/// Find the nearest centroid for a point.
fn find_nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut min_dist = f64::INFINITY;
    let mut nearest = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }

    (nearest, min_dist)
}

/// Squared Euclidean distance.
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Recompute centroids as cluster means; empty clusters keep their
/// previous centroid.
fn update_centroids(
    points: &[Vec<f64>],
    labels: &[usize],
    previous: &[Vec<f64>],
    k: usize,
) -> Vec<Vec<f64>> {
    let dim = points[0].len();
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(point) {
            *s += v;
        }
    }

    (0..k)
        .map(|cluster| {
            if counts[cluster] == 0 {
                previous[cluster].clone()
            } else {
                sums[cluster]
                    .iter()
                    .map(|s| s / counts[cluster] as f64)
                    .collect()
            }
        })
        .collect()
}
