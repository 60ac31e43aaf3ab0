//! Shared statistical utilities.

pub mod stats;

pub use stats::{mean, quantile, quantile_normal, r_squared, std_dev, variance};
