//! Aggregate statistics over a screen's diagnostic distribution.

use crate::domain::regression::{mean, median, population_std};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl RunSummary {
    pub fn compute(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            median: median(values),
            std_dev: population_std(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn summary_over_known_values() {
        let summary = RunSummary::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.count, 8);
        assert_relative_eq!(summary.mean, 5.0);
        assert_relative_eq!(summary.median, 4.5);
        assert_relative_eq!(summary.std_dev, 2.0);
    }

    #[test]
    fn summary_of_empty_distribution() {
        let summary = RunSummary::compute(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.median, 0.0);
        assert_eq!(summary.std_dev, 0.0);
    }
}
