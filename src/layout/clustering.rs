//! Tolerance clustering of line start positions.
//!
//! Book pages have only a handful of distinct left edges: the body column,
//! the paragraph indent, footnote indents, quotations. Grouping the `x0` of
//! every line with a small tolerance recovers those columns without knowing
//! the page's layout in advance.

use crate::utils::safe_float_cmp;

/// One group of line start positions.
#[derive(Debug, Clone, PartialEq)]
pub struct XCluster {
    /// Smallest member `x0`
    pub min_x0: f32,
    /// Largest member `x0`
    pub max_x0: f32,
    /// Running average of member `x0`
    pub average_x0: f32,
    /// Widths of the member lines, in insertion order
    pub widths: Vec<f32>,
}

impl XCluster {
    fn new(x0: f32, width: f32) -> Self {
        Self {
            min_x0: x0,
            max_x0: x0,
            average_x0: x0,
            widths: vec![width],
        }
    }

    fn add(&mut self, x0: f32, width: f32) {
        let n = self.widths.len() as f32;
        self.average_x0 = (self.average_x0 * n + x0) / (n + 1.0);
        self.min_x0 = self.min_x0.min(x0);
        self.max_x0 = self.max_x0.max(x0);
        self.widths.push(width);
    }

    /// Number of member lines.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Whether the cluster has no members. Never true for clusters returned
    /// by [`cluster_x_positions`].
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Mean width of the member lines.
    pub fn average_width(&self) -> f32 {
        if self.widths.is_empty() {
            return 0.0;
        }
        self.widths.iter().sum::<f32>() / self.widths.len() as f32
    }

    /// Widest member line.
    pub fn max_width(&self) -> f32 {
        self.widths.iter().copied().fold(0.0, f32::max)
    }

    /// Whether `x0` lies within `tolerance` of the running average.
    fn accepts(&self, x0: f32, tolerance: f32) -> bool {
        (x0 - self.average_x0).abs() <= tolerance
    }
}

/// Group `(x0, width)` samples by `x0`.
///
/// Samples are sorted by `x0` and visited once. Each sample joins the first
/// existing cluster whose running average lies within `tolerance`, otherwise
/// it starts a new cluster. Clusters come back in order of their first
/// member, i.e. left to right.
///
/// # Arguments
///
/// * `samples` - `(x0, width)` for every line with a usable box
/// * `tolerance` - Maximum distance in pixels from a cluster's running average
///
/// # Examples
///
/// ```
/// use scan_oxide::layout::clustering::cluster_x_positions;
///
/// let samples = [(100.0, 800.0), (130.0, 770.0), (101.0, 790.0), (102.0, 795.0)];
/// let clusters = cluster_x_positions(&samples, 7.0);
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].len(), 3);
/// assert_eq!(clusters[1].min_x0, 130.0);
/// ```
pub fn cluster_x_positions(samples: &[(f32, f32)], tolerance: f32) -> Vec<XCluster> {
    let mut sorted: Vec<(f32, f32)> = samples
        .iter()
        .copied()
        .filter(|(x0, width)| x0.is_finite() && width.is_finite())
        .collect();
    sorted.sort_by(|a, b| safe_float_cmp(a.0, b.0));

    let mut clusters: Vec<XCluster> = Vec::new();
    for (x0, width) in sorted {
        match clusters.iter_mut().find(|c| c.accepts(x0, tolerance)) {
            Some(cluster) => cluster.add(x0, width),
            None => clusters.push(XCluster::new(x0, width)),
        }
    }

    log::trace!(
        "Clustered {} line starts into {} columns (tolerance {:.1})",
        samples.len(),
        clusters.len(),
        tolerance
    );
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(xs: &[f32]) -> Vec<(f32, f32)> {
        xs.iter().map(|&x| (x, 500.0)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_x_positions(&[], 7.0).is_empty());
    }

    #[test]
    fn test_single_sample() {
        let clusters = cluster_x_positions(&[(42.0, 10.0)], 7.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].average_x0, 42.0);
        assert_eq!(clusters[0].max_width(), 10.0);
    }

    #[test]
    fn test_two_columns() {
        let clusters =
            cluster_x_positions(&samples(&[100.0, 100.0, 100.0, 102.0, 300.0, 301.0]), 7.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 4);
        assert_eq!(clusters[0].min_x0, 100.0);
        assert_eq!(clusters[0].max_x0, 102.0);
        assert!((clusters[0].average_x0 - 100.5).abs() < 1e-4);
        assert_eq!(clusters[1].len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let clusters = cluster_x_positions(&samples(&[300.0, 100.0, 301.0, 101.0]), 7.0);
        assert_eq!(clusters[0].min_x0, 100.0);
        assert_eq!(clusters[1].min_x0, 300.0);
    }

    #[test]
    fn test_running_average_drift() {
        // 12 is farther than 7 from the first member but close to the average
        let clusters = cluster_x_positions(&samples(&[0.0, 7.0, 10.0, 12.0]), 7.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 4);

        let tight = cluster_x_positions(&samples(&[0.0, 7.0, 10.0, 12.0]), 3.0);
        assert_eq!(tight.len(), 3);
        assert_eq!(tight[1].len(), 2);
    }

    #[test]
    fn test_widths() {
        let clusters = cluster_x_positions(&[(100.0, 800.0), (101.0, 600.0)], 7.0);
        assert_eq!(clusters[0].average_width(), 700.0);
        assert_eq!(clusters[0].max_width(), 800.0);
    }

    #[test]
    fn test_non_finite_samples_dropped() {
        let samples = [(f32::NAN, 10.0), (5.0, f32::INFINITY), (1.0, 1.0)];
        let clusters = cluster_x_positions(&samples, 7.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 1);
    }
}
