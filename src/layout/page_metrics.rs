//! Per-page column metrics.
//!
//! The analyzer clusters the left edges of all lines on a page, takes the
//! most populated cluster as the body column and then hands the remaining
//! clusters to the roles configured for the book type, by offset from the
//! body column.

use super::clustering::{cluster_x_positions, XCluster};
use super::line_role::LineRole;
use crate::ocr::OcrLine;
use indexmap::IndexMap;

/// Geometry of the lines that make up one role on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleMetrics {
    /// Smallest line start
    pub min_x0: f32,
    /// Largest line start
    pub max_x0: f32,
    /// Average line start
    pub average_x0: f32,
    /// Mean line width
    pub average_width: f32,
    /// Widest line
    pub max_width: f32,
    /// Number of lines in the cluster
    pub line_count: usize,
}

impl RoleMetrics {
    fn from_cluster(cluster: &XCluster) -> Self {
        Self {
            min_x0: cluster.min_x0,
            max_x0: cluster.max_x0,
            average_x0: cluster.average_x0,
            average_width: cluster.average_width(),
            max_width: cluster.max_width(),
            line_count: cluster.len(),
        }
    }

    /// Whether a line start falls inside this role's range (inclusive).
    pub fn contains(&self, x0: f32) -> bool {
        x0 >= self.min_x0 && x0 <= self.max_x0
    }
}

/// Where a role's column sits relative to the body column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleOffsetRule {
    /// Role claimed by a matching cluster
    pub role: LineRole,
    /// Expected distance from the body column's average `x0`
    pub expected_offset: f32,
    /// Allowed deviation from the expected position
    pub tolerance: f32,
}

/// Role → geometry mapping for one page.
///
/// Entries are kept in insertion order: `ParagraphText` first, then the
/// offset roles in claim priority, then the `unknown-N` leftovers. Lookups
/// walk that order and the first containing range wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetrics {
    roles: IndexMap<LineRole, RoleMetrics>,
}

impl PageMetrics {
    /// Metrics for a page without usable geometry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Analyze the lines of one page.
    ///
    /// Lines without a usable bounding box are ignored. When no line is left
    /// the metrics are empty and every line falls back to `ParagraphText`.
    pub fn analyze<'a>(
        lines: impl IntoIterator<Item = &'a OcrLine>,
        rules: &[RoleOffsetRule],
        cluster_tolerance: f32,
    ) -> Self {
        let samples: Vec<(f32, f32)> = lines
            .into_iter()
            .filter_map(|line| line.usable_bbox())
            .map(|bbox| (bbox.x0, bbox.width()))
            .collect();

        if samples.is_empty() {
            log::warn!("No line on the page has a usable bounding box; layout metrics are empty");
            return Self::empty();
        }

        Self::from_samples(&samples, rules, cluster_tolerance)
    }

    /// Build metrics from raw `(x0, width)` samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::layout::{LineRole, PageMetrics, RoleOffsetRule};
    ///
    /// let samples: Vec<(f32, f32)> = [100.0, 100.0, 100.0, 102.0, 300.0, 301.0]
    ///     .iter()
    ///     .map(|&x| (x, 400.0))
    ///     .collect();
    /// let rules = [RoleOffsetRule {
    ///     role: LineRole::QuoteText,
    ///     expected_offset: 200.0,
    ///     tolerance: 15.0,
    /// }];
    /// let metrics = PageMetrics::from_samples(&samples, &rules, 7.0);
    ///
    /// assert_eq!(metrics.role_for_x0(101.0), Some(LineRole::ParagraphText));
    /// assert_eq!(metrics.role_for_x0(300.0), Some(LineRole::QuoteText));
    /// ```
    pub fn from_samples(
        samples: &[(f32, f32)],
        rules: &[RoleOffsetRule],
        cluster_tolerance: f32,
    ) -> Self {
        let clusters = cluster_x_positions(samples, cluster_tolerance);
        let mut roles = IndexMap::new();

        // Most populated cluster is the body column; ties go to the leftmost.
        let mut body_index: Option<usize> = None;
        for (i, cluster) in clusters.iter().enumerate() {
            match body_index {
                Some(best) if clusters[best].len() >= cluster.len() => {},
                _ => body_index = Some(i),
            }
        }
        let Some(body_index) = body_index else {
            return Self::empty();
        };

        let body = &clusters[body_index];
        roles.insert(LineRole::ParagraphText, RoleMetrics::from_cluster(body));

        let mut claimed = vec![false; clusters.len()];
        claimed[body_index] = true;

        for rule in rules {
            if rule.role == LineRole::ParagraphText || roles.contains_key(&rule.role) {
                continue;
            }
            let target = body.average_x0 + rule.expected_offset;
            let mut nearest: Option<(usize, f32)> = None;
            for (i, cluster) in clusters.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                let distance = (cluster.average_x0 - target).abs();
                if distance > rule.tolerance {
                    continue;
                }
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((i, distance));
                }
            }
            if let Some((i, distance)) = nearest {
                log::debug!(
                    "Cluster at x0={:.1} claimed as {} ({:.1}px from expected)",
                    clusters[i].average_x0,
                    rule.role,
                    distance
                );
                claimed[i] = true;
                roles.insert(rule.role, RoleMetrics::from_cluster(&clusters[i]));
            }
        }

        let mut unknown = 0;
        for (i, cluster) in clusters.iter().enumerate() {
            if !claimed[i] {
                unknown += 1;
                roles.insert(LineRole::Unknown(unknown), RoleMetrics::from_cluster(cluster));
            }
        }

        Self { roles }
    }

    /// Metrics for one role, if present on this page.
    pub fn get(&self, role: LineRole) -> Option<&RoleMetrics> {
        self.roles.get(&role)
    }

    /// Metrics of the body column.
    pub fn paragraph_text(&self) -> Option<&RoleMetrics> {
        self.get(LineRole::ParagraphText)
    }

    /// First role whose range contains `x0`.
    pub fn role_for_x0(&self, x0: f32) -> Option<LineRole> {
        self.roles
            .iter()
            .find(|(_, metrics)| metrics.contains(x0))
            .map(|(role, _)| *role)
    }

    /// Roles in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = (&LineRole, &RoleMetrics)> {
        self.roles.iter()
    }

    /// Number of roles present.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no geometry was available.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
