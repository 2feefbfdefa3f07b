//! The point-in-time metrics snapshot maintained by the monitor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::thresholds::PerformanceThresholds;

/// Performance metrics snapshot.
///
/// A single mutable instance is owned by the monitor and overwritten in
/// place as measurements arrive; [`crate::PerformanceMonitor::get_metrics`]
/// hands out clones, never a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Duration of the most recent render pass in milliseconds
    pub render_time: f64,
    /// Rolling average frame rate in frames per second
    pub frame_rate: f64,
    /// Heap usage in megabytes; stays 0 when no probe capability exists
    pub memory_usage: f64,
    /// Total number of items in the dataset at the last render
    pub item_count: usize,
    /// Number of items actually rendered at the last render
    pub visible_item_count: usize,
    /// Latency of the most recent scroll gesture in milliseconds
    pub scroll_performance: f64,
    /// Latency of the most recent zoom gesture in milliseconds
    pub zoom_performance: f64,
    /// Latency of the most recent pan gesture in milliseconds
    pub pan_performance: f64,
    /// Wall-clock time of the last render measurement
    pub last_update: DateTime<Utc>,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            render_time: 0.0,
            frame_rate: 0.0,
            memory_usage: 0.0,
            item_count: 0,
            visible_item_count: 0,
            scroll_performance: 0.0,
            zoom_performance: 0.0,
            pan_performance: 0.0,
            last_update: Utc::now(),
        }
    }
}

impl PerformanceMetrics {
    /// Check whether the last render pass fit the frame budget.
    pub fn is_within_render_budget(&self, thresholds: &PerformanceThresholds) -> bool {
        self.render_time <= thresholds.max_render_time
    }

    /// Fraction of rendered items relative to the full dataset (0.0..=1.0).
    pub fn visible_ratio(&self) -> f64 {
        if self.item_count == 0 {
            return 0.0;
        }
        self.visible_item_count as f64 / self.item_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let metrics = PerformanceMetrics::default();
        assert_eq!(metrics.render_time, 0.0);
        assert_eq!(metrics.frame_rate, 0.0);
        assert_eq!(metrics.memory_usage, 0.0);
        assert_eq!(metrics.item_count, 0);
        assert_eq!(metrics.visible_item_count, 0);
    }

    #[test]
    fn test_render_budget_check() {
        let thresholds = PerformanceThresholds::default();
        let mut metrics = PerformanceMetrics::default();

        metrics.render_time = 10.0;
        assert!(metrics.is_within_render_budget(&thresholds));

        metrics.render_time = 20.0;
        assert!(!metrics.is_within_render_budget(&thresholds));
    }

    #[test]
    fn test_visible_ratio() {
        let mut metrics = PerformanceMetrics::default();
        assert_eq!(metrics.visible_ratio(), 0.0);

        metrics.item_count = 1000;
        metrics.visible_item_count = 250;
        assert_eq!(metrics.visible_ratio(), 0.25);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut metrics = PerformanceMetrics::default();
        metrics.render_time = 12.5;
        metrics.item_count = 4200;

        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"renderTime\":12.5"));
        assert!(json.contains("\"itemCount\":4200"));

        let parsed: PerformanceMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metrics);
    }
}
