//! Derivation of rendering-strategy recommendations.

use serde::{Deserialize, Serialize};

use crate::metrics::PerformanceMetrics;
use crate::thresholds::PerformanceThresholds;

/// Item count above which GPU-accelerated rendering pays off regardless of
/// the configured thresholds.
const GPU_ITEM_THRESHOLD: usize = 5_000;
/// Item count above which items should be fetched lazily.
const LAZY_LOAD_ITEM_THRESHOLD: usize = 10_000;
/// Item count above which the larger batch size starts to thrash.
const LARGE_DATASET_ITEM_THRESHOLD: usize = 50_000;

const DENSE_OVERSCAN: usize = 5;
const DEFAULT_OVERSCAN: usize = 10;
const SMALL_BATCH_SIZE: usize = 100;
const DEFAULT_BATCH_SIZE: usize = 500;

/// Rendering-strategy hints derived from current metrics and thresholds.
///
/// Stateless and recomputed on every call, so a recommendation set is always
/// consistent with the rolling averages it was derived from; nothing here is
/// ever cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecommendations {
    /// Render only the viewport subset of items.
    pub should_use_virtual_scrolling: bool,
    /// Move item drawing onto the GPU.
    pub should_use_webgl: bool,
    /// Drop decorations/detail from individual items.
    pub should_reduce_item_complexity: bool,
    /// Defer fetching of off-screen items.
    pub should_enable_lazy_loading: bool,
    /// Simplify or disable animations.
    pub should_optimize_animations: bool,
    /// Extra off-screen items to render beyond the viewport.
    pub recommended_overscan: usize,
    /// Items to process per rendering batch.
    pub recommended_batch_size: usize,
}

impl PerformanceRecommendations {
    /// Derive a recommendation set.
    ///
    /// `avg_render_time` is the rolling average over the render window (0.0
    /// when no renders have been measured yet).
    pub fn derive(
        metrics: &PerformanceMetrics,
        avg_render_time: f64,
        thresholds: &PerformanceThresholds,
    ) -> Self {
        Self {
            should_use_virtual_scrolling: metrics.item_count > thresholds.max_visible_items
                || avg_render_time > thresholds.max_render_time,
            should_use_webgl: metrics.frame_rate < thresholds.min_frame_rate
                || metrics.item_count > GPU_ITEM_THRESHOLD,
            should_reduce_item_complexity: avg_render_time > thresholds.max_render_time * 2.0,
            should_enable_lazy_loading: metrics.item_count > LAZY_LOAD_ITEM_THRESHOLD,
            should_optimize_animations: metrics.frame_rate < thresholds.min_frame_rate,
            recommended_overscan: if metrics.item_count > LAZY_LOAD_ITEM_THRESHOLD {
                DENSE_OVERSCAN
            } else {
                DEFAULT_OVERSCAN
            },
            recommended_batch_size: if metrics.item_count > LARGE_DATASET_ITEM_THRESHOLD {
                SMALL_BATCH_SIZE
            } else {
                DEFAULT_BATCH_SIZE
            },
        }
    }

    /// Performance is good when none of the heavyweight strategy changes
    /// (virtualization, GPU rendering, complexity reduction) are called for.
    pub fn is_performance_good(&self) -> bool {
        !(self.should_use_virtual_scrolling
            || self.should_use_webgl
            || self.should_reduce_item_complexity)
    }

    /// Labels of the recommendations that are currently active.
    pub fn active(&self) -> Vec<&'static str> {
        let mut active = Vec::new();
        if self.should_use_virtual_scrolling {
            active.push("virtual scrolling");
        }
        if self.should_use_webgl {
            active.push("webgl rendering");
        }
        if self.should_reduce_item_complexity {
            active.push("reduce item complexity");
        }
        if self.should_enable_lazy_loading {
            active.push("lazy loading");
        }
        if self.should_optimize_animations {
            active.push("optimize animations");
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn metrics_with(item_count: usize, frame_rate: f64) -> PerformanceMetrics {
        PerformanceMetrics {
            item_count,
            frame_rate,
            ..Default::default()
        }
    }

    // A frame rate comfortably above the default 30fps floor, so only the
    // inputs under test drive the outcome.
    const SMOOTH_FPS: f64 = 60.0;

    #[test]
    fn test_virtual_scrolling_item_count_disjunct() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(1000, SMOOTH_FPS), 1.0, &thresholds);
        assert!(!rec.should_use_virtual_scrolling);

        let rec = PerformanceRecommendations::derive(&metrics_with(1001, SMOOTH_FPS), 1.0, &thresholds);
        assert!(rec.should_use_virtual_scrolling);
    }

    #[test]
    fn test_virtual_scrolling_render_time_disjunct() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(10, SMOOTH_FPS), 16.67, &thresholds);
        assert!(!rec.should_use_virtual_scrolling);

        let rec = PerformanceRecommendations::derive(&metrics_with(10, SMOOTH_FPS), 16.68, &thresholds);
        assert!(rec.should_use_virtual_scrolling);
    }

    #[test]
    fn test_webgl_disjuncts() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(5000, 29.0), 1.0, &thresholds);
        assert!(rec.should_use_webgl, "low frame rate alone triggers webgl");

        let rec = PerformanceRecommendations::derive(&metrics_with(5001, SMOOTH_FPS), 1.0, &thresholds);
        assert!(rec.should_use_webgl, "item count alone triggers webgl");

        let rec = PerformanceRecommendations::derive(&metrics_with(5000, SMOOTH_FPS), 1.0, &thresholds);
        assert!(!rec.should_use_webgl);
    }

    #[test]
    fn test_reduce_complexity_needs_double_budget() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(10, SMOOTH_FPS), 33.34, &thresholds);
        assert!(!rec.should_reduce_item_complexity);

        let rec = PerformanceRecommendations::derive(&metrics_with(10, SMOOTH_FPS), 33.35, &thresholds);
        assert!(rec.should_reduce_item_complexity);
    }

    #[test]
    fn test_overscan_boundary() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(10_000, SMOOTH_FPS), 1.0, &thresholds);
        assert_eq!(rec.recommended_overscan, 10);
        assert!(!rec.should_enable_lazy_loading);

        let rec = PerformanceRecommendations::derive(&metrics_with(10_001, SMOOTH_FPS), 1.0, &thresholds);
        assert_eq!(rec.recommended_overscan, 5);
        assert!(rec.should_enable_lazy_loading);
    }

    #[test]
    fn test_batch_size_boundary() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(50_000, SMOOTH_FPS), 1.0, &thresholds);
        assert_eq!(rec.recommended_batch_size, 500);

        let rec = PerformanceRecommendations::derive(&metrics_with(50_001, SMOOTH_FPS), 1.0, &thresholds);
        assert_eq!(rec.recommended_batch_size, 100);
    }

    #[test]
    fn test_animations_follow_frame_rate() {
        let thresholds = PerformanceThresholds::default();

        let rec = PerformanceRecommendations::derive(&metrics_with(10, 29.9), 1.0, &thresholds);
        assert!(rec.should_optimize_animations);

        let rec = PerformanceRecommendations::derive(&metrics_with(10, 30.0), 1.0, &thresholds);
        assert!(!rec.should_optimize_animations);
    }

    #[test]
    fn test_is_performance_good_ignores_lazy_loading() {
        let rec = PerformanceRecommendations {
            should_use_virtual_scrolling: false,
            should_use_webgl: false,
            should_reduce_item_complexity: false,
            should_enable_lazy_loading: true,
            should_optimize_animations: true,
            recommended_overscan: 10,
            recommended_batch_size: 500,
        };
        assert!(rec.is_performance_good());
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = PerformanceThresholds::default()
            .with_visible_items(100)
            .with_render_time(8.0);

        let rec = PerformanceRecommendations::derive(&metrics_with(101, SMOOTH_FPS), 1.0, &thresholds);
        assert!(rec.should_use_virtual_scrolling);

        let rec = PerformanceRecommendations::derive(&metrics_with(50, SMOOTH_FPS), 9.0, &thresholds);
        assert!(rec.should_use_virtual_scrolling);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let thresholds = PerformanceThresholds::default();
        let rec = PerformanceRecommendations::derive(&metrics_with(12_000, 20.0), 30.0, &thresholds);

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"shouldUseVirtualScrolling\":true"));

        let parsed: PerformanceRecommendations = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rec);
    }

    proptest! {
        #[test]
        fn prop_virtual_scrolling_matches_disjunction(
            item_count in 0usize..200_000,
            render_time in 0.0f64..200.0,
        ) {
            let thresholds = PerformanceThresholds::default();
            let rec = PerformanceRecommendations::derive(
                &metrics_with(item_count, SMOOTH_FPS),
                render_time,
                &thresholds,
            );

            let expected = item_count > 1000 || render_time > 16.67;
            prop_assert_eq!(rec.should_use_virtual_scrolling, expected);
        }

        #[test]
        fn prop_overscan_and_batch_track_item_count(item_count in 0usize..200_000) {
            let thresholds = PerformanceThresholds::default();
            let rec = PerformanceRecommendations::derive(
                &metrics_with(item_count, SMOOTH_FPS),
                1.0,
                &thresholds,
            );

            prop_assert_eq!(rec.recommended_overscan, if item_count > 10_000 { 5 } else { 10 });
            prop_assert_eq!(rec.recommended_batch_size, if item_count > 50_000 { 100 } else { 500 });
        }

        #[test]
        fn prop_good_performance_has_no_heavy_recommendations(
            item_count in 0usize..5_000,
            render_time in 0.0f64..200.0,
            frame_rate in 0.0f64..240.0,
        ) {
            let thresholds = PerformanceThresholds::default();
            let rec = PerformanceRecommendations::derive(
                &metrics_with(item_count, frame_rate),
                render_time,
                &thresholds,
            );

            if rec.is_performance_good() {
                prop_assert!(!rec.should_use_virtual_scrolling);
                prop_assert!(!rec.should_use_webgl);
                prop_assert!(!rec.should_reduce_item_complexity);
            }
        }
    }
}
