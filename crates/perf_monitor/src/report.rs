//! On-demand performance reports.

use serde::{Deserialize, Serialize};

use crate::error::MonitorResult;
use crate::metrics::PerformanceMetrics;
use crate::recommend::PerformanceRecommendations;
use crate::thresholds::PerformanceThresholds;

/// A point-in-time performance report.
///
/// Assembled by [`crate::PerformanceMonitor::report`] from the snapshot,
/// rolling averages, and recommendations current at the moment of the call;
/// nothing in it is cached between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    /// The metrics snapshot the report was derived from
    pub metrics: PerformanceMetrics,
    /// Rolling average render time in milliseconds
    pub avg_render_time: f64,
    /// Rolling average scroll latency in milliseconds
    pub avg_scroll_time: f64,
    /// Rolling average zoom latency in milliseconds
    pub avg_zoom_time: f64,
    /// Rolling average pan latency in milliseconds
    pub avg_pan_time: f64,
    /// Strategy recommendations active at report time
    pub recommendations: PerformanceRecommendations,
    /// Threshold configuration the judgments were made against
    pub thresholds: PerformanceThresholds,
    /// Aggregate score from 0 (all budgets blown) to 100 (all within budget)
    pub score: u8,
    /// Whether no heavyweight strategy change is called for
    pub good: bool,
}

impl PerformanceReport {
    /// Serialize the report as a JSON string.
    pub fn to_json(&self) -> MonitorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Aggregate 0-100 score: 25 points per budget area (render, frame rate,
/// memory, gestures), lost wholesale when the area is over budget.
pub(crate) fn score(
    metrics: &PerformanceMetrics,
    avg_render_time: f64,
    avg_scroll_time: f64,
    avg_zoom_time: f64,
    avg_pan_time: f64,
    thresholds: &PerformanceThresholds,
) -> u8 {
    let mut score: i32 = 100;

    if avg_render_time > thresholds.max_render_time {
        score -= 25;
    }
    if metrics.frame_rate < thresholds.min_frame_rate {
        score -= 25;
    }
    if metrics.memory_usage > thresholds.max_memory_usage {
        score -= 25;
    }
    if avg_scroll_time > thresholds.max_scroll_latency
        || avg_zoom_time > thresholds.max_zoom_latency
        || avg_pan_time > thresholds.max_pan_latency
    {
        score -= 25;
    }

    score.max(0) as u8
}

impl std::fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Timeline Performance Report")?;
        writeln!(
            f,
            "  Render Time: {:.2}ms avg (budget: {:.2}ms)",
            self.avg_render_time, self.thresholds.max_render_time
        )?;
        writeln!(
            f,
            "  Frame Rate: {:.1}fps (floor: {:.1}fps)",
            self.metrics.frame_rate, self.thresholds.min_frame_rate
        )?;
        writeln!(
            f,
            "  Memory Usage: {:.1}MB (budget: {:.1}MB)",
            self.metrics.memory_usage, self.thresholds.max_memory_usage
        )?;
        writeln!(f, "  Total Items: {}", self.metrics.item_count)?;
        writeln!(f, "  Visible Items: {}", self.metrics.visible_item_count)?;

        let active = self.recommendations.active();
        if active.is_empty() {
            writeln!(f, "  Recommendations: none")?;
        } else {
            writeln!(f, "  Recommendations: {}", active.join(", "))?;
        }

        write!(
            f,
            "  Status: {} (score {}/100)",
            if self.good { "GOOD" } else { "NEEDS OPTIMIZATION" },
            self.score
        )
    }
}
