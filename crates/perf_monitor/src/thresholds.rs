//! Performance thresholds and partial overrides.

use serde::{Deserialize, Serialize};

use crate::monitor::GestureKind;

/// Threshold configuration for the monitor.
///
/// Set at construction and replaceable later by shallow merge of a
/// [`ThresholdOverrides`]; every field a recommendation decision compares
/// against lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceThresholds {
    /// Maximum acceptable render time in milliseconds.
    ///
    /// Target: 16.67ms for 60fps.
    pub max_render_time: f64,
    /// Minimum acceptable frame rate in frames per second.
    pub min_frame_rate: f64,
    /// Maximum acceptable heap usage in megabytes.
    pub max_memory_usage: f64,
    /// Item count above which virtualization is recommended.
    pub max_visible_items: usize,
    /// Maximum acceptable scroll gesture latency in milliseconds.
    pub max_scroll_latency: f64,
    /// Maximum acceptable zoom gesture latency in milliseconds.
    pub max_zoom_latency: f64,
    /// Maximum acceptable pan gesture latency in milliseconds.
    pub max_pan_latency: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            max_render_time: 16.67,
            min_frame_rate: 30.0,
            max_memory_usage: 100.0,
            max_visible_items: 1000,
            max_scroll_latency: 16.67,
            max_zoom_latency: 16.67,
            max_pan_latency: 16.67,
        }
    }
}

impl PerformanceThresholds {
    /// Build a threshold set from the defaults plus the given overrides.
    pub fn merged(overrides: ThresholdOverrides) -> Self {
        let mut thresholds = Self::default();
        thresholds.apply(overrides);
        thresholds
    }

    /// Shallow-merge the provided fields, leaving the rest untouched.
    pub fn apply(&mut self, overrides: ThresholdOverrides) {
        if let Some(v) = overrides.max_render_time {
            self.max_render_time = v;
        }
        if let Some(v) = overrides.min_frame_rate {
            self.min_frame_rate = v;
        }
        if let Some(v) = overrides.max_memory_usage {
            self.max_memory_usage = v;
        }
        if let Some(v) = overrides.max_visible_items {
            self.max_visible_items = v;
        }
        if let Some(v) = overrides.max_scroll_latency {
            self.max_scroll_latency = v;
        }
        if let Some(v) = overrides.max_zoom_latency {
            self.max_zoom_latency = v;
        }
        if let Some(v) = overrides.max_pan_latency {
            self.max_pan_latency = v;
        }
    }

    /// Builder method to set the render time budget.
    pub fn with_render_time(mut self, ms: f64) -> Self {
        self.max_render_time = ms;
        self
    }

    /// Builder method to set the minimum frame rate.
    pub fn with_frame_rate(mut self, fps: f64) -> Self {
        self.min_frame_rate = fps;
        self
    }

    /// Builder method to set the memory budget.
    pub fn with_memory_usage(mut self, mb: f64) -> Self {
        self.max_memory_usage = mb;
        self
    }

    /// Builder method to set the virtualization item limit.
    pub fn with_visible_items(mut self, count: usize) -> Self {
        self.max_visible_items = count;
        self
    }

    /// Check if a render time measurement is within budget.
    pub fn check_render_time(&self, ms: f64) -> bool {
        ms <= self.max_render_time
    }

    /// Check if a frame rate measurement is acceptable.
    pub fn check_frame_rate(&self, fps: f64) -> bool {
        fps >= self.min_frame_rate
    }

    /// Check if a heap usage measurement is within budget.
    pub fn check_memory_usage(&self, mb: f64) -> bool {
        mb <= self.max_memory_usage
    }

    /// Check if a gesture latency measurement is within budget.
    pub fn check_gesture_latency(&self, kind: GestureKind, ms: f64) -> bool {
        ms <= self.gesture_latency_budget(kind)
    }

    /// The latency budget for the given gesture kind, in milliseconds.
    pub fn gesture_latency_budget(&self, kind: GestureKind) -> f64 {
        match kind {
            GestureKind::Scroll => self.max_scroll_latency,
            GestureKind::Zoom => self.max_zoom_latency,
            GestureKind::Pan => self.max_pan_latency,
        }
    }
}

/// A partial threshold set.
///
/// Every field is optional; absent fields keep their current value when
/// merged. Doubles as the deserialization surface for host configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdOverrides {
    pub max_render_time: Option<f64>,
    pub min_frame_rate: Option<f64>,
    pub max_memory_usage: Option<f64>,
    pub max_visible_items: Option<usize>,
    pub max_scroll_latency: Option<f64>,
    pub max_zoom_latency: Option<f64>,
    pub max_pan_latency: Option<f64>,
}

impl ThresholdOverrides {
    /// Override the render time budget.
    pub fn render_time(mut self, ms: f64) -> Self {
        self.max_render_time = Some(ms);
        self
    }

    /// Override the minimum frame rate.
    pub fn frame_rate(mut self, fps: f64) -> Self {
        self.min_frame_rate = Some(fps);
        self
    }

    /// Override the memory budget.
    pub fn memory_usage(mut self, mb: f64) -> Self {
        self.max_memory_usage = Some(mb);
        self
    }

    /// Override the virtualization item limit.
    pub fn visible_items(mut self, count: usize) -> Self {
        self.max_visible_items = Some(count);
        self
    }

    /// Override the scroll latency budget.
    pub fn scroll_latency(mut self, ms: f64) -> Self {
        self.max_scroll_latency = Some(ms);
        self
    }

    /// Override the zoom latency budget.
    pub fn zoom_latency(mut self, ms: f64) -> Self {
        self.max_zoom_latency = Some(ms);
        self
    }

    /// Override the pan latency budget.
    pub fn pan_latency(mut self, ms: f64) -> Self {
        self.max_pan_latency = Some(ms);
        self
    }
}
