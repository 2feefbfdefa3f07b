//! The performance monitor owned by a timeline visualization component.

use std::time::Instant;

use chrono::Utc;

use crate::metrics::PerformanceMetrics;
use crate::observer::{ObserverHub, ObserverId};
use crate::probe::{self, MemoryProbe};
use crate::recommend::PerformanceRecommendations;
use crate::report::{self, PerformanceReport};
use crate::thresholds::{PerformanceThresholds, ThresholdOverrides};
use crate::window::SampleWindow;

/// Samples retained per rolling window (1 second of frames at 60 FPS).
const SAMPLE_WINDOW_SIZE: usize = 60;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A timed user interaction measured independently of render latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Scroll,
    Zoom,
    Pan,
}

impl GestureKind {
    /// Stable label used in trace output.
    pub fn label(&self) -> &'static str {
        match self {
            GestureKind::Scroll => "scroll",
            GestureKind::Zoom => "zoom",
            GestureKind::Pan => "pan",
        }
    }
}

/// Performance monitor and adaptive-rendering advisor.
///
/// One instance belongs to each visualized component: the component brackets
/// every render pass with [`start_render`](Self::start_render) /
/// [`end_render`](Self::end_render) and each gesture with the matching
/// start/end pair, while the frame and memory samplers feed
/// [`frame_tick`](Self::frame_tick) and [`sample_memory`](Self::sample_memory)
/// independently. [`get_recommendations`](Self::get_recommendations) can be
/// called at any time and always reflects the latest rolling averages.
///
/// All methods take `&mut self`; for the background samplers wrap the
/// monitor in [`crate::SharedMonitor`]. Observer callbacks run synchronously
/// inside `end_render` and must not call back into the owning monitor.
///
/// # Example
///
/// ```rust
/// use perf_monitor::PerformanceMonitor;
///
/// let mut monitor = PerformanceMonitor::new();
///
/// monitor.start_render();
/// // ... draw the visible slice ...
/// monitor.end_render(12_000, 200);
///
/// let recommendations = monitor.get_recommendations();
/// assert!(recommendations.should_use_virtual_scrolling);
/// ```
pub struct PerformanceMonitor {
    metrics: PerformanceMetrics,
    thresholds: PerformanceThresholds,

    frame_times: SampleWindow,
    render_times: SampleWindow,
    scroll_times: SampleWindow,
    zoom_times: SampleWindow,
    pan_times: SampleWindow,

    // Pending measurement starts; None is "nothing in flight".
    pending_render: Option<Instant>,
    pending_scroll: Option<Instant>,
    pending_zoom: Option<Instant>,
    pending_pan: Option<Instant>,
    last_frame: Option<Instant>,

    probe: Box<dyn MemoryProbe>,
    observers: ObserverHub,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    /// Create a monitor with default thresholds and the platform memory
    /// probe.
    pub fn new() -> Self {
        Self::with_thresholds(ThresholdOverrides::default())
    }

    /// Create a monitor with the given threshold overrides merged over the
    /// defaults.
    pub fn with_thresholds(overrides: ThresholdOverrides) -> Self {
        Self {
            metrics: PerformanceMetrics::default(),
            thresholds: PerformanceThresholds::merged(overrides),
            frame_times: SampleWindow::new(SAMPLE_WINDOW_SIZE),
            render_times: SampleWindow::new(SAMPLE_WINDOW_SIZE),
            scroll_times: SampleWindow::new(SAMPLE_WINDOW_SIZE),
            zoom_times: SampleWindow::new(SAMPLE_WINDOW_SIZE),
            pan_times: SampleWindow::new(SAMPLE_WINDOW_SIZE),
            pending_render: None,
            pending_scroll: None,
            pending_zoom: None,
            pending_pan: None,
            last_frame: None,
            probe: probe::detect(),
            observers: ObserverHub::new(),
        }
    }

    /// Replace the memory probe.
    pub fn with_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    // =========================================================================
    // Render timing
    // =========================================================================

    /// Mark the start of a render pass.
    ///
    /// A second call before the matching [`end_render`](Self::end_render)
    /// overwrites the pending timestamp: the last start wins and the earlier
    /// measurement is silently discarded.
    pub fn start_render(&mut self) {
        self.pending_render = Some(Instant::now());
    }

    /// Mark the end of a render pass.
    ///
    /// Without a preceding [`start_render`](Self::start_render) this is a
    /// silent no-op. Otherwise the elapsed time joins the render window, the
    /// snapshot is updated with the item counts, and all observers are
    /// notified synchronously.
    pub fn end_render(&mut self, item_count: usize, visible_item_count: usize) {
        let Some(start) = self.pending_render.take() else {
            return;
        };
        self.record_render(elapsed_ms(start), item_count, visible_item_count);
    }

    /// Record a render duration measured by the host itself.
    pub fn record_render(&mut self, duration_ms: f64, item_count: usize, visible_item_count: usize) {
        self.render_times.push(duration_ms);
        self.metrics.render_time = duration_ms;
        self.metrics.item_count = item_count;
        self.metrics.visible_item_count = visible_item_count;
        self.metrics.last_update = Utc::now();

        tracing::trace!(
            target: "perf::render",
            duration_ms,
            item_count,
            visible_item_count,
            "render recorded"
        );
        if !self.thresholds.check_render_time(duration_ms) {
            tracing::debug!(
                target: "perf::render",
                duration_ms,
                budget_ms = self.thresholds.max_render_time,
                "render exceeded budget"
            );
        }

        self.observers.notify(&self.metrics);
    }

    /// Time a render pass expressed as a closure.
    pub fn measure_render<F, R>(&mut self, item_count: usize, visible_item_count: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.start_render();
        let result = f();
        self.end_render(item_count, visible_item_count);
        result
    }

    // =========================================================================
    // Gesture timing
    // =========================================================================

    /// Mark the start of a gesture. Last start wins, as with renders.
    pub fn start_gesture(&mut self, kind: GestureKind) {
        *self.pending_slot(kind) = Some(Instant::now());
    }

    /// Mark the end of a gesture; a silent no-op without a matching start.
    ///
    /// Gesture measurements update the snapshot's latency gauges but do not
    /// notify observers; only render measurements do.
    pub fn end_gesture(&mut self, kind: GestureKind) {
        let Some(start) = self.pending_slot(kind).take() else {
            return;
        };
        self.record_gesture(kind, elapsed_ms(start));
    }

    /// Record a gesture duration measured by the host itself.
    pub fn record_gesture(&mut self, kind: GestureKind, duration_ms: f64) {
        match kind {
            GestureKind::Scroll => {
                self.scroll_times.push(duration_ms);
                self.metrics.scroll_performance = duration_ms;
            }
            GestureKind::Zoom => {
                self.zoom_times.push(duration_ms);
                self.metrics.zoom_performance = duration_ms;
            }
            GestureKind::Pan => {
                self.pan_times.push(duration_ms);
                self.metrics.pan_performance = duration_ms;
            }
        }

        tracing::trace!(
            target: "perf::gesture",
            gesture = kind.label(),
            duration_ms,
            "gesture recorded"
        );
    }

    /// Mark the start of a scroll gesture.
    #[inline]
    pub fn start_scroll(&mut self) {
        self.start_gesture(GestureKind::Scroll);
    }

    /// Mark the end of a scroll gesture.
    #[inline]
    pub fn end_scroll(&mut self) {
        self.end_gesture(GestureKind::Scroll);
    }

    /// Mark the start of a zoom gesture.
    #[inline]
    pub fn start_zoom(&mut self) {
        self.start_gesture(GestureKind::Zoom);
    }

    /// Mark the end of a zoom gesture.
    #[inline]
    pub fn end_zoom(&mut self) {
        self.end_gesture(GestureKind::Zoom);
    }

    /// Mark the start of a pan gesture.
    #[inline]
    pub fn start_pan(&mut self) {
        self.start_gesture(GestureKind::Pan);
    }

    /// Mark the end of a pan gesture.
    #[inline]
    pub fn end_pan(&mut self) {
        self.end_gesture(GestureKind::Pan);
    }

    // =========================================================================
    // Frame and memory sampling
    // =========================================================================

    /// Record a frame boundary.
    ///
    /// The first tick only establishes the baseline; every later tick pushes
    /// the inter-frame delta into the frame window and refreshes the rolling
    /// frame rate.
    pub fn frame_tick(&mut self) {
        self.frame_tick_at(Instant::now());
    }

    pub(crate) fn frame_tick_at(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            let delta_ms = now.duration_since(last).as_secs_f64() * 1000.0;
            self.frame_times.push(delta_ms);
            let mean = self.frame_times.mean();
            if mean > 0.0 {
                self.metrics.frame_rate = 1000.0 / mean;
            }
            tracing::trace!(
                target: "perf::frame",
                delta_ms,
                frame_rate = self.metrics.frame_rate,
                "frame recorded"
            );
        }
        self.last_frame = Some(now);
    }

    /// Read the heap probe into the snapshot.
    ///
    /// Without a probe capability this leaves `memory_usage` at 0; absence
    /// is degradation, not an error.
    pub fn sample_memory(&mut self) {
        if let Some(bytes) = self.probe.heap_used_bytes() {
            self.metrics.memory_usage = bytes as f64 / BYTES_PER_MB;
            tracing::trace!(
                target: "perf::memory",
                memory_mb = self.metrics.memory_usage,
                "heap sampled"
            );
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// A copy of the current snapshot, never a live reference.
    pub fn get_metrics(&self) -> PerformanceMetrics {
        self.metrics.clone()
    }

    /// Rolling average render time in milliseconds (0.0 before any render).
    pub fn avg_render_time(&self) -> f64 {
        self.render_times.mean()
    }

    /// Rolling average latency for the given gesture in milliseconds.
    pub fn avg_gesture_time(&self, kind: GestureKind) -> f64 {
        match kind {
            GestureKind::Scroll => self.scroll_times.mean(),
            GestureKind::Zoom => self.zoom_times.mean(),
            GestureKind::Pan => self.pan_times.mean(),
        }
    }

    /// Derive rendering-strategy recommendations from the latest rolling
    /// averages. Recomputed on every call, never cached.
    pub fn get_recommendations(&self) -> PerformanceRecommendations {
        PerformanceRecommendations::derive(
            &self.metrics,
            self.render_times.mean(),
            &self.thresholds,
        )
    }

    /// Whether none of the heavyweight strategy changes are called for.
    pub fn is_performance_good(&self) -> bool {
        self.get_recommendations().is_performance_good()
    }

    /// Assemble an on-demand report of the current state.
    pub fn report(&self) -> PerformanceReport {
        let recommendations = self.get_recommendations();
        let avg_render_time = self.render_times.mean();
        let avg_scroll_time = self.scroll_times.mean();
        let avg_zoom_time = self.zoom_times.mean();
        let avg_pan_time = self.pan_times.mean();

        let score = report::score(
            &self.metrics,
            avg_render_time,
            avg_scroll_time,
            avg_zoom_time,
            avg_pan_time,
            &self.thresholds,
        );

        PerformanceReport {
            metrics: self.metrics.clone(),
            avg_render_time,
            avg_scroll_time,
            avg_zoom_time,
            avg_pan_time,
            recommendations,
            thresholds: self.thresholds.clone(),
            score,
            good: recommendations.is_performance_good(),
        }
    }

    /// The active threshold configuration.
    pub fn thresholds(&self) -> &PerformanceThresholds {
        &self.thresholds
    }

    /// Shallow-merge threshold overrides into the active configuration.
    pub fn set_thresholds(&mut self, overrides: ThresholdOverrides) {
        self.thresholds.apply(overrides);
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register an observer notified after every render measurement.
    ///
    /// The callback runs synchronously on the `end_render` call stack and
    /// must not call back into this monitor. Keep the returned id and pass
    /// it to [`unsubscribe`](Self::unsubscribe) on teardown.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&PerformanceMetrics) + Send + 'static,
    {
        self.observers.subscribe(Box::new(callback))
    }

    /// Remove an observer. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Clear all metrics, windows, and in-flight measurements.
    ///
    /// Thresholds, the memory probe, and existing subscriptions survive a
    /// reset.
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.render_times.clear();
        self.scroll_times.clear();
        self.zoom_times.clear();
        self.pan_times.clear();
        self.pending_render = None;
        self.pending_scroll = None;
        self.pending_zoom = None;
        self.pending_pan = None;
        self.last_frame = None;
        self.metrics = PerformanceMetrics::default();
    }

    fn pending_slot(&mut self, kind: GestureKind) -> &mut Option<Instant> {
        match kind {
            GestureKind::Scroll => &mut self.pending_scroll,
            GestureKind::Zoom => &mut self.pending_zoom,
            GestureKind::Pan => &mut self.pending_pan,
        }
    }
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("metrics", &self.metrics)
            .field("thresholds", &self.thresholds)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

#[inline]
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
