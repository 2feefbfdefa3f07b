//! Performance Monitoring and Adaptive Rendering
//!
//! This crate provides the performance infrastructure for large-dataset
//! timeline views:
//! - Paired start/end timing for render passes and scroll/zoom/pan gestures
//! - Rolling 60-sample windows for frame deltas and activity latencies
//! - Background frame-rate and heap-usage samplers with disposable handles
//! - A stateless recommendation engine advising rendering-strategy changes
//!   (virtualization, GPU rendering, batching, lazy loading)
//! - Synchronous observer notification after every render measurement
//!
//! Each visualized component owns one [`PerformanceMonitor`]; nothing here
//! is a process-wide singleton. The owning component supplies the timing
//! calls and consumes metrics and recommendations; rendering decisions stay
//! with the component.
//!
//! # Example
//!
//! ```rust
//! use perf_monitor::{PerformanceMonitor, ThresholdOverrides};
//!
//! let mut monitor = PerformanceMonitor::with_thresholds(
//!     ThresholdOverrides::default().render_time(8.0),
//! );
//!
//! monitor.start_render();
//! // ... draw the visible slice ...
//! monitor.end_render(2_000, 150);
//!
//! let recommendations = monitor.get_recommendations();
//! assert!(recommendations.should_use_virtual_scrolling);
//! ```
//!
//! # Modules
//!
//! - [`monitor`](PerformanceMonitor) - timing API, snapshot, subscriptions
//! - [`recommend`](PerformanceRecommendations) - strategy derivation
//! - [`sampler`](FrameSampler) - background frame/memory samplers
//! - [`probe`](MemoryProbe) - capability-gated heap introspection
//! - [`report`](PerformanceReport) - on-demand reports

mod error;
mod metrics;
mod monitor;
mod observer;
mod probe;
mod recommend;
mod report;
mod sampler;
mod thresholds;
mod window;

pub use error::{MonitorError, MonitorResult};
pub use metrics::PerformanceMetrics;
pub use monitor::{GestureKind, PerformanceMonitor};
pub use observer::{ObserverCallback, ObserverId};
pub use probe::{detect, FixedProbe, MemoryProbe, NullProbe};
#[cfg(target_os = "linux")]
pub use probe::ProcessMemoryProbe;
pub use recommend::PerformanceRecommendations;
pub use report::PerformanceReport;
pub use sampler::{shared, FrameSampler, MemorySampler, SharedMonitor};
pub use thresholds::{PerformanceThresholds, ThresholdOverrides};
pub use window::SampleWindow;
