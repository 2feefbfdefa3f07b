//! Background samplers driving a shared monitor.
//!
//! The frame and memory samplers run on their own timers, decoupled from
//! render and gesture timing. Each is created by `start` and owns its
//! cancellation: dropping the handle (or calling `stop`) signals the thread
//! and joins it, so the owning component releases the timer
//! deterministically on teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::MonitorResult;
use crate::monitor::PerformanceMonitor;

/// A monitor shared between the owning component and background samplers.
pub type SharedMonitor = Arc<Mutex<PerformanceMonitor>>;

/// Wrap a monitor for use with the background samplers.
pub fn shared(monitor: PerformanceMonitor) -> SharedMonitor {
    Arc::new(Mutex::new(monitor))
}

/// Granularity of the stop-flag checks while a sampler sleeps between ticks.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct SamplerThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SamplerThread {
    fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                tick();
                sleep_unless_stopped(&flag, interval);
            }
        })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SamplerThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn sleep_unless_stopped(stop: &AtomicBool, interval: Duration) {
    let mut remaining = interval;
    while !remaining.is_zero() && !stop.load(Ordering::Relaxed) {
        let slice = remaining.min(STOP_POLL_INTERVAL);
        thread::sleep(slice);
        remaining -= slice;
    }
}

/// Periodic frame-boundary sampler.
///
/// Calls [`PerformanceMonitor::frame_tick`] on the shared monitor at the
/// configured interval so the rolling frame rate stays current even while
/// the host is idle.
pub struct FrameSampler {
    inner: SamplerThread,
}

impl FrameSampler {
    /// Default tick interval: one frame at 60 FPS.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_micros(16_670);

    /// Start sampling at the default 60Hz interval.
    pub fn start(monitor: SharedMonitor) -> MonitorResult<Self> {
        Self::with_interval(monitor, Self::DEFAULT_INTERVAL)
    }

    /// Start sampling at a custom interval.
    pub fn with_interval(monitor: SharedMonitor, interval: Duration) -> MonitorResult<Self> {
        let inner = SamplerThread::spawn("perf-frame-sampler", interval, move || {
            if let Ok(mut monitor) = monitor.lock() {
                monitor.frame_tick();
            }
        })?;
        tracing::trace!(target: "perf::frame", ?interval, "frame sampler started");
        Ok(Self { inner })
    }

    /// Stop the sampler and join its thread.
    pub fn stop(mut self) {
        self.inner.shutdown();
    }
}

/// Periodic heap-usage sampler.
///
/// Calls [`PerformanceMonitor::sample_memory`] every second (by default).
/// On platforms without a heap probe the ticks are harmless no-ops and the
/// gauge stays at 0.
pub struct MemorySampler {
    inner: SamplerThread,
}

impl MemorySampler {
    /// Default sampling interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// Start sampling at the default 1 second interval.
    pub fn start(monitor: SharedMonitor) -> MonitorResult<Self> {
        Self::with_interval(monitor, Self::DEFAULT_INTERVAL)
    }

    /// Start sampling at a custom interval.
    pub fn with_interval(monitor: SharedMonitor, interval: Duration) -> MonitorResult<Self> {
        let inner = SamplerThread::spawn("perf-memory-sampler", interval, move || {
            if let Ok(mut monitor) = monitor.lock() {
                monitor.sample_memory();
            }
        })?;
        tracing::trace!(target: "perf::memory", ?interval, "memory sampler started");
        Ok(Self { inner })
    }

    /// Stop the sampler and join its thread.
    pub fn stop(mut self) {
        self.inner.shutdown();
    }
}
