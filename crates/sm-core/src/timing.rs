//! Opt-in wall clock measurements.
//!
//! Off by default. Turn on with [`enable_timing`] or by setting `SM_TIMING`
//! in the environment; while off, timers report nothing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var_os("SM_TIMING").is_some()
}

/// Measures one labelled span.
pub struct Timer {
    label: &'static str,
    started: Option<Instant>,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: is_enabled().then(Instant::now),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elapsed seconds, or `None` when timing was off at [`Timer::start`].
    pub fn stop(self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }
}

/// Call count and total duration of a repeated operation, shareable as a
/// `static`.
pub struct CallStats {
    nanos: AtomicU64,
    calls: AtomicU64,
}

impl Default for CallStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStats {
    pub const fn new() -> Self {
        Self {
            nanos: AtomicU64::new(0),
            calls: AtomicU64::new(0),
        }
    }

    pub fn record(&self, seconds: f64) {
        self.nanos
            .fetch_add((seconds * 1e9) as u64, Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn total_seconds(&self) -> f64 {
        self.nanos.load(Ordering::Relaxed) as f64 * 1e-9
    }

    /// Mean seconds per call; zero before the first call.
    pub fn mean_seconds(&self) -> f64 {
        match self.calls() {
            0 => 0.0,
            n => self.total_seconds() / n as f64,
        }
    }

    pub fn reset(&self) {
        self.nanos.store(0, Ordering::Relaxed);
        self.calls.store(0, Ordering::Relaxed);
    }
}

/// Every trajectory generated in this process.
pub static GENERATE_CALLS: CallStats = CallStats::new();

/// Timings for one served simulation request.
#[derive(Debug, Clone, Default)]
pub struct PerfStats {
    pub generate_time_s: f64,
    pub render_time_s: f64,
    pub samples: usize,
}

impl PerfStats {
    /// Print to stdout when timing is on; silent otherwise.
    pub fn print_summary(&self) {
        if !is_enabled() {
            return;
        }

        println!("\n--- timing ---");
        print!("generate  {:.6}s", self.generate_time_s);
        if self.samples > 0 {
            print!(
                " ({} samples, {:.3}us each)",
                self.samples,
                self.generate_time_s * 1e6 / self.samples as f64
            );
        }
        println!();
        if self.render_time_s > 0.0 {
            println!("render    {:.6}s", self.render_time_s);
        }
        if GENERATE_CALLS.calls() > 0 {
            println!(
                "process   {} generate calls, {:.4}ms mean",
                GENERATE_CALLS.calls(),
                GENERATE_CALLS.mean_seconds() * 1e3
            );
        }
    }
}
