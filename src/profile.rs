//! Profiling: an injected capability for per-cycle timing.
//!
//! A [`Runner`](crate::runner::Runner) built with profiling enabled times
//! each instrumented section of a cycle and feeds the measurement to an
//! attached [`Profiler`]. The profiler's report is returned as data when
//! the runner is joined, never printed from a destructor, so callers can
//! route it anywhere.

use std::fmt;
use std::time::Duration;

/// Maximum number of entries a report keeps, sorted by total time.
pub const REPORT_LIMIT: usize = 15;

/// The instrumented sections of a runner cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// One-time visual setup before the first fill.
    Init,
    /// The visual mutating the panel.
    Fill,
    /// The renderer consuming the panel.
    Render,
}

impl Phase {
    /// Human-readable label for reports and fault logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Fill => "fill",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A timing sink the runner feeds while profiling is enabled.
pub trait Profiler: Send {
    /// Record one timed call of `phase`.
    fn record(&mut self, phase: Phase, elapsed: Duration);

    /// Produce the accumulated statistics.
    fn report(&self) -> ProfileReport;
}

/// Accumulated statistics for one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Phase label.
    pub label: &'static str,
    /// Number of recorded calls.
    pub calls: u64,
    /// Sum of all recorded durations.
    pub total: Duration,
    /// Longest single recorded duration.
    pub max: Duration,
}

impl ProfileEntry {
    /// Mean duration per call.
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / u32::try_from(self.calls).unwrap_or(u32::MAX)
        }
    }
}

/// A finished profiling report, sorted by total time descending and
/// truncated to [`REPORT_LIMIT`] entries.
#[derive(Debug, Clone, Default)]
pub struct ProfileReport {
    entries: Vec<ProfileEntry>,
}

impl ProfileReport {
    /// Build a report from raw entries: sorts by total time (descending)
    /// and keeps the top [`REPORT_LIMIT`].
    pub fn from_entries(mut entries: Vec<ProfileEntry>) -> Self {
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        entries.truncate(REPORT_LIMIT);
        Self { entries }
    }

    /// The report entries, hottest first.
    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8} {:>8} {:>12} {:>12} {:>12}", "phase", "calls", "total", "mean", "max")?;
        for e in &self.entries {
            writeln!(
                f,
                "{:<8} {:>8} {:>12.3?} {:>12.3?} {:>12.3?}",
                e.label,
                e.calls,
                e.total,
                e.mean(),
                e.max
            )?;
        }
        Ok(())
    }
}

/// Default profiler: per-phase call counts plus total and max durations.
#[derive(Debug, Default)]
pub struct StatsProfiler {
    init: Counter,
    fill: Counter,
    render: Counter,
}

#[derive(Debug, Default)]
struct Counter {
    calls: u64,
    total: Duration,
    max: Duration,
}

impl Counter {
    fn record(&mut self, elapsed: Duration) {
        self.calls += 1;
        self.total += elapsed;
        self.max = self.max.max(elapsed);
    }

    fn entry(&self, label: &'static str) -> Option<ProfileEntry> {
        (self.calls > 0).then(|| ProfileEntry {
            label,
            calls: self.calls,
            total: self.total,
            max: self.max,
        })
    }
}

impl StatsProfiler {
    /// Create an empty profiler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Profiler for StatsProfiler {
    fn record(&mut self, phase: Phase, elapsed: Duration) {
        match phase {
            Phase::Init => self.init.record(elapsed),
            Phase::Fill => self.fill.record(elapsed),
            Phase::Render => self.render.record(elapsed),
        }
    }

    fn report(&self) -> ProfileReport {
        let entries = [
            self.init.entry(Phase::Init.label()),
            self.fill.entry(Phase::Fill.label()),
            self.render.entry(Phase::Render.label()),
        ]
        .into_iter()
        .flatten()
        .collect();
        ProfileReport::from_entries(entries)
    }
}
