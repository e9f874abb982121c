//! Message types for runner communication.

use crate::panel::Panel;
use crate::profile::{Phase, ProfileReport};
use crate::render::Renderer;
use std::fmt;

/// The error type visuals raise from `init`/`fill`.
pub type VisualError = Box<dyn std::error::Error + Send + Sync>;

/// What the loop does after a fill or render fault.
///
/// Either way the fault is reported over the fault channel first. An
/// `init` fault always stops the runner regardless of policy: `init`
/// runs once and is never retried, so there is nothing to retry into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Stop the loop. The runner transitions to Stopped.
    #[default]
    Stop,
    /// Skip the rest of the faulted cycle and try again next cycle
    /// (fill and render faults only).
    RetryNextCycle,
}

/// A fault raised inside a running cycle, reported to the supervisor.
pub struct CycleFault {
    /// The cycle during which the fault occurred (1-based; 0 for init).
    pub cycle: u64,
    /// Which section of the cycle faulted.
    pub phase: Phase,
    /// The underlying error.
    pub error: VisualError,
}

impl fmt::Display for CycleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fault at cycle {}: {}", self.phase, self.cycle, self.error)
    }
}

impl fmt::Debug for CycleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleFault")
            .field("cycle", &self.cycle)
            .field("phase", &self.phase)
            .field("error", &self.error.to_string())
            .finish()
    }
}

/// Commands applied by the loop between cycles.
///
/// Swaps travel as messages instead of shared fields so a replacement
/// is atomic with respect to a frame.
pub(crate) enum RunnerCommand {
    /// Replace the display name.
    SetName(String),
    /// Replace the panel contents.
    SwapPanel(Panel),
    /// Replace the output sink.
    SwapRenderer(Box<dyn Renderer>),
}

/// What a joined runner hands back.
#[derive(Debug)]
pub struct RunnerOutcome {
    /// The runner's display name at the time it stopped.
    pub name: String,
    /// Number of completed fill+render cycles.
    pub cycles: u64,
    /// Profiling statistics, if a profiler was attached.
    pub profile: Option<ProfileReport>,
}
