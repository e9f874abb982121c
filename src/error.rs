//! Crate-level error type.

/// Errors surfaced by runner and controller lifecycle operations.
///
/// Faults raised *inside* a running cycle (by a visual or renderer) are
/// not part of this enum; those travel over the runner's fault channel
/// as [`CycleFault`](crate::runner::CycleFault)s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A runner was constructed with an empty display name.
    #[error("runner name must not be empty")]
    EmptyName,

    /// The OS refused to spawn the runner thread.
    #[error("failed to spawn runner thread")]
    Spawn(#[source] std::io::Error),

    /// The runner thread panicked; no outcome is available.
    #[error("runner thread panicked")]
    RunnerPanicked,

    /// Installing the Ctrl-C handler failed.
    #[error("failed to install interrupt handler")]
    Interrupt(#[source] ctrlc::Error),
}
