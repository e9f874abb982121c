//! Runner: the background execution loop for a panel visualization.
//!
//! A [`Runner`] owns a panel, a [`Visual`] effect, and a
//! [`Renderer`](crate::render::Renderer). Starting it spawns a dedicated
//! thread that executes the Created → Running → Stopped state machine:
//!
//! ```text
//!        start()                stop()
//! Created ──────▶ Running ───────────────▶ Stopped
//!                   │
//!                   │  loop: lock panel → fill → render → unlock
//!                   │        → sleep(period) → re-check flag
//! ```
//!
//! The panel lock is held across fill **and** render, so a frame is never
//! observable mid-mutation; the sleep happens with the lock released.
//! Stopping is cooperative: the in-flight cycle always completes, and no
//! new cycle starts afterwards. A stopped runner cannot be restarted —
//! construct a new one.
//!
//! Faults raised by the visual or the renderer are never swallowed: each
//! one is reported over the handle's fault channel, and the configured
//! [`FaultPolicy`] decides whether the loop stops or retries on the next
//! cycle.

mod messages;
mod runner;
mod visual;

pub use messages::{CycleFault, FaultPolicy, RunnerOutcome, VisualError};
pub use runner::{Runner, RunnerConfig, RunnerHandle};
pub use visual::Visual;
