//! Visual: the pluggable effect a runner executes.

use super::messages::VisualError;
use crate::panel::Panel;

/// A visualization effect driven by a [`Runner`](super::Runner).
///
/// Both operations default to no-ops so trivial visuals only implement
/// what they need.
pub trait Visual: Send {
    /// One-time setup, called exactly once before the first [`fill`](Visual::fill).
    ///
    /// There is no timeout: an `init` that blocks forever stalls the
    /// runner forever.
    fn init(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        let _ = panel;
        Ok(())
    }

    /// Mutate the panel for one frame.
    ///
    /// Called once per cycle at the configured period, with the panel
    /// lock held; must tolerate being called repeatedly.
    fn fill(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        let _ = panel;
        Ok(())
    }
}

impl<V: Visual + ?Sized> Visual for Box<V> {
    fn init(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        (**self).init(panel)
    }

    fn fill(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        (**self).fill(panel)
    }
}
