//! Controller: single-runner lifecycle host.
//!
//! The controller starts one runner as a background thread, then parks
//! the calling thread in a coarse poll loop until an interruption
//! arrives — Ctrl-C via [`install_ctrlc_handler`](Controller::install_ctrlc_handler),
//! or any clone of the [`InterruptHandle`]. While waiting it drains the
//! runner's fault reports into the log. On interruption it requests a
//! graceful stop and returns without joining the runner thread: exit is
//! immediate once the stop flag is set.

use crate::error::Error;
use crate::runner::Runner;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Configuration for a [`Controller`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How often the wait loop wakes to check for interruption.
    pub poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// A shareable trigger for the controller's wait loop.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    flag: Arc<AtomicBool>,
}

impl InterruptHandle {
    /// Request shutdown. Safe to call from any thread or signal handler.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether shutdown has been requested.
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Hosts the lifecycle of exactly one [`Runner`] per [`run`](Controller::run) call.
#[derive(Debug, Default)]
pub struct Controller {
    config: ControllerConfig,
    interrupt: Arc<AtomicBool>,
}

impl Controller {
    /// Controller with the default 1s poll interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller with a custom configuration.
    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle that interrupts this controller's wait loop.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            flag: Arc::clone(&self.interrupt),
        }
    }

    /// Route the process Ctrl-C signal to this controller's interrupt flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupt`] if the handler cannot be installed
    /// (for instance when one is already registered).
    pub fn install_ctrlc_handler(&self) -> Result<(), Error> {
        let handle = self.interrupt_handle();
        ctrlc::set_handler(move || handle.interrupt()).map_err(Error::Interrupt)
    }

    /// Start `runner` and block until interrupted or the runner stops on
    /// its own (fault policy `Stop`).
    ///
    /// Prints the shutdown message exactly once, requests a graceful
    /// stop, and returns without joining the runner thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the runner fails to start.
    pub fn run(&self, runner: Runner) -> Result<(), Error> {
        self.host(runner, io::stdout())
    }

    /// The wait loop with the farewell sink injected, so tests can
    /// observe that the shutdown message fires exactly once.
    fn host(&self, runner: Runner, mut out: impl Write) -> Result<(), Error> {
        let handle = runner.start()?;
        log::info!("controller: started runner '{}'", handle.name());

        while !self.interrupt.load(Ordering::Relaxed) {
            thread::sleep(self.config.poll_interval);

            for fault in handle.faults().try_iter() {
                log::error!("runner '{}': {fault}", handle.name());
            }

            if handle.is_finished() {
                // the runner halted itself; nothing left to host
                break;
            }
        }

        handle.stop();
        // best-effort farewell, emitted in exactly one place
        let _ = writeln!(out, "\nQuitting!");
        Ok(())
        // handle drops here: the stop flag is set, the thread is not joined
    }
}
