//! # Pixeldrive
//!
//! A threaded execution framework for LED pixel-panel visualizations.
//!
//! Pixeldrive drives a [`Panel`] of RGB pixels at a fixed period: a
//! background [`Runner`](runner::Runner) thread repeatedly asks a
//! [`Visual`](runner::Visual) effect to fill the panel, then hands the
//! panel to a [`Renderer`](render::Renderer) for output, holding a lock
//! across the whole fill+render cycle so no torn frame is ever observable.
//!
//! ## Core Concepts
//!
//! - **Panel**: a contiguous row-major grid of RGB pixels
//! - **Visual**: the pluggable effect that mutates the panel each frame
//! - **Renderer**: the sink that consumes a finished frame
//! - **Runner**: the background loop with cooperative stop and fault reporting
//! - **Controller**: starts one runner and waits for Ctrl-C
//!
//! ## Example
//!
//! ```rust,no_run
//! use pixeldrive::{Controller, Panel, Runner, RunnerConfig};
//! use pixeldrive::render::NullRenderer;
//! use pixeldrive::visuals::RunningLight;
//! use std::time::Duration;
//!
//! let panel = Panel::new(32, 16);
//! let config = RunnerConfig::named("running-light").with_period(Duration::from_millis(50));
//! let runner = Runner::new(panel, RunningLight::default(), NullRenderer, config).unwrap();
//!
//! let controller = Controller::new();
//! controller.install_ctrlc_handler().unwrap();
//! controller.run(runner).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod controller;
pub mod error;
pub mod panel;
pub mod profile;
pub mod render;
pub mod runner;
pub mod visuals;

// Re-exports for convenience
pub use controller::{Controller, ControllerConfig, InterruptHandle};
pub use error::Error;
pub use panel::{Panel, Rgb};
pub use profile::{Phase, ProfileReport, Profiler, StatsProfiler};
pub use render::Renderer;
pub use runner::{
    CycleFault, FaultPolicy, Runner, RunnerConfig, RunnerHandle, RunnerOutcome, Visual,
};
