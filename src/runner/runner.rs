//! The runner state machine and its handle.

use super::messages::{CycleFault, FaultPolicy, RunnerCommand, RunnerOutcome, VisualError};
use super::visual::Visual;
use crate::error::Error;
use crate::panel::Panel;
use crate::profile::{Phase, Profiler};
use crate::render::Renderer;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Granularity of the stop-flag check during the inter-cycle sleep.
const SLEEP_SLICE: Duration = Duration::from_millis(1);

/// Configuration for a [`Runner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Display name (no uniqueness constraint, must be non-empty).
    pub name: String,
    /// Sleep between cycles. Zero means run as fast as possible.
    pub period: Duration,
    /// What to do after a cycle fault.
    pub fault_policy: FaultPolicy,
    /// Whether to time each cycle section into the attached profiler.
    pub profile: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            name: "runner".to_string(),
            period: Duration::from_millis(33),
            fault_policy: FaultPolicy::default(),
            profile: false,
        }
    }
}

impl RunnerConfig {
    /// Default configuration with the given display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the sleep between cycles.
    #[must_use]
    pub const fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Set the fault policy.
    #[must_use]
    pub const fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Enable or disable profiling.
    #[must_use]
    pub const fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }
}

/// A not-yet-started panel visualization: panel + visual + renderer +
/// configuration. Call [`start`](Runner::start) to spawn the loop.
pub struct Runner {
    panel: Arc<Mutex<Panel>>,
    visual: Box<dyn Visual>,
    renderer: Box<dyn Renderer>,
    profiler: Option<Box<dyn Profiler>>,
    config: RunnerConfig,
    running: Arc<AtomicBool>,
}

impl Runner {
    /// Create a runner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] if the configured name is blank.
    pub fn new(
        panel: Panel,
        visual: impl Visual + 'static,
        renderer: impl Renderer + 'static,
        config: RunnerConfig,
    ) -> Result<Self, Error> {
        if config.name.trim().is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            panel: Arc::new(Mutex::new(panel)),
            visual: Box::new(visual),
            renderer: Box::new(renderer),
            profiler: None,
            config,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Attach a profiling capability.
    ///
    /// Only consulted when the configuration has `profile` set.
    #[must_use]
    pub fn with_profiler(mut self, profiler: impl Profiler + 'static) -> Self {
        self.profiler = Some(Box::new(profiler));
        self
    }

    /// The configured display name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The shared panel. Clones of this handle stay valid after
    /// [`start`](Runner::start).
    pub fn panel(&self) -> Arc<Mutex<Panel>> {
        Arc::clone(&self.panel)
    }

    /// Spawn the background loop, consuming the runner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the OS refuses the thread.
    pub fn start(mut self) -> Result<RunnerHandle, Error> {
        if self.config.profile && self.profiler.is_none() {
            log::warn!(
                "runner '{}': profiling enabled but no profiler attached; continuing without",
                self.config.name
            );
            self.config.profile = false;
        }

        // Small buffers: commands are rare, faults should not queue unboundedly.
        let (command_tx, command_rx) = bounded(16);
        let (fault_tx, fault_rx) = bounded(64);

        let name = self.config.name.clone();
        let running = Arc::clone(&self.running);
        let panel = Arc::clone(&self.panel);

        // Running is entered here, before the thread exists; the loop only
        // ever clears the flag, so a stop() issued right after start()
        // cannot be overwritten.
        running.store(true, Ordering::Relaxed);

        let handle = match thread::Builder::new()
            .name(format!("pixeldrive-{name}"))
            .spawn(move || run_loop(self, &command_rx, &fault_tx))
        {
            Ok(handle) => handle,
            Err(error) => {
                running.store(false, Ordering::Relaxed);
                return Err(Error::Spawn(error));
            }
        };

        Ok(RunnerHandle {
            name,
            handle: Some(handle),
            running,
            panel,
            command_tx,
            fault_rx,
        })
    }
}

/// Handle to a started runner.
///
/// Stopping is cooperative: [`stop`](RunnerHandle::stop) lets the
/// in-flight cycle finish. Dropping the handle signals stop but does not
/// wait for the thread; use [`join`](RunnerHandle::join) to collect the
/// [`RunnerOutcome`].
pub struct RunnerHandle {
    /// Display name at start time (later renames are loop-internal).
    name: String,
    handle: Option<JoinHandle<RunnerOutcome>>,
    running: Arc<AtomicBool>,
    panel: Arc<Mutex<Panel>>,
    command_tx: Sender<RunnerCommand>,
    fault_rx: Receiver<CycleFault>,
}

impl RunnerHandle {
    /// The display name the runner started with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the loop is still cycling.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Whether the loop thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Request a graceful stop. The in-flight cycle completes first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// The shared panel. Lock it to read pixels between cycles; an
    /// in-progress fill+render holds the lock, the sleep does not.
    pub fn panel(&self) -> Arc<Mutex<Panel>> {
        Arc::clone(&self.panel)
    }

    /// Receiver of cycle faults reported by the loop.
    pub const fn faults(&self) -> &Receiver<CycleFault> {
        &self.fault_rx
    }

    /// Rename the runner. Applied at the top of the next cycle.
    pub fn set_name(&self, name: impl Into<String>) {
        let _ = self.command_tx.try_send(RunnerCommand::SetName(name.into()));
    }

    /// Replace the panel contents. Applied at the top of the next cycle,
    /// so the swap is atomic with respect to a frame.
    pub fn swap_panel(&self, panel: Panel) {
        let _ = self.command_tx.try_send(RunnerCommand::SwapPanel(panel));
    }

    /// Replace the renderer. Applied at the top of the next cycle.
    pub fn swap_renderer(&self, renderer: impl Renderer + 'static) {
        let _ = self
            .command_tx
            .try_send(RunnerCommand::SwapRenderer(Box::new(renderer)));
    }

    /// Stop the runner and wait for the thread to finish.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunnerPanicked`] if the loop thread panicked.
    pub fn join(mut self) -> Result<RunnerOutcome, Error> {
        self.stop();
        let handle = self.handle.take().ok_or(Error::RunnerPanicked)?;
        handle.join().map_err(|_| Error::RunnerPanicked)
    }
}

impl Drop for RunnerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(panel: &Mutex<Panel>) -> MutexGuard<'_, Panel> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

fn report(faults: &Sender<CycleFault>, name: &str, cycle: u64, phase: Phase, error: VisualError) {
    log::error!("runner '{name}': {phase} fault at cycle {cycle}: {error}");
    // Non-blocking send: if the supervisor stopped draining, drop the report.
    let _ = faults.try_send(CycleFault { cycle, phase, error });
}

/// The state machine: init once, then cycle until the flag drops.
fn run_loop(
    mut r: Runner,
    commands: &Receiver<RunnerCommand>,
    faults: &Sender<CycleFault>,
) -> RunnerOutcome {
    let shared_panel = Arc::clone(&r.panel);
    let mut cycles: u64 = 0;

    // init exactly once, before any fill, under the same lock discipline
    {
        let mut panel = lock(&shared_panel);
        let started = Instant::now();
        let result = r.visual.init(&mut panel);
        if let Some(profiler) = profiling(&mut r) {
            profiler.record(Phase::Init, started.elapsed());
        }
        if let Err(error) = result {
            report(faults, &r.config.name, 0, Phase::Init, error);
            // init is never retried; a visual whose setup failed has no
            // contract to fill under, so this stops regardless of policy
            r.running.store(false, Ordering::Relaxed);
        }
    }

    while r.running.load(Ordering::Relaxed) {
        // swaps apply between cycles, never mid-frame
        while let Ok(command) = commands.try_recv() {
            match command {
                RunnerCommand::SetName(name) => r.config.name = name,
                RunnerCommand::SwapPanel(new) => *lock(&shared_panel) = new,
                RunnerCommand::SwapRenderer(renderer) => r.renderer = renderer,
            }
        }

        let mut faulted = false;
        {
            let mut panel = lock(&shared_panel);

            let started = Instant::now();
            match r.visual.fill(&mut panel) {
                Ok(()) => {
                    if let Some(profiler) = profiling(&mut r) {
                        profiler.record(Phase::Fill, started.elapsed());
                    }
                    let started = Instant::now();
                    match r.renderer.render(&panel) {
                        Ok(()) => {
                            if let Some(profiler) = profiling(&mut r) {
                                profiler.record(Phase::Render, started.elapsed());
                            }
                            cycles += 1;
                        }
                        Err(error) => {
                            faulted = true;
                            report(
                                faults,
                                &r.config.name,
                                cycles + 1,
                                Phase::Render,
                                Box::new(error),
                            );
                        }
                    }
                }
                Err(error) => {
                    faulted = true;
                    report(faults, &r.config.name, cycles + 1, Phase::Fill, error);
                }
            }
        } // lock released before any sleeping

        if faulted && r.config.fault_policy == FaultPolicy::Stop {
            break;
        }
        if !r.running.load(Ordering::Relaxed) {
            break;
        }
        sleep_while_running(r.config.period, &r.running);
    }

    r.running.store(false, Ordering::Relaxed);
    log::debug!("runner '{}': stopped after {cycles} cycles", r.config.name);

    RunnerOutcome {
        name: r.config.name,
        cycles,
        profile: r.profiler.as_ref().map(|p| p.report()),
    }
}

fn profiling(r: &mut Runner) -> Option<&mut Box<dyn Profiler>> {
    if r.config.profile {
        r.profiler.as_mut()
    } else {
        None
    }
}

/// Sleep for `period`, waking early if the stop flag drops.
///
/// Sliced so a stop request does not have to ride out a long period
/// before the loop notices it.
fn sleep_while_running(period: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + period;
    loop {
        if !running.load(Ordering::Relaxed) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Rgb;
    use crate::profile::StatsProfiler;
    use crate::render::NullRenderer;
    use std::sync::atomic::AtomicU64;

    /// Visual that counts init calls and writes a strictly increasing
    /// counter into pixel (0, 0).
    struct CountingVisual {
        counter: u8,
        inits: Arc<AtomicU64>,
        fills: Arc<AtomicU64>,
    }

    impl CountingVisual {
        fn new() -> (Self, Arc<AtomicU64>, Arc<AtomicU64>) {
            let inits = Arc::new(AtomicU64::new(0));
            let fills = Arc::new(AtomicU64::new(0));
            (
                Self {
                    counter: 0,
                    inits: Arc::clone(&inits),
                    fills: Arc::clone(&fills),
                },
                inits,
                fills,
            )
        }
    }

    impl Visual for CountingVisual {
        fn init(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
            assert_eq!(
                self.fills.load(Ordering::SeqCst),
                0,
                "init must run before any fill"
            );
            self.inits.fetch_add(1, Ordering::SeqCst);
            panel.clear();
            Ok(())
        }

        fn fill(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
            self.fills.fetch_add(1, Ordering::SeqCst);
            self.counter = self.counter.wrapping_add(1);
            panel.set(0, 0, Rgb::new(self.counter, 0, 0));
            Ok(())
        }
    }

    /// Renderer that records the counter value it observes at (0, 0).
    struct RecordingRenderer {
        seen: Arc<Mutex<Vec<u8>>>,
    }

    impl RecordingRenderer {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    seen: Arc::clone(&seen),
                },
                seen,
            )
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, panel: &Panel) -> std::io::Result<()> {
            let value = panel.get(0, 0).unwrap().r;
            self.seen.lock().unwrap().push(value);
            Ok(())
        }
    }

    /// Visual whose fill always fails.
    struct FailingVisual;

    impl Visual for FailingVisual {
        fn fill(&mut self, _panel: &mut Panel) -> Result<(), VisualError> {
            Err("boom".into())
        }
    }

    fn quick_config(name: &str) -> RunnerConfig {
        RunnerConfig::named(name).with_period(Duration::from_millis(5))
    }

    #[test]
    fn test_empty_name_rejected() {
        let (visual, _, _) = CountingVisual::new();
        let result = Runner::new(
            Panel::new(2, 2),
            visual,
            NullRenderer,
            RunnerConfig::named("  "),
        );
        assert!(matches!(result, Err(Error::EmptyName)));
    }

    #[test]
    fn test_init_called_exactly_once_before_fill() {
        let (visual, inits, fills) = CountingVisual::new();
        let runner = Runner::new(Panel::new(2, 2), visual, NullRenderer, quick_config("once"))
            .unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(60));
        let outcome = handle.join().unwrap();

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert!(fills.load(Ordering::SeqCst) >= 1);
        assert!(outcome.cycles >= 1);
    }

    #[test]
    fn test_zero_period_runs_and_stops() {
        let (visual, inits, _) = CountingVisual::new();
        let config = RunnerConfig::named("fast").with_period(Duration::ZERO);
        let runner = Runner::new(Panel::new(2, 2), visual, NullRenderer, config).unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        let outcome = handle.join().unwrap();

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert!(outcome.cycles > 1);
    }

    #[test]
    fn test_render_observes_every_fill_in_order() {
        let (visual, _, _) = CountingVisual::new();
        let (renderer, seen) = RecordingRenderer::new();
        let runner =
            Runner::new(Panel::new(2, 2), visual, renderer, quick_config("ordered")).unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(80));
        let outcome = handle.join().unwrap();

        let seen = seen.lock().unwrap();
        // renders and completed cycles match one-to-one
        assert_eq!(seen.len() as u64, outcome.cycles);
        // each render saw exactly the state of the preceding fill
        for (i, &value) in seen.iter().enumerate() {
            assert_eq!(u64::from(value), i as u64 + 1);
        }
    }

    #[test]
    fn test_counter_sequence_at_100ms() {
        let (visual, _, _) = CountingVisual::new();
        let (renderer, seen) = RecordingRenderer::new();
        let config = RunnerConfig::named("paced").with_period(Duration::from_millis(100));
        let runner = Runner::new(Panel::new(2, 2), visual, renderer, config).unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(500));
        handle.join().unwrap();

        let seen = seen.lock().unwrap();
        assert!(
            (3..=8).contains(&seen.len()),
            "expected ~5 cycles in 500ms, got {}",
            seen.len()
        );
        assert_eq!(seen[0], 1);
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_stop_immediately_after_start_is_honored() {
        // A stop issued before the spawned thread runs its first
        // instruction must not be lost; the loop never re-raises the flag.
        for _ in 0..100 {
            let (visual, _, _) = CountingVisual::new();
            let runner =
                Runner::new(Panel::new(2, 2), visual, NullRenderer, quick_config("eager"))
                    .unwrap();
            let handle = runner.start().unwrap();
            handle.stop();
            thread::sleep(Duration::from_millis(5));
            assert!(!handle.is_running(), "stop() right after start() was overwritten");
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_stop_prevents_further_cycles() {
        let (visual, _, fills) = CountingVisual::new();
        let runner =
            Runner::new(Panel::new(2, 2), visual, NullRenderer, quick_config("stopper")).unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(30));
        handle.stop();
        thread::sleep(Duration::from_millis(10));
        let after_stop = fills.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(fills.load(Ordering::SeqCst), after_stop);
        assert!(!handle.is_running());
    }

    #[test]
    fn test_lock_free_during_sleep() {
        let (visual, _, _) = CountingVisual::new();
        let config = RunnerConfig::named("sleepy").with_period(Duration::from_millis(200));
        let runner = Runner::new(Panel::new(2, 2), visual, NullRenderer, config).unwrap();
        let panel = runner.panel();
        let handle = runner.start().unwrap();

        // land in the middle of the sleep interval
        thread::sleep(Duration::from_millis(80));
        assert!(panel.try_lock().is_ok(), "panel must be readable while the loop sleeps");
        handle.join().unwrap();
    }

    #[test]
    fn test_fault_policy_stop_halts_loop() {
        let runner = Runner::new(
            Panel::new(2, 2),
            FailingVisual,
            NullRenderer,
            quick_config("fragile").with_fault_policy(FaultPolicy::Stop),
        )
        .unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(50));

        assert!(!handle.is_running());
        let fault = handle
            .faults()
            .recv_timeout(Duration::from_millis(100))
            .unwrap();
        assert_eq!(fault.phase, Phase::Fill);
        assert_eq!(fault.cycle, 1);
        let outcome = handle.join().unwrap();
        assert_eq!(outcome.cycles, 0);
    }

    #[test]
    fn test_fault_policy_retry_keeps_reporting() {
        let runner = Runner::new(
            Panel::new(2, 2),
            FailingVisual,
            NullRenderer,
            quick_config("stubborn").with_fault_policy(FaultPolicy::RetryNextCycle),
        )
        .unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(60));

        assert!(handle.is_running());
        assert!(handle.faults().try_iter().count() >= 2);
        handle.join().unwrap();
    }

    #[test]
    fn test_profile_without_profiler_does_not_fail() {
        let (visual, _, _) = CountingVisual::new();
        let runner = Runner::new(
            Panel::new(2, 2),
            visual,
            NullRenderer,
            quick_config("unprofiled").with_profile(true),
        )
        .unwrap();
        // warns at start, keeps running
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(30));
        let outcome = handle.join().unwrap();
        assert!(outcome.cycles >= 1);
        assert!(outcome.profile.is_none());
    }

    #[test]
    fn test_profile_report_returned_on_join() {
        let (visual, _, _) = CountingVisual::new();
        let runner = Runner::new(
            Panel::new(2, 2),
            visual,
            NullRenderer,
            quick_config("profiled").with_profile(true),
        )
        .unwrap()
        .with_profiler(StatsProfiler::new());
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(60));
        let outcome = handle.join().unwrap();

        let report = outcome.profile.expect("profiler was attached");
        let labels: Vec<_> = report.entries().iter().map(|e| e.label).collect();
        assert!(labels.contains(&"init"));
        assert!(labels.contains(&"fill"));
        assert!(labels.contains(&"render"));
    }

    #[test]
    fn test_swap_panel_applies_between_cycles() {
        let (visual, _, _) = CountingVisual::new();
        let runner =
            Runner::new(Panel::new(2, 2), visual, NullRenderer, quick_config("swapper")).unwrap();
        let shared = runner.panel();
        let handle = runner.start().unwrap();

        handle.swap_panel(Panel::new(8, 8));
        thread::sleep(Duration::from_millis(40));
        assert_eq!(lock(&shared).width(), 8);
        handle.join().unwrap();
    }

    #[test]
    fn test_init_fault_with_stop_policy_never_fills() {
        struct BadInit {
            fills: Arc<AtomicU64>,
        }
        impl Visual for BadInit {
            fn init(&mut self, _panel: &mut Panel) -> Result<(), VisualError> {
                Err("no environment".into())
            }
            fn fill(&mut self, _panel: &mut Panel) -> Result<(), VisualError> {
                self.fills.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let fills = Arc::new(AtomicU64::new(0));
        let runner = Runner::new(
            Panel::new(2, 2),
            BadInit {
                fills: Arc::clone(&fills),
            },
            NullRenderer,
            quick_config("bad-init"),
        )
        .unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(30));

        let fault = handle
            .faults()
            .recv_timeout(Duration::from_millis(100))
            .unwrap();
        assert_eq!(fault.phase, Phase::Init);
        assert_eq!(fault.cycle, 0);
        assert_eq!(fills.load(Ordering::SeqCst), 0);
        assert!(!handle.is_running());
        handle.join().unwrap();
    }

    #[test]
    fn test_init_fault_stops_even_with_retry_policy() {
        struct BadInit {
            fills: Arc<AtomicU64>,
        }
        impl Visual for BadInit {
            fn init(&mut self, _panel: &mut Panel) -> Result<(), VisualError> {
                Err("no environment".into())
            }
            fn fill(&mut self, _panel: &mut Panel) -> Result<(), VisualError> {
                self.fills.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let fills = Arc::new(AtomicU64::new(0));
        let runner = Runner::new(
            Panel::new(2, 2),
            BadInit {
                fills: Arc::clone(&fills),
            },
            NullRenderer,
            quick_config("bad-init-retry").with_fault_policy(FaultPolicy::RetryNextCycle),
        )
        .unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(30));

        // retry applies to fill/render only; a failed init halts the loop
        assert!(!handle.is_running());
        assert_eq!(fills.load(Ordering::SeqCst), 0);
        let outcome = handle.join().unwrap();
        assert_eq!(outcome.cycles, 0);
    }

    #[test]
    fn test_dropping_handle_signals_stop() {
        let (visual, _, fills) = CountingVisual::new();
        let runner =
            Runner::new(Panel::new(2, 2), visual, NullRenderer, quick_config("dropped")).unwrap();
        let handle = runner.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        drop(handle);
        thread::sleep(Duration::from_millis(20));
        let settled = fills.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(fills.load(Ordering::SeqCst), settled);
    }
}
