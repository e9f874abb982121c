//! Sparkle demo with profiling: runs for a few seconds, then prints the
//! timing report the runner hands back on join.

use pixeldrive::render::AnsiRenderer;
use pixeldrive::visuals::Sparkle;
use pixeldrive::{Panel, Rgb, Runner, RunnerConfig, StatsProfiler};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let panel = Panel::new(48, 16);
    let config = RunnerConfig::named("sparkle")
        .with_period(Duration::from_millis(100))
        .with_profile(true);
    let runner = Runner::new(
        panel,
        Sparkle::new(Rgb::from_u32(0xFFD700), 0.05),
        AnsiRenderer::stdout().with_origin(0, 1),
        config,
    )?
    .with_profiler(StatsProfiler::new());

    let handle = runner.start()?;
    thread::sleep(Duration::from_secs(5));

    let outcome = handle.join()?;
    println!("\n{} finished after {} cycles", outcome.name, outcome.cycles);
    if let Some(report) = outcome.profile {
        print!("{report}");
    }
    Ok(())
}
