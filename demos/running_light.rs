//! Running-light demo: one green pixel sweeping a 32x16 panel drawn to
//! the terminal. Ctrl-C to quit.

use pixeldrive::render::AnsiRenderer;
use pixeldrive::visuals::RunningLight;
use pixeldrive::{Controller, Panel, Rgb, Runner, RunnerConfig};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let panel = Panel::new(32, 16);
    let config = RunnerConfig::named("running-light").with_period(Duration::from_millis(50));
    let runner = Runner::new(
        panel,
        RunningLight::new(Rgb::GREEN),
        AnsiRenderer::stdout().with_origin(0, 1),
        config,
    )?;

    let controller = Controller::new();
    controller.install_ctrlc_handler()?;
    controller.run(runner)?;
    Ok(())
}
