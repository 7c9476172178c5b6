use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use grid_snake::config::{FRAME_INTERVAL, Settings, ThemeName, Topology};
use grid_snake::controller::Controller;
use grid_snake::error::Result;
use grid_snake::input::poll_input;
use grid_snake::logging::init_file_logger;
use grid_snake::renderer;
use grid_snake::terminal_runtime::{TerminalSession, cleanup_terminal_best_effort};
use log::{LevelFilter, info};

#[derive(Debug, Parser)]
#[command(version, about = "Steer a snake around a grid with the arrow keys")]
struct Cli {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Milliseconds between movement ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// What happens at the grid edge.
    #[arg(long, value_enum)]
    topology: Option<Topology>,

    /// Play without an item to eat.
    #[arg(long = "no-item")]
    no_item: bool,

    #[arg(long, value_enum)]
    theme: Option<ThemeName>,

    /// Seed the item placement rng for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

impl Cli {
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.tick_interval_ms = tick_ms;
        }
        if let Some(topology) = self.topology {
            settings.topology = topology;
        }
        if self.no_item {
            settings.items = false;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply_to(&mut settings);
    settings.validate()?;

    if let Some(path) = &cli.log_file {
        init_file_logger(path, cli.log_level.into())?;
    }
    info!("starting with {settings:?}");

    install_panic_hook();

    let mut session = TerminalSession::enter(settings.grid())?;
    run(&mut session, &settings)
}

fn run(session: &mut TerminalSession, settings: &Settings) -> Result<()> {
    let theme = settings.theme.theme();
    let mut controller = Controller::new(settings, Instant::now())?;
    let cancel = controller.cancel_token();

    while !cancel.is_cancelled() {
        session.terminal_mut().draw(|frame| {
            renderer::render(frame, controller.state(), theme, controller.is_paused());
        })?;

        let timeout = controller
            .until_next_tick(Instant::now())
            .map_or(FRAME_INTERVAL, |remaining| remaining.min(FRAME_INTERVAL));
        if let Some(input) = poll_input(timeout)? {
            controller.handle_input(input, Instant::now());
        }

        controller.on_frame(Instant::now());
    }

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort();
        default_hook(panic_info);
    }));
}
