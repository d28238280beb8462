//! Lintel - a lightweight taskbar panel.
//!
//! Main entry point: load the configuration, build the panels and run the
//! event loop until a signal ends it. SIGUSR1 reloads the configuration in
//! place, SIGUSR2 re-executes the binary.

use std::os::unix::process::CommandExt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lintel::launcher::LauncherLoader;
use lintel::{Config, Runtime};
use lintel_area::HeadlessRenderer;
use lintel_kernel::{
    install_handlers, EventLoop, HeadlessDisplay, MonotonicClock, Scheduler, SIGNALS,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lintel", version, about = "A lightweight taskbar panel")]
struct Args {
    /// Configuration file (default: $XDG_CONFIG_HOME/lintel/lintelrc)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parse the configuration, report problems and exit
    #[arg(long)]
    check: bool,

    /// Print the laid-out panels as JSON and exit
    #[arg(long)]
    dump_layout: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

enum Outcome {
    Quit,
    Reload,
    Restart,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if args.check {
        let config = load_config(&args)?;
        let loader = LauncherLoader::new(config.launcher.icon_size)?;
        let broken = config
            .launcher
            .apps
            .iter()
            .filter(|path| loader.load(path).is_none())
            .count();
        if broken > 0 {
            bail!("{} of {} launcher entries failed to load", broken, config.launcher.apps.len());
        }
        println!(
            "configuration ok: {} backgrounds, {} gradients, {} launchers, items '{}'",
            config.theme.background_count() - 1,
            config.theme.gradient_count(),
            config.launcher.apps.len(),
            config.panel.items
        );
        return Ok(());
    }

    if args.dump_layout {
        let config = load_config(&args)?;
        let mut display = HeadlessDisplay::new()?;
        let mut runtime = Runtime::new(config, HeadlessRenderer::new(), &mut display)?;
        println!("{}", serde_json::to_string_pretty(&runtime.layout_snapshot())?);
        return Ok(());
    }

    info!("starting lintel");
    install_handlers().context("installing signal handlers")?;
    loop {
        match run(&args)? {
            Outcome::Quit => {
                info!("exiting");
                return Ok(());
            }
            Outcome::Reload => info!("reloading configuration"),
            Outcome::Restart => {
                let exe = std::env::current_exe().context("locating the running binary")?;
                info!("restarting {}", exe.display());
                let err = std::process::Command::new(&exe)
                    .args(std::env::args_os().skip(1))
                    .exec();
                error!("restart failed: {}", err);
                return Err(err).context("re-executing lintel");
            }
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    Config::locate_and_load(args.config.as_deref()).context("loading configuration")
}

/// Build the panels and run the loop once, until a signal ends it.
fn run(args: &Args) -> Result<Outcome> {
    let config = load_config(args)?;
    let mut display = HeadlessDisplay::new()?;
    let mut runtime = Runtime::new(config, HeadlessRenderer::new(), &mut display)?;

    let mut scheduler = Scheduler::new(MonotonicClock);
    runtime.start_timers(&mut scheduler);
    let mut event_loop = EventLoop::new(display, scheduler, &SIGNALS)?;
    Runtime::register_handlers(&mut event_loop);

    let reload = event_loop.run(&mut runtime)?;
    runtime.shutdown(event_loop.display_mut());

    Ok(match event_loop.last_signal() {
        Some(libc::SIGUSR2) => Outcome::Restart,
        _ if reload => Outcome::Reload,
        _ => Outcome::Quit,
    })
}
