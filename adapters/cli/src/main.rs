#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Lane Defence experience.

mod config;
mod headless;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::WINDOW_TITLE;
use lane_defence_rendering::{Presentation, RenderingBackend};
use lane_defence_rendering_macroquad::MacroquadBackend;
use lane_defence_session::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the Lane Defence binary.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Defend the lanes against advancing enemies")]
struct CliArgs {
    /// TOML file overriding the default rules.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for enemy spawning; chosen at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Present frames without waiting for the display refresh.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Run the simulation for the given number of ticks without a window.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let args = CliArgs::parse();
    let rules = config::load(args.config.as_deref()).context("failed to load rules")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "spawn seed selected");

    if let Some(ticks) = args.headless {
        let _ = headless::run(rules, seed, ticks);
        return Ok(());
    }

    let width = u32::try_from(rules.screen_width).context("screen width must be positive")?;
    let height = u32::try_from(rules.screen_height).context("screen height must be positive")?;
    let presentation = Presentation::new(WINDOW_TITLE, width, height)?;

    let vsync = args.vsync || !args.no_vsync;
    let mut session = Session::new(rules, seed);
    MacroquadBackend::new()
        .with_vsync(vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |input| session.frame(input))
}

/// Builds the log filter from `RUST_LOG` directives, falling back to `info`
/// when they are missing or malformed.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
