//! # Donut Runtime
//!
//! Entry point for the `donut` binary: parses the command line, installs the
//! log subscriber and hands over to [`app::run`].

mod app;
mod watcher;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Render a rotating torus, optionally dumping frames as PNG.
#[derive(Parser, Debug)]
#[command(name = "donut", version, about)]
struct Cli {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reload the configuration file when it changes.
    #[arg(long, requires = "config")]
    watch: bool,
    /// Render frames back to back instead of pacing them.
    #[arg(long)]
    headless: bool,
    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,
    /// Target frame rate when not headless.
    #[arg(long)]
    fps: Option<u32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Write PNG snapshots into this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
    /// Write every n-th frame.
    #[arg(long)]
    snapshot_every: Option<u64>,
}

impl Cli {
    fn into_options(self) -> app::Options {
        app::Options {
            config_path: self.config,
            headless: self.headless,
            watch: self.watch,
            overrides: app::Overrides {
                width: self.width,
                height: self.height,
                fps: self.fps,
                frames: self.frames,
                snapshot_dir: self.snapshot_dir,
                snapshot_every: self.snapshot_every,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();
    app::run(&cli.into_options())
}
