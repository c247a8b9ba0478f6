//! # Donut Application Logic
//!
//! Builds the animation from the configuration, drives it from a frame
//! scheduler and swaps it out when the configuration file changes.
//!
//! Without `--headless` frames are paced by a [`FixedRateScheduler`] at the
//! configured frame rate; with it, an [`ImmediateScheduler`] renders them back
//! to back, which is what batch snapshot runs and tests want.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use donut::config::Config;
use render::{
    Animation, FixedRateScheduler, FrameScheduler, ImmediateScheduler, SnapshotWriter,
};
use tracing::{error, info, warn};

use crate::watcher;

/// Log progress every this many frames.
const PROGRESS_INTERVAL: u64 = 50;

/// Command-line settings that win over the configuration file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub frames: Option<u64>,
    pub snapshot_dir: Option<PathBuf>,
    pub snapshot_every: Option<u64>,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
        if let Some(fps) = self.fps {
            config.run.fps = fps;
        }
        if self.frames.is_some() {
            config.run.frames = self.frames;
        }
        if self.snapshot_dir.is_some() {
            config.run.snapshot_dir.clone_from(&self.snapshot_dir);
        }
        if let Some(every) = self.snapshot_every {
            config.run.snapshot_every = every;
        }
    }
}

#[derive(Debug, Default)]
pub struct Options {
    pub config_path: Option<PathBuf>,
    pub headless: bool,
    pub watch: bool,
    pub overrides: Overrides,
}

fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}

fn build_animation(config: &Config) -> Result<Animation> {
    Animation::new(config.animation()).context("invalid animation configuration")
}

/// Most recent change notification, discarding the ones it supersedes.
fn latest_change(changes: &Receiver<PathBuf>) -> Option<PathBuf> {
    changes.try_iter().last()
}

/// Replacement animation for a pending configuration change, if any.
///
/// A changed file that fails to load or validate is logged and yields `None`,
/// leaving the caller's animation in charge.
fn reload(changes: &Receiver<PathBuf>, overrides: &Overrides) -> Option<Animation> {
    let path = latest_change(changes)?;
    match load_config(Some(&path), overrides).and_then(|next| build_animation(&next)) {
        Ok(next) => Some(next),
        Err(e) => {
            warn!("Ignoring change to {}: {e:#}", path.display());
            None
        }
    }
}

/// Totals over every animation a run went through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub restarts: u64,
    pub snapshots: usize,
}

/// Run the animation until the frame budget is spent or the scheduler ends.
///
/// Only canvas, torus, projection, grid, motion and shading settings are
/// picked up on reload; frame rate, budget and snapshot settings are fixed
/// at startup. A reloaded configuration that fails validation is logged and
/// the running animation carries on untouched.
///
/// # Errors
///
/// Returns an error if the initial configuration cannot be loaded or is
/// invalid, if a snapshot cannot be written, or if rendering hits a
/// perspective singularity.
pub fn run(options: &Options) -> Result<()> {
    let config = load_config(options.config_path.as_deref(), &options.overrides)?;
    let animation = build_animation(&config)?;

    let (change_tx, change_rx) = mpsc::channel();
    let _config_watcher = match (&options.config_path, options.watch) {
        (Some(path), true) => match watcher::start(path, change_tx) {
            Ok(watcher_instance) => {
                info!("Watching {} for changes.", path.display());
                Some(watcher_instance)
            }
            Err(e) => {
                error!("Failed to start config watcher: {e:?}");
                None
            }
        },
        _ => None,
    };

    let summary = drive(animation, &config, options, &change_rx)?;
    info!(
        "Torus animation finished after {} frames ({} snapshots, {} reloads).",
        summary.frames, summary.snapshots, summary.restarts
    );
    Ok(())
}

/// Frame loop: starts `animation`, swapping it for a rebuilt one whenever
/// `changes` delivers a valid configuration.
fn drive(
    mut animation: Animation,
    config: &Config,
    options: &Options,
    changes: &Receiver<PathBuf>,
) -> Result<RunSummary> {
    let mut snapshots = config
        .run
        .snapshot_dir
        .as_ref()
        .map(|dir| SnapshotWriter::new(dir, config.run.snapshot_every))
        .transpose()?;
    let mut scheduler: Box<dyn FrameScheduler> = if options.headless {
        Box::new(ImmediateScheduler::new())
    } else {
        Box::new(FixedRateScheduler::new(config.run.fps))
    };
    let budget = config.run.frames;

    info!(
        width = config.canvas.width,
        height = config.canvas.height,
        headless = options.headless,
        "Starting torus animation..."
    );

    let mut summary = RunSummary::default();
    loop {
        animation.start();
        let mut replacement = None;
        let mut failure = None;

        animation.run(scheduler.as_mut(), |stats, canvas| {
            summary.frames += 1;
            if let Some(writer) = snapshots.as_mut() {
                if let Err(e) = writer.capture(canvas) {
                    failure = Some(e);
                    return ControlFlow::Break(());
                }
            }
            if summary.frames % PROGRESS_INTERVAL == 0 {
                info!(
                    "Frame {} complete. Painted {} of {} samples.",
                    summary.frames, stats.painted, stats.samples
                );
            }
            if budget.is_some_and(|frames| summary.frames >= frames) {
                return ControlFlow::Break(());
            }
            replacement = reload(changes, &options.overrides);
            if replacement.is_some() {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })?;

        if let Some(e) = failure {
            return Err(e);
        }
        match replacement {
            Some(next) => {
                info!("Configuration reloaded, restarting animation.");
                animation = next;
                summary.restarts += 1;
            }
            None => break,
        }
    }

    summary.snapshots = snapshots.as_ref().map_or(0, SnapshotWriter::written);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config.run.frames = Some(10);
        let overrides = Overrides {
            width: Some(320),
            frames: Some(3),
            snapshot_dir: Some(PathBuf::from("out")),
            ..Overrides::default()
        };
        overrides.apply(&mut config);
        assert_eq!(config.canvas.width, 320);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.run.frames, Some(3));
        assert_eq!(config.run.snapshot_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn latest_change_drains_the_channel() {
        let (tx, rx) = mpsc::channel();
        assert_eq!(latest_change(&rx), None);
        tx.send(PathBuf::from("a.json")).unwrap();
        tx.send(PathBuf::from("b.json")).unwrap();
        assert_eq!(latest_change(&rx), Some(PathBuf::from("b.json")));
        assert_eq!(latest_change(&rx), None);
    }

    fn scratch_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("donut-app-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("donut.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn headless(frames: u64) -> (Options, Config) {
        let options = Options {
            headless: true,
            overrides: Overrides {
                width: Some(64),
                height: Some(48),
                frames: Some(frames),
                ..Overrides::default()
            },
            ..Options::default()
        };
        let config = load_config(None, &options.overrides).unwrap();
        (options, config)
    }

    #[test]
    fn valid_change_yields_a_fresh_animation() {
        let path = scratch_config(
            "valid",
            r#"{ "projection": { "viewer_distance": 7.0 }, "motion": { "initial_angle_x": 0.5 } }"#,
        );
        let (tx, rx) = mpsc::channel();
        tx.send(path.clone()).unwrap();

        let mut next = reload(&rx, &Overrides::default()).unwrap();
        assert!(!next.is_running());
        assert_eq!(next.config().projection.viewer_distance, 7.0);
        next.start();
        assert_eq!(next.rotation().angle_x, 0.5);
        assert!(reload(&rx, &Overrides::default()).is_none());
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn invalid_change_is_ignored() {
        let path = scratch_config("invalid", r#"{ "projection": { "viewer_distance": 0.5 } }"#);
        let (tx, rx) = mpsc::channel();
        tx.send(path.clone()).unwrap();
        assert!(reload(&rx, &Overrides::default()).is_none());

        tx.send(path.parent().unwrap().join("missing.json")).unwrap();
        assert!(reload(&rx, &Overrides::default()).is_none());
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn valid_reload_restarts_the_animation() {
        let path = scratch_config("swap", r#"{ "torus": { "minor_radius": 0.5 } }"#);
        let (options, config) = headless(5);
        let (tx, rx) = mpsc::channel();
        tx.send(path.clone()).unwrap();

        let animation = build_animation(&config).unwrap();
        let summary = drive(animation, &config, &options, &rx).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.restarts, 1);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn invalid_reload_keeps_the_animation_running() {
        let path = scratch_config("keep", r#"{ "grid": { "fine_step": 0.0 } }"#);
        let (options, config) = headless(5);
        let (tx, rx) = mpsc::channel();
        tx.send(path.clone()).unwrap();

        let animation = build_animation(&config).unwrap();
        let summary = drive(animation, &config, &options, &rx).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.restarts, 0);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn headless_run_honours_the_frame_budget() {
        let options = Options {
            headless: true,
            overrides: Overrides {
                width: Some(64),
                height: Some(48),
                frames: Some(4),
                ..Overrides::default()
            },
            ..Options::default()
        };
        run(&options).unwrap();
    }
}
