//! PNG snapshots of the canvas.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::canvas::Canvas;

/// Write `canvas` to `path` as an RGBA PNG.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let image = image::RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.as_bytes().to_vec())
        .context("canvas buffer does not match its dimensions")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    Ok(())
}

/// Saves every `every`-th frame into a directory.
///
/// File names carry the wall-clock time the writer was created so repeated
/// runs into the same directory do not overwrite each other. Frames are
/// numbered by the writer itself, so restarting the animation keeps counting
/// instead of reusing earlier names.
pub struct SnapshotWriter {
    dir: PathBuf,
    stamp: String,
    every: u64,
    seen: u64,
    written: usize,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, every: u64) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;
        Ok(Self {
            dir,
            stamp: chrono::Local::now().format("%Y%m%d-%H%M%S").to_string(),
            every: every.max(1),
            seen: 0,
            written: 0,
        })
    }

    #[must_use]
    pub fn frame_path(&self, frame: u64) -> PathBuf {
        self.dir.join(format!("donut-{}-{frame:06}.png", self.stamp))
    }

    /// Count one more frame and save the canvas if it is due.
    ///
    /// Returns the written path.
    pub fn capture(&mut self, canvas: &Canvas) -> Result<Option<PathBuf>> {
        self.seen += 1;
        if self.seen % self.every != 0 {
            return Ok(None);
        }
        let path = self.frame_path(self.seen);
        save_png(canvas, &path)?;
        self.written += 1;
        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(Some(path))
    }

    /// Frames offered to [`SnapshotWriter::capture`] so far.
    #[must_use]
    pub fn frames_seen(&self) -> u64 {
        self.seen
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }
}
