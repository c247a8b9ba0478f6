//! Frame rasterizer and its Running/Stopped lifecycle.
//!
//! An [`Animation`] owns the rotation state and, while running, the canvas.
//! Each call to [`Animation::render_frame`] clears the canvas, paints one
//! sampling pass of the torus in iteration order and advances the rotation.
//! Later samples simply overwrite earlier ones; there is no depth buffer.

use std::ops::ControlFlow;

use sampler::{
    ensure_finite, ensure_positive, sample, ParamError, Projection, RotationState, SampleGrid,
    TorusGeometry,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::canvas::Canvas;
use crate::scheduler::FrameScheduler;
use crate::shading::Shading;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),
    #[error("animation is not running")]
    NotRunning,
    #[error("perspective divide is singular in frame {frame} (inv_depth = {inv_depth})")]
    Singularity { frame: u64, inv_depth: f32 },
}

/// Per-frame rotation increments and the rotation every start resets to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub delta_x: f32,
    pub delta_y: f32,
    pub initial: RotationState,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            delta_x: 0.07,
            delta_y: 0.03,
            initial: RotationState::default(),
        }
    }
}

/// Everything needed to build an [`Animation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    pub width: u32,
    pub height: u32,
    pub geometry: TorusGeometry,
    pub projection: Projection,
    pub grid: SampleGrid,
    pub motion: Motion,
    pub shading: Shading,
}

impl AnimationConfig {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Re-run every parameter check.
    ///
    /// Fields are public, so values may have been set without going through
    /// the validating constructors.
    pub fn validate(&self) -> Result<(), AnimationError> {
        validate_size(self.width, self.height)?;
        TorusGeometry::new(self.geometry.minor_radius, self.geometry.major_radius)?;
        Projection::new(
            self.projection.viewer_distance,
            self.projection.horizontal_scale,
            self.projection.vertical_scale,
        )?
        .validate_for(&self.geometry)?;
        SampleGrid::new(self.grid.fine_step, self.grid.coarse_step)?;
        ensure_finite("delta_x", self.motion.delta_x)?;
        ensure_finite("delta_y", self.motion.delta_y)?;
        ensure_finite("initial.angle_x", self.motion.initial.angle_x)?;
        ensure_finite("initial.angle_y", self.motion.initial.angle_y)?;
        ensure_positive("cell_size", self.shading.cell_size as f32)?;
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            geometry: TorusGeometry::default(),
            projection: Projection::default(),
            grid: SampleGrid::default(),
            motion: Motion::default(),
            shading: Shading::default(),
        }
    }
}

fn validate_size(width: u32, height: u32) -> Result<(), ParamError> {
    ensure_positive("width", width as f32)?;
    ensure_positive("height", height as f32)?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Running,
}

/// Counters for one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    /// 1-based index of the frame since the last start.
    pub frame: u64,
    pub samples: usize,
    pub painted: usize,
    pub dropped: usize,
}

/// Handle to one rotating torus animation.
pub struct Animation {
    config: AnimationConfig,
    rotation: RotationState,
    /// Present exactly while running.
    canvas: Option<Canvas>,
    frame_requested: bool,
    frames: u64,
}

/// Build a stopped animation with default grid, motion and shading.
pub fn create_animation(
    canvas_width: u32,
    canvas_height: u32,
    geometry: TorusGeometry,
    projection: Projection,
) -> Result<Animation, AnimationError> {
    Animation::new(AnimationConfig {
        geometry,
        projection,
        ..AnimationConfig::new(canvas_width, canvas_height)
    })
}

impl Animation {
    pub fn new(config: AnimationConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        Ok(Self {
            config,
            rotation: config.motion.initial,
            canvas: None,
            frame_requested: false,
            frames: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.canvas.is_some() {
            Phase::Running
        } else {
            Phase::Stopped
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    #[must_use]
    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    #[must_use]
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Whether the last frame asked to be followed by another.
    #[must_use]
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Acquire the canvas, reset the rotation and request the first frame.
    ///
    /// Starting a running animation does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("start ignored, animation already running");
            return;
        }
        self.canvas = Some(Canvas::new(
            self.config.width,
            self.config.height,
            self.config.shading.background,
        ));
        self.rotation = self.config.motion.initial;
        self.frames = 0;
        self.frame_requested = true;
        debug!(
            width = self.config.width,
            height = self.config.height,
            "animation started"
        );
    }

    /// Cancel the pending frame and release the canvas. Idempotent.
    pub fn stop(&mut self) {
        self.frame_requested = false;
        if self.canvas.take().is_some() {
            debug!(frames = self.frames, "animation stopped");
        }
    }

    /// Change the canvas dimensions.
    ///
    /// A running animation drops its canvas before allocating the new one; a
    /// stopped one picks up the size on the next start.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), AnimationError> {
        validate_size(width, height)?;
        self.config.width = width;
        self.config.height = height;
        if self.canvas.take().is_some() {
            self.canvas = Some(Canvas::new(width, height, self.config.shading.background));
        }
        debug!(width, height, "canvas resized");
        Ok(())
    }

    /// Rasterize one frame, advance the rotation and request the next frame.
    pub fn render_frame(&mut self) -> Result<FrameStats, AnimationError> {
        let canvas = self.canvas.as_mut().ok_or(AnimationError::NotRunning)?;
        let frame = self.frames + 1;
        let AnimationConfig {
            geometry,
            projection,
            grid,
            motion,
            shading,
            ..
        } = self.config;

        canvas.clear();
        let samples = sample(self.rotation, &geometry, &projection, &grid, canvas.center());
        let total = samples.len();
        let mut painted = 0;
        for s in samples {
            if !(s.inv_depth.is_finite() && s.inv_depth > 0.0) {
                self.stop();
                return Err(AnimationError::Singularity {
                    frame,
                    inv_depth: s.inv_depth,
                });
            }
            let colour = shading.colour_for(s.luminance);
            if canvas.fill_cell(s.screen_x, s.screen_y, shading.cell_size, colour) {
                painted += 1;
            }
        }

        self.rotation.advance(motion.delta_x, motion.delta_y);
        self.frames = frame;
        self.frame_requested = true;

        let stats = FrameStats {
            frame,
            samples: total,
            painted,
            dropped: total - painted,
        };
        trace!(?stats, "frame rendered");
        Ok(stats)
    }

    /// Drive frames from `scheduler` until something stops the animation.
    ///
    /// After every frame `on_frame` sees the stats and the canvas; returning
    /// `ControlFlow::Break(())` stops the animation. A scheduler reporting
    /// that the host went away stops it too. Returns the number of frames
    /// rendered by this call.
    pub fn run<S, F>(&mut self, scheduler: &mut S, mut on_frame: F) -> Result<u64, AnimationError>
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(&FrameStats, &Canvas) -> ControlFlow<()>,
    {
        if !self.is_running() {
            return Err(AnimationError::NotRunning);
        }
        let mut rendered = 0;
        while self.frame_requested {
            if !scheduler.wait_for_refresh() {
                debug!("scheduler released the animation");
                self.stop();
                break;
            }
            let stats = self.render_frame()?;
            rendered += 1;
            let flow = match self.canvas.as_ref() {
                Some(canvas) => on_frame(&stats, canvas),
                None => ControlFlow::Break(()),
            };
            if flow.is_break() {
                self.stop();
            }
        }
        Ok(rendered)
    }
}
