#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Software rasterizer for the rotating torus.
//!
//! Paints [`sampler`] output onto an in-memory RGBA [`Canvas`], one frame per
//! scheduler tick, and optionally dumps frames to PNG.

pub mod animation;
pub mod canvas;
pub mod scheduler;
pub mod shading;
pub mod snapshot;

pub use animation::{
    create_animation, Animation, AnimationConfig, AnimationError, FrameStats, Motion, Phase,
};
pub use canvas::{Canvas, Rgba8};
pub use scheduler::{FixedRateScheduler, FrameScheduler, ImmediateScheduler};
pub use shading::Shading;
pub use snapshot::{save_png, SnapshotWriter};

pub use sampler;
