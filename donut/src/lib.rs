//! # Donut
//!
//! A rotating torus drawn by a small software rasterizer.
//!
//! ## Crates
//!
//! -   **[`sampler`]:** walks an angular grid over the torus surface, rotates
//!     and perspective-projects every point and derives its luminance. Pure
//!     and lazy.
//! -   **[`render`]:** paints samples onto an RGBA canvas, owns the rotation
//!     state and the Running/Stopped lifecycle, paces frames through a
//!     scheduler and writes PNG snapshots.
//! -   **`donut`:** this crate. The `donut` binary loads a JSON
//!     [`config::Config`], drives the animation at a fixed frame rate (or as
//!     fast as possible with `--headless`) and can reload the configuration
//!     while running.

pub mod config;

pub use render;
pub use render::sampler;
