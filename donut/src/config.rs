//! JSON configuration.
//!
//! Every field is optional; anything left out takes the rasterizer's default.
//!
//! ```json
//! {
//!   "canvas": { "width": 1280, "height": 720 },
//!   "projection": { "viewer_distance": 6.0 },
//!   "shading": { "tint": [255, 180, 60, 255] },
//!   "run": { "fps": 30, "snapshot_dir": "frames", "snapshot_every": 10 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use render::sampler::{Projection, RotationState, SampleGrid, TorusGeometry};
use render::{AnimationConfig, Motion, Rgba8, Shading};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub torus: TorusConfig,
    pub projection: ProjectionConfig,
    pub grid: GridConfig,
    pub motion: MotionConfig,
    pub shading: ShadingConfig,
    pub run: RunConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Rasterizer settings. Validation happens when the animation is built.
    #[must_use]
    pub fn animation(&self) -> AnimationConfig {
        AnimationConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            geometry: TorusGeometry {
                minor_radius: self.torus.minor_radius,
                major_radius: self.torus.major_radius,
            },
            projection: Projection {
                viewer_distance: self.projection.viewer_distance,
                horizontal_scale: self.projection.horizontal_scale,
                vertical_scale: self.projection.vertical_scale,
            },
            grid: SampleGrid {
                fine_step: self.grid.fine_step,
                coarse_step: self.grid.coarse_step,
            },
            motion: Motion {
                delta_x: self.motion.delta_x,
                delta_y: self.motion.delta_y,
                initial: RotationState::new(
                    self.motion.initial_angle_x,
                    self.motion.initial_angle_y,
                ),
            },
            shading: Shading {
                cell_size: self.shading.cell_size,
                background: rgba(self.shading.background),
                tint: rgba(self.shading.tint),
            },
        }
    }
}

fn rgba([r, g, b, a]: [u8; 4]) -> Rgba8 {
    Rgba8::new(r, g, b, a)
}

fn channels(colour: Rgba8) -> [u8; 4] {
    [colour.r, colour.g, colour.b, colour.a]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let defaults = AnimationConfig::default();
        Self {
            width: defaults.width,
            height: defaults.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TorusConfig {
    pub minor_radius: f32,
    pub major_radius: f32,
}

impl Default for TorusConfig {
    fn default() -> Self {
        let geometry = TorusGeometry::default();
        Self {
            minor_radius: geometry.minor_radius,
            major_radius: geometry.major_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub viewer_distance: f32,
    pub horizontal_scale: f32,
    pub vertical_scale: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let projection = Projection::default();
        Self {
            viewer_distance: projection.viewer_distance,
            horizontal_scale: projection.horizontal_scale,
            vertical_scale: projection.vertical_scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub fine_step: f32,
    pub coarse_step: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        let grid = SampleGrid::default();
        Self {
            fine_step: grid.fine_step,
            coarse_step: grid.coarse_step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    pub delta_x: f32,
    pub delta_y: f32,
    pub initial_angle_x: f32,
    pub initial_angle_y: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        let motion = Motion::default();
        Self {
            delta_x: motion.delta_x,
            delta_y: motion.delta_y,
            initial_angle_x: motion.initial.angle_x,
            initial_angle_y: motion.initial.angle_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadingConfig {
    pub cell_size: u32,
    /// RGBA.
    pub background: [u8; 4],
    /// RGBA; alpha is ignored, painted cells are opaque.
    pub tint: [u8; 4],
}

impl Default for ShadingConfig {
    fn default() -> Self {
        let shading = Shading::default();
        Self {
            cell_size: shading.cell_size,
            background: channels(shading.background),
            tint: channels(shading.tint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub fps: u32,
    /// Stop after this many frames. Runs until the process is killed if unset.
    pub frames: Option<u64>,
    pub snapshot_dir: Option<PathBuf>,
    pub snapshot_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            frames: None,
            snapshot_dir: None,
            snapshot_every: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.animation(), AnimationConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "projection": { "viewer_distance": 7.5 }, "shading": { "tint": [255, 0, 0, 255] } }"#,
        )
        .unwrap();
        let animation = config.animation();
        assert_eq!(animation.projection.viewer_distance, 7.5);
        assert_eq!(animation.projection.horizontal_scale, 150.0);
        assert_eq!(animation.shading.tint, Rgba8::new(255, 0, 0, 255));
        assert_eq!(animation.shading.cell_size, 2);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "torus": { "radius": 1.0 } }"#).is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = Config::default();
        config.run.frames = Some(12);
        config.run.snapshot_dir = Some(PathBuf::from("frames"));
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<Config>(&text).unwrap(), config);
    }
}
