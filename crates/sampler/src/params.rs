//! Geometry, projection and grid parameters.
//!
//! All constructors validate their inputs so that a sampler built from them
//! can never divide by zero or loop forever.

use std::f32::consts::TAU;

use crate::{ensure_finite, ensure_positive, ParamError};

/// Most samples a single pass may produce.
pub const MAX_SAMPLES: usize = 1 << 24;

/// Radii of the torus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusGeometry {
    /// Tube radius (R1).
    pub minor_radius: f32,
    /// Distance from the torus centre to the tube centre (R2).
    pub major_radius: f32,
}

impl TorusGeometry {
    pub fn new(minor_radius: f32, major_radius: f32) -> Result<Self, ParamError> {
        Ok(Self {
            minor_radius: ensure_positive("minor_radius", minor_radius)?,
            major_radius: ensure_positive("major_radius", major_radius)?,
        })
    }

    /// Largest distance any surface point can have from the centre.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.minor_radius + self.major_radius
    }
}

impl Default for TorusGeometry {
    fn default() -> Self {
        Self {
            minor_radius: 1.0,
            major_radius: 2.0,
        }
    }
}

/// Perspective projection onto the raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Distance from the viewer to the torus centre along the viewing axis.
    pub viewer_distance: f32,
    /// Pixels per projected unit along X.
    pub horizontal_scale: f32,
    /// Pixels per projected unit along Y.
    pub vertical_scale: f32,
}

impl Projection {
    pub fn new(
        viewer_distance: f32,
        horizontal_scale: f32,
        vertical_scale: f32,
    ) -> Result<Self, ParamError> {
        Ok(Self {
            viewer_distance: ensure_positive("viewer_distance", viewer_distance)?,
            horizontal_scale: ensure_positive("horizontal_scale", horizontal_scale)?,
            vertical_scale: ensure_positive("vertical_scale", vertical_scale)?,
        })
    }

    /// Check that the viewer sits outside the torus for every rotation.
    ///
    /// The depth of a surface point never exceeds `geometry.extent()` in
    /// magnitude, so `viewer_distance > extent` keeps the perspective divide
    /// strictly positive.
    pub fn validate_for(&self, geometry: &TorusGeometry) -> Result<(), ParamError> {
        let extent = geometry.extent();
        if self.viewer_distance <= extent {
            return Err(ParamError::ViewerInsideTorus {
                viewer_distance: self.viewer_distance,
                extent,
            });
        }
        Ok(())
    }

    /// Range of `1 / (depth + viewer_distance)` over the whole surface.
    #[must_use]
    pub fn inv_depth_range(&self, geometry: &TorusGeometry) -> (f32, f32) {
        let extent = geometry.extent();
        (
            1.0 / (self.viewer_distance + extent),
            1.0 / (self.viewer_distance - extent),
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            viewer_distance: 5.0,
            horizontal_scale: 150.0,
            vertical_scale: 50.0,
        }
    }
}

/// Angular steps of the sampling grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleGrid {
    /// Step of the tube angle `i` (inner loop).
    pub fine_step: f32,
    /// Step of the sweep angle `j` (outer loop).
    pub coarse_step: f32,
}

impl SampleGrid {
    pub fn new(fine_step: f32, coarse_step: f32) -> Result<Self, ParamError> {
        let grid = Self {
            fine_step: ensure_step("fine_step", fine_step)?,
            coarse_step: ensure_step("coarse_step", coarse_step)?,
        };
        let (fine_count, coarse_count) = (grid.fine_count(), grid.coarse_count());
        match fine_count.checked_mul(coarse_count) {
            Some(len) if len <= MAX_SAMPLES => Ok(grid),
            _ => Err(ParamError::TooDense {
                fine_count,
                coarse_count,
                limit: MAX_SAMPLES,
            }),
        }
    }

    /// Number of tube angles per sweep angle.
    #[must_use]
    pub fn fine_count(&self) -> usize {
        steps_in_turn(self.fine_step)
    }

    /// Number of sweep angles.
    #[must_use]
    pub fn coarse_count(&self) -> usize {
        steps_in_turn(self.coarse_step)
    }

    /// Total samples produced per pass.
    ///
    /// Saturates for grids that bypassed [`SampleGrid::new`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.fine_count().saturating_mul(self.coarse_count())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self {
            fine_step: 0.02,
            coarse_step: 0.07,
        }
    }
}

fn ensure_step(field: &'static str, value: f32) -> Result<f32, ParamError> {
    let value = ensure_finite(field, value)?;
    if value <= 0.0 || value > TAU {
        return Err(ParamError::GridStep { field, value });
    }
    Ok(value)
}

fn steps_in_turn(step: f32) -> usize {
    (TAU / step).ceil() as usize
}

/// Current rotation of the torus, in radians.
///
/// Angles are never wrapped; trigonometric periodicity takes care of it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    pub angle_x: f32,
    pub angle_y: f32,
}

impl RotationState {
    #[must_use]
    pub const fn new(angle_x: f32, angle_y: f32) -> Self {
        Self { angle_x, angle_y }
    }

    /// Advance both angles by one frame's increments.
    pub fn advance(&mut self, delta_x: f32, delta_y: f32) {
        self.angle_x += delta_x;
        self.angle_y += delta_y;
    }
}
