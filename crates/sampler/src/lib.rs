#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc
)]

//! Torus surface sampling.
//!
//! Walks a fixed angular grid over a torus, rotates every surface point about
//! two axes, perspective-projects it onto a 2D raster and attaches a luminance
//! value that grows as the point approaches the viewer.

pub mod params;
pub mod surface;

use thiserror::Error;

pub use params::{Projection, MAX_SAMPLES, RotationState, SampleGrid, TorusGeometry};
pub use surface::{sample, Sample, Samples};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("viewer distance {viewer_distance} must exceed minor + major radius ({extent})")]
    ViewerInsideTorus { viewer_distance: f32, extent: f32 },
    #[error("{field} must lie in (0, 2π], got {value}")]
    GridStep { field: &'static str, value: f32 },
    #[error("grid of {fine_count} x {coarse_count} samples exceeds the limit of {limit}")]
    TooDense {
        fine_count: usize,
        coarse_count: usize,
        limit: usize,
    },
}

/// Reject non-finite and non-positive values, naming `field` in the error.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<f32, ParamError> {
    let value = ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(ParamError::NonPositive { field, value });
    }
    Ok(value)
}

pub fn ensure_finite(field: &'static str, value: f32) -> Result<f32, ParamError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParamError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_and_nan() {
        assert!(matches!(
            ensure_positive("radius", 0.0),
            Err(ParamError::NonPositive { field: "radius", .. })
        ));
        assert!(matches!(
            ensure_positive("radius", f32::NAN),
            Err(ParamError::NonFinite { .. })
        ));
        assert_eq!(ensure_positive("radius", 0.5), Ok(0.5));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ParamError::NonPositive { field: "major_radius", value: -1.0 };
        assert_eq!(err.to_string(), "major_radius must be positive, got -1");
    }
}
