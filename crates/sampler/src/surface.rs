//! Surface point evaluation, projection and the lazy sample sequence.

use crate::params::{Projection, RotationState, SampleGrid, TorusGeometry};

/// A single projected surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub screen_x: f32,
    pub screen_y: f32,
    /// Brightness in `[0, 1]`, larger for points nearer the viewer.
    pub luminance: f32,
    /// `1 / (depth + viewer_distance)`.
    pub inv_depth: f32,
}

/// Rotated surface point for tube angle `i` and sweep angle `j`.
///
/// The tube circle `(R2 + R1·cos i, R1·sin i, 0)` is swept by `j` about the
/// vertical axis, then rotated by `angle_x` about X and by `angle_y` about the
/// viewing axis Z. Expanded on the sine/cosine terms instead of multiplying
/// matrices.
#[must_use]
pub fn surface_point(
    geometry: &TorusGeometry,
    rotation: &RotationState,
    i: f32,
    j: f32,
) -> [f32; 3] {
    let trig = RotationTrig::new(rotation);
    let (sin_i, cos_i) = i.sin_cos();
    let (sin_j, cos_j) = j.sin_cos();
    trig.rotate(geometry, sin_i, cos_i, sin_j, cos_j)
}

/// Sample the torus for one rotation.
///
/// The sweep angle `j` drives the outer loop and the tube angle `i` the inner
/// one; later samples are meant to overwrite earlier ones when painted. The
/// returned iterator is pure: cloning it or calling `sample` again with the
/// same inputs yields the same sequence.
#[must_use]
pub fn sample(
    rotation: RotationState,
    geometry: &TorusGeometry,
    projection: &Projection,
    grid: &SampleGrid,
    center: (f32, f32),
) -> Samples {
    let (inv_min, inv_max) = projection.inv_depth_range(geometry);
    tracing::trace!(
        angle_x = rotation.angle_x,
        angle_y = rotation.angle_y,
        samples = grid.len(),
        "sampling torus"
    );
    Samples {
        trig: RotationTrig::new(&rotation),
        geometry: *geometry,
        projection: *projection,
        grid: *grid,
        center,
        inv_min,
        inv_span: inv_max - inv_min,
        fine_count: grid.fine_count(),
        index: 0,
        len: grid.len(),
    }
}

#[derive(Clone, Copy, Debug)]
struct RotationTrig {
    sin_a: f32,
    cos_a: f32,
    sin_b: f32,
    cos_b: f32,
}

impl RotationTrig {
    fn new(rotation: &RotationState) -> Self {
        let (sin_a, cos_a) = rotation.angle_x.sin_cos();
        let (sin_b, cos_b) = rotation.angle_y.sin_cos();
        Self {
            sin_a,
            cos_a,
            sin_b,
            cos_b,
        }
    }

    fn rotate(
        &self,
        geometry: &TorusGeometry,
        sin_i: f32,
        cos_i: f32,
        sin_j: f32,
        cos_j: f32,
    ) -> [f32; 3] {
        let circle_x = geometry.major_radius + geometry.minor_radius * cos_i;
        let circle_y = geometry.minor_radius * sin_i;

        let t = circle_y * self.cos_a - circle_x * sin_j * self.sin_a;
        let x = circle_x * cos_j * self.cos_b - t * self.sin_b;
        let y = circle_x * cos_j * self.sin_b + t * self.cos_b;
        let z = circle_y * self.sin_a + circle_x * sin_j * self.cos_a;
        [x, y, z]
    }
}

/// Lazy, finite sequence of [`Sample`]s for one rotation.
#[derive(Clone, Debug)]
pub struct Samples {
    trig: RotationTrig,
    geometry: TorusGeometry,
    projection: Projection,
    grid: SampleGrid,
    center: (f32, f32),
    inv_min: f32,
    inv_span: f32,
    fine_count: usize,
    index: usize,
    len: usize,
}

impl Samples {
    fn project(&self, point: [f32; 3]) -> Sample {
        let [x, y, z] = point;
        let denominator = z + self.projection.viewer_distance;
        debug_assert!(
            denominator > 0.0,
            "perspective divide reached {denominator}; viewer is inside the torus"
        );
        let inv_depth = 1.0 / denominator;
        let luminance = ((inv_depth - self.inv_min) / self.inv_span).clamp(0.0, 1.0);
        Sample {
            screen_x: self.center.0 + self.projection.horizontal_scale * inv_depth * x,
            screen_y: self.center.1 - self.projection.vertical_scale * inv_depth * y,
            luminance,
            inv_depth,
        }
    }
}

impl Iterator for Samples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.index >= self.len {
            return None;
        }
        let j = (self.index / self.fine_count) as f32 * self.grid.coarse_step;
        let i = (self.index % self.fine_count) as f32 * self.grid.fine_step;
        self.index += 1;

        let (sin_i, cos_i) = i.sin_cos();
        let (sin_j, cos_j) = j.sin_cos();
        let point = self.trig.rotate(&self.geometry, sin_i, cos_i, sin_j, cos_j);
        Some(self.project(point))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples {}
