use crate::canvas::Rgba8;

/// How samples are turned into pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    /// Side length of the square painted for each sample, in pixels.
    pub cell_size: u32,
    /// Colour the canvas is cleared to every frame.
    pub background: Rgba8,
    /// Colour of a sample at full luminance. White gives grayscale.
    pub tint: Rgba8,
}

impl Shading {
    /// Scale the tint by `luminance`, clamped to `[0, 1]`. Alpha is opaque.
    #[must_use]
    pub fn colour_for(&self, luminance: f32) -> Rgba8 {
        let level = luminance.clamp(0.0, 1.0);
        let scale = |channel: u8| (f32::from(channel) * level).round() as u8;
        Rgba8::new(scale(self.tint.r), scale(self.tint.g), scale(self.tint.b), 255)
    }
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            cell_size: 2,
            background: Rgba8::TRANSPARENT,
            tint: Rgba8::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_by_default() {
        let shading = Shading::default();
        assert_eq!(shading.colour_for(1.0), Rgba8::WHITE);
        assert_eq!(shading.colour_for(0.0), Rgba8::BLACK);
        assert_eq!(shading.colour_for(0.5), Rgba8::new(128, 128, 128, 255));
    }

    #[test]
    fn out_of_range_luminance_is_clamped() {
        let shading = Shading::default();
        assert_eq!(shading.colour_for(30.0), Rgba8::WHITE);
        assert_eq!(shading.colour_for(-2.0), Rgba8::BLACK);
    }

    #[test]
    fn tint_scales_per_channel() {
        let shading = Shading {
            tint: Rgba8::new(200, 100, 0, 255),
            ..Shading::default()
        };
        assert_eq!(shading.colour_for(0.5), Rgba8::new(100, 50, 0, 255));
    }
}
