use image::{Luma, Rgb, Rgba};
use imageproc::{definitions::Image, map::map_colors2};

use crate::{error::ConfigError, utils::validate_matching_dimensions};

/// Alpha at or below which a pixel is written as fully transparent black.
///
/// The foreground color is meaningless where nothing of the subject is
/// present; zeroing it keeps the output free of leftover background noise.
const TRANSPARENT_CUTOFF: f32 = 1.0 / 510.0;

/// Trait for compositing a foreground grid and an alpha map into 8-bit RGBA
///
/// This is the final assembly step: normalized [0, 1] channels are scaled
/// to the 8-bit range with rounding, so a decoded output matches the float
/// result within 1/255 per channel.
pub trait CompositeAlphaExt {
    /// Combines this grid with the given alpha map into an RGBA image.
    ///
    /// # Errors
    ///
    /// * `ConfigError::DimensionMismatch` - When image and alpha differ in size
    fn composite_alpha(&self, alpha: &Image<Luma<f32>>) -> Result<Image<Rgba<u8>>, ConfigError>;
}

impl CompositeAlphaExt for Image<Rgb<f32>> {
    fn composite_alpha(&self, alpha: &Image<Luma<f32>>) -> Result<Image<Rgba<u8>>, ConfigError> {
        validate_matching_dimensions(self, alpha)?;

        let result = map_colors2(self, alpha, |Rgb([red, green, blue]), Luma([alpha])| {
            if alpha <= TRANSPARENT_CUTOFF {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([
                    to_u8(red),
                    to_u8(green),
                    to_u8(blue),
                    to_u8(alpha),
                ])
            }
        });

        Ok(result)
    }
}

#[inline]
fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
