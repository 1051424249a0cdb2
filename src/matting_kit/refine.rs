use image::{Luma, Rgb};
use imageproc::{definitions::Image, filter::gaussian_blur_f32, map::map_colors};
use itertools::izip;

use crate::{
    error::ConfigError,
    utils::{clamp_unit_f32, validate_matching_dimensions},
};

/// Below this alpha the compositing-equation division is unstable and the
/// observed color is kept as the foreground estimate.
const MIN_VISIBLE_ALPHA: f32 = 1e-2;

/// Trait for post-processing alpha maps
///
/// Every extractor's output passes through here before compositing:
/// clamping restores the [0, 1] contract after numeric operations, and
/// Gaussian smoothing suppresses the stairstep edges and halo artifacts
/// that hard thresholding leaves behind.
pub trait RefineAlphaExt {
    /// Clamps every sample to [0, 1], mapping NaN to 0.
    #[must_use]
    fn clamp_unit(self) -> Self;

    /// Applies Gaussian smoothing with the given sigma, then re-clamps.
    ///
    /// A sigma of zero is the identity; the alpha map is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidBlurSigma` - When sigma is negative or non-finite
    fn smooth(self, sigma: f32) -> Result<Self, ConfigError>
    where
        Self: Sized;
}

impl RefineAlphaExt for Image<Luma<f32>> {
    fn clamp_unit(self) -> Self {
        map_colors(&self, |Luma([alpha])| Luma([clamp_unit_f32(alpha)]))
    }

    fn smooth(self, sigma: f32) -> Result<Self, ConfigError> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(ConfigError::InvalidBlurSigma(sigma));
        }
        if sigma == 0.0 {
            return Ok(self);
        }
        Ok(gaussian_blur_f32(&self, sigma).clamp_unit())
    }
}

/// Removes background tint from partially transparent edge pixels.
///
/// Soft edges observed over a flat background still contain a
/// `(1 - alpha)` share of background color. The pure foreground is
/// estimated per pixel from the compositing equation,
/// `F = (I - (1 - a) * Bg) / a`, and the observed color is blended toward
/// that estimate proportionally to `(1 - a)`: opaque pixels are untouched,
/// soft edges lose their tint. Where alpha is too small for the division
/// the observed color is kept; it is invisible once composited anyway.
///
/// # Errors
///
/// * `ConfigError::DimensionMismatch` - When image and alpha differ in size
pub fn correct_color_bleed(
    image: &Image<Rgb<f32>>,
    alpha: &Image<Luma<f32>>,
    background: Rgb<f32>,
) -> Result<Image<Rgb<f32>>, ConfigError> {
    validate_matching_dimensions(image, alpha)?;

    let mut corrected: Image<Rgb<f32>> = Image::new(image.width(), image.height());
    for (corrected_pixel, &observed, &alpha_pixel) in izip!(
        corrected.pixels_mut(),
        image.pixels(),
        alpha.pixels()
    ) {
        let Luma([a]) = alpha_pixel;
        let Rgb(observed_channels) = observed;

        let mut result = observed_channels;
        if a >= MIN_VISIBLE_ALPHA {
            let inverse = 1.0 - a;
            for c in 0..3 {
                let estimate =
                    clamp_unit_f32((observed_channels[c] - inverse * background.0[c]) / a);
                result[c] =
                    clamp_unit_f32(observed_channels[c] + inverse * (estimate - observed_channels[c]));
            }
        }
        *corrected_pixel = Rgb(result);
    }

    Ok(corrected)
}
