use image::{Luma, Rgb};
use imageproc::{definitions::Image, map::map_colors};

use crate::{error::ConfigError, utils::validate_non_empty};

/// Parameters for color-distance keying.
///
/// Thresholds are Euclidean RGB distances in normalized channel units, the
/// same scale as the [0, 1] pixel values; a distance of `10.0 / 255.0`
/// corresponds to 10 8-bit steps. Pixels at or below `near_threshold` from
/// the key color are fully transparent, pixels at or beyond `far_threshold`
/// fully opaque, with a linear ramp in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceKeyParams {
    /// Key (background) color, channels in [0, 1]
    pub key: Rgb<f32>,
    /// Distance at or below which alpha is 0
    pub near_threshold: f32,
    /// Distance at or beyond which alpha is 1
    pub far_threshold: f32,
}

impl Default for DistanceKeyParams {
    /// Green-screen defaults matching common capture setups.
    fn default() -> Self {
        Self {
            key: Rgb([0.0, 1.0, 0.0]),
            near_threshold: 30.0 / 255.0,
            far_threshold: 120.0 / 255.0,
        }
    }
}

impl DistanceKeyParams {
    /// Validates the threshold pair.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidThresholds` - When the thresholds are not a
    ///   finite, non-negative pair with `near < far`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.near_threshold.is_finite()
            && self.far_threshold.is_finite()
            && self.near_threshold >= 0.0
            && self.near_threshold < self.far_threshold;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds {
                near: self.near_threshold,
                far: self.far_threshold,
            })
        }
    }
}

/// Extracts an alpha map by color distance to a single flat key color.
///
/// The map is piecewise linear in the Euclidean RGB distance `d` to the
/// key: 0 for `d <= near`, 1 for `d >= far`, `(d - near) / (far - near)`
/// in between, so alpha is monotonically non-decreasing in distance.
/// Thresholding produces stairstep edges; callers smooth the result with
/// the edge refiner.
///
/// # Errors
///
/// * `ConfigError::InvalidThresholds` - Propagated from [`DistanceKeyParams::validate`]
/// * `ConfigError::EmptyImage` - When the input has a zero dimension
pub fn extract_distance_matte(
    image: &Image<Rgb<f32>>,
    params: &DistanceKeyParams,
) -> Result<Image<Luma<f32>>, ConfigError> {
    params.validate()?;
    validate_non_empty(image)?;

    let Rgb([key_r, key_g, key_b]) = params.key;
    let ramp_width = params.far_threshold - params.near_threshold;

    let alpha = map_colors(image, |Rgb([r, g, b])| {
        let distance = ((r - key_r).powi(2) + (g - key_g).powi(2) + (b - key_b).powi(2)).sqrt();
        let alpha = (distance - params.near_threshold) / ramp_width;
        Luma([alpha.clamp(0.0, 1.0)])
    });

    Ok(alpha)
}

/// Trait providing color-distance keying as a method on pixel grids
pub trait DistanceMattingExt {
    /// Alpha map produced by the extraction.
    type Alpha;

    /// Computes the distance-ramp alpha map for this grid.
    ///
    /// # Errors
    ///
    /// Same conditions as [`extract_distance_matte`].
    fn distance_matte(&self, params: &DistanceKeyParams) -> Result<Self::Alpha, ConfigError>;
}

impl DistanceMattingExt for Image<Rgb<f32>> {
    type Alpha = Image<Luma<f32>>;

    fn distance_matte(&self, params: &DistanceKeyParams) -> Result<Self::Alpha, ConfigError> {
        extract_distance_matte(self, params)
    }
}
