use image::{Luma, Rgb};
use imageproc::{
    definitions::Image,
    distance_transform::Norm,
    map::map_colors,
    morphology::dilate,
};
use itertools::izip;

use crate::{
    error::ConfigError,
    matting_kit::color::{hue_distance, rgb_to_hsv},
    utils::validate_non_empty,
};

/// Alpha assigned to the dilated edge band around the background mask.
const EDGE_BAND_ALPHA: f32 = 0.5;

/// Radius (L-infinity) of the edge band dilation, in pixels.
const EDGE_BAND_RADIUS: u8 = 2;

/// Parameters for HSV key thresholding.
///
/// This is the convenience fallback: a pixel is background when its hue is
/// within `hue_tolerance_degrees` of the key hue (wrapping at 360°) and it
/// is both saturated and bright enough to plausibly be the key screen
/// rather than a shadow or a gray subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvKeyParams {
    /// Key (background) color, channels in [0, 1]
    pub key: Rgb<f32>,
    /// Maximum hue distance to the key hue, in degrees
    pub hue_tolerance_degrees: f32,
    /// Minimum saturation, in [0, 1], for a pixel to count as background
    pub saturation_min: f32,
    /// Minimum value (brightness), in [0, 1], for a pixel to count as background
    pub value_min: f32,
}

impl Default for HsvKeyParams {
    /// Green-screen defaults.
    fn default() -> Self {
        Self {
            key: Rgb([0.0, 1.0, 0.0]),
            hue_tolerance_degrees: 30.0,
            saturation_min: 80.0 / 255.0,
            value_min: 40.0 / 255.0,
        }
    }
}

/// Extracts an approximate alpha map by HSV thresholding.
///
/// Background pixels get alpha 0, foreground pixels alpha 1, and a band of
/// [`EDGE_BAND_RADIUS`] pixels around the background mask gets alpha 0.5 so
/// that anti-aliased subject edges are not cut hard. The binary decision
/// makes this mode less accurate than distance or triangulation matting;
/// it is the default for convenience, not quality.
///
/// # Errors
///
/// * `ConfigError::EmptyImage` - When the input has a zero dimension
pub fn extract_hsv_matte(
    image: &Image<Rgb<f32>>,
    params: &HsvKeyParams,
) -> Result<Image<Luma<f32>>, ConfigError> {
    validate_non_empty(image)?;

    let (key_hue, _, _) = rgb_to_hsv(params.key);

    let background: Image<Luma<u8>> = map_colors(image, |pixel| {
        let (hue, saturation, value) = rgb_to_hsv(pixel);
        let is_background = hue_distance(hue, key_hue) <= params.hue_tolerance_degrees
            && saturation >= params.saturation_min
            && value >= params.value_min;
        Luma([if is_background { 255 } else { 0 }])
    });
    let dilated = dilate(&background, Norm::LInf, EDGE_BAND_RADIUS);

    let mut alpha: Image<Luma<f32>> = Image::new(image.width(), image.height());
    for (alpha_pixel, &mask_pixel, &dilated_pixel) in izip!(
        alpha.pixels_mut(),
        background.pixels(),
        dilated.pixels()
    ) {
        let value = if mask_pixel.0[0] > 0 {
            0.0
        } else if dilated_pixel.0[0] > 0 {
            EDGE_BAND_ALPHA
        } else {
            1.0
        };
        *alpha_pixel = Luma([value]);
    }

    Ok(alpha)
}

/// Trait providing HSV keying as a method on pixel grids
pub trait HsvMattingExt {
    /// Alpha map produced by the extraction.
    type Alpha;

    /// Computes the thresholded alpha map for this grid.
    ///
    /// # Errors
    ///
    /// Same conditions as [`extract_hsv_matte`].
    fn hsv_matte(&self, params: &HsvKeyParams) -> Result<Self::Alpha, ConfigError>;
}

impl HsvMattingExt for Image<Rgb<f32>> {
    type Alpha = Image<Luma<f32>>;

    fn hsv_matte(&self, params: &HsvKeyParams) -> Result<Self::Alpha, ConfigError> {
        extract_hsv_matte(self, params)
    }
}
