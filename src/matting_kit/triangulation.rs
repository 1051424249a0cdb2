use image::{Luma, Rgb};
use imageproc::definitions::Image;
use itertools::izip;

use crate::{
    error::ConfigError,
    utils::{clamp_unit_f32, validate_matching_dimensions, validate_non_empty},
};

/// Channels whose background difference falls below this carry no alpha
/// information and are excluded from the per-pixel estimate.
const CHANNEL_EPSILON: f32 = 1e-6;

/// Below this alpha the foreground is undefined and never visible once
/// composited; recovery switches to a deterministic fallback.
const MIN_VISIBLE_ALPHA: f32 = 1e-2;

/// Recovers an exact alpha matte and foreground colors from two renders of
/// the same subject over two distinct flat backgrounds.
///
/// Both observations obey the compositing equation `I = a*F + (1-a)*Bg`
/// per channel. Subtracting the two observations eliminates the unknown
/// foreground, giving per-channel alpha candidates
///
/// ```text
/// alpha_c = 1 - (I_A,c - I_B,c) / (A_c - B_c)
/// ```
///
/// for every channel where the backgrounds actually differ. The candidates
/// of the valid channels are reduced by their mean and clamped to [0, 1].
/// The foreground is then recovered from the first observation as
/// `F_c = (I_A,c - (1-a)*A_c) / a`; where alpha is too small for the
/// division to be meaningful, the average of the two observations is used
/// instead, which is deterministic and invisible after compositing.
///
/// # Arguments
///
/// * `image_a` - Subject composited over `background_a`
/// * `image_b` - Subject composited over `background_b`, same dimensions
/// * `background_a` - Flat color of the first background, channels in [0, 1]
/// * `background_b` - Flat color of the second background, channels in [0, 1]
///
/// # Returns
///
/// The recovered foreground grid and the alpha map, both at the input
/// dimensions.
///
/// # Errors
///
/// * `ConfigError::IdenticalBackgrounds` - When the backgrounds match on every channel
/// * `ConfigError::DimensionMismatch` - When the two grids differ in size
/// * `ConfigError::EmptyImage` - When an input has a zero dimension
pub fn solve_triangulation(
    image_a: &Image<Rgb<f32>>,
    image_b: &Image<Rgb<f32>>,
    background_a: Rgb<f32>,
    background_b: Rgb<f32>,
) -> Result<(Image<Rgb<f32>>, Image<Luma<f32>>), ConfigError> {
    validate_non_empty(image_a)?;
    validate_matching_dimensions(image_a, image_b)?;

    let background_delta = [
        background_a.0[0] - background_b.0[0],
        background_a.0[1] - background_b.0[1],
        background_a.0[2] - background_b.0[2],
    ];
    let valid: Vec<usize> = (0..3)
        .filter(|&c| background_delta[c].abs() > CHANNEL_EPSILON)
        .collect();
    if valid.is_empty() {
        return Err(ConfigError::IdenticalBackgrounds(
            background_a.0,
            background_b.0,
        ));
    }

    let mut foreground: Image<Rgb<f32>> = Image::new(image_a.width(), image_a.height());
    let mut alpha: Image<Luma<f32>> = Image::new(image_a.width(), image_a.height());

    for (foreground_pixel, alpha_pixel, &observed_a, &observed_b) in izip!(
        foreground.pixels_mut(),
        alpha.pixels_mut(),
        image_a.pixels(),
        image_b.pixels()
    ) {
        let Rgb(a_channels) = observed_a;
        let Rgb(b_channels) = observed_b;

        let candidate_sum: f32 = valid
            .iter()
            .map(|&c| 1.0 - (a_channels[c] - b_channels[c]) / background_delta[c])
            .sum();
        let pixel_alpha = clamp_unit_f32(candidate_sum / valid.len() as f32);

        let recovered = if pixel_alpha < MIN_VISIBLE_ALPHA {
            // Undefined foreground at (near) zero coverage; the average of
            // the two observations is an arbitrary but stable stand-in.
            [
                (a_channels[0] + b_channels[0]) / 2.0,
                (a_channels[1] + b_channels[1]) / 2.0,
                (a_channels[2] + b_channels[2]) / 2.0,
            ]
        } else {
            let inverse = 1.0 - pixel_alpha;
            [
                clamp_unit_f32((a_channels[0] - inverse * background_a.0[0]) / pixel_alpha),
                clamp_unit_f32((a_channels[1] - inverse * background_a.0[1]) / pixel_alpha),
                clamp_unit_f32((a_channels[2] - inverse * background_a.0[2]) / pixel_alpha),
            ]
        };

        *foreground_pixel = Rgb(recovered);
        *alpha_pixel = Luma([pixel_alpha]);
    }

    Ok((foreground, alpha))
}

/// Trait providing triangulation matting as a method on pixel grids
///
/// `self` is the observation over the first background; see
/// [`solve_triangulation`] for the underlying math and error conditions.
pub trait TriangulationMattingExt {
    /// Alpha map type produced alongside the recovered foreground.
    type Alpha;

    /// Solves the two-background compositing system against `other`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`solve_triangulation`].
    fn triangulation_matte(
        &self,
        other: &Self,
        background_a: Rgb<f32>,
        background_b: Rgb<f32>,
    ) -> Result<(Self, Self::Alpha), ConfigError>
    where
        Self: Sized;
}

impl TriangulationMattingExt for Image<Rgb<f32>> {
    type Alpha = Image<Luma<f32>>;

    fn triangulation_matte(
        &self,
        other: &Self,
        background_a: Rgb<f32>,
        background_b: Rgb<f32>,
    ) -> Result<(Self, Self::Alpha), ConfigError> {
        solve_triangulation(self, other, background_a, background_b)
    }
}
