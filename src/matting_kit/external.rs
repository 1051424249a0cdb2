use image::{imageops, imageops::FilterType, Luma, Rgb};
use imageproc::{definitions::Image, map::map_colors};

use crate::{error::ModelError, utils::clamp_unit_f32};

/// An externally supplied pretrained segmentation capability.
///
/// Implementations wrap whatever inference runtime the caller brings (an
/// ONNX session, a remote service client, a test stub) behind a pure
/// pixel-grid-to-alpha-map contract. The returned mask may be at any
/// resolution; the adapter resamples it to the input dimensions.
pub trait MatteModel {
    /// Runs segmentation on the image and returns a foreground mask.
    ///
    /// Mask values are interpreted as alpha in [0, 1]; out-of-range values
    /// are clamped by the adapter.
    ///
    /// # Errors
    ///
    /// * `ModelError::Unavailable` - When the capability cannot be invoked
    /// * `ModelError::MalformedOutput` - When inference produces unusable data
    fn predict(&self, image: &Image<Rgb<f32>>) -> Result<Image<Luma<f32>>, ModelError>;
}

/// Delegates alpha estimation to an external segmentation model and
/// normalizes the result to the engine's alpha-map contract.
///
/// The model's mask is validated (non-empty, finite), resampled to the
/// input's exact dimensions when the resolutions differ, and clamped to
/// [0, 1]. Resampling policy is bilinear (`FilterType::Triangle`): masks
/// are smooth fields, so higher-order kernels buy nothing and can
/// overshoot.
///
/// There is no fallback to another extraction mode here; if the model
/// fails, the error propagates and mode selection stays a caller decision.
///
/// # Errors
///
/// * `ModelError::Unavailable` - Propagated from the model
/// * `ModelError::MalformedOutput` - Empty mask or non-finite samples
pub fn infer_matte(
    image: &Image<Rgb<f32>>,
    model: &dyn MatteModel,
) -> Result<Image<Luma<f32>>, ModelError> {
    let mask = model.predict(image)?;

    if mask.width() == 0 || mask.height() == 0 {
        return Err(ModelError::MalformedOutput(format!(
            "mask has empty dimensions {}x{}",
            mask.width(),
            mask.height()
        )));
    }
    if mask.pixels().any(|pixel| !pixel.0[0].is_finite()) {
        return Err(ModelError::MalformedOutput(
            "mask contains non-finite samples".to_owned(),
        ));
    }

    let mask = if mask.dimensions() == image.dimensions() {
        mask
    } else {
        imageops::resize(&mask, image.width(), image.height(), FilterType::Triangle)
    };

    Ok(map_colors(&mask, |Luma([alpha])| {
        Luma([clamp_unit_f32(alpha)])
    }))
}
