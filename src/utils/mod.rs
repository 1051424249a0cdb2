//! Internal utility functions for matting-kit.
//!
//! This module contains common functionality used across the extraction
//! and refinement operations.

use image::GenericImageView;

use crate::error::ConfigError;

/// Clamps a value to the unit interval, mapping NaN to 0.0.
///
/// Alpha samples and normalized channel values must stay in [0, 1];
/// every operation that can produce out-of-range or non-finite values
/// runs its results through this.
#[inline]
pub fn clamp_unit_f32(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Validates that an image has non-zero dimensions.
pub fn validate_non_empty<I>(image: &I) -> Result<(), ConfigError>
where
    I: GenericImageView,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        Err(ConfigError::EmptyImage { width, height })
    } else {
        Ok(())
    }
}

/// Validates that two images have matching dimensions.
///
/// The first image supplies the expected dimensions reported in the error.
pub fn validate_matching_dimensions<I1, I2>(expected: &I1, actual: &I2) -> Result<(), ConfigError>
where
    I1: GenericImageView,
    I2: GenericImageView,
{
    if expected.dimensions() != actual.dimensions() {
        Err(ConfigError::DimensionMismatch {
            expected: expected.dimensions(),
            actual: actual.dimensions(),
        })
    } else {
        Ok(())
    }
}
