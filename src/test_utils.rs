//! Test utilities for matting-kit
//!
//! Synthetic-image builders and tolerant comparisons shared by the unit
//! tests. Only compiled for tests.

use image::Rgb;
use imageproc::definitions::Image;

/// Creates a solid-color RGB grid with normalized channels.
pub fn solid_image(width: u32, height: u32, color: Rgb<f32>) -> Image<Rgb<f32>> {
    let mut image: Image<Rgb<f32>> = Image::new(width, height);
    image.pixels_mut().for_each(|pixel| *pixel = color);
    image
}

/// Composites a solid foreground of known alpha over a flat background,
/// producing exactly the observation the compositing equation predicts:
/// `I = a * F + (1 - a) * Bg` per channel.
pub fn composite_over(
    width: u32,
    height: u32,
    foreground: Rgb<f32>,
    alpha: f32,
    background: Rgb<f32>,
) -> Image<Rgb<f32>> {
    let observed = Rgb([
        alpha * foreground.0[0] + (1.0 - alpha) * background.0[0],
        alpha * foreground.0[1] + (1.0 - alpha) * background.0[1],
        alpha * foreground.0[2] + (1.0 - alpha) * background.0[2],
    ]);
    solid_image(width, height, observed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_over_matches_the_compositing_equation() {
        let image = composite_over(
            2,
            2,
            Rgb([1.0, 0.0, 0.0]),
            0.5,
            Rgb([0.0, 1.0, 0.0]),
        );
        assert_eq!(*image.get_pixel(0, 0), Rgb([0.5, 0.5, 0.0]));
    }

    #[test]
    fn composite_over_extremes() {
        let foreground = Rgb([0.2, 0.4, 0.6]);
        let background = Rgb([1.0, 1.0, 1.0]);

        let opaque = composite_over(1, 1, foreground, 1.0, background);
        assert_eq!(*opaque.get_pixel(0, 0), foreground);

        let transparent = composite_over(1, 1, foreground, 0.0, background);
        assert_eq!(*transparent.get_pixel(0, 0), background);
    }
}
