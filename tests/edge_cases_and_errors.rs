//! Edge case and error condition tests
//!
//! This suite focuses on boundary values, degenerate inputs and error
//! conditions, to ensure extraction fails loudly on bad configuration and
//! never panics or produces NaN on valid input.

use image::Rgb;
use matting_kit::{
    extract_distance_matte, extract_hsv_matte, infer_matte, parse_hex_color, solve_triangulation,
    AlphaMap, ConfigError, DistanceKeyParams, HsvKeyParams, Image, MatteModel, ModelError,
    PixelGrid, RefineAlphaExt,
};

/// Helper to create a solid-color grid.
fn solid(width: u32, height: u32, color: Rgb<f32>) -> PixelGrid {
    let mut image: PixelGrid = Image::new(width, height);
    image.pixels_mut().for_each(|pixel| *pixel = color);
    image
}

const WHITE: Rgb<f32> = Rgb([1.0, 1.0, 1.0]);
const BLACK: Rgb<f32> = Rgb([0.0, 0.0, 0.0]);

#[test]
fn minimum_image_size_works_everywhere() {
    let pixel = solid(1, 1, Rgb([0.4, 0.6, 0.2]));

    assert!(solve_triangulation(&pixel, &pixel.clone(), WHITE, BLACK).is_ok());
    assert!(extract_distance_matte(&pixel, &DistanceKeyParams::default()).is_ok());
    assert!(extract_hsv_matte(&pixel, &HsvKeyParams::default()).is_ok());
}

#[test]
fn zero_dimension_images_are_config_errors() {
    let empty: PixelGrid = Image::new(0, 3);

    assert!(matches!(
        extract_distance_matte(&empty, &DistanceKeyParams::default()),
        Err(ConfigError::EmptyImage { .. })
    ));
    assert!(matches!(
        extract_hsv_matte(&empty, &HsvKeyParams::default()),
        Err(ConfigError::EmptyImage { .. })
    ));
    assert!(matches!(
        solve_triangulation(&empty, &empty.clone(), WHITE, BLACK),
        Err(ConfigError::EmptyImage { .. })
    ));
}

#[test]
fn triangulation_rejects_identical_backgrounds() {
    let gray = parse_hex_color("#808080").unwrap();
    let image = solid(4, 4, gray);

    let result = solve_triangulation(&image, &image.clone(), gray, gray);
    assert!(matches!(
        result,
        Err(ConfigError::IdenticalBackgrounds(_, _))
    ));
}

#[test]
fn triangulation_rejects_mismatched_dimensions() {
    let image_a = solid(4, 4, WHITE);
    let image_b = solid(4, 5, BLACK);

    let result = solve_triangulation(&image_a, &image_b, WHITE, BLACK);
    assert_eq!(
        result.unwrap_err(),
        ConfigError::DimensionMismatch {
            expected: (4, 4),
            actual: (4, 5),
        }
    );
}

#[test]
fn triangulation_of_pure_backgrounds_has_no_nan() {
    // Subject entirely absent: every output value must still be finite.
    let over_white = solid(6, 6, WHITE);
    let over_black = solid(6, 6, BLACK);

    let (foreground, alpha) =
        solve_triangulation(&over_white, &over_black, WHITE, BLACK).unwrap();

    for pixel in alpha.pixels() {
        assert!(pixel.0[0].is_finite());
        assert!(pixel.0[0].abs() < 1e-3);
    }
    for pixel in foreground.pixels() {
        assert!(pixel.0.iter().all(|channel| channel.is_finite()));
    }
}

#[test]
fn noisy_observations_still_clamp_into_range() {
    // Sensor noise can push per-channel candidates outside [0, 1].
    let mut over_white = solid(2, 2, Rgb([0.99, 0.98, 1.0]));
    over_white.put_pixel(0, 0, Rgb([1.0, 1.0, 0.97]));
    let over_black = solid(2, 2, Rgb([0.02, 0.0, 0.01]));

    let (_, alpha) = solve_triangulation(&over_white, &over_black, WHITE, BLACK).unwrap();
    for pixel in alpha.pixels() {
        assert!((0.0..=1.0).contains(&pixel.0[0]));
    }
}

#[test]
fn distance_extractor_rejects_bad_thresholds() {
    let image = solid(2, 2, WHITE);

    for (near, far) in [(0.5, 0.1), (0.3, 0.3), (-0.1, 0.5), (f32::NAN, 0.5)] {
        let params = DistanceKeyParams {
            key: Rgb([0.0, 1.0, 0.0]),
            near_threshold: near,
            far_threshold: far,
        };
        assert!(
            matches!(
                extract_distance_matte(&image, &params),
                Err(ConfigError::InvalidThresholds { .. })
            ),
            "thresholds ({near}, {far}) should be rejected"
        );
    }
}

#[test]
fn smoothing_rejects_bad_sigma() {
    let alpha: AlphaMap = Image::new(4, 4);
    assert!(matches!(
        alpha.clone().smooth(-0.5),
        Err(ConfigError::InvalidBlurSigma(_))
    ));
    assert!(matches!(
        alpha.smooth(f32::INFINITY),
        Err(ConfigError::InvalidBlurSigma(_))
    ));
}

#[test]
fn hex_parsing_edge_cases() {
    assert!(parse_hex_color("#ffffff").is_ok());
    assert!(parse_hex_color("00ff00").is_ok());
    assert!(parse_hex_color("#00FF0080").is_ok());

    for bad in ["", "#", "#FFF", "#FFFFF", "#FFFFFFF", "#XYZXYZ"] {
        assert!(
            matches!(parse_hex_color(bad), Err(ConfigError::InvalidHexColor(_))),
            "expected rejection of {bad:?}"
        );
    }
}

/// Model stub that reports itself unavailable.
struct MissingRuntime;

impl MatteModel for MissingRuntime {
    fn predict(&self, _image: &PixelGrid) -> Result<AlphaMap, ModelError> {
        Err(ModelError::Unavailable("onnx runtime not found".to_owned()))
    }
}

/// Model stub that hands back a degenerate mask.
struct EmptyMask;

impl MatteModel for EmptyMask {
    fn predict(&self, _image: &PixelGrid) -> Result<AlphaMap, ModelError> {
        Ok(Image::new(0, 0))
    }
}

#[test]
fn unavailable_model_is_not_silently_skipped() {
    let image = solid(4, 4, Rgb([0.5, 0.5, 0.5]));
    assert!(matches!(
        infer_matte(&image, &MissingRuntime),
        Err(ModelError::Unavailable(_))
    ));
}

#[test]
fn degenerate_model_output_is_malformed() {
    let image = solid(4, 4, Rgb([0.5, 0.5, 0.5]));
    assert!(matches!(
        infer_matte(&image, &EmptyMask),
        Err(ModelError::MalformedOutput(_))
    ));
}

#[test]
fn hsv_extractor_alpha_levels_are_discrete() {
    // Half key screen, half subject: only 0, 0.5 and 1 may appear.
    let mut image: PixelGrid = Image::new(12, 6);
    for y in 0..6 {
        for x in 0..12 {
            let color = if x < 6 {
                Rgb([0.0, 1.0, 0.0])
            } else {
                Rgb([0.8, 0.2, 0.4])
            };
            image.put_pixel(x, y, color);
        }
    }

    let alpha = extract_hsv_matte(&image, &HsvKeyParams::default()).unwrap();
    for pixel in alpha.pixels() {
        let value = pixel.0[0];
        assert!(
            value == 0.0 || value == 0.5 || value == 1.0,
            "unexpected alpha level {value}"
        );
    }
}
