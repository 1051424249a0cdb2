use image::Rgb;

use crate::error::ConfigError;

/// Parses a `#RRGGBB` or `#RRGGBBAA` hex string into a normalized color triple.
///
/// The leading `#` is optional and alpha digits, when present, are ignored:
/// background and key colors are flat by definition. Channels are returned
/// in [0, 1].
///
/// # Errors
///
/// * `ConfigError::InvalidHexColor` - When the string is not 6 or 8 hex digits
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use matting_kit::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#00FF00").unwrap(), Rgb([0.0, 1.0, 0.0]));
/// assert!(parse_hex_color("#12345").is_err());
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Rgb<f32>, ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 && digits.len() != 8 {
        return Err(ConfigError::InvalidHexColor(hex.to_owned()));
    }

    let mut channels = [0.0f32; 3];
    for (channel, i) in channels.iter_mut().zip([0, 2, 4]) {
        let value = u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ConfigError::InvalidHexColor(hex.to_owned()))?;
        *channel = f32::from(value) / 255.0;
    }

    Ok(Rgb(channels))
}

/// Converts a normalized RGB triple to HSV.
///
/// Returns `(hue, saturation, value)` with hue in degrees [0, 360) and
/// saturation/value in [0, 1]. Achromatic colors report hue 0.
pub fn rgb_to_hsv(Rgb([r, g, b]): Rgb<f32>) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max > 0.0 { delta / max } else { 0.0 };

    (hue.rem_euclid(360.0), saturation, max)
}

/// Absolute hue distance in degrees, accounting for the 360° wrap-around.
#[inline]
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}
