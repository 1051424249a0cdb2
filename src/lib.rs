//! Alpha matte extraction for renderers that cannot emit transparency.
//!
//! Given one or two flat-background renders of a subject, this crate
//! recovers a per-pixel alpha channel and writes an RGBA image:
//!
//! - [`solve_triangulation`]: exact alpha and foreground colors from two
//!   renders over distinct known backgrounds (compositing equation).
//! - [`extract_distance_matte`]: soft-ramp chroma keying by color distance
//!   to a single key color.
//! - [`extract_hsv_matte`]: hue/saturation/value thresholding, the
//!   convenience default.
//! - [`infer_matte`]: delegation to an injected pretrained segmentation
//!   model ([`MatteModel`]).
//!
//! [`MattingPipeline`] orchestrates one extraction end to end, from input
//! decoding through edge refinement and compositing to an atomic PNG write.

mod error;
mod matting_kit;
mod pipeline;
#[cfg(test)]
mod test_utils;
mod utils;

pub use error::{ConfigError, ModelError, PipelineError};
pub use matting_kit::chroma_distance::{
    extract_distance_matte, DistanceKeyParams, DistanceMattingExt,
};
pub use matting_kit::color::{hue_distance, parse_hex_color, rgb_to_hsv};
pub use matting_kit::composite::CompositeAlphaExt;
pub use matting_kit::external::{infer_matte, MatteModel};
pub use matting_kit::hsv_key::{extract_hsv_matte, HsvKeyParams, HsvMattingExt};
pub use matting_kit::refine::{correct_color_bleed, RefineAlphaExt};
pub use matting_kit::triangulation::{solve_triangulation, TriangulationMattingExt};
pub use pipeline::{MatteMode, MattingPipeline, DEFAULT_BLUR_SIGMA};

pub use imageproc::definitions::Image;

/// Alpha map: per-pixel opacity in [0, 1], 0 transparent, 1 opaque.
pub type AlphaMap = Image<image::Luma<f32>>;

/// Decoded pixel grid with normalized [0, 1] channels.
pub type PixelGrid = Image<image::Rgb<f32>>;
