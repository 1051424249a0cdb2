use std::path::PathBuf;

use thiserror::Error;

/// Error type for matting configuration problems
///
/// Covers everything that can be diagnosed from the caller-supplied
/// parameters alone: malformed colors, mismatched input dimensions,
/// degenerate background pairs and out-of-range thresholds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A color parameter could not be parsed as `#RRGGBB` (or `#RRGGBBAA`)
    #[error("Invalid hex color {0:?}: expected 6 or 8 hex digits, e.g. #00FF00")]
    InvalidHexColor(String),

    /// Two grids combined in one operation differ in size
    #[error("Image dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },

    /// The two triangulation backgrounds are equal on every channel
    ///
    /// A pixel observed over identical backgrounds carries no alpha
    /// information, so the solver refuses to run.
    #[error("Background colors {0:?} and {1:?} are identical on every channel")]
    IdenticalBackgrounds([f32; 3], [f32; 3]),

    /// Distance thresholds are not a finite, increasing pair
    #[error("Invalid thresholds: near {near} must be finite, non-negative and below far {far}")]
    InvalidThresholds { near: f32, far: f32 },

    /// Blur sigma is negative or non-finite
    #[error("Invalid blur sigma {0}: must be a finite, non-negative value")]
    InvalidBlurSigma(f32),

    /// An input grid has a zero dimension
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// Error type for the external segmentation capability
///
/// The engine never falls back to another extraction mode on its own;
/// these errors surface to the caller, which owns fallback policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The capability cannot be invoked at all
    #[error("Segmentation model unavailable: {0}")]
    Unavailable(String),

    /// The capability produced a mask the adapter cannot normalize
    #[error("Segmentation model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Top-level error for a pipeline invocation
///
/// Wraps the per-concern errors plus the I/O failures that can occur while
/// decoding inputs or writing the output file.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Unreadable input or unwritable output path
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Undecodable or unencodable image data
    #[error("Image codec error on {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
