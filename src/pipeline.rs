use std::{
    fmt, fs,
    io,
    path::{Path, PathBuf},
};

use image::{ImageFormat, Luma, Rgb};
use imageproc::definitions::Image;
use tracing::{debug, info};

use crate::{
    error::{ConfigError, PipelineError},
    matting_kit::{
        chroma_distance::{extract_distance_matte, DistanceKeyParams},
        composite::CompositeAlphaExt,
        external::{infer_matte, MatteModel},
        hsv_key::{extract_hsv_matte, HsvKeyParams},
        refine::{correct_color_bleed, RefineAlphaExt},
        triangulation::solve_triangulation,
    },
};

/// Default alpha smoothing sigma applied after extraction.
pub const DEFAULT_BLUR_SIGMA: f32 = 0.5;

/// Extraction mode, resolved exactly once when the pipeline is built.
///
/// There is no mid-run switching and no automatic fallback between modes;
/// a caller that wants fallback behavior runs the pipeline again with a
/// different mode.
pub enum MatteMode {
    /// Two-background triangulation matting (highest quality).
    Triangulation {
        /// Render of the same subject over `background_b`
        second_input: PathBuf,
        /// Flat color of the primary input's background
        background_a: Rgb<f32>,
        /// Flat color of the second input's background
        background_b: Rgb<f32>,
    },
    /// Single-image color-distance keying with a soft ramp.
    ColorDistance(DistanceKeyParams),
    /// Single-image HSV thresholding, the default mode.
    Hsv(HsvKeyParams),
    /// Delegation to an injected pretrained segmentation model.
    External(Box<dyn MatteModel>),
}

impl MatteMode {
    /// The mode used when the caller requests nothing explicit.
    #[must_use]
    pub fn default_hsv() -> Self {
        Self::Hsv(HsvKeyParams::default())
    }

    /// Key color usable as a background estimate for bleed correction.
    ///
    /// Triangulation recovers true foreground colors already and the
    /// external model exposes no background, so only the single-image
    /// keying modes report one.
    fn key_color(&self) -> Option<Rgb<f32>> {
        match self {
            Self::ColorDistance(params) => Some(params.key),
            Self::Hsv(params) => Some(params.key),
            Self::Triangulation { .. } | Self::External(_) => None,
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Triangulation { .. } => "triangulation",
            Self::ColorDistance(_) => "color-distance",
            Self::Hsv(_) => "hsv",
            Self::External(_) => "external",
        }
    }
}

impl fmt::Debug for MatteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triangulation {
                second_input,
                background_a,
                background_b,
            } => f
                .debug_struct("Triangulation")
                .field("second_input", second_input)
                .field("background_a", background_a)
                .field("background_b", background_b)
                .finish(),
            Self::ColorDistance(params) => f.debug_tuple("ColorDistance").field(params).finish(),
            Self::Hsv(params) => f.debug_tuple("Hsv").field(params).finish(),
            Self::External(_) => f.write_str("External(..)"),
        }
    }
}

/// Single-invocation matting pipeline
///
/// Runs the fixed stage sequence: load inputs, extract alpha with exactly
/// one extractor, refine edges, composite, write output. A failure at any
/// stage aborts the run with a specific error kind; the pipeline performs
/// no retries and no mode fallback, and a failed run never leaves a
/// partial output file.
///
/// # Examples
///
/// ```no_run
/// use matting_kit::{parse_hex_color, MatteMode, MattingPipeline};
///
/// # fn example() -> Result<(), matting_kit::PipelineError> {
/// let mode = MatteMode::Triangulation {
///     second_input: "subject_black.png".into(),
///     background_a: parse_hex_color("#FFFFFF")?,
///     background_b: parse_hex_color("#000000")?,
/// };
/// MattingPipeline::new("subject_white.png", "subject.png", mode).run()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MattingPipeline {
    input: PathBuf,
    output: PathBuf,
    mode: MatteMode,
    blur_sigma: f32,
    bleed_correction: bool,
}

impl MattingPipeline {
    /// Creates a pipeline with the default blur sigma and no bleed
    /// correction.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, mode: MatteMode) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            mode,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            bleed_correction: false,
        }
    }

    /// Sets the Gaussian sigma for alpha edge smoothing; zero disables it.
    #[must_use]
    pub fn with_blur_sigma(mut self, sigma: f32) -> Self {
        self.blur_sigma = sigma;
        self
    }

    /// Enables color-bleed correction for the single-image keying modes.
    #[must_use]
    pub fn with_bleed_correction(mut self, enabled: bool) -> Self {
        self.bleed_correction = enabled;
        self
    }

    /// Runs the pipeline to completion.
    ///
    /// # Errors
    ///
    /// * `PipelineError::Config` - Invalid parameters or mismatched inputs
    /// * `PipelineError::Model` - External segmentation failure
    /// * `PipelineError::Io` / `PipelineError::Image` - Unreadable input,
    ///   undecodable data or unwritable output
    pub fn run(&self) -> Result<(), PipelineError> {
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(ConfigError::InvalidBlurSigma(self.blur_sigma).into());
        }

        debug!(input = ?self.input, mode = self.mode.name(), "loading inputs");
        let image = load_rgb(&self.input)?;

        debug!(mode = self.mode.name(), "extracting alpha");
        let (foreground, alpha) = self.extract(&image)?;

        debug!(sigma = self.blur_sigma, "refining edges");
        let alpha = alpha.clamp_unit().smooth(self.blur_sigma)?;

        let foreground = match self.mode.key_color() {
            Some(key) if self.bleed_correction => {
                debug!("correcting color bleed");
                correct_color_bleed(&foreground, &alpha, key)?
            }
            _ => foreground,
        };

        let rgba = foreground.composite_alpha(&alpha)?;

        debug!(output = ?self.output, "writing output");
        write_atomic(&rgba, &self.output)?;

        info!(
            output = ?self.output,
            width = rgba.width(),
            height = rgba.height(),
            mode = self.mode.name(),
            "matting complete"
        );
        Ok(())
    }

    /// Dispatches to the selected extractor, returning the foreground grid
    /// and the raw alpha map.
    fn extract(
        &self,
        image: &Image<Rgb<f32>>,
    ) -> Result<(Image<Rgb<f32>>, Image<Luma<f32>>), PipelineError> {
        match &self.mode {
            MatteMode::Triangulation {
                second_input,
                background_a,
                background_b,
            } => {
                let second = load_rgb(second_input)?;
                let (foreground, alpha) =
                    solve_triangulation(image, &second, *background_a, *background_b)?;
                Ok((foreground, alpha))
            }
            MatteMode::ColorDistance(params) => {
                let alpha = extract_distance_matte(image, params)?;
                Ok((image.clone(), alpha))
            }
            MatteMode::Hsv(params) => {
                let alpha = extract_hsv_matte(image, params)?;
                Ok((image.clone(), alpha))
            }
            MatteMode::External(model) => {
                let alpha = infer_matte(image, model.as_ref())?;
                Ok((image.clone(), alpha))
            }
        }
    }
}

/// Decodes an input file into a normalized [0, 1] RGB grid.
fn load_rgb(path: &Path) -> Result<Image<Rgb<f32>>, PipelineError> {
    let image = image::open(path).map_err(|source| PipelineError::Image {
        path: path.to_owned(),
        source,
    })?;
    Ok(image.to_rgb32f())
}

/// Writes the RGBA result atomically: encode to a sibling temporary path,
/// then rename over the target. The temporary file is removed on failure,
/// so the caller's path either holds a complete PNG or nothing.
fn write_atomic(rgba: &Image<image::Rgba<u8>>, output: &Path) -> Result<(), PipelineError> {
    let file_name = output.file_name().ok_or_else(|| PipelineError::Io {
        path: output.to_owned(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
    })?;
    let mut temp_name = file_name.to_owned();
    temp_name.push(".tmp");
    let temp_path = output.with_file_name(temp_name);

    if let Err(source) = rgba.save_with_format(&temp_path, ImageFormat::Png) {
        let _ = fs::remove_file(&temp_path);
        return Err(PipelineError::Image {
            path: temp_path,
            source,
        });
    }

    fs::rename(&temp_path, output).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        PipelineError::Io {
            path: output.to_owned(),
            source,
        }
    })
}
