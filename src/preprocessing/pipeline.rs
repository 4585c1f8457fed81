use crate::error::PreprocessError;
use image::{DynamicImage, GrayImage};
use std::time::Instant;

use super::steps;

/// Kernel size of the Gaussian blur ahead of Otsu
const SHARPEN_BLUR_KERNEL: usize = 5;
/// Kernel size of the Gaussian blur ahead of adaptive thresholding
const ADAPTIVE_BLUR_KERNEL: usize = 3;

/// Preprocessing strategy. The two variants are alternatives, never chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// grayscale, 5x5 blur, Otsu, sharpen, 3x3 median
    Sharpen,
    /// portrait rotation, grayscale, 3x3 blur, adaptive mean threshold
    Adaptive,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sharpen => "sharpen",
            Self::Adaptive => "adaptive",
        }
    }
}

/// Timing information for a single preprocessing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Binarized single channel image
    pub image: GrayImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    pub variant: Variant,
    /// Individual step timings, in execution order
    pub steps: Vec<StepTiming>,
    /// Whether the portrait correction turned the image
    pub rotated: bool,
}

impl PreprocessingResult {
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Preprocessing pipeline that applies the steps of one variant
pub struct Pipeline {
    variant: Variant,
}

impl Pipeline {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    /// Process a decoded image according to the configured variant
    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, PreprocessError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(PreprocessError::EmptyImage { width, height });
        }

        let start = Instant::now();
        let mut steps_timing = Vec::new();
        let mut rotated = false;
        let mut img = image;

        // Adaptive only: portrait correction happens on the color image
        if self.variant == Variant::Adaptive && steps::rotate::is_portrait(&img) {
            img = self.run_step("rotate", img, &mut steps_timing, steps::rotate::apply)?;
            rotated = true;
        }

        img = self.run_step("grayscale", img, &mut steps_timing, steps::grayscale::apply)?;

        match self.variant {
            Variant::Sharpen => {
                img = self.run_step("blur", img, &mut steps_timing, |img| {
                    steps::blur::apply(img, SHARPEN_BLUR_KERNEL)
                })?;
                img = self.run_step("threshold", img, &mut steps_timing, steps::threshold::otsu)?;
                img = self.run_step("sharpen", img, &mut steps_timing, steps::sharpen::apply)?;
                img = self.run_step("denoise", img, &mut steps_timing, steps::denoise::apply)?;
            }
            Variant::Adaptive => {
                img = self.run_step("blur", img, &mut steps_timing, |img| {
                    steps::blur::apply(img, ADAPTIVE_BLUR_KERNEL)
                })?;
                img = self.run_step(
                    "threshold",
                    img,
                    &mut steps_timing,
                    steps::threshold::adaptive_mean,
                )?;
            }
        }

        Ok(PreprocessingResult {
            image: img.into_luma8(),
            total_time_ms: start.elapsed().as_millis() as u64,
            variant: self.variant,
            steps: steps_timing,
            rotated,
        })
    }

    fn run_step<F>(
        &self,
        name: &str,
        img: DynamicImage,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<DynamicImage, PreprocessError>
    where
        F: FnOnce(DynamicImage) -> Result<DynamicImage, PreprocessError>,
    {
        let step_start = Instant::now();
        let result = step_fn(img)?;
        let time_ms = step_start.elapsed().as_millis() as u64;
        tracing::debug!(
            step = name,
            time_ms,
            width = result.width(),
            height = result.height(),
            "Preprocessing step finished"
        );
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms,
        });
        Ok(result)
    }
}
