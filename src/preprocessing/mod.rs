//! Image preprocessing ahead of OCR
//!
//! Two alternative pipelines binarize a scanned page: Otsu with sharpening
//! and median denoising, or adaptive mean thresholding with portrait
//! correction.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, PreprocessingResult, StepTiming, Variant};

use crate::error::PreprocessError;
use crate::imagefile;
use std::path::{Path, PathBuf};

/// Decode `input`, run the variant's pipeline and write the PNG next to it
///
/// Returns the path of the written file.
pub fn preprocess_file(input: &Path, variant: Variant) -> Result<PathBuf, PreprocessError> {
    let image = imagefile::load(input)?;
    tracing::debug!(
        input = %input.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Decoded image"
    );

    let result = Pipeline::new(variant).process(image)?;
    let output = imagefile::output_path(input)?;
    imagefile::save_png(&result.image, &output)?;

    tracing::info!(
        variant = variant.as_str(),
        output = %output.display(),
        rotated = result.rotated,
        "Preprocessed in {}ms",
        result.total_time_ms
    );

    Ok(output)
}
