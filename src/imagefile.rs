//! Reading input images and writing preprocessed PNGs

use crate::error::PreprocessError;
use image::{DynamicImage, GrayImage, ImageDecoder, ImageFormat, ImageReader};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix that replaces the input extension
pub const OUTPUT_SUFFIX: &str = "_preprocessed.png";

/// Decode an image, detecting the format from the file content
///
/// EXIF orientation is applied, so phone photos come out upright.
pub fn load(path: &Path) -> Result<DynamicImage, PreprocessError> {
    let decode_err = |source| PreprocessError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;

    let mut decoder = reader.into_decoder().map_err(decode_err)?;
    let orientation = decoder.orientation().map_err(decode_err)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

    tracing::debug!(?orientation, "Applying stored orientation");
    image.apply_orientation(orientation);
    Ok(image)
}

/// `dir/name.ext` -> `dir/name_preprocessed.png`
pub fn output_path(input: &Path) -> Result<PathBuf, PreprocessError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| PreprocessError::InvalidPath(input.to_path_buf()))?;

    let mut name = OsString::from(stem);
    name.push(OUTPUT_SUFFIX);
    Ok(input.with_file_name(name))
}

/// Write an 8-bit single channel PNG
pub fn save_png(image: &GrayImage, path: &Path) -> Result<(), PreprocessError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| PreprocessError::Encode {
            path: path.to_path_buf(),
            source,
        })
}
