use crate::error::PreprocessError;
use image::DynamicImage;
use imageproc::filter::median_filter;

/// Radius 1 in both directions gives a 3x3 window
const MEDIAN_RADIUS: u32 = 1;

/// Median filter to remove impulse noise left behind by sharpening
pub fn apply(image: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    let gray = image.to_luma8();
    let denoised = median_filter(&gray, MEDIAN_RADIUS, MEDIAN_RADIUS);
    Ok(DynamicImage::ImageLuma8(denoised))
}
