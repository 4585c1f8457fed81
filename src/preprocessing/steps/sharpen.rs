use crate::error::PreprocessError;
use image::{DynamicImage, GrayImage};
use imageproc::filter::filter3x3;

/// Unity-gain high-pass emphasis: center 5, four neighbors -1, corners 0
pub const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Sharpen with a 3x3 Laplacian kernel
/// Output stays 8-bit, values saturate at 0 and 255
pub fn apply(image: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    let gray = image.to_luma8();
    let sharpened: GrayImage = filter3x3(&gray, &SHARPEN_KERNEL);
    Ok(DynamicImage::ImageLuma8(sharpened))
}
