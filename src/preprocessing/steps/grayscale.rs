use crate::error::PreprocessError;
use image::{DynamicImage, GrayImage, Luma};

// BT.601 weights in 14-bit fixed point: 0.299, 0.587, 0.114
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;

/// Convert image to single channel 8-bit grayscale using BT.601 luma
/// Alpha is dropped, 8-bit gray input passes through untouched
pub fn apply(image: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    if let DynamicImage::ImageLuma8(gray) = image {
        return Ok(DynamicImage::ImageLuma8(gray));
    }

    let rgb = image.into_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    });

    Ok(DynamicImage::ImageLuma8(gray))
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    ((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8
}
