use crate::error::PreprocessError;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Gaussian smoothing with a square `kernel_size` kernel
/// Sigma is derived from the kernel size
///
/// Both passes accumulate in f32 and the result is rounded to nearest once.
/// Borders reflect without repeating the edge pixel (`dcb|abcd|cba`).
pub fn apply(image: DynamicImage, kernel_size: usize) -> Result<DynamicImage, PreprocessError> {
    let gray = image.to_luma8();
    let kernel = gaussian_kernel(kernel_size);

    let blurred = round_to_gray(&convolve_separable(&gray, &kernel));
    Ok(DynamicImage::ImageLuma8(blurred))
}

fn convolve_separable(gray: &GrayImage, kernel: &[f32]) -> FloatImage {
    let (width, height) = gray.dimensions();
    let radius = (kernel.len() / 2) as i64;

    let horizontal = FloatImage::from_fn(width, height, |x, y| {
        let sum = kernel.iter().enumerate().fold(0.0, |acc, (k, w)| {
            let sx = reflect_101(x as i64 + k as i64 - radius, width);
            acc + w * gray.get_pixel(sx, y).0[0] as f32
        });
        Luma([sum])
    });

    FloatImage::from_fn(width, height, |x, y| {
        let sum = kernel.iter().enumerate().fold(0.0, |acc, (k, w)| {
            let sy = reflect_101(y as i64 + k as i64 - radius, height);
            acc + w * horizontal.get_pixel(x, sy).0[0]
        });
        Luma([sum])
    })
}

fn round_to_gray(image: &FloatImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y).0[0].round().clamp(0.0, 255.0) as u8])
    })
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
fn reflect_101(mut i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    // Wide kernels on tiny images can need more than one bounce
    while i < 0 || i >= len {
        i = if i < 0 { -i } else { 2 * len - 2 - i };
    }
    i as u32
}

/// Normalized 1D Gaussian kernel for an odd size
///
/// Small sizes use the fixed binomial weights, larger ones sample a Gaussian
/// with `sigma = 0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(size: usize) -> Vec<f32> {
    match size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![
            0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
        ],
        _ => sampled_kernel(size),
    }
}

fn sampled_kernel(size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size as f64 - 1.0) / 2.0;
    let scale = -0.5 / (sigma * sigma);

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();

    weights.iter().map(|w| (w / total) as f32).collect()
}
