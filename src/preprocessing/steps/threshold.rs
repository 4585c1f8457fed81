use crate::error::PreprocessError;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::stats::histogram;

/// Neighborhood size for adaptive mean thresholding
pub const ADAPTIVE_BLOCK_SIZE: u32 = 15;
/// Subtracted from the local mean before comparing
pub const ADAPTIVE_OFFSET: i32 = 10;

/// Global binarization at the Otsu level
/// Pixels above the level become 255, the rest 0
pub fn otsu(image: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    let gray = image.to_luma8();
    let level = otsu_level(&histogram(&gray).channels[0]);
    tracing::debug!(level, "Otsu threshold");

    Ok(DynamicImage::ImageLuma8(binarize_above(gray, level)))
}

/// Adaptive mean thresholding
/// Each pixel is compared against the mean of its neighborhood minus an offset,
/// which tolerates uneven lighting across the page
pub fn adaptive_mean(image: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    let gray = image.to_luma8();
    let binarized = adaptive_mean_threshold(&gray, ADAPTIVE_BLOCK_SIZE, ADAPTIVE_OFFSET);
    Ok(DynamicImage::ImageLuma8(binarized))
}

/// Level maximizing the between-class variance `q1 * q2 * (mu1 - mu2)^2`
///
/// Accumulates in f64 so page-sized histograms cannot overflow. The first
/// maximum wins; a histogram with a single populated bin yields 0.
fn otsu_level(bins: &[u32; 256]) -> u8 {
    let total: u64 = bins.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }

    let scale = 1.0 / total as f64;
    let mu: f64 = bins
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum::<f64>()
        * scale;

    let (mut q1, mut mu1) = (0.0f64, 0.0f64);
    let (mut max_sigma, mut level) = (0.0f64, 0u8);

    for (i, &count) in bins.iter().enumerate() {
        let p_i = count as f64 * scale;
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;

        if q1.min(q2) < f32::EPSILON as f64 || q1.max(q2) > 1.0 - f32::EPSILON as f64 {
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            level = i as u8;
        }
    }

    level
}

fn binarize_above(mut gray: GrayImage, level: u8) -> GrayImage {
    for pixel in gray.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { 255 } else { 0 };
    }
    gray
}

/// For each pixel, threshold = round(mean of block) - offset
///
/// The window always covers `block_size`x`block_size` samples; positions that
/// fall outside the image repeat the nearest edge pixel.
fn adaptive_mean_threshold(img: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    let radius = block_size / 2;
    let area = (block_size as u64) * (block_size as u64);

    let integral = PaddedIntegral::new(img, radius);

    GrayImage::from_fn(width, height, |x, y| {
        // Padded coordinates: the window for (x, y) starts at (x, y)
        let sum = integral.window_sum(x, y, block_size);
        let mean = ((sum + area / 2) / area) as i32;

        let pixel = img.get_pixel(x, y).0[0] as i32;
        if pixel > mean - offset {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Integral image over the input extended by `radius` replicated pixels on
/// every side
struct PaddedIntegral {
    stride: usize,
    sums: Vec<u64>,
}

impl PaddedIntegral {
    fn new(img: &GrayImage, radius: u32) -> Self {
        let (width, height) = img.dimensions();
        let padded_w = (width + 2 * radius) as usize;
        let padded_h = (height + 2 * radius) as usize;
        let stride = padded_w + 1;
        let mut sums = vec![0u64; stride * (padded_h + 1)];

        let max_x = width as i64 - 1;
        let max_y = height as i64 - 1;

        for py in 0..padded_h {
            let sy = (py as i64 - radius as i64).clamp(0, max_y) as u32;
            let mut row_sum = 0u64;
            for px in 0..padded_w {
                let sx = (px as i64 - radius as i64).clamp(0, max_x) as u32;
                row_sum += img.get_pixel(sx, sy).0[0] as u64;
                sums[(py + 1) * stride + px + 1] = sums[py * stride + px + 1] + row_sum;
            }
        }

        Self { stride, sums }
    }

    fn window_sum(&self, x: u32, y: u32, size: u32) -> u64 {
        let (x1, y1) = (x as usize, y as usize);
        let (x2, y2) = (x1 + size as usize, y1 + size as usize);
        let at = |x: usize, y: usize| self.sums[y * self.stride + x];

        at(x2, y2) + at(x1, y1) - at(x1, y2) - at(x2, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_binary(img: &GrayImage) {
        for pixel in img.pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_otsu_separates_two_populations() {
        // Dark text block on a light page
        let img = GrayImage::from_fn(40, 40, |x, y| {
            if (10..20).contains(&x) && (10..20).contains(&y) {
                Luma([30])
            } else {
                Luma([220])
            }
        });

        let result = otsu(DynamicImage::ImageLuma8(img)).unwrap();
        let gray = result.to_luma8();

        assert_binary(&gray);
        assert_eq!(gray.get_pixel(15, 15).0[0], 0);
        assert_eq!(gray.get_pixel(30, 30).0[0], 255);
    }

    #[test]
    fn test_otsu_level_between_populations() {
        let mut bins = [0u32; 256];
        bins[40] = 500;
        bins[200] = 1500;
        let level = otsu_level(&bins);
        assert!((40..200).contains(&level), "level {}", level);
    }

    #[test]
    fn test_otsu_level_of_single_bin_is_zero() {
        let mut bins = [0u32; 256];
        bins[255] = u32::MAX;
        assert_eq!(otsu_level(&bins), 0);
        assert_eq!(otsu_level(&[0u32; 256]), 0);
    }

    #[test]
    fn test_otsu_handles_large_white_page() {
        // 17MP of a single intensity
        let img = GrayImage::from_pixel(5000, 3400, Luma([255]));
        let result = otsu(DynamicImage::ImageLuma8(img)).unwrap();
        let gray = result.to_luma8();

        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(4999, 3399).0[0], 255);
    }

    #[test]
    fn test_otsu_handles_large_page_with_text() {
        let img = GrayImage::from_fn(5000, 3400, |x, y| {
            if y % 100 < 10 && x % 50 < 30 {
                Luma([20])
            } else {
                Luma([245])
            }
        });
        let result = otsu(DynamicImage::ImageLuma8(img)).unwrap();
        let gray = result.to_luma8();

        assert_eq!(gray.get_pixel(10, 5).0[0], 0);
        assert_eq!(gray.get_pixel(10, 50).0[0], 255);
    }

    #[test]
    fn test_otsu_binarizes_gradient() {
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x as u8 * 5).min(255)]));
        let result = otsu(DynamicImage::ImageLuma8(img)).unwrap();
        assert_binary(&result.to_luma8());
    }

    #[test]
    fn test_adaptive_binarizes_gradient() {
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x as u8 * 5).min(255)]));
        let result = adaptive_mean(DynamicImage::ImageLuma8(img)).unwrap();
        assert_binary(&result.to_luma8());
    }

    #[test]
    fn test_adaptive_handles_text_pattern() {
        let mut img = GrayImage::from_pixel(50, 20, Luma([240]));
        for x in 10..40 {
            img.put_pixel(x, 10, Luma([20])); // dark stroke
        }

        let result = adaptive_mean(DynamicImage::ImageLuma8(img)).unwrap();
        let gray = result.to_luma8();

        assert_eq!(gray.get_pixel(25, 10).0[0], 0);
        assert_eq!(gray.get_pixel(25, 5).0[0], 255);
    }

    #[test]
    fn test_adaptive_uniform_image_is_white() {
        // pixel == mean, and mean - offset < pixel
        let img = GrayImage::from_pixel(30, 30, Luma([90]));
        let result = adaptive_mean(DynamicImage::ImageLuma8(img)).unwrap();
        assert!(result.to_luma8().pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_adaptive_tolerates_uneven_lighting() {
        // Stroke is darker than its surroundings on both halves, but the right
        // half background is darker than the left half stroke
        let mut img = GrayImage::from_fn(60, 30, |x, _| {
            if x < 30 {
                Luma([230])
            } else {
                Luma([110])
            }
        });
        for x in 5..55 {
            img.put_pixel(x, 15, Luma(if x < 30 { [150] } else { [40] }));
        }

        let result = adaptive_mean(DynamicImage::ImageLuma8(img)).unwrap();
        let gray = result.to_luma8();

        assert_eq!(gray.get_pixel(10, 15).0[0], 0);
        assert_eq!(gray.get_pixel(50, 15).0[0], 0);
        assert_eq!(gray.get_pixel(10, 3).0[0], 255);
        assert_eq!(gray.get_pixel(50, 3).0[0], 255);
    }

    #[test]
    fn test_window_sum_replicates_edges() {
        let img = GrayImage::from_fn(3, 3, |x, y| Luma([(y * 3 + x) as u8]));
        let integral = PaddedIntegral::new(&img, 1);

        // Window around (0, 0) sees rows [0,0,1] and cols [0,0,1]
        // values: 0 0 1 / 0 0 1 / 3 3 4
        assert_eq!(integral.window_sum(0, 0, 3), 12);
        // Window around the center covers the whole image
        assert_eq!(integral.window_sum(1, 1, 3), (0..9).sum::<u64>());
    }
}
