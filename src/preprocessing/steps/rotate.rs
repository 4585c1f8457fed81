use crate::error::PreprocessError;
use image::DynamicImage;

/// Portrait correction: turn tall images 90 degrees clockwise so the long
/// axis runs horizontally. Works on the full color image.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    if is_portrait(&image) {
        Ok(image.rotate90())
    } else {
        Ok(image)
    }
}

pub fn is_portrait(image: &DynamicImage) -> bool {
    image.height() > image.width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_rotate_turns_portrait_to_landscape() {
        let img = RgbImage::new(30, 80);
        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.width(), 80);
        assert_eq!(result.height(), 30);
        assert!(result.width() >= result.height());
    }

    #[test]
    fn test_rotate_is_clockwise() {
        // Top-left corner marked red; after a clockwise turn it sits top-right
        let mut img = RgbImage::new(2, 4);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));

        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        let rgb = result.to_rgb8();

        assert_eq!(rgb.get_pixel(3, 0), &Rgb([255, 0, 0]));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_rotate_leaves_landscape_and_square_alone() {
        let landscape = apply(DynamicImage::ImageRgb8(RgbImage::new(80, 30))).unwrap();
        assert_eq!((landscape.width(), landscape.height()), (80, 30));

        let square = apply(DynamicImage::ImageRgb8(RgbImage::new(40, 40))).unwrap();
        assert_eq!((square.width(), square.height()), (40, 40));
    }

    #[test]
    fn test_rotate_keeps_color_channels() {
        let img = RgbImage::new(10, 20);
        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.color(), image::ColorType::Rgb8);
    }
}
