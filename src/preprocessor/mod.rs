pub mod prepared_buffer;

use crate::config::InputSize;
use crate::error::AnalyzeError;
use crate::image_source::interface::RawImage;
use image::imageops::FilterType;
use prepared_buffer::PreparedBuffer;

/// Stretches the image to exactly `size` and renders it as ARGB.
pub fn preprocess(raw: &RawImage, size: InputSize) -> Result<PreparedBuffer, AnalyzeError> {
    let (width, height) = raw.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalyzeError::Preprocessing(format!(
            "source image is empty ({}x{})",
            width, height
        )));
    }
    if size.is_empty() {
        return Err(AnalyzeError::Preprocessing(format!(
            "target size is empty ({})",
            size
        )));
    }

    let resized = raw
        .image()
        .resize_exact(size.width, size.height, FilterType::Triangle)
        .to_rgba8();

    PreparedBuffer::from_rgba(&resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb, Rgba};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RawImage {
        RawImage::new(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
            width,
            height,
            Rgb(color),
        )))
    }

    #[test]
    fn test_output_has_target_dimensions() {
        let size = InputSize::new(224, 224);

        for (width, height) in [(1, 1), (100, 100), (1024, 37), (37, 1024)] {
            let buffer = preprocess(&solid(width, height, [1, 2, 3]), size).unwrap();
            assert_eq!(buffer.size(), size);
            assert_eq!(buffer.as_bytes().len(), 224 * 224 * 4);
        }
    }

    #[test]
    fn test_aspect_ratio_is_not_preserved() {
        // A wide image fills the whole square target, no letterbox.
        let buffer = preprocess(&solid(400, 100, [255, 0, 0]), InputSize::new(50, 50)).unwrap();

        for y in [0, 25, 49] {
            for x in [0, 25, 49] {
                assert_eq!(buffer.pixel(x, y), Some([255, 255, 0, 0]));
            }
        }
    }

    #[test]
    fn test_non_square_target() {
        let buffer = preprocess(&solid(10, 10, [9, 9, 9]), InputSize::new(299, 150)).unwrap();

        assert_eq!(buffer.size(), InputSize::new(299, 150));
        assert_eq!(buffer.as_bytes().len(), 299 * 150 * 4);
    }

    #[test]
    fn test_alpha_is_carried_into_argb() {
        let image = ImageBuffer::from_pixel(4, 4, Rgba([10u8, 20, 30, 128]));
        let raw = RawImage::new(DynamicImage::ImageRgba8(image));

        let buffer = preprocess(&raw, InputSize::new(2, 2)).unwrap();

        assert_eq!(buffer.pixel(0, 0), Some([128, 10, 20, 30]));
    }

    #[test]
    fn test_zero_size_source_fails() {
        let raw = RawImage::new(DynamicImage::new_rgb8(0, 0));

        let result = preprocess(&raw, InputSize::new(224, 224));

        assert!(matches!(result, Err(AnalyzeError::Preprocessing(_))));
    }

    #[test]
    fn test_zero_size_target_fails() {
        let result = preprocess(&solid(10, 10, [0, 0, 0]), InputSize::new(0, 224));

        assert!(matches!(result, Err(AnalyzeError::Preprocessing(_))));
    }

    #[test]
    fn test_repeated_preprocessing_is_identical() {
        let raw = RawImage::new(DynamicImage::ImageRgb8(ImageBuffer::from_fn(
            64,
            48,
            |x, y| Rgb([x as u8 * 3, y as u8 * 5, (x + y) as u8]),
        )));

        let a = preprocess(&raw, InputSize::new(32, 32)).unwrap();
        let b = preprocess(&raw, InputSize::new(32, 32)).unwrap();

        assert_eq!(a, b);
    }
}
