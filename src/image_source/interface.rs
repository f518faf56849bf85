use crate::error::AnalyzeError;
use image::{DynamicImage, GenericImageView};
use std::fmt;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// A decoded bitmap as handed over by the user. Cloning shares the pixels.
#[derive(Clone)]
pub struct RawImage {
    image: Arc<DynamicImage>,
}

impl RawImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AnalyzeError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image))
    }

    pub fn open(path: &Path) -> Result<Self, AnalyzeError> {
        let bytes = std::fs::read(path).map_err(|e| {
            AnalyzeError::Preprocessing(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::decode(&bytes)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl fmt::Debug for RawImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "RawImage({}x{}, {:?})", width, height, self.image.color())
    }
}

impl PartialEq for RawImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSelection {
    Selected(RawImage),
    /// The user picked something that could not be decoded.
    Rejected(AnalyzeError),
    /// The picker was dismissed without a choice.
    Cancelled,
}

impl ImageSelection {
    pub fn from_path(path: &Path) -> Self {
        match RawImage::open(path) {
            Ok(image) => ImageSelection::Selected(image),
            Err(error) => ImageSelection::Rejected(error),
        }
    }
}

pub trait ImageSource: Send + Sync {
    /// Stream of user selections. The receiver disconnects once the source
    /// has nothing more to offer.
    fn selections(&self) -> Receiver<ImageSelection>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_decode_rejects_garbage() {
        let result = RawImage::decode(&[0, 1, 2, 3, 4, 5]);

        assert!(matches!(result, Err(AnalyzeError::Preprocessing(_))));
    }

    #[test]
    fn test_decode_png() {
        let img = ImageBuffer::from_pixel(8, 4, Rgb([10u8, 20, 30]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();

        let raw = RawImage::decode(bytes.get_ref()).unwrap();

        assert_eq!(raw.dimensions(), (8, 4));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let selection = ImageSelection::from_path(Path::new("/definitely/not/here.jpg"));

        assert!(matches!(
            selection,
            ImageSelection::Rejected(AnalyzeError::Preprocessing(_))
        ));
    }
}
