use crate::config::InputSize;
use crate::error::AnalyzeError;
use image::{Rgba, RgbaImage};
use std::fmt;

pub const BYTES_PER_PIXEL: usize = 4;

/// Fixed-size 32-bit ARGB pixel buffer, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedBuffer {
    size: InputSize,
    argb: Vec<u8>,
}

impl PreparedBuffer {
    pub fn from_rgba(image: &RgbaImage) -> Result<Self, AnalyzeError> {
        let size = InputSize::new(image.width(), image.height());
        let len = size
            .pixel_count()
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| AnalyzeError::Preprocessing(format!("buffer for {} overflows", size)))?;

        let mut argb = Vec::new();
        argb.try_reserve_exact(len).map_err(|e| {
            AnalyzeError::Preprocessing(format!("cannot allocate {} byte buffer: {}", len, e))
        })?;

        for Rgba([r, g, b, a]) in image.pixels() {
            argb.extend_from_slice(&[*a, *r, *g, *b]);
        }

        Ok(Self { size, argb })
    }

    pub fn size(&self) -> InputSize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.argb
    }

    /// `[a, r, g, b]` at the given position.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let offset = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.argb[offset..offset + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.size.width, self.size.height, |x, y| {
            let [a, r, g, b] = self.pixel(x, y).unwrap_or_default();
            Rgba([r, g, b, a])
        })
    }
}

impl fmt::Debug for PreparedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedBuffer")
            .field("size", &self.size)
            .field("bytes", &self.argb.len())
            .finish()
    }
}
