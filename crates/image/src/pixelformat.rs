use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// packed 8-bit RGB, 3 bytes per pixel
    Rgb8,
    /// packed YUV 4:2:2 as `Y0 U Y1 V`, 2 bytes per pixel
    Yuyv,
    /// complete JPEG file
    Jpeg,
}

impl PixelFormat {
    /// Number of bytes a raw frame of `size` occupies, `None` for compressed formats.
    pub fn frame_len(&self, size: Size) -> Option<usize> {
        match self {
            PixelFormat::Rgb8 => Some(size.pixel_count() * 3),
            PixelFormat::Yuyv => Some(size.pixel_count() * 2),
            PixelFormat::Jpeg => None,
        }
    }

    pub(crate) fn check_len(&self, size: Size, len: usize) -> Result<(), ImageError> {
        match self.frame_len(size) {
            Some(expected) if len < expected => Err(ImageError::InvalidData(format!(
                "{:?} frame of {} needs {} bytes, got {}",
                self, size, expected, len
            ))),
            _ => Ok(()),
        }
    }
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}
