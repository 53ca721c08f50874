use {crate::*, crates_image::ImageEncoder};

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Encode packed RGB as JPEG. `quality` is 1-100, higher is better.
pub fn rgb_to_jpeg(size: Size, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    PixelFormat::Rgb8.check_len(size, data.len())?;
    let mut buffer = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
        &data[..size.pixel_count() * 3],
        size.width as u32,
        size.height as u32,
        crates_image::ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}

impl Image {
    /// Turn the image into JPEG file bytes.
    ///
    /// JPEG images are passed through untouched after a start-of-image check,
    /// raw formats are encoded with `quality`.
    pub fn into_jpeg(self, quality: u8) -> Result<Vec<u8>, ImageError> {
        match self.format {
            PixelFormat::Jpeg => {
                if !self.data.starts_with(&JPEG_SOI) {
                    return Err(ImageError::InvalidData(
                        "JPEG frame does not start with SOI marker".to_string(),
                    ));
                }
                Ok(self.data)
            }
            PixelFormat::Rgb8 => rgb_to_jpeg(self.size, &self.data, quality),
            PixelFormat::Yuyv => {
                let rgb = yuyv_to_rgb(self.size, &self.data)?;
                rgb_to_jpeg(self.size, &rgb, quality)
            }
        }
    }
}
