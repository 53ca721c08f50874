use crate::*;

/// Convert packed YUYV to packed RGB.
pub fn yuyv_to_rgb(size: Size, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    PixelFormat::Yuyv.check_len(size, data.len())?;
    let mut rgb = Vec::with_capacity(size.pixel_count() * 3);
    for chunk in data[..size.pixel_count() * 2].chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }
    Ok(rgb)
}
