use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image data: {0}")]
    InvalidData(String),
    #[error("encode error: {0}")]
    Encode(String),
}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Encode(err.to_string())
    }
}
