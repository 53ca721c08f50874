use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("device error: {0}")]
    Device(String),
    #[error("stream error: {0}")]
    Stream(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("camera is not open")]
    NotOpen,
}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}
