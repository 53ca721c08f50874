use {
    image::ImageError,
    std::{io, path::PathBuf, process::ExitStatus},
    thiserror::Error,
    video::VideoError,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),
    #[error("limit must not be negative, got {0}")]
    NegativeLimit(i64),
    #[error("fps must be a positive number, got {0}")]
    InvalidFps(f64),
    #[error("video filename must not be empty")]
    EmptyVideoFilename,
    #[error("video filename must be relative to the output directory, got {0:?}")]
    AbsoluteVideoFilename(String),
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
    #[error("crf must be between 0 and 51, got {0}")]
    InvalidCrf(u8),
    #[error("resolution must look like 1920x1080, got {0:?}")]
    InvalidResolution(String),
    #[error("cannot create output directory {path:?}: {source}")]
    CreateOutputDir { path: PathBuf, source: io::Error },
    #[error("output directory {path:?} is not writable: {source}")]
    OutputDirNotWritable { path: PathBuf, source: io::Error },
    #[error("cannot list output directory {path:?}: {source}")]
    ListOutputDir { path: PathBuf, source: io::Error },
    #[error("output directory {path:?} already holds {count} frames, remove them or pick another directory")]
    OutputDirHasFrames { path: PathBuf, count: usize },
    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(VideoError),
    #[error("frame grab failed: {0}")]
    FrameGrab(VideoError),
    #[error("frame could not be encoded: {0}")]
    Encode(#[from] ImageError),
    #[error("cannot write frame {path:?}: {source}")]
    Persist { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("encoder {program:?} not found, install ffmpeg (e.g. 'sudo apt install ffmpeg' or 'brew install ffmpeg')")]
    EncoderNotFound { program: PathBuf },
    #[error("encoder exited with {status}: {stderr}")]
    EncodeFailed { status: ExitStatus, stderr: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}
