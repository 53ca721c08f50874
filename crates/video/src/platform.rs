use crate::*;

/// Operating system family, as far as camera backends care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Unsupported(String),
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Classify an OS name (`std::env::consts::OS` style, `darwin` and `linux2` accepted).
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "darwin" => Platform::MacOs,
            os if os.starts_with("linux") => Platform::Linux,
            other => Platform::Unsupported(other.to_string()),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Unsupported(os) => write!(f, "unsupported ({})", os),
        }
    }
}

/// The camera backend for the platform this binary runs on.
pub enum SystemCamera {
    #[cfg(all(feature = "v4l2", target_os = "linux"))]
    V4l2(V4l2Camera),
    Unavailable(String),
}

impl SystemCamera {
    pub fn new(platform: &Platform, settings: CameraSettings) -> Self {
        match platform {
            #[cfg(all(feature = "v4l2", target_os = "linux"))]
            Platform::Linux => SystemCamera::V4l2(V4l2Camera::new(settings)),
            other => {
                let _ = settings;
                SystemCamera::Unavailable(format!("no camera backend for {}", other))
            }
        }
    }
}

impl Camera for SystemCamera {
    async fn open(&mut self) -> Result<CameraInfo, VideoError> {
        match self {
            #[cfg(all(feature = "v4l2", target_os = "linux"))]
            SystemCamera::V4l2(camera) => camera.open().await,
            SystemCamera::Unavailable(reason) => Err(VideoError::Unsupported(reason.clone())),
        }
    }

    async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        match self {
            #[cfg(all(feature = "v4l2", target_os = "linux"))]
            SystemCamera::V4l2(camera) => camera.capture().await,
            SystemCamera::Unavailable(_) => Err(VideoError::NotOpen),
        }
    }

    fn close(&mut self) {
        match self {
            #[cfg(all(feature = "v4l2", target_os = "linux"))]
            SystemCamera::V4l2(camera) => camera.close(),
            SystemCamera::Unavailable(_) => {}
        }
    }
}
