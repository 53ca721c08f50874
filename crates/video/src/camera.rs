use {
    crate::*,
    image::{PixelFormat, Size},
    std::path::PathBuf,
};

/// What the backend should try to open. Unset fields use the device defaults.
#[derive(Debug, Clone, Default)]
pub struct CameraSettings {
    pub device: Option<PathBuf>,
    pub size: Option<Size>,
}

/// What the device actually agreed to after opening.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub name: String,
    pub size: Size,
    pub format: PixelFormat,
    pub frame_rate: f32,
}

/// A camera backend.
///
/// `open` is called once before any `capture`, and `close` once after the
/// last one. Use [`CameraHandle`] rather than calling these directly.
#[allow(async_fn_in_trait)]
pub trait Camera {
    async fn open(&mut self) -> Result<CameraInfo, VideoError>;
    async fn capture(&mut self) -> Result<VideoFrame, VideoError>;
    fn close(&mut self);
}

/// An opened camera. The device is closed exactly once, when the handle drops.
pub struct CameraHandle<C: Camera> {
    camera: C,
    info: CameraInfo,
}

impl<C: Camera> CameraHandle<C> {
    pub async fn open(mut camera: C) -> Result<Self, VideoError> {
        let info = camera.open().await?;
        log::info!(
            "camera {} opened: {} {:?} @ {} fps",
            info.name,
            info.size,
            info.format,
            info.frame_rate
        );
        Ok(Self { camera, info })
    }

    pub fn info(&self) -> &CameraInfo {
        &self.info
    }

    pub async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        self.camera.capture().await
    }
}

impl<C: Camera> Drop for CameraHandle<C> {
    fn drop(&mut self) {
        self.camera.close();
        log::info!("camera {} released", self.info.name);
    }
}
