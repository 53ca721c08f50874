use {
    crate::*,
    image::{Image, PixelFormat, Size},
    std::path::PathBuf,
    tokio::task::spawn_blocking,
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// number of mmap buffers queued in the driver
const STREAM_BUFFERS: u32 = 4;

// default device when none is configured
const DEFAULT_DEVICE: &str = "/dev/video0";

/// V4L2 camera.
///
/// Prefers MJPG so frames can be written without re-encoding, falls back to YUYV.
pub struct V4l2Camera {
    settings: CameraSettings,
    stream: Option<MmapStream<'static>>,
    size: Size,
    format: PixelFormat,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("settings", &self.settings)
            .field("stream", &self.stream.is_some())
            .field("size", &self.size)
            .field("format", &self.format)
            .finish()
    }
}

impl V4l2Camera {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            stream: None,
            size: Size::default(),
            format: PixelFormat::Jpeg,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.settings
            .device
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE))
    }

    fn negotiate_format(&self, device: &Device) -> Result<(Size, PixelFormat), VideoError> {
        let current = Capture::format(device)?;
        let size = self.settings.size.unwrap_or(Size::new(
            current.width as usize,
            current.height as usize,
        ));

        for fourcc in [FourCC::new(b"MJPG"), FourCC::new(b"YUYV")] {
            let actual = Capture::set_format(
                device,
                &Format::new(size.width as u32, size.height as u32, fourcc),
            )?;
            let format = match &actual.fourcc.repr {
                b"MJPG" => PixelFormat::Jpeg,
                b"YUYV" => PixelFormat::Yuyv,
                _ => continue,
            };
            return Ok((
                Size::new(actual.width as usize, actual.height as usize),
                format,
            ));
        }

        Err(VideoError::Unsupported(format!(
            "device offers neither MJPG nor YUYV (current format {})",
            current.fourcc
        )))
    }
}

impl Camera for V4l2Camera {
    async fn open(&mut self) -> Result<CameraInfo, VideoError> {
        self.stream.take();

        let path = self.path();
        let device = Device::with_path(&path)?;
        let (size, format) = self.negotiate_format(&device)?;

        let params = Capture::params(&device)?;
        let frame_rate = params.interval.denominator as f32 / params.interval.numerator.max(1) as f32;

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, STREAM_BUFFERS)
            .map_err(|error| VideoError::Stream(error.to_string()))?;

        self.stream = Some(stream);
        self.size = size;
        self.format = format;

        Ok(CameraInfo {
            name: path.display().to_string(),
            size,
            format,
            frame_rate,
        })
    }

    async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        let mut stream = self.stream.take().ok_or(VideoError::NotOpen)?;
        let (size, format) = (self.size, self.format);

        // If this future is dropped mid-dequeue the stream stays with the
        // blocking task and the camera reads as closed afterwards.
        // Between two timelapse ticks the driver fills every queued buffer with
        // frames that are now old. Dequeue those and keep the one after them.
        let (stream, result) = spawn_blocking(move || {
            let mut latest = Err(VideoError::Stream("no frame dequeued".to_string()));
            for _ in 0..=STREAM_BUFFERS {
                latest = match CaptureStream::next(&mut stream) {
                    Ok((data, metadata)) => {
                        let used = (metadata.bytesused as usize).min(data.len());
                        let used = if used == 0 { data.len() } else { used };
                        Ok(data[..used].to_vec())
                    }
                    Err(error) => Err(VideoError::Stream(error.to_string())),
                };
                if latest.is_err() {
                    break;
                }
            }
            (stream, latest)
        })
        .await
        .map_err(|error| VideoError::Stream(format!("capture task failed: {}", error)))?;

        self.stream = Some(stream);
        let data = result?;
        Ok(VideoFrame::new(Image::new(size, data, format)))
    }

    fn close(&mut self) {
        self.stream.take();
    }
}
