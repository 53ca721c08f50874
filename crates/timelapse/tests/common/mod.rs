#![allow(dead_code)]

use {
    image::{Image, PixelFormat, Size},
    std::{
        collections::VecDeque,
        path::{Path, PathBuf},
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    timelapse::{CaptureConfig, CompileError, EncodeJob, Encoder, EncoderSettings, StopToken},
    video::{Camera, CameraInfo, VideoError, VideoFrame},
};

/// What the scripted camera does on one `capture()` call.
pub enum Shot {
    Frame,
    Fail,
    /// Request a stop, then deliver a frame.
    Stop(StopToken),
    /// Put a directory where this path's frame would go, then deliver a frame.
    Block(PathBuf),
    /// Deliver a JPEG frame without a start-of-image marker.
    Corrupt,
    /// Never deliver, like a camera that stopped streaming.
    Hang,
}

#[derive(Default)]
pub struct CameraStats {
    pub opens: AtomicUsize,
    pub captures: AtomicUsize,
    pub closes: AtomicUsize,
}

impl CameraStats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Camera that follows a script, then delivers frames forever.
pub struct FakeCamera {
    pub fail_open: bool,
    script: VecDeque<Shot>,
    stats: Arc<CameraStats>,
}

impl FakeCamera {
    pub fn new() -> (Self, Arc<CameraStats>) {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<Shot>) -> (Self, Arc<CameraStats>) {
        let stats = Arc::new(CameraStats::default());
        (
            Self {
                fail_open: false,
                script: script.into(),
                stats: Arc::clone(&stats),
            },
            stats,
        )
    }

    pub fn unavailable() -> (Self, Arc<CameraStats>) {
        let (mut camera, stats) = Self::new();
        camera.fail_open = true;
        (camera, stats)
    }
}

fn frame() -> VideoFrame {
    let size = Size::new(4, 4);
    VideoFrame::new(Image::new(
        size,
        (0..size.pixel_count() * 3).map(|v| v as u8).collect(),
        PixelFormat::Rgb8,
    ))
}

impl Camera for FakeCamera {
    async fn open(&mut self) -> Result<CameraInfo, VideoError> {
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(VideoError::Device("/dev/video9: no such device".to_string()));
        }
        Ok(CameraInfo {
            name: "fake".to_string(),
            size: Size::new(4, 4),
            format: PixelFormat::Rgb8,
            frame_rate: 30.0,
        })
    }

    async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        self.stats.captures.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front().unwrap_or(Shot::Frame) {
            Shot::Frame => Ok(frame()),
            Shot::Fail => Err(VideoError::Stream("timeout dequeuing buffer".to_string())),
            Shot::Stop(stop) => {
                stop.stop();
                Ok(frame())
            }
            Shot::Block(path) => {
                std::fs::create_dir_all(&path).unwrap();
                Ok(frame())
            }
            Shot::Corrupt => Ok(VideoFrame::new(Image::new(
                Size::new(4, 4),
                vec![0x00, 0x11, 0x22, 0x33],
                PixelFormat::Jpeg,
            ))),
            Shot::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(frame())
            }
        }
    }

    fn close(&mut self) {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Encoder that records jobs instead of running anything.
#[derive(Default)]
pub struct FakeEncoder {
    pub jobs: Mutex<Vec<EncodeJob>>,
    pub fail: bool,
}

impl FakeEncoder {
    pub fn jobs(&self) -> Vec<EncodeJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl Encoder for FakeEncoder {
    async fn encode(&self, job: &EncodeJob) -> Result<(), CompileError> {
        self.jobs.lock().unwrap().push(job.clone());
        if self.fail {
            return Err(CompileError::Io(std::io::Error::other("fake encoder failure")));
        }
        Ok(())
    }
}

pub fn config(dir: &Path, interval_secs: u64, limit: u64) -> CaptureConfig {
    CaptureConfig {
        interval: Duration::from_secs(interval_secs),
        output_dir: dir.to_path_buf(),
        limit,
        compile_video: true,
        fps: 24.0,
        video_filename: "timelapse.mp4".to_string(),
        device: None,
        resolution: None,
        warmup_frames: 0,
        jpeg_quality: 90,
        encoder: EncoderSettings::default(),
    }
}

/// Every regular file in `dir`, sorted by name.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
