use {
    crate::*,
    clap::Parser,
    image::Size,
    std::{
        ffi::OsString,
        fs::{self, File},
        path::{Path, PathBuf},
        time::Duration,
    },
    video::CameraSettings,
};

pub const DEFAULT_INTERVAL_SECONDS: f64 = 5.0;
pub const DEFAULT_OUTPUT_DIR: &str = "timelapse";
pub const DEFAULT_FPS: f64 = 24.0;
pub const DEFAULT_VIDEO_FILENAME: &str = "timelapse.mp4";
pub const DEFAULT_WARMUP_FRAMES: u32 = 10;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const DEFAULT_CRF: u8 = 23;
pub const DEFAULT_PRESET: &str = "medium";
pub const DEFAULT_ENCODER: &str = "ffmpeg";

/// Capture still frames at a fixed interval and optionally turn them into a video.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Seconds between captures.
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECONDS, allow_negative_numbers = true)]
    pub interval: f64,
    /// Directory the frames (and the video) are written to.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
    /// Stop after this many frames, 0 captures until interrupted.
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub limit: i64,
    /// Compile the frames into a video when capture ends.
    #[arg(long)]
    pub compile_video: bool,
    /// Frame rate of the compiled video.
    #[arg(long, default_value_t = DEFAULT_FPS, allow_negative_numbers = true)]
    pub fps: f64,
    /// File name of the compiled video, relative to the output directory.
    #[arg(long, default_value = DEFAULT_VIDEO_FILENAME)]
    pub video_filename: String,
    /// Camera device, e.g. /dev/video1.
    #[arg(short, long)]
    pub device: Option<PathBuf>,
    /// Requested resolution, e.g. 1920x1080.
    #[arg(long)]
    pub resolution: Option<String>,
    /// Frames discarded after opening the camera while exposure settles.
    #[arg(long, default_value_t = DEFAULT_WARMUP_FRAMES)]
    pub warmup_frames: u32,
    /// JPEG quality used when the camera delivers raw frames.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub quality: u8,
    /// x264 constant rate factor.
    #[arg(long, default_value_t = DEFAULT_CRF)]
    pub crf: u8,
    /// x264 preset.
    #[arg(long, default_value = DEFAULT_PRESET)]
    pub preset: String,
    /// Encoder program.
    #[arg(long, default_value = DEFAULT_ENCODER)]
    pub ffmpeg: PathBuf,
    /// Also write logs to date-named files in this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub program: PathBuf,
    pub crf: u8,
    pub preset: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_ENCODER),
            crf: DEFAULT_CRF,
            preset: DEFAULT_PRESET.to_string(),
        }
    }
}

/// Validated settings for one capture session.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub interval: Duration,
    pub output_dir: PathBuf,
    pub limit: u64,
    pub compile_video: bool,
    pub fps: f64,
    pub video_filename: String,
    pub device: Option<PathBuf>,
    pub resolution: Option<Size>,
    pub warmup_frames: u32,
    pub jpeg_quality: u8,
    pub encoder: EncoderSettings,
}

fn parse_resolution(text: &str) -> Result<Size, ConfigError> {
    let invalid = || ConfigError::InvalidResolution(text.to_string());
    let (width, height) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: usize = width.trim().parse().map_err(|_| invalid())?;
    let height: usize = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok(Size::new(width, height))
}

/// Create `dir` if needed, prove a file can be created in it and make sure
/// no frames from an earlier session are left in it.
pub fn prepare_output_dir(dir: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(dir).map_err(|source| ConfigError::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let probe = dir.join(format!(".timelapse-probe-{}", std::process::id()));
    File::create(&probe)
        .and_then(|_| fs::remove_file(&probe))
        .map_err(|source| ConfigError::OutputDirNotWritable {
            path: dir.to_path_buf(),
            source,
        })?;
    let saved = FRAME_PATTERN
        .saved_indices(dir)
        .map_err(|source| ConfigError::ListOutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
    if !saved.is_empty() {
        return Err(ConfigError::OutputDirHasFrames {
            path: dir.to_path_buf(),
            count: saved.len(),
        });
    }
    Ok(())
}

impl CaptureConfig {
    /// Parse and validate raw arguments (the first one is the program name).
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_cli(&Cli::try_parse_from(args)?)
    }

    /// Validate parsed arguments. Creates the output directory as a side effect.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if !cli.interval.is_finite() || cli.interval <= 0.0 {
            return Err(ConfigError::InvalidInterval(cli.interval));
        }
        let interval = Duration::try_from_secs_f64(cli.interval)
            .ok()
            .filter(|interval| !interval.is_zero())
            .ok_or(ConfigError::InvalidInterval(cli.interval))?;
        if cli.limit < 0 {
            return Err(ConfigError::NegativeLimit(cli.limit));
        }
        if !cli.fps.is_finite() || cli.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(cli.fps));
        }
        if cli.video_filename.trim().is_empty() {
            return Err(ConfigError::EmptyVideoFilename);
        }
        if Path::new(&cli.video_filename).is_absolute() {
            return Err(ConfigError::AbsoluteVideoFilename(cli.video_filename.clone()));
        }
        if !(1..=100).contains(&cli.quality) {
            return Err(ConfigError::InvalidQuality(cli.quality));
        }
        if cli.crf > 51 {
            return Err(ConfigError::InvalidCrf(cli.crf));
        }
        let resolution = cli.resolution.as_deref().map(parse_resolution).transpose()?;

        prepare_output_dir(&cli.output)?;

        Ok(Self {
            interval,
            output_dir: cli.output.clone(),
            limit: cli.limit as u64,
            compile_video: cli.compile_video,
            fps: cli.fps,
            video_filename: cli.video_filename.clone(),
            device: cli.device.clone(),
            resolution,
            warmup_frames: cli.warmup_frames,
            jpeg_quality: cli.quality,
            encoder: EncoderSettings {
                program: cli.ffmpeg.clone(),
                crf: cli.crf,
                preset: cli.preset.clone(),
            },
        })
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            device: self.device.clone(),
            size: self.resolution,
        }
    }

    /// Where the compiled video goes.
    pub fn video_path(&self) -> PathBuf {
        self.output_dir.join(&self.video_filename)
    }
}
