use {
    crate::*,
    std::{
        ffi::OsString,
        fs,
        io,
        path::{Path, PathBuf},
    },
    tokio::process::Command,
};

/// One request to turn a frame sequence into a video.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    /// printf-style path of the input frames, e.g. `out/image_%05d.jpg`
    pub input_pattern: PathBuf,
    pub fps: f64,
    /// Number of frames in the sequence, the encoder reads no further.
    pub frames: u64,
    pub output: PathBuf,
}

/// Something that can encode a frame sequence. Blocks the caller until done.
#[allow(async_fn_in_trait)]
pub trait Encoder {
    async fn encode(&self, job: &EncodeJob) -> Result<(), CompileError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    Compiled { video: PathBuf },
    /// The session saved no frames, the encoder was not run.
    NothingToCompile,
}

/// Runs ffmpeg as a subprocess, H.264 in yuv420p.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    settings: EncoderSettings,
}

impl FfmpegEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    /// Command line passed to the encoder program.
    pub fn args(&self, job: &EncodeJob) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-framerate".into(),
            job.fps.to_string().into(),
            "-i".into(),
            job.input_pattern.clone().into(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-crf".into(),
            self.settings.crf.to_string().into(),
            "-preset".into(),
            self.settings.preset.clone().into(),
            "-frames:v".into(),
            job.frames.to_string().into(),
            job.output.clone().into(),
        ]
    }

    fn not_found(&self) -> CompileError {
        CompileError::EncoderNotFound {
            program: self.settings.program.clone(),
        }
    }
}

fn log_output(stream: &str, bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        log::debug!("ffmpeg {}: {}", stream, line);
    }
}

impl Encoder for FfmpegEncoder {
    async fn encode(&self, job: &EncodeJob) -> Result<(), CompileError> {
        let program = which::which(&self.settings.program).map_err(|_| self.not_found())?;
        let args = self.args(job);
        log::info!(
            "running {} {}",
            program.display(),
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = match Command::new(&program).args(&args).output().await {
            Ok(output) => output,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Err(self.not_found()),
            Err(error) => return Err(CompileError::Io(error)),
        };
        log_output("stdout", &output.stdout);
        log_output("stderr", &output.stderr);

        if !output.status.success() {
            return Err(CompileError::EncodeFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Compile the frames of a finished session into `config.video_filename`.
///
/// Frames are never deleted, whether encoding succeeds or not.
pub async fn compile<E: Encoder>(
    config: &CaptureConfig,
    outcome: &CaptureOutcome,
    encoder: &E,
) -> Result<CompileOutcome, CompileError> {
    if outcome.frames_written == 0 {
        log::info!("no frames were saved, nothing to compile");
        return Ok(CompileOutcome::NothingToCompile);
    }

    let video = outcome.output_dir.join(&config.video_filename);
    ensure_parent(&video)?;

    let job = EncodeJob {
        input_pattern: outcome.output_dir.join(FRAME_PATTERN.encoder_pattern()),
        fps: config.fps,
        frames: outcome.frames_written,
        output: video.clone(),
    };
    log::info!(
        "compiling {} frames from {} at {} fps",
        outcome.frames_written,
        job.input_pattern.display(),
        job.fps
    );
    encoder.encode(&job).await?;
    log::info!("video written to {}", video.display());

    Ok(CompileOutcome::Compiled { video })
}
