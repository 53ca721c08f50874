use {
    crate::*,
    std::path::PathBuf,
    tokio::time::{Interval, MissedTickBehavior, interval},
    video::{Camera, CameraHandle, VideoError, VideoFrame},
};

/// Where a capture session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Opening,
    WarmingUp,
    Capturing,
    Sleeping,
}

/// How a capture session ended.
#[derive(Debug)]
pub enum TerminalState {
    /// The frame limit was reached.
    Completed,
    /// The operator asked to stop. Not an error.
    StoppedByUser,
    Failed(CaptureError),
}

impl TerminalState {
    pub fn is_success(&self) -> bool {
        !matches!(self, TerminalState::Failed(_))
    }
}

#[derive(Debug)]
pub struct CaptureOutcome {
    pub frames_written: u64,
    pub terminal_state: TerminalState,
    pub output_dir: PathBuf,
}

struct CaptureLoop<'a> {
    config: &'a CaptureConfig,
    stop: &'a StopToken,
    state: CaptureState,
    frames_written: u64,
    missed_grabs: u64,
}

impl<'a> CaptureLoop<'a> {
    fn enter(&mut self, state: CaptureState) {
        if self.state != state {
            log::debug!("capture: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    async fn run<C: Camera>(&mut self, camera: C) -> TerminalState {
        self.enter(CaptureState::Opening);
        // dropping the handle releases the camera, whichever way we leave
        let mut handle = match CameraHandle::open(camera).await {
            Ok(handle) => handle,
            Err(error) => return TerminalState::Failed(CaptureError::CameraUnavailable(error)),
        };

        self.enter(CaptureState::WarmingUp);
        if !self.warm_up(&mut handle).await {
            return TerminalState::StoppedByUser;
        }

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.capture_frames(&mut handle, &mut ticker).await
    }

    // Race the grab against `stop`. None means a stop was requested and the
    // pending grab was dropped.
    async fn grab<C: Camera>(
        &self,
        handle: &mut CameraHandle<C>,
    ) -> Option<Result<VideoFrame, VideoError>> {
        tokio::select! {
            biased;
            _ = self.stop.stopped() => None,
            result = handle.capture() => Some(result),
        }
    }

    // Discard frames while auto-exposure and white balance settle. Returns
    // false if a stop was requested.
    async fn warm_up<C: Camera>(&mut self, handle: &mut CameraHandle<C>) -> bool {
        let count = self.config.warmup_frames;
        if count > 0 {
            log::info!("discarding {} warm-up frames from {}", count, handle.info().name);
        }
        for attempt in 1..=count {
            match self.grab(handle).await {
                None => return false,
                Some(Ok(_)) => {}
                Some(Err(error)) => log::warn!(
                    "warm-up frame {}/{}: {}",
                    attempt,
                    count,
                    CaptureError::FrameGrab(error)
                ),
            }
        }
        !self.stop.is_stopped()
    }

    async fn capture_frames<C: Camera>(
        &mut self,
        handle: &mut CameraHandle<C>,
        ticker: &mut Interval,
    ) -> TerminalState {
        loop {
            self.enter(CaptureState::Sleeping);
            tokio::select! {
                biased;
                _ = self.stop.stopped() => return TerminalState::StoppedByUser,
                _ = ticker.tick() => {}
            }

            self.enter(CaptureState::Capturing);
            let frame = match self.grab(handle).await {
                None => return TerminalState::StoppedByUser,
                Some(Ok(frame)) => {
                    self.missed_grabs = 0;
                    frame
                }
                Some(Err(error)) => {
                    self.missed_grabs += 1;
                    log::warn!(
                        "{} ({} in a row), retrying at the next tick",
                        CaptureError::FrameGrab(error),
                        self.missed_grabs
                    );
                    continue;
                }
            };

            if self.stop.is_stopped() {
                return TerminalState::StoppedByUser;
            }

            let captured_at = frame.captured_at;
            let jpeg = match frame.image.into_jpeg(self.config.jpeg_quality) {
                Ok(jpeg) => jpeg,
                Err(error) => {
                    log::warn!("{}, skipping this tick", CaptureError::from(error));
                    continue;
                }
            };

            let index = self.frames_written + 1;
            match FRAME_PATTERN.write_frame(&self.config.output_dir, index, &jpeg) {
                Ok(path) => log::info!(
                    "saved {} ({:?} after grab)",
                    path.display(),
                    captured_at.elapsed().unwrap_or_default()
                ),
                Err(error) => return TerminalState::Failed(error),
            }
            self.frames_written = index;

            if self.config.limit > 0 && self.frames_written == self.config.limit {
                return TerminalState::Completed;
            }
            if self.stop.is_stopped() {
                return TerminalState::StoppedByUser;
            }
        }
    }
}

/// Run one capture session.
///
/// Opens `camera`, discards the warm-up frames, then saves one frame per
/// interval into `config.output_dir` until the limit is reached, `stop` is
/// requested, or a frame cannot be written. The camera is released before
/// this returns.
pub async fn run<C: Camera>(config: &CaptureConfig, camera: C, stop: &StopToken) -> CaptureOutcome {
    match FRAME_PATTERN.saved_indices(&config.output_dir) {
        Ok(indices) if !indices.is_empty() => log::warn!(
            "{} already holds {} frames, the lowest ones will be overwritten",
            config.output_dir.display(),
            indices.len()
        ),
        Ok(_) => {}
        Err(error) => log::warn!("cannot list {}: {}", config.output_dir.display(), error),
    }

    let mut capture = CaptureLoop {
        config,
        stop,
        state: CaptureState::Idle,
        frames_written: 0,
        missed_grabs: 0,
    };
    let terminal_state = capture.run(camera).await;

    match &terminal_state {
        TerminalState::Completed => log::info!("capture completed: {} frames", capture.frames_written),
        TerminalState::StoppedByUser => {
            log::info!("capture stopped by user after {} frames", capture.frames_written)
        }
        TerminalState::Failed(error) => log::error!(
            "capture failed after {} frames: {}",
            capture.frames_written,
            error
        ),
    }

    CaptureOutcome {
        frames_written: capture.frames_written,
        terminal_state,
        output_dir: config.output_dir.clone(),
    }
}
