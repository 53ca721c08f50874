use {
    std::time::Duration,
    timelapse::{CaptureConfig, ConfigError, DEFAULT_WARMUP_FRAMES, FRAME_PATTERN},
};

fn parse(dir: &std::path::Path, extra: &[&str]) -> Result<CaptureConfig, ConfigError> {
    let mut args = vec![
        "timelapse".to_string(),
        "--output".to_string(),
        dir.display().to_string(),
    ];
    args.extend(extra.iter().map(|arg| arg.to_string()));
    CaptureConfig::from_args(args)
}

#[test]
fn test_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = parse(dir.path(), &[]).unwrap();

    assert_eq!(config.interval, Duration::from_secs(5));
    assert_eq!(config.output_dir, dir.path());
    assert_eq!(config.limit, 0);
    assert!(!config.compile_video);
    assert_eq!(config.fps, 24.0);
    assert_eq!(config.video_filename, "timelapse.mp4");
    assert_eq!(config.warmup_frames, DEFAULT_WARMUP_FRAMES);
    assert_eq!(config.jpeg_quality, 90);
    assert_eq!(config.encoder.crf, 23);
    assert_eq!(config.encoder.preset, "medium");
}

#[test]
fn test_short_and_long_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = parse(
        dir.path(),
        &[
            "-i",
            "0.5",
            "-l",
            "120",
            "--compile-video",
            "--fps",
            "30",
            "--video-filename",
            "garden.mp4",
            "--device",
            "/dev/video2",
            "--resolution",
            "1280x720",
        ],
    )
    .unwrap();

    assert_eq!(config.interval, Duration::from_millis(500));
    assert_eq!(config.limit, 120);
    assert!(config.compile_video);
    assert_eq!(config.fps, 30.0);
    assert_eq!(config.video_path(), dir.path().join("garden.mp4"));
    let camera = config.camera_settings();
    assert_eq!(camera.device.unwrap().to_str(), Some("/dev/video2"));
    assert_eq!(camera.size, Some(image::Size::new(1280, 720)));
}

#[test]
fn test_rejects_non_positive_interval() {
    let dir = tempfile::tempdir().unwrap();
    for interval in ["0", "-5", "NaN", "inf"] {
        assert!(
            matches!(
                parse(dir.path(), &["--interval", interval]),
                Err(ConfigError::InvalidInterval(_))
            ),
            "interval {}",
            interval
        );
    }
}

#[test]
fn test_rejects_negative_limit() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        parse(dir.path(), &["--limit", "-1"]),
        Err(ConfigError::NegativeLimit(-1))
    ));
}

#[test]
fn test_rejects_non_positive_fps() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        parse(dir.path(), &["--fps", "0"]),
        Err(ConfigError::InvalidFps(_))
    ));
}

#[test]
fn test_rejects_bad_video_filename() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        parse(dir.path(), &["--video-filename", ""]),
        Err(ConfigError::EmptyVideoFilename)
    ));
    assert!(matches!(
        parse(dir.path(), &["--video-filename", "/tmp/out.mp4"]),
        Err(ConfigError::AbsoluteVideoFilename(_))
    ));
}

#[test]
fn test_rejects_out_of_range_encoding_settings() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        parse(dir.path(), &["--quality", "0"]),
        Err(ConfigError::InvalidQuality(0))
    ));
    assert!(matches!(
        parse(dir.path(), &["--crf", "60"]),
        Err(ConfigError::InvalidCrf(60))
    ));
    assert!(matches!(
        parse(dir.path(), &["--resolution", "wide"]),
        Err(ConfigError::InvalidResolution(_))
    ));
}

#[test]
fn test_unparseable_number_is_argument_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        parse(dir.path(), &["--limit", "lots"]),
        Err(ConfigError::Arguments(_))
    ));
}

#[test]
fn test_creates_output_dir_idempotently() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("a").join("b");

    parse(&dir, &[]).unwrap();
    assert!(dir.is_dir());
    parse(&dir, &[]).unwrap();
    assert!(dir.is_dir());
    // the writability probe leaves nothing behind
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn test_output_path_that_is_a_file_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("not-a-dir");
    std::fs::write(&file, b"x").unwrap();

    assert!(matches!(
        parse(&file, &[]),
        Err(ConfigError::CreateOutputDir { .. })
    ));
}

#[test]
fn test_output_dir_with_earlier_frames_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for index in 1..=5 {
        std::fs::write(FRAME_PATTERN.path(dir.path(), index), b"old").unwrap();
    }

    match parse(dir.path(), &[]) {
        Err(ConfigError::OutputDirHasFrames { path, count }) => {
            assert_eq!(path, dir.path());
            assert_eq!(count, 5);
        }
        other => panic!("expected OutputDirHasFrames, got {:?}", other),
    }
    // nothing is touched
    assert_eq!(FRAME_PATTERN.saved_indices(dir.path()).unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_output_dir_with_unrelated_files_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"sunrise").unwrap();
    std::fs::write(dir.path().join("timelapse.mp4"), b"").unwrap();

    assert!(parse(dir.path(), &[]).is_ok());
}
