use {
    anyhow::{Context, Result},
    clap::Parser,
    log::LevelFilter,
    std::process::ExitCode,
    timelapse::*,
    video::{Platform, SystemCamera},
};

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match &cli.log_dir {
        Some(dir) => {
            if let Err(error) = base::init_file_logger(dir, level) {
                base::init_stdout_logger(level);
                log::warn!("cannot log to {}: {}", dir.display(), error);
            }
        }
        None => base::init_stdout_logger(level),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CaptureConfig::from_cli(&cli).context("invalid configuration")?;

    let platform = Platform::detect();
    log::info!("platform: {}", platform);
    if let Platform::Unsupported(os) = &platform {
        anyhow::bail!("unsupported operating system {:?}", os);
    }

    let stop = StopToken::new();
    tokio::spawn({
        let stop = stop.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            log::info!("stop requested, interrupt again to exit at once");
            stop.stop();
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("interrupted twice, exiting without cleanup");
                std::process::exit(130);
            }
        }
    });

    log::info!(
        "capturing every {:?} into {} ({})",
        config.interval,
        config.output_dir.display(),
        match config.limit {
            0 => "until interrupted".to_string(),
            limit => format!("{} frames", limit),
        }
    );
    let camera = SystemCamera::new(&platform, config.camera_settings());
    let outcome = capture::run(&config, camera, &stop).await;

    if let TerminalState::Failed(error) = &outcome.terminal_state {
        log::error!(
            "{} frames kept in {}",
            outcome.frames_written,
            outcome.output_dir.display()
        );
        anyhow::bail!("capture failed: {}", error);
    }

    if config.compile_video {
        let encoder = FfmpegEncoder::new(config.encoder.clone());
        compile(&config, &outcome, &encoder)
            .await
            .context("video compilation failed, frames were kept")?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}
