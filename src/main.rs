use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use videoview::backend::{SimulatedBackendFactory, SimulatedMedia};
use videoview::controller::StandardController;
use videoview::player::{
    DisplayMode, FileProgressStore, OnStateChangeListener, PlaybackState, PlayerContext,
    PlayerControl, VideoSession,
};
use videoview::utils::{init_logging, load_config, string_for_time, PlayerConfig};

/// VideoView demo - plays a simulated source and logs every transition
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media locator to "play"
    #[arg(value_name = "URL", default_value = "/media/sample.mp4")]
    url: String,

    /// Simulated media duration in seconds
    #[arg(long, default_value = "10")]
    duration: u64,

    /// Playback speed
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Start in full screen
    #[arg(short, long)]
    fullscreen: bool,

    /// Treat the source as a live stream
    #[arg(long)]
    live: bool,

    /// Loop instead of completing
    #[arg(long = "loop")]
    looping: bool,

    /// Remember playback positions in this file
    #[arg(long, value_name = "FILE")]
    progress_file: Option<PathBuf>,

    /// Skip the configuration files and use defaults
    #[arg(long)]
    no_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Logs state changes as they reach the session's listeners
struct LoggingListener;

impl OnStateChangeListener for LoggingListener {
    fn on_player_state_changed(&self, mode: DisplayMode) {
        info!("display mode: {}", mode);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        info!("play state: {}", state);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = if args.no_config {
        PlayerConfig::default()
    } else {
        load_config().context("loading configuration")?
    };
    config.general.enable_log = true;
    if args.debug {
        config.general.log_level = "debug".to_string();
    }
    config.playback.looping = args.looping;
    init_logging(&config);

    info!("Starting VideoView demo v{}", env!("CARGO_PKG_VERSION"));

    let factory = SimulatedBackendFactory::new(SimulatedMedia {
        duration_ms: args.duration * 1000,
        ..SimulatedMedia::default()
    });
    let mut builder = PlayerContext::builder()
        .config(config)
        .backend_factory(Rc::new(factory.clone()));
    if let Some(path) = &args.progress_file {
        let store = FileProgressStore::open(path)
            .with_context(|| format!("opening progress file {}", path.display()))?;
        builder = builder.progress_store(Rc::new(store));
    }
    let ctx = builder.build()?;

    let session = VideoSession::new(ctx.clone());
    let standard = StandardController::new(&ctx);
    let components = standard.add_default_control_components(&args.url, args.live);
    session.set_video_controller(Some(standard.controller().clone()));
    session.add_on_state_change_listener(Rc::new(LoggingListener));
    session.set_url(args.url.clone(), HashMap::new());

    session.start();
    if args.fullscreen {
        session.start_full_screen();
    }

    let tick = Duration::from_millis(100);
    let mut interval = tokio::time::interval(tick);
    let mut duration = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        if let Some(handle) = factory.last_handle() {
            handle.advance(tick.as_millis() as u64);
        }
        ctx.looper().run_pending();

        match session.play_state() {
            PlaybackState::Playing => {
                duration = session.duration();
                if session.is_playing() && session.speed() != args.speed {
                    session.set_speed(args.speed);
                }
            }
            PlaybackState::Completed => {
                info!("finished after {}", string_for_time(duration));
                break;
            }
            PlaybackState::Error => {
                error!("playback failed");
                break;
            }
            _ => {}
        }
    }

    if let Some(vod) = &components.vod {
        info!("last progress {} / {}", vod.current_text(), vod.total_text());
    }
    session.release();
    if let Some(worker) = session.take_release_worker() {
        let _ = worker.join();
    }
    Ok(())
}
