use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, Level};

use crt_overlay::{
    config::{EffectConfig, EffectOptions, FlickerOptions},
    effect::{BlurCapability, EffectContext, EffectRegistry, ImageBlur, SharedBlur},
    schedule::{FramePacer, PlaybackEvent, FALLBACK_FRAME_INTERVAL},
    video::{BufferSurface, TestPatternSource},
};

#[derive(Parser)]
#[command(
    name = "crt-overlay",
    version,
    about = "Render the blur/flicker overlay against a synthetic video source",
    long_about = "Drives the overlay pipeline headlessly: plays a test pattern through \
the blur, flicker and border stages, walks the playback state machine \
(play, pause, seek) and saves the final presented frame."
)]
struct Cli {
    /// Effect configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of animated frames to play before pausing
    #[arg(short = 'n', long, default_value_t = 120)]
    frames: u64,

    /// Path for the final presented frame (PNG)
    #[arg(short, long, default_value = "overlay.png")]
    output: PathBuf,

    /// Surface width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Configuration used when no file is given: flicker and borders on
fn demo_config() -> EffectConfig {
    EffectConfig {
        effect: "blur".to_string(),
        source: "test-pattern".to_string(),
        surface: "framebuffer".to_string(),
        options: EffectOptions {
            radius: Some(4.0),
            borders: Some(true),
            flicker: Some(FlickerOptions::default()),
            ..EffectOptions::default()
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting crt-overlay v{}", env!("CARGO_PKG_VERSION"));

    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            EffectConfig::from_file(&config_path)?
        }
        None => {
            info!("Using demo configuration");
            demo_config()
        }
    };

    // the host's job: resolve the config's identifiers to live objects
    info!(
        "Source \"{}\" -> test pattern, surface \"{}\" -> {}x{} framebuffer",
        config.source, config.surface, cli.width, cli.height
    );
    let (source, control) = TestPatternSource::new();
    let (surface, screen) = BufferSurface::new(cli.width, cli.height);

    // the blur capability loads in the background, like a script tag;
    // early frames render unblurred until it resolves
    let blur = SharedBlur::unresolved();
    let loader = blur.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        loader
            .load(async { Ok(Arc::new(ImageBlur) as Arc<dyn BlurCapability>) })
            .await;
    });

    let registry = EffectRegistry::new();
    let instance = registry.build(
        &config.effect,
        EffectContext {
            source: Box::new(source),
            surface: Box::new(surface),
            blur,
            options: config.options.clone(),
        },
    )?;

    let params = instance.params.clone();
    info!("Effect constructed: {:?}", params.snapshot());

    let (events, events_rx) = mpsc::channel(16);
    let driver = tokio::spawn(instance.scheduler.run(FramePacer::interval(), events_rx));

    // play for the requested number of frames
    control.set_paused(false);
    events.send(PlaybackEvent::Play).await?;
    tokio::time::sleep(FALLBACK_FRAME_INTERVAL * cli.frames as u32).await;

    // nudge the live parameters mid-run, the way a controller would
    params.update(|p| p.flicker.strength = 0.8);
    tokio::time::sleep(FALLBACK_FRAME_INTERVAL * 30).await;

    // pause, then seek: exactly one single-shot redraw
    control.set_paused(true);
    tokio::time::sleep(FALLBACK_FRAME_INTERVAL * 4).await;
    events.send(PlaybackEvent::Seeking).await?;
    events.send(PlaybackEvent::Seeked).await?;
    tokio::time::sleep(FALLBACK_FRAME_INTERVAL * 4).await;

    // teardown: no further events
    drop(events);
    let scheduler = driver.await?;

    info!(
        "Presented {} frames, final state {:?}, flicker phase {}",
        screen.frames_presented(),
        scheduler.state(),
        scheduler.pipeline().phase()
    );

    match screen.last_frame() {
        Some(frame) => {
            frame.save_png(&cli.output)?;
            info!("Final frame saved to {:?}", cli.output);
        }
        None => info!("No frame was ever presented"),
    }

    Ok(())
}
