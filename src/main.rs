use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use ezplayer::engine::HeadlessEngine;
use ezplayer::player::JsonSessionStore;
use ezplayer::utils;
use ezplayer::window::{ShellApp, ShellEvent};
use log::{debug, info, warn};
use std::path::PathBuf;
use winit::event_loop::EventLoop;

/// EZPlayer - a minimalist media player shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media file(s) to play
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Start in fullscreen mode
    #[arg(short, long)]
    fullscreen: bool,

    /// Set initial volume (0-100)
    #[arg(short, long, value_name = "VOLUME", value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Do not resume the last session when play is pressed
    #[arg(long)]
    no_resume: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration before logging so its level can be honoured
    let config = utils::load_config();

    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config
            .as_ref()
            .map(|c| c.general.log_level.clone())
            .unwrap_or_else(|_| "info".to_string())
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting EZPlayer v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config.context("Failed to load configuration")?;
    if let Some(volume) = args.volume {
        config.player.initial_volume = volume as f64;
    }
    if args.fullscreen {
        config.window.fullscreen = true;
    }
    if args.no_resume {
        config.player.resume_last_session = false;
    }
    debug!("Configuration: {:?}", config);

    // Engine clock runs on the tokio runtime; its events are forwarded to
    // the UI thread through the event loop proxy.
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (engine, engine_events) = HeadlessEngine::new(&config.engine);
    let clock = engine.clock().spawn(runtime.handle(), config.engine.tick());

    let event_loop = EventLoop::<ShellEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;
    let proxy = event_loop.create_proxy();
    std::thread::Builder::new()
        .name("engine-events".to_string())
        .spawn(move || {
            for event in engine_events.iter() {
                if proxy.send_event(ShellEvent::Engine(event)).is_err() {
                    debug!("Event loop closed; engine event forwarding stopped");
                    break;
                }
            }
        })
        .context("Failed to start engine event forwarding")?;

    let mut app = ShellApp::new(config, Box::new(engine)).with_files(args.files);
    match JsonSessionStore::default_location() {
        Ok(store) => {
            debug!("Session record at {:?}", store.path());
            app = app.with_store(Box::new(store));
        }
        Err(e) => warn!("Session persistence disabled: {}", e),
    }

    event_loop.run_app(&mut app).context("Event loop error")?;

    clock.abort();
    info!("EZPlayer exited");
    Ok(())
}
