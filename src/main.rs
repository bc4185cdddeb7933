//! # Ladybug Isles Main Entry Point
//!
//! Parses flags, loads configuration and the saved session, then hands
//! control to the macroquad scene loop.

use clap::Parser;
use ladybug_isles::{
    load_session_or_default, FileSaveStore, GameConfig, InputHandler, IslesResult, SaveStore,
    SceneManager,
};
use log::info;
use macroquad::prelude::*;
use std::path::PathBuf;

/// Command line arguments for Ladybug Isles.
#[derive(Parser, Debug)]
#[command(name = "ladybug-isles")]
#[command(about = "A small top-down island exploration and crafting game")]
#[command(version)]
struct Args {
    /// Added to every island seed to paint different coastlines
    #[arg(long)]
    seed_offset: Option<u32>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to keep the save file
    #[arg(long)]
    save_file: Option<PathBuf>,

    /// Play without loading or writing a save file
    #[arg(long)]
    no_save: bool,

    /// Enable Vi-style hjkl movement
    #[arg(long)]
    vi_keys: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Builds the runtime configuration: file first, then flag overrides.
    fn game_config(&self) -> IslesResult<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(offset) = self.seed_offset {
            config.seed_offset = offset;
        }
        if let Some(path) = &self.save_file {
            config.save_path = Some(path.clone());
        }
        if self.no_save {
            config.save_path = None;
        }
        config.validate()?;
        Ok(config)
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Ladybug Isles".to_owned(),
        window_width: 1024,
        window_height: 768,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> IslesResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Ladybug Isles v{}", ladybug_isles::VERSION);

    let config = args.game_config()?;
    let store: Option<Box<dyn SaveStore>> = config
        .save_path
        .as_ref()
        .map(|path| Box::new(FileSaveStore::new(path.clone())) as Box<dyn SaveStore>);

    let session = match &store {
        Some(store) => load_session_or_default(&config, store.as_ref())?,
        None => ladybug_isles::GameSession::new(&config)?,
    };
    info!("Starting on {}", session.island().name);

    let mut input_handler = InputHandler::new();
    input_handler.vi_keys_enabled = args.vi_keys;

    let mut scenes = SceneManager::new(session, input_handler, store, config.autosave_secs);
    scenes.run().await
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG` still wins when it is set.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init();
    }
}
