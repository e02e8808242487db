use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use decknav::core::config::{self, CliOverrides};
use decknav::core::deck::Deck;
use decknav::tui::{self, Outcome};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "decknav", about = "Full-page section navigation for the terminal")]
struct Args {
    /// Deck file to open (defaults to the configured deck, then the built-in one)
    #[arg(short, long)]
    deck: Option<PathBuf>,

    /// Start unlocked, without the intro
    #[arg(long)]
    no_splash: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to decknav.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create("decknav.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        Default::default()
    });
    let mut resolved = config::resolve(
        &file_config,
        &CliOverrides {
            deck: args.deck,
            no_splash: args.no_splash,
        },
    );

    log::info!("decknav starting up with deck: {:?}", resolved.deck_path);

    let mut deck_path = resolved.deck_path.clone();
    loop {
        let deck = match &deck_path {
            Some(path) => Deck::load(path)?,
            None => Deck::builtin(),
        };
        match tui::run(&deck, deck_path.as_deref(), &resolved)? {
            Outcome::Quit => return Ok(()),
            Outcome::Follow(next) => {
                // The intro plays once per session.
                resolved.wait_for_splash = false;
                deck_path = Some(next);
            }
        }
    }
}
