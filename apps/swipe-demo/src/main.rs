//! Headless SwipeDeck demo.
//!
//! Loads a deck (the bundled dog cards unless `--deck` is given), replays a
//! script of swipes against it frame by frame and logs what would be painted.

mod deck;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::deck::DeckFile;
use crate::session::SwipeStep;

#[derive(Parser, Debug)]
#[command(
    name = "swipe-demo",
    version,
    about = "Replays a scripted swipe session against a SwipeDeck card stack"
)]
struct Cli {
    /// Deck file: `{"config": {...}, "cards": [{"id", "img", "desc"}]}`
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Swipe to play, as `DX` or `DX@VX` (px, px/s); repeatable
    #[arg(long = "swipe", value_name = "DX[@VX]", allow_hyphen_values = true)]
    swipes: Vec<SwipeStep>,

    /// Log the render list every N frames (0 disables)
    #[arg(long, default_value_t = 8)]
    log_every: usize,

    /// Print the session report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let deck = match &cli.deck {
        Some(path) => DeckFile::load(path)?,
        None => DeckFile::builtin(),
    };
    log::info!("deck has {} cards", deck.cards.len());

    let steps = if cli.swipes.is_empty() {
        SwipeStep::default_script()
    } else {
        cli.swipes
    };
    let report = session::run(deck, &steps, cli.log_every)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
