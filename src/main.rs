use anyhow::Result;
use clap::Parser;
use garden_snake::game::GameConfig;
use garden_snake::modes::PlayMode;
use garden_snake::storage::{HighScoreStore, JsonFileStore, MemoryStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "garden-snake")]
#[command(version, about = "Smooth-scrolling terminal Snake")]
struct Cli {
    /// Side length of the square grid, in cells
    #[arg(long, default_value = "20")]
    dimension: usize,

    /// Starting speed in ticks per second (1-15)
    #[arg(long, default_value = "7")]
    tick_rate: u32,

    /// Number of apples on the board (1-10)
    #[arg(long, default_value = "1")]
    apples: usize,

    /// Apples drift around the board
    #[arg(long)]
    moving_apples: bool,

    /// Drifting apples chase the snake
    #[arg(long)]
    attract_apples: bool,

    /// No wall or self collisions; walls wrap around
    #[arg(long)]
    invincible: bool,

    /// Persist the high score to this JSON file
    #[arg(long)]
    high_score_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Out-of-range values are clamped by the game itself.
    let config = GameConfig {
        grid_dimension: cli.dimension,
        tick_rate: cli.tick_rate,
        apple_count: cli.apples,
        moving_apples: cli.moving_apples,
        attract_apples: cli.attract_apples,
        invincible: cli.invincible,
    };

    let store: Box<dyn HighScoreStore> = match cli.high_score_file {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::<MemoryStore>::default(),
    };

    let mut play_mode = PlayMode::new(config, store);
    play_mode.run().await
}
