//! Battle simulator demo
//!
//! Runs one wild encounter between two generated participants, confirming
//! every prompt automatically and printing the narration as it appears.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pokemon_battle_sim::battle::input::LogicalKey;
use pokemon_battle_sim::{
    generate_pokemon, BattleConfig, BattleController, BattleEngineError, InteractiveLayer, ResourceStore, SeededRng,
};

/// Pokemon battle simulator demo
#[derive(Parser, Debug)]
#[command(name = "pokemon-battle-sim")]
#[command(author, version, about = "Simulate a wild encounter", long_about = None)]
struct Args {
    /// Species of the player's participant
    #[arg(long = "player", default_value = "Pikachu")]
    player_species: String,

    /// Level of the player's participant
    #[arg(long = "player-level", default_value_t = 8)]
    player_level: u32,

    /// Species of the wild participant
    #[arg(long = "wild", default_value = "Rattata")]
    wild_species: String,

    /// Level of the wild participant
    #[arg(long = "wild-level", default_value_t = 6)]
    wild_level: u32,

    /// RNG seed; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Battle config file (RON)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory holding moves.ron and species.ron; embedded data when omitted
    #[arg(short = 'd', long = "data")]
    data: Option<PathBuf>,

    /// Milliseconds per simulated frame
    #[arg(short = 't', long = "tick-ms", default_value_t = 16)]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), BattleEngineError> {
    let args = Args::parse();

    let store = match &args.data {
        Some(path) => std::sync::Arc::new(ResourceStore::load_dir(path)?),
        None => ResourceStore::builtin(),
    };
    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => SeededRng::from_seed(seed),
        None => SeededRng::from_entropy(),
    };

    let player = generate_pokemon(&store, &args.player_species, args.player_level, &mut rng)?;
    let wild = generate_pokemon(&store, &args.wild_species, args.wild_level, &mut rng)?;
    println!("{} (Lv. {}) vs wild {} (Lv. {})", player.name, player.level, wild.name, wild.level);

    let controller = BattleController::new(vec![player], vec![wild], store)
        .with_config(config)
        .with_rng(rng);
    let mut layer = InteractiveLayer::new(controller);
    layer.start()?;

    let frame_ms = args.tick_ms.max(1);
    let mut interval = tokio::time::interval(Duration::from_millis(frame_ms));
    let mut printed = 0;

    while !layer.is_over() {
        interval.tick().await;
        if layer.is_prompting() {
            layer.press(LogicalKey::Confirm);
        }
        layer.tick(frame_ms as f32);

        let narration = layer.narration();
        for line in narration.lines_since(printed) {
            println!("{}", line);
        }
        printed = narration.transcript().len();
    }

    println!("Encounter over: {:?}", layer.encounter());
    Ok(())
}
