//! Headless match runner: scripted heroes against the built-in monster AI.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use wargame_core::chebyshev;
use wargame_lib::{DirStore, Game, GameConfig, GameStatus, Intent, Phase};

/// Play a wargame match without a UI
#[derive(Parser, Debug)]
#[command(name = "wargame-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many rounds
    #[arg(short, long, default_value = "200")]
    max_rounds: u32,

    /// Save the final state to slot 0 of this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    let mut game = Game::new_game(cfg)?;
    while game.status() == GameStatus::InProgress && game.turn() <= args.max_rounds {
        play_heroes(&mut game);
        if !finish_monster_phase(&mut game) {
            warn!("monster phase did not finish, stopping");
            break;
        }
    }

    match game.status() {
        GameStatus::Victory => info!("heroes win on round {}", game.turn()),
        GameStatus::Defeat => info!("monsters win on round {}", game.turn()),
        GameStatus::InProgress => info!("no winner after {} rounds", args.max_rounds),
    }
    for entry in game.history().entries() {
        println!("{entry}");
    }

    if let Some(dir) = &args.save_dir {
        let mut store = DirStore::new(dir);
        game.save_to(&mut store, 0)?;
        info!("saved to {}", store.path(0).display());
    }
    Ok(())
}

/// Give every idle hero one scripted action, then end the hero phase.
fn play_heroes(game: &mut Game) {
    for slot in 0..game.heroes().len() {
        if game.phase() != Phase::Heroes {
            return;
        }
        let hero = &game.heroes()[slot];
        let Some(pos) = hero.pos() else { continue };
        if hero.is_dead() || hero.has_acted() {
            continue;
        }
        let intent = choose(game, slot);
        if !(game.handle(Intent::Select(pos)) && game.handle(intent)) {
            game.handle(Intent::Rest);
        }
    }
    game.handle(Intent::EndTurn);
}

/// Attack the first monster in range, otherwise step towards the nearest
/// monster, otherwise rest.
fn choose(game: &Game, slot: usize) -> Intent {
    let hero = &game.heroes()[slot];
    let Some(pos) = hero.pos() else {
        return Intent::Rest;
    };
    let living = || {
        game.monsters()
            .iter()
            .filter(|m| m.is_alive())
            .filter_map(|m| m.pos())
    };

    if let Some(target) = living().find(|&p| chebyshev(pos, p) <= hero.range()) {
        return Intent::Attack(target);
    }
    let Some(nearest) = living().min_by_key(|&p| chebyshev(pos, p)) else {
        return Intent::Rest;
    };
    pos.neighbors_8()
        .into_iter()
        .filter(|&n| game.board().is_free(n))
        .filter(|&n| chebyshev(n, nearest) < chebyshev(pos, nearest))
        .min_by_key(|&n| chebyshev(n, nearest))
        .map_or(Intent::Rest, Intent::MoveTo)
}

/// Tick until the heroes are back in control. Returns `false` if that
/// never happens within a generous budget.
fn finish_monster_phase(game: &mut Game) -> bool {
    let per_monster = game.config().pacing_ticks() as usize + 1;
    let budget = (game.monsters().len() + 1) * per_monster + 64;
    for _ in 0..budget {
        if game.phase() == Phase::Heroes {
            return true;
        }
        game.tick();
        game.take_effects();
    }
    game.phase() == Phase::Heroes
}
