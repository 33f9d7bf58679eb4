use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::RngCore;

use engine::prelude::*;
use util::srng;

pub const GAME_NAME: &str = "bombgrid";

/// Run rounds of the game on autopilot without a display.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, help = "Round seed, random if not given")]
    seed: Option<String>,

    #[arg(long, help = "Game config file, JSON or IDM")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1, help = "Number of rounds to run")]
    rounds: usize,

    #[arg(
        long,
        default_value_t = 300.0,
        help = "Call a round a draw after this many seconds"
    )]
    max_seconds: f32,

    #[arg(long, default_value_t = 30.0, help = "Simulation steps per second")]
    fps: f32,

    #[arg(long, help = "Print the final state of each round as JSON")]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();
    anyhow::ensure!(args.fps > 0.0, "fps must be positive");

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let seed = args
        .seed
        .clone()
        .unwrap_or_else(|| format!("{:x}", rand::thread_rng().next_u64()));
    log::info!("{GAME_NAME} seed: {seed}");

    let dt = 1.0 / args.fps;
    let mut tally = [0; 3];
    for n in 0..args.rounds {
        let round_seed = srng(&(&seed, n)).next_u64();
        let mut r = Runtime::new(config.clone(), round_seed)
            .with_context(|| format!("can't start round {n}"))?;

        while r.status() == ScenarioStatus::Ongoing
            && r.elapsed() < args.max_seconds
        {
            let input = r.autopilot_input(dt);
            r.tick(dt, input);
            for msg in r.take_messages() {
                log::debug!("{:.2}: {msg:?}", r.elapsed());
            }
        }

        let status = r.status();
        log::info!(
            "round {n}: {status:?} after {:.1} s, {} blocks left",
            r.elapsed(),
            r.terrain().count(Tile::Block)
        );
        tally[status as usize] += 1;

        if args.dump {
            println!("{}", serde_json::to_string_pretty(&r)?);
        }
    }

    let [draws, wins, losses] = tally;
    log::info!("{wins} won, {losses} lost, {draws} timed out");
    Ok(())
}
