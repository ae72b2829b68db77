//! Trains a DQN agent on the built-in cart-pole task.
//!
//! ```text
//! RUST_LOG=info cargo run --release --bin train -- --episodes 300 --seed 1
//! ```
mod cartpole;

use anyhow::{Context, Result};
use clap::Parser;
use deepq::agent::{DqnAgent, DqnConfig};
use deepq::driver::EpisodeDriver;
use deepq::env::Environment;
use log::info;
use std::path::PathBuf;

use cartpole::CartPole;

#[derive(Parser, Debug)]
#[command(version, about = "Train a DQN agent on cart-pole")]
struct Args {
    /// JSON agent configuration; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 300)]
    episodes: usize,

    #[arg(long, default_value_t = 500)]
    max_steps: usize,

    /// Overrides the seed of the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Also synchronize the target network every N environment steps.
    #[arg(long)]
    sync_every: Option<usize>,

    /// Where to write the trained parameters.
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Number of greedy evaluation episodes after training.
    #[arg(long, default_value_t = 10)]
    eval_episodes: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or(42);
    let mut env = CartPole::new(seed);

    let mut config = match &args.config {
        Some(path) => DqnConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => DqnConfig::new(env.state_size(), env.action_count())
            .learning_rate(1e-3)
            .exploration(1.0, 0.01, 0.98),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    info!("{:?}", config);

    let mut agent = DqnAgent::new(&config)?;

    let mut driver = EpisodeDriver::new(args.episodes, args.max_steps);
    if let Some(every) = args.sync_every {
        driver = driver.sync_every_steps(every);
    }
    let summaries = driver.run(&mut agent, &mut env)?;

    let tail = summaries.len().min(100);
    if tail > 0 {
        let mean = summaries[summaries.len() - tail..]
            .iter()
            .map(|s| s.total_reward)
            .sum::<f32>()
            / tail as f32;
        info!("Mean reward over the last {} episodes: {:.1}", tail, mean);
    }

    if args.eval_episodes > 0 {
        let rewards = driver.evaluate(&agent, &mut env, args.eval_episodes)?;
        info!("Greedy evaluation rewards: {:?}", rewards);
    }

    if let Some(path) = &args.checkpoint {
        agent.save_parameters(path)?;
    }

    Ok(())
}
