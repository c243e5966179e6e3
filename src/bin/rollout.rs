use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rl_2048::engine::Direction;
use rl_2048::episode::Episode;
use std::time::Duration;

/// Random-policy episode runner for the 2048 environment.
///
/// Stands in for the learning agent: every agent turn it picks uniformly
/// among the legal directions, every spawn turn the environment draws its
/// own tile. Reports rolling-average and highest episode lengths the way a
/// training loop would.
#[derive(Debug, Parser)]
#[command(name = "rollout", about = "Random-policy 2048 environment runner")]
struct Args {
    /// Number of episodes to play
    #[arg(long, default_value_t = 1000)]
    episodes: u64,

    /// Step cap per episode (timesteps, counting both turn kinds)
    #[arg(long, default_value_t = 300)]
    max_steps: u32,

    /// Base seed; episode e uses seed + e. Omit for fresh entropy per episode.
    #[arg(long)]
    seed: Option<u64>,

    /// Print a stats line every this many episodes
    #[arg(long, default_value_t = 100)]
    log_interval: u64,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Decorrelate the policy stream from the per-episode environment seeds.
    let mut policy_rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        None => StdRng::from_entropy(),
    };

    let pb = if !args.quiet {
        let pb = ProgressBar::new(args.episodes);
        pb.set_style(ProgressStyle::with_template(
            "{bar:30} {pos}/{len} | {msg}",
        )?);
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let mut ep = Episode::new();
    let mut rolling_sum: u64 = 0;
    let mut highest: u32 = 0;
    let mut best_tile: u32 = 0;

    for episode in 1..=args.episodes {
        let seed = args.seed.map(|s| s + episode).unwrap_or(0);
        ep.reset(seed);

        while ep.timestep() < args.max_steps {
            let obs = ep.agent_turn_observe();
            let legal: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| obs.legal_mask[d.index()])
                .collect();
            if legal.is_empty() {
                break;
            }
            let dir = legal[policy_rng.gen_range(0..legal.len())];
            if ep.apply_agent_action(dir).terminal {
                break;
            }
            if ep.apply_random_spawn() {
                break;
            }
        }

        rolling_sum += u64::from(ep.timestep());
        highest = highest.max(ep.timestep());
        best_tile = best_tile.max(ep.board().highest_tile());

        if episode % args.log_interval == 0 {
            let avg = rolling_sum as f64 / args.log_interval as f64;
            let line = format!(
                "avg steps: {:.1} | highest: {} | best tile: {}",
                avg, highest, best_tile
            );
            match &pb {
                Some(pb) => pb.set_message(line),
                None => println!("episode {episode}: {line}"),
            }
            rolling_sum = 0;
            highest = 0;
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    println!("Played {} episodes, best tile: {}", args.episodes, best_tile);
    Ok(())
}
