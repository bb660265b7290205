mod logic;

use anyhow::{Context, Result};
use cabdriver_env::{CabDriverEnv, EnvConfig, TravelTimeTable};
use clap::Parser;
use colored::Colorize;
use log::info;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    DriverStrategy, EpisodeConfig, EpisodeSession, EpisodeSummary, StepRecord, load_config,
    load_travel_times, resolve_seed_inputs, split_csv, synthetic_travel_times,
};

#[derive(Debug, Parser)]
#[command(name = "cabdriver-sim", version = "0.1.0")]
#[command(about = "Run cab driver episodes with built-in policies and summarize the results")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of episodes per seed
    #[arg(long, default_value_t = 1)]
    episodes: usize,

    /// Driving policy
    #[arg(long, value_enum, default_value_t = DriverStrategy::Random)]
    policy: DriverStrategy,

    /// Days of driving per episode
    #[arg(long, default_value_t = 30)]
    episode_days: u32,

    /// Environment configuration (JSON); defaults apply to omitted fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Travel-time table (JSON); a seeded synthetic table is used when omitted
    #[arg(long)]
    travel_times: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Print every step
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let json = args.report == "json";
    if !json {
        announce_banner();
    }

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EnvConfig::default(),
    };
    let primary_seed = seeds.first().copied().context("no seeds provided")?;
    let table = resolve_travel_times(&args, &config, primary_seed)?;

    let mut env = CabDriverEnv::new(config, primary_seed).context("building environment")?;
    info!(
        "running {} episode(s) per seed for {} seed(s) with the {} policy",
        args.episodes,
        seeds.len(),
        args.policy
    );

    let mut summaries: Vec<EpisodeSummary> = Vec::new();
    for &seed in &seeds {
        for episode in 0..args.episodes {
            let episode_config = EpisodeConfig::new(args.policy, seed)
                .with_episode(episode)
                .with_episode_days(args.episode_days);
            let session = EpisodeSession::new(&mut env, &table, episode_config);
            let summary = if args.verbose && !json {
                session.run_with(print_step)
            } else {
                session.run()
            }
            .with_context(|| format!("episode {episode} for seed {seed}"))?;
            summaries.push(summary);
        }
    }

    let mut out = BufWriter::new(stdout());
    if json {
        logic::reports::generate_json_report(&mut out, &summaries)?;
    } else {
        logic::reports::generate_console_report(&mut out, &summaries, start_time.elapsed())?;
    }
    out.flush()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🚕 Cab Driver Simulator".bright_cyan().bold());
    println!("{}", "=======================".cyan());
}

fn resolve_travel_times(args: &Args, config: &EnvConfig, seed: u64) -> Result<TravelTimeTable> {
    match &args.travel_times {
        Some(path) => load_travel_times(path, config),
        None => {
            info!("no travel times given; generating a synthetic table from seed {seed}");
            synthetic_travel_times(config, seed)
        }
    }
}

fn print_step(record: &StepRecord) {
    let reward = format!("{:+.1}", record.reward);
    let reward = if record.reward >= 0.0 {
        reward.green()
    } else {
        reward.red()
    };
    println!(
        "  #{:<4} {} {:<12} {} offers -> {} {}h {}",
        record.step,
        record.state,
        record.action.to_string(),
        record.offers,
        record.next_state,
        record.hours,
        reward
    );
    if let Some(rationale) = &record.rationale {
        println!("        {}", rationale.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::parse_from(["cabdriver-sim"]);
        assert_eq!(args.seeds, "1337");
        assert_eq!(args.episodes, 1);
        assert_eq!(args.episode_days, 30);
        assert_eq!(args.policy, DriverStrategy::Random);
        assert_eq!(args.report, "console");
        assert!(args.config.is_none());
        assert!(args.travel_times.is_none());
    }

    #[test]
    fn policy_and_report_are_restricted() {
        let args =
            Args::parse_from(["cabdriver-sim", "--policy", "greedy", "--report", "json", "-v"]);
        assert_eq!(args.policy, DriverStrategy::Greedy);
        assert!(args.verbose);
        assert!(Args::try_parse_from(["cabdriver-sim", "--policy", "lazy"]).is_err());
        assert!(Args::try_parse_from(["cabdriver-sim", "--report", "csv"]).is_err());
    }

    #[test]
    fn synthetic_table_is_used_without_a_file() {
        let args = Args::parse_from(["cabdriver-sim"]);
        let table = resolve_travel_times(&args, &EnvConfig::default(), 1).unwrap();
        assert_eq!(table.dimensions(), (5, 24, 7));
    }
}
