use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::logic::simulation::EpisodeSummary;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    episodes: &'a [EpisodeSummary],
    mean_reward: f64,
    mean_utilization: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), value| {
        (sum + value, count.saturating_add(1))
    });
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

pub fn generate_json_report<W: Write + ?Sized>(
    writer: &mut W,
    summaries: &[EpisodeSummary],
) -> Result<()> {
    let report = JsonReport {
        episodes: summaries,
        mean_reward: mean(summaries.iter().map(|s| s.total_reward)),
        mean_utilization: mean(summaries.iter().map(EpisodeSummary::utilization)),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    summaries: &[EpisodeSummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Episode Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==================".cyan())?;

    for summary in summaries {
        let reward = format!("{:+.1}", summary.total_reward);
        let reward = if summary.total_reward >= 0.0 {
            reward.green()
        } else {
            reward.red()
        };
        writeln!(
            writer,
            "[seed {} #{}] {} reward {} over {}h",
            summary.seed,
            summary.episode,
            summary.policy.bold(),
            reward,
            summary.hours
        )?;
        writeln!(
            writer,
            "   Steps: {} ({} rides, {} refusals)",
            summary.steps, summary.rides, summary.refusals
        )?;
        writeln!(
            writer,
            "   Utilization: {:.1}% ({}h carrying, {}h idle)",
            summary.utilization(),
            summary.ride_hours,
            summary.idle_hours
        )?;
        writeln!(
            writer,
            "   Route: {} -> {}",
            summary.initial_state, summary.final_state
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "Episodes: {}", summaries.len())?;
    writeln!(
        writer,
        "Mean reward: {:.1}",
        mean(summaries.iter().map(|s| s.total_reward))
    )?;
    writeln!(
        writer,
        "Mean utilization: {:.1}%",
        mean(summaries.iter().map(EpisodeSummary::utilization))
    )?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    Ok(())
}
