use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::simulation::{RunRecord, StrategyAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    runs: &'a [RunRecord],
    aggregates: &'a [StrategyAggregate],
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(out, "Journeys simulated: {}", records.len())?;
    let unfinished = records.iter().filter(|r| !r.finished()).count();
    if unfinished > 0 {
        writeln!(out, "Unfinished: {}", unfinished.to_string().red())?;
    }
    writeln!(out, "Simulation time: {total_duration:?}")?;
    writeln!(out)?;

    for agg in aggregates {
        writeln!(
            out,
            "{} on the {} ({} runs)",
            agg.strategy.label().bold(),
            agg.trail,
            agg.runs
        )?;
        writeln!(
            out,
            "   Victory {}  Death {}  Winter {}",
            pct(agg.victory_rate).green(),
            pct(agg.death_rate).red(),
            pct(agg.winter_rate).yellow()
        )?;
        writeln!(
            out,
            "   Mean days: {:.1}  Mean progress: {}  Mean health: {:.1}",
            agg.mean_days,
            pct(agg.mean_progress),
            agg.mean_health
        )?;
        writeln!(
            out,
            "   Crossings per run: {:.2}  Swept away: {}",
            agg.mean_crossings,
            pct(agg.swept_rate)
        )?;
        if let Some(cause) = &agg.leading_cause_of_death {
            writeln!(out, "   Leading cause of death: {}", cause.red())?;
        }
        writeln!(out)?;
    }

    if let Some(longest) = records.iter().max_by_key(|r| r.summary.days) {
        writeln!(out, "{}", "⏳ Longest Journey".bright_yellow().bold())?;
        writeln!(
            out,
            "{} ({}) lasted {} days, ending as {}",
            longest.seed_code.green(),
            longest.strategy,
            longest.summary.days,
            longest.summary.ending_key()
        )?;
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    let report = JsonReport {
        runs: records,
        aggregates,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# Perils Along the Platte Simulation Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Journeys simulated**: {}", records.len())?;
    writeln!(
        out,
        "- **Unfinished**: {}\n",
        records.iter().filter(|r| !r.finished()).count()
    )?;

    writeln!(out, "## Strategies\n")?;
    writeln!(
        out,
        "| Strategy | Trail | Runs | Victory | Death | Winter | Mean days | Mean progress |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|")?;
    for agg in aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.1} | {} |",
            agg.strategy,
            agg.trail,
            agg.runs,
            pct(agg.victory_rate),
            pct(agg.death_rate),
            pct(agg.winter_rate),
            agg.mean_days,
            pct(agg.mean_progress)
        )?;
    }

    writeln!(out, "\n## Journeys\n")?;
    for record in records {
        let status = if record.summary.ending.as_ref().is_some_and(|e| e.is_victory()) {
            "✅"
        } else {
            "❌"
        };
        writeln!(
            out,
            "- {status} `{}` {}: {} after {} days, {} of {} miles",
            record.seed_code,
            record.strategy,
            record.summary.ending_key(),
            record.summary.days,
            record.summary.miles_traveled,
            record.summary.total_miles
        )?;
    }
    Ok(())
}
