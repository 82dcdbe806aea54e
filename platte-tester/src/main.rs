mod common;
mod console;
mod logic;
mod storage;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{load_config, split_csv};
use console::{Console, play};
use logic::{
    GameplayStrategy, RunRecord, StrategyAggregate, aggregate, resolve_seed_inputs, run_batch,
};
use platte_game::{GameEngine, JourneyCfg, JourneySetup, TrailVariant};
use storage::JsonFileStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Interactive text console on stdin/stdout
    Play,
    /// Seeded batch simulation with built-in strategies
    Simulate,
}

fn parse_trail(raw: &str) -> Result<TrailVariant, String> {
    raw.parse::<TrailVariant>().map_err(|err| err.to_string())
}

#[derive(Debug, Parser)]
#[command(name = "platte-tester", version = "0.1.0")]
#[command(about = "Text console and seeded simulator for Perils Along the Platte")]
struct Args {
    /// Run mode: play (interactive) or simulate (batch)
    #[arg(long, value_enum, default_value_t = RunMode::Simulate)]
    mode: RunMode,

    /// Trail for numeric seeds: oregon, california or mormon (share codes carry their own)
    #[arg(long, default_value = "oregon", value_parser = parse_trail)]
    trail: TrailVariant,

    /// Departure month, 1-12
    #[arg(long, default_value_t = 4)]
    month: u32,

    /// Party leader's name
    #[arg(long, default_value = "Pioneer")]
    name: String,

    /// Starting money in dollars
    #[arg(long)]
    money: Option<u32>,

    /// Seeds to run (comma-separated integers or share codes like OR-WAGON42; `all` expands every code)
    #[arg(long, default_value = "1847")]
    seeds: String,

    /// Strategies to simulate (comma-separated, or `all`)
    #[arg(long, default_value = "balanced")]
    strategies: String,

    /// Journeys per seed and strategy (simulate mode only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Turn cap per simulated journey
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON overlay for journey tuning; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for play-mode saves
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Save slot used by `save` and `--resume`
    #[arg(long, default_value = "journey")]
    save_name: String,

    /// Resume the save slot instead of starting a new journey (play mode only)
    #[arg(long)]
    resume: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let cfg = load_config(args.config.as_deref())?;

    match args.mode {
        RunMode::Play => run_play(&args, cfg),
        RunMode::Simulate => {
            if !run_simulation(&args, cfg)? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

fn announce_banner() {
    println!("{}", "🐂 Perils Along the Platte".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn build_setup(args: &Args, trail: TrailVariant) -> JourneySetup {
    let defaults = JourneySetup::default();
    JourneySetup {
        player_name: args.name.clone(),
        trail,
        departure_month: args.month,
        money: args.money.unwrap_or(defaults.money),
        ..defaults
    }
}

fn parse_strategies(raw: &str) -> Result<Vec<GameplayStrategy>> {
    let tokens = split_csv(raw);
    if tokens.iter().any(|t| t.eq_ignore_ascii_case("all")) {
        return Ok(GameplayStrategy::ALL.to_vec());
    }
    let strategies = tokens
        .iter()
        .map(|t| t.parse::<GameplayStrategy>().map_err(|err| anyhow!(err)))
        .collect::<Result<Vec<_>>>()?;
    if strategies.is_empty() {
        return Ok(vec![GameplayStrategy::Balanced]);
    }
    Ok(strategies)
}

fn run_play(args: &Args, cfg: JourneyCfg) -> Result<()> {
    announce_banner();
    let storage = JsonFileStorage::new(&args.save_dir);
    let engine = GameEngine::new(storage.clone(), cfg);
    let mut session = if args.resume {
        engine
            .resume_session(&args.save_name)
            .with_context(|| format!("failed to resume '{}'", args.save_name))?
            .with_context(|| {
                format!(
                    "no save named '{}' in {}",
                    args.save_name,
                    args.save_dir.display()
                )
            })?
    } else {
        let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
        let info = seeds.first().context("no seed to play")?;
        let trail = info.trail_or(args.trail);
        println!("Share code: {}", info.share_code_for(trail).bright_green());
        engine
            .create_session(&build_setup(args, trail), info.seed)
            .context("failed to outfit the party")?
    };

    let mut console = Console::new(stdin().lock(), stdout());
    let summary = play(&mut session, &mut console, &storage, &args.save_name)?;
    println!(
        "{} {} after {} days, {} of {} miles.",
        "🏁".bright_cyan(),
        summary.ending_key(),
        summary.days,
        summary.miles_traveled,
        summary.total_miles
    );
    Ok(())
}

/// Returns false when any journey hit the turn cap without an ending.
fn run_simulation(args: &Args, cfg: JourneyCfg) -> Result<bool> {
    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let strategies = parse_strategies(&args.strategies)?;
    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }
    let base = build_setup(args, args.trail);
    let records = run_batch(
        &base,
        &cfg,
        &seeds,
        &strategies,
        args.iterations,
        args.max_turns,
    )?;
    let aggregates = aggregate(&records);
    write_reports(args, &records, &aggregates, start_time)?;
    Ok(records.iter().all(RunRecord::finished))
}

fn write_reports(
    args: &Args,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records, aggregates)?,
        "markdown" => {
            logic::reports::generate_markdown_report(&mut output_target, records, aggregates)?;
        }
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                records,
                aggregates,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
