use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

use platte_game::{
    ActionOutcome, CrossingOutcome, GameError, JourneyCfg, JourneySession, JourneySetup,
    JourneySummary, TrailVariant, TurnAction, TurnEvent,
};

use crate::logic::policy::{GameplayStrategy, PolicyHooks};
use crate::logic::seeds::SeedInfo;

/// Configuration for one simulated journey.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub setup: JourneySetup,
    pub journey: JourneyCfg,
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub max_turns: u32,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(setup: JourneySetup, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            setup,
            journey: JourneyCfg::default(),
            strategy,
            seed,
            max_turns: 500,
        }
    }

    #[must_use]
    pub fn with_journey(mut self, journey: JourneyCfg) -> Self {
        self.journey = journey;
        self
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Outcome of one simulated journey.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub strategy: GameplayStrategy,
    pub seed_code: String,
    pub turns: u32,
    pub hazards: u32,
    pub crossings: u32,
    pub swept_away: u32,
    pub waits: u32,
    pub trades: u32,
    pub hunts: u32,
    pub rejected_commands: u32,
    pub rng_draws: u64,
    pub summary: JourneySummary,
}

impl RunRecord {
    #[must_use]
    pub fn finished(&self) -> bool {
        self.summary.ending.is_some()
    }
}

#[derive(Debug, Default)]
struct Tally {
    hazards: u32,
    crossings: u32,
    swept_away: u32,
    waits: u32,
    trades: u32,
    hunts: u32,
    rejected: u32,
}

impl Tally {
    fn absorb(&mut self, events: &[TurnEvent]) {
        for event in events {
            match event {
                TurnEvent::Hazard(_) => self.hazards += 1,
                TurnEvent::Crossing { outcome, .. } => {
                    self.crossings += 1;
                    if matches!(outcome, CrossingOutcome::Swept { .. }) {
                        self.swept_away += 1;
                    }
                }
                TurnEvent::Waited { .. } => self.waits += 1,
                TurnEvent::Trade(_) => self.trades += 1,
                TurnEvent::Hunt(_) => self.hunts += 1,
                TurnEvent::ItemUsed(_) | TurnEvent::Rested | TurnEvent::Starved { .. } => {}
            }
        }
    }
}

/// Play one journey to its ending (or the turn cap) with a built-in policy.
///
/// # Errors
///
/// Returns an error when the session cannot be set up or the engine rejects
/// a command it should have accepted.
pub fn run_journey(config: &SimulationConfig) -> Result<RunRecord> {
    let mut session = JourneySession::new(&config.setup, config.seed, config.journey.clone())
        .with_context(|| format!("failed to set up journey for seed {}", config.seed))?;
    let mut policy = config.strategy.create_policy(config.seed);
    let mut tally = Tally::default();
    let mut turns = 0;

    while turns < config.max_turns && !session.is_over() {
        for action in policy.preparations(session.state()) {
            let outcome = session.act(action, &mut PolicyHooks::new(policy.as_mut()));
            match outcome {
                Ok(ActionOutcome::Traded(_)) => tally.trades += 1,
                Ok(_) => {}
                Err(err) => {
                    debug!("day {}: {} skipped: {err}", session.state().day, policy.name());
                    tally.rejected += 1;
                }
            }
        }

        let action = policy.next_action(session.state());
        let mut hooks = PolicyHooks::new(policy.as_mut());
        let report = match session.act(action, &mut hooks) {
            Ok(ActionOutcome::Turn(report)) => report,
            Ok(other) => {
                anyhow::bail!("policy issued a non-day command as the day's action: {other:?}")
            }
            Err(GameError::GameOver(_)) => break,
            Err(err) => {
                debug!("day {}: falling back to rest: {err}", session.state().day);
                tally.rejected += 1;
                session.rest().context("resting after a rejected command")?
            }
        };
        tally.absorb(&report.events);
        turns += 1;
    }

    let summary = JourneySummary::from_state(session.state());
    info!(
        "{} seed {} finished as {} after {} turns",
        config.strategy,
        summary.share_code,
        summary.ending_key(),
        turns
    );
    Ok(RunRecord {
        strategy: config.strategy,
        seed_code: summary.share_code.clone(),
        turns,
        hazards: tally.hazards,
        crossings: tally.crossings,
        swept_away: tally.swept_away,
        waits: tally.waits,
        trades: tally.trades,
        hunts: tally.hunts,
        rejected_commands: tally.rejected,
        rng_draws: session.rng_draws(),
        summary,
    })
}

/// Every (seed, strategy, iteration) combination. Iteration `i` plays seed `seed + i`.
///
/// # Errors
///
/// Propagates the first failing journey.
pub fn run_batch(
    base: &JourneySetup,
    journey: &JourneyCfg,
    seeds: &[SeedInfo],
    strategies: &[GameplayStrategy],
    iterations: usize,
    max_turns: u32,
) -> Result<Vec<RunRecord>> {
    let mut records = Vec::with_capacity(seeds.len() * strategies.len() * iterations.max(1));
    for info in seeds {
        let setup = JourneySetup {
            trail: info.trail_or(base.trail),
            ..base.clone()
        };
        for &strategy in strategies {
            for iteration in 0..iterations.max(1) {
                let seed = info.seed.wrapping_add(iteration as u64);
                let config = SimulationConfig::new(setup.clone(), strategy, seed)
                    .with_journey(journey.clone())
                    .with_max_turns(max_turns);
                records.push(run_journey(&config)?);
            }
        }
    }
    Ok(records)
}

/// Per-strategy, per-trail outcome statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrategyAggregate {
    pub strategy: GameplayStrategy,
    pub trail: TrailVariant,
    pub runs: usize,
    pub victory_rate: f64,
    pub death_rate: f64,
    pub winter_rate: f64,
    pub unfinished: usize,
    pub mean_days: f64,
    pub mean_progress: f64,
    pub mean_health: f64,
    pub mean_crossings: f64,
    pub swept_rate: f64,
    pub leading_cause_of_death: Option<String>,
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(records: &[RunRecord]) -> Vec<StrategyAggregate> {
    let mut groups: BTreeMap<(usize, usize), Vec<&RunRecord>> = BTreeMap::new();
    for record in records {
        let strategy_idx = GameplayStrategy::ALL
            .iter()
            .position(|s| *s == record.strategy)
            .unwrap_or(0);
        let trail_idx = TrailVariant::ALL
            .iter()
            .position(|t| *t == record.summary.trail)
            .unwrap_or(0);
        groups.entry((strategy_idx, trail_idx)).or_default().push(record);
    }

    groups
        .into_values()
        .filter_map(|group| {
            let first = group.first()?;
            let runs = group.len();
            let share = |key: &str| {
                group.iter().filter(|r| r.summary.ending_key() == key).count() as f64 / runs as f64
            };
            let crossings: u32 = group.iter().map(|r| r.crossings).sum();
            let swept: u32 = group.iter().map(|r| r.swept_away).sum();
            let mut causes: BTreeMap<String, usize> = BTreeMap::new();
            for record in &group {
                if let Some(platte_game::Ending::Death { cause }) = &record.summary.ending {
                    *causes.entry(cause.clone()).or_default() += 1;
                }
            }
            let leading_cause_of_death = causes
                .into_iter()
                .max_by_key(|(_, count)| *count)
                .map(|(cause, _)| cause);
            Some(StrategyAggregate {
                strategy: first.strategy,
                trail: first.summary.trail,
                runs,
                victory_rate: share("victory"),
                death_rate: share("death"),
                winter_rate: share("winter"),
                unfinished: group.iter().filter(|r| !r.finished()).count(),
                mean_days: mean(group.iter().map(|r| f64::from(r.summary.days)), runs),
                mean_progress: mean(group.iter().map(|r| r.summary.progress()), runs),
                mean_health: mean(group.iter().map(|r| f64::from(r.summary.health)), runs),
                mean_crossings: mean(group.iter().map(|r| f64::from(r.crossings)), runs),
                swept_rate: if crossings == 0 {
                    0.0
                } else {
                    f64::from(swept) / f64::from(crossings)
                },
                leading_cause_of_death,
            })
        })
        .collect()
}
