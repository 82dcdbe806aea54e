use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{CAUSE_DROWNED, CrossingConfig, CrossingOutcome};
use crate::numbers::u32_to_f32;
use crate::rng::{roll_between, roll_span, roll_unit};
use crate::state::GameState;
use crate::weather::Weather;

/// Depth and width of a river on the day the party reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiverConditions {
    pub depth: f32,
    pub width: f32,
}

/// Roll today's river: depth draw first, then width.
pub fn generate_conditions<R: Rng + ?Sized>(
    weather: Weather,
    cfg: &CrossingConfig,
    rng: &mut R,
) -> RiverConditions {
    let depth_addend = match weather {
        Weather::Rain => cfg.rain_depth,
        Weather::Snow => cfg.snow_depth,
        Weather::Clear => 0.0,
    };
    let depth = cfg.base_depth + depth_addend + roll_span(rng, 0.0, cfg.depth_jitter);
    let width_addend = if weather == Weather::Rain {
        cfg.rain_width
    } else {
        0
    };
    let width = cfg.base_width + width_addend + roll_between(rng, 0, cfg.width_jitter);
    RiverConditions {
        depth,
        width: u32_to_f32(width),
    }
}

/// Percent chance that fording succeeds, never below zero.
///
/// The two depth penalties are exclusive; the deeper one wins.
#[must_use]
pub fn ford_success_chance(
    conditions: RiverConditions,
    wagon_condition: f32,
    cfg: &CrossingConfig,
) -> u32 {
    let mut chance = cfg.base_ford_chance;
    if conditions.depth > cfg.very_deep_depth {
        chance -= cfg.very_deep_penalty;
    } else if conditions.depth > cfg.deep_depth {
        chance -= cfg.deep_penalty;
    }
    if conditions.width > cfg.wide_width {
        chance -= cfg.wide_penalty;
    }
    if wagon_condition < cfg.weak_wagon_condition {
        chance -= cfg.weak_wagon_penalty;
    }
    u32::try_from(chance.max(0)).unwrap_or(0)
}

/// Attempt to ford. One percent draw decides; a failure then draws the number
/// of items lost, each lost item, wagon damage and player damage in that order.
pub fn attempt_ford<R: Rng + ?Sized>(
    state: &mut GameState,
    conditions: RiverConditions,
    cfg: &CrossingConfig,
    rng: &mut R,
) -> CrossingOutcome {
    let chance = ford_success_chance(conditions, state.wagon.condition(), cfg);
    let roll = roll_unit(rng) * 100.0;
    debug!(
        "ford attempt depth={:.2} width={:.0} chance={chance} roll={roll:.2}",
        conditions.depth, conditions.width
    );
    if roll < u32_to_f32(chance) {
        return CrossingOutcome::Forded { chance };
    }

    let lose_count = roll_between(rng, cfg.items_lost_min, cfg.items_lost_max);
    let items_lost = (0..lose_count)
        .filter_map(|_| state.inventory.remove_random_unit(&mut *rng))
        .collect();
    let wagon_damage = roll_between(rng, cfg.wagon_damage_min, cfg.wagon_damage_max);
    state.wagon.apply_damage(u32_to_f32(wagon_damage));
    let player_damage = i32::try_from(roll_between(
        rng,
        cfg.player_damage_min,
        cfg.player_damage_max,
    ))
    .unwrap_or(i32::MAX);
    state.player.apply_damage(player_damage, CAUSE_DROWNED);
    CrossingOutcome::Swept {
        chance,
        items_lost,
        wagon_damage,
        player_damage,
    }
}
