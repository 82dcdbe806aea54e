//! Hunting for game along the trail.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inventory::ItemKind;
use crate::rng::{roll_between, roll_chance};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntError {
    #[error("you have no weapon to hunt with")]
    NoWeapon,
    #[error("you have no ammunition")]
    NoAmmunition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntOutcome {
    Success { food_lbs: u32 },
    Missed,
}

const fn default_base_success() -> f32 {
    0.50
}
const fn default_rifle_bonus() -> f32 {
    0.20
}
const fn default_food_min() -> u32 {
    5
}
const fn default_food_max() -> u32 {
    15
}
const fn default_ammo_per_hunt() -> u32 {
    1
}

/// Success odds and yield; food is drawn from `[food_min, food_max)` pounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntConfig {
    #[serde(default = "default_base_success")]
    pub base_success: f32,
    #[serde(default = "default_rifle_bonus")]
    pub rifle_bonus: f32,
    #[serde(default = "default_food_min")]
    pub food_min: u32,
    #[serde(default = "default_food_max")]
    pub food_max: u32,
    #[serde(default = "default_ammo_per_hunt")]
    pub ammo_per_hunt: u32,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            base_success: default_base_success(),
            rifle_bonus: default_rifle_bonus(),
            food_min: default_food_min(),
            food_max: default_food_max(),
            ammo_per_hunt: default_ammo_per_hunt(),
        }
    }
}

/// Check the party can hunt without touching anything.
///
/// # Errors
///
/// Returns [`HuntError`] when no weapon or not enough ammunition is carried.
pub fn hunt_precondition(state: &GameState, cfg: &HuntConfig) -> Result<bool, HuntError> {
    let Some(weapon) = state.inventory.weapon() else {
        return Err(HuntError::NoWeapon);
    };
    if state.inventory.ammunition() < cfg.ammo_per_hunt.max(1) {
        return Err(HuntError::NoAmmunition);
    }
    Ok(matches!(weapon.kind, ItemKind::Weapon { rifle: true }))
}

/// Spend ammunition and try for game: one success draw, then one yield draw on success.
///
/// # Errors
///
/// Returns [`HuntError`] before any state is mutated when the party lacks a
/// weapon or ammunition.
pub fn resolve_hunt<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &HuntConfig,
    rng: &mut R,
) -> Result<HuntOutcome, HuntError> {
    let has_rifle = hunt_precondition(state, cfg)?;
    state
        .inventory
        .remove(ItemKind::Ammunition.slug(), cfg.ammo_per_hunt.max(1));
    let chance = if has_rifle {
        cfg.base_success + cfg.rifle_bonus
    } else {
        cfg.base_success
    };
    if !roll_chance(rng, chance) {
        debug!("hunt missed (chance {chance:.2})");
        return Ok(HuntOutcome::Missed);
    }
    let shot = roll_between(rng, cfg.food_min, cfg.food_max);
    let food_lbs = state.inventory.add_food(shot);
    debug!("hunt succeeded: {food_lbs} lbs");
    Ok(HuntOutcome::Success { food_lbs })
}
