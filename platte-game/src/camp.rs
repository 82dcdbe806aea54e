//! Camp actions: resting and using carried items.
use serde::{Deserialize, Serialize};

use crate::inventory::{InventoryError, ItemKind};
use crate::numbers::u32_to_f32;
use crate::state::GameState;

const fn default_rest_heal() -> i32 {
    10
}
const fn default_rest_fatigue() -> i32 {
    20
}
const fn default_rest_hunger() -> i32 {
    10
}
const fn default_meal_lbs() -> u32 {
    5
}
const fn default_spare_part_repair() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampConfig {
    #[serde(default = "default_rest_heal")]
    pub rest_heal: i32,
    #[serde(default = "default_rest_fatigue")]
    pub rest_fatigue_recovery: i32,
    #[serde(default = "default_rest_hunger")]
    pub rest_hunger_relief: i32,
    /// Pounds eaten when a food item is used directly.
    #[serde(default = "default_meal_lbs")]
    pub meal_lbs: u32,
    #[serde(default = "default_spare_part_repair")]
    pub spare_part_repair: u32,
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            rest_heal: default_rest_heal(),
            rest_fatigue_recovery: default_rest_fatigue(),
            rest_hunger_relief: default_rest_hunger(),
            meal_lbs: default_meal_lbs(),
            spare_part_repair: default_spare_part_repair(),
        }
    }
}

/// Effect of using one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemUse {
    Healed { item: String, amount: i32 },
    Ate { item: String, lbs: u32, hunger_relief: i32 },
    Repaired { item: String, amount: u32 },
}

impl ItemUse {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Healed { item, amount } => format!("You used {item} and recovered {amount} health."),
            Self::Ate {
                item,
                lbs,
                hunger_relief,
            } => format!("You ate {lbs} lbs of {item}; hunger eased by {hunger_relief}."),
            Self::Repaired { item, amount } => {
                format!("You fitted a {item}; wagon condition improved by {amount}.")
            }
        }
    }
}

/// Rest for the day: heal, recover fatigue and ease hunger. The caller advances the clock.
pub fn camp_rest(state: &mut GameState, cfg: &CampConfig) -> String {
    state.player.heal(cfg.rest_heal);
    state.player.recover_fatigue(cfg.rest_fatigue_recovery);
    state.player.ease_hunger(cfg.rest_hunger_relief);
    format!(
        "You rest and recover. Health is now {}, fatigue {}.",
        state.player.health(),
        state.player.fatigue()
    )
}

/// Use a single carried item, dispatching on its kind.
///
/// # Errors
///
/// Returns [`InventoryError::Missing`] when nothing matches `query` and
/// [`InventoryError::NotUsable`] for weapons, ammunition and supplies. Nothing
/// is consumed on error.
pub fn use_item(
    state: &mut GameState,
    query: &str,
    cfg: &CampConfig,
) -> Result<ItemUse, InventoryError> {
    let Some(item) = state.inventory.get(query) else {
        return Err(InventoryError::Missing(query.trim().to_string()));
    };
    let (name, kind) = (item.name.clone(), item.kind);
    match kind {
        ItemKind::Medicine { healing } => {
            state.inventory.remove(&name, 1);
            state.player.heal(healing);
            state.player.cure_illness();
            Ok(ItemUse::Healed {
                item: name,
                amount: healing,
            })
        }
        ItemKind::Food { nutrition } => {
            let lbs = state.inventory.remove(&name, cfg.meal_lbs);
            state.player.ease_hunger(nutrition);
            Ok(ItemUse::Ate {
                item: name,
                lbs,
                hunger_relief: nutrition,
            })
        }
        ItemKind::SparePart => {
            state.inventory.remove(&name, 1);
            state.wagon.repair(u32_to_f32(cfg.spare_part_repair));
            Ok(ItemUse::Repaired {
                item: name,
                amount: cfg.spare_part_repair,
            })
        }
        ItemKind::Weapon { .. } | ItemKind::Ammunition | ItemKind::Supplies => {
            Err(InventoryError::NotUsable(name))
        }
    }
}
