//! Daily hazard categories: accident, illness, weather and resource loss.
//!
//! Every category makes its own trigger draw and, when triggered, a separate
//! sub-outcome draw. Nothing is suppressed between days.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::numbers::scale_magnitude;
use crate::rng::{roll_chance, roll_index};
use crate::state::GameState;

pub const CAUSE_ACCIDENT: &str = "accident";
pub const CAUSE_ILLNESS: &str = "illness";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Accident,
    Illness,
    Weather,
    Resource,
}

impl HazardKind {
    /// Resolution order within a day.
    pub const ORDER: [Self; 4] = [Self::Accident, Self::Illness, Self::Weather, Self::Resource];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Illness => "illness",
            Self::Weather => "weather",
            Self::Resource => "resource",
        }
    }
}

/// Something that went wrong today, with the magnitude actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HazardEvent {
    WagonRepair { cost: u32 },
    OxInjury { damage: i32, lost: Vec<String> },
    PlayerInjury { damage: i32 },
    PartySick { illness: String, damage: i32 },
    OxSick { damage: i32, lost: Vec<String> },
    FoodSpoiled { lbs: u32 },
    HeatStress { damage: i32, lost: Vec<String> },
    Theft { lbs: u32 },
    Rancid { lbs: u32 },
    MoneyLost { amount: u32 },
}

impl HazardEvent {
    #[must_use]
    pub const fn kind(&self) -> HazardKind {
        match self {
            Self::WagonRepair { .. } | Self::OxInjury { .. } | Self::PlayerInjury { .. } => {
                HazardKind::Accident
            }
            Self::PartySick { .. } | Self::OxSick { .. } => HazardKind::Illness,
            Self::FoodSpoiled { .. } | Self::HeatStress { .. } => HazardKind::Weather,
            Self::Theft { .. } | Self::Rancid { .. } | Self::MoneyLost { .. } => {
                HazardKind::Resource
            }
        }
    }
}

fn write_losses(f: &mut fmt::Formatter<'_>, lost: &[String]) -> fmt::Result {
    if lost.is_empty() {
        return Ok(());
    }
    write!(f, " {} did not survive.", lost.join(", "))
}

impl fmt::Display for HazardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WagonRepair { cost } => {
                write!(f, "An accident damaged the wagon. Repairs cost ${cost}.")
            }
            Self::OxInjury { damage, lost } => {
                write!(f, "An accident injured your oxen (-{damage} health each).")?;
                write_losses(f, lost)
            }
            Self::PlayerInjury { damage } => {
                write!(f, "You were injured in an accident (-{damage} health).")
            }
            Self::PartySick { illness, damage } => {
                write!(f, "A member of the party has {illness} (-{damage} health).")
            }
            Self::OxSick { damage, lost } => {
                write!(f, "Sickness spreads through the oxen (-{damage} health each).")?;
                write_losses(f, lost)
            }
            Self::FoodSpoiled { lbs } => {
                write!(f, "A storm soaked the provisions; {lbs} lbs of food spoiled.")
            }
            Self::HeatStress { damage, lost } => {
                write!(f, "Extreme heat wears on the oxen (-{damage} health each).")?;
                write_losses(f, lost)
            }
            Self::Theft { lbs } => write!(f, "Thieves made off with {lbs} lbs of food."),
            Self::Rancid { lbs } => write!(f, "{lbs} lbs of food have gone rancid."),
            Self::MoneyLost { amount } => write!(f, "You lost ${amount} along the way."),
        }
    }
}

const fn default_accident_chance() -> f32 {
    0.30
}
const fn default_illness_chance() -> f32 {
    0.25
}
const fn default_weather_chance() -> f32 {
    0.30
}
const fn default_resource_chance() -> f32 {
    0.20
}
const fn default_accident_repair_cost() -> u32 {
    20
}
const fn default_accident_ox_damage() -> i32 {
    10
}
const fn default_accident_player_damage() -> i32 {
    5
}
const fn default_illness_player_damage() -> i32 {
    10
}
const fn default_illness_ox_damage() -> i32 {
    10
}
const fn default_spoilage_lbs() -> u32 {
    10
}
const fn default_heat_ox_damage() -> u32 {
    15
}
const fn default_theft_lbs() -> u32 {
    10
}
const fn default_rancid_lbs() -> u32 {
    5
}
const fn default_money_loss() -> u32 {
    5
}
fn default_illnesses() -> Vec<String> {
    ["cholera", "dysentery", "fever", "exhaustion"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Trigger probabilities and magnitudes for the daily hazards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardConfig {
    #[serde(default = "default_accident_chance")]
    pub accident_chance: f32,
    #[serde(default = "default_illness_chance")]
    pub illness_chance: f32,
    #[serde(default = "default_weather_chance")]
    pub weather_chance: f32,
    #[serde(default = "default_resource_chance")]
    pub resource_chance: f32,
    #[serde(default = "default_accident_repair_cost")]
    pub accident_repair_cost: u32,
    #[serde(default = "default_accident_ox_damage")]
    pub accident_ox_damage: i32,
    #[serde(default = "default_accident_player_damage")]
    pub accident_player_damage: i32,
    #[serde(default = "default_illness_player_damage")]
    pub illness_player_damage: i32,
    #[serde(default = "default_illness_ox_damage")]
    pub illness_ox_damage: i32,
    /// Scaled by weather strength.
    #[serde(default = "default_spoilage_lbs")]
    pub spoilage_lbs: u32,
    /// Scaled by weather strength.
    #[serde(default = "default_heat_ox_damage")]
    pub heat_ox_damage: u32,
    #[serde(default = "default_theft_lbs")]
    pub theft_lbs: u32,
    #[serde(default = "default_rancid_lbs")]
    pub rancid_lbs: u32,
    #[serde(default = "default_money_loss")]
    pub money_loss: u32,
    #[serde(default = "default_illnesses")]
    pub illnesses: Vec<String>,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            accident_chance: default_accident_chance(),
            illness_chance: default_illness_chance(),
            weather_chance: default_weather_chance(),
            resource_chance: default_resource_chance(),
            accident_repair_cost: default_accident_repair_cost(),
            accident_ox_damage: default_accident_ox_damage(),
            accident_player_damage: default_accident_player_damage(),
            illness_player_damage: default_illness_player_damage(),
            illness_ox_damage: default_illness_ox_damage(),
            spoilage_lbs: default_spoilage_lbs(),
            heat_ox_damage: default_heat_ox_damage(),
            theft_lbs: default_theft_lbs(),
            rancid_lbs: default_rancid_lbs(),
            money_loss: default_money_loss(),
            illnesses: default_illnesses(),
        }
    }
}

impl HazardConfig {
    /// Every hazard disabled; handy for isolating other mechanics.
    #[must_use]
    pub fn calm() -> Self {
        Self {
            accident_chance: 0.0,
            illness_chance: 0.0,
            weather_chance: 0.0,
            resource_chance: 0.0,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn chance_for(&self, kind: HazardKind) -> f32 {
        match kind {
            HazardKind::Accident => self.accident_chance,
            HazardKind::Illness => self.illness_chance,
            HazardKind::Weather => self.weather_chance,
            HazardKind::Resource => self.resource_chance,
        }
    }
}

/// Resolve one day of hazards in fixed order.
pub fn resolve_daily_hazards<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &HazardConfig,
    rng: &mut R,
) -> SmallVec<[HazardEvent; 4]> {
    HazardKind::ORDER
        .into_iter()
        .filter_map(|kind| resolve_hazard(kind, state, cfg, rng))
        .collect()
}

/// Resolve a single category: trigger draw, then sub-outcome draw.
pub fn resolve_hazard<R: Rng + ?Sized>(
    kind: HazardKind,
    state: &mut GameState,
    cfg: &HazardConfig,
    rng: &mut R,
) -> Option<HazardEvent> {
    if !roll_chance(rng, cfg.chance_for(kind)) {
        return None;
    }
    let event = match kind {
        HazardKind::Accident => resolve_accident(state, cfg, rng),
        HazardKind::Illness => resolve_illness(state, cfg, rng),
        HazardKind::Weather => resolve_weather(state, cfg, rng),
        HazardKind::Resource => resolve_resource(state, cfg, rng),
    };
    debug!("day {} hazard {}: {event:?}", state.day, kind.as_str());
    Some(event)
}

fn resolve_accident<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &HazardConfig,
    rng: &mut R,
) -> HazardEvent {
    match roll_index(rng, 3) {
        0 => HazardEvent::WagonRepair {
            cost: state.purse.lose(cfg.accident_repair_cost),
        },
        1 => HazardEvent::OxInjury {
            damage: cfg.accident_ox_damage,
            lost: state.oxen.damage_all(cfg.accident_ox_damage),
        },
        _ => {
            state
                .player
                .apply_damage(cfg.accident_player_damage, CAUSE_ACCIDENT);
            HazardEvent::PlayerInjury {
                damage: cfg.accident_player_damage,
            }
        }
    }
}

fn resolve_illness<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &HazardConfig,
    rng: &mut R,
) -> HazardEvent {
    if roll_index(rng, 2) == 0 {
        let illness = cfg
            .illnesses
            .get(roll_index(rng, cfg.illnesses.len()))
            .cloned()
            .unwrap_or_else(|| String::from(CAUSE_ILLNESS));
        state.player.contract_illness(&illness);
        state
            .player
            .apply_damage(cfg.illness_player_damage, CAUSE_ILLNESS);
        HazardEvent::PartySick {
            illness,
            damage: cfg.illness_player_damage,
        }
    } else {
        HazardEvent::OxSick {
            damage: cfg.illness_ox_damage,
            lost: state.oxen.damage_all(cfg.illness_ox_damage),
        }
    }
}

fn resolve_weather<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &HazardConfig,
    rng: &mut R,
) -> HazardEvent {
    let scale = state.weather.hazard_scale();
    if roll_index(rng, 2) == 0 {
        let lbs = state
            .inventory
            .consume_food(scale_magnitude(cfg.spoilage_lbs, scale));
        HazardEvent::FoodSpoiled { lbs }
    } else {
        let damage = i32::try_from(scale_magnitude(cfg.heat_ox_damage, scale)).unwrap_or(i32::MAX);
        HazardEvent::HeatStress {
            damage,
            lost: state.oxen.damage_all(damage),
        }
    }
}

fn resolve_resource<R: Rng + ?Sized>(
    state: &mut GameState,
    cfg: &HazardConfig,
    rng: &mut R,
) -> HazardEvent {
    match roll_index(rng, 3) {
        0 => HazardEvent::Theft {
            lbs: state.inventory.consume_food(cfg.theft_lbs),
        },
        1 => HazardEvent::Rancid {
            lbs: state.inventory.consume_food(cfg.rancid_lbs),
        },
        _ => HazardEvent::MoneyLost {
            amount: state.purse.lose(cfg.money_loss),
        },
    }
}
