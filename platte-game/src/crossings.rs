//! River crossings: conditions, choices and their configuration.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod resolver;

pub use resolver::{
    RiverConditions, attempt_ford, ford_success_chance, generate_conditions,
};

/// Cause of death recorded when a failed ford proves fatal.
pub const CAUSE_DROWNED: &str = "drowned crossing the river";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingChoice {
    #[default]
    Ford,
    Ferry,
    Guide,
    Wait,
}

impl CrossingChoice {
    pub const ALL: [Self; 4] = [Self::Ford, Self::Ferry, Self::Guide, Self::Wait];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ford => "ford",
            Self::Ferry => "ferry",
            Self::Guide => "guide",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for CrossingChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossingChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ford" | "1" => Ok(Self::Ford),
            "ferry" | "2" => Ok(Self::Ferry),
            "guide" | "3" => Ok(Self::Guide),
            "wait" | "4" => Ok(Self::Wait),
            _ => Err(()),
        }
    }
}

/// What the river crossing did to the party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrossingOutcome {
    Forded { chance: u32 },
    Swept {
        chance: u32,
        items_lost: Vec<String>,
        wagon_damage: u32,
        player_damage: i32,
    },
    Ferried { cost: u32 },
    Guided { cost: u32 },
}

impl CrossingOutcome {
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        !matches!(self, Self::Swept { .. })
    }
}

impl fmt::Display for CrossingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forded { chance } => {
                write!(f, "You forded the river safely ({chance}% chance).")
            }
            Self::Swept {
                chance,
                items_lost,
                wagon_damage,
                player_damage,
            } => write!(
                f,
                "The ford failed ({chance}% chance): {} items washed away, wagon damaged by {wagon_damage}, you lost {player_damage} health.",
                items_lost.len()
            ),
            Self::Ferried { cost } => write!(f, "The ferry carried you across for ${cost}."),
            Self::Guided { cost } => write!(f, "A guide led you across for ${cost}."),
        }
    }
}

const fn default_base_depth() -> f32 {
    100.0
}
const fn default_rain_depth() -> f32 {
    2.0
}
const fn default_snow_depth() -> f32 {
    1.0
}
const fn default_depth_jitter() -> f32 {
    3.0
}
const fn default_base_width() -> u32 {
    50
}
const fn default_rain_width() -> u32 {
    20
}
const fn default_width_jitter() -> u32 {
    30
}
const fn default_base_chance() -> i32 {
    70
}
const fn default_very_deep() -> f32 {
    5.0
}
const fn default_very_deep_penalty() -> i32 {
    30
}
const fn default_deep() -> f32 {
    3.0
}
const fn default_deep_penalty() -> i32 {
    15
}
const fn default_wide() -> f32 {
    20.0
}
const fn default_wide_penalty() -> i32 {
    20
}
const fn default_weak_wagon() -> f32 {
    50.0
}
const fn default_weak_wagon_penalty() -> i32 {
    15
}
const fn default_ferry_cost() -> u32 {
    5
}
const fn default_guide_cost() -> u32 {
    10
}
const fn default_wait_heal() -> i32 {
    5
}
const fn default_items_lost_min() -> u32 {
    5
}
const fn default_items_lost_max() -> u32 {
    15
}
const fn default_wagon_damage_min() -> u32 {
    10
}
const fn default_wagon_damage_max() -> u32 {
    30
}
const fn default_player_damage_min() -> u32 {
    5
}
const fn default_player_damage_max() -> u32 {
    20
}
const fn default_max_prompts() -> u32 {
    10
}

/// River model constants. Damage ranges are half-open `[min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingConfig {
    #[serde(default = "default_base_depth")]
    pub base_depth: f32,
    #[serde(default = "default_rain_depth")]
    pub rain_depth: f32,
    #[serde(default = "default_snow_depth")]
    pub snow_depth: f32,
    #[serde(default = "default_depth_jitter")]
    pub depth_jitter: f32,
    #[serde(default = "default_base_width")]
    pub base_width: u32,
    #[serde(default = "default_rain_width")]
    pub rain_width: u32,
    #[serde(default = "default_width_jitter")]
    pub width_jitter: u32,
    #[serde(default = "default_base_chance")]
    pub base_ford_chance: i32,
    #[serde(default = "default_very_deep")]
    pub very_deep_depth: f32,
    #[serde(default = "default_very_deep_penalty")]
    pub very_deep_penalty: i32,
    #[serde(default = "default_deep")]
    pub deep_depth: f32,
    #[serde(default = "default_deep_penalty")]
    pub deep_penalty: i32,
    #[serde(default = "default_wide")]
    pub wide_width: f32,
    #[serde(default = "default_wide_penalty")]
    pub wide_penalty: i32,
    #[serde(default = "default_weak_wagon")]
    pub weak_wagon_condition: f32,
    #[serde(default = "default_weak_wagon_penalty")]
    pub weak_wagon_penalty: i32,
    #[serde(default = "default_ferry_cost")]
    pub ferry_cost: u32,
    #[serde(default = "default_guide_cost")]
    pub guide_cost: u32,
    #[serde(default = "default_wait_heal")]
    pub wait_heal: i32,
    #[serde(default = "default_items_lost_min")]
    pub items_lost_min: u32,
    #[serde(default = "default_items_lost_max")]
    pub items_lost_max: u32,
    #[serde(default = "default_wagon_damage_min")]
    pub wagon_damage_min: u32,
    #[serde(default = "default_wagon_damage_max")]
    pub wagon_damage_max: u32,
    #[serde(default = "default_player_damage_min")]
    pub player_damage_min: u32,
    #[serde(default = "default_player_damage_max")]
    pub player_damage_max: u32,
    /// Undecided parties ford after this many prompts.
    #[serde(default = "default_max_prompts")]
    pub max_prompts: u32,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            base_depth: default_base_depth(),
            rain_depth: default_rain_depth(),
            snow_depth: default_snow_depth(),
            depth_jitter: default_depth_jitter(),
            base_width: default_base_width(),
            rain_width: default_rain_width(),
            width_jitter: default_width_jitter(),
            base_ford_chance: default_base_chance(),
            very_deep_depth: default_very_deep(),
            very_deep_penalty: default_very_deep_penalty(),
            deep_depth: default_deep(),
            deep_penalty: default_deep_penalty(),
            wide_width: default_wide(),
            wide_penalty: default_wide_penalty(),
            weak_wagon_condition: default_weak_wagon(),
            weak_wagon_penalty: default_weak_wagon_penalty(),
            ferry_cost: default_ferry_cost(),
            guide_cost: default_guide_cost(),
            wait_heal: default_wait_heal(),
            items_lost_min: default_items_lost_min(),
            items_lost_max: default_items_lost_max(),
            wagon_damage_min: default_wagon_damage_min(),
            wagon_damage_max: default_wagon_damage_max(),
            player_damage_min: default_player_damage_min(),
            player_damage_max: default_player_damage_max(),
            max_prompts: default_max_prompts(),
        }
    }
}

impl CrossingConfig {
    /// Fee for a paid crossing; fording and waiting are free.
    #[must_use]
    pub const fn cost_of(&self, choice: CrossingChoice) -> u32 {
        match choice {
            CrossingChoice::Ferry => self.ferry_cost,
            CrossingChoice::Guide => self.guide_cost,
            CrossingChoice::Ford | CrossingChoice::Wait => 0,
        }
    }
}
