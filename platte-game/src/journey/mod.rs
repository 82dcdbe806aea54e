//! Turn loop: configuration, collaborator hooks and per-turn reports.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camp::{CampConfig, ItemUse};
use crate::crossings::{CrossingChoice, CrossingConfig, CrossingOutcome, RiverConditions};
use crate::error::GameError;
use crate::hazards::{HazardConfig, HazardEvent};
use crate::hunt::{HuntConfig, HuntOutcome};
use crate::market::{Listing, Market, Trade};
use crate::state::{Ending, GameState};
use crate::trail::Landmark;
use crate::weather::WeatherConfig;

pub mod daily;
mod phase;
pub mod session;

pub use daily::{
    UpkeepOutcome, actual_miles, apply_daily_upkeep, stranded_cause, travel_multiplier,
};
pub use session::{ActionOutcome, JourneySession};

/// Where the turn loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    AwaitingInput,
    ComputingTravel,
    ResolvingEvents,
    CheckingTermination,
    GameOver,
}

impl TurnPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingInput => "awaiting_input",
            Self::ComputingTravel => "computing_travel",
            Self::ResolvingEvents => "resolving_events",
            Self::CheckingTermination => "checking_termination",
            Self::GameOver => "game_over",
        }
    }
}

/// Travel pacing, wear and daily rations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelConfig {
    #[serde(default = "TravelConfig::default_rain_multiplier")]
    pub rain_multiplier: f32,
    #[serde(default = "TravelConfig::default_snow_multiplier")]
    pub snow_multiplier: f32,
    #[serde(default = "TravelConfig::default_worn_wagon_condition")]
    pub worn_wagon_condition: f32,
    #[serde(default = "TravelConfig::default_worn_wagon_multiplier")]
    pub worn_wagon_multiplier: f32,
    /// Stacks with the worn-wagon multiplier.
    #[serde(default = "TravelConfig::default_failing_wagon_condition")]
    pub failing_wagon_condition: f32,
    #[serde(default = "TravelConfig::default_failing_wagon_multiplier")]
    pub failing_wagon_multiplier: f32,
    #[serde(default = "TravelConfig::default_weak_oxen_health")]
    pub weak_oxen_health: f32,
    #[serde(default = "TravelConfig::default_weak_oxen_multiplier")]
    pub weak_oxen_multiplier: f32,
    #[serde(default = "TravelConfig::default_fatigue_per_mile")]
    pub fatigue_per_mile: f32,
    #[serde(default = "TravelConfig::default_wear_per_mile")]
    pub wear_per_mile: f32,
    /// Pounds of food eaten per party member each day.
    #[serde(default = "TravelConfig::default_rations_per_person")]
    pub rations_per_person: u32,
    #[serde(default = "TravelConfig::default_starvation_damage")]
    pub starvation_damage: i32,
    #[serde(default = "TravelConfig::default_starvation_hunger")]
    pub starvation_hunger: i32,
}

impl TravelConfig {
    const fn default_rain_multiplier() -> f32 {
        0.7
    }
    const fn default_snow_multiplier() -> f32 {
        0.4
    }
    const fn default_worn_wagon_condition() -> f32 {
        50.0
    }
    const fn default_worn_wagon_multiplier() -> f32 {
        0.8
    }
    const fn default_failing_wagon_condition() -> f32 {
        30.0
    }
    const fn default_failing_wagon_multiplier() -> f32 {
        0.5
    }
    const fn default_weak_oxen_health() -> f32 {
        50.0
    }
    const fn default_weak_oxen_multiplier() -> f32 {
        0.7
    }
    const fn default_fatigue_per_mile() -> f32 {
        0.1
    }
    const fn default_wear_per_mile() -> f32 {
        0.05
    }
    const fn default_rations_per_person() -> u32 {
        2
    }
    const fn default_starvation_damage() -> i32 {
        5
    }
    const fn default_starvation_hunger() -> i32 {
        10
    }

    fn validate(&self) -> Result<(), JourneyConfigError> {
        for (field, value) in [
            ("travel.rain_multiplier", self.rain_multiplier),
            ("travel.snow_multiplier", self.snow_multiplier),
            ("travel.worn_wagon_multiplier", self.worn_wagon_multiplier),
            ("travel.failing_wagon_multiplier", self.failing_wagon_multiplier),
            ("travel.weak_oxen_multiplier", self.weak_oxen_multiplier),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(JourneyConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        for (field, value) in [
            ("travel.fatigue_per_mile", self.fatigue_per_mile),
            ("travel.wear_per_mile", self.wear_per_mile),
        ] {
            if value < 0.0 {
                return Err(JourneyConfigError::MinViolation {
                    field,
                    min: 0.0,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            rain_multiplier: Self::default_rain_multiplier(),
            snow_multiplier: Self::default_snow_multiplier(),
            worn_wagon_condition: Self::default_worn_wagon_condition(),
            worn_wagon_multiplier: Self::default_worn_wagon_multiplier(),
            failing_wagon_condition: Self::default_failing_wagon_condition(),
            failing_wagon_multiplier: Self::default_failing_wagon_multiplier(),
            weak_oxen_health: Self::default_weak_oxen_health(),
            weak_oxen_multiplier: Self::default_weak_oxen_multiplier(),
            fatigue_per_mile: Self::default_fatigue_per_mile(),
            wear_per_mile: Self::default_wear_per_mile(),
            rations_per_person: Self::default_rations_per_person(),
            starvation_damage: Self::default_starvation_damage(),
            starvation_hunger: Self::default_starvation_hunger(),
        }
    }
}

/// Every tunable of one journey. Missing JSON fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JourneyCfg {
    #[serde(default)]
    pub travel: TravelConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub hazards: HazardConfig,
    #[serde(default)]
    pub crossing: CrossingConfig,
    #[serde(default)]
    pub camp: CampConfig,
    #[serde(default)]
    pub hunt: HuntConfig,
}

fn check_probability(field: &'static str, value: f32) -> Result<(), JourneyConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(JourneyConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}

fn check_bounds(field: &'static str, min: u32, max: u32) -> Result<(), JourneyConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(JourneyConfigError::InvertedRange { field, min, max })
    }
}

impl JourneyCfg {
    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `JourneyConfigError` for probabilities outside `0..=1`,
    /// non-positive multipliers and inverted ranges.
    pub fn validate(&self) -> Result<(), JourneyConfigError> {
        self.travel.validate()?;
        check_probability("weather.rain_chance", self.weather.rain_chance)?;
        check_probability("weather.snow_chance", self.weather.snow_chance)?;
        check_probability(
            "weather.rain_chance + weather.snow_chance",
            self.weather.rain_chance + self.weather.snow_chance,
        )?;
        check_probability("hazards.accident_chance", self.hazards.accident_chance)?;
        check_probability("hazards.illness_chance", self.hazards.illness_chance)?;
        check_probability("hazards.weather_chance", self.hazards.weather_chance)?;
        check_probability("hazards.resource_chance", self.hazards.resource_chance)?;
        if self.hazards.illnesses.is_empty() {
            return Err(JourneyConfigError::Empty("hazards.illnesses"));
        }
        check_probability("hunt.base_success", self.hunt.base_success)?;
        check_probability(
            "hunt.base_success + hunt.rifle_bonus",
            self.hunt.base_success + self.hunt.rifle_bonus,
        )?;
        check_bounds("hunt.food", self.hunt.food_min, self.hunt.food_max)?;
        let crossing = &self.crossing;
        check_bounds("crossing.items_lost", crossing.items_lost_min, crossing.items_lost_max)?;
        check_bounds(
            "crossing.wagon_damage",
            crossing.wagon_damage_min,
            crossing.wagon_damage_max,
        )?;
        check_bounds(
            "crossing.player_damage",
            crossing.player_damage_min,
            crossing.player_damage_max,
        )?;
        if crossing.max_prompts == 0 {
            return Err(JourneyConfigError::MinViolation {
                field: "crossing.max_prompts",
                min: 1.0,
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Errors raised when journey configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum JourneyConfigError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f32,
        value: f32,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{field} range invalid (min {min} > max {max})")]
    InvertedRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// What the party sees on the bank before choosing how to cross.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverPrompt {
    pub landmark: String,
    pub conditions: RiverConditions,
    pub ford_chance: u32,
    pub ferry_cost: u32,
    pub guide_cost: u32,
    pub money: u32,
    /// One-based prompt count for this river.
    pub attempt: u32,
}

/// Trading window opened when the party arrives at a trade post.
pub struct TradeDesk<'a> {
    market: &'a Market,
    state: &'a mut GameState,
    trades: Vec<Trade>,
}

impl<'a> TradeDesk<'a> {
    pub(crate) const fn new(market: &'a Market, state: &'a mut GameState) -> Self {
        Self {
            market,
            state,
            trades: Vec::new(),
        }
    }

    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        self.market.listings()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        self.state
    }

    /// # Errors
    ///
    /// Returns `PreconditionNotMet` when funds or room are short; nothing changes.
    pub fn buy(&mut self, item: &str, quantity: u32) -> Result<Trade, GameError> {
        let trade = self.market.buy(self.state, item, quantity)?;
        self.state.push_log(trade.to_string());
        self.trades.push(trade.clone());
        Ok(trade)
    }

    /// # Errors
    ///
    /// Returns `PreconditionNotMet` when the party lacks the goods; nothing changes.
    pub fn sell(&mut self, item: &str, quantity: u32) -> Result<Trade, GameError> {
        let trade = self.market.sell(self.state, item, quantity)?;
        self.state.push_log(trade.to_string());
        self.trades.push(trade.clone());
        Ok(trade)
    }

    pub(crate) fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

/// External collaborators consulted mid-turn.
pub trait JourneyHooks {
    /// Pick how to cross. Called again after a wait or an unaffordable fee.
    fn choose_crossing(&mut self, prompt: &RiverPrompt) -> CrossingChoice;

    /// Offered once per trade post reached during travel.
    fn trade_opportunity(&mut self, _landmark: &Landmark, _desk: &mut TradeDesk<'_>) {}
}

/// Non-interactive hooks: always the same crossing, never trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoHooks {
    pub crossing: CrossingChoice,
}

impl AutoHooks {
    #[must_use]
    pub const fn new(crossing: CrossingChoice) -> Self {
        Self { crossing }
    }
}

impl JourneyHooks for AutoHooks {
    fn choose_crossing(&mut self, _prompt: &RiverPrompt) -> CrossingChoice {
        self.crossing
    }
}

/// Something that happened during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail", rename_all = "snake_case")]
pub enum TurnEvent {
    Hazard(HazardEvent),
    Crossing {
        landmark: String,
        choice: CrossingChoice,
        outcome: CrossingOutcome,
    },
    Waited {
        landmark: String,
    },
    Trade(Trade),
    Hunt(HuntOutcome),
    ItemUsed(ItemUse),
    Rested,
    Starved {
        shortfall_lbs: u32,
    },
}

/// Result of one day-consuming action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub day: u32,
    pub date: String,
    pub miles: u32,
    pub landmark_reached: Option<String>,
    pub events: Vec<TurnEvent>,
    pub messages: Vec<String>,
    pub ending: Option<Ending>,
}
