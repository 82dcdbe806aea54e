use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{Clock, DEPARTURE_MONTHS};
use crate::error::GameError;
use crate::inventory::Inventory;
use crate::journey::{JourneyConfigError, TurnPhase};
use crate::ledger::Purse;
use crate::market::MarketError;
use crate::oxen::OxTeam;
use crate::party::Player;
use crate::trail::{Trail, TrailDataError, TrailVariant};
use crate::wagon::{Wagon, WagonType};
use crate::weather::WeatherState;

const DEFAULT_PARTY_SIZE: u32 = 4;
const DEFAULT_MONEY: u32 = 1_000;
const DEFAULT_OXEN: usize = 4;
const DEFAULT_DEPARTURE_MONTH: u32 = 4;

/// How a journey ended. Exactly one is ever recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ending {
    Death { cause: String },
    Victory,
    Winter,
}

impl Ending {
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Death { .. } => "death",
            Self::Victory => "victory",
            Self::Winter => "winter",
        }
    }

    #[must_use]
    pub const fn is_victory(&self) -> bool {
        matches!(self, Self::Victory)
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Death { cause } => write!(f, "Game Over: your party has died from {cause}"),
            Self::Victory => f.write_str("Your party has reached its destination!"),
            Self::Winter => {
                f.write_str("Game Over: winter has set in and your party is trapped by the snow")
            }
        }
    }
}

/// Choices made before leaving the trailhead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneySetup {
    pub player_name: String,
    pub trail: TrailVariant,
    pub departure_month: u32,
    pub party_size: u32,
    pub money: u32,
    pub oxen: usize,
    pub wagon: WagonType,
}

impl Default for JourneySetup {
    fn default() -> Self {
        Self {
            player_name: String::from("Pioneer"),
            trail: TrailVariant::default(),
            departure_month: DEFAULT_DEPARTURE_MONTH,
            party_size: DEFAULT_PARTY_SIZE,
            money: DEFAULT_MONEY,
            oxen: DEFAULT_OXEN,
            wagon: WagonType::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Trail(#[from] TrailDataError),
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error("invalid journey configuration: {0}")]
    Config(#[from] JourneyConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Everything one journey owns. Serialises as the opaque save snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    /// Days elapsed since departure.
    #[serde(default)]
    pub day: u32,
    pub trail: Trail,
    pub clock: Clock,
    #[serde(default)]
    pub weather: WeatherState,
    pub player: Player,
    pub party_size: u32,
    #[serde(default)]
    pub wagon: Wagon,
    #[serde(default)]
    pub oxen: OxTeam,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub purse: Purse,
    #[serde(default)]
    pub phase: TurnPhase,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl GameState {
    /// Outfit a party at the trailhead.
    ///
    /// # Errors
    ///
    /// Returns an error when the trail data cannot be loaded or the departure
    /// month or party size is out of range.
    pub fn new(setup: &JourneySetup, seed: u64) -> Result<Self, SetupError> {
        if !DEPARTURE_MONTHS.contains(&setup.departure_month) {
            return Err(GameError::out_of_range("departure month", setup.departure_month).into());
        }
        if setup.party_size == 0 {
            return Err(GameError::out_of_range("party size", 0).into());
        }
        let trail = Trail::for_variant(setup.trail)?;
        let clock = Clock::departing(setup.departure_month)?;
        let mut state = Self {
            seed,
            day: 0,
            trail,
            clock,
            weather: WeatherState::default(),
            player: Player::new(setup.player_name.clone()),
            party_size: setup.party_size,
            wagon: Wagon::new(setup.wagon),
            oxen: OxTeam::with_count(setup.oxen),
            inventory: Inventory::starting_kit(),
            purse: Purse::new(setup.money),
            phase: TurnPhase::AwaitingInput,
            ending: None,
            logs: Vec::new(),
        };
        let opening = format!(
            "{} sets out from {} on the {}, {}.",
            state.player.name,
            state.trail.start(),
            setup.trail.display_name(),
            state.clock.date_label()
        );
        state.push_log(opening);
        Ok(state)
    }

    /// Append a line to the journey journal.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.ending.is_some()
    }

    #[must_use]
    pub fn food_lbs(&self) -> u32 {
        self.inventory.food_lbs()
    }

    #[must_use]
    pub const fn money(&self) -> u32 {
        self.purse.balance()
    }

    /// One-line status used by consoles and reports.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "{} | {} | {}/{} mi | health {} | food {} lbs | ${} | wagon {:.0}{} | oxen {} (avg {:.0})",
            self.clock.date_label(),
            self.weather.today,
            self.trail.miles_traveled(),
            self.trail.total_miles(),
            self.player.health(),
            self.food_lbs(),
            self.money(),
            self.wagon.condition(),
            if self.wagon.is_broken() { " (broken)" } else { "" },
            self.oxen.len(),
            self.oxen.average_health(),
        )
    }

    /// Carried goods, then the wagon load, then the team.
    #[must_use]
    pub fn inventory_report(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .inventory
            .items()
            .iter()
            .map(|item| {
                format!(
                    "{item} ({} lbs, worth ${})",
                    item.total_weight(),
                    item.total_value()
                )
            })
            .collect();
        if lines.is_empty() {
            lines.push(String::from("The wagon is empty."));
        }
        lines.push(format!(
            "{}: {}/{} lbs, condition {:.0}{}",
            self.wagon.kind,
            self.inventory.load_lbs(),
            self.wagon.capacity_lbs(),
            self.wagon.condition(),
            if self.wagon.is_broken() { " (broken)" } else { "" },
        ));
        let team: Vec<String> = self
            .oxen
            .oxen()
            .iter()
            .map(|ox| format!("{} ({})", ox.name, ox.health()))
            .collect();
        lines.push(if team.is_empty() {
            String::from("Oxen: none")
        } else {
            format!("Oxen: {}", team.join(", "))
        });
        lines
    }

    /// Serialise to the JSON snapshot format.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialisation itself fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// # Errors
    ///
    /// Returns an error when the snapshot is not a valid game state.
    pub fn from_snapshot(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
