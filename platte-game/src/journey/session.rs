use log::{debug, info};

use crate::camp::{ItemUse, camp_rest, use_item};
use crate::command::{Direction, TurnAction};
use crate::error::GameError;
use crate::hunt::{HuntOutcome, resolve_hunt};
use crate::journey::phase::{EventPhase, TerminationPhase, TravelPhase};
use crate::journey::{JourneyCfg, JourneyHooks, TurnEvent, TurnReport, apply_daily_upkeep};
use crate::market::{Market, Trade};
use crate::rng::RngBundle;
use crate::state::{GameState, JourneySetup, SetupError};

/// What a single command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A day passed.
    Turn(TurnReport),
    Traded(Trade),
    ItemUsed(ItemUse),
    Status(String),
    /// One line per stack, then the wagon and the team.
    Inventory(Vec<String>),
    SaveRequested,
    Quit,
}

/// One journey: the game state, its tuning, the market and the seeded RNG streams.
#[derive(Debug, Clone)]
pub struct JourneySession {
    state: GameState,
    cfg: JourneyCfg,
    market: Market,
    rngs: RngBundle,
}

fn to_u32(field: &'static str, value: i64) -> Result<u32, GameError> {
    u32::try_from(value).map_err(|_| GameError::out_of_range(field, value))
}

impl JourneySession {
    /// Outfit a new party and seed its RNG streams.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] for an invalid configuration, bad setup values or
    /// unreadable embedded data.
    pub fn new(setup: &JourneySetup, seed: u64, cfg: JourneyCfg) -> Result<Self, SetupError> {
        cfg.validate()?;
        let state = GameState::new(setup, seed)?;
        Ok(Self {
            state,
            cfg,
            market: Market::load_from_static()?,
            rngs: RngBundle::from_user_seed(seed),
        })
    }

    /// Resume from a restored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] for an invalid configuration or unreadable market data.
    pub fn from_state(state: GameState, cfg: JourneyCfg) -> Result<Self, SetupError> {
        cfg.validate()?;
        let rngs = RngBundle::resume(state.seed, state.day);
        Ok(Self {
            state,
            cfg,
            market: Market::load_from_static()?,
            rngs,
        })
    }

    /// Dispatch a parsed command.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying action; see [`GameError`].
    pub fn act<H: JourneyHooks + ?Sized>(
        &mut self,
        action: TurnAction,
        hooks: &mut H,
    ) -> Result<ActionOutcome, GameError> {
        match action {
            TurnAction::Travel { direction, miles } => {
                self.travel(direction, miles, hooks).map(ActionOutcome::Turn)
            }
            TurnAction::Rest => self.rest().map(ActionOutcome::Turn),
            TurnAction::Hunt => self.hunt().map(ActionOutcome::Turn),
            TurnAction::UseItem { item } => self.use_item(&item).map(ActionOutcome::ItemUsed),
            TurnAction::Buy { item, quantity } => {
                self.buy(&item, quantity).map(ActionOutcome::Traded)
            }
            TurnAction::Sell { item, quantity } => {
                self.sell(&item, quantity).map(ActionOutcome::Traded)
            }
            TurnAction::Status => Ok(ActionOutcome::Status(self.state.status_line())),
            TurnAction::Inventory => Ok(ActionOutcome::Inventory(self.state.inventory_report())),
            TurnAction::Save => Ok(ActionOutcome::SaveRequested),
            TurnAction::Quit => {
                info!("{} abandoned the journey on day {}", self.state.player.name, self.state.day);
                Ok(ActionOutcome::Quit)
            }
        }
    }

    /// Travel one day: compute distance, resolve events, check for an ending.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for negative miles and `GameOver` once the journey
    /// has ended. Neither consumes the turn.
    pub fn travel<H: JourneyHooks + ?Sized>(
        &mut self,
        direction: Direction,
        miles: i64,
        hooks: &mut H,
    ) -> Result<TurnReport, GameError> {
        self.ensure_active()?;
        let intended = to_u32("miles", miles)?;
        let log_mark = self.state.logs.len();
        self.roll_weather();
        let leg = TravelPhase::new(&mut self.state, &self.cfg.travel).run(direction, intended);
        let mut events = Vec::new();
        if leg.upkeep.starving() {
            events.push(TurnEvent::Starved {
                shortfall_lbs: leg.upkeep.shortfall_lbs,
            });
        }
        events.extend(
            EventPhase::new(
                &mut self.state,
                &self.cfg,
                &mut self.rngs,
                &self.market,
                hooks,
            )
            .run(leg.previous_index),
        );
        let landmark_reached = self
            .state
            .trail
            .reached_since(leg.previous_index)
            .last()
            .map(|landmark| landmark.name.clone());
        Ok(self.finish_turn(log_mark, leg.miles, landmark_reached, events))
    }

    /// Rest in camp for a day. No hazards are rolled.
    ///
    /// # Errors
    ///
    /// Returns `GameOver` once the journey has ended.
    pub fn rest(&mut self) -> Result<TurnReport, GameError> {
        self.ensure_active()?;
        let log_mark = self.state.logs.len();
        self.roll_weather();
        let line = camp_rest(&mut self.state, &self.cfg.camp);
        self.state.push_log(line);
        let mut events = vec![TurnEvent::Rested];
        events.extend(self.pass_camp_day());
        Ok(self.finish_turn(log_mark, 0, None, events))
    }

    /// Spend the day hunting.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` without spending the day or any ammunition
    /// when the party has no weapon or no ammunition.
    pub fn hunt(&mut self) -> Result<TurnReport, GameError> {
        self.ensure_active()?;
        let log_mark = self.state.logs.len();
        let outcome = resolve_hunt(&mut self.state, &self.cfg.hunt, self.rngs.hunt())?;
        self.roll_weather();
        let line = match outcome {
            HuntOutcome::Success { food_lbs } => {
                format!("The hunt was a success! You gained {food_lbs} lbs of food.")
            }
            HuntOutcome::Missed => String::from("The hunt failed; you return empty-handed."),
        };
        self.state.push_log(line);
        let mut events = vec![TurnEvent::Hunt(outcome)];
        events.extend(self.pass_camp_day());
        Ok(self.finish_turn(log_mark, 0, None, events))
    }

    /// Use one carried item. Does not spend a day.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` for missing or unusable items.
    pub fn use_item(&mut self, item: &str) -> Result<ItemUse, GameError> {
        self.ensure_active()?;
        let used = use_item(&mut self.state, item, &self.cfg.camp)?;
        self.state.push_log(used.describe());
        Ok(used)
    }

    /// Buy at the trade post the party is standing at. Does not spend a day.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` away from a trade post or when funds or
    /// room are short, `OutOfRange` for a non-positive quantity and
    /// `InvalidInput` for goods the post does not list.
    pub fn buy(&mut self, item: &str, quantity: i64) -> Result<Trade, GameError> {
        self.ensure_trade_post()?;
        let quantity = to_u32("quantity", quantity)?;
        let trade = self.market.buy(&mut self.state, item, quantity)?;
        self.state.push_log(trade.to_string());
        Ok(trade)
    }

    /// Sell at the trade post the party is standing at. Does not spend a day.
    ///
    /// # Errors
    ///
    /// As [`Self::buy`], with a precondition failure when the party holds too
    /// few of the goods.
    pub fn sell(&mut self, item: &str, quantity: i64) -> Result<Trade, GameError> {
        self.ensure_trade_post()?;
        let quantity = to_u32("quantity", quantity)?;
        let trade = self.market.sell(&mut self.state, item, quantity)?;
        self.state.push_log(trade.to_string());
        Ok(trade)
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        match &self.state.ending {
            Some(ending) => Err(GameError::GameOver(ending.to_string())),
            None => Ok(()),
        }
    }

    fn ensure_trade_post(&self) -> Result<(), GameError> {
        self.ensure_active()?;
        let here = self.state.trail.current_landmark();
        if here.is_trade_post {
            Ok(())
        } else {
            Err(GameError::precondition(
                "trade",
                format!("there is no trading post at {}", here.name),
            ))
        }
    }

    fn roll_weather(&mut self) {
        let month = self.state.clock.month();
        let weather = self
            .state
            .weather
            .roll_daily(self.rngs.weather(), month, &self.cfg.weather);
        debug!(
            "day {} weather {weather} strength {}",
            self.state.day + 1,
            self.state.weather.strength
        );
    }

    /// A day spent in camp: the clock moves and the party eats.
    fn pass_camp_day(&mut self) -> Option<TurnEvent> {
        self.state.clock.advance_day();
        self.state.day += 1;
        let upkeep = apply_daily_upkeep(&mut self.state, &self.cfg.travel);
        upkeep.starving().then_some(TurnEvent::Starved {
            shortfall_lbs: upkeep.shortfall_lbs,
        })
    }

    fn finish_turn(
        &mut self,
        log_mark: usize,
        miles: u32,
        landmark_reached: Option<String>,
        events: Vec<TurnEvent>,
    ) -> TurnReport {
        let ending = TerminationPhase::new(&mut self.state).run();
        TurnReport {
            day: self.state.day,
            date: self.state.clock.date_label(),
            miles,
            landmark_reached,
            events,
            messages: self.state.logs[log_mark..].to_vec(),
            ending,
        }
    }

    /// Status line for the current state.
    #[must_use]
    pub fn status(&self) -> String {
        self.state.status_line()
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub const fn config(&self) -> &JourneyCfg {
        &self.cfg
    }

    #[must_use]
    pub const fn market(&self) -> &Market {
        &self.market
    }

    /// Draws taken across every RNG stream since the session was built.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rngs.total_draws()
    }

    /// Borrow the underlying immutable game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Borrow the underlying mutable game state.
    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Apply a closure to the mutable game state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    /// Deterministically reseed the session.
    pub fn reseed(&mut self, seed: u64) {
        self.state.seed = seed;
        self.rngs = RngBundle::resume(seed, self.state.day);
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
