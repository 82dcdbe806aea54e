//! Phase-scoped steps of one travel turn.
//!
//! Each phase borrows only what it mutates and records the turn-loop state on
//! the game state before doing any work.

use log::{debug, info};

use crate::command::Direction;
use crate::crossings::{
    CrossingChoice, CrossingOutcome, attempt_ford, ford_success_chance, generate_conditions,
};
use crate::error::GameError;
use crate::hazards::resolve_daily_hazards;
use crate::journey::daily::{
    UpkeepOutcome, actual_miles, apply_travel_wear, stranded_cause, travel_multiplier,
};
use crate::journey::{
    JourneyCfg, JourneyHooks, RiverPrompt, TradeDesk, TravelConfig, TurnEvent, TurnPhase,
    apply_daily_upkeep,
};
use crate::market::Market;
use crate::party::MAX_GAUGE;
use crate::rng::RngBundle;
use crate::state::{Ending, GameState};
use crate::trail::Landmark;

/// Distance covered by a travel phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TravelLeg {
    pub(super) miles: u32,
    pub(super) previous_index: usize,
    pub(super) upkeep: UpkeepOutcome,
}

pub(super) struct TravelPhase<'a> {
    state: &'a mut GameState,
    cfg: &'a TravelConfig,
}

impl<'a> TravelPhase<'a> {
    pub(super) const fn new(state: &'a mut GameState, cfg: &'a TravelConfig) -> Self {
        Self { state, cfg }
    }

    pub(super) fn run(&mut self, direction: Direction, intended: u32) -> TravelLeg {
        self.state.phase = TurnPhase::ComputingTravel;
        let multiplier = travel_multiplier(self.state, self.cfg);
        let miles = actual_miles(intended, multiplier);
        let previous_index = self.state.trail.landmark_index();
        self.state.trail.advance(miles);
        self.state.clock.advance_day();
        self.state.day += 1;
        apply_travel_wear(self.state, miles, self.cfg);
        debug!(
            "day {} travel intended={intended} multiplier={multiplier:.2} actual={miles}",
            self.state.day
        );
        let line = format!(
            "You traveled {miles} miles {direction} under {} skies. {} miles to {}.",
            self.state.weather.today,
            self.state.trail.distance_to_next_landmark(),
            self.state
                .trail
                .next_landmark()
                .map_or("the end of the trail", |landmark| landmark.name.as_str()),
        );
        self.state.push_log(line);
        let upkeep = apply_daily_upkeep(self.state, self.cfg);
        TravelLeg {
            miles,
            previous_index,
            upkeep,
        }
    }
}

pub(super) struct EventPhase<'a, H: JourneyHooks + ?Sized> {
    state: &'a mut GameState,
    cfg: &'a JourneyCfg,
    rngs: &'a mut RngBundle,
    market: &'a Market,
    hooks: &'a mut H,
}

impl<'a, H: JourneyHooks + ?Sized> EventPhase<'a, H> {
    pub(super) const fn new(
        state: &'a mut GameState,
        cfg: &'a JourneyCfg,
        rngs: &'a mut RngBundle,
        market: &'a Market,
        hooks: &'a mut H,
    ) -> Self {
        Self {
            state,
            cfg,
            rngs,
            market,
            hooks,
        }
    }

    /// Hazards in fixed order, then each newly reached landmark: river first, then trade.
    pub(super) fn run(&mut self, previous_index: usize) -> Vec<TurnEvent> {
        self.state.phase = TurnPhase::ResolvingEvents;
        let mut events = Vec::new();
        for hazard in resolve_daily_hazards(self.state, &self.cfg.hazards, self.rngs.hazards()) {
            self.state.push_log(hazard.to_string());
            events.push(TurnEvent::Hazard(hazard));
        }

        let reached = self.state.trail.reached_since(previous_index).to_vec();
        for landmark in &reached {
            info!("{} reached {}", self.state.player.name, landmark.name);
            self.state
                .push_log(format!("You have reached {}. {}", landmark.name, landmark.description));
            if !landmark.historical_note.is_empty() {
                self.state
                    .push_log(format!("Historical note: {}", landmark.historical_note));
            }
            if !self.state.player.is_alive() {
                break;
            }
            if landmark.has_river {
                self.cross_river(landmark, &mut events);
            }
            if landmark.is_trade_post && self.state.player.is_alive() {
                let mut desk = TradeDesk::new(self.market, self.state);
                self.hooks.trade_opportunity(landmark, &mut desk);
                events.extend(desk.into_trades().into_iter().map(TurnEvent::Trade));
            }
        }
        events
    }

    /// Prompt until the party crosses. Waiting passes a day and re-rolls the
    /// river; after the prompt cap the party fords.
    fn cross_river(&mut self, landmark: &Landmark, events: &mut Vec<TurnEvent>) {
        let cfg: &'a JourneyCfg = self.cfg;
        let crossing = &cfg.crossing;
        let mut conditions =
            generate_conditions(self.state.weather.today, crossing, self.rngs.crossing());
        for attempt in 1..=crossing.max_prompts {
            let prompt = RiverPrompt {
                landmark: landmark.name.clone(),
                conditions,
                ford_chance: ford_success_chance(conditions, self.state.wagon.condition(), crossing),
                ferry_cost: crossing.ferry_cost,
                guide_cost: crossing.guide_cost,
                money: self.state.money(),
                attempt,
            };
            let choice = self.hooks.choose_crossing(&prompt);
            let outcome = match choice {
                CrossingChoice::Ford => {
                    attempt_ford(self.state, conditions, crossing, self.rngs.crossing())
                }
                CrossingChoice::Ferry | CrossingChoice::Guide => {
                    let cost = crossing.cost_of(choice);
                    if !self.state.purse.spend(cost) {
                        let err = GameError::precondition(
                            "cross",
                            format!(
                                "the {choice} costs ${cost} but you only have ${}",
                                self.state.money()
                            ),
                        );
                        debug!("{err}");
                        self.state.push_log(err.to_string());
                        continue;
                    }
                    if choice == CrossingChoice::Ferry {
                        CrossingOutcome::Ferried { cost }
                    } else {
                        CrossingOutcome::Guided { cost }
                    }
                }
                CrossingChoice::Wait => {
                    self.state.clock.advance_day();
                    self.state.day += 1;
                    self.state.player.heal(crossing.wait_heal);
                    let month = self.state.clock.month();
                    let weather = self
                        .state
                        .weather
                        .roll_daily(self.rngs.weather(), month, &cfg.weather);
                    conditions = generate_conditions(weather, crossing, self.rngs.crossing());
                    self.state.push_log(format!(
                        "You wait a day on the bank of the {}.",
                        landmark.name
                    ));
                    events.push(TurnEvent::Waited {
                        landmark: landmark.name.clone(),
                    });
                    continue;
                }
            };
            self.record_crossing(landmark, choice, outcome, events);
            return;
        }
        debug!(
            "crossing prompt cap of {} reached at {}",
            crossing.max_prompts, landmark.name
        );
        let outcome = attempt_ford(self.state, conditions, crossing, self.rngs.crossing());
        self.record_crossing(landmark, CrossingChoice::Ford, outcome, events);
    }

    fn record_crossing(
        &mut self,
        landmark: &Landmark,
        choice: CrossingChoice,
        outcome: CrossingOutcome,
        events: &mut Vec<TurnEvent>,
    ) {
        debug!("crossing at {} via {choice}: {outcome:?}", landmark.name);
        self.state.push_log(outcome.to_string());
        events.push(TurnEvent::Crossing {
            landmark: landmark.name.clone(),
            choice,
            outcome,
        });
    }
}

pub(super) struct TerminationPhase<'a> {
    state: &'a mut GameState,
}

impl<'a> TerminationPhase<'a> {
    pub(super) const fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Death outranks victory, which outranks winter. At most one ending is recorded.
    /// A stranded party dies where it stands.
    pub(super) fn run(&mut self) -> Option<Ending> {
        self.state.phase = TurnPhase::CheckingTermination;
        if self.state.player.is_alive()
            && let Some(cause) = stranded_cause(self.state)
        {
            self.state.player.apply_damage(MAX_GAUGE, cause);
        }
        let ending = if !self.state.player.is_alive() {
            Some(Ending::Death {
                cause: self
                    .state
                    .player
                    .cause_of_death()
                    .unwrap_or("unknown causes")
                    .to_string(),
            })
        } else if self.state.trail.miles_traveled() >= self.state.trail.total_miles() {
            Some(Ending::Victory)
        } else if self.state.clock.is_winter() {
            Some(Ending::Winter)
        } else {
            None
        };
        match &ending {
            Some(ending) => {
                info!("journey ended on day {}: {}", self.state.day, ending.key());
                self.state.push_log(ending.to_string());
                self.state.ending = Some(ending.clone());
                self.state.phase = TurnPhase::GameOver;
            }
            None => self.state.phase = TurnPhase::AwaitingInput,
        }
        ending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::AutoHooks;
    use crate::state::JourneySetup;
    use crate::weather::Weather;

    fn state() -> GameState {
        GameState::new(&JourneySetup::default(), 2024).unwrap()
    }

    #[test]
    fn travel_phase_advances_one_day_and_position() {
        let mut state = state();
        let cfg = TravelConfig::default();
        let leg = TravelPhase::new(&mut state, &cfg).run(Direction::West, 83);
        assert_eq!(leg.miles, 83);
        assert_eq!(leg.previous_index, 0);
        assert_eq!(state.day, 1);
        assert_eq!(state.clock.date_label(), "April 2, 1847");
        assert_eq!(state.trail.current_landmark().name, "Kansas River Crossing");
        assert_eq!(state.phase, TurnPhase::ComputingTravel);
        assert_eq!(state.player.fatigue(), 8);
        assert_eq!(state.food_lbs(), 42);
    }

    #[test]
    fn termination_prefers_death_over_victory() {
        let mut state = state();
        state.trail.advance(10_000);
        state.player.apply_damage(150, "accident");
        let ending = TerminationPhase::new(&mut state).run();
        assert_eq!(
            ending,
            Some(Ending::Death {
                cause: String::from("accident")
            })
        );
        assert_eq!(state.phase, TurnPhase::GameOver);
        assert_eq!(
            state.logs.last().map(String::as_str),
            Some("Game Over: your party has died from accident")
        );
    }

    #[test]
    fn termination_prefers_victory_over_winter() {
        let mut state = state();
        state.trail.advance(10_000);
        state.clock.set_month(12).unwrap();
        assert_eq!(TerminationPhase::new(&mut state).run(), Some(Ending::Victory));

        let mut state = self::state();
        state.clock.set_month(12).unwrap();
        assert_eq!(TerminationPhase::new(&mut state).run(), Some(Ending::Winter));

        let mut state = self::state();
        assert_eq!(TerminationPhase::new(&mut state).run(), None);
        assert_eq!(state.phase, TurnPhase::AwaitingInput);
        assert!(state.ending.is_none());
    }

    #[test]
    fn wrecked_wagon_strands_the_party_before_victory() {
        let mut state = state();
        state.trail.advance(10_000);
        state.wagon.restore_condition(0.0);
        assert_eq!(
            TerminationPhase::new(&mut state).run(),
            Some(Ending::Death {
                cause: String::from("being stranded with a broken wagon")
            })
        );
        assert!(!state.player.is_alive());
        assert_eq!(state.phase, TurnPhase::GameOver);
    }

    #[test]
    fn losing_every_ox_ends_the_journey() {
        let mut state = state();
        state.oxen = crate::oxen::OxTeam::default();
        let ending = TerminationPhase::new(&mut state).run();
        assert_eq!(
            ending.map(|ending| ending.to_string()),
            Some(String::from(
                "Game Over: your party has died from being stranded without oxen"
            ))
        );
    }

    #[test]
    fn ferry_crossing_charges_the_fee() {
        let mut state = state();
        let cfg = JourneyCfg {
            hazards: crate::hazards::HazardConfig::calm(),
            ..JourneyCfg::default()
        };
        let mut rngs = RngBundle::from_user_seed(5);
        let market = Market::load_from_static().unwrap();
        let mut hooks = AutoHooks::new(CrossingChoice::Ferry);
        state.trail.advance(83);
        state.weather.today = Weather::Clear;
        let events =
            EventPhase::new(&mut state, &cfg, &mut rngs, &market, &mut hooks).run(0);
        assert_eq!(
            events,
            vec![TurnEvent::Crossing {
                landmark: String::from("Kansas River Crossing"),
                choice: CrossingChoice::Ferry,
                outcome: CrossingOutcome::Ferried { cost: 5 },
            }]
        );
        assert_eq!(state.money(), 995);
        assert_eq!(state.phase, TurnPhase::ResolvingEvents);
        let arrival = state
            .logs
            .iter()
            .position(|line| line.starts_with("You have reached Kansas River Crossing."))
            .unwrap();
        assert_eq!(
            state.logs[arrival + 1],
            format!("Historical note: {}", state.trail.current_landmark().historical_note)
        );
    }
}
