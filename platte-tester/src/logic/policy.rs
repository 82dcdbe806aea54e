use std::fmt;
use std::str::FromStr;

use log::debug;
use platte_game::{
    CrossingChoice, Direction, GameState, JourneyHooks, Landmark, RiverPrompt, TradeDesk,
    TurnAction,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Pounds of food one person eats per day.
const FOOD_PER_PERSON: u32 = 2;

/// Policy interface for automated play.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Commands that do not spend a day, issued before the day's action.
    fn preparations(&mut self, state: &GameState) -> Vec<TurnAction>;

    /// The one day-consuming command for today.
    fn next_action(&mut self, state: &GameState) -> TurnAction;

    fn choose_crossing(&mut self, prompt: &RiverPrompt) -> CrossingChoice;

    /// Goods to buy at a trade post, as `(item, quantity)`.
    fn shopping_list(&mut self, state: &GameState) -> Vec<(String, u32)>;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameplayStrategy {
    Cautious,
    Balanced,
    Hasty,
    Gambler,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Cautious, Self::Balanced, Self::Hasty, Self::Gambler];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Balanced => "Balanced",
            Self::Hasty => "Hasty",
            Self::Gambler => "Gambler",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Cautious => Box::new(TemperamentPolicy::new(CAUTIOUS)),
            Self::Balanced => Box::new(TemperamentPolicy::new(BALANCED)),
            Self::Hasty => Box::new(TemperamentPolicy::new(HASTY)),
            Self::Gambler => Box::new(GamblerPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

/// Fixed thresholds that make up a deterministic play style.
#[derive(Debug, Clone, Copy)]
struct Temperament {
    label: &'static str,
    daily_miles: i64,
    rest_at_fatigue: i32,
    heal_below: i32,
    hunt_below_days: u32,
    stock_days: u32,
    medicine_stock: u32,
    ford_at_least: u32,
    paid_crossing: CrossingChoice,
    waits: u32,
}

const CAUTIOUS: Temperament = Temperament {
    label: "Cautious",
    daily_miles: 14,
    rest_at_fatigue: 50,
    heal_below: 70,
    hunt_below_days: 6,
    stock_days: 30,
    medicine_stock: 5,
    ford_at_least: 60,
    paid_crossing: CrossingChoice::Guide,
    waits: 2,
};

const BALANCED: Temperament = Temperament {
    label: "Balanced",
    daily_miles: 20,
    rest_at_fatigue: 70,
    heal_below: 50,
    hunt_below_days: 4,
    stock_days: 20,
    medicine_stock: 3,
    ford_at_least: 45,
    paid_crossing: CrossingChoice::Ferry,
    waits: 1,
};

const HASTY: Temperament = Temperament {
    label: "Hasty",
    daily_miles: 30,
    rest_at_fatigue: 90,
    heal_below: 25,
    hunt_below_days: 1,
    stock_days: 10,
    medicine_stock: 1,
    ford_at_least: 0,
    paid_crossing: CrossingChoice::Ford,
    waits: 0,
};

fn daily_food_need(state: &GameState) -> u32 {
    state.party_size.max(1) * FOOD_PER_PERSON
}

fn can_hunt(state: &GameState) -> bool {
    state.inventory.weapon().is_some() && state.inventory.ammunition() > 0
}

fn heal_or_repair(state: &GameState, heal_below: i32) -> Vec<TurnAction> {
    let mut actions = Vec::new();
    let player = &state.player;
    if (player.health() < heal_below || player.illness().is_some())
        && state.inventory.quantity_of("medicine") > 0
    {
        actions.push(TurnAction::UseItem {
            item: String::from("medicine"),
        });
    }
    if state.wagon.condition() < 40.0 && state.inventory.quantity_of("spare_part") > 0 {
        actions.push(TurnAction::UseItem {
            item: String::from("spare_part"),
        });
    }
    actions
}

fn buy_actions(list: Vec<(String, u32)>) -> Vec<TurnAction> {
    list.into_iter()
        .map(|(item, quantity)| TurnAction::Buy {
            item,
            quantity: i64::from(quantity),
        })
        .collect()
}

struct TemperamentPolicy {
    temperament: Temperament,
}

impl TemperamentPolicy {
    const fn new(temperament: Temperament) -> Self {
        Self { temperament }
    }
}

impl PlayerPolicy for TemperamentPolicy {
    fn name(&self) -> &'static str {
        self.temperament.label
    }

    fn preparations(&mut self, state: &GameState) -> Vec<TurnAction> {
        let mut actions = heal_or_repair(state, self.temperament.heal_below);
        if state.trail.current_landmark().is_trade_post {
            actions.extend(buy_actions(self.shopping_list(state)));
        }
        actions
    }

    fn next_action(&mut self, state: &GameState) -> TurnAction {
        let t = self.temperament;
        if state.player.fatigue() >= t.rest_at_fatigue {
            TurnAction::Rest
        } else if state.food_lbs() < t.hunt_below_days * daily_food_need(state) && can_hunt(state)
        {
            TurnAction::Hunt
        } else {
            TurnAction::Travel {
                direction: Direction::West,
                miles: t.daily_miles,
            }
        }
    }

    fn choose_crossing(&mut self, prompt: &RiverPrompt) -> CrossingChoice {
        let t = self.temperament;
        if prompt.ford_chance >= t.ford_at_least {
            return CrossingChoice::Ford;
        }
        let fee = match t.paid_crossing {
            CrossingChoice::Guide => prompt.guide_cost,
            CrossingChoice::Ferry => prompt.ferry_cost,
            CrossingChoice::Ford | CrossingChoice::Wait => 0,
        };
        if t.paid_crossing != CrossingChoice::Ford && prompt.money >= fee {
            t.paid_crossing
        } else if prompt.money >= prompt.ferry_cost && t.paid_crossing != CrossingChoice::Ford {
            CrossingChoice::Ferry
        } else if prompt.attempt <= t.waits {
            CrossingChoice::Wait
        } else {
            CrossingChoice::Ford
        }
    }

    fn shopping_list(&mut self, state: &GameState) -> Vec<(String, u32)> {
        let t = self.temperament;
        let mut list = Vec::new();
        // Keep half the purse for ferries and guides.
        let budget = state.money() / 2;
        let target = t.stock_days * daily_food_need(state);
        let food = state.food_lbs();
        if food < target && budget > 0 {
            list.push((String::from("rations"), (target - food).min(budget)));
        }
        let medicine = state.inventory.quantity_of("medicine");
        if medicine < t.medicine_stock {
            list.push((String::from("medicine"), t.medicine_stock - medicine));
        }
        if state.inventory.weapon().is_some() && state.inventory.ammunition() < 20 {
            list.push((String::from("ammunition"), 30));
        }
        list
    }
}

/// Seeded random play: useful for shaking out edge cases.
struct GamblerPolicy {
    rng: ChaCha20Rng,
}

impl GamblerPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for GamblerPolicy {
    fn name(&self) -> &'static str {
        "Gambler"
    }

    fn preparations(&mut self, state: &GameState) -> Vec<TurnAction> {
        let mut actions = heal_or_repair(state, 40);
        if state.trail.current_landmark().is_trade_post {
            actions.extend(buy_actions(self.shopping_list(state)));
        }
        actions
    }

    fn next_action(&mut self, state: &GameState) -> TurnAction {
        let roll: f64 = self.rng.r#gen();
        if roll < 0.15 {
            TurnAction::Rest
        } else if roll < 0.30 && can_hunt(state) {
            TurnAction::Hunt
        } else {
            TurnAction::Travel {
                direction: Direction::West,
                miles: self.rng.gen_range(10..=35),
            }
        }
    }

    fn choose_crossing(&mut self, _prompt: &RiverPrompt) -> CrossingChoice {
        CrossingChoice::ALL[self.rng.gen_range(0..CrossingChoice::ALL.len())]
    }

    fn shopping_list(&mut self, state: &GameState) -> Vec<(String, u32)> {
        if state.food_lbs() < 60 && state.money() >= 60 {
            vec![(String::from("rations"), 60)]
        } else {
            Vec::new()
        }
    }
}

/// Adapts a [`PlayerPolicy`] to the engine's mid-turn hooks.
pub struct PolicyHooks<'a> {
    policy: &'a mut dyn PlayerPolicy,
    pub prompts: u32,
    pub purchases: u32,
}

impl<'a> PolicyHooks<'a> {
    pub fn new(policy: &'a mut dyn PlayerPolicy) -> Self {
        Self {
            policy,
            prompts: 0,
            purchases: 0,
        }
    }
}

impl JourneyHooks for PolicyHooks<'_> {
    fn choose_crossing(&mut self, prompt: &RiverPrompt) -> CrossingChoice {
        self.prompts += 1;
        let choice = self.policy.choose_crossing(prompt);
        debug!(
            "{} chose {} at {} (ford chance {}%)",
            self.policy.name(),
            choice.as_str(),
            prompt.landmark,
            prompt.ford_chance
        );
        choice
    }

    fn trade_opportunity(&mut self, landmark: &Landmark, desk: &mut TradeDesk<'_>) {
        for (item, quantity) in self.policy.shopping_list(desk.state()) {
            match desk.buy(&item, quantity) {
                Ok(_) => self.purchases += 1,
                Err(err) => debug!("{} skipped {item} at {}: {err}", self.policy.name(), landmark.name),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platte_game::{JourneySetup, RiverConditions};

    fn prompt(ford_chance: u32, money: u32, attempt: u32) -> RiverPrompt {
        RiverPrompt {
            landmark: String::from("Kansas River Crossing"),
            conditions: RiverConditions {
                depth: 4.0,
                width: 30.0,
            },
            ford_chance,
            ferry_cost: 5,
            guide_cost: 10,
            money,
            attempt,
        }
    }

    fn fresh_state() -> GameState {
        GameState::new(&JourneySetup::default(), 9).unwrap()
    }

    #[test]
    fn strategies_parse_case_insensitively() {
        assert_eq!("hasty".parse(), Ok(GameplayStrategy::Hasty));
        assert_eq!(" GAMBLER ".parse(), Ok(GameplayStrategy::Gambler));
        assert!("reckless".parse::<GameplayStrategy>().is_err());
    }

    #[test]
    fn cautious_pays_for_a_guide_and_hasty_always_fords() {
        let mut cautious = GameplayStrategy::Cautious.create_policy(1);
        assert_eq!(cautious.choose_crossing(&prompt(35, 500, 1)), CrossingChoice::Guide);
        assert_eq!(cautious.choose_crossing(&prompt(70, 500, 1)), CrossingChoice::Ford);
        assert_eq!(cautious.choose_crossing(&prompt(35, 0, 1)), CrossingChoice::Wait);
        assert_eq!(cautious.choose_crossing(&prompt(35, 0, 3)), CrossingChoice::Ford);

        let mut hasty = GameplayStrategy::Hasty.create_policy(1);
        assert_eq!(hasty.choose_crossing(&prompt(0, 500, 1)), CrossingChoice::Ford);
    }

    #[test]
    fn balanced_rests_when_tired_and_hunts_when_hungry() {
        let mut policy = GameplayStrategy::Balanced.create_policy(1);
        let mut state = fresh_state();
        assert!(matches!(
            policy.next_action(&state),
            TurnAction::Travel { miles: 20, .. }
        ));
        state.player.restore_gauges(100, 80, 0);
        assert_eq!(policy.next_action(&state), TurnAction::Rest);
        state.player.restore_gauges(100, 0, 0);
        state.inventory.consume_food(50);
        assert_eq!(policy.next_action(&state), TurnAction::Hunt);
    }

    #[test]
    fn trade_post_preparations_restock_food() {
        let mut policy = GameplayStrategy::Cautious.create_policy(1);
        let state = fresh_state();
        let actions = policy.preparations(&state);
        assert!(actions.contains(&TurnAction::Buy {
            item: String::from("rations"),
            quantity: 190,
        }));
        assert!(actions.contains(&TurnAction::Buy {
            item: String::from("medicine"),
            quantity: 2,
        }));
    }

    #[test]
    fn gambler_is_reproducible_per_seed() {
        let state = fresh_state();
        let mut first = GameplayStrategy::Gambler.create_policy(77);
        let mut second = GameplayStrategy::Gambler.create_policy(77);
        for _ in 0..20 {
            assert_eq!(first.next_action(&state), second.next_action(&state));
        }
    }
}
