use serde::{Deserialize, Serialize};

use crate::inventory::ItemKind;
use crate::journey::TravelConfig;
use crate::numbers::{floor_f64_to_u32, u32_to_f32};
use crate::state::GameState;
use crate::weather::Weather;

/// Cause of death recorded when rations run out.
pub const CAUSE_STARVATION: &str = "starvation";
pub const CAUSE_WRECKED_WAGON: &str = "being stranded with a broken wagon";
pub const CAUSE_UNREPAIRED_WAGON: &str = "broken wagon with insufficient funds for repair";
pub const CAUSE_NO_OXEN: &str = "being stranded without oxen";
/// A broken wagon with less money than this and no spare part strands the party.
pub const REPAIR_FUNDS_FLOOR: u32 = 50;

/// Why the party can go no further, if it cannot.
///
/// A carried spare part keeps a broken wagon in play since using it mends the wagon.
#[must_use]
pub fn stranded_cause(state: &GameState) -> Option<&'static str> {
    if state.oxen.is_empty() {
        return Some(CAUSE_NO_OXEN);
    }
    let has_spare_part = state
        .inventory
        .items()
        .iter()
        .any(|item| item.kind == ItemKind::SparePart && item.quantity > 0);
    if !state.wagon.is_broken() || has_spare_part {
        return None;
    }
    if state.wagon.condition() <= 0.0 {
        Some(CAUSE_WRECKED_WAGON)
    } else if state.money() < REPAIR_FUNDS_FLOOR {
        Some(CAUSE_UNREPAIRED_WAGON)
    } else {
        None
    }
}

/// Pace multiplier for today: weather, wagon wear and ox health stack multiplicatively.
#[must_use]
pub fn travel_multiplier(state: &GameState, cfg: &TravelConfig) -> f32 {
    let mut multiplier = 1.0_f32;
    match state.weather.today {
        Weather::Rain => multiplier *= cfg.rain_multiplier,
        Weather::Snow => multiplier *= cfg.snow_multiplier,
        Weather::Clear => {}
    }
    let condition = state.wagon.condition();
    if condition < cfg.worn_wagon_condition {
        multiplier *= cfg.worn_wagon_multiplier;
    }
    if condition < cfg.failing_wagon_condition {
        multiplier *= cfg.failing_wagon_multiplier;
    }
    if state.oxen.average_health() < cfg.weak_oxen_health {
        multiplier *= cfg.weak_oxen_multiplier;
    }
    multiplier.max(0.0)
}

/// Miles actually covered, floored and never negative.
#[must_use]
pub fn actual_miles(intended: u32, multiplier: f32) -> u32 {
    floor_f64_to_u32(f64::from(intended) * f64::from(multiplier))
}

/// Fatigue and wagon wear proportional to distance.
pub(crate) fn apply_travel_wear(state: &mut GameState, miles: u32, cfg: &TravelConfig) {
    let distance = u32_to_f32(miles);
    state.player.add_fatigue(distance * cfg.fatigue_per_mile);
    state.wagon.apply_damage(distance * cfg.wear_per_mile);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpkeepOutcome {
    pub eaten_lbs: u32,
    pub shortfall_lbs: u32,
}

impl UpkeepOutcome {
    #[must_use]
    pub const fn starving(&self) -> bool {
        self.shortfall_lbs > 0
    }
}

/// Feed the party for one day. Any shortfall hurts the player and deepens hunger.
pub fn apply_daily_upkeep(state: &mut GameState, cfg: &TravelConfig) -> UpkeepOutcome {
    let needed = state.party_size.saturating_mul(cfg.rations_per_person);
    let eaten_lbs = state.inventory.consume_food(needed);
    let shortfall_lbs = needed.saturating_sub(eaten_lbs);
    if shortfall_lbs > 0 {
        state
            .player
            .apply_damage(cfg.starvation_damage, CAUSE_STARVATION);
        state.player.add_hunger(cfg.starvation_hunger);
        state.push_log(format!(
            "The party went hungry today ({shortfall_lbs} lbs short)."
        ));
    }
    UpkeepOutcome {
        eaten_lbs,
        shortfall_lbs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::JourneySetup;

    fn state() -> GameState {
        GameState::new(&JourneySetup::default(), 21).unwrap()
    }

    #[test]
    fn clear_day_with_sound_wagon_is_full_pace() {
        let state = state();
        let multiplier = travel_multiplier(&state, &TravelConfig::default());
        assert!((multiplier - 1.0).abs() < f32::EPSILON);
        assert_eq!(actual_miles(20, multiplier), 20);
    }

    #[test]
    fn penalties_stack() {
        let mut state = state();
        let cfg = TravelConfig::default();
        state.weather.today = Weather::Rain;
        state.wagon.restore_condition(25.0);
        let multiplier = travel_multiplier(&state, &cfg);
        // 0.7 * 0.8 * 0.5
        assert!((multiplier - 0.28).abs() < 1e-6);
        assert_eq!(actual_miles(20, multiplier), 5);

        state.weather.today = Weather::Snow;
        state.wagon.restore_condition(100.0);
        state.oxen = crate::oxen::OxTeam::default();
        let multiplier = travel_multiplier(&state, &cfg);
        // 0.4 * 0.7
        assert!((multiplier - 0.28).abs() < 1e-6);
    }

    #[test]
    fn broken_wagon_strands_only_without_repair_options() {
        let mut state = state();
        assert_eq!(stranded_cause(&state), None);

        state.wagon.restore_condition(10.0);
        assert_eq!(stranded_cause(&state), None, "enough money to repair");
        state.purse = crate::ledger::Purse::new(49);
        assert_eq!(stranded_cause(&state), Some(CAUSE_UNREPAIRED_WAGON));

        state
            .inventory
            .add(crate::inventory::Item::new(
                "Spare Wagon Part",
                ItemKind::SparePart,
                1,
                6,
            ))
            .unwrap();
        assert_eq!(stranded_cause(&state), None, "a spare part can mend it");
        state.inventory.remove("Spare Wagon Part", 1);

        state.wagon.restore_condition(0.0);
        state.purse = crate::ledger::Purse::new(500);
        assert_eq!(stranded_cause(&state), Some(CAUSE_WRECKED_WAGON));

        state.wagon.restore_condition(100.0);
        state.oxen = crate::oxen::OxTeam::default();
        assert_eq!(stranded_cause(&state), Some(CAUSE_NO_OXEN));
    }

    #[test]
    fn travel_wear_tracks_distance() {
        let mut state = state();
        apply_travel_wear(&mut state, 40, &TravelConfig::default());
        assert_eq!(state.player.fatigue(), 4);
        assert!((state.wagon.condition() - 98.0).abs() < 1e-4);
    }

    #[test]
    fn rations_feed_the_party_until_they_run_out() {
        let mut state = state();
        let cfg = TravelConfig::default();
        let fed = apply_daily_upkeep(&mut state, &cfg);
        assert_eq!(fed, UpkeepOutcome {
            eaten_lbs: 8,
            shortfall_lbs: 0
        });
        assert_eq!(state.food_lbs(), 42);

        state.inventory.consume_food(39);
        let hungry = apply_daily_upkeep(&mut state, &cfg);
        assert!(hungry.starving());
        assert_eq!(hungry.eaten_lbs, 3);
        assert_eq!(hungry.shortfall_lbs, 5);
        assert_eq!(state.food_lbs(), 0);
        assert_eq!(state.player.health(), 95);
        assert_eq!(state.player.last_damage_cause(), Some(CAUSE_STARVATION));
        assert_eq!(state.player.hunger(), 10);
    }
}
