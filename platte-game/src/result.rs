//! End-of-journey summary.
use serde::{Deserialize, Serialize};

use crate::seed::encode_friendly;
use crate::state::{Ending, GameState};
use crate::trail::TrailVariant;

/// Final (or current) standing of a journey, shaped for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub player: String,
    pub trail: TrailVariant,
    pub share_code: String,
    pub seed: u64,
    pub days: u32,
    pub date: String,
    pub miles_traveled: u32,
    pub total_miles: u32,
    pub landmarks_reached: usize,
    pub last_landmark: String,
    pub health: i32,
    pub money: u32,
    pub food_lbs: u32,
    pub oxen: usize,
    pub wagon_condition: f32,
    pub ending: Option<Ending>,
}

impl JourneySummary {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let trail = state.trail.variant();
        Self {
            player: state.player.name.clone(),
            trail,
            share_code: encode_friendly(trail, state.seed),
            seed: state.seed,
            days: state.day,
            date: state.clock.date_label(),
            miles_traveled: state.trail.miles_traveled(),
            total_miles: state.trail.total_miles(),
            landmarks_reached: state.trail.landmark_index() + 1,
            last_landmark: state.trail.current_landmark().name.clone(),
            health: state.player.health(),
            money: state.money(),
            food_lbs: state.food_lbs(),
            oxen: state.oxen.len(),
            wagon_condition: state.wagon.condition(),
            ending: state.ending.clone(),
        }
    }

    /// Share of the trail covered, 0.0 to 1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_miles == 0 {
            return 1.0;
        }
        f64::from(self.miles_traveled) / f64::from(self.total_miles)
    }

    #[must_use]
    pub fn ending_key(&self) -> &'static str {
        self.ending.as_ref().map_or("in_progress", Ending::key)
    }
}

/// Terminal message for a finished journey, naming the cause of death when there is one.
#[must_use]
pub fn game_over_message(state: &GameState) -> Option<String> {
    let ending = state.ending.as_ref()?;
    Some(format!(
        "{ending} ({} on day {}, {} of {} miles).",
        state.clock.date_label(),
        state.day,
        state.trail.miles_traveled(),
        state.trail.total_miles()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::JourneySetup;

    #[test]
    fn summary_reflects_state() {
        let mut state = GameState::new(&JourneySetup::default(), 42).unwrap();
        state.trail.advance(83);
        state.day = 4;
        let summary = JourneySummary::from_state(&state);
        assert_eq!(summary.last_landmark, "Kansas River Crossing");
        assert_eq!(summary.landmarks_reached, 2);
        assert_eq!(summary.ending_key(), "in_progress");
        assert!((summary.progress() - 0.1).abs() < 1e-9);
        assert!(summary.share_code.starts_with("OR-"));
    }

    #[test]
    fn game_over_message_names_the_cause() {
        let mut state = GameState::new(&JourneySetup::default(), 42).unwrap();
        assert!(game_over_message(&state).is_none());
        state.ending = Some(Ending::Death {
            cause: String::from("illness"),
        });
        let message = game_over_message(&state).unwrap();
        assert!(message.starts_with("Game Over: your party has died from illness"));
        assert!(message.contains("0 of 830 miles"));
    }
}
