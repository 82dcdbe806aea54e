//! Player condition: health, fatigue, hunger and cause of death.
use serde::{Deserialize, Serialize};

use crate::numbers::round_f32_to_i32;

pub const MAX_GAUGE: i32 = 100;

fn clamp_gauge(value: i32) -> i32 {
    value.clamp(0, MAX_GAUGE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    health: i32,
    #[serde(default)]
    fatigue: i32,
    #[serde(default)]
    hunger: i32,
    #[serde(default)]
    last_damage_cause: Option<String>,
    #[serde(default)]
    cause_of_death: Option<String>,
    #[serde(default)]
    illness: Option<String>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new("Pioneer")
    }
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: MAX_GAUGE,
            fatigue: 0,
            hunger: 0,
            last_damage_cause: None,
            cause_of_death: None,
            illness: None,
        }
    }

    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub const fn fatigue(&self) -> i32 {
        self.fatigue
    }

    #[must_use]
    pub const fn hunger(&self) -> i32 {
        self.hunger
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[must_use]
    pub fn cause_of_death(&self) -> Option<&str> {
        self.cause_of_death.as_deref()
    }

    #[must_use]
    pub fn last_damage_cause(&self) -> Option<&str> {
        self.last_damage_cause.as_deref()
    }

    #[must_use]
    pub fn illness(&self) -> Option<&str> {
        self.illness.as_deref()
    }

    /// Subtract health and remember why. The first blow that reaches zero
    /// fixes the cause of death.
    pub fn apply_damage(&mut self, amount: i32, cause: &str) {
        if amount <= 0 || !self.is_alive() {
            return;
        }
        self.health = clamp_gauge(self.health.saturating_sub(amount));
        self.last_damage_cause = Some(cause.to_string());
        if self.health == 0 {
            self.cause_of_death = Some(cause.to_string());
        }
    }

    /// Restore health; the dead stay dead.
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 || !self.is_alive() {
            return;
        }
        self.health = clamp_gauge(self.health.saturating_add(amount));
    }

    pub fn contract_illness(&mut self, name: &str) {
        self.illness = Some(name.to_string());
    }

    pub fn cure_illness(&mut self) {
        self.illness = None;
    }

    /// Fatigue grows with the distance walked beside the wagon.
    pub fn add_fatigue(&mut self, amount: f32) {
        self.fatigue = clamp_gauge(self.fatigue.saturating_add(round_f32_to_i32(amount)));
    }

    pub fn recover_fatigue(&mut self, amount: i32) {
        self.fatigue = clamp_gauge(self.fatigue.saturating_sub(amount.max(0)));
    }

    pub fn add_hunger(&mut self, amount: i32) {
        self.hunger = clamp_gauge(self.hunger.saturating_add(amount.max(0)));
    }

    pub fn ease_hunger(&mut self, amount: i32) {
        self.hunger = clamp_gauge(self.hunger.saturating_sub(amount.max(0)));
    }

    /// Snapshot restore; values are clamped into gauge range.
    pub fn restore_gauges(&mut self, health: i32, fatigue: i32, hunger: i32) {
        self.health = clamp_gauge(health);
        self.fatigue = clamp_gauge(fatigue);
        self.hunger = clamp_gauge(hunger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lethal_damage_clamps_and_records_cause() {
        let mut player = Player::new("Eliza");
        player.restore_gauges(15, 0, 0);
        player.apply_damage(20, "accident");
        assert_eq!(player.health(), 0);
        assert!(!player.is_alive());
        assert_eq!(player.cause_of_death(), Some("accident"));

        player.apply_damage(5, "illness");
        player.heal(50);
        assert_eq!(player.health(), 0);
        assert_eq!(player.cause_of_death(), Some("accident"));
    }

    #[test]
    fn gauges_stay_in_range() {
        let mut player = Player::default();
        player.heal(40);
        assert_eq!(player.health(), 100);
        player.add_fatigue(130.0);
        assert_eq!(player.fatigue(), 100);
        player.recover_fatigue(250);
        assert_eq!(player.fatigue(), 0);
        player.add_hunger(60);
        player.ease_hunger(10);
        assert_eq!(player.hunger(), 50);
        player.restore_gauges(-5, 300, 40);
        assert_eq!((player.health(), player.fatigue(), player.hunger()), (0, 100, 40));
    }

    #[test]
    fn non_lethal_damage_tracks_last_cause() {
        let mut player = Player::default();
        player.apply_damage(10, "illness");
        player.apply_damage(-3, "ignored");
        assert_eq!(player.health(), 90);
        assert_eq!(player.last_damage_cause(), Some("illness"));
        assert!(player.cause_of_death().is_none());
    }
}
