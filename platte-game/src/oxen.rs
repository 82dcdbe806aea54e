//! Draft team: per-ox health and team averages.
use serde::{Deserialize, Serialize};

use crate::numbers::i32_to_f32;

const MAX_OX_HEALTH: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ox {
    pub name: String,
    health: i32,
}

impl Ox {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: MAX_OX_HEALTH,
        }
    }

    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.health = self.health.saturating_sub(amount).clamp(0, MAX_OX_HEALTH);
    }

    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 || !self.is_alive() {
            return;
        }
        self.health = self.health.saturating_add(amount).clamp(0, MAX_OX_HEALTH);
    }
}

/// Active draft animals. Oxen that reach zero health are dropped from the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OxTeam {
    oxen: Vec<Ox>,
}

impl OxTeam {
    /// A team of `count` healthy oxen.
    #[must_use]
    pub fn with_count(count: usize) -> Self {
        Self {
            oxen: (1..=count).map(|n| Ox::new(format!("Ox {n}"))).collect(),
        }
    }

    #[must_use]
    pub fn oxen(&self) -> &[Ox] {
        &self.oxen
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.oxen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.oxen.is_empty()
    }

    pub fn add(&mut self, ox: Ox) {
        self.oxen.push(ox);
    }

    /// Name for a newly bought ox: one past the highest numbered ox still on the team.
    #[must_use]
    pub fn next_ox_name(&self) -> String {
        let highest = self
            .oxen
            .iter()
            .filter_map(|ox| ox.name.strip_prefix("Ox ")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("Ox {}", highest.saturating_add(1))
    }

    /// Damage every ox and drop the dead. Returns the names of oxen lost.
    pub fn damage_all(&mut self, amount: i32) -> Vec<String> {
        for ox in &mut self.oxen {
            ox.take_damage(amount);
        }
        self.remove_dead()
    }

    pub fn heal_all(&mut self, amount: i32) {
        for ox in &mut self.oxen {
            ox.heal(amount);
        }
    }

    fn remove_dead(&mut self) -> Vec<String> {
        let (alive, dead): (Vec<Ox>, Vec<Ox>) =
            self.oxen.drain(..).partition(Ox::is_alive);
        self.oxen = alive;
        dead.into_iter().map(|ox| ox.name).collect()
    }

    /// Mean health of the team; an empty team averages zero.
    #[must_use]
    pub fn average_health(&self) -> f32 {
        if self.oxen.is_empty() {
            return 0.0;
        }
        let total: i32 = self.oxen.iter().map(Ox::health).sum();
        let count = i32::try_from(self.oxen.len()).unwrap_or(i32::MAX);
        i32_to_f32(total) / i32_to_f32(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_kills_and_removes_oxen() {
        let mut team = OxTeam::with_count(2);
        team.oxen[0].take_damage(95);
        let lost = team.damage_all(10);
        assert_eq!(lost, vec!["Ox 1".to_string()]);
        assert_eq!(team.len(), 1);
        assert_eq!(team.oxen()[0].health(), 90);
    }

    #[test]
    fn new_oxen_never_reuse_a_living_name() {
        let mut team = OxTeam::with_count(4);
        team.oxen[1].take_damage(100);
        assert_eq!(team.damage_all(1), vec!["Ox 2".to_string()]);
        assert_eq!(team.next_ox_name(), "Ox 5");
        team.add(Ox::new("Bright"));
        assert_eq!(team.next_ox_name(), "Ox 5");
        assert_eq!(OxTeam::default().next_ox_name(), "Ox 1");
    }

    #[test]
    fn average_health_of_empty_team_is_zero() {
        let mut team = OxTeam::default();
        assert!(team.average_health().abs() < f32::EPSILON);
        team.add(Ox::new("Bright"));
        team.add(Ox::new("Duke"));
        team.oxen[1].take_damage(50);
        assert!((team.average_health() - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn health_is_clamped() {
        let mut ox = Ox::new("Buck");
        ox.heal(30);
        assert_eq!(ox.health(), 100);
        ox.take_damage(400);
        assert_eq!(ox.health(), 0);
        ox.heal(10);
        assert_eq!(ox.health(), 0);
    }
}
