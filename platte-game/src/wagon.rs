//! Wagon durability and carrying capacity.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Condition below which the wagon is flagged broken.
pub const BROKEN_THRESHOLD: f32 = 20.0;
const MAX_CONDITION: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WagonType {
    Conestoga,
    #[default]
    PrairieSchooner,
    FarmWagon,
}

impl WagonType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conestoga => "conestoga",
            Self::PrairieSchooner => "prairie_schooner",
            Self::FarmWagon => "farm_wagon",
        }
    }

    /// Carrying capacity in pounds.
    #[must_use]
    pub const fn capacity_lbs(self) -> u32 {
        match self {
            Self::Conestoga => 2_500,
            Self::PrairieSchooner => 2_000,
            Self::FarmWagon => 1_500,
        }
    }
}

impl fmt::Display for WagonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Conestoga => "Conestoga",
            Self::PrairieSchooner => "Prairie Schooner",
            Self::FarmWagon => "Farm Wagon",
        })
    }
}

impl FromStr for WagonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "conestoga" => Ok(Self::Conestoga),
            "prairie_schooner" | "schooner" => Ok(Self::PrairieSchooner),
            "farm_wagon" | "farm" => Ok(Self::FarmWagon),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wagon {
    #[serde(default)]
    pub kind: WagonType,
    #[serde(default = "Wagon::default_condition")]
    condition: f32,
    #[serde(default)]
    broken: bool,
}

impl Default for Wagon {
    fn default() -> Self {
        Self::new(WagonType::default())
    }
}

impl Wagon {
    const fn default_condition() -> f32 {
        MAX_CONDITION
    }

    #[must_use]
    pub const fn new(kind: WagonType) -> Self {
        Self {
            kind,
            condition: MAX_CONDITION,
            broken: false,
        }
    }

    #[must_use]
    pub const fn condition(&self) -> f32 {
        self.condition
    }

    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.broken
    }

    #[must_use]
    pub const fn capacity_lbs(&self) -> u32 {
        self.kind.capacity_lbs()
    }

    /// Apply durability damage, clamping at zero. Dropping under the threshold breaks the wagon.
    pub fn apply_damage(&mut self, amount: f32) {
        if amount <= 0.0 || amount.is_nan() {
            return;
        }
        self.condition = (self.condition - amount).clamp(0.0, MAX_CONDITION);
        if self.condition < BROKEN_THRESHOLD {
            self.broken = true;
        }
    }

    /// Restore durability, clamping to max. Reaching the threshold mends a broken wagon.
    pub fn repair(&mut self, amount: f32) {
        if amount <= 0.0 || amount.is_nan() {
            return;
        }
        self.condition = (self.condition + amount).clamp(0.0, MAX_CONDITION);
        if self.condition >= BROKEN_THRESHOLD {
            self.broken = false;
        }
    }

    /// Snapshot restore; the broken flag is recomputed from the condition.
    pub fn restore_condition(&mut self, condition: f32) {
        self.condition = if condition.is_nan() {
            0.0
        } else {
            condition.clamp(0.0, MAX_CONDITION)
        };
        self.broken = self.condition < BROKEN_THRESHOLD;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_below_threshold_breaks_wagon() {
        let mut wagon = Wagon::default();
        wagon.restore_condition(25.0);
        assert!(!wagon.is_broken());
        wagon.apply_damage(10.0);
        assert!((wagon.condition() - 15.0).abs() < f32::EPSILON);
        assert!(wagon.is_broken());
    }

    #[test]
    fn repair_clears_broken_flag_at_threshold() {
        let mut wagon = Wagon::new(WagonType::FarmWagon);
        wagon.apply_damage(250.0);
        assert!(wagon.condition().abs() < f32::EPSILON);
        wagon.repair(19.0);
        assert!(wagon.is_broken());
        wagon.repair(1.0);
        assert!(!wagon.is_broken());
        wagon.repair(500.0);
        assert!((wagon.condition() - 100.0).abs() < f32::EPSILON);
        assert_eq!(wagon.capacity_lbs(), 1_500);
    }

    #[test]
    fn wagon_types_parse_from_labels() {
        assert_eq!("Prairie Schooner".parse(), Ok(WagonType::PrairieSchooner));
        assert_eq!("conestoga".parse(), Ok(WagonType::Conestoga));
        assert_eq!(WagonType::Conestoga.to_string(), "Conestoga");
        assert!("handcart".parse::<WagonType>().is_err());
    }
}
