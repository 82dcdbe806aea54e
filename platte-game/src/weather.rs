//! Daily weather and seasonal storm strength.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numbers::u32_to_f32;
use crate::rng::{roll_between, roll_unit};

pub const MIN_STRENGTH: u8 = 1;
pub const MAX_STRENGTH: u8 = 10;
/// Strength at which weather hazards hit at their listed magnitude.
pub const NEUTRAL_STRENGTH: u8 = 5;

/// Weather conditions that affect daily travel and river depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
}

impl Weather {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_rain_chance() -> f32 {
    0.30
}

const fn default_snow_chance() -> f32 {
    0.15
}

const fn default_monthly_strength() -> [u8; 12] {
    [8, 8, 6, 5, 4, 4, 5, 5, 5, 6, 7, 8]
}

const fn default_jitter() -> u8 {
    1
}

/// Probabilities and the seasonal strength trend, indexed January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_rain_chance")]
    pub rain_chance: f32,
    #[serde(default = "default_snow_chance")]
    pub snow_chance: f32,
    #[serde(default = "default_monthly_strength")]
    pub monthly_strength: [u8; 12],
    #[serde(default = "default_jitter")]
    pub strength_jitter: u8,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            rain_chance: default_rain_chance(),
            snow_chance: default_snow_chance(),
            monthly_strength: default_monthly_strength(),
            strength_jitter: default_jitter(),
        }
    }
}

impl WeatherConfig {
    /// Trend strength for a 1-based month.
    #[must_use]
    pub fn trend_for(&self, month: u32) -> u8 {
        let index = usize::try_from(month.clamp(1, 12) - 1).unwrap_or(0);
        self.monthly_strength[index].clamp(MIN_STRENGTH, MAX_STRENGTH)
    }
}

/// Weather tracking carried in the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub today: Weather,
    pub yesterday: Weather,
    pub strength: u8,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            today: Weather::Clear,
            yesterday: Weather::Clear,
            strength: NEUTRAL_STRENGTH,
        }
    }
}

impl WeatherState {
    /// Roll today's weather and strength: one draw for the sky, one for the jitter.
    pub fn roll_daily<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        month: u32,
        cfg: &WeatherConfig,
    ) -> Weather {
        let roll = roll_unit(rng);
        let today = if roll < cfg.rain_chance {
            Weather::Rain
        } else if roll < cfg.rain_chance + cfg.snow_chance {
            Weather::Snow
        } else {
            Weather::Clear
        };
        let jitter = u32::from(cfg.strength_jitter);
        let offset = roll_between(rng, 0, jitter * 2 + 1);
        let strength = (u32::from(cfg.trend_for(month)) + offset)
            .saturating_sub(jitter)
            .clamp(u32::from(MIN_STRENGTH), u32::from(MAX_STRENGTH));
        self.yesterday = self.today;
        self.today = today;
        self.strength = u8::try_from(strength).unwrap_or(NEUTRAL_STRENGTH);
        today
    }

    /// Multiplier applied to weather hazard magnitudes: `0.5 + strength / 10`.
    #[must_use]
    pub fn hazard_scale(&self) -> f32 {
        let strength = self.strength.clamp(MIN_STRENGTH, MAX_STRENGTH);
        0.5 + u32_to_f32(u32::from(strength)) / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn daily_roll_thresholds() {
        let cfg = WeatherConfig::default();
        let mut state = WeatherState::default();
        let mut rng = ScriptedRng::new(vec![0.29, 0.5, 0.44, 0.0, 0.46, 0.99]);
        assert_eq!(state.roll_daily(&mut rng, 4, &cfg), Weather::Rain);
        assert_eq!(state.strength, 5);
        assert_eq!(state.roll_daily(&mut rng, 4, &cfg), Weather::Snow);
        assert_eq!(state.strength, 4);
        assert_eq!(state.yesterday, Weather::Rain);
        assert_eq!(state.roll_daily(&mut rng, 4, &cfg), Weather::Clear);
        assert_eq!(state.strength, 6);
    }

    #[test]
    fn strength_follows_trend_within_bounds() {
        let cfg = WeatherConfig::default();
        let mut state = WeatherState::default();
        let mut rng = SmallRng::seed_from_u64(77);
        for month in 1..=12 {
            for _ in 0..50 {
                state.roll_daily(&mut rng, month, &cfg);
                let trend = i32::from(cfg.trend_for(month));
                let strength = i32::from(state.strength);
                assert!((MIN_STRENGTH..=MAX_STRENGTH).contains(&state.strength));
                assert!((strength - trend).abs() <= 1);
            }
        }
    }

    #[test]
    fn neutral_strength_leaves_hazards_unscaled() {
        let mut state = WeatherState::default();
        assert!((state.hazard_scale() - 1.0).abs() < f32::EPSILON);
        state.strength = MAX_STRENGTH;
        assert!((state.hazard_scale() - 1.5).abs() < f32::EPSILON);
        state.strength = MIN_STRENGTH;
        assert!((state.hazard_scale() - 0.6).abs() < 1e-6);
    }
}
