//! Calendar clock for the journey.
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::GameError;

/// Year every journey starts in.
pub const START_YEAR: i32 = 1847;
/// Hour of day a fresh journey starts at.
pub const START_HOUR: u8 = 6;
/// Months a party may depart in (March through July).
pub const DEPARTURE_MONTHS: RangeInclusive<u32> = 3..=7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current date and hour. The date is always a valid calendar day, so month
/// rollover and year rollover fall out of `chrono`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    date: NaiveDate,
    hour: u8,
}

impl Clock {
    /// Start a journey on the first day of `month` in [`START_YEAR`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] when the month is not a departure month.
    pub fn departing(month: u32) -> Result<Self, GameError> {
        if !DEPARTURE_MONTHS.contains(&month) {
            return Err(GameError::out_of_range("departure month", month));
        }
        Self::from_parts(START_YEAR, month, 1, START_HOUR)
    }

    /// Rebuild a clock from snapshot values.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] for an impossible date or an hour past 23.
    pub fn from_parts(year: i32, month: u32, day: u32, hour: u8) -> Result<Self, GameError> {
        if hour > 23 {
            return Err(GameError::out_of_range("hour", hour));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| GameError::out_of_range("day", day))?;
        Ok(Self { date, hour })
    }

    /// Move to the next calendar day, keeping the hour.
    pub fn advance_day(&mut self) {
        self.advance_days(1);
    }

    pub fn advance_days(&mut self, days: u32) {
        if let Some(next) = self.date.checked_add_days(Days::new(u64::from(days))) {
            self.date = next;
        }
    }

    /// Move forward by whole hours, rolling over into following days.
    pub fn advance_hours(&mut self, hours: u32) {
        let total = u32::from(self.hour).saturating_add(hours);
        self.advance_days(total / 24);
        self.hour = u8::try_from(total % 24).unwrap_or(0);
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] when the day does not exist in the current month.
    pub fn set_day(&mut self, day: u32) -> Result<(), GameError> {
        self.date = self
            .date
            .with_day(day)
            .ok_or_else(|| GameError::out_of_range("day", day))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] for months outside 1..=12 or when the
    /// current day does not exist in the target month.
    pub fn set_month(&mut self, month: u32) -> Result<(), GameError> {
        self.date = self
            .date
            .with_month(month)
            .ok_or_else(|| GameError::out_of_range("month", month))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] when the date does not exist in the target year.
    pub fn set_year(&mut self, year: i32) -> Result<(), GameError> {
        self.date = self
            .date
            .with_year(year)
            .ok_or_else(|| GameError::out_of_range("year", year))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] for hours past 23.
    pub fn set_hour(&mut self, hour: u8) -> Result<(), GameError> {
        if hour > 23 {
            return Err(GameError::out_of_range("hour", hour));
        }
        self.hour = hour;
        Ok(())
    }

    #[must_use]
    pub fn season(&self) -> Season {
        Season::from_month(self.month())
    }

    /// December, January and February trap wagons in the snow.
    #[must_use]
    pub fn is_winter(&self) -> bool {
        self.season() == Season::Winter
    }

    /// Long form such as `April 1, 1847`.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::departing(*DEPARTURE_MONTHS.start()).unwrap_or(Self {
            date: NaiveDate::MIN,
            hour: START_HOUR,
        })
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:00", self.date_label(), self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departure_starts_on_first_of_month() {
        let clock = Clock::departing(4).unwrap();
        assert_eq!(clock.date_label(), "April 1, 1847");
        assert_eq!(clock.hour(), START_HOUR);
        assert_eq!(clock.season(), Season::Spring);
        assert!(Clock::departing(2).is_err());
        assert!(Clock::departing(8).is_err());
    }

    #[test]
    fn month_and_year_roll_over() {
        let mut clock = Clock::from_parts(1847, 4, 30, 6).unwrap();
        clock.advance_day();
        assert_eq!((clock.month(), clock.day()), (5, 1));

        let mut clock = Clock::from_parts(1847, 12, 31, 6).unwrap();
        clock.advance_day();
        assert_eq!((clock.year(), clock.month(), clock.day()), (1848, 1, 1));
        assert!(clock.is_winter());
    }

    #[test]
    fn hours_carry_into_days() {
        let mut clock = Clock::departing(7).unwrap();
        clock.advance_hours(20);
        assert_eq!((clock.day(), clock.hour()), (2, 2));
        clock.advance_hours(48);
        assert_eq!((clock.day(), clock.hour()), (4, 2));
    }

    #[test]
    fn setters_reject_impossible_dates() {
        let mut clock = Clock::from_parts(1847, 3, 31, 6).unwrap();
        assert!(clock.set_month(4).is_err());
        assert_eq!(clock.month(), 3);
        assert!(clock.set_hour(24).is_err());
        clock.set_day(15).unwrap();
        clock.set_month(11).unwrap();
        clock.set_year(1848).unwrap();
        clock.set_hour(18).unwrap();
        assert_eq!(clock.to_string(), "November 15, 1848 18:00");
        assert!(!clock.is_winter());
    }

    #[test]
    fn winter_covers_december_through_february() {
        for (month, winter) in [(11, false), (12, true), (1, true), (2, true), (3, false)] {
            let clock = Clock::from_parts(1847, month, 1, 6).unwrap();
            assert_eq!(clock.is_winter(), winter, "month {month}");
        }
    }
}
