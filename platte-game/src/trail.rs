//! Trail variants, landmarks and the position tracker.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::GameError;

const TRAILS_JSON: &str = include_str!("../data/trails.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrailVariant {
    #[default]
    Oregon,
    California,
    Mormon,
}

impl TrailVariant {
    pub const ALL: [Self; 3] = [Self::Oregon, Self::California, Self::Mormon];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oregon => "oregon",
            Self::California => "california",
            Self::Mormon => "mormon",
        }
    }

    /// Two-letter prefix used by share codes.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Oregon => "OR",
            Self::California => "CA",
            Self::Mormon => "MO",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Oregon => "Oregon Trail",
            Self::California => "California Trail",
            Self::Mormon => "Mormon Trail",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for TrailVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrailVariant {
    type Err = TrailDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_code(trimmed))
            .ok_or_else(|| TrailDataError::UnknownVariant(trimmed.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum TrailDataError {
    #[error("failed to parse trail data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown trail variant '{0}'")]
    UnknownVariant(String),
    #[error("trail {0} is missing from the catalog")]
    Missing(TrailVariant),
    #[error("trail {0} has no landmarks")]
    Empty(TrailVariant),
    #[error("trail {variant}: landmark '{name}' is not further along than its predecessor")]
    NotIncreasing { variant: TrailVariant, name: String },
    #[error("trail {variant}: total of {total} miles ends before the last landmark at {last}")]
    TotalTooShort {
        variant: TrailVariant,
        total: u32,
        last: u32,
    },
    #[error("saved trail position is inconsistent: {0}")]
    Position(#[from] GameError),
}

/// Immutable point of interest at a fixed distance from the trailhead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub distance_miles: u32,
    pub description: String,
    pub historical_note: String,
    #[serde(default)]
    pub has_river: bool,
    #[serde(default)]
    pub is_trade_post: bool,
    pub map_x: i32,
    pub map_y: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct LandmarkRecord {
    name: String,
    distance_miles: u32,
    description: String,
    historical_note: String,
    #[serde(default)]
    has_river: bool,
    #[serde(default)]
    is_trade_post: bool,
    map: (i32, i32),
}

impl From<LandmarkRecord> for Landmark {
    fn from(record: LandmarkRecord) -> Self {
        Self {
            name: record.name,
            distance_miles: record.distance_miles,
            description: record.description,
            historical_note: record.historical_note,
            has_river: record.has_river,
            is_trade_post: record.is_trade_post,
            map_x: record.map.0,
            map_y: record.map.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TrailRecord {
    variant: TrailVariant,
    start: String,
    total_miles: u32,
    landmarks: Vec<LandmarkRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    trails: Vec<TrailRecord>,
}

/// Landmark lists for every variant, validated on load.
#[derive(Debug, Clone)]
pub struct TrailCatalog {
    trails: Vec<TrailRecord>,
}

impl TrailCatalog {
    /// Parse the embedded trail data.
    ///
    /// # Errors
    ///
    /// Returns an error when the data fails to parse or a trail violates the
    /// strictly increasing landmark distance rule.
    pub fn load_from_static() -> Result<Self, TrailDataError> {
        Self::from_json(TRAILS_JSON)
    }

    /// # Errors
    ///
    /// See [`TrailCatalog::load_from_static`].
    pub fn from_json(json: &str) -> Result<Self, TrailDataError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        for trail in &file.trails {
            validate_record(trail)?;
        }
        Ok(Self { trails: file.trails })
    }

    /// Build a fresh tracker positioned at the trailhead.
    ///
    /// # Errors
    ///
    /// Returns [`TrailDataError::Missing`] when the catalog has no such variant.
    pub fn trail(&self, variant: TrailVariant) -> Result<Trail, TrailDataError> {
        let record = self
            .trails
            .iter()
            .find(|trail| trail.variant == variant)
            .ok_or(TrailDataError::Missing(variant))?;
        Ok(Trail {
            variant,
            start: record.start.clone(),
            landmarks: record.landmarks.iter().cloned().map(Landmark::from).collect(),
            total_miles: record.total_miles,
            miles_traveled: 0,
            landmark_index: 0,
        })
    }
}

fn validate_record(trail: &TrailRecord) -> Result<(), TrailDataError> {
    let stops: Vec<(&str, u32)> = trail
        .landmarks
        .iter()
        .map(|landmark| (landmark.name.as_str(), landmark.distance_miles))
        .collect();
    validate_layout(trail.variant, &stops, trail.total_miles)
}

/// Landmarks must exist, strictly increase in distance and end within the total.
fn validate_layout(
    variant: TrailVariant,
    stops: &[(&str, u32)],
    total_miles: u32,
) -> Result<(), TrailDataError> {
    let Some(&(_, last)) = stops.last() else {
        return Err(TrailDataError::Empty(variant));
    };
    for pair in stops.windows(2) {
        if pair[1].1 <= pair[0].1 {
            return Err(TrailDataError::NotIncreasing {
                variant,
                name: pair[1].0.to_string(),
            });
        }
    }
    if total_miles < last {
        return Err(TrailDataError::TotalTooShort {
            variant,
            total: total_miles,
            last,
        });
    }
    Ok(())
}

/// Position tracker over one trail variant.
///
/// `miles_traveled` never exceeds `total_miles` and `landmark_index` is always
/// the furthest landmark whose distance is at most `miles_traveled`. Neither
/// ever decreases through [`Trail::advance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TrailSnapshot")]
pub struct Trail {
    variant: TrailVariant,
    start: String,
    landmarks: Vec<Landmark>,
    total_miles: u32,
    miles_traveled: u32,
    landmark_index: usize,
}

/// Unchecked trail as it appears in a save file.
#[derive(Debug, Deserialize)]
struct TrailSnapshot {
    variant: TrailVariant,
    start: String,
    landmarks: Vec<Landmark>,
    total_miles: u32,
    miles_traveled: u32,
    landmark_index: usize,
}

impl TryFrom<TrailSnapshot> for Trail {
    type Error = TrailDataError;

    fn try_from(saved: TrailSnapshot) -> Result<Self, Self::Error> {
        let stops: Vec<(&str, u32)> = saved
            .landmarks
            .iter()
            .map(|landmark| (landmark.name.as_str(), landmark.distance_miles))
            .collect();
        validate_layout(saved.variant, &stops, saved.total_miles)?;
        let mut trail = Self {
            variant: saved.variant,
            start: saved.start,
            landmarks: saved.landmarks,
            total_miles: saved.total_miles,
            miles_traveled: 0,
            landmark_index: 0,
        };
        trail.restore(saved.miles_traveled, saved.landmark_index)?;
        Ok(trail)
    }
}

impl Trail {
    /// Load the embedded catalog and start at the trailhead of `variant`.
    ///
    /// # Errors
    ///
    /// Propagates [`TrailDataError`] from the catalog.
    pub fn for_variant(variant: TrailVariant) -> Result<Self, TrailDataError> {
        TrailCatalog::load_from_static()?.trail(variant)
    }

    /// Add miles, saturate at the trail end and step past every landmark now
    /// behind the party. Returns whether a new landmark was reached.
    pub fn advance(&mut self, miles: u32) -> bool {
        if miles == 0 {
            return false;
        }
        self.miles_traveled = self.miles_traveled.saturating_add(miles).min(self.total_miles);
        let before = self.landmark_index;
        while self
            .landmarks
            .get(self.landmark_index + 1)
            .is_some_and(|next| next.distance_miles <= self.miles_traveled)
        {
            self.landmark_index += 1;
        }
        self.landmark_index > before
    }

    /// Landmarks reached after `previous_index`, in trail order.
    #[must_use]
    pub fn reached_since(&self, previous_index: usize) -> &[Landmark] {
        let start = previous_index.saturating_add(1).min(self.landmarks.len());
        let end = (self.landmark_index + 1).max(start).min(self.landmarks.len());
        &self.landmarks[start..end]
    }

    /// Reposition from snapshot values.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] when the miles exceed the trail or the
    /// index is not the furthest landmark reached at those miles.
    pub fn restore(&mut self, miles_traveled: u32, landmark_index: usize) -> Result<(), GameError> {
        if miles_traveled > self.total_miles {
            return Err(GameError::out_of_range("miles traveled", miles_traveled));
        }
        let expected = self
            .landmarks
            .iter()
            .rposition(|landmark| landmark.distance_miles <= miles_traveled)
            .unwrap_or(0);
        if landmark_index != expected {
            let value = i64::try_from(landmark_index).unwrap_or(i64::MAX);
            return Err(GameError::OutOfRange {
                field: "landmark index",
                value,
            });
        }
        self.miles_traveled = miles_traveled;
        self.landmark_index = landmark_index;
        Ok(())
    }

    #[must_use]
    pub const fn variant(&self) -> TrailVariant {
        self.variant
    }

    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    #[must_use]
    pub const fn total_miles(&self) -> u32 {
        self.total_miles
    }

    #[must_use]
    pub const fn miles_traveled(&self) -> u32 {
        self.miles_traveled
    }

    #[must_use]
    pub const fn landmark_index(&self) -> usize {
        self.landmark_index
    }

    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    #[must_use]
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    #[must_use]
    pub fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }

    /// Furthest landmark reached so far.
    ///
    /// # Panics
    ///
    /// Never in practice: catalogs reject empty trails.
    #[must_use]
    pub fn current_landmark(&self) -> &Landmark {
        &self.landmarks[self.landmark_index]
    }

    #[must_use]
    pub fn next_landmark(&self) -> Option<&Landmark> {
        self.landmarks.get(self.landmark_index + 1)
    }

    /// Miles to the next landmark, or to the trail end once past the last one.
    #[must_use]
    pub fn distance_to_next_landmark(&self) -> u32 {
        self.next_landmark().map_or_else(
            || self.remaining_distance(),
            |next| next.distance_miles.saturating_sub(self.miles_traveled),
        )
    }

    #[must_use]
    pub const fn remaining_distance(&self) -> u32 {
        self.total_miles.saturating_sub(self.miles_traveled)
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.miles_traveled >= self.total_miles
    }
}
