//! Text commands accepted by the turn loop.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Compass heading for a travel leg. Headings are narrative only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    #[default]
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::NorthEast => "northeast",
            Self::East => "east",
            Self::SouthEast => "southeast",
            Self::South => "south",
            Self::SouthWest => "southwest",
            Self::West => "west",
            Self::NorthWest => "northwest",
        }
    }

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::NorthEast => "ne",
            Self::East => "e",
            Self::SouthEast => "se",
            Self::South => "s",
            Self::SouthWest => "sw",
            Self::West => "w",
            Self::NorthWest => "nw",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|dir| dir.as_str() == key || dir.abbreviation() == key)
            .ok_or_else(|| GameError::InvalidInput(format!("unknown direction '{}'", s.trim())))
    }
}

/// One player command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnAction {
    /// Negative miles survive parsing so the turn loop can reject them as out of range.
    Travel { direction: Direction, miles: i64 },
    Rest,
    Hunt,
    UseItem { item: String },
    Buy { item: String, quantity: i64 },
    Sell { item: String, quantity: i64 },
    Status,
    /// List carried goods, the wagon and the team.
    Inventory,
    Save,
    Quit,
}

impl TurnAction {
    /// Whether the action spends a day on the trail.
    #[must_use]
    pub const fn consumes_day(&self) -> bool {
        matches!(self, Self::Travel { .. } | Self::Rest | Self::Hunt)
    }
}

fn parse_number(word: &str, field: &str) -> Result<i64, GameError> {
    word.parse::<i64>()
        .map_err(|_| GameError::InvalidInput(format!("{field} must be a whole number, got '{word}'")))
}

fn split_item_quantity(verb: &str, words: &[&str]) -> Result<(String, i64), GameError> {
    match words {
        [] | [_] => Err(GameError::InvalidInput(format!(
            "usage: {verb} <item> <quantity>"
        ))),
        [item @ .., qty] => Ok((item.join(" "), parse_number(qty, "quantity")?)),
    }
}

impl FromStr for TurnAction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let Some((verb, rest)) = words.split_first() else {
            return Err(GameError::InvalidInput(String::from("empty command")));
        };
        match (verb.to_ascii_lowercase().as_str(), rest) {
            ("travel" | "go" | "t", [direction, miles]) => Ok(Self::Travel {
                direction: direction.parse()?,
                miles: parse_number(miles, "miles")?,
            }),
            ("travel" | "go" | "t", _) => Err(GameError::InvalidInput(String::from(
                "usage: travel <direction> <miles>",
            ))),
            ("rest" | "r", []) => Ok(Self::Rest),
            ("hunt" | "h", []) => Ok(Self::Hunt),
            ("use" | "u", item) if !item.is_empty() => Ok(Self::UseItem {
                item: item.join(" "),
            }),
            ("buy", words) => {
                let (item, quantity) = split_item_quantity("buy", words)?;
                Ok(Self::Buy { item, quantity })
            }
            ("sell", words) => {
                let (item, quantity) = split_item_quantity("sell", words)?;
                Ok(Self::Sell { item, quantity })
            }
            ("status" | "s", []) => Ok(Self::Status),
            ("inventory" | "inv" | "i", []) => Ok(Self::Inventory),
            ("check", [what])
                if matches!(what.to_ascii_lowercase().as_str(), "inventory" | "wagon") =>
            {
                Ok(Self::Inventory)
            }
            ("save", []) => Ok(Self::Save),
            ("quit" | "q" | "exit", []) => Ok(Self::Quit),
            _ => Err(GameError::InvalidInput(format!("unrecognised command '{}'", s.trim()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_parses_direction_and_miles() {
        assert_eq!(
            "travel west 20".parse::<TurnAction>(),
            Ok(TurnAction::Travel {
                direction: Direction::West,
                miles: 20
            })
        );
        assert_eq!(
            "go North-East 5".parse::<TurnAction>(),
            Ok(TurnAction::Travel {
                direction: Direction::NorthEast,
                miles: 5
            })
        );
        assert_eq!(
            "t sw -3".parse::<TurnAction>(),
            Ok(TurnAction::Travel {
                direction: Direction::SouthWest,
                miles: -3
            })
        );
    }

    #[test]
    fn inventory_has_several_spellings() {
        for line in ["inventory", "INV", "i", "check inventory", "check Wagon"] {
            assert_eq!(line.parse::<TurnAction>(), Ok(TurnAction::Inventory), "{line:?}");
        }
        assert!(!TurnAction::Inventory.consumes_day());
    }

    #[test]
    fn garbage_is_invalid_input() {
        for line in [
            "",
            "travel",
            "travel up 10",
            "travel west ten",
            "dance",
            "rest now",
            "check",
            "check oxen",
        ] {
            assert!(
                matches!(line.parse::<TurnAction>(), Err(GameError::InvalidInput(_))),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn trade_commands_take_multi_word_items() {
        assert_eq!(
            "buy spare part 2".parse::<TurnAction>(),
            Ok(TurnAction::Buy {
                item: String::from("spare part"),
                quantity: 2
            })
        );
        assert_eq!(
            "sell ammunition 10".parse::<TurnAction>(),
            Ok(TurnAction::Sell {
                item: String::from("ammunition"),
                quantity: 10
            })
        );
        assert!("buy 3".parse::<TurnAction>().is_err());
        assert_eq!(
            "use medicine".parse::<TurnAction>(),
            Ok(TurnAction::UseItem {
                item: String::from("medicine")
            })
        );
    }

    #[test]
    fn only_journey_actions_consume_a_day() {
        assert!(TurnAction::Rest.consumes_day());
        assert!(TurnAction::Hunt.consumes_day());
        assert!(!TurnAction::Status.consumes_day());
        assert!(
            !TurnAction::Buy {
                item: String::from("ox"),
                quantity: 1
            }
            .consumes_day()
        );
    }
}
