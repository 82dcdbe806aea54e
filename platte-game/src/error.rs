//! Error taxonomy surfaced by turn actions.
use thiserror::Error;

use crate::hunt::HuntError;
use crate::inventory::InventoryError;
use crate::market::MarketError;

/// Errors returned by [`crate::JourneySession`] actions.
///
/// `InvalidInput` and `OutOfRange` never consume a turn. `PreconditionNotMet`
/// aborts the action before any state is touched. `GameOver` is returned for
/// every action attempted after the journey has ended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("cannot {action}: {reason}")]
    PreconditionNotMet { action: &'static str, reason: String },
    #[error("the journey is over: {0}")]
    GameOver(String),
}

impl GameError {
    pub(crate) fn precondition(action: &'static str, reason: impl Into<String>) -> Self {
        Self::PreconditionNotMet {
            action,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: &'static str, value: impl Into<i64>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }

    /// True when the error leaves the session untouched and the caller may simply re-prompt.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::GameOver(_))
    }
}

impl From<HuntError> for GameError {
    fn from(err: HuntError) -> Self {
        Self::precondition("hunt", err.to_string())
    }
}

impl From<MarketError> for GameError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::UnknownItem(name) => Self::InvalidInput(format!("unknown item '{name}'")),
            MarketError::ZeroQuantity => Self::out_of_range("quantity", 0),
            other => Self::precondition("trade", other.to_string()),
        }
    }
}

impl From<InventoryError> for GameError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::StackLimit { requested, .. } => {
                Self::out_of_range("quantity", i64::from(requested))
            }
            InventoryError::Full { .. } => Self::out_of_range("inventory stacks", 0),
            other => Self::precondition("use item", other.to_string()),
        }
    }
}
