//! Perils Along the Platte game engine
//!
//! Platform-agnostic journey and random-event simulation for a westward wagon
//! trip along the Oregon, California or Mormon trail. This crate provides all
//! game mechanics without console or storage dependencies.

pub mod camp;
pub mod clock;
pub mod command;
pub mod crossings;
pub mod error;
pub mod hazards;
pub mod hunt;
pub mod inventory;
pub mod journey;
pub mod ledger;
pub mod market;
pub mod numbers;
pub mod oxen;
pub mod party;
pub mod result;
pub mod rng;
pub mod seed;
pub mod state;
pub mod trail;
pub mod wagon;
pub mod weather;

// Re-export commonly used types
pub use camp::{CampConfig, ItemUse, camp_rest, use_item};
pub use clock::{Clock, Season};
pub use command::{Direction, TurnAction};
pub use crossings::{
    CrossingChoice, CrossingConfig, CrossingOutcome, RiverConditions, attempt_ford,
    ford_success_chance, generate_conditions,
};
pub use error::GameError;
pub use hazards::{HazardConfig, HazardEvent, HazardKind, resolve_daily_hazards};
pub use hunt::{HuntConfig, HuntError, HuntOutcome, resolve_hunt};
pub use inventory::{Inventory, InventoryError, Item, ItemKind};
pub use journey::{
    ActionOutcome, AutoHooks, JourneyCfg, JourneyConfigError, JourneyHooks, JourneySession,
    RiverPrompt, TradeDesk, TravelConfig, TurnEvent, TurnPhase, TurnReport,
};
pub use ledger::Purse;
pub use market::{Goods, Listing, Market, MarketError, Trade};
pub use oxen::{Ox, OxTeam};
pub use party::Player;
pub use result::{JourneySummary, game_over_message};
pub use rng::{RngBundle, ScriptedRng};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy};
pub use state::{Ending, GameState, JourneySetup, SetupError};
pub use trail::{Landmark, Trail, TrailCatalog, TrailDataError, TrailVariant};
pub use wagon::{Wagon, WagonType};
pub use weather::{Weather, WeatherConfig, WeatherState};

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Failure to resume a saved journey.
#[derive(Debug, thiserror::Error)]
pub enum ResumeError<E: std::error::Error + 'static> {
    #[error("storage error: {0}")]
    Storage(#[source] E),
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Main game engine for creating, saving and resuming journeys
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
    cfg: JourneyCfg,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    /// Create a new game engine with the provided storage and tuning
    pub const fn new(storage: S, cfg: JourneyCfg) -> Self {
        Self { storage, cfg }
    }

    #[must_use]
    pub const fn config(&self) -> &JourneyCfg {
        &self.cfg
    }

    /// Outfit a new journey.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid setup or configuration.
    pub fn create_session(
        &self,
        setup: &JourneySetup,
        seed: u64,
    ) -> Result<JourneySession, SetupError> {
        JourneySession::new(setup, seed, self.cfg.clone())
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Load a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    pub fn load_game(&self, save_name: &str) -> Result<Option<GameState>, S::Error> {
        self.storage.load_game(save_name)
    }

    /// Load a save and rebuild a session around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be read or the configuration is invalid.
    pub fn resume_session(
        &self,
        save_name: &str,
    ) -> Result<Option<JourneySession>, ResumeError<S::Error>> {
        let Some(state) = self
            .storage
            .load_game(save_name)
            .map_err(ResumeError::Storage)?
        else {
            return Ok(None);
        };
        Ok(Some(JourneySession::from_state(state, self.cfg.clone())?))
    }

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, GameState>>>,
    }

    impl GameStorage for MemoryStorage {
        type Error = Infallible;

        fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(save_name.to_string(), game_state.clone());
            Ok(())
        }

        fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(self.saves.borrow().get(save_name).cloned())
        }

        fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(save_name);
            Ok(())
        }
    }

    #[test]
    fn engine_creates_and_roundtrips_state() {
        let engine = GameEngine::new(MemoryStorage::default(), JourneyCfg::default());
        let mut session = engine
            .create_session(&JourneySetup::default(), 0xABCD)
            .unwrap();
        session.with_state_mut(|state| {
            state.purse = Purse::new(250);
            state.day = 3;
        });
        let snapshot = session.into_state();
        engine.save_game("slot-one", &snapshot).unwrap();

        let loaded = engine.load_game("slot-one").unwrap().expect("save exists");
        assert_eq!(loaded.money(), 250);
        assert_eq!(loaded, snapshot);
        assert!(engine.load_game("missing-slot").unwrap().is_none());

        let resumed = engine.resume_session("slot-one").unwrap().expect("save exists");
        assert_eq!(resumed.state().day, 3);
        engine.delete_save("slot-one").unwrap();
        assert!(engine.resume_session("slot-one").unwrap().is_none());
    }

    #[test]
    fn invalid_config_blocks_new_sessions() {
        let mut cfg = JourneyCfg::default();
        cfg.hazards.accident_chance = 2.0;
        let engine = GameEngine::new(MemoryStorage::default(), cfg);
        assert!(matches!(
            engine.create_session(&JourneySetup::default(), 1),
            Err(SetupError::Config(_))
        ));
    }
}
