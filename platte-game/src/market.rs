//! Trade post price list and buy/sell rules.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::inventory::{InventoryError, Item, ItemKind};
use crate::oxen::Ox;
use crate::state::GameState;

const MARKET_JSON: &str = include_str!("../data/market.json");

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("failed to parse price list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the trading post does not deal in {0}")]
    UnknownItem(String),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("that costs ${cost} but you only have ${balance}")]
    InsufficientFunds { cost: u32, balance: u32 },
    #[error("you only have {held} {item} (asked to sell {requested})")]
    NotEnough {
        item: String,
        held: u32,
        requested: u32,
    },
    #[error("the wagon carries at most {capacity} lbs; that would load {load} lbs")]
    Overloaded { load: u32, capacity: u32 },
    #[error("your team can hold at most {max} oxen")]
    TeamFull { max: u32 },
    #[error("{0} cannot be sold here")]
    NotSellable(String),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// What a trading post lists. Oxen join the team rather than the wagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goods {
    Food { nutrition: i32 },
    Medicine { healing: i32 },
    Weapon { rifle: bool },
    Ammunition,
    SparePart,
    Supplies,
    Ox,
}

impl Goods {
    #[must_use]
    pub const fn item_kind(self) -> Option<ItemKind> {
        match self {
            Self::Food { nutrition } => Some(ItemKind::Food { nutrition }),
            Self::Medicine { healing } => Some(ItemKind::Medicine { healing }),
            Self::Weapon { rifle } => Some(ItemKind::Weapon { rifle }),
            Self::Ammunition => Some(ItemKind::Ammunition),
            Self::SparePart => Some(ItemKind::SparePart),
            Self::Supplies => Some(ItemKind::Supplies),
            Self::Ox => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub kind: Goods,
    /// Dollars per unit.
    pub price: u32,
    #[serde(default)]
    pub weight_lbs: u32,
    pub max_quantity: u32,
}

impl Listing {
    fn matches(&self, query: &str) -> bool {
        let wanted = query.trim();
        self.id.eq_ignore_ascii_case(&wanted.replace(' ', "_"))
            || self.name.eq_ignore_ascii_case(wanted)
    }

    fn to_item(&self, kind: ItemKind, quantity: u32) -> Item {
        Item::new(self.name.clone(), kind, quantity, self.max_quantity)
            .with_weight(self.weight_lbs)
            .with_value(self.price)
    }
}

/// Completed purchase or sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub item: String,
    pub quantity: u32,
    pub total: u32,
    pub bought: bool,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.bought { "Bought" } else { "Sold" };
        write!(f, "{verb} {} {} for ${}.", self.quantity, self.item, self.total)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PriceList {
    listings: Vec<Listing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    listings: Vec<Listing>,
}

impl Market {
    /// Load the embedded price list.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Parse`] when the embedded data is malformed.
    pub fn load_from_static() -> Result<Self, MarketError> {
        Self::from_json(MARKET_JSON)
    }

    /// # Errors
    ///
    /// Returns [`MarketError::Parse`] when `json` is not a price list.
    pub fn from_json(json: &str) -> Result<Self, MarketError> {
        let list: PriceList = serde_json::from_str(json)?;
        Ok(Self {
            listings: list.listings,
        })
    }

    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    #[must_use]
    pub fn listing(&self, query: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.matches(query))
    }

    fn require(&self, query: &str, quantity: u32) -> Result<&Listing, MarketError> {
        if quantity == 0 {
            return Err(MarketError::ZeroQuantity);
        }
        self.listing(query)
            .ok_or_else(|| MarketError::UnknownItem(query.trim().to_string()))
    }

    /// Buy `quantity` units. Funds and room are checked before anything changes.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] for unknown goods, a zero quantity, missing funds,
    /// a full team, a full wagon or a load past the wagon's capacity. The state
    /// is untouched on error.
    pub fn buy(
        &self,
        state: &mut GameState,
        query: &str,
        quantity: u32,
    ) -> Result<Trade, MarketError> {
        let listing = self.require(query, quantity)?;
        let cost = listing.price.saturating_mul(quantity);
        if !state.purse.can_afford(cost) {
            return Err(MarketError::InsufficientFunds {
                cost,
                balance: state.purse.balance(),
            });
        }
        match listing.kind.item_kind() {
            Some(kind) => {
                let item = listing.to_item(kind, quantity);
                state.inventory.check_add(&item)?;
                let load = state.inventory.load_lbs().saturating_add(item.total_weight());
                let capacity = state.wagon.capacity_lbs();
                if load > capacity {
                    return Err(MarketError::Overloaded { load, capacity });
                }
                state.purse.spend(cost);
                state.inventory.add(item)?;
            }
            None => {
                let team = u32::try_from(state.oxen.len()).unwrap_or(u32::MAX);
                if team.saturating_add(quantity) > listing.max_quantity {
                    return Err(MarketError::TeamFull {
                        max: listing.max_quantity,
                    });
                }
                state.purse.spend(cost);
                for _ in 0..quantity {
                    let name = state.oxen.next_ox_name();
                    state.oxen.add(Ox::new(name));
                }
            }
        }
        Ok(Trade {
            item: listing.name.clone(),
            quantity,
            total: cost,
            bought: true,
        })
    }

    /// Sell carried goods back at the listed price.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] for unknown goods, oxen, a zero quantity or when
    /// the party holds fewer units than requested.
    pub fn sell(
        &self,
        state: &mut GameState,
        query: &str,
        quantity: u32,
    ) -> Result<Trade, MarketError> {
        let listing = self.require(query, quantity)?;
        if listing.kind.item_kind().is_none() {
            return Err(MarketError::NotSellable(listing.name.clone()));
        }
        let held = state.inventory.quantity_of(&listing.name);
        if held < quantity {
            return Err(MarketError::NotEnough {
                item: listing.name.clone(),
                held,
                requested: quantity,
            });
        }
        let removed = state.inventory.remove(&listing.name, quantity);
        let total = listing.price.saturating_mul(removed);
        state.purse.earn(total);
        Ok(Trade {
            item: listing.name.clone(),
            quantity: removed,
            total,
            bought: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::JourneySetup;

    fn setup() -> (Market, GameState) {
        let market = Market::load_from_static().expect("embedded price list");
        let state = GameState::new(&JourneySetup::default(), 8).unwrap();
        (market, state)
    }

    #[test]
    fn price_list_parses() {
        let market = Market::load_from_static().unwrap();
        assert_eq!(market.listings().len(), 8);
        assert_eq!(market.listing("Spare Wagon Part").map(|l| l.price), Some(10));
        assert_eq!(market.listing("spare part").map(|l| l.id.as_str()), Some("spare_part"));
    }

    #[test]
    fn buying_food_merges_into_rations() {
        let (market, mut state) = setup();
        let trade = market.buy(&mut state, "rations", 100).unwrap();
        assert_eq!(trade.total, 100);
        assert_eq!(state.food_lbs(), 150);
        assert_eq!(state.money(), 900);
        assert_eq!(trade.to_string(), "Bought 100 Rations for $100.");
    }

    #[test]
    fn unaffordable_purchase_mutates_nothing() {
        let (market, mut state) = setup();
        state.purse = crate::ledger::Purse::new(30);
        let before = state.clone();
        let err = market.buy(&mut state, "ox", 1).unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { cost: 40, balance: 30 }));
        assert_eq!(state, before);
    }

    #[test]
    fn stack_overflow_is_rejected_before_payment() {
        let (market, mut state) = setup();
        let err = market.buy(&mut state, "medicine", 8).unwrap_err();
        assert!(matches!(err, MarketError::Inventory(InventoryError::StackLimit { .. })));
        assert_eq!(state.money(), 1_000);
    }

    #[test]
    fn oxen_join_the_team_up_to_the_cap() {
        let (market, mut state) = setup();
        market.buy(&mut state, "ox", 2).unwrap();
        assert_eq!(state.oxen.len(), 6);
        assert_eq!(state.oxen.oxen()[5].name, "Ox 6");
        assert!(matches!(
            market.buy(&mut state, "ox", 3),
            Err(MarketError::TeamFull { max: 8 })
        ));
        assert!(matches!(
            market.sell(&mut state, "ox", 1),
            Err(MarketError::NotSellable(_))
        ));
    }

    #[test]
    fn replacement_oxen_get_fresh_names() {
        let (market, mut state) = setup();
        let mut team = crate::oxen::OxTeam::default();
        for name in ["Ox 1", "Ox 3", "Ox 4"] {
            team.add(Ox::new(name));
        }
        state.oxen = team;
        market.buy(&mut state, "ox", 1).unwrap();
        let names: Vec<&str> = state.oxen.oxen().iter().map(|ox| ox.name.as_str()).collect();
        assert_eq!(names, ["Ox 1", "Ox 3", "Ox 4", "Ox 5"]);
    }

    #[test]
    fn purchases_respect_wagon_capacity() {
        let market = Market::from_json(
            r#"{ "listings": [
                { "id": "anvil", "name": "Anvil", "kind": "supplies", "price": 1, "weight_lbs": 400, "max_quantity": 10 }
            ] }"#,
        )
        .unwrap();
        let setup = JourneySetup {
            wagon: crate::wagon::WagonType::FarmWagon,
            ..JourneySetup::default()
        };
        let mut state = GameState::new(&setup, 8).unwrap();
        let starting_load = state.inventory.load_lbs();
        assert_eq!(starting_load, 111);

        market.buy(&mut state, "anvil", 3).unwrap();
        assert_eq!(state.inventory.load_lbs(), 1_311);
        let before = state.clone();
        let err = market.buy(&mut state, "anvil", 1).unwrap_err();
        assert!(matches!(
            err,
            MarketError::Overloaded {
                load: 1_711,
                capacity: 1_500
            }
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn selling_requires_the_goods() {
        let (market, mut state) = setup();
        let trade = market.sell(&mut state, "ammunition", 20).unwrap();
        assert_eq!(trade.total, 20);
        assert_eq!(state.money(), 1_020);
        assert!(matches!(
            market.sell(&mut state, "bacon", 1),
            Err(MarketError::NotEnough { held: 0, .. })
        ));
        assert!(matches!(
            market.sell(&mut state, "whiskey", 1),
            Err(MarketError::UnknownItem(_))
        ));
        assert!(matches!(market.buy(&mut state, "rifle", 0), Err(MarketError::ZeroQuantity)));
    }
}
