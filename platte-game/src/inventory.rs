//! Item stacks carried in the wagon.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::rng::roll_index;

/// Maximum number of distinct stacks the wagon can hold.
pub const MAX_STACKS: usize = 30;
const RATIONS_NAME: &str = "Rations";
const RATIONS_MAX: u32 = 500;
const RATIONS_NUTRITION: i32 = 10;

/// Closed set of item behaviours. Using an item dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Counted in pounds.
    Food { nutrition: i32 },
    Medicine { healing: i32 },
    Weapon { rifle: bool },
    Ammunition,
    SparePart,
    Supplies,
}

impl ItemKind {
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Food { .. } => "food",
            Self::Medicine { .. } => "medicine",
            Self::Weapon { .. } => "weapon",
            Self::Ammunition => "ammunition",
            Self::SparePart => "spare_part",
            Self::Supplies => "supplies",
        }
    }

    #[must_use]
    pub const fn is_food(self) -> bool {
        matches!(self, Self::Food { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("{name} stacks hold at most {max} (requested {requested})")]
    StackLimit {
        name: String,
        max: u32,
        requested: u32,
    },
    #[error("the wagon already carries {limit} different kinds of goods")]
    Full { limit: usize },
    #[error("you have no {0}")]
    Missing(String),
    #[error("{0} cannot be used that way")]
    NotUsable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub name: String,
    pub quantity: u32,
    pub max_quantity: u32,
    #[serde(default)]
    pub weight_lbs: u32,
    #[serde(default)]
    pub value: u32,
}

impl Item {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ItemKind, quantity: u32, max_quantity: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            quantity,
            max_quantity,
            weight_lbs: 1,
            value: 0,
        }
    }

    #[must_use]
    pub const fn with_weight(mut self, weight_lbs: u32) -> Self {
        self.weight_lbs = weight_lbs;
        self
    }

    #[must_use]
    pub const fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    /// Matches by display name or kind slug, ignoring case, spaces and underscores.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let wanted = normalize(query);
        !wanted.is_empty() && (normalize(&self.name) == wanted || normalize(self.kind.slug()) == wanted)
    }

    #[must_use]
    pub const fn room(&self) -> u32 {
        self.max_quantity.saturating_sub(self.quantity)
    }

    #[must_use]
    pub const fn total_weight(&self) -> u32 {
        self.weight_lbs.saturating_mul(self.quantity)
    }

    /// Trade value of the whole stack.
    #[must_use]
    pub const fn total_value(&self) -> u32 {
        self.value.saturating_mul(self.quantity)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.name, self.quantity)
    }
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Outfit every party leaves Independence with.
    #[must_use]
    pub fn starting_kit() -> Self {
        Self {
            items: vec![
                rations(50),
                Item::new("Rifle", ItemKind::Weapon { rifle: true }, 1, 2)
                    .with_weight(8)
                    .with_value(15),
                Item::new("Ammunition", ItemKind::Ammunition, 50, 200).with_value(1),
                Item::new("Medicine", ItemKind::Medicine { healing: 20 }, 3, 10).with_value(5),
            ],
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn stack_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, query: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.matches(query))
    }

    #[must_use]
    pub fn quantity_of(&self, query: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.matches(query))
            .map(|item| item.quantity)
            .sum()
    }

    /// Merge into an existing stack of the same name or open a new one.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::StackLimit`] when the stack would overflow and
    /// [`InventoryError::Full`] when no stack slot is free. Nothing changes on error.
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        self.check_add(&item)?;
        if let Some(stack) = self.items.iter_mut().find(|stack| stack.name == item.name) {
            stack.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Validate an [`Inventory::add`] without applying it.
    ///
    /// # Errors
    ///
    /// See [`Inventory::add`].
    pub fn check_add(&self, item: &Item) -> Result<(), InventoryError> {
        if let Some(stack) = self.items.iter().find(|stack| stack.name == item.name) {
            let requested = stack.quantity.saturating_add(item.quantity);
            if requested > stack.max_quantity {
                return Err(InventoryError::StackLimit {
                    name: stack.name.clone(),
                    max: stack.max_quantity,
                    requested,
                });
            }
            return Ok(());
        }
        if self.items.len() >= MAX_STACKS {
            return Err(InventoryError::Full { limit: MAX_STACKS });
        }
        if item.quantity > item.max_quantity {
            return Err(InventoryError::StackLimit {
                name: item.name.clone(),
                max: item.max_quantity,
                requested: item.quantity,
            });
        }
        Ok(())
    }

    /// Remove up to `quantity` units from the first matching stack, dropping it when empty.
    /// Returns the number of units actually removed.
    pub fn remove(&mut self, query: &str, quantity: u32) -> u32 {
        let Some(pos) = self.items.iter().position(|item| item.matches(query)) else {
            return 0;
        };
        self.take_from(pos, quantity)
    }

    fn take_from(&mut self, pos: usize, quantity: u32) -> u32 {
        let stack = &mut self.items[pos];
        let removed = quantity.min(stack.quantity);
        stack.quantity -= removed;
        if stack.quantity == 0 {
            self.items.remove(pos);
        }
        removed
    }

    /// The best weapon carried, preferring a rifle.
    #[must_use]
    pub fn weapon(&self) -> Option<&Item> {
        let mut weapons = self
            .items
            .iter()
            .filter(|item| matches!(item.kind, ItemKind::Weapon { .. }));
        let first = weapons.next()?;
        if matches!(first.kind, ItemKind::Weapon { rifle: true }) {
            return Some(first);
        }
        Some(
            weapons
                .find(|item| matches!(item.kind, ItemKind::Weapon { rifle: true }))
                .unwrap_or(first),
        )
    }

    #[must_use]
    pub fn ammunition(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| item.kind == ItemKind::Ammunition)
            .map(|item| item.quantity)
            .sum()
    }

    /// Pounds carried across every stack.
    #[must_use]
    pub fn load_lbs(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |load, item| load.saturating_add(item.total_weight()))
    }

    /// Pounds of food across every food stack.
    #[must_use]
    pub fn food_lbs(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| item.kind.is_food())
            .map(|item| item.quantity)
            .sum()
    }

    /// Eat or lose up to `lbs` pounds of food, oldest stack first. Returns pounds removed.
    pub fn consume_food(&mut self, lbs: u32) -> u32 {
        let mut remaining = lbs;
        while remaining > 0 {
            let Some(pos) = self.items.iter().position(|item| item.kind.is_food()) else {
                break;
            };
            remaining -= self.take_from(pos, remaining);
        }
        lbs - remaining
    }

    /// Add game or forage to the first food stack with room, opening a rations
    /// stack when needed. Returns pounds actually stored.
    pub fn add_food(&mut self, lbs: u32) -> u32 {
        if lbs == 0 {
            return 0;
        }
        if let Some(stack) = self
            .items
            .iter_mut()
            .find(|item| item.kind.is_food() && item.room() > 0)
        {
            let stored = lbs.min(stack.room());
            stack.quantity += stored;
            return stored;
        }
        if self.items.len() >= MAX_STACKS {
            return 0;
        }
        let stored = lbs.min(RATIONS_MAX);
        self.items.push(rations(stored));
        stored
    }

    /// Remove a single unit from a uniformly chosen stack; returns its name.
    pub fn remove_random_unit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        let pos = roll_index(rng, self.items.len());
        let name = self.items[pos].name.clone();
        self.take_from(pos, 1);
        Some(name)
    }
}

fn rations(quantity: u32) -> Item {
    Item::new(
        RATIONS_NAME,
        ItemKind::Food {
            nutrition: RATIONS_NUTRITION,
        },
        quantity,
        RATIONS_MAX,
    )
    .with_value(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    #[test]
    fn starting_kit_matches_outfitter_list() {
        let inventory = Inventory::starting_kit();
        assert_eq!(inventory.food_lbs(), 50);
        assert_eq!(inventory.ammunition(), 50);
        assert_eq!(inventory.quantity_of("medicine"), 3);
        assert!(matches!(
            inventory.weapon().map(|item| item.kind),
            Some(ItemKind::Weapon { rifle: true })
        ));
    }

    #[test]
    fn load_and_worth_follow_stack_weights() {
        let mut inventory = Inventory::starting_kit();
        assert_eq!(inventory.load_lbs(), 111);
        inventory
            .add(
                Item::new("Spare Wagon Part", ItemKind::SparePart, 2, 6)
                    .with_weight(20)
                    .with_value(10),
            )
            .unwrap();
        assert_eq!(inventory.load_lbs(), 151);
        let part = inventory.get("spare part").unwrap();
        assert_eq!(part.total_weight(), 40);
        assert_eq!(part.total_value(), 20);
    }

    #[test]
    fn adding_respects_stack_and_slot_limits() {
        let mut inventory = Inventory::starting_kit();
        let err = inventory
            .add(Item::new("Medicine", ItemKind::Medicine { healing: 20 }, 8, 10))
            .unwrap_err();
        assert!(matches!(err, InventoryError::StackLimit { requested: 11, .. }));
        assert_eq!(inventory.quantity_of("medicine"), 3);

        let mut crowded = Inventory::default();
        for n in 0..MAX_STACKS {
            crowded
                .add(Item::new(format!("Trinket {n}"), ItemKind::Supplies, 1, 5))
                .unwrap();
        }
        let err = crowded
            .add(Item::new("Quilt", ItemKind::Supplies, 1, 1))
            .unwrap_err();
        assert_eq!(err, InventoryError::Full { limit: MAX_STACKS });
        crowded
            .add(Item::new("Trinket 3", ItemKind::Supplies, 4, 5))
            .unwrap();
        assert_eq!(crowded.quantity_of("trinket 3"), 5);
    }

    #[test]
    fn removal_clamps_and_drops_empty_stacks() {
        let mut inventory = Inventory::starting_kit();
        assert_eq!(inventory.remove("Medicine", 10), 3);
        assert!(inventory.get("medicine").is_none());
        assert_eq!(inventory.remove("medicine", 1), 0);
        assert_eq!(inventory.stack_count(), 3);
    }

    #[test]
    fn food_consumption_never_goes_negative() {
        let mut inventory = Inventory::starting_kit();
        inventory
            .add(Item::new("Bacon", ItemKind::Food { nutrition: 6 }, 5, 200))
            .unwrap();
        assert_eq!(inventory.food_lbs(), 55);
        assert_eq!(inventory.consume_food(52), 52);
        assert_eq!(inventory.food_lbs(), 3);
        assert_eq!(inventory.consume_food(10), 3);
        assert_eq!(inventory.food_lbs(), 0);
        assert_eq!(inventory.add_food(12), 12);
        assert_eq!(inventory.get("rations").map(|item| item.quantity), Some(12));
    }

    #[test]
    fn random_unit_removal_takes_one_from_chosen_stack() {
        let mut inventory = Inventory::starting_kit();
        let mut rng = ScriptedRng::new(vec![0.3]);
        let name = inventory.remove_random_unit(&mut rng);
        assert_eq!(name.as_deref(), Some("Rifle"));
        assert!(inventory.weapon().is_none());
        assert_eq!(inventory.remove_random_unit(&mut ScriptedRng::new(vec![0.0])).as_deref(), Some("Rations"));
        assert_eq!(inventory.food_lbs(), 49);
    }

    #[test]
    fn lookup_accepts_kind_slugs() {
        let mut inventory = Inventory::default();
        inventory
            .add(Item::new("Spare Wagon Part", ItemKind::SparePart, 1, 6))
            .unwrap();
        assert!(inventory.get("spare part").is_some());
        assert!(inventory.get("Spare_Wagon_Part").is_some());
        assert!(inventory.get("").is_none());
    }
}
