//! Ingredient catalogue and the fixed per-ingredient count table.
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ingredient {
    Dough,
    Sauce,
    Cheese,
    Pepperoni,
    Mushrooms,
    Peppers,
}

impl Ingredient {
    pub const ALL: [Self; 6] = [
        Self::Dough,
        Self::Sauce,
        Self::Cheese,
        Self::Pepperoni,
        Self::Mushrooms,
        Self::Peppers,
    ];

    /// Every pizza needs one of each.
    pub const BASE: [Self; 3] = [Self::Dough, Self::Sauce, Self::Cheese];

    /// Customers pick their order from these.
    pub const TOPPINGS: [Self; 3] = [Self::Pepperoni, Self::Mushrooms, Self::Peppers];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dough => "dough",
            Self::Sauce => "sauce",
            Self::Cheese => "cheese",
            Self::Pepperoni => "pepperoni",
            Self::Mushrooms => "mushrooms",
            Self::Peppers => "peppers",
        }
    }

    #[must_use]
    pub const fn is_topping(self) -> bool {
        matches!(self, Self::Pepperoni | Self::Mushrooms | Self::Peppers)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ingredient '{0}'")]
pub struct UnknownIngredient(pub String);

impl FromStr for Ingredient {
    type Err = UnknownIngredient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ingredient| ingredient.as_str() == needle)
            .ok_or_else(|| UnknownIngredient(s.to_string()))
    }
}

/// Count per ingredient. Used for stock, orders, usage, and staged pizzas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IngredientCounts([u32; 6]);

impl IngredientCounts {
    #[must_use]
    pub const fn new() -> Self {
        Self([0; 6])
    }

    /// Build from `(ingredient, qty)` pairs, summing repeated entries.
    #[must_use]
    pub fn from_pairs(pairs: &[(Ingredient, u32)]) -> Self {
        let mut counts = Self::new();
        for &(ingredient, qty) in pairs {
            counts.add(ingredient, qty);
        }
        counts
    }

    /// Same quantity of every ingredient.
    #[must_use]
    pub const fn uniform(qty: u32) -> Self {
        Self([qty; 6])
    }

    #[must_use]
    pub const fn get(&self, ingredient: Ingredient) -> u32 {
        self.0[ingredient.slot()]
    }

    pub fn set(&mut self, ingredient: Ingredient, qty: u32) {
        self.0[ingredient.slot()] = qty;
    }

    pub fn add(&mut self, ingredient: Ingredient, qty: u32) {
        let slot = &mut self.0[ingredient.slot()];
        *slot = slot.saturating_add(qty);
    }

    /// Add every count from `other`.
    pub fn absorb(&mut self, other: &Self) {
        for ingredient in Ingredient::ALL {
            self.add(ingredient, other.get(ingredient));
        }
    }

    /// True when every count in `self` is covered by `available`.
    #[must_use]
    pub fn fits_within(&self, available: &Self) -> bool {
        self.first_shortfall(available).is_none()
    }

    /// First ingredient (catalogue order) where `available` is short.
    #[must_use]
    pub fn first_shortfall(&self, available: &Self) -> Option<Ingredient> {
        Ingredient::ALL
            .into_iter()
            .find(|&ingredient| self.get(ingredient) > available.get(ingredient))
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&qty| u64::from(qty)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&qty| qty == 0)
    }

    pub fn clear(&mut self) {
        self.0 = [0; 6];
    }

    /// Non-zero entries in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (Ingredient, u32)> + '_ {
        Ingredient::ALL
            .into_iter()
            .map(|ingredient| (ingredient, self.get(ingredient)))
            .filter(|&(_, qty)| qty > 0)
    }
}

impl Index<Ingredient> for IngredientCounts {
    type Output = u32;

    fn index(&self, ingredient: Ingredient) -> &u32 {
        &self.0[ingredient.slot()]
    }
}

impl IndexMut<Ingredient> for IngredientCounts {
    fn index_mut(&mut self, ingredient: Ingredient) -> &mut u32 {
        &mut self.0[ingredient.slot()]
    }
}

impl fmt::Display for IngredientCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ingredient in Ingredient::ALL {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{ingredient}:{}", self.get(ingredient))?;
        }
        Ok(())
    }
}

// Serialized as an object keyed by ingredient name so saved games stay readable.
impl Serialize for IngredientCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Ingredient::ALL.len()))?;
        for ingredient in Ingredient::ALL {
            map.serialize_entry(&ingredient, &self.get(ingredient))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IngredientCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<Ingredient, u32>::deserialize(deserializer)?;
        let mut counts = Self::new();
        for (ingredient, qty) in raw {
            counts.set(ingredient, qty);
        }
        Ok(counts)
    }
}
