//! Customers waiting in the service queue.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{MAX_TOPPINGS, PATIENCE_TIMEOUT_SECS, PATIENCE_WARN_SECS};
use crate::ingredient::{Ingredient, IngredientCounts};
use crate::numbers::round_f64_to_u32;

/// Ordered toppings; never more than two, so stored inline.
pub type ToppingOrder = SmallVec<[Ingredient; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Seconds a customer tolerates before warning and before walking out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patience {
    pub warn_secs: f64,
    pub timeout_secs: f64,
}

impl Default for Patience {
    fn default() -> Self {
        Self {
            warn_secs: PATIENCE_WARN_SECS,
            timeout_secs: PATIENCE_TIMEOUT_SECS,
        }
    }
}

/// Wait-derived display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatienceBucket {
    Content,
    Impatient,
    /// Past the timeout; removed on the next patience pass.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Session clock reading when the customer joined the queue.
    pub arrived_at: f64,
    pub toppings: ToppingOrder,
    pub patience: Patience,
}

impl Customer {
    #[must_use]
    pub fn new(id: CustomerId, arrived_at: f64, toppings: &[Ingredient], patience: Patience) -> Self {
        Self {
            id,
            arrived_at,
            toppings: toppings.iter().copied().filter(|t| t.is_topping()).collect(),
            patience,
        }
    }

    /// Draw 0..=2 toppings uniformly with repetition.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        id: CustomerId,
        arrived_at: f64,
        patience: Patience,
    ) -> Self {
        let count = rng.gen_range(0..=MAX_TOPPINGS);
        let toppings = (0..count)
            .map(|_| Ingredient::TOPPINGS[rng.gen_range(0..Ingredient::TOPPINGS.len())])
            .collect();
        Self {
            id,
            arrived_at,
            toppings,
            patience,
        }
    }

    #[must_use]
    pub fn wait(&self, now: f64) -> f64 {
        (now - self.arrived_at).max(0.0)
    }

    #[must_use]
    pub fn bucket(&self, now: f64) -> PatienceBucket {
        let wait = self.wait(now);
        if wait > self.patience.timeout_secs {
            PatienceBucket::Leaving
        } else if wait > self.patience.warn_secs {
            PatienceBucket::Impatient
        } else {
            PatienceBucket::Content
        }
    }

    /// Countdown shown next to the customer.
    #[must_use]
    pub fn seconds_left(&self, now: f64) -> u32 {
        round_f64_to_u32(self.patience.timeout_secs - self.wait(now))
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.toppings.is_empty()
    }

    /// Ingredients a pizza for this customer consumes: the base plus one per topping.
    #[must_use]
    pub fn usage(&self) -> IngredientCounts {
        let mut usage = IngredientCounts::new();
        for ingredient in Ingredient::BASE {
            usage.add(ingredient, 1);
        }
        for &topping in &self.toppings {
            usage.add(topping, 1);
        }
        usage
    }

    /// Ordered toppings as counts.
    #[must_use]
    pub fn topping_counts(&self) -> IngredientCounts {
        let mut counts = IngredientCounts::new();
        for &topping in &self.toppings {
            counts.add(topping, 1);
        }
        counts
    }

    /// True when `staged` covers every ordered topping; extras are allowed.
    #[must_use]
    pub fn matches(&self, staged: &IngredientCounts) -> bool {
        self.topping_counts().fits_within(staged)
    }

    /// Label shown in the queue, e.g. `pepperoni,peppers` or `plain`.
    #[must_use]
    pub fn order_label(&self) -> String {
        if self.toppings.is_empty() {
            return "plain".to_string();
        }
        self.toppings
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
