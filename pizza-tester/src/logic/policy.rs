use std::fmt;
use std::str::FromStr;

use pizza_game::{CustomerView, Ingredient, IngredientCounts, Money, ParlourView};

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Ingredients to buy during Prep.
    fn plan_order(&mut self, view: &ParlourView) -> IngredientCounts;

    /// Price to lock in during Pricing.
    fn choose_price(&mut self, view: &ParlourView) -> Money;

    /// Ingredients to stage for the head-of-queue customer.
    fn assemble(&mut self, customer: &CustomerView) -> IngredientCounts;

    /// Seconds between serve attempts during service.
    fn reaction_secs(&self) -> u32 {
        1
    }
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    Balanced,
    Premium,
    Bargain,
    Slacker,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Balanced, Self::Premium, Self::Bargain, Self::Slacker];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Premium => "premium",
            Self::Bargain => "bargain",
            Self::Slacker => "slacker",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::Premium => "Premium",
            Self::Bargain => "Bargain",
            Self::Slacker => "Slacker",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Balanced => "Restocks to 10 of everything, prices at $8, serves exact orders",
            Self::Premium => "Lean stock, $11 price, serves exact orders",
            Self::Bargain => "Deep stock, $5 price to pull in crowds",
            Self::Slacker => "Barely restocks, reacts slowly, forgets toppings",
        }
    }

    #[must_use]
    pub fn create_policy(self) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Balanced => Box::new(RestockPolicy {
                name: "balanced",
                base_target: 10,
                topping_target: 6,
                price: Money::from_dollars(8),
            }),
            Self::Premium => Box::new(RestockPolicy {
                name: "premium",
                base_target: 7,
                topping_target: 5,
                price: Money::from_dollars(11),
            }),
            Self::Bargain => Box::new(RestockPolicy {
                name: "bargain",
                base_target: 14,
                topping_target: 8,
                price: Money::from_dollars(5),
            }),
            Self::Slacker => Box::new(SlackerPolicy),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

/// Tops every ingredient back up to a target before each day.
struct RestockPolicy {
    name: &'static str,
    base_target: u32,
    topping_target: u32,
    price: Money,
}

impl PlayerPolicy for RestockPolicy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn plan_order(&mut self, view: &ParlourView) -> IngredientCounts {
        top_up(&view.inventory, self.base_target, self.topping_target)
    }

    fn choose_price(&mut self, _view: &ParlourView) -> Money {
        self.price
    }

    fn assemble(&mut self, customer: &CustomerView) -> IngredientCounts {
        exact_pizza(customer)
    }
}

struct SlackerPolicy;

impl PlayerPolicy for SlackerPolicy {
    fn name(&self) -> &'static str {
        "slacker"
    }

    fn plan_order(&mut self, view: &ParlourView) -> IngredientCounts {
        top_up(&view.inventory, 3, 1)
    }

    fn choose_price(&mut self, _view: &ParlourView) -> Money {
        Money::from_dollars(9)
    }

    fn assemble(&mut self, customer: &CustomerView) -> IngredientCounts {
        // every second customer gets a plain pizza
        if customer.id.0 % 2 == 0 {
            let mut pizza = IngredientCounts::new();
            for ingredient in Ingredient::BASE {
                pizza.add(ingredient, 1);
            }
            pizza
        } else {
            exact_pizza(customer)
        }
    }

    fn reaction_secs(&self) -> u32 {
        3
    }
}

fn top_up(stock: &IngredientCounts, base_target: u32, topping_target: u32) -> IngredientCounts {
    let mut order = IngredientCounts::new();
    for ingredient in Ingredient::ALL {
        let target = if ingredient.is_topping() {
            topping_target
        } else {
            base_target
        };
        order.set(ingredient, target.saturating_sub(stock.get(ingredient)));
    }
    order
}

fn exact_pizza(customer: &CustomerView) -> IngredientCounts {
    let mut pizza = IngredientCounts::new();
    for ingredient in Ingredient::BASE {
        pizza.add(ingredient, 1);
    }
    for &topping in &customer.toppings {
        pizza.add(topping, 1);
    }
    pizza
}
